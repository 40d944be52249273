pub mod core;
pub mod modem;

pub use core::{
    config::ModemConfig,
    errors::ModemError,
    kernel::{ReqwestTransport, ScriptedTransport, Transport},
    types::*,
};
pub use modem::{build_modem, ErrorKind, Modem, RequestName};

pub mod builder;
pub mod client;
pub mod hasher;
pub mod requests;

// Re-export main types for easier importing
pub use builder::build_modem;
pub use client::Modem;
pub use crate::core::error_codes::ErrorKind;
pub use hasher::compute_login_hash;
pub use requests::{lookup, RequestName};

use crate::core::error_codes::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModemError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unknown request name: {0}")]
    UnknownRequestName(String),

    #[error("Not connected to the modem")]
    NotConnected,

    #[error("Already connected to the modem")]
    AlreadyConnected,

    #[error("Not authenticated, call login() first")]
    NotAuthenticated,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Device error {code}: {kind}")]
    Device { kind: ErrorKind, code: String },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),
}

impl ModemError {
    /// Build a device error from the raw code found in a response
    pub fn from_device_code(code: &str) -> Self {
        Self::Device {
            kind: ErrorKind::from_code(code),
            code: code.to_string(),
        }
    }

    /// The classified device error kind, if this is a device-reported error
    pub fn device_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Device { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// True when the device rejected the current session or token
    pub fn is_session_invalidation(&self) -> bool {
        self.device_kind().is_some_and(|kind| kind.invalidates_session())
    }
}

use serde::Serialize;
use std::fmt;

/// Error codes the device reports inside `<error><code>` elements.
pub const KNOWN_CODES: [&str; 12] = [
    "100002", "100003", "100004", "108001", "108002", "108003", "108006", "108007", "120001",
    "125001", "125002", "125003",
];

/// Classified device error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    SystemNotSupported,
    SystemNoRights,
    SystemBusy,
    LoginUsernameWrong,
    LoginPasswordWrong,
    UserAlreadyLoggedIn,
    LoginUsernamePasswordWrong,
    LoginUsernamePasswordOverrun,
    VoiceBusy,
    WrongToken,
    WrongSession,
    WrongSessionToken,
    Unknown,
}

impl ErrorKind {
    /// Map a device error code to its kind. Codes outside the table are `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "100002" => Self::SystemNotSupported,
            "100003" => Self::SystemNoRights,
            "100004" => Self::SystemBusy,
            "108001" => Self::LoginUsernameWrong,
            "108002" => Self::LoginPasswordWrong,
            "108003" => Self::UserAlreadyLoggedIn,
            "108006" => Self::LoginUsernamePasswordWrong,
            "108007" => Self::LoginUsernamePasswordOverrun,
            "120001" => Self::VoiceBusy,
            "125001" => Self::WrongToken,
            "125002" => Self::WrongSession,
            "125003" => Self::WrongSessionToken,
            _ => Self::Unknown,
        }
    }

    /// Canonical device code for this kind
    pub const fn code(self) -> Option<&'static str> {
        match self {
            Self::SystemNotSupported => Some("100002"),
            Self::SystemNoRights => Some("100003"),
            Self::SystemBusy => Some("100004"),
            Self::LoginUsernameWrong => Some("108001"),
            Self::LoginPasswordWrong => Some("108002"),
            Self::UserAlreadyLoggedIn => Some("108003"),
            Self::LoginUsernamePasswordWrong => Some("108006"),
            Self::LoginUsernamePasswordOverrun => Some("108007"),
            Self::VoiceBusy => Some("120001"),
            Self::WrongToken => Some("125001"),
            Self::WrongSession => Some("125002"),
            Self::WrongSessionToken => Some("125003"),
            Self::Unknown => None,
        }
    }

    /// The device no longer accepts the current session/token pair
    pub const fn invalidates_session(self) -> bool {
        matches!(self, Self::WrongToken | Self::WrongSession | Self::WrongSessionToken)
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::SystemNotSupported => "system does not support this feature",
            Self::SystemNoRights => "no rights to perform this action",
            Self::SystemBusy => "system is busy",
            Self::LoginUsernameWrong => "wrong username",
            Self::LoginPasswordWrong => "wrong password",
            Self::UserAlreadyLoggedIn => "user is already logged in",
            Self::LoginUsernamePasswordWrong => "wrong username and password",
            Self::LoginUsernamePasswordOverrun => "too many failed login attempts",
            Self::VoiceBusy => "modem is busy with a voice call",
            Self::WrongToken => "api call made with a wrong token",
            Self::WrongSession => "api call made with a wrong session",
            Self::WrongSessionToken => "api call made with a wrong session token",
            Self::Unknown => "unknown error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_classify_exactly() {
        let expected = [
            ErrorKind::SystemNotSupported,
            ErrorKind::SystemNoRights,
            ErrorKind::SystemBusy,
            ErrorKind::LoginUsernameWrong,
            ErrorKind::LoginPasswordWrong,
            ErrorKind::UserAlreadyLoggedIn,
            ErrorKind::LoginUsernamePasswordWrong,
            ErrorKind::LoginUsernamePasswordOverrun,
            ErrorKind::VoiceBusy,
            ErrorKind::WrongToken,
            ErrorKind::WrongSession,
            ErrorKind::WrongSessionToken,
        ];

        for (code, kind) in KNOWN_CODES.iter().zip(expected) {
            assert_eq!(ErrorKind::from_code(code), kind, "code {}", code);
            assert_eq!(kind.code(), Some(*code));
        }
    }

    #[test]
    fn test_unknown_codes() {
        for code in ["000000", "100001", "108004", "125004", "999999", "", "abc"] {
            assert_eq!(ErrorKind::from_code(code), ErrorKind::Unknown);
        }
        assert_eq!(ErrorKind::Unknown.code(), None);
    }

    #[test]
    fn test_session_invalidation_kinds() {
        let invalidating: Vec<_> = KNOWN_CODES
            .iter()
            .map(|code| ErrorKind::from_code(code))
            .filter(|kind| kind.invalidates_session())
            .collect();

        assert_eq!(
            invalidating,
            vec![
                ErrorKind::WrongToken,
                ErrorKind::WrongSession,
                ErrorKind::WrongSessionToken
            ]
        );
        assert!(!ErrorKind::Unknown.invalidates_session());
    }

    #[test]
    fn test_display_uses_message() {
        assert_eq!(ErrorKind::LoginPasswordWrong.to_string(), "wrong password");
    }
}

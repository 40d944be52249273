use base64::engine::general_purpose;
use base64::Engine;
use sha2::{Digest, Sha256};

/// SHA-256 of `data`, rendered as lowercase hex text and base64-encoded.
///
/// The device expects the base64 of the hex *text*, not of the raw digest.
fn b64_hex_sha256(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    general_purpose::STANDARD.encode(hex::encode(digest))
}

/// First stage of the login hash, computed over the UTF-8 password bytes
pub fn password_hash(password: &str) -> String {
    b64_hex_sha256(password.as_bytes())
}

/// Compute the `<Password>` payload for `password_type` 4 logins
///
/// `base64(hex(sha256(username + base64(hex(sha256(password))) + token)))`
///
/// The token is the current `__RequestVerificationToken`, so the value is only
/// valid for the session it was computed against.
pub fn compute_login_hash(username: &str, password: &str, token: &str) -> String {
    let pass_hash = password_hash(password);

    let mut payload = Vec::with_capacity(username.len() + pass_hash.len() + token.len());
    payload.extend_from_slice(username.as_bytes());
    payload.extend_from_slice(pass_hash.as_bytes());
    payload.extend_from_slice(token.as_bytes());

    b64_hex_sha256(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_known_value() {
        assert_eq!(
            password_hash("admin"),
            "OGM2OTc2ZTViNTQxMDQxNWJkZTkwOGJkNGRlZTE1ZGZiMTY3YTljODczZmM0YmI4YTgxZjZmMmFiNDQ4YTkxOA=="
        );
    }

    #[test]
    fn test_login_hash_known_values() {
        assert_eq!(
            compute_login_hash("admin", "admin", "T1"),
            "MGFiNmNkYzBiODhjNzMyNTU0NGI1NWRiMjExOWRjOGZkOTg2OGNkMmFhM2I4YzRmZThjMGQzZDZkNDk3YTlmYw=="
        );
        assert_eq!(
            compute_login_hash("admin", "admin1", "abc123"),
            "OTJkOWFjZWE0OGQ0NmM4ZWIxNzU5MjYzZGExZGQ3MTBmNTUzN2Y0MTNlZWE5YjI0OTA0YjcyMjkwZDY3MGJjNA=="
        );
    }

    #[test]
    fn test_login_hash_deterministic() {
        let first = compute_login_hash("admin", "secret", "token");
        let second = compute_login_hash("admin", "secret", "token");
        assert_eq!(first, second);
    }

    #[test]
    fn test_each_input_changes_hash() {
        let base = compute_login_hash("admin", "secret", "token");

        assert_ne!(base, compute_login_hash("admin2", "secret", "token"));
        assert_ne!(base, compute_login_hash("admin", "secret2", "token"));
        assert_ne!(base, compute_login_hash("admin", "secret", "token2"));
    }

    #[test]
    fn test_printable_ascii_passwords_do_not_collide() {
        let hashes: std::collections::HashSet<String> = (0x20u8..0x7f)
            .map(|c| compute_login_hash("admin", &char::from(c).to_string(), "token"))
            .collect();
        assert_eq!(hashes.len(), 0x7f - 0x20);
    }
}

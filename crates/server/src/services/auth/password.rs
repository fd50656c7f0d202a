//! Salted scrypt password hashing.
//!
//! Stored form is `hex(hash).hex(salt)`: a 64-byte scrypt output and a
//! 16-byte random salt, both hex-encoded, joined by a dot. The hex-encoded
//! salt string (not its decoded bytes) is the scrypt salt input, so hashes
//! remain verifiable against accounts created by earlier deployments.

use rand::RngCore;
use scrypt::Params;
use thiserror::Error;

/// Salt length in raw bytes (32 hex chars once encoded).
const SALT_LEN: usize = 16;

/// Derived hash length in bytes (128 hex chars once encoded).
const HASH_LEN: usize = 64;

/// scrypt cost parameters: N = 2^14, r = 8, p = 1.
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Errors from hashing or verifying a password.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The stored value is not `hex(hash).hex(salt)`.
    #[error("malformed stored password hash")]
    Malformed,

    /// scrypt rejected the derivation parameters or output length.
    #[error("scrypt failure")]
    Scrypt,
}

fn derive(password: &str, salt_hex: &str) -> Result<[u8; HASH_LEN], PasswordError> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, HASH_LEN)
        .map_err(|_| PasswordError::Scrypt)?;

    let mut output = [0u8; HASH_LEN];
    scrypt::scrypt(password.as_bytes(), salt_hex.as_bytes(), &params, &mut output)
        .map_err(|_| PasswordError::Scrypt)?;

    Ok(output)
}

/// Hash a password with a fresh random salt.
///
/// # Errors
///
/// Returns `PasswordError::Scrypt` if key derivation fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);

    let hash = derive(password, &salt_hex)?;

    Ok(format!("{}.{}", hex::encode(hash), salt_hex))
}

/// Verify a password against a stored `hex(hash).hex(salt)` value.
///
/// The comparison is constant-time over the derived hash.
///
/// # Errors
///
/// Returns `PasswordError::Malformed` if the stored value doesn't have the
/// expected layout, or `PasswordError::Scrypt` if derivation fails.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let (hash_hex, salt_hex) = stored.split_once('.').ok_or(PasswordError::Malformed)?;

    let expected = hex::decode(hash_hex).map_err(|_| PasswordError::Malformed)?;
    if expected.len() != HASH_LEN {
        return Err(PasswordError::Malformed);
    }

    let computed = derive(password, salt_hex)?;

    Ok(constant_time_eq(&expected, &computed))
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_layout() {
        let stored = hash_password("hunter22").unwrap();
        let (hash_hex, salt_hex) = stored.split_once('.').unwrap();
        assert_eq!(hash_hex.len(), HASH_LEN * 2);
        assert_eq!(salt_hex.len(), SALT_LEN * 2);
        assert!(hash_hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(salt_hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_roundtrip() {
        let stored = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &stored).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let stored = hash_password("hunter22").unwrap();
        assert!(!verify_password("hunter23", &stored).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let a = hash_password("hunter22").unwrap();
        let b = hash_password("hunter22").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_stored_value() {
        assert!(matches!(
            verify_password("x", "no-dot-here"),
            Err(PasswordError::Malformed)
        ));
        assert!(matches!(
            verify_password("x", "zzzz.abcd"),
            Err(PasswordError::Malformed)
        ));
        // valid hex but wrong hash length
        assert!(matches!(
            verify_password("x", "abcd.1234"),
            Err(PasswordError::Malformed)
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
    }
}

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::distributions::Alphanumeric;
use rand::Rng;

use abi::errors::{Error, Result};

pub mod mongodb_tester;

const TOKEN_LEN: usize = 32;

/// random salt, base64 encoded
pub fn generate_salt() -> String {
    SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map(|salt| salt.as_str().to_string())
        .unwrap_or_default()
}

/// hash with argon2; the result is a phc string carrying its own salt and params
pub fn hash_password(password: &[u8], salt: &str) -> Result<String> {
    let salt = SaltString::from_b64(salt)
        .map_err(|e| Error::internal_with_details(format!("invalid salt: {}", e)))?;
    Argon2::default()
        .hash_password(password, &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::internal_with_details(format!("hash password error: {}", e)))
}

/// hash a secret with a freshly generated salt
pub fn hash_secret(secret: &str) -> Result<String> {
    hash_password(secret.as_bytes(), &generate_salt())
}

/// a malformed hash counts as a mismatch
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("stored hash is not a valid phc string: {}", e);
            false
        }
    }
}

/// one-time url-safe token for verification and reset links
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_secret("hunter22").unwrap();
        assert_ne!(hash, "hunter22");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn same_secret_different_salt() {
        let salt_a = generate_salt();
        let salt_b = generate_salt();
        assert_ne!(salt_a, salt_b);
        let a = hash_password(b"secret", &salt_a).unwrap();
        let b = hash_password(b"secret", &salt_b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("secret", "not-a-hash"));
        assert!(!verify_password("secret", ""));
    }

    #[test]
    fn tokens_are_alphanumeric() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token());
    }
}

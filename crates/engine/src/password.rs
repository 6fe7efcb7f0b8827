//! Credential hashing with Argon2id.
//!
//! Hashes are stored as PHC strings so parameters and salt travel with the
//! hash. Errors never carry the plaintext.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{EngineError, ResultEngine};

pub(crate) fn hash(plaintext: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| EngineError::InvalidInput("failed to hash password".to_string()))
}

pub(crate) fn verify(plaintext: &str, phc_hash: &str) -> ResultEngine<()> {
    let parsed = PasswordHash::new(phc_hash)
        .map_err(|_| EngineError::BadCredentials("invalid credentials".to_string()))?;
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .map_err(|_| EngineError::BadCredentials("invalid credentials".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_the_password() {
        let hashed = hash("hunter2").unwrap();
        assert!(hashed.starts_with("$argon2"));
        assert!(verify("hunter2", &hashed).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hashed = hash("hunter2").unwrap();
        assert_eq!(
            verify("hunter3", &hashed),
            Err(EngineError::BadCredentials("invalid credentials".to_string()))
        );
    }

    #[test]
    fn hashing_is_salted() {
        assert_ne!(hash("hunter2").unwrap(), hash("hunter2").unwrap());
    }
}

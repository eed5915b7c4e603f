use argon2::{
    Argon2,
    password_hash::{PasswordHasher as Argon2Hasher, SaltString, rand_core::OsRng},
};

use crate::domain::{
    error::DomainError,
    models::credential::HashedPassword,
    services::password_service::PasswordHasher,
};

#[derive(Clone)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        let salt = SaltString::generate(OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| DomainError::PasswordHashing(e.to_string()))?
            .to_string();

        Ok(HashedPassword::new(hash))
    }
}

#[cfg(test)]
mod tests {
    use argon2::{PasswordHash, PasswordVerifier};

    use super::*;

    #[test]
    fn test_hash_is_verifiable_phc_string() {
        let hasher = Argon2PasswordHasher::new();
        let hashed = hasher.hash("Str0ngP@ss").unwrap();

        assert_ne!(hashed.as_str(), "Str0ngP@ss");
        assert!(hashed.as_str().starts_with("$argon2"));

        let parsed = PasswordHash::new(hashed.as_str()).unwrap();
        assert!(Argon2::default().verify_password(b"Str0ngP@ss", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"wrong-password1", &parsed).is_err());
    }

    #[test]
    fn test_hash_uses_fresh_salt() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash("Str0ngP@ss").unwrap();
        let second = hasher.hash("Str0ngP@ss").unwrap();

        assert_ne!(first, second);
    }
}

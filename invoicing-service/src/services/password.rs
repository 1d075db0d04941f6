use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use billing_core::AppError;

/// Hash a password using Argon2id with a freshly generated salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(hash)
}

/// Verify a password against a stored hash using constant-time comparison.
/// Malformed hashes fail verification instead of erroring.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password("emb2025").expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("emb2025", &hash));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("emb2025").expect("hash");
        assert!(!verify_password("emb2026", &hash));
    }

    #[test]
    fn malformed_hash_is_rejected() {
        assert!(!verify_password("emb2025", "plaintext-left-over"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let h1 = hash_password("emb2025").expect("hash");
        let h2 = hash_password("emb2025").expect("hash");
        assert_ne!(h1, h2);
    }
}

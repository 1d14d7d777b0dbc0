//! Salted password hashing
//!
//! Hashes are Argon2 PHC strings computed with the account's own salt, so the
//! stored salt and the salt embedded in the hash must agree.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Fresh random salt (B64, no padding)
pub fn generate_salt() -> String {
    SaltString::generate(&mut OsRng).as_str().to_owned()
}

/// Hash `password` with `salt` using Argon2 default parameters
pub fn hash(password: &str, salt: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::from_b64(salt)?;
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `password` against a stored hash (constant-time compare)
pub fn verify(password: &str, salt: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    if parsed.salt.map(|s| s.as_str()) != Some(salt) {
        return false;
    }
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

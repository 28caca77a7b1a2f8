use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns an error when the hasher rejects its input.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))
}

/// Check a candidate password against a stored hash.
///
/// A mismatch is `Ok(false)`, not an error.
///
/// # Errors
///
/// Returns an error when the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Malformed password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Password length rules: 6 to 128 characters.
///
/// # Errors
///
/// Returns the message to surface to the client when the rule fails.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters.".to_string());
    }
    if password.len() > 128 {
        return Err("Password must be at most 128 characters.".to_string());
    }
    Ok(())
}

/// Shallow email shape check: one `@`, non-empty parts, dotted domain.
///
/// # Errors
///
/// Returns the message to surface to the client when the shape is wrong.
pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err("Email is required.".to_string());
    }
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.ends_with('.') => Ok(()),
        _ => Err("Invalid email format.".to_string()),
    }
}

/// Usernames are 3 to 50 characters, alphanumeric plus underscore.
///
/// # Errors
///
/// Returns the message to surface to the client when the rule fails.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters.".to_string());
    }
    if username.len() > 50 {
        return Err("Username must be at most 50 characters.".to_string());
    }
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err("Username may only contain letters, numbers, and underscores.".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("Admin8*").unwrap_or_default();
        assert!(verify_password("Admin8*", &hash).unwrap_or(false));
        assert!(!verify_password("wrong", &hash).unwrap_or(true));
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("steve").is_ok());
        assert!(validate_username("st").is_err());
        assert!(validate_username("bad name!").is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("steve@stevebrownlee.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("steve@domain.").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("Admin8*").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }
}

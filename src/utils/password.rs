use crate::error::{AppError, AppResult};
use bcrypt::{DEFAULT_COST, hash, verify};

/// 密码长度 6-30
pub fn validate_password(password: &str) -> AppResult<()> {
    let len = password.chars().count();
    if !(6..=30).contains(&len) {
        return Err(AppError::ValidationError(
            "Password must be between 6 and 30 characters".to_string(),
        ));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    Ok(hash(password, DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    Ok(verify(password, hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("a".repeat(30).as_str()).is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("a".repeat(31).as_str()).is_err());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "Password123";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("WrongPassword", &hashed).unwrap());
    }
}

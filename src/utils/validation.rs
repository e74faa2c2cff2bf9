use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // 常量表达式
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
    })
}

pub fn validate_username(username: &str) -> AppResult<()> {
    let len = username.chars().count();
    if !(3..=20).contains(&len) {
        return Err(AppError::ValidationError(
            "Username must be between 3 and 20 characters".to_string(),
        ));
    }
    if username.contains('@') {
        return Err(AppError::ValidationError(
            "Username must not contain '@'".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if !email_regex().is_match(email) {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(())
}

/// 校验文本长度 (按字符计)，超出范围返回 ValidationError
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> AppResult<()> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(AppError::ValidationError(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("a@b").is_err());
        assert!(validate_username(&"x".repeat(21)).is_err());
    }

    #[test]
    fn emails() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice@localhost").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn lengths_count_characters() {
        assert!(validate_length("title", "盲盒", 2, 100).is_ok());
        assert!(validate_length("title", " a ", 2, 100).is_err());
    }
}

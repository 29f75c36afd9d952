use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
    })
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9 ()\-]{7,20}$").expect("phone regex is valid"))
}

/// 校验姓名: 非空, 不超过100字符
pub fn validate_full_name(full_name: &str) -> AppResult<()> {
    let trimmed = full_name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 100 {
        return Err(AppError::ValidationError(
            "Full name must be 1-100 characters".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if email.len() > 100 || !email_regex().is_match(email) {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(())
}

/// 校验手机号: 7-20位, 允许数字、空格、+ - ( )
pub fn validate_phone(phone: &str) -> AppResult<()> {
    if !phone_regex().is_match(phone) {
        return Err(AppError::ValidationError("Invalid phone number".to_string()));
    }
    Ok(())
}

pub fn validate_prize_name(prize_name: &str) -> AppResult<()> {
    let trimmed = prize_name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 100 {
        return Err(AppError::ValidationError(
            "Prize name must be 1-100 characters".to_string(),
        ));
    }
    Ok(())
}

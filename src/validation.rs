//! Client-side checks run before a message is posted.

use crate::types::FormState;
use once_cell::sync::Lazy;
use regex::Regex;

// U+FEFF counts as whitespace for browser input, unlike Rust's `\s`
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@\x{FEFF}]+@[^\s@\x{FEFF}]+\.[^\s@\x{FEFF}]+$")
        .expect("email regex pattern is valid")
});

/// Validation failures. The display text is what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("请输入用户名")]
    UsernameRequired,

    #[error("请输入邮箱")]
    EmailRequired,

    #[error("请输入留言内容")]
    ContentRequired,

    #[error("请输入有效的邮箱地址")]
    EmailInvalid,
}

/// Trim surrounding whitespace, including a stray byte order mark.
pub fn trim_input(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Check the form in display order; the first problem found is returned.
///
/// Presence checks look at trimmed values, but the email pattern is matched
/// against the raw field, so surrounding whitespace fails it.
pub fn validate_form(form: &FormState) -> Result<(), ValidationError> {
    if trim_input(&form.username).is_empty() {
        return Err(ValidationError::UsernameRequired);
    }
    if trim_input(&form.email).is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if trim_input(&form.content).is_empty() {
        return Err(ValidationError::ContentRequired);
    }
    if !is_valid_email(&form.email) {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

/// Loose `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

//! Client-side form checks run before any request leaves the client.

use crate::error::ValidationError;
use regex::Regex;

/// Characters accepted in a password.
const PASSWORD_SPECIALS: &str = "@$!%*?&";

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^\S+@\S+\.\S+$").map_or(false, |re| re.is_match(email))
}

pub fn valid_mobile(mobile: &str) -> bool {
    Regex::new(r"^[0-9]{10}$").map_or(false, |re| re.is_match(mobile))
}

/// 8-12 characters with at least one lowercase, uppercase, digit and special
/// character, and nothing outside that alphabet.
pub fn valid_password(password: &str) -> bool {
    let Ok(shape) = Regex::new(r"^[A-Za-z0-9@$!%*?&]{8,12}$") else {
        return false;
    };

    shape.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// # Errors
/// Returns `ValidationError::Email` for malformed addresses.
pub fn email(email: &str) -> Result<(), ValidationError> {
    if valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::Email)
    }
}

/// # Errors
/// Returns the first failing rule: password shape, then confirmation.
pub fn new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if !valid_password(password) {
        return Err(ValidationError::Password);
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Signup rules in the order the form reports them.
///
/// # Errors
/// Returns the first failing rule.
pub fn signup(
    mobile: &str,
    email_address: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if !valid_mobile(mobile) {
        return Err(ValidationError::Mobile);
    }
    email(email_address)?;
    new_password(password, confirmation)
}

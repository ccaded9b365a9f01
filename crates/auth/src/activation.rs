//! Client-side password rules checked before an account activation is submitted.

use serde::Serialize;

pub const MIN_PASSWORD_LEN: usize = 8;

/// A password rule that the candidate failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
    ConfirmationMatches,
}

impl PasswordRule {
    /// Inline form message for the rule.
    pub fn message(&self) -> &'static str {
        match self {
            PasswordRule::MinLength => "Password must be at least 8 characters long",
            PasswordRule::Uppercase => "Password must contain an uppercase letter",
            PasswordRule::Lowercase => "Password must contain a lowercase letter",
            PasswordRule::Digit => "Password must contain a number",
            PasswordRule::Symbol => "Password must contain a special character",
            PasswordRule::ConfirmationMatches => "Passwords do not match",
        }
    }
}

/// Check a new password and its confirmation.
///
/// Returns every violated rule (in a stable order) so the form can show them
/// all at once.
pub fn validate_activation(password: &str, confirmation: &str) -> Result<(), Vec<PasswordRule>> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LEN {
        violations.push(PasswordRule::MinLength);
    }
    if !password.chars().any(char::is_uppercase) {
        violations.push(PasswordRule::Uppercase);
    }
    if !password.chars().any(char::is_lowercase) {
        violations.push(PasswordRule::Lowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PasswordRule::Digit);
    }
    if !password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        violations.push(PasswordRule::Symbol);
    }
    if password != confirmation {
        violations.push(PasswordRule::ConfirmationMatches);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

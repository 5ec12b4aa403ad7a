//! Password policy enforcement for new passwords.

use qap_core::config::AuthConfig;

use crate::error::PasswordRule;

/// Validates password strength against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length, in characters.
    min_length: usize,
    /// Characters that count as symbols.
    symbols: String,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            symbols: config.password_symbols.clone(),
        }
    }

    /// Validates a password against every rule.
    ///
    /// Returns all unmet rules, not just the first.
    pub fn validate(&self, password: &str) -> Result<(), Vec<PasswordRule>> {
        let mut unmet = Vec::new();

        if password.chars().count() < self.min_length {
            unmet.push(PasswordRule::MinLength {
                min: self.min_length,
            });
        }
        if !password.chars().any(char::is_uppercase) {
            unmet.push(PasswordRule::Uppercase);
        }
        if !password.chars().any(char::is_lowercase) {
            unmet.push(PasswordRule::Lowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            unmet.push(PasswordRule::Digit);
        }
        if !password.chars().any(|c| self.symbols.contains(c)) {
            unmet.push(PasswordRule::Symbol);
        }

        if unmet.is_empty() { Ok(()) } else { Err(unmet) }
    }
}

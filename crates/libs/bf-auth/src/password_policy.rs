//! Minimum-strength rules for candidate passwords.
//!
//! Every threshold is a minimum count and can be tuned on its own; a
//! threshold of `0` disables that rule.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Password strength requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordPolicy {
    /// Minimum number of characters.
    pub min_length: usize,
    /// Minimum number of lowercase letters.
    pub min_lowercase: usize,
    /// Minimum number of uppercase letters.
    pub min_uppercase: usize,
    /// Minimum number of digits.
    pub min_digits: usize,
    /// Minimum number of symbols (anything that is not a letter or digit).
    pub min_symbols: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_lowercase: 1,
            min_uppercase: 1,
            min_digits: 1,
            min_symbols: 1,
        }
    }
}

/// A single requirement a candidate password failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    Length(usize),
    Lowercase(usize),
    Uppercase(usize),
    Digits(usize),
    Symbols(usize),
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordRule::Length(n) => write!(f, "at least {n} characters"),
            PasswordRule::Lowercase(n) => write!(f, "at least {n} lowercase letter(s)"),
            PasswordRule::Uppercase(n) => write!(f, "at least {n} uppercase letter(s)"),
            PasswordRule::Digits(n) => write!(f, "at least {n} number(s)"),
            PasswordRule::Symbols(n) => write!(f, "at least {n} symbol(s)"),
        }
    }
}

/// Rejection of a candidate password, listing every unmet rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeakPassword {
    pub unmet: Vec<PasswordRule>,
}

impl fmt::Display for WeakPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password must contain ")?;
        for (i, rule) in self.unmet.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

impl std::error::Error for WeakPassword {}

#[derive(Default)]
struct CharClasses {
    length: usize,
    lowercase: usize,
    uppercase: usize,
    digits: usize,
    symbols: usize,
}

impl CharClasses {
    fn count(candidate: &str) -> Self {
        candidate.chars().fold(Self::default(), |mut acc, c| {
            acc.length += 1;
            if c.is_lowercase() {
                acc.lowercase += 1;
            } else if c.is_uppercase() {
                acc.uppercase += 1;
            } else if c.is_numeric() {
                acc.digits += 1;
            } else if !c.is_alphanumeric() {
                acc.symbols += 1;
            }
            acc
        })
    }
}

impl PasswordPolicy {
    /// Checks `candidate` against every rule of the policy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bf_auth::password_policy::PasswordPolicy;
    ///
    /// let policy = PasswordPolicy::default();
    /// assert!(policy.validate("password").is_err());
    /// assert!(policy.validate("Str0ng!Pass").is_ok());
    /// ```
    pub fn validate(&self, candidate: &str) -> Result<(), WeakPassword> {
        let counts = CharClasses::count(candidate);
        let checks = [
            (counts.length, self.min_length, PasswordRule::Length(self.min_length)),
            (counts.lowercase, self.min_lowercase, PasswordRule::Lowercase(self.min_lowercase)),
            (counts.uppercase, self.min_uppercase, PasswordRule::Uppercase(self.min_uppercase)),
            (counts.digits, self.min_digits, PasswordRule::Digits(self.min_digits)),
            (counts.symbols, self.min_symbols, PasswordRule::Symbols(self.min_symbols)),
        ];

        let unmet: Vec<PasswordRule> = checks
            .into_iter()
            .filter(|(found, required, _)| found < required)
            .map(|(_, _, rule)| rule)
            .collect();

        if unmet.is_empty() {
            Ok(())
        } else {
            Err(WeakPassword { unmet })
        }
    }
}

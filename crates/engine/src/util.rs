//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every write path reports problems the same way: all issues of
//! a request are collected and returned together as
//! [`EngineError::Validation`].

use crate::{EngineError, Money, ResultEngine};

pub(crate) const MAX_NAME_LEN: usize = 100;
pub(crate) const MAX_DESCRIPTION_LEN: usize = 500;

/// Collects validation messages for a single request.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    messages: Vec<String>,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn check(&mut self, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.messages.push(message.into());
        }
        self
    }

    /// Trims `value` and requires it to be non-empty and not too long.
    pub(crate) fn required_name(&mut self, value: &str, label: &str) -> String {
        let trimmed = value.trim();
        self.check(!trimmed.is_empty(), format!("{label} name is required"));
        self.check(
            trimmed.chars().count() <= MAX_NAME_LEN,
            format!("{label} name must be at most {MAX_NAME_LEN} characters"),
        );
        trimmed.to_string()
    }

    pub(crate) fn positive_amount(&mut self, amount: Money) -> &mut Self {
        self.check(amount.is_positive(), "amount must be greater than 0")
    }

    pub(crate) fn finish(&mut self) -> ResultEngine<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        Err(EngineError::Validation(std::mem::take(&mut self.messages)))
    }
}

/// Trims optional free text; blank input becomes `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// `#RRGGBB`
pub(crate) fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Loose `local@domain.tld` check; delivery is not our concern.
pub(crate) fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failed_check() {
        let mut v = Validator::new();
        let name = v.required_name("   ", "wallet");
        v.positive_amount(Money::new(0));
        assert_eq!(name, "");
        assert_eq!(
            v.finish(),
            Err(EngineError::Validation(vec![
                "wallet name is required".to_string(),
                "amount must be greater than 0".to_string(),
            ]))
        );
    }

    #[test]
    fn passes_when_nothing_failed() {
        let mut v = Validator::new();
        assert_eq!(v.required_name(" Cash ", "wallet"), "Cash");
        v.positive_amount(Money::new(1));
        assert!(v.finish().is_ok());
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#FF5733"));
        assert!(is_hex_color("#00aa00"));
        assert!(!is_hex_color("FF5733"));
        assert!(!is_hex_color("#FFF"));
        assert!(!is_hex_color("#GG0000"));
    }

    #[test]
    fn emails() {
        assert!(looks_like_email("alice@example.com"));
        assert!(!looks_like_email("alice@example"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("alice@@example.com"));
        assert!(!looks_like_email("alice.example.com"));
    }

    #[test]
    fn optional_text_is_trimmed() {
        assert_eq!(normalize_optional_text(Some("  lunch ")), Some("lunch".to_string()));
        assert_eq!(normalize_optional_text(Some("   ")), None);
        assert_eq!(normalize_optional_text(None), None);
    }
}

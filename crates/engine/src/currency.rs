use crate::EngineError;

/// ISO-like currency code attached to a wallet.
///
/// The engine does not convert between currencies: every amount recorded on a
/// wallet is in that wallet's currency. The code is stored upper-cased and is
/// always three ASCII letters.
///
/// ```rust
/// use engine::Currency;
///
/// let currency = Currency::try_from(" eur ").unwrap();
/// assert_eq!(currency.code(), "EUR");
/// assert_eq!(Currency::default().code(), "USD");
/// assert!(Currency::try_from("EURO").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self("USD".to_string())
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::InvalidCurrency(format!(
                "currency must be 3 letters, got '{code}'"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Currency {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_codes_that_are_not_three_letters() {
        assert!(Currency::try_from("").is_err());
        assert!(Currency::try_from("US").is_err());
        assert!(Currency::try_from("U5D").is_err());
        assert!(Currency::try_from("€").is_err());
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(Currency::try_from("gbp").unwrap().code(), "GBP");
        assert_eq!(Currency::try_from(" Jpy\n").unwrap().to_string(), "JPY");
    }
}

//! Monetary budget attached to a task.

use super::{ParseCurrencyError, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported budget currencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// US dollar.
    #[default]
    #[serde(rename = "USD")]
    Usd,
    /// Euro.
    #[serde(rename = "EUR")]
    Eur,
    /// Russian rouble.
    #[serde(rename = "RUB")]
    Rub,
}

impl Currency {
    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Rub => "RUB",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Currency {
    type Error = ParseCurrencyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "RUB" => Ok(Self::Rub),
            _ => Err(ParseCurrencyError(value.to_owned())),
        }
    }
}

/// Non-negative amount in minor units (cents) with its currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Budget {
    minor_units: u64,
    currency: Currency,
}

impl Budget {
    /// Largest amount representable in the `BIGINT` storage column.
    const MAX_MINOR_UNITS: u64 = i64::MAX as u64;

    /// Creates a budget from minor units.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidBudget`] when the amount does not fit
    /// the storage column.
    pub fn from_minor_units(minor_units: u64, currency: Currency) -> Result<Self, TaskDomainError> {
        if minor_units > Self::MAX_MINOR_UNITS {
            return Err(TaskDomainError::InvalidBudget(minor_units.to_string()));
        }
        Ok(Self {
            minor_units,
            currency,
        })
    }

    /// A zero budget in `currency`.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            minor_units: 0,
            currency,
        }
    }

    /// Parses a decimal amount such as `1500`, `1500.5` or `1500.50`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidBudget`] for negative, malformed or
    /// over-precise amounts.
    pub fn parse(amount: &str, currency: Currency) -> Result<Self, TaskDomainError> {
        let invalid = || TaskDomainError::InvalidBudget(amount.to_owned());
        let trimmed = amount.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        let digits_only = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
        if whole.is_empty()
            || !digits_only(whole)
            || !digits_only(fraction)
            || fraction.len() > 2
            || trimmed.ends_with('.')
        {
            return Err(invalid());
        }

        let whole_units: u64 = whole.parse().map_err(|_| invalid())?;
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };
        let minor_units = whole_units
            .checked_mul(100)
            .and_then(|units| units.checked_add(cents))
            .ok_or_else(invalid)?;
        Self::from_minor_units(minor_units, currency).map_err(|_| invalid())
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> u64 {
        self.minor_units
    }

    /// Returns the currency.
    #[must_use]
    pub const fn currency(self) -> Currency {
        self.currency
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.minor_units.div_euclid(100),
            self.minor_units.rem_euclid(100),
            self.currency
        )
    }
}

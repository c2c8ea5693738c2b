use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use thiserror::Error;

/// Signed money amount represented as **integer cents**.
///
/// Every ledger value (expense and income amounts, limits, balances) goes
/// through this type so aggregated totals never drift.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
/// Why a value is not a valid amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount")]
    Invalid,
    #[error("too many decimals")]
    TooManyDecimals,
    #[error("amount too large")]
    Overflow,
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("amount must not exceed {}", Money::MAX_AMOUNT)]
    TooLarge,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest amount accepted for a single expense, income or limit.
    pub const MAX_AMOUNT: Money = Money(1_000_000_000_00);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Clamps negative values to zero, used for "remaining" figures.
    #[must_use]
    pub const fn floor_zero(self) -> Self {
        if self.0 < 0 { Self::ZERO } else { self }
    }

    /// Parses user input as a ledger amount in `(0, MAX_AMOUNT]`.
    pub fn parse_amount(s: &str) -> Result<Self, MoneyError> {
        let amount: Money = s.parse()?;
        amount.validate_amount()?;
        Ok(amount)
    }

    /// Checks that the value is a storable ledger amount.
    pub fn validate_amount(self) -> Result<(), MoneyError> {
        if self.0 <= 0 {
            return Err(MoneyError::NotPositive);
        }
        if self > Self::MAX_AMOUNT {
            return Err(MoneyError::TooLarge);
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// At most 2 fractional digits are allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::Empty);
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(MoneyError::Empty);
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or(MoneyError::Invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(MoneyError::Invalid);
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(MoneyError::Invalid);
        }

        let units: i64 = units_str.parse().map_err(|_| MoneyError::Overflow)?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(MoneyError::Invalid);
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| MoneyError::Invalid)? * 10,
                    2 => frac.parse::<i64>().map_err(|_| MoneyError::Invalid)?,
                    _ => return Err(MoneyError::TooManyDecimals),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(MoneyError::Overflow)?;

        Ok(Money(if negative { -total } else { total }))
    }
}

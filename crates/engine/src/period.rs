//! Compare-date presets and the label describing an aggregation window.

use std::fmt;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};

use crate::EngineError;

/// Presets a user can pick for an account's compare date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    Week,
    Month,
    SixMonths,
    Year,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Self::Day,
        Self::Week,
        Self::Month,
        Self::SixMonths,
        Self::Year,
    ];

    /// Token name; never contains the `_` delimiter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::SixMonths => "SIXMONTH",
            Self::Year => "YEAR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::SixMonths => "Six months",
            Self::Year => "Year",
        }
    }

    /// Start of the window that ends at `now`.
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let shifted = match self {
            Self::Day => now.checked_sub_days(Days::new(1)),
            Self::Week => now.checked_sub_days(Days::new(7)),
            Self::Month => now.checked_sub_months(Months::new(1)),
            Self::SixMonths => now.checked_sub_months(Months::new(6)),
            Self::Year => now.checked_sub_months(Months::new(12)),
        };
        shifted.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl TryFrom<&str> for Period {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == value)
            .ok_or_else(|| EngineError::KeyNotFound(format!("period {value}")))
    }
}

/// Default window for new users and accounts.
pub fn default_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    Period::Month.cutoff(now)
}

/// Human description of the window `[cutoff, now]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowLabel {
    Preset(Period),
    Since(NaiveDate),
}

impl WindowLabel {
    pub fn describe(cutoff: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let from = cutoff.date_naive();
        let to = now.date_naive();
        let days = (to - from).num_days();
        let months = months_between(from, to);

        match (days, months) {
            (1, _) => Self::Preset(Period::Day),
            (7, _) => Self::Preset(Period::Week),
            (_, 1) if from.day() == to.day() || days <= 31 => Self::Preset(Period::Month),
            (_, 6) if from.day() == to.day() => Self::Preset(Period::SixMonths),
            (_, 12) if from.day() == to.day() => Self::Preset(Period::Year),
            _ => Self::Since(from),
        }
    }
}

impl fmt::Display for WindowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset(Period::Day) => f.write_str("for the last day"),
            Self::Preset(Period::Week) => f.write_str("for the last week"),
            Self::Preset(Period::Month) => f.write_str("for the last month"),
            Self::Preset(Period::SixMonths) => f.write_str("for the last six months"),
            Self::Preset(Period::Year) => f.write_str("for the last year"),
            Self::Since(date) => write!(f, "since {}", date.format("%d.%m.%Y")),
        }
    }
}

/// Whole calendar months from `from` to `to`.
fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let mut months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());
    if to.day() < from.day() {
        months -= 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn cutoffs_step_back_from_now() {
        let now = now();
        assert_eq!(
            Period::Day.cutoff(now),
            Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
        );
        assert_eq!(
            Period::Month.cutoff(now),
            Utc.with_ymd_and_hms(2025, 2, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(
            Period::Year.cutoff(now),
            Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn every_preset_is_described_as_itself() {
        let now = now();
        for period in Period::ALL {
            assert_eq!(
                WindowLabel::describe(period.cutoff(now), now),
                WindowLabel::Preset(period)
            );
        }
    }

    #[test]
    fn odd_windows_fall_back_to_since() {
        let now = now();
        let cutoff = Utc.with_ymd_and_hms(2025, 1, 3, 0, 0, 0).unwrap();
        let label = WindowLabel::describe(cutoff, now);
        assert_eq!(label, WindowLabel::Since(cutoff.date_naive()));
        assert_eq!(label.to_string(), "since 03.01.2025");
    }

    #[test]
    fn preset_names_are_token_safe() {
        for period in Period::ALL {
            assert!(!period.as_str().contains('_'));
            assert_eq!(Period::try_from(period.as_str()), Ok(period));
        }
    }
}

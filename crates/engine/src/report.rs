//! Pure aggregation over ledger entries.
//!
//! Nothing here touches the database; the unit of work loads the rows and
//! hands them to these functions.

use std::{collections::BTreeMap, fmt};

use crate::{Category, Money};

/// Income, expense and their difference over one window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Balance {
    pub income: Money,
    pub expense: Money,
}

impl Balance {
    pub fn new(incomes: impl IntoIterator<Item = Money>, expenses: impl IntoIterator<Item = Money>) -> Self {
        Self {
            income: incomes.into_iter().sum(),
            expense: expenses.into_iter().sum(),
        }
    }

    pub fn balance(&self) -> Money {
        self.income - self.expense
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_zero() && self.expense.is_zero()
    }
}

/// A percentage with two decimals, stored as hundredths of a percent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(i64);

impl Percent {
    pub const fn from_hundredths(value: i64) -> Self {
        Self(value)
    }

    /// `part / total × 100`, rounded half-up to two decimals.
    ///
    /// A zero or negative total yields 0%.
    pub fn of(part: Money, total: Money) -> Self {
        let total = i128::from(total.cents());
        if total <= 0 {
            return Self(0);
        }
        let scaled = i128::from(part.cents()) * 10_000;
        let rounded = (2 * scaled + total).div_euclid(2 * total);
        Self(i64::try_from(rounded).unwrap_or(i64::MAX))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryShare<C> {
    /// `None` groups entries whose category is unset or unknown.
    pub category: Option<C>,
    pub amount: Money,
    pub percent: Percent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryReport<C> {
    pub total: Money,
    pub shares: Vec<CategoryShare<C>>,
}

impl<C> CategoryReport<C> {
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

/// Groups `(category, amount)` pairs into per-category totals.
///
/// Shares follow the category's display order, with the unknown bucket last.
pub fn category_report<C: Category>(
    entries: impl IntoIterator<Item = (Option<C>, Money)>,
) -> CategoryReport<C> {
    let mut known: BTreeMap<C, Money> = BTreeMap::new();
    let mut unknown: Option<Money> = None;
    for (category, amount) in entries {
        match category {
            Some(category) => *known.entry(category).or_default() += amount,
            None => *unknown.get_or_insert(Money::ZERO) += amount,
        }
    }

    let total: Money = known.values().copied().chain(unknown).sum();
    let shares = known
        .into_iter()
        .map(|(category, amount)| (Some(category), amount))
        .chain(unknown.map(|amount| (None, amount)))
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            percent: Percent::of(amount, total),
        })
        .collect();

    CategoryReport { total, shares }
}

/// Whether adding `new_amount` on top of `existing` expenses breaks `limit`.
pub fn exceeds_limit(existing: impl IntoIterator<Item = Money>, new_amount: Money, limit: Money) -> bool {
    let total: Money = existing.into_iter().sum::<Money>() + new_amount;
    total > limit
}

/// Snapshot rendered by the limit menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimitStatus {
    pub limit: Money,
    /// Every expense of the account, regardless of window.
    pub spent: Money,
    pub any_exceeded: bool,
}

impl LimitStatus {
    /// `limit − spent`, possibly negative.
    pub fn remaining(&self) -> Money {
        self.limit - self.spent
    }

    /// Remaining amount for display; never below zero.
    pub fn available(&self) -> Money {
        self.remaining().floor_zero()
    }

    pub fn is_over(&self) -> bool {
        self.remaining().is_negative()
    }
}

//! Closed category sets for expenses and incomes.
//!
//! The upper-case name of a member is its stable identifier: it is stored in
//! the database and embedded verbatim in button payloads, so renaming a member
//! breaks existing rows and buttons.

use std::fmt;

use crate::EngineError;

/// Shared behavior of the expense and income category sets.
pub trait Category: Copy + Eq + Ord + fmt::Debug + 'static {
    /// Every member, in display order.
    const ALL: &'static [Self];

    /// Stable storage/token name.
    fn as_str(self) -> &'static str;

    /// Human label shown on buttons and reports.
    fn label(self) -> &'static str;

    /// Looks a member up by its stable name.
    fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

/// Label used when a stored or decoded name is no longer a member.
pub const UNKNOWN_CATEGORY_LABEL: &str = "❔ Unknown";

/// Label for an optional category.
pub fn category_label<C: Category>(category: Option<C>) -> &'static str {
    category.map_or(UNKNOWN_CATEGORY_LABEL, Category::label)
}

macro_rules! categories {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($key:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Category for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = EngineError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                <Self as Category>::parse(value).ok_or_else(|| {
                    EngineError::KeyNotFound(format!(
                        "{} category {value}",
                        stringify!($name)
                    ))
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categories! {
    /// What an expense was spent on.
    ExpenseCategory {
        Entertainment => ("ENTERTAINMENT", "🎉 Entertainment"),
        Food => ("FOOD", "🍔 Food"),
        Housing => ("HOUSING", "🏠 Housing"),
        Transport => ("TRANSPORT", "🚗 Transport"),
        Clothing => ("CLOTHING", "👕 Clothing"),
        Utilities => ("UTILITIES", "💡 Utilities"),
        Medications => ("MEDICATIONS", "💊 Medications"),
        Education => ("EDUCATION", "📚 Education"),
        Insurance => ("INSURANCE", "🛡 Insurance"),
        Other => ("OTHER", "📦 Other"),
    }
}

categories! {
    /// Where an income came from.
    IncomeCategory {
        Salary => ("SALARY", "💼 Salary"),
        Salary2 => ("SALARY2", "💼 Second salary"),
        Freelance => ("FREELANCE", "🧑‍💻 Freelance"),
        Bonuses => ("BONUSES", "🎁 Bonuses"),
        Commission => ("COMMISSION", "🤝 Commission"),
        Investment => ("INVESTMENT", "📈 Investment"),
        Rental => ("RENTAL", "🏘 Rental"),
        Interest => ("INTEREST", "🏦 Interest"),
        SideHustle => ("SIDEHUSTLE", "🛠 Side hustle"),
        Pension => ("PENSION", "👵 Pension"),
        Welfare => ("WELFARE", "🤲 Welfare"),
        Annuities => ("ANNUITIES", "📜 Annuities"),
        Other => ("OTHER", "📦 Other"),
    }
}

/// Decodes a stored category column, logging names that are no longer members.
pub(crate) fn stored_category<C>(value: Option<&str>) -> Option<C>
where
    C: Category,
{
    let name = value?;
    let parsed = C::parse(name);
    if parsed.is_none() {
        tracing::warn!("stored category {name} is not a known member");
    }
    parsed
}

//! Ledger engine.
//!
//! Stores users, accounts, expenses, incomes and limits, and computes the
//! aggregates shown by the bot (balances, category reports, limit status).
//!
//! All access goes through a [`UnitOfWork`]: one database transaction in
//! which entities are loaded, mutated and saved back. Dropping a unit of work
//! without [`UnitOfWork::commit`] rolls everything back.

pub use accounts::Account;
pub use categories::{Category, ExpenseCategory, IncomeCategory, UNKNOWN_CATEGORY_LABEL, category_label};
pub use conversation::{Conversation, PendingAction};
pub use error::EngineError;
pub use expenses::{EMPTY_NOTE, Expense};
pub use incomes::Income;
pub use limits::Limit;
pub use money::{Money, MoneyError};
pub use ops::{Engine, EngineBuilder, UnitOfWork};
pub use period::{Period, WindowLabel, default_cutoff};
pub use report::{Balance, CategoryReport, CategoryShare, LimitStatus, Percent};
pub use users::User;

pub mod accounts;
mod categories;
mod conversation;
mod error;
pub mod expenses;
pub mod incomes;
pub mod limits;
mod money;
mod ops;
mod period;
pub mod report;
pub mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;

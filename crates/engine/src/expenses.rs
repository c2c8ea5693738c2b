//! Expenses recorded on an account.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{Category, ExpenseCategory, Money, categories::stored_category};

/// Note value meaning "no note".
pub const EMPTY_NOTE: &str = "-";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: i64,
    pub account_id: i64,
    pub amount: Money,
    /// `None` until the user picks one, or when the stored name is unknown.
    pub category: Option<ExpenseCategory>,
    pub note: String,
    pub datetime: DateTime<Utc>,
    /// Set at creation when the account total went over its limit.
    pub limit_exceeded: bool,
}

impl Expense {
    pub fn has_note(&self) -> bool {
        self.note != EMPTY_NOTE
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub amount_minor: i64,
    pub category: Option<String>,
    pub note: String,
    pub datetime: DateTimeUtc,
    pub limit_exceeded: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            category: stored_category(model.category.as_deref()),
            id: model.id,
            account_id: model.account_id,
            amount: Money::new(model.amount_minor),
            note: model.note,
            datetime: model.datetime,
            limit_exceeded: model.limit_exceeded,
        }
    }
}

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            account_id: ActiveValue::Set(value.account_id),
            amount_minor: ActiveValue::Set(value.amount.cents()),
            category: ActiveValue::Set(value.category.map(|c| c.as_str().to_string())),
            note: ActiveValue::Set(value.note.clone()),
            datetime: ActiveValue::Set(value.datetime),
            limit_exceeded: ActiveValue::Set(value.limit_exceeded),
        }
    }
}

//! Incomes recorded on an account.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{Category, IncomeCategory, Money, categories::stored_category, expenses::EMPTY_NOTE};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Income {
    pub id: i64,
    pub account_id: i64,
    pub amount: Money,
    pub category: Option<IncomeCategory>,
    pub note: String,
    pub date: NaiveDate,
}

impl Income {
    pub fn has_note(&self) -> bool {
        self.note != EMPTY_NOTE
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub amount_minor: i64,
    pub category: Option<String>,
    pub note: String,
    pub date: Date,
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

impl From<Model> for Income {
    fn from(model: Model) -> Self {
        Self {
            category: stored_category(model.category.as_deref()),
            id: model.id,
            account_id: model.account_id,
            amount: Money::new(model.amount_minor),
            note: model.note,
            date: model.date,
        }
    }
}

impl From<&Income> for ActiveModel {
    fn from(value: &Income) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            account_id: ActiveValue::Set(value.account_id),
            amount_minor: ActiveValue::Set(value.amount.cents()),
            category: ActiveValue::Set(value.category.map(|c| c.as_str().to_string())),
            note: ActiveValue::Set(value.note.clone()),
            date: ActiveValue::Set(value.date),
        }
    }
}

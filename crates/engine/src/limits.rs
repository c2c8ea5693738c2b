//! Spending limit of an account. At most one row per account.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::Money;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limit {
    pub id: i64,
    pub account_id: i64,
    pub amount: Money,
    /// When the limit was last set.
    pub datetime: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "limits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub amount_minor: i64,
    pub datetime: DateTimeUtc,
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

impl From<Model> for Limit {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            account_id: model.account_id,
            amount: Money::new(model.amount_minor),
            datetime: model.datetime,
        }
    }
}

//! Accounts group a user's expenses, incomes and spending limit.

use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};

use crate::User;

/// Longest accepted account name, in characters.
pub const MAX_NAME_LEN: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// Start of the window used by the account view.
    pub compare_date: Option<DateTime<Utc>>,
}

impl Account {
    /// Start of the window the account view aggregates over.
    ///
    /// Accounts without their own compare date use the user's one.
    pub fn window_start(&self, user: &User) -> DateTime<Utc> {
        self.compare_date
            .unwrap_or_else(|| user.compare_date.and_time(NaiveTime::MIN).and_utc())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub compare_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::ChatId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::incomes::Entity")]
    Incomes,
    #[sea_orm(has_one = "super::limits::Entity")]
    Limits,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::incomes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incomes.def()
    }
}

impl Related<super::limits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Limits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            compare_date: model.compare_date,
        }
    }
}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            name: ActiveValue::Set(value.name.clone()),
            compare_date: ActiveValue::Set(value.compare_date),
        }
    }
}

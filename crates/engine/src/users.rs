//! Users table.
//!
//! A user is identified by the chat it talks from. Besides identity the row
//! carries the conversation state, so reading and writing it happens inside
//! the same unit of work as the ledger change it accompanies.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{Conversation, PendingAction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub chat_id: i64,
    pub conversation: Conversation,
    /// Fallback window start for accounts without their own compare date.
    pub compare_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub chat_id: i64,
    pub pending_action: String,
    pub current_account_id: Option<i64>,
    pub current_expense_id: Option<i64>,
    pub current_income_id: Option<i64>,
    pub compare_date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        let pending = PendingAction::try_from(model.pending_action.as_str()).unwrap_or_else(|_| {
            tracing::warn!(
                "chat {}: unknown pending action {}, resetting",
                model.chat_id,
                model.pending_action
            );
            PendingAction::default()
        });
        Self {
            chat_id: model.chat_id,
            conversation: Conversation {
                pending,
                account_id: model.current_account_id,
                expense_id: model.current_expense_id,
                income_id: model.current_income_id,
            },
            compare_date: model.compare_date,
            created_at: model.created_at,
        }
    }
}

impl From<&User> for ActiveModel {
    fn from(value: &User) -> Self {
        Self {
            chat_id: ActiveValue::Set(value.chat_id),
            pending_action: ActiveValue::Set(value.conversation.pending.as_str().to_string()),
            current_account_id: ActiveValue::Set(value.conversation.account_id),
            current_expense_id: ActiveValue::Set(value.conversation.expense_id),
            current_income_id: ActiveValue::Set(value.conversation.income_id),
            compare_date: ActiveValue::Set(value.compare_date),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

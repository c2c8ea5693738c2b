use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, prelude::*, sea_query::OnConflict};

use crate::{Conversation, EngineError, ResultEngine, User, period::default_cutoff, users};

use super::UnitOfWork;

impl UnitOfWork {
    /// Return the user talking from `chat_id`, if any.
    pub async fn user(&self, chat_id: i64) -> ResultEngine<Option<User>> {
        let model = users::Entity::find_by_id(chat_id).one(&self.tx).await?;
        Ok(model.map(User::from))
    }

    /// Create the user for `chat_id` with an idle conversation and a one month
    /// compare window.
    ///
    /// Creating a user that already exists is a no-op returning the stored row,
    /// so two racing first events still leave exactly one user.
    pub async fn create_user(&self, chat_id: i64, now: DateTime<Utc>) -> ResultEngine<User> {
        let user = User {
            chat_id,
            conversation: Conversation::default(),
            compare_date: default_cutoff(now).date_naive(),
            created_at: now,
        };
        let model: users::ActiveModel = (&user).into();
        let inserted = users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::ChatId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.tx)
            .await?;
        if inserted > 0 {
            tracing::info!("chat {chat_id}: new user");
        }

        self.user(chat_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("user {chat_id}")))
    }

    /// Return the user for `chat_id`, creating it on first contact.
    pub async fn ensure_user(&self, chat_id: i64, now: DateTime<Utc>) -> ResultEngine<User> {
        match self.user(chat_id).await? {
            Some(user) => Ok(user),
            None => self.create_user(chat_id, now).await,
        }
    }

    /// Persist the conversation state of `chat_id`.
    pub async fn update_conversation(
        &self,
        chat_id: i64,
        conversation: &Conversation,
    ) -> ResultEngine<()> {
        let model = users::ActiveModel {
            chat_id: ActiveValue::Unchanged(chat_id),
            pending_action: ActiveValue::Set(conversation.pending.as_str().to_string()),
            current_account_id: ActiveValue::Set(conversation.account_id),
            current_expense_id: ActiveValue::Set(conversation.expense_id),
            current_income_id: ActiveValue::Set(conversation.income_id),
            ..Default::default()
        };
        let result = users::Entity::update_many()
            .set(model)
            .filter(users::Column::ChatId.eq(chat_id))
            .exec(&self.tx)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("user {chat_id}")));
        }
        tracing::debug!(
            "chat {chat_id}: conversation -> {}",
            conversation.pending.as_str()
        );
        Ok(())
    }
}

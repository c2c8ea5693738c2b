use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Account, EngineError, ResultEngine, accounts, expenses, incomes, limits,
    period::default_cutoff, util::normalize_account_name,
};

use super::UnitOfWork;

impl UnitOfWork {
    /// Return every account of the user, oldest first.
    pub async fn accounts(&self, chat_id: i64) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(chat_id))
            .order_by_asc(accounts::Column::Id)
            .all(&self.tx)
            .await?;
        Ok(models.into_iter().map(Account::from).collect())
    }

    /// Return the account `account_id` if it belongs to the user.
    pub async fn account(&self, chat_id: i64, account_id: i64) -> ResultEngine<Option<Account>> {
        let model = accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::UserId.eq(chat_id))
            .one(&self.tx)
            .await?;
        Ok(model.map(Account::from))
    }

    /// Look an account up by name, ignoring case.
    pub async fn account_by_name(&self, chat_id: i64, name: &str) -> ResultEngine<Option<Account>> {
        let wanted = name.to_lowercase();
        Ok(self
            .accounts(chat_id)
            .await?
            .into_iter()
            .find(|account| account.name.to_lowercase() == wanted))
    }

    /// Create an account with the default one month compare window.
    ///
    /// Names are unique per user (case-insensitive).
    pub async fn create_account(
        &self,
        chat_id: i64,
        name: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Account> {
        let name = normalize_account_name(name)?;
        if self.account_by_name(chat_id, &name).await?.is_some() {
            return Err(EngineError::ExistingKey(name));
        }

        let model = accounts::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(chat_id),
            name: ActiveValue::Set(name),
            compare_date: ActiveValue::Set(Some(default_cutoff(now))),
        }
        .insert(&self.tx)
        .await?;

        tracing::info!("chat {chat_id}: created account {}", model.id);
        Ok(model.into())
    }

    /// Write back a loaded account.
    pub async fn save_account(&self, account: &Account) -> ResultEngine<()> {
        let model: accounts::ActiveModel = account.into();
        model.update(&self.tx).await?;
        Ok(())
    }

    /// Move the start of the account's compare window.
    pub async fn set_compare_date(
        &self,
        chat_id: i64,
        account_id: i64,
        compare_date: DateTime<Utc>,
    ) -> ResultEngine<Option<Account>> {
        let Some(mut account) = self.account(chat_id, account_id).await? else {
            return Ok(None);
        };
        account.compare_date = Some(compare_date);
        self.save_account(&account).await?;
        Ok(Some(account))
    }

    /// Delete an account together with its expenses, incomes and limit.
    ///
    /// Returns the removed account, or `None` when it did not exist.
    pub async fn delete_account(&self, chat_id: i64, account_id: i64) -> ResultEngine<Option<Account>> {
        let Some(account) = self.account(chat_id, account_id).await? else {
            return Ok(None);
        };

        expenses::Entity::delete_many()
            .filter(expenses::Column::AccountId.eq(account.id))
            .exec(&self.tx)
            .await?;
        incomes::Entity::delete_many()
            .filter(incomes::Column::AccountId.eq(account.id))
            .exec(&self.tx)
            .await?;
        limits::Entity::delete_many()
            .filter(limits::Column::AccountId.eq(account.id))
            .exec(&self.tx)
            .await?;
        accounts::Entity::delete_by_id(account.id)
            .exec(&self.tx)
            .await?;

        tracing::info!("chat {chat_id}: deleted account {}", account.id);
        Ok(Some(account))
    }
}

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};

use crate::{Limit, Money, ResultEngine, limits};

use super::UnitOfWork;

impl UnitOfWork {
    /// Return the account limit, if one is set.
    pub async fn limit(&self, account_id: i64) -> ResultEngine<Option<Limit>> {
        let model = limits::Entity::find()
            .filter(limits::Column::AccountId.eq(account_id))
            .order_by_desc(limits::Column::Datetime)
            .one(&self.tx)
            .await?;
        Ok(model.map(Limit::from))
    }

    /// Set the account limit, replacing the amount of an existing one.
    pub async fn save_limit(
        &self,
        account_id: i64,
        amount: Money,
        now: DateTime<Utc>,
    ) -> ResultEngine<Limit> {
        amount.validate_amount()?;

        let model = match self.limit(account_id).await? {
            Some(existing) => {
                limits::ActiveModel {
                    id: ActiveValue::Unchanged(existing.id),
                    account_id: ActiveValue::Unchanged(account_id),
                    amount_minor: ActiveValue::Set(amount.cents()),
                    datetime: ActiveValue::Set(now),
                }
                .update(&self.tx)
                .await?
            }
            None => {
                limits::ActiveModel {
                    id: ActiveValue::NotSet,
                    account_id: ActiveValue::Set(account_id),
                    amount_minor: ActiveValue::Set(amount.cents()),
                    datetime: ActiveValue::Set(now),
                }
                .insert(&self.tx)
                .await?
            }
        };

        tracing::info!("account {account_id}: limit set to {amount}");
        Ok(model.into())
    }

    /// Remove the account limit and clear every limit flag of its expenses.
    ///
    /// Returns `false` when there was no limit; flags are cleared either way.
    pub async fn delete_limit(&self, account_id: i64) -> ResultEngine<bool> {
        self.reset_limit_flags(account_id).await?;
        let result = limits::Entity::delete_many()
            .filter(limits::Column::AccountId.eq(account_id))
            .exec(&self.tx)
            .await?;
        if result.rows_affected > 0 {
            tracing::info!("account {account_id}: limit removed");
        }
        Ok(result.rows_affected > 0)
    }
}

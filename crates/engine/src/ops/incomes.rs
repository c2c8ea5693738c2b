use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Account, EMPTY_NOTE, Income, Money, ResultEngine, accounts, incomes, util::normalize_note,
};

use super::UnitOfWork;

impl UnitOfWork {
    /// Return the income if it sits on one of the user's accounts.
    pub async fn income(&self, chat_id: i64, income_id: i64) -> ResultEngine<Option<Income>> {
        let model = incomes::Entity::find_by_id(income_id)
            .inner_join(accounts::Entity)
            .filter(accounts::Column::UserId.eq(chat_id))
            .one(&self.tx)
            .await?;
        Ok(model.map(Income::from))
    }

    /// Incomes of the account dated on or after `since`.
    pub async fn incomes_since(&self, account_id: i64, since: NaiveDate) -> ResultEngine<Vec<Income>> {
        let models = incomes::Entity::find()
            .filter(incomes::Column::AccountId.eq(account_id))
            .filter(incomes::Column::Date.gte(since))
            .order_by_asc(incomes::Column::Date)
            .order_by_asc(incomes::Column::Id)
            .all(&self.tx)
            .await?;
        Ok(models.into_iter().map(Income::from).collect())
    }

    /// Record a new income without category or note.
    pub async fn record_income(
        &self,
        account: &Account,
        amount: Money,
        date: NaiveDate,
    ) -> ResultEngine<Income> {
        amount.validate_amount()?;
        let model = incomes::ActiveModel {
            id: ActiveValue::NotSet,
            account_id: ActiveValue::Set(account.id),
            amount_minor: ActiveValue::Set(amount.cents()),
            category: ActiveValue::Set(None),
            note: ActiveValue::Set(EMPTY_NOTE.to_string()),
            date: ActiveValue::Set(date),
        }
        .insert(&self.tx)
        .await?;
        Ok(model.into())
    }

    /// Write back a loaded and edited income.
    pub async fn save_income(&self, income: &Income) -> ResultEngine<()> {
        income.amount.validate_amount()?;
        let mut model: incomes::ActiveModel = income.into();
        model.note = ActiveValue::Set(normalize_note(&income.note));
        model.update(&self.tx).await?;
        Ok(())
    }

    /// Delete the income if it belongs to the user.
    pub async fn delete_income(&self, chat_id: i64, income_id: i64) -> ResultEngine<Option<Income>> {
        let Some(income) = self.income(chat_id, income_id).await? else {
            return Ok(None);
        };
        incomes::Entity::delete_by_id(income.id)
            .exec(&self.tx)
            .await?;
        Ok(Some(income))
    }
}

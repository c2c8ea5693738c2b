use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};

use crate::{
    Account, EMPTY_NOTE, Expense, Money, ResultEngine, accounts, expenses, report::exceeds_limit,
    util::normalize_note,
};

use super::UnitOfWork;

impl UnitOfWork {
    /// Return the expense if it sits on one of the user's accounts.
    pub async fn expense(&self, chat_id: i64, expense_id: i64) -> ResultEngine<Option<Expense>> {
        let model = expenses::Entity::find_by_id(expense_id)
            .inner_join(accounts::Entity)
            .filter(accounts::Column::UserId.eq(chat_id))
            .one(&self.tx)
            .await?;
        Ok(model.map(Expense::from))
    }

    /// Every expense of the account, oldest first.
    pub async fn expenses(&self, account_id: i64) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::AccountId.eq(account_id))
            .order_by_asc(expenses::Column::Datetime)
            .order_by_asc(expenses::Column::Id)
            .all(&self.tx)
            .await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }

    /// Expenses of the account recorded at or after `since`.
    pub async fn expenses_since(
        &self,
        account_id: i64,
        since: DateTime<Utc>,
    ) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::AccountId.eq(account_id))
            .filter(expenses::Column::Datetime.gte(since))
            .order_by_asc(expenses::Column::Datetime)
            .order_by_asc(expenses::Column::Id)
            .all(&self.tx)
            .await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }

    /// Expenses flagged as having broken the account limit.
    pub async fn exceeded_expenses(&self, account_id: i64) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::AccountId.eq(account_id))
            .filter(expenses::Column::LimitExceeded.eq(true))
            .order_by_asc(expenses::Column::Datetime)
            .order_by_asc(expenses::Column::Id)
            .all(&self.tx)
            .await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }

    /// Record a new expense without category or note.
    ///
    /// When the account has a limit and the account total including this
    /// expense goes over it, the expense is flagged. The flag is never
    /// recomputed afterwards, except by deleting the limit.
    pub async fn record_expense(
        &self,
        account: &Account,
        amount: Money,
        now: DateTime<Utc>,
    ) -> ResultEngine<Expense> {
        amount.validate_amount()?;

        let limit_exceeded = match self.limit(account.id).await? {
            Some(limit) => {
                let existing = self.expenses(account.id).await?;
                exceeds_limit(existing.iter().map(|e| e.amount), amount, limit.amount)
            }
            None => false,
        };

        let model = expenses::ActiveModel {
            id: ActiveValue::NotSet,
            account_id: ActiveValue::Set(account.id),
            amount_minor: ActiveValue::Set(amount.cents()),
            category: ActiveValue::Set(None),
            note: ActiveValue::Set(EMPTY_NOTE.to_string()),
            datetime: ActiveValue::Set(now),
            limit_exceeded: ActiveValue::Set(limit_exceeded),
        }
        .insert(&self.tx)
        .await?;

        if limit_exceeded {
            tracing::info!("account {}: expense {} went over the limit", account.id, model.id);
        }
        Ok(model.into())
    }

    /// Write back a loaded and edited expense. A blank note is stored as `-`.
    pub async fn save_expense(&self, expense: &Expense) -> ResultEngine<()> {
        expense.amount.validate_amount()?;
        let mut model: expenses::ActiveModel = expense.into();
        model.note = ActiveValue::Set(normalize_note(&expense.note));
        model.update(&self.tx).await?;
        Ok(())
    }

    /// Delete the expense if it belongs to the user.
    pub async fn delete_expense(&self, chat_id: i64, expense_id: i64) -> ResultEngine<Option<Expense>> {
        let Some(expense) = self.expense(chat_id, expense_id).await? else {
            return Ok(None);
        };
        expenses::Entity::delete_by_id(expense.id)
            .exec(&self.tx)
            .await?;
        Ok(Some(expense))
    }

    /// Clear the limit flag on every expense of the account.
    pub async fn reset_limit_flags(&self, account_id: i64) -> ResultEngine<u64> {
        let result = expenses::Entity::update_many()
            .col_expr(expenses::Column::LimitExceeded, Expr::value(false))
            .filter(expenses::Column::AccountId.eq(account_id))
            .exec(&self.tx)
            .await?;
        Ok(result.rows_affected)
    }
}

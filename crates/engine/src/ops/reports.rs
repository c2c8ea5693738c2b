use chrono::{DateTime, Utc};

use crate::{
    Account, Balance, CategoryReport, ExpenseCategory, IncomeCategory, LimitStatus, ResultEngine,
    User, period::default_cutoff, report::category_report,
};

use super::UnitOfWork;

impl UnitOfWork {
    /// Income, expense and balance since the account's compare date.
    ///
    /// Accounts without a compare date use the user's one.
    pub async fn balance(&self, user: &User, account: &Account) -> ResultEngine<Balance> {
        let cutoff = account.window_start(user);
        let incomes = self.incomes_since(account.id, cutoff.date_naive()).await?;
        let expenses = self.expenses_since(account.id, cutoff).await?;
        Ok(Balance::new(
            incomes.iter().map(|i| i.amount),
            expenses.iter().map(|e| e.amount),
        ))
    }

    /// Expenses of the last month grouped by category.
    pub async fn expense_report(
        &self,
        account_id: i64,
        now: DateTime<Utc>,
    ) -> ResultEngine<CategoryReport<ExpenseCategory>> {
        let expenses = self.expenses_since(account_id, default_cutoff(now)).await?;
        Ok(category_report(
            expenses.iter().map(|e| (e.category, e.amount)),
        ))
    }

    /// Incomes of the last month grouped by category.
    pub async fn income_report(
        &self,
        account_id: i64,
        now: DateTime<Utc>,
    ) -> ResultEngine<CategoryReport<IncomeCategory>> {
        let since = default_cutoff(now).date_naive();
        let incomes = self.incomes_since(account_id, since).await?;
        Ok(category_report(incomes.iter().map(|i| (i.category, i.amount))))
    }

    /// Limit figures for the account, or `None` without a limit.
    pub async fn limit_status(&self, account_id: i64) -> ResultEngine<Option<LimitStatus>> {
        let Some(limit) = self.limit(account_id).await? else {
            return Ok(None);
        };
        let expenses = self.expenses(account_id).await?;
        Ok(Some(LimitStatus {
            limit: limit.amount,
            spent: expenses.iter().map(|e| e.amount).sum(),
            any_exceeded: expenses.iter().any(|e| e.limit_exceeded),
        }))
    }
}

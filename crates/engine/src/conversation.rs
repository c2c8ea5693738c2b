//! Per-user conversation state.
//!
//! A [`Conversation`] is an immutable snapshot of what the next free-text
//! message from a user means and which entities it applies to. Transitions
//! build a new value; the dispatcher persists the final one at the end of
//! the event.

/// What the next free-text message is expected to be.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PendingAction {
    /// No input expected; free text opens the account menu.
    #[default]
    Free,
    AccountAdd,
    ExpenseAddAmount,
    ExpenseAddNote,
    ExpenseEditAmount,
    ExpenseEditNote,
    ExpenseAddLimit,
    IncomeAddAmount,
    IncomeAddNote,
    IncomeEditAmount,
    IncomeEditNote,
}

impl PendingAction {
    pub const ALL: [PendingAction; 11] = [
        Self::Free,
        Self::AccountAdd,
        Self::ExpenseAddAmount,
        Self::ExpenseAddNote,
        Self::ExpenseEditAmount,
        Self::ExpenseEditNote,
        Self::ExpenseAddLimit,
        Self::IncomeAddAmount,
        Self::IncomeAddNote,
        Self::IncomeEditAmount,
        Self::IncomeEditNote,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::AccountAdd => "ACCOUNT_ADD",
            Self::ExpenseAddAmount => "EXPENSE_ADD_AMOUNT",
            Self::ExpenseAddNote => "EXPENSE_ADD_NOTE",
            Self::ExpenseEditAmount => "EXPENSE_EDIT_AMOUNT",
            Self::ExpenseEditNote => "EXPENSE_EDIT_NOTE",
            Self::ExpenseAddLimit => "EXPENSE_ADD_LIMIT",
            Self::IncomeAddAmount => "INCOME_ADD_AMOUNT",
            Self::IncomeAddNote => "INCOME_ADD_NOTE",
            Self::IncomeEditAmount => "INCOME_EDIT_AMOUNT",
            Self::IncomeEditNote => "INCOME_EDIT_NOTE",
        }
    }
}

impl TryFrom<&str> for PendingAction {
    type Error = crate::EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| crate::EngineError::KeyNotFound(format!("pending action {value}")))
    }
}

/// Conversation context carried on the user record.
///
/// The ids are hints, not relations: the entities they point at may have been
/// deleted in the meantime, so every reader resolves them again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Conversation {
    pub pending: PendingAction,
    pub account_id: Option<i64>,
    pub expense_id: Option<i64>,
    pub income_id: Option<i64>,
}

impl Conversation {
    /// Drops any pending expectation, keeping the context ids.
    #[must_use]
    pub fn free(self) -> Self {
        self.awaiting(PendingAction::Free)
    }

    #[must_use]
    pub fn awaiting(self, pending: PendingAction) -> Self {
        Self { pending, ..self }
    }

    #[must_use]
    pub fn with_account(self, account_id: Option<i64>) -> Self {
        Self { account_id, ..self }
    }

    #[must_use]
    pub fn with_expense(self, expense_id: Option<i64>) -> Self {
        Self { expense_id, ..self }
    }

    #[must_use]
    pub fn with_income(self, income_id: Option<i64>) -> Self {
        Self { income_id, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_names_round_trip() {
        for action in PendingAction::ALL {
            assert_eq!(PendingAction::try_from(action.as_str()), Ok(action));
        }
        assert!(PendingAction::try_from("EXPENSE_ADD_CATEGORY").is_err());
    }

    #[test]
    fn transitions_do_not_touch_other_fields() {
        let start = Conversation::default()
            .with_account(Some(3))
            .awaiting(PendingAction::ExpenseEditNote)
            .with_expense(Some(9));

        let freed = start.free();
        assert_eq!(freed.pending, PendingAction::Free);
        assert_eq!(freed.account_id, Some(3));
        assert_eq!(freed.expense_id, Some(9));
        assert_eq!(start.pending, PendingAction::ExpenseEditNote);
    }
}

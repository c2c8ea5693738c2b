use std::{collections::HashMap, sync::Arc};

use engine::PendingAction;
use teloxide::types::ChatId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-chat locks serializing the events of one user.
///
/// The outer map lock is only held while looking up the chat's entry, never
/// across store or network I/O, so different chats never wait on each other.
#[derive(Clone, Default)]
pub(crate) struct SessionLocks {
    inner: Arc<Mutex<HashMap<ChatId, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    /// Wait for exclusive access to `chat_id`.
    pub(crate) async fn acquire(&self, chat_id: ChatId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut guard = self.inner.lock().await;
            guard.entry(chat_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Forget the chat's entry once nobody holds or waits for it.
    pub(crate) async fn release(&self, chat_id: ChatId) {
        let mut guard = self.inner.lock().await;
        if let Some(lock) = guard.get(&chat_id)
            && Arc::strong_count(lock) == 1
        {
            guard.remove(&chat_id);
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

/// Which entry a typed amount or note applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Target {
    NewExpense,
    ExistingExpense,
    NewIncome,
    ExistingIncome,
}

/// How the next free-text message is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Expectation {
    /// Nothing pending: any text opens the account menu.
    Menu,
    AccountName,
    Amount(Target),
    Note(Target),
    LimitAmount,
}

impl From<PendingAction> for Expectation {
    fn from(value: PendingAction) -> Self {
        use PendingAction as P;

        match value {
            P::Free => Self::Menu,
            P::AccountAdd => Self::AccountName,
            P::ExpenseAddAmount => Self::Amount(Target::NewExpense),
            P::ExpenseEditAmount => Self::Amount(Target::ExistingExpense),
            P::IncomeAddAmount => Self::Amount(Target::NewIncome),
            P::IncomeEditAmount => Self::Amount(Target::ExistingIncome),
            P::ExpenseAddNote => Self::Note(Target::NewExpense),
            P::ExpenseEditNote => Self::Note(Target::ExistingExpense),
            P::IncomeAddNote => Self::Note(Target::NewIncome),
            P::IncomeEditNote => Self::Note(Target::ExistingIncome),
            P::ExpenseAddLimit => Self::LimitAmount,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_chat_is_serialized() {
        let locks = SessionLocks::default();
        let held = locks.acquire(ChatId(1)).await;

        let blocked =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire(ChatId(1))).await;
        assert!(blocked.is_err());

        drop(held);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire(ChatId(1))).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn different_chats_do_not_block() {
        let locks = SessionLocks::default();
        let _alice = locks.acquire(ChatId(1)).await;
        let bob = tokio::time::timeout(Duration::from_millis(50), locks.acquire(ChatId(2))).await;
        assert!(bob.is_ok());
    }

    #[tokio::test]
    async fn release_keeps_held_entries() {
        let locks = SessionLocks::default();
        let held = locks.acquire(ChatId(1)).await;
        drop(locks.acquire(ChatId(2)).await);

        locks.release(ChatId(1)).await;
        locks.release(ChatId(2)).await;
        assert_eq!(locks.len().await, 1);

        drop(held);
        locks.release(ChatId(1)).await;
        assert_eq!(locks.len().await, 0);
    }

    #[test]
    fn every_waiting_state_expects_input() {
        for action in PendingAction::ALL {
            let expectation = Expectation::from(action);
            assert_eq!(expectation == Expectation::Menu, action == PendingAction::Free);
        }
    }
}

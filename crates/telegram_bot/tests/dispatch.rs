use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, Database, DatabaseConnection};

use engine::{
    Account, Category, Conversation, Engine, Expense, ExpenseCategory, IncomeCategory, Money,
    PendingAction, User, expenses,
};
use migration::MigratorTrait;
use telegram_bot::{Delivery, Directive, DispatchEngine, InboundEvent};

const ALICE: i64 = 1001;
const BOB: i64 = 2002;
const ORIGIN: i32 = 10;

struct Harness {
    db: DatabaseConnection,
    dispatcher: DispatchEngine,
    store: Engine,
}

async fn engine(db: &DatabaseConnection) -> Engine {
    Engine::builder().database(db.clone()).build().await.unwrap()
}

async fn harness() -> Harness {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Harness {
        dispatcher: DispatchEngine::new(Arc::new(engine(&db).await)),
        store: engine(&db).await,
        db,
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
}

impl Harness {
    async fn send(&self, chat_id: i64, text: &str) -> Option<Directive> {
        let event = InboundEvent::from_message(chat_id, text, Some("Ada".to_string()));
        self.dispatcher.dispatch_at(event, now()).await
    }

    async fn press(&self, chat_id: i64, token: &str) -> Option<Directive> {
        let event = InboundEvent::Callback {
            chat_id,
            token: token.to_string(),
            origin_message_id: ORIGIN,
        };
        self.dispatcher.dispatch_at(event, now()).await
    }

    async fn user(&self, chat_id: i64) -> Option<User> {
        let uow = self.store.unit_of_work().await.unwrap();
        let user = uow.user(chat_id).await.unwrap();
        uow.commit().await.unwrap();
        user
    }

    async fn pending(&self, chat_id: i64) -> PendingAction {
        self.user(chat_id).await.unwrap().conversation.pending
    }

    /// A user with one account that is the conversation's current one.
    async fn with_account(&self, chat_id: i64, name: &str) -> Account {
        let uow = self.store.unit_of_work().await.unwrap();
        uow.ensure_user(chat_id, now()).await.unwrap();
        let account = uow.create_account(chat_id, name, now()).await.unwrap();
        uow.update_conversation(chat_id, &Conversation::default().with_account(Some(account.id)))
            .await
            .unwrap();
        uow.commit().await.unwrap();
        account
    }

    /// Insert an expense under a fixed id so tokens can be written literally.
    async fn insert_expense(&self, id: i64, account: &Account, cents: i64, category: &str) {
        expenses::ActiveModel {
            id: ActiveValue::Set(id),
            account_id: ActiveValue::Set(account.id),
            amount_minor: ActiveValue::Set(cents),
            category: ActiveValue::Set(Some(category.to_string())),
            note: ActiveValue::Set("-".to_string()),
            datetime: ActiveValue::Set(now()),
            limit_exceeded: ActiveValue::Set(false),
        }
        .insert(&self.db)
        .await
        .unwrap();
    }

    async fn expense(&self, chat_id: i64, id: i64) -> Option<Expense> {
        let uow = self.store.unit_of_work().await.unwrap();
        let found = uow.expense(chat_id, id).await.unwrap();
        uow.commit().await.unwrap();
        found
    }

    async fn expense_exists(&self, chat_id: i64, id: i64) -> bool {
        self.expense(chat_id, id).await.is_some()
    }

    async fn set_conversation(&self, chat_id: i64, conversation: Conversation) {
        let uow = self.store.unit_of_work().await.unwrap();
        uow.update_conversation(chat_id, &conversation).await.unwrap();
        uow.commit().await.unwrap();
    }
}

fn tokens(directive: &Directive) -> Vec<&str> {
    directive
        .keyboard
        .as_ref()
        .map(|k| k.tokens().collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn first_event_creates_the_user_once() {
    let h = harness().await;
    assert!(h.user(ALICE).await.is_none());

    let directive = h.send(ALICE, "hello").await.unwrap();
    assert_eq!(directive.chat_id, ALICE);
    assert_eq!(directive.delivery, Delivery::Send);
    assert!(directive.text.contains("You have no accounts yet"));
    assert_eq!(tokens(&directive), ["ACCOUNT_ADD"]);

    let user = h.user(ALICE).await.unwrap();
    assert_eq!(user.conversation, Conversation::default());

    h.send(ALICE, "again").await.unwrap();
    assert_eq!(h.user(ALICE).await.unwrap().created_at, user.created_at);
}

#[tokio::test]
async fn start_greets_and_help_explains() {
    let h = harness().await;

    let directive = h.send(ALICE, "/start").await.unwrap();
    assert!(directive.text.starts_with("Hello, Ada!"));
    assert_eq!(tokens(&directive), ["ACCOUNT"]);

    let directive = h.send(ALICE, "/help").await.unwrap();
    assert!(directive.text.contains("How it works"));

    assert_eq!(h.send(ALICE, "/unknown").await, None);
}

#[tokio::test]
async fn callbacks_edit_the_origin_message() {
    let h = harness().await;
    let directive = h.press(ALICE, "ACCOUNT").await.unwrap();
    assert_eq!(
        directive.delivery,
        Delivery::Edit {
            message_id: ORIGIN
        }
    );
}

#[tokio::test]
async fn account_creation_flow() {
    let h = harness().await;

    h.press(ALICE, "ACCOUNT_ADD").await.unwrap();
    assert_eq!(h.pending(ALICE).await, PendingAction::AccountAdd);

    let directive = h.send(ALICE, "  Cash ").await.unwrap();
    assert!(directive.text.contains("Account \"Cash\" saved!"));
    let user = h.user(ALICE).await.unwrap();
    assert_eq!(user.conversation.pending, PendingAction::Free);
    let id = user.conversation.account_id.unwrap();
    assert_eq!(tokens(&directive), [format!("ACCOUNT_GET_{id}").as_str(), "ACCOUNT"]);

    // A duplicate name is rejected and the bot keeps waiting for a name.
    h.press(ALICE, "ACCOUNT_ADD").await.unwrap();
    let directive = h.send(ALICE, "cash").await.unwrap();
    assert!(directive.text.contains("already exists"));
    assert_eq!(h.pending(ALICE).await, PendingAction::AccountAdd);
}

#[tokio::test]
async fn expense_flow_from_amount_to_note() {
    let h = harness().await;
    let account = h.with_account(ALICE, "Cash").await;

    let directive = h.press(ALICE, "EXPENSE_ADD_AMOUNT").await.unwrap();
    assert_eq!(directive.text, "Enter the amount");
    assert_eq!(h.pending(ALICE).await, PendingAction::ExpenseAddAmount);

    // Bad input is reported inline and the state does not move.
    let directive = h.send(ALICE, "abc").await.unwrap();
    assert!(directive.text.contains("Please send a number"));
    assert_eq!(directive.delivery, Delivery::Send);
    assert_eq!(h.pending(ALICE).await, PendingAction::ExpenseAddAmount);

    let directive = h.send(ALICE, "12,50").await.unwrap();
    assert_eq!(
        tokens(&directive).len(),
        ExpenseCategory::ALL.len() + 1,
        "category keyboard plus back"
    );
    let conversation = h.user(ALICE).await.unwrap().conversation;
    assert_eq!(conversation.pending, PendingAction::Free);
    let expense_id = conversation.expense_id.unwrap();

    h.press(ALICE, "EXPENSE_ADD_CATEGORY_FOOD").await.unwrap();
    assert_eq!(h.pending(ALICE).await, PendingAction::ExpenseAddNote);

    let directive = h.send(ALICE, "lunch").await.unwrap();
    assert!(directive.text.starts_with("Your expense has been saved!"));
    assert!(
        tokens(&directive).contains(&format!("EXPENSE_GET_{expense_id}").as_str())
    );

    let uow = h.store.unit_of_work().await.unwrap();
    let expense = uow.expense(ALICE, expense_id).await.unwrap().unwrap();
    uow.commit().await.unwrap();
    assert_eq!(expense.account_id, account.id);
    assert_eq!(expense.amount, Money::new(12_50));
    assert_eq!(expense.category, Some(ExpenseCategory::Food));
    assert_eq!(expense.note, "lunch");
    assert_eq!(expense.datetime, now());

    let conversation = h.user(ALICE).await.unwrap().conversation;
    assert_eq!(conversation.pending, PendingAction::Free);
    assert_eq!(conversation.expense_id, None);
}

#[tokio::test]
async fn a_callback_supersedes_pending_input() {
    let h = harness().await;
    h.with_account(ALICE, "Cash").await;
    h.press(ALICE, "EXPENSE_ADD_AMOUNT").await.unwrap();

    let directive = h.press(ALICE, "EXPENSE").await.unwrap();
    assert!(directive.text.contains("Expenses of \"Cash\""));
    assert_eq!(h.pending(ALICE).await, PendingAction::Free);

    // Text is now a menu request, not an amount.
    let directive = h.send(ALICE, "15").await.unwrap();
    assert!(directive.text.starts_with("Accounts"));
}

#[tokio::test]
async fn delete_confirmation_yes_and_no() {
    let h = harness().await;
    let account = h.with_account(ALICE, "Cash").await;
    h.insert_expense(42, &account, 500, "FOOD").await;

    h.press(ALICE, "EXPENSE_DELETE_42").await.unwrap();
    let directive = h.press(ALICE, "EXPENSE_DELETE_NO_42").await.unwrap();
    assert!(directive.text.starts_with("Expense\n"));
    assert!(tokens(&directive).contains(&"EXPENSE_DELETE_42"));
    assert!(h.expense_exists(ALICE, 42).await);

    let directive = h.press(ALICE, "EXPENSE_DELETE_YES_42").await.unwrap();
    assert!(directive.text.starts_with("The expense has been deleted."));
    assert!(directive.text.contains("Expenses of \"Cash\""));
    assert!(!h.expense_exists(ALICE, 42).await);

    // Pressing the stale button again finds nothing.
    let directive = h.press(ALICE, "EXPENSE_DELETE_YES_42").await.unwrap();
    assert!(directive.text.starts_with("That expense no longer exists."));
}

#[tokio::test]
async fn foreign_entities_are_invisible() {
    let h = harness().await;
    let account = h.with_account(ALICE, "Cash").await;
    h.insert_expense(42, &account, 500, "FOOD").await;
    h.with_account(BOB, "Wallet").await;

    let directive = h.press(BOB, "EXPENSE_DELETE_YES_42").await.unwrap();
    assert!(directive.text.starts_with("That expense no longer exists."));
    assert!(h.expense_exists(ALICE, 42).await);

    let directive = h
        .press(BOB, &format!("ACCOUNT_GET_{}", account.id))
        .await
        .unwrap();
    assert!(directive.text.starts_with("Accounts"));
    assert_ne!(h.user(BOB).await.unwrap().conversation.account_id, Some(account.id));
}

#[tokio::test]
async fn malformed_tokens_fall_back_to_menus() {
    let h = harness().await;

    let directive = h.press(ALICE, "WALLET_GET_1").await.unwrap();
    assert!(directive.text.contains("Welcome"));

    // No current account, so the expense menu degrades to the account menu.
    let directive = h.press(ALICE, "EXPENSE_GET_abc").await.unwrap();
    assert!(directive.text.starts_with("Accounts"));

    h.with_account(ALICE, "Cash").await;
    let directive = h.press(ALICE, "EXPENSE_GET_abc").await.unwrap();
    assert!(directive.text.contains("Expenses of \"Cash\""));
}

#[tokio::test]
async fn limit_flow_flags_and_clears_expenses() {
    let h = harness().await;
    let account = h.with_account(ALICE, "Cash").await;

    h.press(ALICE, &format!("EXPENSE_LIMIT_ADD_{}", account.id))
        .await
        .unwrap();
    assert_eq!(h.pending(ALICE).await, PendingAction::ExpenseAddLimit);

    let directive = h.send(ALICE, "0").await.unwrap();
    assert!(directive.text.contains("greater than zero"));
    assert_eq!(h.pending(ALICE).await, PendingAction::ExpenseAddLimit);

    let directive = h.send(ALICE, "100").await.unwrap();
    assert_eq!(directive.text, "Limit of 100.00 set for \"Cash\".");
    assert_eq!(h.pending(ALICE).await, PendingAction::Free);

    let uow = h.store.unit_of_work().await.unwrap();
    let first = uow.record_expense(&account, Money::new(60_00), now()).await.unwrap();
    let second = uow.record_expense(&account, Money::new(50_00), now()).await.unwrap();
    uow.commit().await.unwrap();
    assert!(!first.limit_exceeded);
    assert!(second.limit_exceeded);

    let directive = h.press(ALICE, "EXPENSE_LIMIT").await.unwrap();
    assert!(directive.text.contains("🔴 Remaining: 0.00"));
    assert!(tokens(&directive).contains(&"EXPENSE_LIMIT_EXCEEDED"));

    let directive = h.press(ALICE, "EXPENSE_LIMIT_EXCEEDED").await.unwrap();
    assert!(tokens(&directive).contains(&format!("EXPENSE_GET_{}", second.id).as_str()));

    let directive = h
        .press(ALICE, &format!("EXPENSE_LIMIT_DELETE_YES_{}", account.id))
        .await
        .unwrap();
    assert_eq!(directive.text, "Limit deleted.");

    let uow = h.store.unit_of_work().await.unwrap();
    assert!(uow.limit(account.id).await.unwrap().is_none());
    assert!(uow.exceeded_expenses(account.id).await.unwrap().is_empty());
    uow.commit().await.unwrap();
}

#[tokio::test]
async fn account_period_moves_the_window() {
    let h = harness().await;
    let account = h.with_account(ALICE, "Cash").await;

    let directive = h
        .press(ALICE, &format!("ACCOUNT_DATETIME_{}", account.id))
        .await
        .unwrap();
    assert_eq!(tokens(&directive).len(), 6);

    let directive = h
        .press(ALICE, &format!("ACCOUNT_DATETIME_WEEK_{}", account.id))
        .await
        .unwrap();
    assert!(directive.text.contains("for the last week"));

    let uow = h.store.unit_of_work().await.unwrap();
    let stored = uow.account(ALICE, account.id).await.unwrap().unwrap();
    uow.commit().await.unwrap();
    assert_eq!(stored.compare_date, Some(now() - chrono::Duration::days(7)));
}

#[tokio::test]
async fn deleting_the_current_account_clears_the_context() {
    let h = harness().await;
    let account = h.with_account(ALICE, "Cash").await;
    h.insert_expense(42, &account, 500, "FOOD").await;
    h.set_conversation(
        ALICE,
        Conversation::default()
            .with_account(Some(account.id))
            .with_expense(Some(42)),
    )
    .await;

    let directive = h
        .press(ALICE, &format!("ACCOUNT_DELETE_YES_{}", account.id))
        .await
        .unwrap();
    assert!(directive.text.starts_with("Account \"Cash\" deleted."));

    let conversation = h.user(ALICE).await.unwrap().conversation;
    assert_eq!(conversation, Conversation::default());
    assert!(!h.expense_exists(ALICE, 42).await);
}

#[tokio::test]
async fn events_of_one_chat_are_serialized() {
    let h = harness().await;
    let account = h.with_account(ALICE, "Cash").await;
    h.press(ALICE, "EXPENSE_ADD_AMOUNT").await.unwrap();

    // Only the first amount is consumed; the second sees a free conversation.
    let (a, b) = tokio::join!(h.send(ALICE, "5"), h.send(ALICE, "7"));
    let texts = [a.unwrap().text, b.unwrap().text];
    assert_eq!(texts.iter().filter(|t| t.as_str() == "Pick a category").count(), 1);

    let uow = h.store.unit_of_work().await.unwrap();
    assert_eq!(uow.expenses(account.id).await.unwrap().len(), 1);
    uow.commit().await.unwrap();
}

#[tokio::test]
async fn income_flow_counts_in_the_balance() {
    let h = harness().await;
    let account = h.with_account(ALICE, "Cash").await;

    h.press(ALICE, "INCOME_ADD_AMOUNT").await.unwrap();
    assert_eq!(h.pending(ALICE).await, PendingAction::IncomeAddAmount);

    let directive = h.send(ALICE, "100").await.unwrap();
    assert_eq!(directive.text, "Pick a category");
    assert!(tokens(&directive).contains(&"INCOME_ADD_CATEGORY_SALARY"));
    let income_id = h.user(ALICE).await.unwrap().conversation.income_id.unwrap();

    h.press(ALICE, "INCOME_ADD_CATEGORY_SALARY").await.unwrap();
    assert_eq!(h.pending(ALICE).await, PendingAction::IncomeAddNote);

    let directive = h.send(ALICE, "june").await.unwrap();
    assert!(directive.text.starts_with("Your income has been saved!"));
    assert!(directive.text.contains("Incomes of \"Cash\""));
    assert!(tokens(&directive).contains(&format!("INCOME_GET_{income_id}").as_str()));
    let conversation = h.user(ALICE).await.unwrap().conversation;
    assert_eq!(conversation.pending, PendingAction::Free);
    assert_eq!(conversation.income_id, None);

    let uow = h.store.unit_of_work().await.unwrap();
    let income = uow.income(ALICE, income_id).await.unwrap().unwrap();
    uow.record_expense(&account, Money::new(60_00), now())
        .await
        .unwrap();
    uow.commit().await.unwrap();
    assert_eq!(income.amount, Money::new(100_00));
    assert_eq!(income.category, Some(IncomeCategory::Salary));
    assert_eq!(income.note, "june");
    assert_eq!(income.date, now().date_naive());

    let directive = h
        .press(ALICE, &format!("ACCOUNT_GET_{}", account.id))
        .await
        .unwrap();
    assert!(directive.text.contains("✨ Incomes: 100.00"));
    assert!(directive.text.contains("💸 Expenses: 60.00"));
    assert!(directive.text.contains("💰 Balance: 40.00"));

    let directive = h
        .press(ALICE, &format!("INCOME_REPORT_{}", account.id))
        .await
        .unwrap();
    assert!(directive.text.contains("Category: 💼 Salary\nAmount: 100.00\nShare: 100.00%"));
    assert!(directive.text.ends_with("Total: 100.00"));

    let directive = h
        .press(ALICE, &format!("INCOME_DELETE_NO_{income_id}"))
        .await
        .unwrap();
    assert!(directive.text.starts_with("Income\n"));
    assert!(directive.text.contains("Note: june"));

    let directive = h
        .press(ALICE, &format!("INCOME_DELETE_YES_{income_id}"))
        .await
        .unwrap();
    assert!(directive.text.starts_with("The income has been deleted."));
    let uow = h.store.unit_of_work().await.unwrap();
    assert!(uow.income(ALICE, income_id).await.unwrap().is_none());
    uow.commit().await.unwrap();
}

#[tokio::test]
async fn expense_edits_go_through_waiting_states() {
    let h = harness().await;
    let account = h.with_account(ALICE, "Cash").await;
    h.insert_expense(42, &account, 500, "FOOD").await;

    h.press(ALICE, "EXPENSE_EDIT_AMOUNT_42").await.unwrap();
    let conversation = h.user(ALICE).await.unwrap().conversation;
    assert_eq!(conversation.pending, PendingAction::ExpenseEditAmount);
    assert_eq!(conversation.expense_id, Some(42));

    let directive = h.send(ALICE, "12.345").await.unwrap();
    assert!(directive.text.starts_with("Use at most two decimals"));
    assert_eq!(tokens(&directive), ["EXPENSE_GET_42"]);
    assert_eq!(h.pending(ALICE).await, PendingAction::ExpenseEditAmount);
    assert_eq!(h.expense(ALICE, 42).await.unwrap().amount, Money::new(500));

    let directive = h.send(ALICE, "7.5").await.unwrap();
    assert!(directive.text.starts_with("Your expense has been saved!"));
    assert_eq!(h.expense(ALICE, 42).await.unwrap().amount, Money::new(750));
    assert_eq!(h.pending(ALICE).await, PendingAction::Free);

    h.press(ALICE, "EXPENSE_EDIT_NOTE_42").await.unwrap();
    assert_eq!(h.pending(ALICE).await, PendingAction::ExpenseEditNote);
    h.send(ALICE, "taxi").await.unwrap();
    assert_eq!(h.expense(ALICE, 42).await.unwrap().note, "taxi");
    assert_eq!(h.pending(ALICE).await, PendingAction::Free);

    let directive = h.press(ALICE, "EXPENSE_EDIT_CATEGORY_42").await.unwrap();
    assert!(directive.text.starts_with("Current category: 🍔 Food"));
    assert!(tokens(&directive).contains(&"EXPENSE_EDIT_CATEGORY_TRANSPORT_42"));

    let directive = h
        .press(ALICE, "EXPENSE_EDIT_CATEGORY_TRANSPORT_42")
        .await
        .unwrap();
    assert!(directive.text.starts_with("Your expense has been saved!"));
    let expense = h.expense(ALICE, 42).await.unwrap();
    assert_eq!(expense.category, Some(ExpenseCategory::Transport));
    assert_eq!(expense.amount, Money::new(750));
    assert_eq!(expense.note, "taxi");
}

#[tokio::test]
async fn unknown_categories_are_reported_not_saved() {
    let h = harness().await;
    h.with_account(ALICE, "Cash").await;
    h.press(ALICE, "EXPENSE_ADD_AMOUNT").await.unwrap();
    h.send(ALICE, "5").await.unwrap();
    let expense_id = h.user(ALICE).await.unwrap().conversation.expense_id.unwrap();

    let directive = h.press(ALICE, "EXPENSE_ADD_CATEGORY_GROCERIES").await.unwrap();
    assert!(directive.text.starts_with("The category \"GROCERIES\" is no longer available."));
    assert!(tokens(&directive).contains(&"EXPENSE_ADD_CATEGORY_FOOD"));
    assert_eq!(h.pending(ALICE).await, PendingAction::Free);
    assert_eq!(h.expense(ALICE, expense_id).await.unwrap().category, None);

    // The entry is still pending its category, so a valid pick goes through.
    h.press(ALICE, "EXPENSE_ADD_CATEGORY_FOOD").await.unwrap();
    assert_eq!(h.pending(ALICE).await, PendingAction::ExpenseAddNote);

    let directive = h
        .press(ALICE, &format!("EXPENSE_EDIT_CATEGORY_GROCERIES_{expense_id}"))
        .await
        .unwrap();
    assert!(directive.text.starts_with("The category \"GROCERIES\" is no longer available."));
    assert_eq!(
        h.expense(ALICE, expense_id).await.unwrap().category,
        Some(ExpenseCategory::Food)
    );
}

#[tokio::test]
async fn input_for_a_deleted_entity_falls_back_to_free() {
    let h = harness().await;
    let account = h.with_account(ALICE, "Cash").await;
    h.insert_expense(42, &account, 500, "FOOD").await;
    h.set_conversation(
        ALICE,
        Conversation::default()
            .with_account(Some(account.id))
            .with_expense(Some(42))
            .awaiting(PendingAction::ExpenseEditNote),
    )
    .await;

    let uow = h.store.unit_of_work().await.unwrap();
    uow.delete_expense(ALICE, 42).await.unwrap();
    uow.commit().await.unwrap();

    let directive = h.send(ALICE, "taxi").await.unwrap();
    assert!(directive.text.starts_with("That expense no longer exists."));
    assert!(directive.text.contains("Expenses of \"Cash\""));
    assert_eq!(h.pending(ALICE).await, PendingAction::Free);

    h.set_conversation(
        ALICE,
        Conversation::default()
            .with_account(Some(account.id))
            .awaiting(PendingAction::ExpenseAddLimit),
    )
    .await;
    let uow = h.store.unit_of_work().await.unwrap();
    uow.delete_account(ALICE, account.id).await.unwrap();
    uow.commit().await.unwrap();

    let directive = h.send(ALICE, "100").await.unwrap();
    assert!(directive.text.starts_with("Accounts"));
    assert_eq!(h.pending(ALICE).await, PendingAction::Free);
    let uow = h.store.unit_of_work().await.unwrap();
    assert!(uow.limit(account.id).await.unwrap().is_none());
    uow.commit().await.unwrap();
}

#[tokio::test]
async fn expense_report_shows_category_shares() {
    let h = harness().await;
    let account = h.with_account(ALICE, "Cash").await;
    h.insert_expense(1, &account, 60_00, "FOOD").await;
    h.insert_expense(2, &account, 40_00, "TRANSPORT").await;

    let directive = h
        .press(ALICE, &format!("EXPENSE_REPORT_{}", account.id))
        .await
        .unwrap();
    assert!(directive.text.starts_with("Expense report for the last month:"));
    assert!(directive.text.contains("Category: 🍔 Food\nAmount: 60.00\nShare: 60.00%"));
    assert!(directive.text.contains("Category: 🚗 Transport\nAmount: 40.00\nShare: 40.00%"));
    assert!(directive.text.ends_with("Total: 100.00"));

    // Someone else's account id reads as missing.
    h.with_account(BOB, "Wallet").await;
    let directive = h
        .press(BOB, &format!("EXPENSE_REPORT_{}", account.id))
        .await
        .unwrap();
    assert!(directive.text.starts_with("Accounts"));
}

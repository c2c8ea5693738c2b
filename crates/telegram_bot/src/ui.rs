//! Message texts and inline keyboards.
//!
//! Everything here is pure: handlers pass in what they loaded and get back a
//! [`Reply`] to wrap into a directive.

use engine::{
    Account, Balance, Category, CategoryReport, Expense, ExpenseCategory, Income, IncomeCategory,
    LimitStatus, Money, Period, WindowLabel, category_label,
};

use crate::routing::{AccountAction, Action, CategoryArg, ExpenseAction, IncomeAction};

/// One inline button: a label and the routing token it sends back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub token: String,
}

impl Button {
    pub fn new(label: impl Into<String>, action: impl Into<Action>) -> Self {
        Self {
            label: label.into(),
            token: action.into().token(),
        }
    }
}

/// Ordered buttons plus the width of each row.
///
/// The row widths always sum to the number of buttons.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Keyboard {
    buttons: Vec<Button>,
    rows: Vec<usize>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row; empty rows are skipped.
    pub fn row(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
        let before = self.buttons.len();
        self.buttons.extend(buttons);
        let width = self.buttons.len() - before;
        if width > 0 {
            self.rows.push(width);
        }
        self
    }

    /// Append buttons laid out `width` per row.
    pub fn grid(mut self, buttons: impl IntoIterator<Item = Button>, width: usize) -> Self {
        let buttons: Vec<Button> = buttons.into_iter().collect();
        for chunk in buttons.chunks(width.max(1)) {
            self = self.row(chunk.iter().cloned());
        }
        self
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn row_widths(&self) -> &[usize] {
        &self.rows
    }

    /// Buttons grouped by row.
    pub fn layout(&self) -> Vec<&[Button]> {
        let mut rest = self.buttons.as_slice();
        let mut rows = Vec::with_capacity(self.rows.len());
        for &width in &self.rows {
            let (row, tail) = rest.split_at(width.min(rest.len()));
            rows.push(row);
            rest = tail;
        }
        rows
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.buttons.iter().map(|b| b.token.as_str())
    }
}

/// Text plus optional keyboard, before it is addressed to a chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Reply {
    pub(crate) text: String,
    pub(crate) keyboard: Option<Keyboard>,
}

impl Reply {
    pub(crate) fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

pub(crate) const FAILURE_TEXT: &str = "Something went wrong, please try again later.";

const BACK: &str = "↩️ Back";
const CANCEL: &str = "✋ Cancel";
const SKIP: &str = "⏩ Skip";
const YES: &str = "✅ Yes";
const NO: &str = "❌ No";

fn single(label: &str, action: impl Into<Action>) -> Keyboard {
    Keyboard::new().row([Button::new(label, action)])
}

fn confirm(yes: impl Into<Action>, no: impl Into<Action>) -> Keyboard {
    Keyboard::new().row([Button::new(YES, yes), Button::new(NO, no)])
}

fn entry_label<C: Category>(category: Option<C>, amount: Money) -> String {
    format!("{} {amount}", category_label(category))
}

fn category_keyboard<C: Category>(action: impl Fn(C) -> Action, back: Action) -> Keyboard {
    Keyboard::new()
        .grid(
            C::ALL.iter().map(|&c| Button::new(c.label(), action(c))),
            2,
        )
        .row([Button::new(BACK, back)])
}

fn report_text<C: Category>(title: &str, report: &CategoryReport<C>) -> String {
    if report.is_empty() {
        return format!("{title}\n\nNothing recorded in the last month.");
    }
    let mut text = format!("{title}\n");
    for share in &report.shares {
        text.push_str(&format!(
            "\nCategory: {}\nAmount: {}\nShare: {}\n",
            category_label(share.category),
            share.amount,
            share.percent
        ));
    }
    text.push_str(&format!("\nTotal: {}", report.total));
    text
}

// Main menu

pub(crate) fn main_menu(display_name: Option<&str>) -> Reply {
    let greeting = match display_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hello, {name}!"),
        None => "Hello!".to_string(),
    };
    Reply::with_keyboard(
        format!(
            "{greeting}\n\nWelcome to your personal finance ledger. Track incomes and expenses \
             per account and keep an eye on your spending limits.\n\nTap \"My accounts\" to start."
        ),
        single("🏛️ My accounts", AccountAction::Menu),
    )
}

pub(crate) fn help() -> Reply {
    Reply::with_keyboard(
        "How it works:\n\n\
         1. Create an account in \"My accounts\".\n\
         2. Open it and add incomes or expenses: type the amount (e.g. 12.50), \
         pick a category and optionally write a note.\n\
         3. Use \"Period\" to choose the window of the balance and \"Limits\" to cap spending.\n\n\
         /start shows the main menu.",
        single("🏛️ My accounts", AccountAction::Menu),
    )
}

// Accounts

pub(crate) fn account_menu(accounts: &[Account]) -> Reply {
    let text = if accounts.is_empty() {
        "Accounts 🏛️\n\nYou have no accounts yet.\n\nTap \"Create account\" to start tracking."
    } else {
        "Accounts 🏛️\n\nPick an account to manage or create a new one."
    };
    let keyboard = Keyboard::new()
        .grid(
            accounts
                .iter()
                .map(|a| Button::new(a.name.clone(), AccountAction::Get(a.id))),
            2,
        )
        .row([Button::new("🌟 Create account", AccountAction::Add)]);
    Reply::with_keyboard(text, keyboard)
}

pub(crate) fn account_name_prompt() -> Reply {
    Reply::with_keyboard("Enter the account name", single(CANCEL, AccountAction::Menu))
}

pub(crate) fn account_name_rejected(reason: &str) -> Reply {
    Reply::with_keyboard(
        format!("{reason}\n\nEnter the account name"),
        single("🏛️ Accounts", AccountAction::Menu),
    )
}

pub(crate) fn account_saved(account: &Account) -> Reply {
    Reply::with_keyboard(
        format!("Account \"{}\" saved!", account.name),
        Keyboard::new().row([
            Button::new("👤 Open account", AccountAction::Get(account.id)),
            Button::new("🏛️ Accounts", AccountAction::Menu),
        ]),
    )
}

pub(crate) fn account_view(account: &Account, balance: &Balance, window: WindowLabel) -> Reply {
    let text = if balance.is_empty() {
        format!(
            "👤 {}\n\nNo incomes or expenses {window}.\n\nAdd a first income or expense to start tracking.",
            account.name
        )
    } else {
        format!(
            "👤 {}\n\n🕒 Balance {window}:\n\n✨ Incomes: {}\n💸 Expenses: {}\n\n💰 Balance: {}",
            account.name,
            balance.income,
            balance.expense,
            balance.balance()
        )
    };
    let keyboard = Keyboard::new()
        .row([
            Button::new("✨ Incomes", IncomeAction::Menu),
            Button::new("💸 Expenses", ExpenseAction::Menu),
        ])
        .row([
            Button::new("🗑️ Delete account", AccountAction::Delete(account.id)),
            Button::new("🕒 Period", AccountAction::PeriodMenu(account.id)),
        ])
        .row([Button::new(BACK, AccountAction::Menu)]);
    Reply::with_keyboard(text, keyboard)
}

pub(crate) fn account_delete_confirm(account: &Account) -> Reply {
    Reply::with_keyboard(
        format!(
            "Delete account \"{}\" with all its incomes, expenses and limit?",
            account.name
        ),
        confirm(
            AccountAction::DeleteYes(account.id),
            AccountAction::DeleteNo(account.id),
        ),
    )
}

pub(crate) fn account_deleted(account: &Account) -> Reply {
    Reply::with_keyboard(
        format!("Account \"{}\" deleted.", account.name),
        single("🏛️ Accounts", AccountAction::Menu),
    )
}

pub(crate) fn period_menu(account: &Account) -> Reply {
    let presets = Period::ALL
        .iter()
        .map(|&p| Button::new(format!("📍 {}", p.label()), AccountAction::SetPeriod(p, account.id)))
        .collect::<Vec<_>>();
    let (first, rest) = presets.split_at(2);
    Reply::with_keyboard(
        format!(
            "Which period should the balance of \"{}\" cover?",
            account.name
        ),
        Keyboard::new()
            .row(first.iter().cloned())
            .row(rest.iter().cloned())
            .row([Button::new(BACK, AccountAction::Get(account.id))]),
    )
}

// Expenses

/// Headline of the expense or income list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ListNotice {
    None,
    Saved,
    Deleted,
    NotFound,
}

impl ListNotice {
    fn prefix(self, noun: &str) -> String {
        match self {
            Self::None => String::new(),
            Self::Saved => format!("Your {noun} has been saved!\n\n"),
            Self::Deleted => format!("The {noun} has been deleted.\n\n"),
            Self::NotFound => format!("That {noun} no longer exists.\n\n"),
        }
    }
}

pub(crate) fn expense_menu(
    account: &Account,
    expenses: &[Expense],
    window: WindowLabel,
    notice: ListNotice,
) -> Reply {
    let body = if expenses.is_empty() {
        format!("No expenses {window}.")
    } else {
        format!("Expenses {window}. Tap one to see its details.")
    };
    let mut keyboard = Keyboard::new().grid(
        expenses
            .iter()
            .map(|e| Button::new(entry_label(e.category, e.amount), ExpenseAction::Get(e.id))),
        1,
    );
    if !expenses.is_empty() {
        keyboard = keyboard.row([Button::new(
            "📊 Report",
            ExpenseAction::Report {
                account_id: account.id,
            },
        )]);
    }
    keyboard = keyboard
        .row([
            Button::new("💸 Add", ExpenseAction::AddAmount),
            Button::new("⚡ Limits", ExpenseAction::LimitMenu),
        ])
        .row([Button::new(BACK, AccountAction::Get(account.id))]);

    Reply::with_keyboard(
        format!(
            "{}Expenses of \"{}\" 💸\n\n{body}",
            notice.prefix("expense"),
            account.name
        ),
        keyboard,
    )
}

pub(crate) fn expense_amount_prompt(cancel: ExpenseAction) -> Reply {
    Reply::with_keyboard("Enter the amount", single(CANCEL, cancel))
}

pub(crate) fn expense_category_prompt() -> Reply {
    Reply::with_keyboard(
        "Pick a category",
        category_keyboard::<ExpenseCategory>(
            |c| ExpenseAction::AddCategory(CategoryArg::Known(c)).into(),
            ExpenseAction::Back.into(),
        ),
    )
}

pub(crate) fn expense_category_edit(expense: &Expense) -> Reply {
    let id = expense.id;
    Reply::with_keyboard(
        format!(
            "Current category: {}\n\nPick a new category",
            category_label(expense.category)
        ),
        category_keyboard::<ExpenseCategory>(
            |c| ExpenseAction::SetCategory(CategoryArg::Known(c), id).into(),
            ExpenseAction::Edit(id).into(),
        ),
    )
}

pub(crate) fn expense_note_prompt(skip: bool) -> Reply {
    if skip {
        Reply::with_keyboard(
            "Enter a note",
            single(SKIP, ExpenseAction::Back),
        )
    } else {
        Reply::with_keyboard("Enter the new note", single(CANCEL, ExpenseAction::Back))
    }
}

pub(crate) fn expense_detail(account: &Account, expense: &Expense) -> Reply {
    let mut text = format!(
        "Expense\n\nCategory: {}\nAccount: {}\nNote: {}\nDate: {}\n\n💰 Amount: {}",
        category_label(expense.category),
        account.name,
        expense.note,
        expense.datetime.format("%d.%m.%Y %H:%M"),
        expense.amount
    );
    if expense.limit_exceeded {
        text.push_str("\n\n🔴 This expense went over the limit.");
    }
    Reply::with_keyboard(
        text,
        Keyboard::new()
            .row([
                Button::new("🛠️ Edit", ExpenseAction::Edit(expense.id)),
                Button::new("🗑️ Delete", ExpenseAction::Delete(expense.id)),
            ])
            .row([Button::new(BACK, ExpenseAction::Back)]),
    )
}

pub(crate) fn expense_edit_menu(expense: &Expense) -> Reply {
    let id = expense.id;
    Reply::with_keyboard(
        "What do you want to change?",
        Keyboard::new()
            .row([Button::new("💰 Amount", ExpenseAction::EditAmount(id))])
            .row([Button::new("🛒 Category", ExpenseAction::EditCategory(id))])
            .row([Button::new("📌 Note", ExpenseAction::EditNote(id))])
            .row([Button::new(BACK, ExpenseAction::Get(id))]),
    )
}

pub(crate) fn expense_delete_confirm(expense: &Expense) -> Reply {
    Reply::with_keyboard(
        format!("Delete this expense of {}?", expense.amount),
        confirm(
            ExpenseAction::DeleteYes(expense.id),
            ExpenseAction::DeleteNo(expense.id),
        ),
    )
}

pub(crate) fn expense_report(report: &CategoryReport<ExpenseCategory>) -> Reply {
    Reply::with_keyboard(
        report_text("Expense report for the last month:", report),
        single(BACK, ExpenseAction::Back),
    )
}

pub(crate) fn limit_menu(account: &Account, status: Option<&LimitStatus>) -> Reply {
    let Some(status) = status else {
        return Reply::with_keyboard(
            format!(
                "Limits ⚡\n\nSet a spending limit for \"{}\" and see which expenses went over it.",
                account.name
            ),
            Keyboard::new()
                .row([Button::new(
                    "⚡ Set limit",
                    ExpenseAction::LimitAdd {
                        account_id: account.id,
                    },
                )])
                .row([Button::new(BACK, ExpenseAction::Menu)]),
        );
    };

    let marker = if status.is_over() { "🔴" } else { "🟢" };
    let text = format!(
        "Limits ⚡\n\n💰 Expenses: {}\n\n⚡ Limit: {}\n\n{marker} Remaining: {}",
        status.spent,
        status.limit,
        status.available()
    );
    let mut keyboard = Keyboard::new();
    if status.any_exceeded {
        keyboard = keyboard.row([Button::new("🛫 Over the limit", ExpenseAction::LimitExceeded)]);
    }
    keyboard = keyboard
        .row([
            Button::new(
                "✏️ Change limit",
                ExpenseAction::LimitAdd {
                    account_id: account.id,
                },
            ),
            Button::new(
                "🗑️ Delete limit",
                ExpenseAction::LimitDelete {
                    account_id: account.id,
                },
            ),
        ])
        .row([Button::new(BACK, ExpenseAction::Menu)]);
    Reply::with_keyboard(text, keyboard)
}

pub(crate) fn limit_amount_prompt() -> Reply {
    Reply::with_keyboard("Enter the limit amount", single(CANCEL, ExpenseAction::LimitMenu))
}

pub(crate) fn limit_saved(account: &Account, amount: Money) -> Reply {
    Reply::with_keyboard(
        format!("Limit of {amount} set for \"{}\".", account.name),
        single("↩️ Limits", ExpenseAction::LimitMenu),
    )
}

pub(crate) fn limit_delete_confirm(account: &Account) -> Reply {
    Reply::with_keyboard(
        format!("Delete the limit of \"{}\"?", account.name),
        confirm(
            ExpenseAction::LimitDeleteYes {
                account_id: account.id,
            },
            ExpenseAction::LimitDeleteNo {
                account_id: account.id,
            },
        ),
    )
}

pub(crate) fn limit_deleted(removed: bool) -> Reply {
    let text = if removed {
        "Limit deleted."
    } else {
        "There was no limit to delete."
    };
    Reply::with_keyboard(text, single("↩️ Limits", ExpenseAction::LimitMenu))
}

pub(crate) fn exceeded_list(expenses: &[Expense]) -> Reply {
    let text = if expenses.is_empty() {
        "No expense went over the limit."
    } else {
        "Expenses that went over the limit:"
    };
    Reply::with_keyboard(
        text,
        Keyboard::new()
            .grid(
                expenses.iter().map(|e| {
                    Button::new(entry_label(e.category, e.amount), ExpenseAction::Get(e.id))
                }),
                1,
            )
            .row([Button::new(BACK, ExpenseAction::LimitMenu)]),
    )
}

// Incomes

pub(crate) fn income_menu(
    account: &Account,
    incomes: &[Income],
    window: WindowLabel,
    notice: ListNotice,
) -> Reply {
    let body = if incomes.is_empty() {
        format!("No incomes {window}.")
    } else {
        format!("Incomes {window}. Tap one to see its details.")
    };
    let mut keyboard = Keyboard::new().grid(
        incomes
            .iter()
            .map(|i| Button::new(entry_label(i.category, i.amount), IncomeAction::Get(i.id))),
        1,
    );
    if !incomes.is_empty() {
        keyboard = keyboard.row([Button::new(
            "📊 Report",
            IncomeAction::Report {
                account_id: account.id,
            },
        )]);
    }
    keyboard = keyboard.row([
        Button::new("✨ Add", IncomeAction::AddAmount),
        Button::new(BACK, AccountAction::Get(account.id)),
    ]);

    Reply::with_keyboard(
        format!(
            "{}Incomes of \"{}\" ✨\n\n{body}",
            notice.prefix("income"),
            account.name
        ),
        keyboard,
    )
}

pub(crate) fn income_amount_prompt(cancel: IncomeAction) -> Reply {
    Reply::with_keyboard("Enter the amount", single(CANCEL, cancel))
}

pub(crate) fn income_category_prompt() -> Reply {
    Reply::with_keyboard(
        "Pick a category",
        category_keyboard::<IncomeCategory>(
            |c| IncomeAction::AddCategory(CategoryArg::Known(c)).into(),
            IncomeAction::Back.into(),
        ),
    )
}

pub(crate) fn income_category_edit(income: &Income) -> Reply {
    let id = income.id;
    Reply::with_keyboard(
        format!(
            "Current category: {}\n\nPick a new category",
            category_label(income.category)
        ),
        category_keyboard::<IncomeCategory>(
            |c| IncomeAction::SetCategory(CategoryArg::Known(c), id).into(),
            IncomeAction::Edit(id).into(),
        ),
    )
}

pub(crate) fn income_note_prompt(skip: bool) -> Reply {
    if skip {
        Reply::with_keyboard("Enter a note", single(SKIP, IncomeAction::Back))
    } else {
        Reply::with_keyboard("Enter the new note", single(CANCEL, IncomeAction::Back))
    }
}

pub(crate) fn income_detail(account: &Account, income: &Income) -> Reply {
    Reply::with_keyboard(
        format!(
            "Income\n\nCategory: {}\nAccount: {}\nNote: {}\nDate: {}\n\n💰 Amount: {}",
            category_label(income.category),
            account.name,
            income.note,
            income.date.format("%d.%m.%Y"),
            income.amount
        ),
        Keyboard::new()
            .row([
                Button::new("🛠️ Edit", IncomeAction::Edit(income.id)),
                Button::new("🗑️ Delete", IncomeAction::Delete(income.id)),
            ])
            .row([Button::new(BACK, IncomeAction::Back)]),
    )
}

pub(crate) fn income_edit_menu(income: &Income) -> Reply {
    let id = income.id;
    Reply::with_keyboard(
        "What do you want to change?",
        Keyboard::new()
            .row([Button::new("💰 Amount", IncomeAction::EditAmount(id))])
            .row([Button::new("🏷️ Category", IncomeAction::EditCategory(id))])
            .row([Button::new("📌 Note", IncomeAction::EditNote(id))])
            .row([Button::new(BACK, IncomeAction::Get(id))]),
    )
}

pub(crate) fn income_delete_confirm(income: &Income) -> Reply {
    Reply::with_keyboard(
        format!("Delete this income of {}?", income.amount),
        confirm(
            IncomeAction::DeleteYes(income.id),
            IncomeAction::DeleteNo(income.id),
        ),
    )
}

pub(crate) fn income_report(report: &CategoryReport<IncomeCategory>) -> Reply {
    Reply::with_keyboard(
        report_text("Income report for the last month:", report),
        single(BACK, IncomeAction::Back),
    )
}

// Shared

/// Inline answer to bad numeric input; the pending state is kept.
pub(crate) fn invalid_amount(reason: &str, cancel: impl Into<Action>) -> Reply {
    Reply::with_keyboard(format!("{reason}\n\nEnter the amount again"), single(CANCEL, cancel))
}

pub(crate) fn unknown_category(name: &str, retry: Reply) -> Reply {
    Reply {
        text: format!("The category \"{name}\" is no longer available.\n\n{}", retry.text),
        keyboard: retry.keyboard,
    }
}

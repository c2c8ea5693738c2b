//! Button payload codec.
//!
//! Every inline button carries a token `DOMAIN_VERB_QUALIFIER...` with `_` as
//! the delimiter, e.g. `EXPENSE_EDIT_CATEGORY_FOOD_42`. Tokens already sent
//! to users live on in old messages, so the shapes below must stay stable.
//!
//! Decoding is a flat table keyed on the segment slice: the number of
//! segments and the verb select the action, and every shape not listed falls
//! back to the domain's menu.

use std::fmt;

use engine::{Category, ExpenseCategory, IncomeCategory, Period};

/// Telegram caps callback data at 64 bytes.
pub const MAX_TOKEN_LEN: usize = 64;

const DELIMITER: char = '_';

/// Top-level routing category of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Domain {
    Main,
    Account,
    Expense,
    Income,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Account => "ACCOUNT",
            Self::Expense => "EXPENSE",
            Self::Income => "INCOME",
        }
    }

    fn parse(segment: &str) -> Option<Self> {
        match segment {
            "MAIN" => Some(Self::Main),
            "ACCOUNT" => Some(Self::Account),
            "EXPENSE" => Some(Self::Expense),
            "INCOME" => Some(Self::Income),
            _ => None,
        }
    }
}

/// A category qualifier as found in a token.
///
/// Tokens can outlive the category set, so a name that no longer parses is
/// kept as `Unknown` for the handler to report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryArg<C> {
    Known(C),
    Unknown(String),
}

impl<C: Category> CategoryArg<C> {
    fn parse(segment: &str) -> Self {
        C::parse(segment).map_or_else(|| Self::Unknown(segment.to_string()), Self::Known)
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Known(category) => category.as_str(),
            Self::Unknown(name) => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountAction {
    Menu,
    Add,
    Get(i64),
    Delete(i64),
    DeleteYes(i64),
    DeleteNo(i64),
    PeriodMenu(i64),
    SetPeriod(Period, i64),
}

/// Actions on expenses. Ids are expense ids unless named `account_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpenseAction {
    Menu,
    Back,
    AddAmount,
    AddCategory(CategoryArg<ExpenseCategory>),
    Get(i64),
    Edit(i64),
    EditAmount(i64),
    EditCategory(i64),
    SetCategory(CategoryArg<ExpenseCategory>, i64),
    EditNote(i64),
    Delete(i64),
    DeleteYes(i64),
    DeleteNo(i64),
    Report { account_id: i64 },
    LimitMenu,
    LimitExceeded,
    LimitAdd { account_id: i64 },
    LimitDelete { account_id: i64 },
    LimitDeleteYes { account_id: i64 },
    LimitDeleteNo { account_id: i64 },
}

/// Actions on incomes. Ids are income ids unless named `account_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncomeAction {
    Menu,
    Back,
    AddAmount,
    AddCategory(CategoryArg<IncomeCategory>),
    Get(i64),
    Edit(i64),
    EditAmount(i64),
    EditCategory(i64),
    SetCategory(CategoryArg<IncomeCategory>, i64),
    EditNote(i64),
    Delete(i64),
    DeleteYes(i64),
    DeleteNo(i64),
    Report { account_id: i64 },
}

/// A decoded button press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    MainMenu,
    Account(AccountAction),
    Expense(ExpenseAction),
    Income(IncomeAction),
}

/// Result of decoding a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded {
    Action(Action),
    /// The token did not match any known shape; show the domain's menu.
    Fallback(Domain),
}

impl Action {
    pub fn domain(&self) -> Domain {
        match self {
            Self::MainMenu => Domain::Main,
            Self::Account(_) => Domain::Account,
            Self::Expense(_) => Domain::Expense,
            Self::Income(_) => Domain::Income,
        }
    }

    /// The menu shown for a domain.
    pub fn menu(domain: Domain) -> Self {
        match domain {
            Domain::Main => Self::MainMenu,
            Domain::Account => Self::Account(AccountAction::Menu),
            Domain::Expense => Self::Expense(ExpenseAction::Menu),
            Domain::Income => Self::Income(IncomeAction::Menu),
        }
    }

    /// Encode the action as a button token.
    pub fn token(&self) -> String {
        self.to_string()
    }

    /// Decode a button token. Never fails: unknown shapes become
    /// [`Decoded::Fallback`].
    pub fn decode(token: &str) -> Decoded {
        let segments: Vec<&str> = token.split(DELIMITER).collect();
        let Some((head, rest)) = segments.split_first() else {
            return Decoded::Fallback(Domain::Main);
        };
        let Some(domain) = Domain::parse(head) else {
            return Decoded::Fallback(Domain::Main);
        };

        let action = match domain {
            Domain::Main => rest.is_empty().then_some(Self::MainMenu),
            Domain::Account => decode_account(rest).map(Self::Account),
            Domain::Expense => decode_expense(rest).map(Self::Expense),
            Domain::Income => decode_income(rest).map(Self::Income),
        };
        action.map_or(Decoded::Fallback(domain), Decoded::Action)
    }
}

impl From<AccountAction> for Action {
    fn from(value: AccountAction) -> Self {
        Self::Account(value)
    }
}

impl From<ExpenseAction> for Action {
    fn from(value: ExpenseAction) -> Self {
        Self::Expense(value)
    }
}

impl From<IncomeAction> for Action {
    fn from(value: IncomeAction) -> Self {
        Self::Income(value)
    }
}

fn id(segment: &str) -> Option<i64> {
    // `i64::from_str` accepts a leading `+`, which would not round-trip.
    if segment.starts_with('+') {
        return None;
    }
    segment.parse().ok()
}

fn decode_account(rest: &[&str]) -> Option<AccountAction> {
    use AccountAction as A;

    Some(match rest {
        [] => A::Menu,
        ["ADD"] => A::Add,
        ["GET", account] => A::Get(id(account)?),
        ["DELETE", account] => A::Delete(id(account)?),
        ["DELETE", "YES", account] => A::DeleteYes(id(account)?),
        ["DELETE", "NO", account] => A::DeleteNo(id(account)?),
        ["DATETIME", account] => A::PeriodMenu(id(account)?),
        ["DATETIME", period, account] => {
            A::SetPeriod(Period::try_from(*period).ok()?, id(account)?)
        }
        _ => return None,
    })
}

fn decode_expense(rest: &[&str]) -> Option<ExpenseAction> {
    use ExpenseAction as E;

    Some(match rest {
        [] => E::Menu,
        ["BACK"] => E::Back,
        ["LIMIT"] => E::LimitMenu,
        ["ADD", "AMOUNT"] => E::AddAmount,
        ["ADD", "CATEGORY", category] => E::AddCategory(CategoryArg::parse(category)),
        ["GET", expense] => E::Get(id(expense)?),
        ["EDIT", expense] => E::Edit(id(expense)?),
        ["EDIT", "AMOUNT", expense] => E::EditAmount(id(expense)?),
        ["EDIT", "CATEGORY", expense] => E::EditCategory(id(expense)?),
        ["EDIT", "CATEGORY", category, expense] => {
            E::SetCategory(CategoryArg::parse(category), id(expense)?)
        }
        ["EDIT", "NOTE", expense] => E::EditNote(id(expense)?),
        ["DELETE", expense] => E::Delete(id(expense)?),
        ["DELETE", "YES", expense] => E::DeleteYes(id(expense)?),
        ["DELETE", "NO", expense] => E::DeleteNo(id(expense)?),
        ["DELETE", "LIMIT", account] => E::LimitDeleteYes {
            account_id: id(account)?,
        },
        ["REPORT", account] => E::Report {
            account_id: id(account)?,
        },
        ["LIMIT", "EXCEEDED"] => E::LimitExceeded,
        ["LIMIT", "ADD", account] => E::LimitAdd {
            account_id: id(account)?,
        },
        ["LIMIT", "DELETE", account] => E::LimitDelete {
            account_id: id(account)?,
        },
        ["LIMIT", "DELETE", "YES", account] => E::LimitDeleteYes {
            account_id: id(account)?,
        },
        ["LIMIT", "DELETE", "NO", account] => E::LimitDeleteNo {
            account_id: id(account)?,
        },
        _ => return None,
    })
}

fn decode_income(rest: &[&str]) -> Option<IncomeAction> {
    use IncomeAction as I;

    Some(match rest {
        [] => I::Menu,
        ["BACK"] => I::Back,
        ["ADD", "AMOUNT"] => I::AddAmount,
        ["ADD", "CATEGORY", category] => I::AddCategory(CategoryArg::parse(category)),
        ["GET", income] => I::Get(id(income)?),
        ["EDIT", income] => I::Edit(id(income)?),
        ["EDIT", "AMOUNT", income] => I::EditAmount(id(income)?),
        ["EDIT", "CATEGORY", income] => I::EditCategory(id(income)?),
        ["EDIT", "CATEGORY", category, income] => {
            I::SetCategory(CategoryArg::parse(category), id(income)?)
        }
        ["EDIT", "NOTE", income] => I::EditNote(id(income)?),
        ["DELETE", income] => I::Delete(id(income)?),
        ["DELETE", "YES", income] => I::DeleteYes(id(income)?),
        ["DELETE", "NO", income] => I::DeleteNo(id(income)?),
        ["REPORT", account] => I::Report {
            account_id: id(account)?,
        },
        _ => return None,
    })
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.domain().as_str())?;
        match self {
            Self::MainMenu => Ok(()),
            Self::Account(action) => write_account(f, action),
            Self::Expense(action) => write_expense(f, action),
            Self::Income(action) => write_income(f, action),
        }
    }
}

fn write_account(f: &mut fmt::Formatter<'_>, action: &AccountAction) -> fmt::Result {
    use AccountAction as A;

    match action {
        A::Menu => Ok(()),
        A::Add => write!(f, "_ADD"),
        A::Get(account) => write!(f, "_GET_{account}"),
        A::Delete(account) => write!(f, "_DELETE_{account}"),
        A::DeleteYes(account) => write!(f, "_DELETE_YES_{account}"),
        A::DeleteNo(account) => write!(f, "_DELETE_NO_{account}"),
        A::PeriodMenu(account) => write!(f, "_DATETIME_{account}"),
        A::SetPeriod(period, account) => write!(f, "_DATETIME_{}_{account}", period.as_str()),
    }
}

fn write_expense(f: &mut fmt::Formatter<'_>, action: &ExpenseAction) -> fmt::Result {
    use ExpenseAction as E;

    match action {
        E::Menu => Ok(()),
        E::Back => write!(f, "_BACK"),
        E::AddAmount => write!(f, "_ADD_AMOUNT"),
        E::AddCategory(category) => write!(f, "_ADD_CATEGORY_{}", category.as_str()),
        E::Get(expense) => write!(f, "_GET_{expense}"),
        E::Edit(expense) => write!(f, "_EDIT_{expense}"),
        E::EditAmount(expense) => write!(f, "_EDIT_AMOUNT_{expense}"),
        E::EditCategory(expense) => write!(f, "_EDIT_CATEGORY_{expense}"),
        E::SetCategory(category, expense) => {
            write!(f, "_EDIT_CATEGORY_{}_{expense}", category.as_str())
        }
        E::EditNote(expense) => write!(f, "_EDIT_NOTE_{expense}"),
        E::Delete(expense) => write!(f, "_DELETE_{expense}"),
        E::DeleteYes(expense) => write!(f, "_DELETE_YES_{expense}"),
        E::DeleteNo(expense) => write!(f, "_DELETE_NO_{expense}"),
        E::Report { account_id } => write!(f, "_REPORT_{account_id}"),
        E::LimitMenu => write!(f, "_LIMIT"),
        E::LimitExceeded => write!(f, "_LIMIT_EXCEEDED"),
        E::LimitAdd { account_id } => write!(f, "_LIMIT_ADD_{account_id}"),
        E::LimitDelete { account_id } => write!(f, "_LIMIT_DELETE_{account_id}"),
        E::LimitDeleteYes { account_id } => write!(f, "_LIMIT_DELETE_YES_{account_id}"),
        E::LimitDeleteNo { account_id } => write!(f, "_LIMIT_DELETE_NO_{account_id}"),
    }
}

fn write_income(f: &mut fmt::Formatter<'_>, action: &IncomeAction) -> fmt::Result {
    use IncomeAction as I;

    match action {
        I::Menu => Ok(()),
        I::Back => write!(f, "_BACK"),
        I::AddAmount => write!(f, "_ADD_AMOUNT"),
        I::AddCategory(category) => write!(f, "_ADD_CATEGORY_{}", category.as_str()),
        I::Get(income) => write!(f, "_GET_{income}"),
        I::Edit(income) => write!(f, "_EDIT_{income}"),
        I::EditAmount(income) => write!(f, "_EDIT_AMOUNT_{income}"),
        I::EditCategory(income) => write!(f, "_EDIT_CATEGORY_{income}"),
        I::SetCategory(category, income) => {
            write!(f, "_EDIT_CATEGORY_{}_{income}", category.as_str())
        }
        I::EditNote(income) => write!(f, "_EDIT_NOTE_{income}"),
        I::Delete(income) => write!(f, "_DELETE_{income}"),
        I::DeleteYes(income) => write!(f, "_DELETE_YES_{income}"),
        I::DeleteNo(income) => write!(f, "_DELETE_NO_{income}"),
        I::Report { account_id } => write!(f, "_REPORT_{account_id}"),
    }
}

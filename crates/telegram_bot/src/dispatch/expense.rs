use engine::{Account, Conversation, Expense, PendingAction};

use super::{Context, ResultDispatch, Step, account, fallback};
use crate::{
    parsing::parse_amount,
    routing::{CategoryArg, Domain, ExpenseAction},
    ui::{self, ListNotice},
};

pub(super) async fn on_action(
    cx: &Context<'_>,
    conversation: Conversation,
    action: ExpenseAction,
) -> ResultDispatch<Step> {
    use ExpenseAction as E;

    match action {
        E::Menu | E::Back => menu(cx, conversation.with_expense(None), ListNotice::None).await,
        E::AddAmount => {
            if cx.current_account(&conversation).await?.is_none() {
                return fallback(cx, conversation, Domain::Account).await;
            }
            Ok(Step::reply(
                ui::expense_amount_prompt(E::Back),
                conversation.awaiting(PendingAction::ExpenseAddAmount),
            ))
        }
        E::AddCategory(category) => {
            let Some(mut expense) = current(cx, &conversation).await? else {
                return fallback(cx, conversation, Domain::Expense).await;
            };
            match category {
                CategoryArg::Known(category) => {
                    expense.category = Some(category);
                    cx.uow.save_expense(&expense).await?;
                    Ok(Step::reply(
                        ui::expense_note_prompt(true),
                        conversation.awaiting(PendingAction::ExpenseAddNote),
                    ))
                }
                CategoryArg::Unknown(name) => {
                    tracing::warn!("unknown expense category {name:?}");
                    Ok(Step::reply(
                        ui::unknown_category(&name, ui::expense_category_prompt()),
                        conversation,
                    ))
                }
            }
        }
        E::Get(id) | E::DeleteNo(id) => detail(cx, conversation, id).await,
        E::Edit(id) => match find(cx, id).await? {
            Some(expense) => Ok(Step::reply(ui::expense_edit_menu(&expense), conversation)),
            None => fallback(cx, conversation, Domain::Expense).await,
        },
        E::EditAmount(id) => match find(cx, id).await? {
            Some(expense) => Ok(Step::reply(
                ui::expense_amount_prompt(E::Get(expense.id)),
                conversation
                    .with_expense(Some(expense.id))
                    .awaiting(PendingAction::ExpenseEditAmount),
            )),
            None => fallback(cx, conversation, Domain::Expense).await,
        },
        E::EditCategory(id) => match find(cx, id).await? {
            Some(expense) => Ok(Step::reply(ui::expense_category_edit(&expense), conversation)),
            None => fallback(cx, conversation, Domain::Expense).await,
        },
        E::SetCategory(category, id) => {
            let Some(mut expense) = find(cx, id).await? else {
                return fallback(cx, conversation, Domain::Expense).await;
            };
            match category {
                CategoryArg::Known(category) => {
                    expense.category = Some(category);
                    cx.uow.save_expense(&expense).await?;
                    let conversation = conversation
                        .with_account(Some(expense.account_id))
                        .with_expense(None);
                    menu(cx, conversation, ListNotice::Saved).await
                }
                CategoryArg::Unknown(name) => {
                    tracing::warn!("unknown expense category {name:?}");
                    Ok(Step::reply(
                        ui::unknown_category(&name, ui::expense_category_edit(&expense)),
                        conversation,
                    ))
                }
            }
        }
        E::EditNote(id) => match find(cx, id).await? {
            Some(expense) => Ok(Step::reply(
                ui::expense_note_prompt(false),
                conversation
                    .with_expense(Some(expense.id))
                    .awaiting(PendingAction::ExpenseEditNote),
            )),
            None => fallback(cx, conversation, Domain::Expense).await,
        },
        E::Delete(id) => match find(cx, id).await? {
            Some(expense) => Ok(Step::reply(ui::expense_delete_confirm(&expense), conversation)),
            None => fallback(cx, conversation, Domain::Expense).await,
        },
        E::DeleteYes(id) => {
            let Some(expense) = cx.uow.delete_expense(cx.chat_id(), id).await? else {
                return fallback(cx, conversation, Domain::Expense).await;
            };
            tracing::info!("chat {}: deleted expense {id}", cx.chat_id());
            let conversation = conversation
                .with_account(Some(expense.account_id))
                .with_expense(None);
            menu(cx, conversation, ListNotice::Deleted).await
        }
        E::Report { account_id } => match cx.account(account_id).await? {
            Some(account) => {
                let report = cx.uow.expense_report(account.id, cx.now).await?;
                Ok(Step::reply(
                    ui::expense_report(&report),
                    conversation.with_account(Some(account.id)),
                ))
            }
            None => fallback(cx, conversation, Domain::Account).await,
        },
        E::LimitMenu => match cx.current_account(&conversation).await? {
            Some(account) => limit_menu(cx, conversation, &account).await,
            None => fallback(cx, conversation, Domain::Account).await,
        },
        E::LimitExceeded => match cx.current_account(&conversation).await? {
            Some(account) => {
                let expenses = cx.uow.exceeded_expenses(account.id).await?;
                Ok(Step::reply(ui::exceeded_list(&expenses), conversation))
            }
            None => fallback(cx, conversation, Domain::Account).await,
        },
        E::LimitAdd { account_id } => match cx.account(account_id).await? {
            Some(account) => Ok(Step::reply(
                ui::limit_amount_prompt(),
                conversation
                    .with_account(Some(account.id))
                    .awaiting(PendingAction::ExpenseAddLimit),
            )),
            None => fallback(cx, conversation, Domain::Account).await,
        },
        E::LimitDelete { account_id } => match cx.account(account_id).await? {
            Some(account) => Ok(Step::reply(ui::limit_delete_confirm(&account), conversation)),
            None => fallback(cx, conversation, Domain::Account).await,
        },
        E::LimitDeleteYes { account_id } => match cx.account(account_id).await? {
            Some(account) => {
                let removed = cx.uow.delete_limit(account.id).await?;
                Ok(Step::reply(
                    ui::limit_deleted(removed),
                    conversation.with_account(Some(account.id)),
                ))
            }
            None => fallback(cx, conversation, Domain::Account).await,
        },
        E::LimitDeleteNo { account_id } => match cx.account(account_id).await? {
            Some(account) => {
                limit_menu(cx, conversation.with_account(Some(account.id)), &account).await
            }
            None => fallback(cx, conversation, Domain::Account).await,
        },
    }
}

/// The expense list of the current account, or the account menu without one.
pub(super) async fn menu(
    cx: &Context<'_>,
    conversation: Conversation,
    notice: ListNotice,
) -> ResultDispatch<Step> {
    let Some(account) = cx.current_account(&conversation).await? else {
        return account::menu(cx, conversation.with_account(None)).await;
    };
    let expenses = cx
        .uow
        .expenses_since(account.id, account.window_start(cx.user))
        .await?;
    Ok(Step::reply(
        ui::expense_menu(&account, &expenses, cx.window(&account), notice),
        conversation,
    ))
}

async fn detail(cx: &Context<'_>, conversation: Conversation, id: i64) -> ResultDispatch<Step> {
    let Some(expense) = find(cx, id).await? else {
        return fallback(cx, conversation, Domain::Expense).await;
    };
    let Some(account) = cx.account(expense.account_id).await? else {
        return fallback(cx, conversation, Domain::Account).await;
    };
    Ok(Step::reply(
        ui::expense_detail(&account, &expense),
        conversation.with_account(Some(account.id)),
    ))
}

async fn limit_menu(
    cx: &Context<'_>,
    conversation: Conversation,
    account: &Account,
) -> ResultDispatch<Step> {
    let status = cx.uow.limit_status(account.id).await?;
    Ok(Step::reply(ui::limit_menu(account, status.as_ref()), conversation))
}

async fn find(cx: &Context<'_>, id: i64) -> ResultDispatch<Option<Expense>> {
    Ok(cx.uow.expense(cx.chat_id(), id).await?)
}

/// The expense the conversation points at, if it still exists.
async fn current(cx: &Context<'_>, conversation: &Conversation) -> ResultDispatch<Option<Expense>> {
    match conversation.expense_id {
        Some(id) => find(cx, id).await,
        None => Ok(None),
    }
}

/// Free text while the amount of a new expense is expected.
pub(super) async fn on_new_amount(
    cx: &Context<'_>,
    conversation: Conversation,
    text: &str,
) -> ResultDispatch<Step> {
    let amount = match parse_amount(text) {
        Ok(amount) => amount,
        Err(err) => {
            return Ok(Step::reply(
                ui::invalid_amount(&err.to_string(), ExpenseAction::Back),
                conversation,
            ));
        }
    };
    let Some(account) = cx.current_account(&conversation).await? else {
        return fallback(cx, conversation, Domain::Account).await;
    };
    let expense = cx.uow.record_expense(&account, amount, cx.now).await?;
    tracing::debug!("chat {}: recorded expense {}", cx.chat_id(), expense.id);
    Ok(Step::reply(
        ui::expense_category_prompt(),
        conversation.free().with_expense(Some(expense.id)),
    ))
}

/// Free text while the new amount of an existing expense is expected.
pub(super) async fn on_edited_amount(
    cx: &Context<'_>,
    conversation: Conversation,
    text: &str,
) -> ResultDispatch<Step> {
    let amount = match parse_amount(text) {
        Ok(amount) => amount,
        Err(err) => {
            let cancel = conversation
                .expense_id
                .map_or(ExpenseAction::Back, ExpenseAction::Get);
            return Ok(Step::reply(
                ui::invalid_amount(&err.to_string(), cancel),
                conversation,
            ));
        }
    };
    let Some(mut expense) = current(cx, &conversation).await? else {
        return fallback(cx, conversation, Domain::Expense).await;
    };
    expense.amount = amount;
    cx.uow.save_expense(&expense).await?;
    let conversation = conversation
        .free()
        .with_account(Some(expense.account_id))
        .with_expense(None);
    menu(cx, conversation, ListNotice::Saved).await
}

/// Free text while the note of a new or edited expense is expected.
pub(super) async fn on_note(
    cx: &Context<'_>,
    conversation: Conversation,
    text: &str,
) -> ResultDispatch<Step> {
    let Some(mut expense) = current(cx, &conversation).await? else {
        return fallback(cx, conversation, Domain::Expense).await;
    };
    expense.note = text.to_string();
    cx.uow.save_expense(&expense).await?;
    let conversation = conversation
        .free()
        .with_account(Some(expense.account_id))
        .with_expense(None);
    menu(cx, conversation, ListNotice::Saved).await
}

/// Free text while a limit amount is expected.
pub(super) async fn on_limit_amount(
    cx: &Context<'_>,
    conversation: Conversation,
    text: &str,
) -> ResultDispatch<Step> {
    let amount = match parse_amount(text) {
        Ok(amount) => amount,
        Err(err) => {
            return Ok(Step::reply(
                ui::invalid_amount(&err.to_string(), ExpenseAction::LimitMenu),
                conversation,
            ));
        }
    };
    let Some(account) = cx.current_account(&conversation).await? else {
        return fallback(cx, conversation, Domain::Account).await;
    };
    let limit = cx.uow.save_limit(account.id, amount, cx.now).await?;
    Ok(Step::reply(
        ui::limit_saved(&account, limit.amount),
        conversation.free(),
    ))
}

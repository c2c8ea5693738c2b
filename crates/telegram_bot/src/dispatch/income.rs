use engine::{Conversation, Income, PendingAction};

use super::{Context, ResultDispatch, Step, account, fallback};
use crate::{
    parsing::parse_amount,
    routing::{CategoryArg, Domain, IncomeAction},
    ui::{self, ListNotice},
};

pub(super) async fn on_action(
    cx: &Context<'_>,
    conversation: Conversation,
    action: IncomeAction,
) -> ResultDispatch<Step> {
    use IncomeAction as I;

    match action {
        I::Menu | I::Back => menu(cx, conversation.with_income(None), ListNotice::None).await,
        I::AddAmount => {
            if cx.current_account(&conversation).await?.is_none() {
                return fallback(cx, conversation, Domain::Account).await;
            }
            Ok(Step::reply(
                ui::income_amount_prompt(I::Back),
                conversation.awaiting(PendingAction::IncomeAddAmount),
            ))
        }
        I::AddCategory(category) => {
            let Some(mut income) = current(cx, &conversation).await? else {
                return fallback(cx, conversation, Domain::Income).await;
            };
            match category {
                CategoryArg::Known(category) => {
                    income.category = Some(category);
                    cx.uow.save_income(&income).await?;
                    Ok(Step::reply(
                        ui::income_note_prompt(true),
                        conversation.awaiting(PendingAction::IncomeAddNote),
                    ))
                }
                CategoryArg::Unknown(name) => {
                    tracing::warn!("unknown income category {name:?}");
                    Ok(Step::reply(
                        ui::unknown_category(&name, ui::income_category_prompt()),
                        conversation,
                    ))
                }
            }
        }
        I::Get(id) | I::DeleteNo(id) => detail(cx, conversation, id).await,
        I::Edit(id) => match find(cx, id).await? {
            Some(income) => Ok(Step::reply(ui::income_edit_menu(&income), conversation)),
            None => fallback(cx, conversation, Domain::Income).await,
        },
        I::EditAmount(id) => match find(cx, id).await? {
            Some(income) => Ok(Step::reply(
                ui::income_amount_prompt(I::Get(income.id)),
                conversation
                    .with_income(Some(income.id))
                    .awaiting(PendingAction::IncomeEditAmount),
            )),
            None => fallback(cx, conversation, Domain::Income).await,
        },
        I::EditCategory(id) => match find(cx, id).await? {
            Some(income) => Ok(Step::reply(ui::income_category_edit(&income), conversation)),
            None => fallback(cx, conversation, Domain::Income).await,
        },
        I::SetCategory(category, id) => {
            let Some(mut income) = find(cx, id).await? else {
                return fallback(cx, conversation, Domain::Income).await;
            };
            match category {
                CategoryArg::Known(category) => {
                    income.category = Some(category);
                    cx.uow.save_income(&income).await?;
                    let conversation = conversation
                        .with_account(Some(income.account_id))
                        .with_income(None);
                    menu(cx, conversation, ListNotice::Saved).await
                }
                CategoryArg::Unknown(name) => {
                    tracing::warn!("unknown income category {name:?}");
                    Ok(Step::reply(
                        ui::unknown_category(&name, ui::income_category_edit(&income)),
                        conversation,
                    ))
                }
            }
        }
        I::EditNote(id) => match find(cx, id).await? {
            Some(income) => Ok(Step::reply(
                ui::income_note_prompt(false),
                conversation
                    .with_income(Some(income.id))
                    .awaiting(PendingAction::IncomeEditNote),
            )),
            None => fallback(cx, conversation, Domain::Income).await,
        },
        I::Delete(id) => match find(cx, id).await? {
            Some(income) => Ok(Step::reply(ui::income_delete_confirm(&income), conversation)),
            None => fallback(cx, conversation, Domain::Income).await,
        },
        I::DeleteYes(id) => {
            let Some(income) = cx.uow.delete_income(cx.chat_id(), id).await? else {
                return fallback(cx, conversation, Domain::Income).await;
            };
            tracing::info!("chat {}: deleted income {id}", cx.chat_id());
            let conversation = conversation
                .with_account(Some(income.account_id))
                .with_income(None);
            menu(cx, conversation, ListNotice::Deleted).await
        }
        I::Report { account_id } => match cx.account(account_id).await? {
            Some(account) => {
                let report = cx.uow.income_report(account.id, cx.now).await?;
                Ok(Step::reply(
                    ui::income_report(&report),
                    conversation.with_account(Some(account.id)),
                ))
            }
            None => fallback(cx, conversation, Domain::Account).await,
        },
    }
}

/// The income list of the current account, or the account menu without one.
pub(super) async fn menu(
    cx: &Context<'_>,
    conversation: Conversation,
    notice: ListNotice,
) -> ResultDispatch<Step> {
    let Some(account) = cx.current_account(&conversation).await? else {
        return account::menu(cx, conversation.with_account(None)).await;
    };
    let since = account.window_start(cx.user).date_naive();
    let incomes = cx.uow.incomes_since(account.id, since).await?;
    Ok(Step::reply(
        ui::income_menu(&account, &incomes, cx.window(&account), notice),
        conversation,
    ))
}

async fn detail(cx: &Context<'_>, conversation: Conversation, id: i64) -> ResultDispatch<Step> {
    let Some(income) = find(cx, id).await? else {
        return fallback(cx, conversation, Domain::Income).await;
    };
    let Some(account) = cx.account(income.account_id).await? else {
        return fallback(cx, conversation, Domain::Account).await;
    };
    Ok(Step::reply(
        ui::income_detail(&account, &income),
        conversation.with_account(Some(account.id)),
    ))
}

async fn find(cx: &Context<'_>, id: i64) -> ResultDispatch<Option<Income>> {
    Ok(cx.uow.income(cx.chat_id(), id).await?)
}

async fn current(cx: &Context<'_>, conversation: &Conversation) -> ResultDispatch<Option<Income>> {
    match conversation.income_id {
        Some(id) => find(cx, id).await,
        None => Ok(None),
    }
}

/// Free text while the amount of a new income is expected.
pub(super) async fn on_new_amount(
    cx: &Context<'_>,
    conversation: Conversation,
    text: &str,
) -> ResultDispatch<Step> {
    let amount = match parse_amount(text) {
        Ok(amount) => amount,
        Err(err) => {
            return Ok(Step::reply(
                ui::invalid_amount(&err.to_string(), IncomeAction::Back),
                conversation,
            ));
        }
    };
    let Some(account) = cx.current_account(&conversation).await? else {
        return fallback(cx, conversation, Domain::Account).await;
    };
    let income = cx
        .uow
        .record_income(&account, amount, cx.now.date_naive())
        .await?;
    tracing::debug!("chat {}: recorded income {}", cx.chat_id(), income.id);
    Ok(Step::reply(
        ui::income_category_prompt(),
        conversation.free().with_income(Some(income.id)),
    ))
}

/// Free text while the new amount of an existing income is expected.
pub(super) async fn on_edited_amount(
    cx: &Context<'_>,
    conversation: Conversation,
    text: &str,
) -> ResultDispatch<Step> {
    let amount = match parse_amount(text) {
        Ok(amount) => amount,
        Err(err) => {
            let cancel = conversation
                .income_id
                .map_or(IncomeAction::Back, IncomeAction::Get);
            return Ok(Step::reply(
                ui::invalid_amount(&err.to_string(), cancel),
                conversation,
            ));
        }
    };
    let Some(mut income) = current(cx, &conversation).await? else {
        return fallback(cx, conversation, Domain::Income).await;
    };
    income.amount = amount;
    cx.uow.save_income(&income).await?;
    let conversation = conversation
        .free()
        .with_account(Some(income.account_id))
        .with_income(None);
    menu(cx, conversation, ListNotice::Saved).await
}

/// Free text while the note of a new or edited income is expected.
pub(super) async fn on_note(
    cx: &Context<'_>,
    conversation: Conversation,
    text: &str,
) -> ResultDispatch<Step> {
    let Some(mut income) = current(cx, &conversation).await? else {
        return fallback(cx, conversation, Domain::Income).await;
    };
    income.note = text.to_string();
    cx.uow.save_income(&income).await?;
    let conversation = conversation
        .free()
        .with_account(Some(income.account_id))
        .with_income(None);
    menu(cx, conversation, ListNotice::Saved).await
}

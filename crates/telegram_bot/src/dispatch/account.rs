use engine::{Conversation, PendingAction};

use super::{Context, ResultDispatch, Step, fallback, validation};
use crate::{
    routing::{AccountAction, Domain},
    ui,
};

pub(super) async fn on_action(
    cx: &Context<'_>,
    conversation: Conversation,
    action: AccountAction,
) -> ResultDispatch<Step> {
    use AccountAction as A;

    match action {
        A::Menu => menu(cx, conversation).await,
        A::Add => Ok(Step::reply(
            ui::account_name_prompt(),
            conversation.awaiting(PendingAction::AccountAdd),
        )),
        A::Get(id) | A::DeleteNo(id) => view(cx, conversation, id).await,
        A::Delete(id) => match cx.account(id).await? {
            Some(account) => Ok(Step::reply(ui::account_delete_confirm(&account), conversation)),
            None => fallback(cx, conversation, Domain::Account).await,
        },
        A::DeleteYes(id) => {
            let Some(account) = cx.uow.delete_account(cx.chat_id(), id).await? else {
                return fallback(cx, conversation, Domain::Account).await;
            };
            tracing::info!("chat {}: deleted account {id}", cx.chat_id());
            let conversation = if conversation.account_id == Some(id) {
                conversation
                    .with_account(None)
                    .with_expense(None)
                    .with_income(None)
            } else {
                conversation
            };
            Ok(Step::reply(ui::account_deleted(&account), conversation))
        }
        A::PeriodMenu(id) => match cx.account(id).await? {
            Some(account) => Ok(Step::reply(ui::period_menu(&account), conversation)),
            None => fallback(cx, conversation, Domain::Account).await,
        },
        A::SetPeriod(period, id) => {
            let cutoff = period.cutoff(cx.now);
            match cx.uow.set_compare_date(cx.chat_id(), id, cutoff).await? {
                Some(_) => view(cx, conversation, id).await,
                None => fallback(cx, conversation, Domain::Account).await,
            }
        }
    }
}

/// The account list. Never falls back further.
pub(super) async fn menu(cx: &Context<'_>, conversation: Conversation) -> ResultDispatch<Step> {
    let accounts = cx.uow.accounts(cx.chat_id()).await?;
    Ok(Step::reply(ui::account_menu(&accounts), conversation))
}

/// Open an account, making it the conversation's current one.
async fn view(cx: &Context<'_>, conversation: Conversation, account_id: i64) -> ResultDispatch<Step> {
    let Some(account) = cx.account(account_id).await? else {
        return menu(cx, conversation.with_account(None)).await;
    };
    let balance = cx.uow.balance(cx.user, &account).await?;
    Ok(Step::reply(
        ui::account_view(&account, &balance, cx.window(&account)),
        conversation.with_account(Some(account.id)),
    ))
}

/// Free text while an account name is expected.
pub(super) async fn on_name(
    cx: &Context<'_>,
    conversation: Conversation,
    text: &str,
) -> ResultDispatch<Step> {
    match cx.uow.create_account(cx.chat_id(), text, cx.now).await {
        Ok(account) => Ok(Step::reply(
            ui::account_saved(&account),
            conversation.free().with_account(Some(account.id)),
        )),
        Err(err) => {
            let reason = validation(err)?;
            Ok(Step::reply(ui::account_name_rejected(&reason), conversation))
        }
    }
}

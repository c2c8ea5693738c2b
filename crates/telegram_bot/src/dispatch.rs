//! Dispatch engine: one inbound event in, at most one directive out.
//!
//! Every event runs under the chat's session lock inside a single unit of
//! work. Handlers receive the user's [`Conversation`] by value and return the
//! next one; it is written back once, right before the commit.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use engine::{Account, Conversation, Engine, EngineError, UnitOfWork, User, WindowLabel};
use teloxide::types::ChatId;

use crate::{
    parsing::{Command, parse_command},
    routing::{Action, Decoded, Domain},
    state::{Expectation, SessionLocks, Target},
    ui::{self, Keyboard, Reply},
};

mod account;
mod expense;
mod income;

/// An event delivered by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    Command {
        chat_id: i64,
        text: String,
        display_name: Option<String>,
    },
    FreeText {
        chat_id: i64,
        text: String,
    },
    Callback {
        chat_id: i64,
        token: String,
        origin_message_id: i32,
    },
}

impl InboundEvent {
    /// Classify a text message: a leading `/` makes it a command.
    pub fn from_message(chat_id: i64, text: &str, display_name: Option<String>) -> Self {
        if text.trim_start().starts_with('/') {
            Self::Command {
                chat_id,
                text: text.to_string(),
                display_name,
            }
        } else {
            Self::FreeText {
                chat_id,
                text: text.to_string(),
            }
        }
    }

    pub fn chat_id(&self) -> i64 {
        match self {
            Self::Command { chat_id, .. }
            | Self::FreeText { chat_id, .. }
            | Self::Callback { chat_id, .. } => *chat_id,
        }
    }

    fn delivery(&self) -> Delivery {
        match self {
            Self::Callback {
                origin_message_id, ..
            } => Delivery::Edit {
                message_id: *origin_message_id,
            },
            Self::Command { .. } | Self::FreeText { .. } => Delivery::Send,
        }
    }
}

/// How a directive reaches the chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Send,
    /// Replace the text and keyboard of the message the button sits on.
    Edit { message_id: i32 },
}

/// Outbound UI update for the transport to deliver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub delivery: Delivery,
}

impl Directive {
    fn new(chat_id: i64, reply: Reply, delivery: Delivery) -> Self {
        Self {
            chat_id,
            text: reply.text,
            keyboard: reply.keyboard,
            delivery,
        }
    }

    fn failure(chat_id: i64) -> Self {
        Self {
            chat_id,
            text: ui::FAILURE_TEXT.to_string(),
            keyboard: None,
            delivery: Delivery::Send,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Engine(#[from] EngineError),
}

type ResultDispatch<T> = Result<T, DispatchError>;

/// What a handler hands back: the reply and the conversation to persist.
pub(crate) struct Step {
    reply: Option<Reply>,
    conversation: Conversation,
}

impl Step {
    fn reply(reply: Reply, conversation: Conversation) -> Self {
        Self {
            reply: Some(reply),
            conversation,
        }
    }

    fn silent(conversation: Conversation) -> Self {
        Self {
            reply: None,
            conversation,
        }
    }
}

/// Everything a handler may read while serving one event.
pub(crate) struct Context<'a> {
    uow: &'a UnitOfWork,
    user: &'a User,
    now: DateTime<Utc>,
}

impl Context<'_> {
    fn chat_id(&self) -> i64 {
        self.user.chat_id
    }

    /// The account the conversation points at, if it still exists.
    async fn current_account(&self, conversation: &Conversation) -> ResultDispatch<Option<Account>> {
        match conversation.account_id {
            Some(id) => self.account(id).await,
            None => Ok(None),
        }
    }

    async fn account(&self, account_id: i64) -> ResultDispatch<Option<Account>> {
        Ok(self.uow.account(self.chat_id(), account_id).await?)
    }

    fn window(&self, account: &Account) -> WindowLabel {
        WindowLabel::describe(account.window_start(self.user), self.now)
    }
}

#[derive(Clone)]
pub struct DispatchEngine {
    engine: Arc<Engine>,
    locks: SessionLocks,
}

impl DispatchEngine {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            locks: SessionLocks::default(),
        }
    }

    pub async fn dispatch(&self, event: InboundEvent) -> Option<Directive> {
        self.dispatch_at(event, Utc::now()).await
    }

    /// Serve `event` as if it arrived at `now`.
    pub async fn dispatch_at(&self, event: InboundEvent, now: DateTime<Utc>) -> Option<Directive> {
        let chat_id = event.chat_id();
        let guard = self.locks.acquire(ChatId(chat_id)).await;
        let result = self.handle(&event, now).await;
        drop(guard);
        self.locks.release(ChatId(chat_id)).await;

        match result {
            Ok(reply) => reply.map(|reply| Directive::new(chat_id, reply, event.delivery())),
            Err(err) => {
                tracing::error!("chat {chat_id}: event failed: {err}");
                Some(Directive::failure(chat_id))
            }
        }
    }

    async fn handle(&self, event: &InboundEvent, now: DateTime<Utc>) -> ResultDispatch<Option<Reply>> {
        let uow = self.engine.unit_of_work().await?;
        let user = uow.ensure_user(event.chat_id(), now).await?;
        let cx = Context {
            uow: &uow,
            user: &user,
            now,
        };

        let step = match event {
            InboundEvent::Callback { token, .. } => {
                // A button press always supersedes pending text input.
                callback(&cx, user.conversation.free(), token).await?
            }
            InboundEvent::Command {
                text, display_name, ..
            } => command(user.conversation, text, display_name.as_deref()),
            InboundEvent::FreeText { text, .. } => free_text(&cx, user.conversation, text).await?,
        };

        if step.conversation != user.conversation {
            tracing::debug!(
                "chat {}: {} -> {}",
                user.chat_id,
                user.conversation.pending.as_str(),
                step.conversation.pending.as_str()
            );
            uow.update_conversation(user.chat_id, &step.conversation)
                .await?;
        }
        uow.commit().await?;
        Ok(step.reply)
    }
}

fn command(conversation: Conversation, text: &str, display_name: Option<&str>) -> Step {
    match parse_command(text) {
        Some(Command::Start) => Step::reply(ui::main_menu(display_name), conversation.free()),
        Some(Command::Help) => Step::reply(ui::help(), conversation),
        None => {
            tracing::warn!("unknown command {text:?}");
            Step::silent(conversation)
        }
    }
}

async fn callback(cx: &Context<'_>, conversation: Conversation, token: &str) -> ResultDispatch<Step> {
    let action = match Action::decode(token) {
        Decoded::Action(action) => action,
        Decoded::Fallback(domain) => {
            tracing::warn!("unrecognized token {token:?}, showing the {} menu", domain.as_str());
            Action::menu(domain)
        }
    };
    tracing::debug!("chat {}: {action:?}", cx.chat_id());
    route(cx, conversation, action).await
}

async fn route(cx: &Context<'_>, conversation: Conversation, action: Action) -> ResultDispatch<Step> {
    match action {
        Action::MainMenu => Ok(Step::reply(ui::main_menu(None), conversation)),
        Action::Account(action) => account::on_action(cx, conversation, action).await,
        Action::Expense(action) => expense::on_action(cx, conversation, action).await,
        Action::Income(action) => income::on_action(cx, conversation, action).await,
    }
}

async fn free_text(cx: &Context<'_>, conversation: Conversation, text: &str) -> ResultDispatch<Step> {
    match Expectation::from(conversation.pending) {
        Expectation::Menu => account::menu(cx, conversation).await,
        Expectation::AccountName => account::on_name(cx, conversation, text).await,
        Expectation::Amount(Target::NewExpense) => expense::on_new_amount(cx, conversation, text).await,
        Expectation::Amount(Target::ExistingExpense) => {
            expense::on_edited_amount(cx, conversation, text).await
        }
        Expectation::Note(Target::NewExpense | Target::ExistingExpense) => {
            expense::on_note(cx, conversation, text).await
        }
        Expectation::LimitAmount => expense::on_limit_amount(cx, conversation, text).await,
        Expectation::Amount(Target::NewIncome) => income::on_new_amount(cx, conversation, text).await,
        Expectation::Amount(Target::ExistingIncome) => {
            income::on_edited_amount(cx, conversation, text).await
        }
        Expectation::Note(Target::NewIncome | Target::ExistingIncome) => {
            income::on_note(cx, conversation, text).await
        }
    }
}

/// Show the menu of `domain` as the not-found fallback.
async fn fallback(cx: &Context<'_>, conversation: Conversation, domain: Domain) -> ResultDispatch<Step> {
    tracing::debug!("chat {}: entity gone, back to the {} menu", cx.chat_id(), domain.as_str());
    match domain {
        Domain::Main => Ok(Step::reply(ui::main_menu(None), conversation.free())),
        Domain::Account => account::menu(cx, conversation.free()).await,
        Domain::Expense => expense::menu(cx, conversation.free(), ui::ListNotice::NotFound).await,
        Domain::Income => income::menu(cx, conversation.free(), ui::ListNotice::NotFound).await,
    }
}

/// Split an engine error into a user-facing validation message or a fault.
fn validation(err: EngineError) -> ResultDispatch<String> {
    if err.is_validation() {
        Ok(match err {
            EngineError::ExistingKey(name) => format!("An account named \"{name}\" already exists."),
            EngineError::InvalidAmount(reason) => capitalize(&reason.to_string()),
            EngineError::InvalidName(reason) => capitalize(&reason),
            other => other.to_string(),
        })
    } else {
        Err(err.into())
    }
}

fn capitalize(reason: &str) -> String {
    let mut chars = reason.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

//! Telegram bot.
//!
//! Updates are turned into [`InboundEvent`]s, served by the
//! [`DispatchEngine`] against the ledger, and the resulting [`Directive`] is
//! delivered back to the chat.

use std::sync::Arc;

use engine::Engine;
use teloxide::prelude::*;

mod dispatch;
mod handlers;
mod parsing;
pub mod routing;
mod state;
mod ui;

pub use dispatch::{Delivery, Directive, DispatchEngine, DispatchError, InboundEvent};
pub use ui::{Button, Keyboard};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BotError {
    #[error("telegram token is empty")]
    EmptyToken,
    #[error("engine is required")]
    MissingEngine,
}

#[derive(Clone)]
pub struct ConfigParameters {
    allowed_users: Option<Vec<UserId>>,
    dispatcher: DispatchEngine,
}

pub struct Bot {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    engine: Arc<Engine>,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);

        let parameters = ConfigParameters {
            allowed_users: self.allowed_users.clone(),
            dispatcher: DispatchEngine::new(Arc::clone(&self.engine)),
        };

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handlers::handle_message))
            .branch(Update::filter_callback_query().endpoint(handlers::handle_callback));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd.kind);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default, Debug)]
pub struct BotBuilder {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    engine: Option<Arc<Engine>>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    /// Restrict the bot to these Telegram user ids; an empty list allows everyone.
    pub fn allowed_users(mut self, allowed_users: Vec<u64>) -> BotBuilder {
        if !allowed_users.is_empty() {
            self.allowed_users = Some(allowed_users.into_iter().map(UserId).collect());
        }
        self
    }

    pub fn engine(mut self, engine: Engine) -> BotBuilder {
        self.engine = Some(Arc::new(engine));
        self
    }

    pub fn build(self) -> Result<Bot, BotError> {
        tracing::info!("Initializing telegram bot...");
        if self.token.trim().is_empty() {
            return Err(BotError::EmptyToken);
        }
        let engine = self.engine.ok_or(BotError::MissingEngine)?;
        Ok(Bot {
            token: self.token,
            allowed_users: self.allowed_users,
            engine,
        })
    }
}

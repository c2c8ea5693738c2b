use teloxide::{
    ApiError, RequestError,
    prelude::*,
    types::{CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, User},
};

use crate::{
    ConfigParameters,
    dispatch::{Delivery, Directive, InboundEvent},
    ui::Keyboard,
};

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    if !is_allowed(&cfg, msg.from.as_ref()) {
        return Ok(());
    }

    let Some(text) = msg.text() else {
        tracing::debug!("chat {}: ignoring a message without text", msg.chat.id.0);
        return Ok(());
    };

    let display_name = msg
        .chat
        .first_name()
        .or_else(|| msg.from.as_ref().map(|u| u.first_name.as_str()))
        .map(str::to_string);
    let event = InboundEvent::from_message(msg.chat.id.0, text, display_name);

    if let Some(directive) = cfg.dispatcher.dispatch(event).await {
        deliver(&bot, directive).await?;
    }
    Ok(())
}

pub(crate) async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    if !is_allowed(&cfg, Some(&q.from)) {
        return Ok(());
    }

    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        tracing::warn!("failed to answer callback query: {err}");
    }

    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let Some(token) = q.data.as_deref() else {
        return Ok(());
    };

    let event = InboundEvent::Callback {
        chat_id: message.chat().id.0,
        token: token.to_string(),
        origin_message_id: message.id().0,
    };

    if let Some(directive) = cfg.dispatcher.dispatch(event).await {
        deliver(&bot, directive).await?;
    }
    Ok(())
}

/// Send or edit according to the directive.
///
/// A failed edit (e.g. the message is too old) falls back to a new message.
async fn deliver(bot: &Bot, directive: Directive) -> ResponseResult<()> {
    let chat_id = ChatId(directive.chat_id);
    let markup = directive.keyboard.as_ref().map(inline_markup);

    if let Delivery::Edit { message_id } = directive.delivery {
        let mut request = bot.edit_message_text(chat_id, MessageId(message_id), directive.text.clone());
        if let Some(markup) = markup.clone() {
            request = request.reply_markup(markup);
        }
        match request.await {
            Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => return Ok(()),
            Err(err) => tracing::warn!("chat {}: edit failed, sending instead: {err}", chat_id.0),
        }
    }

    let mut request = bot.send_message(chat_id, directive.text);
    if let Some(markup) = markup {
        request = request.reply_markup(markup);
    }
    if let Err(err) = request.await {
        tracing::error!("chat {}: delivery failed: {err}", chat_id.0);
        return Err(err);
    }
    Ok(())
}

fn inline_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.layout().into_iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.token.clone()))
            .collect::<Vec<_>>()
    }))
}

fn is_allowed(cfg: &ConfigParameters, from: Option<&User>) -> bool {
    let Some(from) = from else {
        return false;
    };
    match &cfg.allowed_users {
        None => true,
        Some(ids) => ids.contains(&from.id),
    }
}

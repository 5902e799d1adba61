//! Telegram implementation of the relay's chat primitives.

use std::path::Path;

use async_trait::async_trait;
use sitecraft::relay::{Conversation, DeliveryError, NoticeId, Sender, html_escape};
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ParseMode, User};

/// One Telegram chat, bound to the bot that answers in it.
pub struct TelegramChat {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramChat {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl Conversation for TelegramChat {
    async fn reply(&self, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(self.chat_id, text)
            .await
            .map_err(DeliveryError::new)?;
        Ok(())
    }

    async fn reply_html(&self, html: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(self.chat_id, html)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(DeliveryError::new)?;
        Ok(())
    }

    async fn post_notice(&self, text: &str) -> Result<NoticeId, DeliveryError> {
        let sent = self
            .bot
            .send_message(self.chat_id, text)
            .await
            .map_err(DeliveryError::new)?;
        Ok(NoticeId(sent.id.0))
    }

    async fn edit_notice(&self, notice: NoticeId, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .edit_message_text(self.chat_id, MessageId(notice.0), text)
            .await
            .map_err(DeliveryError::new)?;
        Ok(())
    }

    async fn send_document(
        &self,
        path: &Path,
        display_name: &str,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        let document = InputFile::file(path).file_name(display_name.to_string());
        self.bot
            .send_document(self.chat_id, document)
            .caption(caption)
            .await
            .map_err(DeliveryError::new)?;
        Ok(())
    }
}

/// Identify the author of `msg` for greetings.
pub fn sender_of(msg: &Message) -> Sender {
    match &msg.from {
        Some(user) => sender_from_user(user),
        None => Sender::new(
            msg.chat
                .username()
                .or(msg.chat.title())
                .unwrap_or_default(),
        ),
    }
}

fn sender_from_user(user: &User) -> Sender {
    let name = user.full_name();
    let mention = mention_html(user.id.0, &name);
    Sender::new(name).with_mention(mention)
}

/// Clickable Telegram mention for a user id.
pub fn mention_html(user_id: u64, name: &str) -> String {
    format!(
        r#"<a href="tg://user?id={user_id}">{}</a>"#,
        html_escape(name)
    )
}

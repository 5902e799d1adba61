//! The chat-side primitives the relay needs from a messaging platform.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Handle of a message that can later be edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(pub i32);

/// The platform refused or failed to carry out a send/edit.
#[derive(Debug, Error)]
#[error("chat delivery failed: {0}")]
pub struct DeliveryError(pub String);

impl DeliveryError {
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self(message.to_string())
    }
}

/// One chat, as seen while answering a single inbound message.
#[async_trait]
pub trait Conversation: Send + Sync {
    /// Send plain text.
    async fn reply(&self, text: &str) -> Result<(), DeliveryError>;

    /// Send text formatted as platform HTML.
    async fn reply_html(&self, html: &str) -> Result<(), DeliveryError>;

    /// Send a message that will later be edited.
    async fn post_notice(&self, text: &str) -> Result<NoticeId, DeliveryError>;

    /// Replace the text of a previously posted notice.
    async fn edit_notice(&self, notice: NoticeId, text: &str) -> Result<(), DeliveryError>;

    /// Upload the file at `path` as a document named `display_name`.
    async fn send_document(
        &self,
        path: &Path,
        display_name: &str,
        caption: &str,
    ) -> Result<(), DeliveryError>;
}

/// Who sent the inbound message.
#[derive(Debug, Clone)]
pub struct Sender {
    pub display_name: String,
    /// Pre-rendered, HTML-safe mention supplied by the platform adapter.
    pub mention_html: Option<String>,
}

impl Sender {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            mention_html: None,
        }
    }

    #[must_use]
    pub fn with_mention(mut self, mention_html: impl Into<String>) -> Self {
        self.mention_html = Some(mention_html.into());
        self
    }

    /// HTML fragment identifying the sender.
    pub fn to_html(&self) -> String {
        match &self.mention_html {
            Some(mention) => mention.clone(),
            None => html_escape(&self.display_name),
        }
    }
}

/// Escape text for inclusion in platform HTML.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

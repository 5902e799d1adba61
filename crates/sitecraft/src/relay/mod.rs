//! Message relay: turns inbound chat messages into website deliveries.
//!
//! # Message Flow
//!
//! ```text
//!  inbound text
//!       │
//!       ▼
//!  post_notice("working")
//!       │
//!       ▼
//!  SiteGenerator::generate()            one POST, no retries
//!       │
//!       ├─ Ok(html)
//!       │     write artifact → edit notice → send document
//!       │     → preview options → remove artifact
//!       │
//!       └─ Err(e)
//!             edit notice with status / description + site url
//! ```
//!
//! The artifact is a scoped guard, so it is removed on every path.

mod conversation;
mod error;

use std::sync::Arc;

use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::artifact::ArtifactDir;
use crate::config::Config;
use crate::generator::{DeepSiteClient, GenerationError, SiteGenerator};
use crate::locale::Locale;

pub use conversation::{Conversation, DeliveryError, NoticeId, Sender, html_escape};
pub use error::RelayError;

/// Answers greetings, help requests, and website prompts.
pub struct MessageRelay {
    generator: Arc<dyn SiteGenerator>,
    artifacts: ArtifactDir,
    locale: Locale,
    site_url: String,
}

impl MessageRelay {
    pub fn new(
        generator: Arc<dyn SiteGenerator>,
        artifacts: ArtifactDir,
        locale: Locale,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            artifacts,
            locale,
            site_url: site_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        let client = DeepSiteClient::from_config(&config.generator)?;
        Ok(Self::new(
            Arc::new(client),
            ArtifactDir::from_config(&config.artifacts),
            config.locale,
            config.generator.site_url.clone(),
        ))
    }

    /// Welcome a user who just started the conversation.
    pub async fn greet(
        &self,
        chat: &dyn Conversation,
        sender: &Sender,
    ) -> Result<(), DeliveryError> {
        chat.reply_html(&self.locale.welcome(&sender.to_html())).await
    }

    /// Explain how to use the bot.
    pub async fn explain(&self, chat: &dyn Conversation) -> Result<(), DeliveryError> {
        chat.reply(self.locale.usage()).await
    }

    /// Generate a website from `prompt` and deliver it as a document.
    ///
    /// Failures after the provisional notice is posted are reported to the
    /// user by editing that notice; the error is returned for logging.
    pub async fn generate_and_deliver(
        &self,
        chat: &dyn Conversation,
        prompt: &str,
    ) -> Result<(), RelayError> {
        let request_id = Ulid::new();
        info!(%request_id, prompt_len = prompt.len(), "Generating website");

        let notice = match chat.post_notice(self.locale.working()).await {
            Ok(notice) => notice,
            Err(e) => {
                warn!(%request_id, error = %e, "Failed to post progress notice");
                return Err(e.into());
            }
        };

        match self.produce(chat, notice, request_id, prompt).await {
            Ok(()) => {
                info!(%request_id, "Website delivered");
                Ok(())
            }
            Err(err) => {
                warn!(%request_id, error = %err, "Website generation failed");
                if let Err(e) = chat.edit_notice(notice, &self.describe(&err)).await {
                    warn!(%request_id, error = %e, "Failed to report generation failure");
                }
                Err(err)
            }
        }
    }

    /// User-facing description of a failure.
    pub fn describe(&self, err: &RelayError) -> String {
        match err.rejected_status() {
            Some(status) => self.locale.rejected(status, &self.site_url),
            None => self.locale.failed(&err.to_string(), &self.site_url),
        }
    }

    async fn produce(
        &self,
        chat: &dyn Conversation,
        notice: NoticeId,
        request_id: Ulid,
        prompt: &str,
    ) -> Result<(), RelayError> {
        let html = self.generator.generate(prompt).await?;
        debug!(%request_id, bytes = html.len(), "Generated website");

        let artifact = self.artifacts.write(request_id, &html).await?;

        chat.edit_notice(notice, self.locale.success()).await?;
        chat.send_document(
            artifact.path(),
            artifact.display_name(),
            self.locale.caption(),
        )
        .await?;
        chat.reply(self.locale.preview_options()).await?;

        artifact.remove().await?;
        Ok(())
    }
}

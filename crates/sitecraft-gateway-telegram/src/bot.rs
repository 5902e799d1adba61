//! Dispatcher wiring and update delivery (long polling or webhook).

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use sitecraft::config::{Delivery, ServerConfig};
use sitecraft::{Config, MessageRelay};
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::Update;
use teloxide::update_listeners::webhooks;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::chat::{TelegramChat, sender_of};
use crate::commands::{Command, is_prompt};
use crate::health;

/// Run the bot until interrupted.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let token = config.token()?;
    let delivery = config.delivery()?;
    let relay = Arc::new(
        MessageRelay::from_config(config).context("failed to build generation client")?,
    );

    let bot = Bot::new(token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![relay])
        .default_handler(|update| async move {
            debug!(update_id = ?update.id, "Ignoring unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build();

    match delivery {
        Delivery::Polling => {
            info!("Receiving updates by long polling");
            dispatcher.dispatch().await;
        }
        Delivery::Webhook { url } => {
            let addr = listen_addr(&config.server)?;
            let (listener, stop_flag, router) =
                webhooks::axum_to_router(bot, webhooks::Options::new(addr, url.clone()))
                    .await
                    .context("failed to register webhook")?;

            let app = router.merge(health::router());
            let tcp = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            info!(%addr, %url, "Receiving updates by webhook");

            let server = tokio::spawn(async move {
                axum::serve(tcp, app)
                    .with_graceful_shutdown(stop_flag)
                    .await
            });

            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;

            server.await.context("webhook server task panicked")??;
        }
    }

    info!("Bot stopped");
    Ok(())
}

/// Routing of inbound updates to the relay.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(on_command),
        )
        .branch(
            dptree::filter(|msg: Message| {
                let entities = msg.entities().unwrap_or_default();
                msg.text().is_some_and(|text| is_prompt(text, entities))
            })
            .endpoint(on_prompt),
        )
}

async fn on_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    relay: Arc<MessageRelay>,
) -> anyhow::Result<()> {
    let chat = TelegramChat::new(bot, msg.chat.id);
    let result = match cmd {
        Command::Start => relay.greet(&chat, &sender_of(&msg)).await,
        Command::Help => relay.explain(&chat).await,
    };
    if let Err(e) = result {
        warn!(chat_id = %msg.chat.id, command = ?cmd, error = %e, "Failed to answer command");
    }
    Ok(())
}

async fn on_prompt(bot: Bot, msg: Message, relay: Arc<MessageRelay>) -> anyhow::Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat = TelegramChat::new(bot, msg.chat.id);
    // Failures are already reported to the user; keep serving other chats.
    if let Err(e) = relay.generate_and_deliver(&chat, text).await {
        debug!(chat_id = %msg.chat.id, error = %e, "Prompt not delivered");
    }
    Ok(())
}

/// Socket address the webhook server binds to.
pub fn listen_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = server
        .host
        .parse()
        .with_context(|| format!("invalid server host {:?}", server.host))?;
    Ok(SocketAddr::new(ip, server.port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBotApi, NOTICE_ID, PAGE, me, photo_update, text_update};

    /// Run one update through the schema; `true` when an endpoint handled it.
    async fn route(api: &FakeBotApi, update: Update) -> bool {
        let deps = dptree::deps![api.bot.clone(), me(), api.relay.clone(), update];
        match schema().dispatch(deps).await {
            std::ops::ControlFlow::Break(result) => {
                result.unwrap();
                true
            }
            std::ops::ControlFlow::Continue(_) => false,
        }
    }

    #[test]
    fn listen_addr_from_config() {
        let server = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 10000,
        };
        assert_eq!(
            listen_addr(&server).unwrap(),
            "0.0.0.0:10000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn listen_addr_rejects_hostnames() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 80,
        };
        let err = listen_addr(&server).unwrap_err();
        assert!(err.to_string().contains("invalid server host"));
    }

    #[tokio::test]
    async fn run_requires_token() {
        let config = Config::default();
        let err = run(&config).await.unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[tokio::test]
    async fn run_requires_webhook_url_in_webhook_mode() {
        let mut config = Config::default();
        config.telegram.token = Some("1:abc".to_string());
        config.telegram.delivery = sitecraft::config::DeliveryMode::Webhook;
        let err = run(&config).await.unwrap_err();
        assert!(err.to_string().contains("webhook"));
    }

    #[tokio::test]
    async fn start_greets_with_html_mention() {
        let api = FakeBotApi::start().await;
        assert!(route(&api, text_update("/start")).await);

        let calls = api.api_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "SendMessage");
        let body = calls[0].json();
        assert_eq!(body["parse_mode"], "HTML");
        assert!(body["text"].as_str().unwrap().contains("tg://user?id=7"));
        assert_eq!(api.generation_calls().await, 0);
    }

    #[tokio::test]
    async fn help_sends_usage() {
        let api = FakeBotApi::start().await;
        assert!(route(&api, text_update("/help")).await);

        let calls = api.api_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "SendMessage");
        assert!(calls[0].json()["text"].as_str().unwrap().contains("Example:"));
        assert_eq!(api.generation_calls().await, 0);
    }

    #[tokio::test]
    async fn text_is_generated_and_delivered_as_document() {
        let api = FakeBotApi::start().await;
        assert!(route(&api, text_update("a landing page for a bakery")).await);

        assert_eq!(api.generation_calls().await, 1);
        let calls = api.api_calls().await;
        let methods: Vec<_> = calls.iter().map(|c| c.method.as_str()).collect();
        assert_eq!(
            methods,
            ["SendMessage", "EditMessageText", "SendDocument", "SendMessage"]
        );

        assert_eq!(calls[1].json()["message_id"], NOTICE_ID);
        let document = calls[2].text();
        assert!(document.contains(r#"filename="website.html""#));
        assert!(document.contains(PAGE));
        assert_eq!(api.leftover_artifacts(), 0);
    }

    #[tokio::test]
    async fn leading_slash_without_command_is_a_prompt() {
        let api = FakeBotApi::start().await;
        assert!(route(&api, text_update("/ a landing page")).await);
        assert_eq!(api.generation_calls().await, 1);
    }

    #[tokio::test]
    async fn unknown_command_is_ignored() {
        let api = FakeBotApi::start().await;
        assert!(!route(&api, text_update("/reset")).await);
        assert!(api.api_calls().await.is_empty());
        assert_eq!(api.generation_calls().await, 0);
    }

    #[tokio::test]
    async fn photo_is_ignored() {
        let api = FakeBotApi::start().await;
        assert!(!route(&api, photo_update()).await);
        assert!(api.api_calls().await.is_empty());
        assert_eq!(api.generation_calls().await, 0);
    }
}

//! A local stand-in for the Telegram Bot API and the generation endpoint.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use sitecraft::MessageRelay;
use sitecraft::artifact::ArtifactDir;
use sitecraft::generator::DeepSiteClient;
use sitecraft::locale::Locale;
use teloxide::prelude::*;
use teloxide::types::{Me, Update, User, UserId};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CHAT_ID: i64 = 7;
pub const NOTICE_ID: i32 = 55;
pub const PAGE: &str = "<html><body><h1>Bakery</h1></body></html>";

/// A bot and a relay whose outbound traffic all lands on one mock server.
pub struct FakeBotApi {
    pub server: MockServer,
    pub bot: Bot,
    pub relay: Arc<MessageRelay>,
    pub artifacts: TempDir,
}

/// One recorded Bot API call.
pub struct ApiCall {
    pub method: String,
    pub body: Vec<u8>,
}

impl ApiCall {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl FakeBotApi {
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex("^/bot[^/]+/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": message_json(NOTICE_ID, json!({"text": "ok"})),
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [PAGE]})))
            .mount(&server)
            .await;

        let bot = Bot::new("1:x").set_api_url(Url::parse(&server.uri()).unwrap());
        let artifacts = TempDir::new().unwrap();
        let generator = DeepSiteClient::new(
            format!("{}/api/predict", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();
        let relay = Arc::new(MessageRelay::new(
            Arc::new(generator),
            ArtifactDir::new(artifacts.path(), "website.html"),
            Locale::En,
            "https://deepsite.example/",
        ));

        Self {
            server,
            bot,
            relay,
            artifacts,
        }
    }

    /// Bot API calls in the order they were made, by method name.
    pub async fn api_calls(&self) -> Vec<ApiCall> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.url.path().starts_with("/bot"))
            .map(|r| ApiCall {
                method: r
                    .url
                    .path_segments()
                    .and_then(|mut s| s.next_back())
                    .unwrap_or_default()
                    .to_string(),
                body: r.body,
            })
            .collect()
    }

    pub async fn generation_calls(&self) -> usize {
        self.requests()
            .await
            .iter()
            .filter(|r| r.url.path() == "/api/predict")
            .count()
    }

    pub fn leftover_artifacts(&self) -> usize {
        std::fs::read_dir(self.artifacts.path())
            .map(|d| d.count())
            .unwrap_or(0)
    }

    async fn requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

pub fn me() -> Me {
    Me {
        user: User {
            id: UserId(1),
            is_bot: true,
            first_name: "Sitecraft".to_owned(),
            last_name: None,
            username: Some("sitecraft_bot".to_owned()),
            language_code: None,
            is_premium: false,
            added_to_attachment_menu: false,
        },
        can_join_groups: false,
        can_read_all_group_messages: false,
        supports_inline_queries: false,
        can_connect_to_business: false,
        has_main_web_app: false,
    }
}

/// A private-chat message from user `CHAT_ID` with the given content fields.
pub fn message_json(id: i32, content: Value) -> Value {
    let mut msg = json!({
        "message_id": id,
        "date": 1_700_000_000,
        "chat": {"id": CHAT_ID, "type": "private", "first_name": "Sara"},
        "from": {"id": CHAT_ID, "is_bot": false, "first_name": "Sara"},
    });
    if let (Some(fields), Value::Object(extra)) = (msg.as_object_mut(), content) {
        fields.extend(extra);
    }
    msg
}

fn update(content: Value) -> Update {
    // Update's deserializer needs a textual source; `from_value` yields `UpdateKind::Error`.
    let raw = json!({
        "update_id": 1,
        "message": message_json(10, content),
    });
    serde_json::from_str(&raw.to_string()).unwrap()
}

/// A text update. A leading `/word` is marked as a bot command, as Telegram does.
pub fn text_update(text: &str) -> Update {
    let command = text
        .split_whitespace()
        .next()
        .filter(|word| word.len() > 1 && word.starts_with('/'));
    match command {
        Some(word) => update(json!({
            "text": text,
            "entities": [{"type": "bot_command", "offset": 0, "length": word.len()}],
        })),
        None => update(json!({"text": text})),
    }
}

pub fn photo_update() -> Update {
    update(json!({
        "photo": [{
            "file_id": "AgADAgAD36sxG",
            "file_unique_id": "AQADabwx",
            "file_size": 2077,
            "width": 90,
            "height": 90,
        }],
    }))
}

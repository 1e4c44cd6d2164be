use crate::plugins::traits::{NotificationEvent, NotificationResult, NotifierPlugin};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushoverConfig {
    pub token: String,
    pub user_key: String,
    pub api_url: String,
}

impl PushoverConfig {
    /// Both the application token and the user key must be present.
    pub fn from_parts(token: Option<&str>, user_key: Option<&str>) -> Option<Self> {
        let token = token.map(str::trim).filter(|v| !v.is_empty())?;
        let user_key = user_key.map(str::trim).filter(|v| !v.is_empty())?;

        Some(PushoverConfig {
            token: token.to_string(),
            user_key: user_key.to_string(),
            api_url: PUSHOVER_API_URL.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PushoverResponse {
    status: i64,
    #[serde(default)]
    request: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

pub struct PushoverNotifier {
    client: Client,
    config: PushoverConfig,
}

impl PushoverNotifier {
    pub fn new(client: Client, config: PushoverConfig) -> Self {
        PushoverNotifier { client, config }
    }

    fn form<'a>(&'a self, event: &'a NotificationEvent) -> [(&'static str, &'a str); 4] {
        [
            ("token", self.config.token.as_str()),
            ("user", self.config.user_key.as_str()),
            ("title", event.title.as_str()),
            ("message", event.message.as_str()),
        ]
    }
}

#[async_trait]
impl NotifierPlugin for PushoverNotifier {
    fn name(&self) -> &str {
        "Pushover Notifier"
    }

    fn plugin_type(&self) -> &str {
        "pushover"
    }

    fn description(&self) -> &str {
        "Sends push notifications through the Pushover API"
    }

    async fn notify(&self, event: &NotificationEvent) -> Result<NotificationResult> {
        let response = self
            .client
            .post(&self.config.api_url)
            .form(&self.form(event))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: Option<PushoverResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(reply) if status.is_success() && reply.status == 1 => {
                Ok(NotificationResult::delivered(reply.request))
            }
            Some(reply) if !reply.errors.is_empty() => Err(AppError::notifier(
                self.plugin_type(),
                format!("{}: {}", status, reply.errors.join(", ")),
            )),
            _ => Err(AppError::notifier(
                self.plugin_type(),
                format!("unexpected response {}: {}", status, body),
            )),
        }
    }
}

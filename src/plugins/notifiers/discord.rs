use crate::plugins::traits::{NotificationEvent, NotificationResult, NotifierPlugin};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

pub const DISCORD_API_URL: &str = "https://discord.com/api/v10";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordConfig {
    pub token: String,
    pub channel_id: Option<String>,
    pub role_id: Option<String>,
    pub user_ids: Vec<String>,
    pub api_url: String,
}

impl DiscordConfig {
    /// Builds a config from raw settings. `user_ids` is a `;`-separated list.
    ///
    /// Returns `None` without a bot token or without any destination.
    pub fn from_parts(
        token: Option<&str>,
        channel_id: Option<&str>,
        role_id: Option<&str>,
        user_ids: Option<&str>,
    ) -> Option<Self> {
        let non_empty = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let config = DiscordConfig {
            token: non_empty(token)?,
            channel_id: non_empty(channel_id),
            role_id: non_empty(role_id),
            user_ids: user_ids
                .unwrap_or_default()
                .split(';')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
            api_url: DISCORD_API_URL.to_string(),
        };

        config.has_destination().then_some(config)
    }

    pub fn has_destination(&self) -> bool {
        self.channel_id.is_some() || !self.user_ids.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct DiscordObject {
    id: String,
}

pub struct DiscordNotifier {
    client: Client,
    config: DiscordConfig,
}

impl DiscordNotifier {
    pub fn new(client: Client, config: DiscordConfig) -> Self {
        DiscordNotifier { client, config }
    }

    fn channel_content(&self, message: &str) -> String {
        match &self.config.role_id {
            Some(role) => format!("<@&{}> {}", role, message),
            None => message.to_string(),
        }
    }

    async fn post(&self, path: &str, payload: serde_json::Value) -> Result<DiscordObject> {
        let url = format!("{}{}", self.config.api_url.trim_end_matches('/'), path);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bot {}", self.config.token))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::notifier(
                self.plugin_type(),
                format!("POST {} returned {}: {}", path, status, body),
            ));
        }

        Ok(response.json::<DiscordObject>().await?)
    }

    async fn send_to_channel(&self, channel_id: &str, content: &str) -> Result<String> {
        let message = self
            .post(
                &format!("/channels/{}/messages", channel_id),
                json!({ "content": content }),
            )
            .await?;
        Ok(message.id)
    }

    async fn send_to_user(&self, user_id: &str, content: &str) -> Result<String> {
        let dm_channel = self
            .post("/users/@me/channels", json!({ "recipient_id": user_id }))
            .await?;
        self.send_to_channel(&dm_channel.id, content).await
    }
}

#[async_trait]
impl NotifierPlugin for DiscordNotifier {
    fn name(&self) -> &str {
        "Discord Notifier"
    }

    fn plugin_type(&self) -> &str {
        "discord"
    }

    fn description(&self) -> &str {
        "Posts availability alerts to a Discord channel and direct messages"
    }

    async fn notify(&self, event: &NotificationEvent) -> Result<NotificationResult> {
        let mut last_message_id = None;
        let mut failures = Vec::new();

        // The role mention is only added when a channel is configured, and then
        // direct messages carry it as well.
        let content = match &self.config.channel_id {
            Some(_) => self.channel_content(&event.message),
            None => event.message.clone(),
        };

        if let Some(channel_id) = &self.config.channel_id {
            match self.send_to_channel(channel_id, &content).await {
                Ok(id) => {
                    debug!("Posted Discord message {} to channel {}", id, channel_id);
                    last_message_id = Some(id);
                }
                Err(e) => failures.push(format!("channel {}: {}", channel_id, e)),
            }
        }

        // A failing recipient does not stop the remaining ones.
        for user_id in &self.config.user_ids {
            match self.send_to_user(user_id, &content).await {
                Ok(id) => {
                    debug!("Sent Discord direct message {} to user {}", id, user_id);
                    last_message_id = Some(id);
                }
                Err(e) => failures.push(format!("user {}: {}", user_id, e)),
            }
        }

        if failures.is_empty() {
            Ok(NotificationResult::delivered(last_message_id))
        } else {
            Err(AppError::notifier(self.plugin_type(), failures.join("; ")))
        }
    }
}

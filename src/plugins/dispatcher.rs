use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};

use super::notifiers::{DiscordNotifier, PushoverNotifier};
use super::traits::{NotificationEvent, NotifierPlugin};
use crate::config::NotificationsConfig;

pub type NotifierPluginBox = Box<dyn NotifierPlugin>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub delivered: usize,
    pub failed: usize,
}

/// Fans one event out to every registered channel.
///
/// Channels run concurrently and fail independently; nothing is retried and no
/// error reaches the caller.
#[derive(Default)]
pub struct NotifierDispatcher {
    notifiers: Vec<NotifierPluginBox>,
}

impl NotifierDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every channel whose configuration is present.
    pub fn from_config(config: &NotificationsConfig, client: Client) -> Self {
        let mut dispatcher = Self::new();

        if let Some(pushover) = &config.pushover {
            dispatcher.register_notifier(Box::new(PushoverNotifier::new(
                client.clone(),
                pushover.clone(),
            )));
        }

        if let Some(discord) = &config.discord {
            dispatcher.register_notifier(Box::new(DiscordNotifier::new(client, discord.clone())));
        }

        dispatcher
    }

    /// Register a notifier plugin
    pub fn register_notifier(&mut self, plugin: NotifierPluginBox) {
        debug!("Registered notifier: {}", plugin.name());
        self.notifiers.push(plugin);
    }

    pub fn has_notifier(&self, plugin_type: &str) -> bool {
        self.notifiers.iter().any(|n| n.plugin_type() == plugin_type)
    }

    /// List all registered notifier types
    pub fn list_notifier_types(&self) -> Vec<String> {
        self.notifiers
            .iter()
            .map(|n| n.plugin_type().to_string())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    pub async fn notify(&self, event: &NotificationEvent) -> DispatchSummary {
        let sends = self.notifiers.iter().map(|notifier| async move {
            (notifier.plugin_type(), notifier.notify(event).await)
        });

        let mut summary = DispatchSummary::default();
        for (plugin_type, result) in join_all(sends).await {
            match result {
                Ok(result) if result.success => {
                    debug!("Notification '{}' delivered via {}", event.title, plugin_type);
                    summary.delivered += 1;
                }
                Ok(result) => {
                    error!(
                        "Notifier {} did not deliver '{}': {}",
                        plugin_type,
                        event.title,
                        result.error.unwrap_or_default()
                    );
                    summary.failed += 1;
                }
                Err(e) => {
                    error!("Notifier {} failed for '{}': {}", plugin_type, event.title, e);
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::engine::TransitionEvent;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub title: String,
    pub message: String,
}

impl NotificationEvent {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<&TransitionEvent> for NotificationEvent {
    fn from(event: &TransitionEvent) -> Self {
        Self::new(event.title.as_str(), event.message())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl NotificationResult {
    pub fn delivered(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }
}

/// Trait for implementing notification channels (Pushover, Discord, etc.)
#[async_trait]
pub trait NotifierPlugin: Send + Sync {
    /// Plugin metadata
    fn name(&self) -> &str;
    fn plugin_type(&self) -> &str;
    fn description(&self) -> &str;

    /// Delivers one event. Failures are reported, never retried.
    async fn notify(&self, event: &NotificationEvent) -> Result<NotificationResult>;
}

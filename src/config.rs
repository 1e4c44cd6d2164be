use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::engine::ScheduleWindow;
use crate::fetcher::{ApiEndpoints, DEFAULT_CATALOG_URL, DEFAULT_INVENTORY_URL};
use crate::models::GpuModel;
use crate::plugins::notifiers::{DiscordConfig, PushoverConfig};
use crate::utils::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "config/watcher";
pub const DEFAULT_INTERVAL_SECS: f64 = 60.0;
pub const DEFAULT_LOCALE: &str = "de-de";
pub const DEFAULT_INVENTORY_LOCALE: &str = "DE";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Raw settings as read from the config file and the environment.
///
/// Environment keys are lower-cased by the `config` crate, so `RTX_5090` lands
/// in `rtx_5090`. Everything stays textual until [`AppConfig::from_settings`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub interval: Option<String>,
    pub locale: Option<String>,
    pub locale_feinventory: Option<String>,
    pub rtx_5090: Option<String>,
    pub rtx_5080: Option<String>,
    pub days: Option<String>,
    pub hours: Option<String>,
    pub discord_token: Option<String>,
    pub discord_channel_id: Option<String>,
    pub discord_role_id: Option<String>,
    pub discord_user_ids: Option<String>,
    pub pushover_token: Option<String>,
    pub pushover_user_key: Option<String>,
    pub nvidia_catalog_url: Option<String>,
    pub nvidia_inventory_url: Option<String>,
    pub request_timeout: Option<String>,
}

impl Settings {
    fn gpu_flag(&self, gpu: GpuModel) -> Option<&str> {
        match gpu {
            GpuModel::Rtx5090 => self.rtx_5090.as_deref(),
            GpuModel::Rtx5080 => self.rtx_5080.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationsConfig {
    pub discord: Option<DiscordConfig>,
    pub pushover: Option<PushoverConfig>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub interval: Duration,
    pub locale: String,
    pub inventory_locale: String,
    pub gpus: Vec<GpuModel>,
    pub window: ScheduleWindow,
    pub notifications: NotificationsConfig,
    pub endpoints: ApiEndpoints,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Loads settings from an optional TOML file overlaid by environment variables.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(Environment::default())
            .build()?
            .try_deserialize()?;

        Self::from_settings(settings)
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let gpus: Vec<GpuModel> = GpuModel::ALL
            .into_iter()
            .filter(|gpu| is_enabled(settings.gpu_flag(*gpu)))
            .collect();

        if gpus.is_empty() {
            return Err(AppError::NoGpuSelected);
        }

        let endpoints = ApiEndpoints::new(
            non_empty(settings.nvidia_catalog_url.as_deref()).unwrap_or(DEFAULT_CATALOG_URL),
            non_empty(settings.nvidia_inventory_url.as_deref()).unwrap_or(DEFAULT_INVENTORY_URL),
        )?;

        let notifications = NotificationsConfig {
            discord: DiscordConfig::from_parts(
                settings.discord_token.as_deref(),
                settings.discord_channel_id.as_deref(),
                settings.discord_role_id.as_deref(),
                settings.discord_user_ids.as_deref(),
            ),
            pushover: PushoverConfig::from_parts(
                settings.pushover_token.as_deref(),
                settings.pushover_user_key.as_deref(),
            ),
        };

        if notifications.discord.is_none()
            && non_empty(settings.discord_channel_id.as_deref())
                .or(non_empty(settings.discord_user_ids.as_deref()))
                .is_some()
        {
            warn!("Discord destinations are set but DISCORD_TOKEN is missing; Discord is disabled");
        }

        Ok(AppConfig {
            interval: parse_interval(settings.interval.as_deref()),
            locale: non_empty(settings.locale.as_deref())
                .unwrap_or(DEFAULT_LOCALE)
                .to_string(),
            inventory_locale: non_empty(settings.locale_feinventory.as_deref())
                .unwrap_or(DEFAULT_INVENTORY_LOCALE)
                .to_string(),
            gpus,
            window: ScheduleWindow::parse(settings.days.as_deref(), settings.hours.as_deref()),
            notifications,
            endpoints,
            request_timeout: parse_request_timeout(settings.request_timeout.as_deref()),
        })
    }
}

/// A GPU is enabled when its flag is set to anything but an empty string or `false`.
pub fn is_enabled(flag: Option<&str>) -> bool {
    matches!(flag.map(str::trim), Some(value) if !value.is_empty() && value != "false")
}

/// Base poll interval in seconds. Missing, non-numeric, zero or unrepresentable
/// values fall back to 60 seconds; anything below one second is raised to one.
pub fn parse_interval(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs != 0.0)
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    Duration::try_from_secs_f64(secs.max(1.0)).unwrap_or_else(|_| {
        warn!("INTERVAL {} is out of range, using {} seconds", secs, DEFAULT_INTERVAL_SECS);
        Duration::from_secs_f64(DEFAULT_INTERVAL_SECS)
    })
}

fn parse_request_timeout(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::engine::{AvailabilityTracker, TransitionEvent};
use crate::fetcher::{ApiEndpoints, InventorySource};
use crate::models::{FlagInventoryKey, GpuModel, group_offers_by_gpu};
use crate::plugins::{NotificationEvent, NotifierDispatcher};

/// What to poll: the enabled GPUs and the locale of each request family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTargets {
    pub gpus: Vec<GpuModel>,
    pub locale: String,
    pub inventory_locale: String,
}

impl WatchTargets {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            gpus: config.gpus.clone(),
            locale: config.locale.clone(),
            inventory_locale: config.inventory_locale.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub fetches_attempted: usize,
    pub fetch_failures: usize,
    pub transitions: usize,
    /// Events delivered by at least one channel.
    pub notifications_sent: usize,
    pub retailers_pruned: usize,
    pub total_time_ms: u64,
}

/// Runs one fetch → track → notify pass over every upstream source.
pub struct StockChecker {
    source: Arc<dyn InventorySource>,
    dispatcher: NotifierDispatcher,
    endpoints: ApiEndpoints,
    targets: WatchTargets,
    tracker: AvailabilityTracker,
}

impl StockChecker {
    pub fn new(
        source: Arc<dyn InventorySource>,
        dispatcher: NotifierDispatcher,
        endpoints: ApiEndpoints,
        targets: WatchTargets,
    ) -> Self {
        Self {
            source,
            dispatcher,
            endpoints,
            targets,
            tracker: AvailabilityTracker::new(),
        }
    }

    pub fn tracker(&self) -> &AvailabilityTracker {
        &self.tracker
    }

    pub fn dispatcher(&self) -> &NotifierDispatcher {
        &self.dispatcher
    }

    /// Polls flag inventory for each GPU, then the catalog search.
    ///
    /// A failed fetch only skips its own group; state for it is left untouched.
    pub async fn check_all(&mut self, send_notifications: bool) -> CheckReport {
        let start_time = Instant::now();
        let mut report = CheckReport::default();

        for gpu in self.targets.gpus.clone() {
            self.check_flag_inventory(gpu, send_notifications, &mut report)
                .await;
        }
        self.check_catalog(send_notifications, &mut report).await;

        report.total_time_ms = start_time.elapsed().as_millis() as u64;
        report
    }

    async fn check_flag_inventory(&mut self, gpu: GpuModel, send_notifications: bool, report: &mut CheckReport) {
        let url = self
            .endpoints
            .flag_inventory_url(gpu.sku(), &self.targets.inventory_locale);
        report.fetches_attempted += 1;

        let records = match self.source.fetch_flag_inventory(&url).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Flag inventory fetch for {} failed: {}", gpu, e);
                report.fetch_failures += 1;
                return;
            }
        };

        let key = FlagInventoryKey::new(gpu.sku(), self.targets.inventory_locale.as_str());
        let outcome = self
            .tracker
            .process_flag_inventory(&key, gpu.title(), &records);
        self.announce(&outcome.events, send_notifications, report)
            .await;
    }

    async fn check_catalog(&mut self, send_notifications: bool, report: &mut CheckReport) {
        let url = self
            .endpoints
            .catalog_url(&self.targets.locale, &self.targets.gpus);
        report.fetches_attempted += 1;

        let products = match self.source.fetch_catalog(&url).await {
            Ok(products) => products,
            Err(e) => {
                warn!("Catalog fetch failed: {}", e);
                report.fetch_failures += 1;
                return;
            }
        };

        for product in products.iter().filter(|p| p.has_notable_status()) {
            info!(
                "[{}] - prdStatus not \"out_of_stock\": {}",
                product.product_title,
                product.prd_status.as_deref().unwrap_or("none")
            );
        }

        for (gpu_model, offers) in group_offers_by_gpu(&products) {
            let outcome = self.tracker.process_catalog(&gpu_model, &offers);
            report.retailers_pruned += outcome.pruned.len();
            self.announce(&outcome.events, send_notifications, report)
                .await;
        }
    }

    async fn announce(&self, events: &[TransitionEvent], send_notifications: bool, report: &mut CheckReport) {
        report.transitions += events.len();

        if !send_notifications {
            if !events.is_empty() {
                debug!("Baseline cycle, suppressing {} notification(s)", events.len());
            }
            return;
        }

        for event in events {
            let summary = self.dispatcher.notify(&NotificationEvent::from(event)).await;
            debug!(
                "Dispatched '{}': {} delivered, {} failed",
                event.title, summary.delivered, summary.failed
            );
            if summary.delivered > 0 {
                report.notifications_sent += 1;
            }
        }
    }
}

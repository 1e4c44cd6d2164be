// Shared fixtures for the integration tests

pub mod notifier_tests;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub use gpu_drop_watcher::engine::{HourRange, ScheduleWindow};
pub use gpu_drop_watcher::fetcher::{ApiEndpoints, InventorySource, DEFAULT_CATALOG_URL, DEFAULT_INVENTORY_URL};
pub use gpu_drop_watcher::models::{CatalogProduct, FlagInventoryKey, FlagInventoryRecord, GpuModel, OfferStatus, Retailer, RetailerOfferKey};
pub use gpu_drop_watcher::plugins::{NotificationEvent, NotificationResult, NotifierDispatcher, NotifierPlugin};
pub use gpu_drop_watcher::{AppError, CycleOutcome, IntervalPolicy, PollScheduler, SchedulerPhase, StockChecker, WatchTargets};
pub use std::sync::Arc;
pub use std::time::Duration;

pub const INVENTORY_LOCALE: &str = "DE";

/// Upstream source answering from per-request scripts. `None` entries and
/// exhausted scripts are reported as fetch failures.
#[derive(Default)]
pub struct FakeSource {
    flag_inventory: Mutex<HashMap<String, VecDeque<Option<Vec<FlagInventoryRecord>>>>>,
    catalog: Mutex<VecDeque<Option<Vec<CatalogProduct>>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn push_flag_inventory(&self, sku: &str, response: Option<Vec<FlagInventoryRecord>>) {
        self.flag_inventory
            .lock()
            .unwrap()
            .entry(sku.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn push_catalog(&self, response: Option<Vec<CatalogProduct>>) {
        self.catalog.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InventorySource for FakeSource {
    async fn fetch_flag_inventory(&self, url: &str) -> gpu_drop_watcher::Result<Vec<FlagInventoryRecord>> {
        self.requests.lock().unwrap().push(url.to_string());
        let mut scripts = self.flag_inventory.lock().unwrap();
        scripts
            .iter_mut()
            .find(|(sku, _)| url.contains(sku.as_str()))
            .and_then(|(_, queue)| queue.pop_front())
            .flatten()
            .ok_or_else(|| AppError::fetch(url, "scripted failure"))
    }

    async fn fetch_catalog(&self, url: &str) -> gpu_drop_watcher::Result<Vec<CatalogProduct>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.catalog
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or_else(|| AppError::fetch(url, "scripted failure"))
    }
}

pub type Inbox = Arc<Mutex<Vec<NotificationEvent>>>;

/// Channel that records every event it is asked to deliver.
pub struct RecordingNotifier {
    plugin_type: String,
    fail: bool,
    received: Inbox,
}

impl RecordingNotifier {
    pub fn boxed(plugin_type: &str, fail: bool) -> (Box<dyn NotifierPlugin>, Inbox) {
        let received: Inbox = Arc::new(Mutex::new(Vec::new()));
        let notifier = RecordingNotifier {
            plugin_type: plugin_type.to_string(),
            fail,
            received: Arc::clone(&received),
        };
        (Box::new(notifier), received)
    }
}

#[async_trait]
impl NotifierPlugin for RecordingNotifier {
    fn name(&self) -> &str {
        "Recording Notifier"
    }

    fn plugin_type(&self) -> &str {
        &self.plugin_type
    }

    fn description(&self) -> &str {
        "Keeps notifications in memory"
    }

    async fn notify(&self, event: &NotificationEvent) -> gpu_drop_watcher::Result<NotificationResult> {
        self.received.lock().unwrap().push(event.clone());
        if self.fail {
            Err(AppError::notifier(self.plugin_type.as_str(), "channel unavailable"))
        } else {
            Ok(NotificationResult::delivered(None))
        }
    }
}

pub fn default_endpoints() -> ApiEndpoints {
    ApiEndpoints::new(DEFAULT_CATALOG_URL, DEFAULT_INVENTORY_URL).unwrap()
}

pub fn build_scheduler(
    source: Arc<FakeSource>,
    notifiers: Vec<Box<dyn NotifierPlugin>>,
    gpus: Vec<GpuModel>,
    window: ScheduleWindow,
) -> PollScheduler {
    let mut dispatcher = NotifierDispatcher::new();
    for notifier in notifiers {
        dispatcher.register_notifier(notifier);
    }

    let targets = WatchTargets {
        gpus,
        locale: "de-de".to_string(),
        inventory_locale: INVENTORY_LOCALE.to_string(),
    };
    let checker = StockChecker::new(source, dispatcher, default_endpoints(), targets);
    PollScheduler::new(checker, window, IntervalPolicy::new(Duration::from_secs(1)))
}

/// Monday 2025-01-06 at `hour`:00 local time.
pub fn monday_at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn inventory(active: bool) -> Option<Vec<FlagInventoryRecord>> {
    Some(vec![FlagInventoryRecord::new(
        active,
        "https://marketplace.nvidia.com/de-de/5090",
    )])
}

pub fn catalog_product(title: &str, gpu: &str, retailers: &[(&str, i64)]) -> CatalogProduct {
    CatalogProduct {
        product_title: title.to_string(),
        gpu: gpu.to_string(),
        prd_status: Some("out_of_stock".to_string()),
        retailers: retailers
            .iter()
            .map(|(name, status)| Retailer {
                purchase_link: Some(format!("https://{}.example/buy", name.to_lowercase())),
                retailer_name: name.to_string(),
                offer_type: OfferStatus(*status),
                is_available: None,
            })
            .collect(),
    }
}

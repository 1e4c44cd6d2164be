use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::models::{FlagInventoryKey, FlagInventoryRecord, OfferStatus, RetailerOffer, RetailerOfferKey};

/// A transition into "available" that warrants a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionEvent {
    pub title: String,
    pub link: String,
}

impl TransitionEvent {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    pub fn message(&self) -> String {
        format!("{} - Available at {}", self.title, self.link)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagInventoryOutcome {
    pub events: Vec<TransitionEvent>,
    pub active_now: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogOutcome {
    pub events: Vec<TransitionEvent>,
    pub pruned: Vec<RetailerOfferKey>,
}

/// Last known availability per tracked entity.
///
/// A missing key means the entity has never been observed, which compares as
/// unavailable. Flag-inventory keys hold the derived flag, retailer keys hold the
/// raw status code last seen.
#[derive(Debug, Clone, Default)]
pub struct EntityState {
    flag_inventory: HashMap<FlagInventoryKey, bool>,
    retailer_offers: HashMap<RetailerOfferKey, OfferStatus>,
}

impl EntityState {
    pub fn flag_inventory(&self, key: &FlagInventoryKey) -> Option<bool> {
        self.flag_inventory.get(key).copied()
    }

    pub fn retailer_status(&self, key: &RetailerOfferKey) -> Option<OfferStatus> {
        self.retailer_offers.get(key).copied()
    }

    /// Retailer names currently tracked for `gpu_model`, sorted.
    pub fn tracked_retailers(&self, gpu_model: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .retailer_offers
            .keys()
            .filter(|key| key.gpu_model == gpu_model)
            .map(|key| key.retailer_name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.flag_inventory.len() + self.retailer_offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns raw availability records into edge-triggered transition events.
#[derive(Debug, Default)]
pub struct AvailabilityTracker {
    state: EntityState,
}

impl AvailabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EntityState {
        &self.state
    }

    /// Processes one successful flag-inventory fetch for `key`.
    ///
    /// At most one event is produced per call: for the first active record, and
    /// only if the key was not active after the previous successful fetch.
    pub fn process_flag_inventory(
        &mut self,
        key: &FlagInventoryKey,
        title: &str,
        records: &[FlagInventoryRecord],
    ) -> FlagInventoryOutcome {
        let was_active = self.state.flag_inventory(key).unwrap_or(false);
        let mut outcome = FlagInventoryOutcome::default();

        for record in records {
            if record.is_active {
                info!("[{}] [FEInventory] - Available at {}", title, record.link());
                if !was_active && !outcome.active_now {
                    outcome.events.push(TransitionEvent::new(title, record.link()));
                }
                outcome.active_now = true;
            } else {
                info!("[{}] [FEInventory] - Out of stock", title);
            }
        }

        self.state
            .flag_inventory
            .insert(key.clone(), outcome.active_now);
        outcome
    }

    /// Processes one successful catalog fetch for all retailers of `gpu_model`.
    ///
    /// Retailers previously tracked for `gpu_model` but missing from `offers` are
    /// forgotten without an event.
    pub fn process_catalog(&mut self, gpu_model: &str, offers: &[RetailerOffer]) -> CatalogOutcome {
        let mut outcome = CatalogOutcome::default();

        for offer in offers {
            let key = RetailerOfferKey::new(gpu_model, offer.retailer_name.as_str());

            if offer.status.is_available() {
                info!(
                    "[{}] [{}] - Available at {}",
                    offer.title, offer.retailer_name, offer.purchase_link
                );
                let was_available = self
                    .state
                    .retailer_status(&key)
                    .is_some_and(|status| status.is_available());
                if !was_available {
                    outcome
                        .events
                        .push(TransitionEvent::new(offer.title.as_str(), offer.purchase_link.as_str()));
                }
            } else {
                info!("[{}] [{}] - Out of stock", offer.title, offer.retailer_name);
            }

            self.state.retailer_offers.insert(key, offer.status);
        }

        let present: HashSet<&str> = offers.iter().map(|o| o.retailer_name.as_str()).collect();
        let mut pruned: Vec<RetailerOfferKey> = self
            .state
            .retailer_offers
            .keys()
            .filter(|key| key.gpu_model == gpu_model && !present.contains(key.retailer_name.as_str()))
            .cloned()
            .collect();
        pruned.sort();

        for key in &pruned {
            self.state.retailer_offers.remove(key);
            debug!("Retailer {} no longer listed, forgetting it", key);
        }

        outcome.pruned = pruned;
        outcome
    }
}

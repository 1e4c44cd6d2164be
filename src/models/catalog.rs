use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw retailer offer status code reported by the catalog search.
///
/// Only [`OfferStatus::OUT_OF_STOCK`] means unavailable; every other code,
/// including ones not listed here, counts as available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferStatus(pub i64);

impl OfferStatus {
    pub const CHECK_AVAILABILITY: OfferStatus = OfferStatus(29);
    pub const BUY_NOW_ALT: OfferStatus = OfferStatus(75);
    pub const BUY_NOW: OfferStatus = OfferStatus(76);
    pub const CUSTOMIZED_BUY: OfferStatus = OfferStatus(77);
    pub const OUT_OF_STOCK: OfferStatus = OfferStatus(80);

    pub fn is_available(&self) -> bool {
        *self != Self::OUT_OF_STOCK
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            29 => "Check Availability",
            75 | 76 => "Buy Now",
            77 => "Customized & Buy",
            80 => "Out Of Stock",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.0)
    }
}

/// Identifies one retailer offering a GPU model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RetailerOfferKey {
    pub gpu_model: String,
    pub retailer_name: String,
}

impl RetailerOfferKey {
    pub fn new(gpu_model: impl Into<String>, retailer_name: impl Into<String>) -> Self {
        Self {
            gpu_model: gpu_model.into(),
            retailer_name: retailer_name.into(),
        }
    }
}

impl fmt::Display for RetailerOfferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.gpu_model, self.retailer_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Retailer {
    #[serde(default)]
    pub purchase_link: Option<String>,
    pub retailer_name: String,
    #[serde(rename = "type")]
    pub offer_type: OfferStatus,
    #[serde(default)]
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub product_title: String,
    pub gpu: String,
    #[serde(default)]
    pub prd_status: Option<String>,
    #[serde(default)]
    pub retailers: Vec<Retailer>,
}

impl CatalogProduct {
    pub const OUT_OF_STOCK_STATUS: &'static str = "out_of_stock";

    /// Whether the product-level status differs from `out_of_stock`.
    pub fn has_notable_status(&self) -> bool {
        self.prd_status.as_deref() != Some(Self::OUT_OF_STOCK_STATUS)
    }

    pub fn offers(&self) -> impl Iterator<Item = RetailerOffer> + '_ {
        self.retailers.iter().map(|retailer| RetailerOffer {
            status: retailer.offer_type,
            purchase_link: retailer.purchase_link.clone().unwrap_or_default(),
            retailer_name: retailer.retailer_name.clone(),
            title: self.product_title.clone(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub searched_products: SearchedProducts,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchedProducts {
    #[serde(default)]
    pub featured_product: Option<CatalogProduct>,
    #[serde(default)]
    pub product_details: Vec<CatalogProduct>,
}

impl SearchResponse {
    /// Featured product first, then the regular results in upstream order.
    pub fn into_products(self) -> Vec<CatalogProduct> {
        let SearchedProducts {
            featured_product,
            product_details,
        } = self.searched_products;

        featured_product.into_iter().chain(product_details).collect()
    }
}

/// A single retailer observation for the availability tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetailerOffer {
    pub status: OfferStatus,
    pub purchase_link: String,
    pub retailer_name: String,
    pub title: String,
}

impl RetailerOffer {
    pub fn new(
        status: OfferStatus,
        retailer_name: impl Into<String>,
        purchase_link: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            status,
            purchase_link: purchase_link.into(),
            retailer_name: retailer_name.into(),
            title: title.into(),
        }
    }
}

/// Collects offers per `gpu`, keeping the order in which GPU models first appear.
pub fn group_offers_by_gpu(products: &[CatalogProduct]) -> Vec<(String, Vec<RetailerOffer>)> {
    let mut groups: Vec<(String, Vec<RetailerOffer>)> = Vec::new();

    for product in products {
        let offers = product.offers();
        match groups.iter_mut().find(|group| group.0 == product.gpu) {
            Some((_, existing)) => existing.extend(offers),
            None => groups.push((product.gpu.clone(), offers.collect())),
        }
    }

    groups
}

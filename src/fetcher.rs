use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::models::{CatalogProduct, FlagInventoryRecord, FlagInventoryResponse, GpuModel, SearchResponse};
use crate::utils::error::{AppError, Result};

pub const DEFAULT_CATALOG_URL: &str = "https://api.nvidia.partners/edge/product/search";
pub const DEFAULT_INVENTORY_URL: &str = "https://api.store.nvidia.com/partner/v1/feinventory";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36";

/// Upstream availability data. An `Err` means the whole fetch failed.
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn fetch_flag_inventory(&self, url: &str) -> Result<Vec<FlagInventoryRecord>>;
    async fn fetch_catalog(&self, url: &str) -> Result<Vec<CatalogProduct>>;
}

/// Base URLs of the two upstream request families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    pub catalog: Url,
    pub inventory: Url,
}

impl ApiEndpoints {
    pub fn new(catalog: &str, inventory: &str) -> Result<Self> {
        Ok(Self {
            catalog: Url::parse(catalog)?,
            inventory: Url::parse(inventory)?,
        })
    }

    pub fn flag_inventory_url(&self, sku: &str, locale: &str) -> String {
        let mut url = self.inventory.clone();
        url.query_pairs_mut()
            .append_pair("skus", sku)
            .append_pair("locale", locale);
        url.to_string()
    }

    pub fn catalog_url(&self, locale: &str, gpus: &[GpuModel]) -> String {
        let gpu_param = gpus
            .iter()
            .map(|gpu| gpu.search_param().replace(' ', "%20"))
            .collect::<Vec<_>>()
            .join(",");

        let mut url = self.catalog.clone();
        url.query_pairs_mut()
            .append_pair("page", "1")
            .append_pair("limit", "9")
            .append_pair("locale", locale)
            .append_pair("category", "GPU");

        // Separator stays a literal comma; only the names are escaped.
        let query = format!("{}&gpu={}", url.query().unwrap_or_default(), gpu_param);
        url.set_query(Some(&query));
        url.query_pairs_mut().append_pair("manufacturer", "NVIDIA");
        url.to_string()
    }
}

/// HTTP client for the NVIDIA store APIs, sending browser-like headers.
#[derive(Clone)]
pub struct NvidiaApiClient {
    client: Client,
}

impl NvidiaApiClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .default_headers(Self::default_headers())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(
            "sec-ch-ua",
            HeaderValue::from_static(
                "\"Not A(Brand\";v=\"8\", \"Chromium\";v=\"132\", \"Google Chrome\";v=\"132\"",
            ),
        );
        headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
        headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Fetching {}...", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(url, format!("unexpected status {}", status)));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AppError::fetch(url, format!("invalid JSON: {}", e)))
    }
}

#[async_trait]
impl InventorySource for NvidiaApiClient {
    async fn fetch_flag_inventory(&self, url: &str) -> Result<Vec<FlagInventoryRecord>> {
        let response: FlagInventoryResponse = self.get_json(url).await?;
        response
            .list_map
            .ok_or_else(|| AppError::fetch(url, "response has no listMap"))
    }

    async fn fetch_catalog(&self, url: &str) -> Result<Vec<CatalogProduct>> {
        let response: SearchResponse = self.get_json(url).await?;
        Ok(response.into_products())
    }
}

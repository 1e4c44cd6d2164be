use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifies one flag-inventory entity: a Founders Edition SKU in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagInventoryKey {
    pub sku: String,
    pub locale: String,
}

impl FlagInventoryKey {
    pub fn new(sku: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            locale: locale.into(),
        }
    }
}

impl fmt::Display for FlagInventoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.sku, self.locale)
    }
}

/// One entry of the `listMap` array returned by the flag-inventory endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagInventoryRecord {
    #[serde(default, deserialize_with = "deserialize_active_flag")]
    pub is_active: bool,
    #[serde(default)]
    pub product_url: Option<String>,
}

impl FlagInventoryRecord {
    pub fn new(is_active: bool, product_url: impl Into<String>) -> Self {
        Self {
            is_active,
            product_url: Some(product_url.into()),
        }
    }

    pub fn link(&self) -> &str {
        self.product_url.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlagInventoryResponse {
    #[serde(rename = "listMap", default)]
    pub list_map: Option<Vec<FlagInventoryRecord>>,
}

// Upstream sends "true"/"false" strings; plain booleans are accepted as well.
fn deserialize_active_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Text(text)) => text == "true",
        None => false,
    })
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// GPU models the watcher knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GpuModel {
    Rtx5090,
    Rtx5080,
}

impl GpuModel {
    pub const ALL: [GpuModel; 2] = [GpuModel::Rtx5090, GpuModel::Rtx5080];

    /// Settings key holding the enable flag (`RTX_5090` in the environment).
    pub fn setting_key(&self) -> &'static str {
        match self {
            GpuModel::Rtx5090 => "rtx_5090",
            GpuModel::Rtx5080 => "rtx_5080",
        }
    }

    /// Value of the catalog search `gpu` parameter.
    pub fn search_param(&self) -> &'static str {
        match self {
            GpuModel::Rtx5090 => "RTX 5090",
            GpuModel::Rtx5080 => "RTX 5080",
        }
    }

    /// Founders Edition SKU used by the flag-inventory endpoint.
    pub fn sku(&self) -> &'static str {
        match self {
            GpuModel::Rtx5090 => "NVGFT590",
            GpuModel::Rtx5080 => "NVGFT580",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GpuModel::Rtx5090 => "NVIDIA GEFORCE RTX 5090",
            GpuModel::Rtx5080 => "NVIDIA GEFORCE RTX 5080",
        }
    }
}

impl fmt::Display for GpuModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.search_param())
    }
}

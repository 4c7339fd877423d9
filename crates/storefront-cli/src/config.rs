use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storefront_core::domain::DEFAULT_LOW_STOCK_THRESHOLD;
use storefront_core::query::{ADMIN_PAGE_SIZE, CUSTOMER_PAGE_SIZE};

/// `config.toml` contents. Every section is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub data: DataSection,
    pub pagination: PaginationSection,
    pub inventory: InventorySection,
    pub ui: UiSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DataSection {
    /// Directory holding `<kind>.json` snapshots
    pub dir: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSection {
    pub admin_page_size: usize,
    pub customer_page_size: usize,
}

impl Default for PaginationSection {
    fn default() -> Self {
        Self {
            admin_page_size: ADMIN_PAGE_SIZE,
            customer_page_size: CUSTOMER_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySection {
    pub low_stock_threshold: f64,
}

impl Default for InventorySection {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UiSection {
    /// IANA timezone for displayed timestamps
    pub timezone: Option<String>,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    xdg_data_dir()
}

pub fn read_config(path: &Path) -> anyhow::Result<StorefrontConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    parse_config(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

fn parse_config(contents: &str) -> Result<StorefrontConfig, toml::de::Error> {
    toml::from_str(contents)
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("storefront"));
        }
    }
    Ok(home_dir()?.join(".config").join("storefront"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("storefront"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("storefront"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

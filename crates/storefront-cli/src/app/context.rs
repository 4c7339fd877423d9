//! Application context for the storefront CLI.
//!
//! Combines CLI arguments with lazily loaded configuration.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use once_cell::unsync::OnceCell;

use storefront_core::domain::{MetricContext, Resource};
use storefront_core::snapshot::snapshot_path;
use storefront_core::Collection;

use crate::cli::Cli;
use crate::config::{read_config, StorefrontConfig};
use crate::errors::CliError;
use crate::ui::{OutputFormat, UiContext};

use super::resolver::{missing_snapshot_hint, resolve_config_path, resolve_data_dir};

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<StorefrontConfig>,
    data_dir: OnceCell<PathBuf>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            data_dir: OnceCell::new(),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Configuration file contents; defaults when the file does not exist.
    pub fn config(&self) -> anyhow::Result<&StorefrontConfig> {
        self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if !path.exists() {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(StorefrontConfig::default());
            }
            read_config(&path)
        })
    }

    pub fn data_dir(&self) -> anyhow::Result<&PathBuf> {
        self.data_dir
            .get_or_try_init(|| resolve_data_dir(self.cli, self.config()?))
    }

    pub fn snapshot_path<R: Resource>(&self) -> anyhow::Result<PathBuf> {
        Ok(snapshot_path(self.data_dir()?, R::KIND))
    }

    /// Load the snapshot for `R`. A missing file is an error here: the CLI
    /// never invents an empty collection the user did not ask for.
    pub fn load<R: Resource>(&self) -> anyhow::Result<Collection<R>> {
        let path = self.snapshot_path::<R>()?;
        if !path.exists() {
            return Err(CliError::not_found(
                format!("No {} snapshot at {}", R::KIND, path.display()),
                missing_snapshot_hint(R::KIND),
            )
            .into());
        }
        let records = storefront_core::snapshot::load(&path)?;
        tracing::debug!(kind = R::KIND, count = records.len(), "loaded snapshot");
        Ok(records)
    }

    pub fn save<R: Resource>(&self, records: &Collection<R>) -> anyhow::Result<()> {
        let path = self.snapshot_path::<R>()?;
        storefront_core::snapshot::save(&path, records)?;
        Ok(())
    }

    /// UI context for one command's output flags.
    pub fn ui_context(&self, json: bool, format: Option<OutputFormat>) -> UiContext {
        let timezone = self
            .config()
            .ok()
            .and_then(|config| config.ui.timezone.as_deref())
            .and_then(|name| match name.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    tracing::warn!(timezone = name, "unknown timezone in config, using UTC");
                    None
                }
            });
        UiContext::from_env(json, format, self.cli.no_color, self.cli.ascii).with_timezone(timezone)
    }

    pub fn metric_context(
        &self,
        now: DateTime<Utc>,
        low_stock_override: Option<f64>,
    ) -> anyhow::Result<MetricContext> {
        let threshold = match low_stock_override {
            Some(value) => value,
            None => self.config()?.inventory.low_stock_threshold,
        };
        Ok(MetricContext::new(now).with_low_stock_threshold(threshold))
    }

    pub fn low_stock_threshold(&self) -> anyhow::Result<f64> {
        Ok(self.config()?.inventory.low_stock_threshold)
    }

    pub fn page_size(&self, explicit: Option<usize>, customer: bool) -> anyhow::Result<usize> {
        if let Some(size) = explicit {
            if size == 0 {
                return Err(CliError::invalid_input("--page-size must be at least 1").into());
            }
            return Ok(size);
        }
        let pagination = &self.config()?.pagination;
        Ok(if customer {
            pagination.customer_page_size
        } else {
            pagination.admin_page_size
        })
    }
}

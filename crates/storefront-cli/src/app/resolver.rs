//! Path resolution for the config file and snapshot directory.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::{default_config_path, default_data_dir, StorefrontConfig};
use crate::constants::env;

/// Resolve the config file path, checking STOREFRONT_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the snapshot directory: `--data` (or STOREFRONT_DATA), then the
/// config file, then the XDG data directory.
pub fn resolve_data_dir(cli: &Cli, config: &StorefrontConfig) -> anyhow::Result<PathBuf> {
    if let Some(dir) = cli.data.clone() {
        return Ok(dir);
    }
    if let Some(dir) = config.data.dir.as_deref() {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    default_data_dir()
}

pub fn missing_snapshot_hint(kind: &str) -> String {
    format!(
        "Export the {} list to <data-dir>/{}.json, or point --data / {} at the directory holding it.",
        kind,
        kind,
        env::DATA
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flag_wins_over_config() {
        let cli = Cli::try_parse_from(["storefront", "--data", "/tmp/flag", "stats", "orders"])
            .unwrap();
        let mut config = StorefrontConfig::default();
        config.data.dir = Some("/tmp/config".to_string());
        assert_eq!(
            resolve_data_dir(&cli, &config).unwrap(),
            PathBuf::from("/tmp/flag")
        );
    }

    #[test]
    fn test_config_dir_used_without_flag() {
        let cli = Cli::try_parse_from(["storefront", "stats", "orders"]).unwrap();
        if cli.data.is_some() {
            // STOREFRONT_DATA is set in this environment
            return;
        }
        let mut config = StorefrontConfig::default();
        config.data.dir = Some("/tmp/config".to_string());
        assert_eq!(
            resolve_data_dir(&cli, &config).unwrap(),
            PathBuf::from("/tmp/config")
        );
    }

    #[test]
    fn test_missing_snapshot_hint_names_file() {
        let hint = missing_snapshot_hint("coupons");
        assert!(hint.contains("coupons.json"));
        assert!(hint.contains("STOREFRONT_DATA"));
    }
}

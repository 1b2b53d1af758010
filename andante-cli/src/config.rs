//! User configuration file.
//!
//! Lives at `~/.config/andante/config.toml`; every field is optional and
//! resolution order is CLI flag > config file > built-in default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use andante_downloader::PacingConfig;

/// Canonical path to the config file.
pub(crate) fn config_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("andante").join("config.toml")
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub paths: PathsSection,
    pub browser: BrowserSection,
    pub catalog: CatalogSection,
    pub pacing: PacingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PathsSection {
    /// Destination root for finished downloads.
    pub download_root: Option<PathBuf>,
    /// Directory the browser drops downloads into.
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BrowserSection {
    pub webdriver_url: Option<String>,
    pub site_base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CatalogSection {
    pub api_base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PacingSection {
    pub reset_interval_minutes: Option<u64>,
}

impl Config {
    /// Read the config file; a missing file is the default config, a
    /// malformed one is ignored with a warning.
    pub fn load() -> Self {
        match std::fs::read_to_string(config_path()) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed config file: {e}");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn download_root(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.paths.download_root.clone())
            .unwrap_or_else(|| {
                let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
                home.join("Downloads").join("Music")
            })
    }

    /// Scratch defaults to a dot-directory under the download root so the
    /// finished library and in-flight files never mix.
    pub fn scratch_dir(&self, cli_override: Option<PathBuf>, download_root: &Path) -> PathBuf {
        cli_override
            .or_else(|| self.paths.scratch_dir.clone())
            .unwrap_or_else(|| download_root.join(".incoming"))
    }

    pub fn webdriver_url(&self, cli_override: Option<String>) -> String {
        cli_override
            .or_else(|| self.browser.webdriver_url.clone())
            .unwrap_or_else(|| "http://localhost:4444".to_string())
    }

    pub fn site_base(&self) -> String {
        self.browser
            .site_base
            .clone()
            .unwrap_or_else(|| andante_downloader::selectors::DEFAULT_SITE_BASE.to_string())
    }

    pub fn api_base(&self) -> String {
        self.catalog
            .api_base
            .clone()
            .unwrap_or_else(|| andante_catalog::DEFAULT_API_BASE.to_string())
    }

    pub fn pacing_config(&self) -> PacingConfig {
        let mut config = PacingConfig::default();
        if let Some(minutes) = self.pacing.reset_interval_minutes {
            config.reset_interval = Duration::from_secs(minutes.max(1) * 60);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.paths.download_root.is_none());
        assert_eq!(config.webdriver_url(None), "http://localhost:4444");
        assert_eq!(
            config.pacing_config().reset_interval,
            PacingConfig::default().reset_interval
        );
    }

    #[test]
    fn test_partial_config_overrides() {
        let config: Config = toml::from_str(
            r#"
            [paths]
            download_root = "/srv/music"

            [pacing]
            reset_interval_minutes = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.download_root(None), PathBuf::from("/srv/music"));
        assert_eq!(
            config.scratch_dir(None, &PathBuf::from("/srv/music")),
            PathBuf::from("/srv/music/.incoming")
        );
        assert_eq!(
            config.pacing_config().reset_interval,
            Duration::from_secs(25 * 60)
        );
    }

    #[test]
    fn test_cli_override_wins() {
        let config: Config = toml::from_str("[paths]\ndownload_root = \"/srv/music\"")
            .unwrap();
        assert_eq!(
            config.download_root(Some(PathBuf::from("/tmp/out"))),
            PathBuf::from("/tmp/out")
        );
    }
}

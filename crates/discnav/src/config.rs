use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bitmap::NEUTRAL_GRAY;
use crate::error::{NavError, Result};

/// Persisted navigation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Try to enable disc navigation when a source supports it.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Input section active for the whole navigation session.
    #[serde(default = "default_base_section")]
    pub base_section: String,
    /// Input section active only while a menu is shown.
    #[serde(default = "default_menu_section")]
    pub menu_section: String,
    /// Property notified when menu mode may have changed.
    #[serde(default = "default_menu_property")]
    pub menu_property: String,
    /// Fill byte of the synthetic highlight bitmap.
    #[serde(default = "default_highlight_gray")]
    pub highlight_gray: u8,
}

fn default_version() -> u32 { 1 }
fn default_true() -> bool { true }
fn default_base_section() -> String { "discnav".to_string() }
fn default_menu_section() -> String { "discnav-menu".to_string() }
fn default_menu_property() -> String { "disc-menu-active".to_string() }
fn default_highlight_gray() -> u8 { NEUTRAL_GRAY }

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            version: 1,
            enabled: true,
            base_section: default_base_section(),
            menu_section: default_menu_section(),
            menu_property: default_menu_property(),
            highlight_gray: NEUTRAL_GRAY,
        }
    }
}

impl NavConfig {
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("discnav").join("discnav.json")
    }

    /// Load from the user config dir, falling back to defaults.
    pub fn load() -> Self {
        Self::load_or_default(&Self::config_path())
    }

    /// Load from `path`; any failure is logged and yields defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => {
                log::info!("Loaded navigation config from {}", path.display());
                config
            }
            Err(NavError::ConfigIo { ref source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::info!("No navigation config found, using defaults");
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| NavError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| NavError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) {
        let path = Self::config_path();
        match self.save_to(&path) {
            Ok(()) => log::debug!("Saved navigation config to {}", path.display()),
            Err(e) => log::error!("{e}"),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |source| NavError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| NavError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }
}

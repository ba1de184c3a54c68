use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::defaults::*;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Threading model requested when entering a COM apartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApartmentModel {
    #[default]
    SingleThreaded,
    MultiThreaded,
}

/// Direct2D debug layer verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum D2dDebugLevel {
    #[default]
    None,
    Error,
    Warning,
    Information,
}

/// Reference accounting switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsSettings {
    /// Count every reference handles take and give up, per resource kind.
    #[serde(default = "default_track_references")]
    pub track_references: bool,
    /// Warn about kinds with outstanding references before exiting.
    #[serde(default = "default_report_leaks_on_exit")]
    pub report_leaks_on_exit: bool,
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            track_references: default_track_references(),
            report_leaks_on_exit: default_report_leaks_on_exit(),
        }
    }
}

/// Options used when creating factories and devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComSettings {
    #[serde(default)]
    pub apartment: ApartmentModel,
    #[serde(default = "default_d2d_multithreaded")]
    pub d2d_multithreaded: bool,
    #[serde(default)]
    pub d2d_debug_level: D2dDebugLevel,
    #[serde(default = "default_d3d_debug_layer")]
    pub d3d_debug_layer: bool,
    /// Isolated DirectWrite factories don't share the system font cache.
    #[serde(default = "default_dwrite_isolated")]
    pub dwrite_isolated: bool,
}

impl Default for ComSettings {
    fn default() -> Self {
        Self {
            apartment: ApartmentModel::default(),
            d2d_multithreaded: default_d2d_multithreaded(),
            d2d_debug_level: D2dDebugLevel::default(),
            d3d_debug_layer: default_d3d_debug_layer(),
            dwrite_isolated: default_dwrite_isolated(),
        }
    }
}

/// Persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// `tracing` filter directive, e.g. `info` or `refcom::refs=trace`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub diagnostics: DiagnosticsSettings,

    #[serde(default)]
    pub com: ComSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            diagnostics: DiagnosticsSettings::default(),
            com: ComSettings::default(),
        }
    }
}

impl Settings {
    /// Where settings live: `$REFCOM_SETTINGS` if set, else the per-user dir.
    pub fn default_path() -> PathBuf {
        match std::env::var_os(SETTINGS_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_config_dir().join(SETTINGS_FILE_NAME),
        }
    }

    /// Strictly load one file.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, falling back to defaults.
    ///
    /// A missing file is created with the defaults. A malformed file is left
    /// untouched so it can be fixed by hand.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(SettingsError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                let settings = Self::default();
                if let Err(e) = settings.save_to(path) {
                    tracing::debug!(path = %path.display(), error = %e, "could not persist default settings");
                }
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from the default location.
    pub fn load() -> Self {
        Self::load_or_default(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Save settings to the default location.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::default_path())
    }
}

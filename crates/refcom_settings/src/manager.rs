use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::{ComSettings, Settings};

/// Caches one settings snapshot and the file it came from.
pub struct ConfigManager {
    path: PathBuf,
    settings: Arc<RwLock<Settings>>,
}

impl ConfigManager {
    /// Load settings from the default location once and cache them.
    pub fn new() -> Self {
        Self::with_path(Settings::default_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = Settings::load_or_default(&path);
        Self {
            path,
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a snapshot copy of current settings.
    pub fn get(&self) -> Settings {
        self.settings
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|_| Settings::default())
    }

    /// Get the shared settings reference.
    pub fn get_shared(&self) -> Arc<RwLock<Settings>> {
        Arc::clone(&self.settings)
    }

    /// Reload settings from disk.
    pub fn reload(&mut self) {
        let new_settings = Settings::load_or_default(&self.path);
        if let Ok(mut guard) = self.settings.write() {
            *guard = new_settings;
        }
    }

    /// Replace the cached settings and persist them.
    pub fn update(&self, settings: Settings) -> anyhow::Result<()> {
        settings.save_to(&self.path)?;
        if let Ok(mut guard) = self.settings.write() {
            *guard = settings;
        }
        Ok(())
    }

    // Convenience accessors.

    #[inline]
    pub fn log_level(&self) -> String {
        self.get().log_level
    }

    #[inline]
    pub fn track_references(&self) -> bool {
        self.get().diagnostics.track_references
    }

    #[inline]
    pub fn report_leaks_on_exit(&self) -> bool {
        self.get().diagnostics.report_leaks_on_exit
    }

    #[inline]
    pub fn com(&self) -> ComSettings {
        self.get().com
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

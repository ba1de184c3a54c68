use std::path::PathBuf;

/// Environment variable that points at an explicit settings file.
pub const SETTINGS_ENV: &str = "REFCOM_SETTINGS";

pub const SETTINGS_FILE_NAME: &str = "settings.json";

// Logging defaults
pub fn default_log_level() -> String {
    "info".to_string()
}

// Diagnostics defaults
pub fn default_track_references() -> bool {
    false
}

pub fn default_report_leaks_on_exit() -> bool {
    true
}

// COM defaults
pub fn default_d2d_multithreaded() -> bool {
    false
}

pub fn default_d3d_debug_layer() -> bool {
    false
}

pub fn default_dwrite_isolated() -> bool {
    false
}

/// Per-user configuration directory.
///
/// `APPDATA` on Windows, `XDG_CONFIG_HOME` or `~/.config` elsewhere, and the
/// working directory as a last resort.
pub fn default_config_dir() -> PathBuf {
    let base = if cfg!(windows) {
        std::env::var_os("APPDATA").map(PathBuf::from)
    } else {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
    };
    base.unwrap_or_else(|| PathBuf::from(".")).join("refcom")
}

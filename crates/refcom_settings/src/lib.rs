pub mod defaults;
pub mod manager;
pub mod settings;

pub use manager::ConfigManager;
pub use settings::{
    ApartmentModel, ComSettings, D2dDebugLevel, DiagnosticsSettings, Settings, SettingsError,
};

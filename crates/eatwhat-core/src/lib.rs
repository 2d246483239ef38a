//! Domain types and configuration shared by every eatwhat crate.

pub mod app_config;
pub mod config;
pub mod filter;
pub mod geo;
pub mod saved;
pub mod schedule;
pub mod settings;
pub mod venue;

use thiserror::Error;

pub use app_config::{AppConfig, BaseConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, load_base_config};
pub use filter::FilterSpec;
pub use geo::{great_circle_km, Coordinates, DEFAULT_CENTER};
pub use saved::{AuthSession, ListType, SaveAction, SaveRequest, SavedLists};
pub use schedule::{is_open_at, OpeningPeriod};
pub use settings::{load_settings, save_settings, MapTheme, Settings};
pub use venue::{DietaryTag, PriceLevel, Venue};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

//! # probr-settings
//!
//! Configuration for the Probr text-analysis server.
//!
//! Settings are loaded once at startup from three layers (in priority order):
//! 1. **Compiled defaults**: [`Settings::default()`]
//! 2. **Configuration file**: `./config.json` (deep-merged over defaults)
//! 3. **Environment variables**: `PROBR_*` overrides (highest priority)
//!
//! The binary applies CLI flags on top, then calls [`Settings::validate`]
//! before binding any listener. The validated value is shared read-only.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    DEFAULT_CONFIG_PATH, apply_env_overrides, deep_merge, load_settings_from_path, parse_settings,
};
pub use types::{
    LanguageToolSettings, LogFormat, LoggingSettings, MIN_HEARTBEAT_INTERVAL_MS, Settings,
    Transport,
};

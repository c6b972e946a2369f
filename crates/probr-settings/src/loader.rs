//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`Settings::default()`]
//! 2. Deep-merge the JSON configuration file over the defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::Settings;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Load settings from `path` with env var overrides.
///
/// The file must exist; keys it omits fall back to compiled defaults.
/// Validation is left to the caller ([`Settings::validate`]) so that CLI
/// overrides can be applied first.
pub fn load_settings_from_path(path: &Path) -> Result<Settings> {
    debug!(?path, "loading configuration file");
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let mut settings = parse_settings(&content)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Parse a JSON document and merge it over the defaults.
pub fn parse_settings(content: &str) -> Result<Settings> {
    let defaults = serde_json::to_value(Settings::default())?;
    let user: Value = serde_json::from_str(content)?;
    let merged = deep_merge(defaults, user);
    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Invalid values are ignored with a warning (fall back to file/default).
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Some(v) = read_env_string("PROBR_HOST") {
        settings.host = v;
    }
    if let Some(v) = read_env_u16("PROBR_PORT", 0, 65535) {
        settings.port = v;
    }
    if let Some(v) = read_env_u64("PROBR_HEARTBEAT_INTERVAL", 1, 86_400_000) {
        settings.heartbeat_interval = v;
    }
    if let Some(v) = read_env_string("PROBR_TRANSPORT") {
        match v.parse() {
            Ok(transport) => settings.transport = transport,
            Err(e) => tracing::warn!(key = "PROBR_TRANSPORT", value = %v, error = %e, "ignoring env var"),
        }
    }
    if let Some(v) = read_env_string("PROBR_LANGUAGE_TOOL_URL") {
        settings.language_tool.url = v;
    }
    if let Some(v) = read_env_bool("PROBR_LANGUAGE_TOOL_ENABLED") {
        settings.language_tool.enabled = v;
    }
    if let Some(v) = read_env_string("PROBR_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_bool(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    let result = parse_bool(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
    }
    result
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SettingsError;
    use crate::types::{LogFormat, Transport};

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_simple_override() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": 10});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 10);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"language_tool": {"url": "http://a", "language": "en-US"}});
        let source = serde_json::json!({"language_tool": {"url": "http://b"}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["language_tool"]["url"], "http://b");
        assert_eq!(merged["language_tool"]["language"], "en-US");
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4, 5]});
        let merged = deep_merge(target, source);
        assert_eq!(merged["items"], serde_json::json!([4, 5]));
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_new_keys_added() {
        let target = serde_json::json!({"a": 1});
        let source = serde_json::json!({"b": 2});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    // ── parse_settings ──────────────────────────────────────────────

    #[test]
    fn minimal_legacy_config() {
        let settings = parse_settings(r#"{"port": 8000, "heartbeat_interval": 30000}"#).unwrap();
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.heartbeat_interval, 30_000);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.transport, Transport::Both);
    }

    #[test]
    fn empty_object_gives_defaults() {
        let settings = parse_settings("{}").unwrap();
        assert_eq!(settings.port, Settings::default().port);
    }

    #[test]
    fn nested_override() {
        let settings = parse_settings(
            r#"{"language_tool": {"url": "https://api.languagetool.org", "disabled_rules": ["WHITESPACE_RULE"]},
                "logging": {"format": "json"}}"#,
        )
        .unwrap();
        assert_eq!(settings.language_tool.url, "https://api.languagetool.org");
        assert_eq!(settings.language_tool.disabled_rules, vec!["WHITESPACE_RULE"]);
        assert_eq!(settings.language_tool.language, "en-US");
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn invalid_transport_is_json_error() {
        let err = parse_settings(r#"{"transport": "carrier-pigeon"}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn wrong_type_is_json_error() {
        let err = parse_settings(r#"{"port": "eighty"}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    // ── load_settings_from_path ─────────────────────────────────────

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_settings_from_path(Path::new("/nonexistent/config.json")).unwrap_err();
        let SettingsError::ReadConfig { path, .. } = &err else {
            panic!("expected read error, got {err:?}");
        };
        assert_eq!(path, Path::new("/nonexistent/config.json"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"port": 7001, "heartbeat_interval": 20000}"#).unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.port, 7001);
        assert_eq!(settings.heartbeat_interval, 20_000);
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not valid json").unwrap();

        let result = load_settings_from_path(&path);
        assert!(matches!(result.unwrap_err(), SettingsError::Parse(_)));
    }

    // ── parse helpers ───────────────────────────────────────────────

    #[test]
    fn parse_bool_variants() {
        for val in &["true", "1", "yes", "on", "TRUE", "On"] {
            assert_eq!(parse_bool(val), Some(true), "failed for {val}");
        }
        for val in &["false", "0", "no", "off", "NO"] {
            assert_eq!(parse_bool(val), Some(false), "failed for {val}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn parse_u16_range_bounds() {
        assert_eq!(parse_u16_range("6969", 0, 65535), Some(6969));
        assert_eq!(parse_u16_range("0", 1, 65535), None);
        assert_eq!(parse_u16_range("99999", 0, 65535), None);
        assert_eq!(parse_u16_range("port", 0, 65535), None);
    }

    #[test]
    fn parse_u64_range_bounds() {
        assert_eq!(parse_u64_range("10000", 1, 86_400_000), Some(10_000));
        assert_eq!(parse_u64_range("0", 1, 86_400_000), None);
        assert_eq!(parse_u64_range("abc", 1, 86_400_000), None);
    }
}

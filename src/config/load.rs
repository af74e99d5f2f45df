use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `MINDFUL__`) override it, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MINDFUL")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject values the session layer cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.session.default_duration_secs == 0 {
            return Err("session.default_duration_secs must be >= 1".to_string());
        }
        if self.session.duration_presets.is_empty() {
            return Err("session.duration_presets must not be empty".to_string());
        }
        if self.session.duration_presets.contains(&0) {
            return Err("session.duration_presets must all be >= 1".to_string());
        }
        if self.session.dim_brightness > 100 {
            return Err("session.dim_brightness must be <= 100".to_string());
        }
        if self.audio.volume > 100 {
            return Err("audio.volume must be <= 100".to_string());
        }
        if self.audio.fallback_segment.trim_matches('/').trim().is_empty() {
            return Err("audio.fallback_segment must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `MINDFUL_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MINDFUL_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_<KIND>_HOME`, else `~/<fallback>`.
fn xdg_dir(var: &str, fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(fallback))
    }
}

/// Compute the default config path under `$XDG_CONFIG_HOME/mindful/config.toml`
/// or `~/.config/mindful/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("mindful").join("config.toml"))
}

/// `$XDG_STATE_HOME/mindful/mindful.log`, or the temp dir without a home.
pub fn default_log_file() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state")
        .unwrap_or_else(env::temp_dir)
        .join("mindful")
        .join("mindful.log")
}

/// `$XDG_DATA_HOME/mindful`, where `/meditations/...` locators are looked up.
pub fn default_media_root() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share")
        .map(|d| d.join("mindful"))
        .unwrap_or_else(|| PathBuf::from("."))
}

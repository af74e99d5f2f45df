use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::load::{default_log_file, default_media_root};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/mindful/config.toml` or `~/.config/mindful/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MINDFUL__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub session: SessionSettings,
    pub audio: AudioSettings,
    pub display: DisplaySettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Duration a new session starts with (seconds).
    pub default_duration_secs: u64,
    /// Durations offered by the `d` key, in order (seconds).
    pub duration_presets: Vec<u64>,
    /// Brightness percent applied while a session is playing.
    pub dim_brightness: u8,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_duration_secs: 300,
            duration_presets: vec![180, 300, 600],
            dim_brightness: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial volume, 0-100.
    pub volume: u8,
    /// Per-attempt timeout for remote sources (milliseconds).
    pub load_timeout_ms: u64,
    /// Path segment inserted before the file name on the first retry.
    pub fallback_segment: String,
    /// Directory that local and web-style absolute locators resolve under.
    pub media_root: PathBuf,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 80,
            load_timeout_ms: 10_000,
            fallback_segment: "audio".to_string(),
            media_root: default_media_root(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayBackendKind {
    /// Backlight when a writable device exists, otherwise simulated.
    Auto,
    #[serde(alias = "overlay", alias = "sim")]
    Simulated,
    #[serde(alias = "sysfs")]
    Backlight,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub backend: DisplayBackendKind,
    /// Where backlight devices are listed.
    pub backlight_root: PathBuf,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            backend: DisplayBackendKind::Auto,
            backlight_root: PathBuf::from("/sys/class/backlight"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How long a notice stays on screen (milliseconds).
    pub toast_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ breathe in, breathe out ~ ".to_string(),
            toast_ms: 3_000,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[serde(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    /// Log file; the terminal itself belongs to the UI.
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: default_log_file(),
        }
    }
}

/// A user-added meditation, as the "add meditation" form would record it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackEntry {
    pub audio_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory scanned for the user's own recordings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_dir: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Tracks added by hand, appended after the built-ins in this order.
    pub tracks: Vec<TrackEntry>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            user_dir: None,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            tracks: Vec::new(),
        }
    }
}

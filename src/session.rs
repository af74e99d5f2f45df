//! The session playback controller and its value types.
//!
//! A session is one run of a track for a configured duration. The
//! controller owns the audio loader, the countdown and the display adapter
//! for as long as the session lasts, and is the only thing that dims or
//! undims the screen.

mod controller;
mod notice;

use thiserror::Error;

use crate::audio::AudioError;
use crate::config::Settings;
use crate::library::Track;
use crate::timer::TimerError;

pub use controller::SessionController;
pub use notice::{Notice, NoticeAction};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no session is active")]
    NoSession,
    #[error("the duration cannot change while playing")]
    SessionRunning,
    #[error(transparent)]
    Timer(#[from] TimerError),
    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// What the user picked when starting a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    track: Option<Track>,
    duration_secs: u64,
}

impl SessionConfig {
    /// `track: None` falls back to the catalog's default track.
    pub fn new(track: Option<Track>, duration_secs: u64) -> Result<Self, TimerError> {
        if duration_secs == 0 {
            return Err(TimerError::InvalidDuration);
        }
        Ok(Self {
            track,
            duration_secs,
        })
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn track_or<'a>(&'a self, default: &'a Track) -> &'a Track {
        self.track.as_ref().unwrap_or(default)
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn set_duration_secs(&mut self, secs: u64) -> Result<(), TimerError> {
        if secs == 0 {
            return Err(TimerError::InvalidDuration);
        }
        self.duration_secs = secs;
        Ok(())
    }
}

/// Controller knobs taken from the settings file.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub dim_brightness: u8,
    pub fallback_segment: String,
    pub volume: u8,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for SessionOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            dim_brightness: settings.session.dim_brightness,
            fallback_segment: settings.audio.fallback_segment.clone(),
            volume: settings.audio.volume,
        }
    }
}

/// `m:ss`, or `h:mm:ss` from an hour up.
pub fn format_clock(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Label for a duration preset: `"5 min"`, or `m:ss` when not whole minutes.
pub fn duration_label(secs: u64) -> String {
    if secs > 0 && secs % 60 == 0 {
        format!("{} min", secs / 60)
    } else {
        format_clock(secs)
    }
}

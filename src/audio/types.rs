//! Audio-related small types.
//!
//! This module defines the commands sent to the audio thread, the
//! completion events it posts back, the playback state shared with the
//! session layer and the audio error taxonomy.

use thiserror::Error;

/// Identifies one load attempt. Events carrying a ticket other than the
/// loader's current one belong to a cancelled load and are dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub(crate) u64);

impl LoadTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Why a session's audio ended up in `PlaybackState::Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    /// Every load attempt failed.
    Unavailable,
    /// The platform refused to start playback.
    PlaybackRejected(String),
}

/// The playback state of a session. Exactly one holds at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Error(ErrorReason),
}

impl PlaybackState {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading => "Loading",
            Self::Ready => "Ready",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Error(ErrorReason::Unavailable) => "Unavailable",
            Self::Error(ErrorReason::PlaybackRejected(_)) => "Playback rejected",
        }
    }
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Fetch and decode `url`, keeping the result paused.
    Load { ticket: LoadTicket, url: String },
    /// Drop the resource of `ticket` if it is still the current one.
    Cancel(LoadTicket),
    /// Start or resume the resource of `ticket`.
    Play(LoadTicket),
    Pause,
    /// Rewind the current resource to zero.
    SeekToStart,
    /// Linear volume, 0.0..=1.0.
    SetVolume(f32),
    /// Stop and drop the current resource.
    Release,
    /// Quit the audio thread.
    Quit,
}

/// Asynchronous completion posted by an audio backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    Loaded {
        ticket: LoadTicket,
    },
    LoadFailed {
        ticket: LoadTicket,
        reason: String,
    },
    PlaybackRejected {
        ticket: LoadTicket,
        reason: String,
    },
}

impl AudioEvent {
    pub fn ticket(&self) -> LoadTicket {
        match self {
            Self::Loaded { ticket }
            | Self::LoadFailed { ticket, .. }
            | Self::PlaybackRejected { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio is not ready yet")]
    NotReady,
    #[error("failed to load {url}: {reason}")]
    LoadFailure { url: String, reason: String },
    #[error("playback was rejected: {0}")]
    PlaybackRejected(String),
    #[error("audio unavailable after {attempts} attempts")]
    Unavailable { attempts: u8 },
    #[error("no audio source has been loaded")]
    NoSource,
    #[error("audio thread is not running")]
    Disconnected,
}

//! Application model types: `App`, `View`, `Toast` and `SessionView`.
//!
//! `App` holds what only the UI cares about: which screen is shown, the
//! library cursor, the chosen duration preset and the toast queue. Session
//! state itself lives in the controller and is copied into a `SessionView`
//! once per frame.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::audio::{AudioBackend, MAX_RETRIES, PlaybackState};
use crate::display::DisplayBackend;
use crate::library::{Catalog, Track};
use crate::session::{Notice, SessionController};

const MAX_TOASTS: usize = 3;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Library,
    Session,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub is_error: bool,
    pub expires_at: Instant,
}

/// The main application model.
pub struct App {
    pub catalog: Catalog,
    pub view: View,
    pub selected: usize,
    presets: Vec<u64>,
    preset: usize,
    toasts: VecDeque<Toast>,
    toast_ttl: Duration,
}

impl App {
    /// `default_duration` is added to `presets` when it is not one of them.
    pub fn new(catalog: Catalog, presets: &[u64], default_duration: u64, toast_ttl: Duration) -> Self {
        let mut presets: Vec<u64> = presets.iter().copied().filter(|&p| p > 0).collect();
        if default_duration > 0 && !presets.contains(&default_duration) {
            presets.push(default_duration);
        }
        presets.sort_unstable();
        presets.dedup();
        if presets.is_empty() {
            presets.push(crate::library::DEFAULT_TRACK_SECS);
        }
        let preset = presets
            .iter()
            .position(|&p| p == default_duration)
            .unwrap_or(0);

        Self {
            catalog,
            view: View::Library,
            selected: 0,
            presets,
            preset,
            toasts: VecDeque::new(),
            toast_ttl,
        }
    }

    pub fn next(&mut self) {
        if self.selected + 1 < self.catalog.len() {
            self.selected += 1;
        }
    }

    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.catalog.get(self.selected)
    }

    pub fn presets(&self) -> &[u64] {
        &self.presets
    }

    pub fn duration_secs(&self) -> u64 {
        self.presets[self.preset]
    }

    /// Move to the next preset, wrapping around. Returns the new duration.
    pub fn cycle_duration(&mut self) -> u64 {
        self.preset = (self.preset + 1) % self.presets.len();
        self.duration_secs()
    }

    pub fn enter_session(&mut self) {
        self.view = View::Session;
    }

    pub fn enter_library(&mut self) {
        self.view = View::Library;
    }

    pub fn push_notice(&mut self, notice: &Notice, now: Instant) {
        self.push_toast(notice.text(), notice.is_error(), now);
    }

    pub fn push_toast(&mut self, text: impl Into<String>, is_error: bool, now: Instant) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            text: text.into(),
            is_error,
            expires_at: now + self.toast_ttl,
        });
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn clear_toasts(&mut self) {
        self.toasts.clear();
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }
}

/// A per-frame copy of the session for drawing and for MPRIS.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionView {
    pub active: bool,
    pub title: String,
    pub description: String,
    pub state: PlaybackState,
    pub remaining_secs: u64,
    pub duration_secs: u64,
    pub progress: f64,
    pub volume: u8,
    pub complete: bool,
    /// Retry attempt in use, when not the original source.
    pub attempt: Option<u8>,
}

impl SessionView {
    pub fn from_controller<A: AudioBackend, D: DisplayBackend>(c: &SessionController<A, D>) -> Self {
        let track = c.track();
        Self {
            active: c.is_active(),
            title: track.title.clone(),
            description: track.description.clone(),
            state: c.state().clone(),
            remaining_secs: c.remaining_secs(),
            duration_secs: c.duration_secs(),
            progress: c.progress(),
            volume: c.volume(),
            complete: c.is_complete(),
            attempt: c
                .loader()
                .current_attempt()
                .map(|a| a.attempt)
                .filter(|&a| a > 0 && a <= MAX_RETRIES),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

//! Display-state adapter: screen brightness and greyscale during a session.
//!
//! `DisplayBackend` is the platform capability. `DisplayAdapter` wraps one
//! and makes every call idempotent and non-fatal: failures are logged and
//! swallowed, since dimming is cosmetic and playback must go on.

mod backlight;
mod simulated;

use std::path::PathBuf;

use log::{debug, warn};
use thiserror::Error;

pub use backlight::BacklightDisplay;
pub use simulated::{DisplayHandle, DisplayLook, SimulatedDisplay};

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unexpected value {value:?} in {path}")]
    Parse { path: PathBuf, value: String },
    #[error("no backlight device found")]
    NoDevice,
    #[error("display state lock poisoned")]
    Poisoned,
}

/// A platform capability that can change how the screen looks.
pub trait DisplayBackend {
    fn name(&self) -> &'static str;

    /// Relative brightness, 0..=100.
    fn set_brightness(&mut self, percent: u8) -> Result<(), DisplayError>;

    fn set_greyscale(&mut self, enabled: bool) -> Result<(), DisplayError>;

    /// Back to full brightness, greyscale off.
    fn restore(&mut self) -> Result<(), DisplayError> {
        let brightness = self.set_brightness(100);
        let greyscale = self.set_greyscale(false);
        brightness.and(greyscale)
    }

    fn brightness(&self) -> Option<u8> {
        None
    }
}

impl<T: DisplayBackend + ?Sized> DisplayBackend for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), DisplayError> {
        (**self).set_brightness(percent)
    }

    fn set_greyscale(&mut self, enabled: bool) -> Result<(), DisplayError> {
        (**self).set_greyscale(enabled)
    }

    fn restore(&mut self) -> Result<(), DisplayError> {
        (**self).restore()
    }

    fn brightness(&self) -> Option<u8> {
        (**self).brightness()
    }
}

/// The last settings requested through a `DisplayAdapter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub brightness: u8,
    pub greyscale: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            brightness: 100,
            greyscale: false,
        }
    }
}

impl DisplaySettings {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

pub struct DisplayAdapter<B: DisplayBackend> {
    backend: B,
    requested: DisplaySettings,
}

impl<B: DisplayBackend> DisplayAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            requested: DisplaySettings::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn requested(&self) -> DisplaySettings {
        self.requested
    }

    pub fn set_brightness(&mut self, percent: u8) {
        let percent = percent.min(100);
        if self.requested.brightness == percent {
            return;
        }
        self.requested.brightness = percent;
        debug!("{}: brightness {percent}%", self.backend.name());
        if let Err(e) = self.backend.set_brightness(percent) {
            warn!("{}: failed to set brightness: {e}", self.backend.name());
        }
    }

    pub fn set_greyscale(&mut self, enabled: bool) {
        if self.requested.greyscale == enabled {
            return;
        }
        self.requested.greyscale = enabled;
        debug!("{}: greyscale {enabled}", self.backend.name());
        if let Err(e) = self.backend.set_greyscale(enabled) {
            warn!("{}: failed to set greyscale: {e}", self.backend.name());
        }
    }

    /// Undo any dimming. A no-op when nothing was requested.
    pub fn restore_settings(&mut self) {
        if self.requested.is_default() {
            return;
        }
        self.requested = DisplaySettings::default();
        debug!("{}: restoring display", self.backend.name());
        if let Err(e) = self.backend.restore() {
            warn!("{}: failed to restore display: {e}", self.backend.name());
        }
    }

    pub fn current_brightness(&self) -> Option<u8> {
        self.backend.brightness()
    }
}

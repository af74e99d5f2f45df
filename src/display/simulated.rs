use std::sync::{Arc, Mutex};

use super::{DisplayBackend, DisplayError};

/// How the UI should render itself right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLook {
    pub brightness: u8,
    pub greyscale: bool,
}

impl Default for DisplayLook {
    fn default() -> Self {
        Self {
            brightness: 100,
            greyscale: false,
        }
    }
}

impl DisplayLook {
    pub fn is_dimmed(&self) -> bool {
        self.brightness < 100
    }
}

pub type DisplayHandle = Arc<Mutex<DisplayLook>>;

/// Visual-only display control: the terminal UI reads the shared look and
/// draws itself dim and/or colourless.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDisplay {
    look: DisplayHandle,
}

impl SimulatedDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> DisplayHandle {
        self.look.clone()
    }

    fn update(&self, f: impl FnOnce(&mut DisplayLook)) -> Result<(), DisplayError> {
        let mut look = self.look.lock().map_err(|_| DisplayError::Poisoned)?;
        f(&mut look);
        Ok(())
    }
}

impl DisplayBackend for SimulatedDisplay {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), DisplayError> {
        self.update(|look| look.brightness = percent.min(100))
    }

    fn set_greyscale(&mut self, enabled: bool) -> Result<(), DisplayError> {
        self.update(|look| look.greyscale = enabled)
    }

    fn restore(&mut self) -> Result<(), DisplayError> {
        self.update(|look| *look = DisplayLook::default())
    }

    fn brightness(&self) -> Option<u8> {
        self.look.lock().ok().map(|look| look.brightness)
    }
}

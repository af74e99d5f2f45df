use std::error::Error;
use std::fs::{self, File};

use log::{info, warn};
use simplelog::{CombinedLogger, Config, WriteLogger};

use crate::config::{DisplayBackendKind, DisplaySettings, LoggingSettings};
use crate::display::{BacklightDisplay, DisplayBackend, DisplayHandle, SimulatedDisplay};

/// Log to a file; the terminal belongs to the UI.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = settings.file.parent() {
        fs::create_dir_all(dir)?;
    }
    CombinedLogger::init(vec![WriteLogger::new(
        settings.level.to_filter(),
        Config::default(),
        File::create(&settings.file)?,
    )])?;
    Ok(())
}

/// Pick the display backend. The returned handle is what the UI renders from.
pub fn select_display(settings: &DisplaySettings) -> (Box<dyn DisplayBackend>, DisplayHandle) {
    let overlay = SimulatedDisplay::new();
    let look = overlay.handle();

    let backend: Box<dyn DisplayBackend> = match settings.backend {
        DisplayBackendKind::Simulated => Box::new(overlay),
        DisplayBackendKind::Auto | DisplayBackendKind::Backlight => {
            match BacklightDisplay::discover(&settings.backlight_root, overlay.clone()) {
                Ok(b) => Box::new(b),
                Err(e) => {
                    if settings.backend == DisplayBackendKind::Backlight {
                        warn!("backlight unavailable ({e}); falling back to simulated display");
                    }
                    Box::new(overlay)
                }
            }
        }
    };
    info!("display backend: {}", backend.name());
    (backend, look)
}

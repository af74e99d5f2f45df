use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use log::info;

use super::simulated::SimulatedDisplay;
use super::{DisplayBackend, DisplayError};

/// Linux sysfs backlight (`/sys/class/backlight/<device>`).
///
/// 100% is the level the device had when it was opened, so restoring puts
/// the user's own brightness back. There is no greyscale knob in sysfs;
/// greyscale is left to the simulated overlay.
#[derive(Debug)]
pub struct BacklightDisplay {
    dir: PathBuf,
    max: u32,
    original: u32,
    overlay: SimulatedDisplay,
}

fn read_u32(path: &Path) -> Result<u32, DisplayError> {
    let raw = fs::read_to_string(path).map_err(|source| DisplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    raw.trim().parse().map_err(|_| DisplayError::Parse {
        path: path.to_path_buf(),
        value: raw.trim().to_string(),
    })
}

impl BacklightDisplay {
    pub fn open(dir: impl Into<PathBuf>, overlay: SimulatedDisplay) -> Result<Self, DisplayError> {
        let dir = dir.into();
        let max = read_u32(&dir.join("max_brightness"))?;
        let current = read_u32(&dir.join("brightness"))?;
        let original = if current == 0 { max } else { current.min(max) };

        // Fail now rather than on the first dim.
        let brightness = dir.join("brightness");
        OpenOptions::new()
            .write(true)
            .open(&brightness)
            .map_err(|source| DisplayError::Io {
                path: brightness,
                source,
            })?;

        Ok(Self {
            dir,
            max,
            original,
            overlay,
        })
    }

    /// Open the first usable device under `root`, in name order.
    pub fn discover(root: &Path, overlay: SimulatedDisplay) -> Result<Self, DisplayError> {
        let mut dirs: Vec<PathBuf> = fs::read_dir(root)
            .map_err(|source| DisplayError::Io {
                path: root.to_path_buf(),
                source,
            })?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .collect();
        dirs.sort();

        for dir in dirs {
            match Self::open(&dir, overlay.clone()) {
                Ok(device) => {
                    info!("using backlight device {}", dir.display());
                    return Ok(device);
                }
                Err(e) => info!("skipping backlight {}: {e}", dir.display()),
            }
        }
        Err(DisplayError::NoDevice)
    }

    fn level_for(&self, percent: u8) -> u32 {
        let level = u64::from(self.original) * u64::from(percent.min(100)) / 100;
        // Never switch the panel fully off for a non-zero request.
        let level = if percent > 0 { level.max(1) } else { level };
        (level as u32).min(self.max)
    }

    fn write_level(&self, level: u32) -> Result<(), DisplayError> {
        let path = self.dir.join("brightness");
        fs::write(&path, level.to_string()).map_err(|source| DisplayError::Io { path, source })
    }
}

impl DisplayBackend for BacklightDisplay {
    fn name(&self) -> &'static str {
        "backlight"
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), DisplayError> {
        self.write_level(self.level_for(percent))
    }

    fn set_greyscale(&mut self, enabled: bool) -> Result<(), DisplayError> {
        self.overlay.set_greyscale(enabled)
    }

    fn restore(&mut self) -> Result<(), DisplayError> {
        let brightness = self.write_level(self.original);
        let greyscale = self.overlay.set_greyscale(false);
        brightness.and(greyscale)
    }

    fn brightness(&self) -> Option<u8> {
        let current = read_u32(&self.dir.join("brightness")).ok()?;
        let percent = u64::from(current) * 100 / u64::from(self.original.max(1));
        Some(percent.min(100) as u8)
    }
}

//! Recording fakes for the audio and display boundaries.

use crate::audio::{AudioBackend, AudioError, LoadTicket};
use crate::display::{DisplayBackend, DisplayError};

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Load(LoadTicket, String),
    Cancel(LoadTicket),
    Play(LoadTicket),
    Pause,
    SeekToStart,
    SetVolume(f32),
    Release,
}

#[derive(Debug, Default)]
pub struct FakeAudio {
    pub calls: Vec<AudioCall>,
    /// When set, `play` refuses synchronously with this reason.
    pub reject_play: Option<String>,
}

impl FakeAudio {
    pub fn loaded_urls(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                AudioCall::Load(_, url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: fn(&AudioCall) -> bool) -> usize {
        self.calls.iter().filter(|c| wanted(c)).count()
    }

    pub fn plays(&self) -> usize {
        self.count(|c| matches!(c, AudioCall::Play(_)))
    }

    pub fn releases(&self) -> usize {
        self.count(|c| matches!(c, AudioCall::Release))
    }

    pub fn last_volume(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            AudioCall::SetVolume(v) => Some(*v),
            _ => None,
        })
    }
}

impl AudioBackend for FakeAudio {
    fn load(&mut self, ticket: LoadTicket, url: &str) {
        self.calls.push(AudioCall::Load(ticket, url.to_string()));
    }

    fn cancel(&mut self, ticket: LoadTicket) {
        self.calls.push(AudioCall::Cancel(ticket));
    }

    fn play(&mut self, ticket: LoadTicket) -> Result<(), AudioError> {
        self.calls.push(AudioCall::Play(ticket));
        match &self.reject_play {
            Some(reason) => Err(AudioError::PlaybackRejected(reason.clone())),
            None => Ok(()),
        }
    }

    fn pause(&mut self) {
        self.calls.push(AudioCall::Pause);
    }

    fn seek_to_start(&mut self) {
        self.calls.push(AudioCall::SeekToStart);
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(AudioCall::SetVolume(volume));
    }

    fn release(&mut self) {
        self.calls.push(AudioCall::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCall {
    Brightness(u8),
    Greyscale(bool),
    Restore,
}

#[derive(Debug)]
pub struct FakeDisplay {
    pub calls: Vec<DisplayCall>,
    pub fail: bool,
    pub brightness: u8,
    pub greyscale: bool,
}

impl Default for FakeDisplay {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            fail: false,
            brightness: 100,
            greyscale: false,
        }
    }
}

impl FakeDisplay {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self, call: DisplayCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    pub fn is_dimmed(&self) -> bool {
        self.brightness < 100 || self.greyscale
    }

    fn outcome(&self) -> Result<(), DisplayError> {
        if self.fail {
            Err(DisplayError::NoDevice)
        } else {
            Ok(())
        }
    }
}

impl DisplayBackend for FakeDisplay {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), DisplayError> {
        self.calls.push(DisplayCall::Brightness(percent));
        self.outcome()?;
        self.brightness = percent;
        Ok(())
    }

    fn set_greyscale(&mut self, enabled: bool) -> Result<(), DisplayError> {
        self.calls.push(DisplayCall::Greyscale(enabled));
        self.outcome()?;
        self.greyscale = enabled;
        Ok(())
    }

    fn restore(&mut self) -> Result<(), DisplayError> {
        self.calls.push(DisplayCall::Restore);
        self.outcome()?;
        self.brightness = 100;
        self.greyscale = false;
        Ok(())
    }

    fn brightness(&self) -> Option<u8> {
        Some(self.brightness)
    }
}

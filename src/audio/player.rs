use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;

use super::backend::AudioBackend;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioError, AudioEvent, LoadTicket};

/// Handle to the rodio audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

/// Where and how the audio thread fetches sources.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub media_root: PathBuf,
    pub load_timeout: Duration,
}

impl From<&AudioSettings> for SourceOptions {
    fn from(settings: &AudioSettings) -> Self {
        Self {
            media_root: settings.media_root.clone(),
            load_timeout: Duration::from_millis(settings.load_timeout_ms),
        }
    }
}

impl AudioPlayer {
    /// Spawn the audio thread. Completions arrive on the returned receiver.
    pub fn new(options: SourceOptions) -> (Self, Receiver<AudioEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events_rx) = mpsc::channel::<AudioEvent>();

        let handle = spawn_audio_thread(rx, events_tx, options);

        (
            Self {
                tx,
                join: Mutex::new(Some(handle)),
            },
            events_rx,
        )
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Ask the thread to quit and wait for it.
    pub fn shutdown(&self) {
        let _ = self.send(AudioCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl AudioBackend for AudioPlayer {
    fn load(&mut self, ticket: LoadTicket, url: &str) {
        let _ = self.send(AudioCmd::Load {
            ticket,
            url: url.to_string(),
        });
    }

    fn cancel(&mut self, ticket: LoadTicket) {
        let _ = self.send(AudioCmd::Cancel(ticket));
    }

    fn play(&mut self, ticket: LoadTicket) -> Result<(), AudioError> {
        self.send(AudioCmd::Play(ticket))
            .map_err(|_| AudioError::Disconnected)
    }

    fn pause(&mut self) {
        let _ = self.send(AudioCmd::Pause);
    }

    fn seek_to_start(&mut self) {
        let _ = self.send(AudioCmd::SeekToStart);
    }

    fn set_volume(&mut self, volume: f32) {
        let _ = self.send(AudioCmd::SetVolume(volume.clamp(0.0, 1.0)));
    }

    fn release(&mut self) {
        let _ = self.send(AudioCmd::Release);
    }
}

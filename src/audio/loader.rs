//! The audio loader state machine.
//!
//! `Idle -> Loading -> {Ready, Error}`, then `Ready <-> Playing/Paused`.
//! Loads are asynchronous: the backend reports back with an `AudioEvent`
//! that the owner feeds into `AudioLoader::handle_event`. Load failures walk
//! the `RetrySequence`; playback rejections are surfaced immediately.

use log::{debug, info, warn};

use super::backend::AudioBackend;
use super::retry::{LoadAttempt, MAX_RETRIES, RetrySequence};
use super::types::{AudioError, AudioEvent, ErrorReason, LoadTicket, PlaybackState};

/// What a handled event changed, for the session layer to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderUpdate {
    Ready(LoadAttempt),
    Retrying { next: LoadAttempt, reason: String },
    Unavailable { attempts: u8, reason: String },
    PlaybackRejected(String),
}

pub struct AudioLoader<B: AudioBackend> {
    backend: B,
    state: PlaybackState,
    sequence: Option<RetrySequence>,
    fallback_segment: String,
    current: Option<LoadTicket>,
    next_ticket: u64,
    volume: u8,
}

impl<B: AudioBackend> AudioLoader<B> {
    pub fn new(backend: B, fallback_segment: impl Into<String>, volume: u8) -> Self {
        let mut loader = Self {
            backend,
            state: PlaybackState::Idle,
            sequence: None,
            fallback_segment: fallback_segment.into(),
            current: None,
            next_ticket: 0,
            volume: volume.min(100),
        };
        loader.backend.set_volume(f32::from(loader.volume) / 100.0);
        loader
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Ticket of the in-flight or settled load, if any.
    pub fn current_ticket(&self) -> Option<LoadTicket> {
        self.current
    }

    pub fn current_attempt(&self) -> Option<LoadAttempt> {
        self.sequence.as_ref().map(RetrySequence::current)
    }

    /// Start loading `source_url`, discarding any previous load.
    pub fn load(&mut self, source_url: &str) {
        self.sequence = Some(RetrySequence::new(source_url, self.fallback_segment.as_str()));
        self.begin_attempt();
    }

    /// Re-run the whole sequence from the original locator.
    pub fn retry_from_start(&mut self) -> Result<(), AudioError> {
        self.restart_sequence_at(0)
    }

    /// Re-enter the sequence at the first alternative locator.
    pub fn try_alternative_source(&mut self) -> Result<(), AudioError> {
        self.restart_sequence_at(1)
    }

    fn restart_sequence_at(&mut self, attempt: u8) -> Result<(), AudioError> {
        let seq = self.sequence.as_mut().ok_or(AudioError::NoSource)?;
        seq.restart_at(attempt);
        self.begin_attempt();
        Ok(())
    }

    fn begin_attempt(&mut self) {
        let Some(attempt) = self.current_attempt() else {
            return;
        };
        if let Some(old) = self.current.take() {
            self.backend.cancel(old);
        }

        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.current = Some(ticket);
        self.state = PlaybackState::Loading;

        debug!(
            "load #{} attempt {} -> {}",
            ticket.id(),
            attempt.attempt,
            attempt.url
        );
        self.backend.set_volume(f32::from(self.volume) / 100.0);
        self.backend.load(ticket, &attempt.url);
    }

    pub fn play(&mut self) -> Result<(), AudioError> {
        match self.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Ready | PlaybackState::Paused => {
                let ticket = self.current.ok_or(AudioError::NotReady)?;
                match self.backend.play(ticket) {
                    Ok(()) => {
                        self.state = PlaybackState::Playing;
                        Ok(())
                    }
                    Err(e) => {
                        let reason = match e {
                            AudioError::PlaybackRejected(reason) => reason,
                            other => other.to_string(),
                        };
                        warn!("playback rejected: {reason}");
                        self.state = PlaybackState::Error(ErrorReason::PlaybackRejected(reason.clone()));
                        Err(AudioError::PlaybackRejected(reason))
                    }
                }
            }
            PlaybackState::Idle | PlaybackState::Loading | PlaybackState::Error(_) => {
                Err(AudioError::NotReady)
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.backend.pause();
            self.state = PlaybackState::Paused;
        }
    }

    pub fn seek_to_start(&mut self) -> Result<(), AudioError> {
        if self.state == PlaybackState::Loading {
            return Err(AudioError::NotReady);
        }
        self.backend.seek_to_start();
        Ok(())
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
        self.backend.set_volume(f32::from(self.volume) / 100.0);
    }

    /// Cancel any in-flight load, stop and drop the resource.
    pub fn release(&mut self) {
        if let Some(old) = self.current.take() {
            self.backend.cancel(old);
        }
        self.backend.release();
        self.sequence = None;
        self.state = PlaybackState::Idle;
    }

    pub fn handle_event(&mut self, event: AudioEvent) -> Option<LoaderUpdate> {
        if Some(event.ticket()) != self.current {
            debug!("ignoring stale audio event {event:?}");
            return None;
        }

        match event {
            AudioEvent::Loaded { .. } => {
                if self.state != PlaybackState::Loading {
                    return None;
                }
                self.state = PlaybackState::Ready;
                let attempt = self.current_attempt()?;
                info!("audio ready after attempt {}: {}", attempt.attempt, attempt.url);
                Some(LoaderUpdate::Ready(attempt))
            }
            AudioEvent::LoadFailed { reason, .. } => {
                if self.state != PlaybackState::Loading {
                    return None;
                }
                let seq = self.sequence.as_mut()?;
                let failure = AudioError::LoadFailure {
                    url: seq.current().url,
                    reason: reason.clone(),
                };
                match seq.advance() {
                    Some(next) => {
                        info!(
                            "{failure}; retry {}/{MAX_RETRIES} with {}",
                            next.attempt, next.url
                        );
                        self.begin_attempt();
                        Some(LoaderUpdate::Retrying { next, reason })
                    }
                    None => {
                        let attempts = seq.attempts_made();
                        warn!(
                            "audio for {} unavailable after {attempts} attempts: {failure}",
                            seq.original()
                        );
                        self.state = PlaybackState::Error(ErrorReason::Unavailable);
                        Some(LoaderUpdate::Unavailable { attempts, reason })
                    }
                }
            }
            AudioEvent::PlaybackRejected { reason, .. } => {
                if !matches!(
                    self.state,
                    PlaybackState::Playing | PlaybackState::Paused | PlaybackState::Ready
                ) {
                    return None;
                }
                warn!("playback rejected: {reason}");
                self.state = PlaybackState::Error(ErrorReason::PlaybackRejected(reason.clone()));
                Some(LoaderUpdate::PlaybackRejected(reason))
            }
        }
    }
}

use std::collections::VecDeque;
use std::time::Instant;

use log::{debug, info, warn};

use crate::audio::{AudioBackend, AudioError, AudioEvent, AudioLoader, LoaderUpdate, PlaybackState};
use crate::display::{DisplayAdapter, DisplayBackend};
use crate::library::Track;
use crate::timer::{Countdown, TimerEvent};

use super::notice::{Notice, NoticeAction};
use super::{SessionConfig, SessionError, SessionOptions};

/// Runs one session at a time over an audio backend and a display backend.
///
/// Teardown order on every exit path: stop timer, pause audio, restore
/// display, release audio, clear state. It runs at most once per session.
pub struct SessionController<A: AudioBackend, D: DisplayBackend> {
    loader: AudioLoader<A>,
    display: DisplayAdapter<D>,
    countdown: Countdown,
    default_track: Track,
    config: Option<SessionConfig>,
    dim_brightness: u8,
    dimmed: bool,
    active: bool,
    play_requested: bool,
    notices: VecDeque<Notice>,
}

impl<A: AudioBackend, D: DisplayBackend> SessionController<A, D> {
    pub fn new(audio: A, display: D, default_track: Track, options: SessionOptions) -> Self {
        Self {
            loader: AudioLoader::new(audio, options.fallback_segment, options.volume),
            display: DisplayAdapter::new(display),
            countdown: Countdown::new(default_track.duration_secs),
            default_track,
            config: None,
            dim_brightness: options.dim_brightness.min(100),
            dimmed: false,
            active: false,
            play_requested: false,
            notices: VecDeque::new(),
        }
    }

    /// Begin a session, tearing down the previous one first.
    pub fn start(&mut self, config: SessionConfig) {
        self.teardown();

        let duration = config.duration_secs();
        let url = config.track_or(&self.default_track).audio_url.clone();
        info!(
            "session start: {} for {duration}s",
            config.track_or(&self.default_track).title
        );

        self.loader.load(&url);
        // SessionConfig guarantees a positive duration.
        if let Err(e) = self.countdown.reset(duration) {
            warn!("countdown reset failed: {e}");
        }
        self.config = Some(config);
        self.dimmed = false;
        self.play_requested = false;
        self.active = true;
    }

    pub fn play(&mut self, now: Instant) -> Result<(), SessionError> {
        if !self.active {
            return Err(SessionError::NoSession);
        }

        match self.loader.state().clone() {
            PlaybackState::Playing => return Ok(()),
            PlaybackState::Idle | PlaybackState::Loading => {
                self.notify(Notice::StillLoading);
                return Ok(());
            }
            PlaybackState::Error(_) => {
                info!("play while in error: reloading from the original source");
                self.loader.retry_from_start()?;
                self.notify(Notice::Loading);
                return Ok(());
            }
            PlaybackState::Ready | PlaybackState::Paused => {}
        }

        if self.countdown.is_complete() {
            // Replaying a finished session starts from the top.
            if let Err(e) = self.loader.seek_to_start() {
                debug!("seek before replay failed: {e}");
            }
        }

        if let Err(e) = self.loader.play() {
            self.audio_failed(e.to_string(), Some(NoticeAction::Retry));
            return Err(e.into());
        }
        self.play_requested = true;
        self.dim();

        if self.countdown.is_paused() {
            self.countdown.resume(now);
        } else if !self.countdown.is_running() {
            let duration = self.duration_secs();
            self.countdown.start(duration, now)?;
        }
        Ok(())
    }

    /// Pause audio and countdown. The display stays dimmed.
    pub fn pause(&mut self) {
        if !self.active {
            return;
        }
        self.loader.pause();
        self.countdown.pause();
        self.play_requested = false;
    }

    pub fn toggle(&mut self, now: Instant) -> Result<(), SessionError> {
        if self.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play(now)
        }
    }

    /// Rewind audio and countdown without playing.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if !self.active {
            return Err(SessionError::NoSession);
        }
        self.loader.pause();
        if let Err(e) = self.loader.seek_to_start() {
            debug!("restart while loading: {e}");
        }
        let duration = self.duration_secs();
        self.countdown.reset(duration)?;
        self.play_requested = false;
        Ok(())
    }

    pub fn set_duration(&mut self, secs: u64) -> Result<(), SessionError> {
        if !self.active {
            return Err(SessionError::NoSession);
        }
        if self.is_playing() {
            return Err(SessionError::SessionRunning);
        }
        self.countdown.reset(secs)?;
        if let Some(config) = self.config.as_mut() {
            config.set_duration_secs(secs)?;
        }
        Ok(())
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.loader.set_volume(volume);
    }

    /// Re-enter the retry sequence at the first alternative locator.
    pub fn try_alternative_source(&mut self) -> Result<(), SessionError> {
        if !self.active {
            return Err(SessionError::NoSession);
        }
        self.countdown.pause();
        self.play_requested = false;
        self.loader.try_alternative_source()?;
        self.notify(Notice::Loading);
        Ok(())
    }

    /// Advance the countdown; completion ends playback and restores the display.
    pub fn tick(&mut self, now: Instant) -> Vec<TimerEvent> {
        if !self.active {
            return Vec::new();
        }
        let events = self.countdown.poll(now);
        if events.contains(&TimerEvent::Complete) {
            self.complete();
        }
        events
    }

    pub fn handle_audio_event(&mut self, event: AudioEvent) {
        if !self.active {
            debug!("no session; dropping {event:?}");
            return;
        }
        let Some(update) = self.loader.handle_event(event) else {
            return;
        };
        match update {
            LoaderUpdate::Ready(attempt) => {
                if attempt.attempt > 0 {
                    info!("using alternative source {}", attempt.url);
                }
            }
            LoaderUpdate::Retrying { next, .. } => {
                self.notify(Notice::Retrying {
                    attempt: next.attempt,
                });
            }
            LoaderUpdate::Unavailable { attempts, .. } => {
                self.audio_failed(
                    AudioError::Unavailable { attempts }.to_string(),
                    Some(NoticeAction::TryAlternativeSource),
                );
            }
            LoaderUpdate::PlaybackRejected(reason) => {
                self.audio_failed(
                    format!("Playback was blocked: {reason}"),
                    Some(NoticeAction::Retry),
                );
            }
        }
    }

    /// End the session on the user's request: teardown, then forget the config.
    pub fn end_session(&mut self) {
        if self.active {
            info!("session ended by user");
        }
        self.teardown();
    }

    /// Undo everything the session did. Safe to call any number of times.
    pub fn teardown(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        self.countdown.stop();
        self.loader.pause();
        if self.dimmed {
            self.display.restore_settings();
            self.dimmed = false;
        }
        self.loader.release();
        self.config = None;
        self.play_requested = false;
        self.notices.clear();
        debug!("session torn down");
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn state(&self) -> &PlaybackState {
        self.loader.state()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_playing(&self) -> bool {
        *self.loader.state() == PlaybackState::Playing
    }

    pub fn is_dimmed(&self) -> bool {
        self.dimmed
    }

    pub fn play_requested(&self) -> bool {
        self.play_requested
    }

    pub fn is_complete(&self) -> bool {
        self.countdown.is_complete()
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    /// The session's track, or the default when none was picked.
    pub fn track(&self) -> &Track {
        match &self.config {
            Some(c) => c.track_or(&self.default_track),
            None => &self.default_track,
        }
    }

    pub fn duration_secs(&self) -> u64 {
        self.config
            .as_ref()
            .map(SessionConfig::duration_secs)
            .unwrap_or(self.default_track.duration_secs)
    }

    pub fn remaining_secs(&self) -> u64 {
        self.countdown.remaining()
    }

    /// Elapsed share of the session, 0.0..=1.0.
    pub fn progress(&self) -> f64 {
        let total = self.duration_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_secs());
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn volume(&self) -> u8 {
        self.loader.volume()
    }

    pub fn loader(&self) -> &AudioLoader<A> {
        &self.loader
    }

    pub fn display(&self) -> &DisplayAdapter<D> {
        &self.display
    }

    fn dim(&mut self) {
        if self.dimmed {
            return;
        }
        self.display.set_brightness(self.dim_brightness);
        self.display.set_greyscale(true);
        self.dimmed = true;
    }

    fn complete(&mut self) {
        info!("session complete");
        self.loader.pause();
        if self.dimmed {
            self.display.restore_settings();
            self.dimmed = false;
        }
        self.play_requested = false;
        self.notify(Notice::Completed);
    }

    // Dimming is left alone: only ending the session undims.
    fn audio_failed(&mut self, message: String, action: Option<NoticeAction>) {
        self.countdown.pause();
        self.play_requested = false;
        self.notify(Notice::Error { message, action });
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }
}

impl<A: AudioBackend, D: DisplayBackend> Drop for SessionController<A, D> {
    fn drop(&mut self) {
        self.teardown();
    }
}


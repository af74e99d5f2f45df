use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::debug;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, SessionView, View};
use crate::audio::{AudioBackend, AudioEvent};
use crate::config;
use crate::display::{DisplayBackend, DisplayHandle};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{MprisSnapshot, update_mpris};
use crate::session::{SessionConfig, SessionController, SessionError};
use crate::ui;

const VOLUME_STEP: u8 = 5;
const POLL: Duration = Duration::from_millis(100);

/// Whether the loop should keep going after handling an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the loop reads from besides the keyboard.
pub struct Inputs<'a> {
    pub audio_events: &'a Receiver<AudioEvent>,
    pub control_rx: &'a Receiver<ControlCmd>,
    pub look: &'a DisplayHandle,
    pub mpris: &'a MprisHandle,
}

/// Main terminal event loop: feeds audio completions, remote commands and
/// the clock into the controller, then draws. Returns `Ok(())` on quit.
pub fn run<A: AudioBackend, D: DisplayBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut SessionController<A, D>,
    inputs: Inputs<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_mpris = MprisSnapshot::default();

    loop {
        let now = Instant::now();

        while let Ok(ev) = inputs.audio_events.try_recv() {
            controller.handle_audio_event(ev);
        }

        while let Ok(cmd) = inputs.control_rx.try_recv() {
            if handle_control_cmd(cmd, app, controller, now) == Flow::Quit {
                return Ok(());
            }
        }

        controller.tick(now);
        for notice in controller.drain_notices() {
            app.push_notice(&notice, now);
        }
        app.expire_toasts(now);

        let view = SessionView::from_controller(controller);
        update_mpris(inputs.mpris, &view, controller.track(), &mut last_mpris);

        let look = inputs.look.lock().map(|l| *l).unwrap_or_default();
        terminal.draw(|f| ui::draw(f, app, &view, look, &settings.ui))?;

        if event::poll(POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, controller, Instant::now()) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Errors the user caused get a toast; audio errors already produced a notice.
fn report(app: &mut App, result: Result<(), SessionError>, now: Instant) {
    match result {
        Ok(()) => {}
        Err(SessionError::Audio(e)) => debug!("audio: {e}"),
        Err(e) => app.push_toast(e.to_string(), true, now),
    }
}

pub fn handle_control_cmd<A: AudioBackend, D: DisplayBackend>(
    cmd: ControlCmd,
    app: &mut App,
    controller: &mut SessionController<A, D>,
    now: Instant,
) -> Flow {
    match cmd {
        ControlCmd::Quit => return Flow::Quit,
        ControlCmd::Play => {
            if controller.is_active() {
                let r = controller.play(now);
                report(app, r, now);
            }
        }
        ControlCmd::Pause => controller.pause(),
        ControlCmd::PlayPause => {
            if controller.is_active() {
                let r = controller.toggle(now);
                report(app, r, now);
            }
        }
        ControlCmd::Stop => end_session(app, controller),
    }
    Flow::Continue
}

fn end_session<A: AudioBackend, D: DisplayBackend>(
    app: &mut App,
    controller: &mut SessionController<A, D>,
) {
    controller.end_session();
    app.clear_toasts();
    app.enter_library();
}

pub fn handle_key_event<A: AudioBackend, D: DisplayBackend>(
    key: KeyEvent,
    app: &mut App,
    controller: &mut SessionController<A, D>,
    now: Instant,
) -> Flow {
    if key.code == KeyCode::Char('q') {
        return Flow::Quit;
    }

    match app.view {
        View::Library => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.next(),
            KeyCode::Char('k') | KeyCode::Up => app.prev(),
            KeyCode::Char('d') => {
                app.cycle_duration();
            }
            KeyCode::Enter => {
                let track = app.selected_track().cloned();
                match SessionConfig::new(track, app.duration_secs()) {
                    Ok(config) => {
                        controller.start(config);
                        app.clear_toasts();
                        app.enter_session();
                    }
                    Err(e) => app.push_toast(e.to_string(), true, now),
                }
            }
            _ => {}
        },
        View::Session => match key.code {
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                let r = controller.toggle(now);
                report(app, r, now);
            }
            KeyCode::Char('b') => {
                let r = controller.restart();
                report(app, r, now);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                controller.set_volume(controller.volume().saturating_add(VOLUME_STEP));
            }
            KeyCode::Char('-') => {
                controller.set_volume(controller.volume().saturating_sub(VOLUME_STEP));
            }
            KeyCode::Char('d') => {
                if controller.is_playing() {
                    report(app, Err(SessionError::SessionRunning), now);
                } else {
                    let secs = app.cycle_duration();
                    let r = controller.set_duration(secs);
                    report(app, r, now);
                }
            }
            KeyCode::Char('a') => {
                let r = controller.try_alternative_source();
                report(app, r, now);
            }
            KeyCode::Esc | KeyCode::Char('x') => end_session(app, controller),
            _ => {}
        },
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::PlaybackState;
    use crate::library::Catalog;
    use crate::session::SessionOptions;
    use crate::testing::{FakeAudio, FakeDisplay};
    use crossterm::event::KeyModifiers;

    type Controller = SessionController<FakeAudio, FakeDisplay>;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn setup() -> (App, Controller) {
        let catalog = Catalog::new(Vec::new());
        let controller = SessionController::new(
            FakeAudio::default(),
            FakeDisplay::default(),
            catalog.default_track().clone(),
            SessionOptions::default(),
        );
        let app = App::new(catalog, &[180, 300, 600], 300, Duration::from_secs(3));
        (app, controller)
    }

    fn ready(c: &mut Controller) {
        let ticket = c.loader().current_ticket().unwrap();
        c.handle_audio_event(AudioEvent::Loaded { ticket });
    }

    #[test]
    fn enter_starts_a_session_with_the_selected_track_and_preset() {
        let now = Instant::now();
        let (mut app, mut c) = setup();

        handle_key_event(key(KeyCode::Char('j')), &mut app, &mut c, now);
        handle_key_event(key(KeyCode::Char('d')), &mut app, &mut c, now);
        handle_key_event(key(KeyCode::Enter), &mut app, &mut c, now);

        assert_eq!(app.view, View::Session);
        assert_eq!(c.track().title, "Breath Awareness");
        assert_eq!(c.duration_secs(), 600);
        assert_eq!(*c.state(), PlaybackState::Loading);
    }

    #[test]
    fn escape_ends_the_session_and_returns_to_library() {
        let now = Instant::now();
        let (mut app, mut c) = setup();
        handle_key_event(key(KeyCode::Enter), &mut app, &mut c, now);
        ready(&mut c);
        handle_key_event(key(KeyCode::Char(' ')), &mut app, &mut c, now);
        assert!(c.is_dimmed());

        handle_key_event(key(KeyCode::Esc), &mut app, &mut c, now);

        assert_eq!(app.view, View::Library);
        assert!(!c.is_active());
        assert!(!c.is_dimmed());
    }

    #[test]
    fn duration_key_is_refused_while_playing() {
        let now = Instant::now();
        let (mut app, mut c) = setup();
        handle_key_event(key(KeyCode::Enter), &mut app, &mut c, now);
        ready(&mut c);
        handle_key_event(key(KeyCode::Char('p')), &mut app, &mut c, now);

        handle_key_event(key(KeyCode::Char('d')), &mut app, &mut c, now);

        assert_eq!(app.duration_secs(), 300);
        assert_eq!(c.duration_secs(), 300);
        assert!(app.toasts().any(|t| t.is_error));
    }

    #[test]
    fn volume_keys_step_by_five() {
        let now = Instant::now();
        let (mut app, mut c) = setup();
        handle_key_event(key(KeyCode::Enter), &mut app, &mut c, now);

        handle_key_event(key(KeyCode::Char('+')), &mut app, &mut c, now);
        assert_eq!(c.volume(), 85);
        handle_key_event(key(KeyCode::Char('-')), &mut app, &mut c, now);
        handle_key_event(key(KeyCode::Char('-')), &mut app, &mut c, now);
        assert_eq!(c.volume(), 75);
    }

    #[test]
    fn remote_stop_ends_and_quit_quits() {
        let now = Instant::now();
        let (mut app, mut c) = setup();
        handle_key_event(key(KeyCode::Enter), &mut app, &mut c, now);

        assert_eq!(
            handle_control_cmd(ControlCmd::Stop, &mut app, &mut c, now),
            Flow::Continue
        );
        assert!(!c.is_active());
        assert_eq!(app.view, View::Library);

        // Play without a session does nothing.
        handle_control_cmd(ControlCmd::Play, &mut app, &mut c, now);
        assert_eq!(app.toasts().count(), 0);

        assert_eq!(
            handle_control_cmd(ControlCmd::Quit, &mut app, &mut c, now),
            Flow::Quit
        );
    }

    #[test]
    fn q_quits_from_any_view() {
        let now = Instant::now();
        let (mut app, mut c) = setup();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), &mut app, &mut c, now),
            Flow::Quit
        );
        handle_key_event(key(KeyCode::Enter), &mut app, &mut c, now);
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), &mut app, &mut c, now),
            Flow::Quit
        );
    }
}

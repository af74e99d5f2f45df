use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioPlayer, SourceOptions};
use crate::library::Catalog;
use crate::mpris::ControlCmd;
use crate::session::{SessionController, SessionOptions};

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    if let Err(e) = startup::init_logging(&settings.logging) {
        eprintln!(
            "mindful: cannot log to {}: {e}",
            settings.logging.file.display()
        );
    }
    info!("mindful starting");

    let catalog = Catalog::load(&settings.library);
    let (display, look) = startup::select_display(&settings.display);
    let (audio_player, audio_events) = AudioPlayer::new(SourceOptions::from(&settings.audio));

    let mut controller = SessionController::new(
        audio_player,
        display,
        catalog.default_track().clone(),
        SessionOptions::from(&settings),
    );
    let mut app = App::new(
        catalog,
        &settings.session.duration_presets,
        settings.session.default_duration_secs,
        Duration::from_millis(settings.ui.toast_ms),
    );

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        event_loop::Inputs {
            audio_events: &audio_events,
            control_rx: &control_rx,
            look: &look,
            mpris: &mpris,
        },
    );

    // Undim before giving the terminal back.
    controller.teardown();
    controller.loader().backend().shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        warn!("event loop failed: {e}");
    }
    info!("mindful stopped");
    run_result
}

//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the library and session screens with `ratatui`.
//! When the simulated display is in use, the whole palette follows the
//! published `DisplayLook`: lower brightness darkens every colour and
//! greyscale drops the hue.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, SessionView, View};
use crate::audio::PlaybackState;
use crate::config::UiSettings;
use crate::display::DisplayLook;
use crate::session::{duration_label, format_clock};

const LIBRARY_CONTROLS: &str = "[j/k] up/down | [enter] start session | [d] duration | [q] quit";
const SESSION_CONTROLS: &str = "[space/p] play/pause | [b] restart | [+/-] volume | [d] duration | [a] alternative source | [esc/x] end | [q] quit";

const TEXT: (u8, u8, u8) = (220, 220, 220);
const ACCENT: (u8, u8, u8) = (120, 190, 160);
const ERROR: (u8, u8, u8) = (230, 110, 100);

/// Colours for one frame, derived from the display look.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub accent: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_look(look: DisplayLook) -> Self {
        Self {
            text: shade(TEXT, look),
            accent: shade(ACCENT, look),
            error: shade(ERROR, look),
        }
    }
}

/// Scale `rgb` by the look's brightness, desaturating it when greyscale is on.
pub fn shade((r, g, b): (u8, u8, u8), look: DisplayLook) -> Color {
    let (r, g, b) = if look.greyscale {
        // Rec. 601 luma.
        let y = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
        (y, y, y)
    } else {
        (u32::from(r), u32::from(g), u32::from(b))
    };
    let pct = u32::from(look.brightness.min(100));
    let scale = |c: u32| u8::try_from(c * pct / 100).unwrap_or(u8::MAX);
    Color::Rgb(scale(r), scale(g), scale(b))
}

fn state_label(view: &SessionView) -> String {
    match &view.state {
        PlaybackState::Paused if view.complete => "Complete".to_string(),
        PlaybackState::Loading => match view.attempt {
            Some(n) => format!("Loading (alternative source {n})"),
            None => "Loading".to_string(),
        },
        other => other.label().to_string(),
    }
}

fn presets_line(app: &App, palette: Palette) -> Line<'static> {
    let current = app.duration_secs();
    let mut spans = vec![Span::raw("Duration: ")];
    for (i, &p) in app.presets().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let label = duration_label(p);
        if p == current {
            spans.push(Span::styled(
                format!("[{label}]"),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(label));
        }
    }
    Line::from(spans)
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn draw_library(frame: &mut Frame, app: &App, area: Rect, palette: Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = app
        .catalog
        .tracks()
        .iter()
        .map(|t| {
            let mut spans = vec![
                Span::raw(t.title.clone()),
                Span::styled(
                    format!("  {}", duration_label(t.duration_secs)),
                    Style::default().fg(palette.accent),
                ),
            ];
            if !t.built_in {
                spans.push(Span::raw("  (yours)"));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .style(Style::default().fg(palette.text))
        .block(Block::default().borders(Borders::ALL).title(" meditations "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !app.catalog.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let description = app
        .selected_track()
        .map(|t| t.description.clone())
        .unwrap_or_default();
    let info = Paragraph::new(vec![presets_line(app, palette), Line::from(description)])
        .style(Style::default().fg(palette.text))
        .block(Block::default().borders(Borders::LEFT | Borders::RIGHT))
        .wrap(Wrap { trim: true });
    frame.render_widget(info, chunks[1]);
}

fn draw_session(frame: &mut Frame, app: &App, view: &SessionView, area: Rect, palette: Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(area);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            view.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(view.description.clone()),
    ])
    .style(Style::default().fg(palette.text))
    .block(bordered(" session "))
    .wrap(Wrap { trim: true });
    frame.render_widget(heading, chunks[0]);

    let state_style = if view.state.is_error() {
        Style::default().fg(palette.error)
    } else {
        Style::default().fg(palette.accent)
    };
    let clock = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_clock(view.remaining_secs),
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(state_label(view), state_style)),
        Line::from(format!("Volume {}%", view.volume)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(clock, chunks[1]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(palette.accent))
        .ratio(view.progress.clamp(0.0, 1.0))
        .label(format!(
            "{} / {}",
            format_clock(view.duration_secs.saturating_sub(view.remaining_secs)),
            format_clock(view.duration_secs)
        ));
    frame.render_widget(gauge, chunks[2]);

    // Presets are only offered while nothing is playing.
    if !view.is_playing() {
        let presets = Paragraph::new(presets_line(app, palette))
            .style(Style::default().fg(palette.text))
            .alignment(Alignment::Center);
        frame.render_widget(presets, chunks[3]);
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, session: &SessionView, look: DisplayLook, ui_settings: &UiSettings) {
    let palette = Palette::for_look(look);
    let toast_count = app.toasts().count() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(if toast_count > 0 { toast_count + 2 } else { 0 }),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" mindful ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    match app.view {
        View::Library => draw_library(frame, app, chunks[1], palette),
        View::Session => draw_session(frame, app, session, chunks[1], palette),
    }

    if toast_count > 0 {
        let lines: Vec<Line> = app
            .toasts()
            .map(|t| {
                let color = if t.is_error { palette.error } else { palette.accent };
                Line::from(Span::styled(t.text.clone(), Style::default().fg(color)))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(bordered(" notices ")), chunks[2]);
    }

    let controls = match app.view {
        View::Library => LIBRARY_CONTROLS,
        View::Session => SESSION_CONTROLS,
    };
    let footer = Paragraph::new(controls)
        .style(Style::default().fg(palette.text))
        .block(bordered(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_look_keeps_colours() {
        assert_eq!(shade((10, 20, 30), DisplayLook::default()), Color::Rgb(10, 20, 30));
    }

    #[test]
    fn dim_look_scales_and_greyscale_drops_hue() {
        let look = DisplayLook {
            brightness: 20,
            greyscale: true,
        };
        let Color::Rgb(r, g, b) = shade(ACCENT, look) else {
            panic!("expected rgb");
        };
        assert_eq!((r, g), (g, b));
        assert!(r < 60);

        let dim_only = DisplayLook {
            brightness: 50,
            greyscale: false,
        };
        assert_eq!(shade((200, 100, 0), dim_only), Color::Rgb(100, 50, 0));
    }

    #[test]
    fn completed_session_is_labelled_complete() {
        let view = SessionView {
            active: true,
            title: String::new(),
            description: String::new(),
            state: PlaybackState::Paused,
            remaining_secs: 0,
            duration_secs: 60,
            progress: 1.0,
            volume: 80,
            complete: true,
            attempt: None,
        };
        assert_eq!(state_label(&view), "Complete");

        let loading = SessionView {
            state: PlaybackState::Loading,
            complete: false,
            attempt: Some(2),
            ..view
        };
        assert_eq!(state_label(&loading), "Loading (alternative source 2)");
    }
}

//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Sparkline, Wrap},
};
use std::time::Duration;

use crate::app::{App, ProgressView};
use crate::config::{TimeField, UiSettings};
use crate::sequencer::Sequencer;
use crate::waveform::sparkline_bars;

const CONTROLS: [(&str, &str); 12] = [
    ("a", "add files"),
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("zz", "current"),
    ("enter", "play selected"),
    ("p", "play"),
    ("space", "pause/resume"),
    ("x", "stop"),
    ("h/l", "prev/next"),
    ("r", "repeat"),
    ("s", "shuffle"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the progress label (elapsed/total/remaining) per `UiSettings`.
fn time_text(progress: &ProgressView, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(progress.elapsed)),
            TimeField::Total => {
                if let Some(t) = progress.total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = progress.total {
                    let rem = t.saturating_sub(progress.elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }
    parts.join(&ui.time_separator)
}

/// `"N. name"` rows, 1-based, with the current track marked.
fn playlist_rows(sequencer: &Sequencer) -> Vec<String> {
    let current = sequencer.state().current_index;
    sequencer
        .playlist()
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let mark = if current == Some(i) { "♪ " } else { "  " };
            format!("{mark}{}. {}", i + 1, track.name())
        })
        .collect()
}

/// Visible window `[start, end)` of `total` rows keeping `selected` centered.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn padded(title: &str) -> Block<'_> {
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

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, sequencer: &Sequencer, ui_settings: &UiSettings) {
    let prompt_height = if app.prompt_open() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(prompt_height),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" legato ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let cursor = if app.follow_playback { "Follow" } else { "Free-roam" };
    let status = format!(
        "{}\n{} • {} • Cursor: {cursor}",
        app.status,
        sequencer.repeat_label(),
        sequencer.shuffle_label()
    );
    let status_par = Paragraph::new(status)
        .block(padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(app.progress.fraction.clamp(0.0, 1.0))
        .label(time_text(&app.progress, ui_settings));
    frame.render_widget(gauge, chunks[2]);

    draw_waveform(frame, app, chunks[3]);
    draw_playlist(frame, app, sequencer, chunks[4]);

    if let Some(prompt) = &app.prompt {
        let input = Paragraph::new(format!("{prompt}_"))
            .block(padded(" add file or folder (enter adds, esc cancels) "));
        frame.render_widget(input, chunks[5]);
    }

    let footer = Paragraph::new(controls_text())
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[6]);
}

fn draw_waveform(frame: &mut Frame, app: &App, area: Rect) {
    match &app.waveform {
        Some(w) => {
            let width = area.width.saturating_sub(2) as usize;
            let bars = sparkline_bars(&w.columns, width);
            let title = format!(" waveform: {} ", w.image_ref);
            let sparkline = Sparkline::default()
                .block(Block::default().borders(Borders::ALL).title(title))
                .style(Style::default().fg(Color::Blue))
                .max(100)
                .data(&bars);
            frame.render_widget(sparkline, area);
        }
        None => {
            let empty = Paragraph::new("no waveform")
                .dim()
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" waveform "));
            frame.render_widget(empty, area);
        }
    }
}

fn draw_playlist(frame: &mut Frame, app: &App, sequencer: &Sequencer, area: Rect) {
    let rows = playlist_rows(sequencer);
    let total = rows.len();
    let height = area.height.saturating_sub(2) as usize;
    let (start, end) = visible_window(total, height, app.selected);

    // Only the visible window becomes ListItems.
    let items: Vec<ListItem> = rows[start..end]
        .iter()
        .map(|r| ListItem::new(r.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" playlist ({total}) ")),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(app.selected.min(total - 1) - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

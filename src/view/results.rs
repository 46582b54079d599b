//! Results screen rendering: the generated playlist

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::model::ResultsState;

use super::utils::{calculate_num_width, truncate_string};

pub fn render_results(frame: &mut Frame, area: Rect, state: &ResultsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    render_track_list(frame, chunks[0], state);
    render_open_link(frame, chunks[1], state);
    render_controls(frame, chunks[2]);
}

fn render_track_list(frame: &mut Frame, area: Rect, state: &ResultsState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Your Playlist ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));

    if state.playlist.is_loading() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_notice(frame, inner, "Fetching your playlist...", Color::Yellow);
        return;
    }

    if let Some(error) = state.playlist.error() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_notice(frame, inner, &format!("{error}\n\nPress R to retry"), Color::Red);
        return;
    }

    let Some(playlist) = state.playlist.ready() else {
        frame.render_widget(block, area);
        return;
    };

    if playlist.tracks.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_notice(frame, inner, "The playlist came back empty.", Color::Yellow);
        return;
    }

    let num_width = calculate_num_width(playlist.tracks.len());
    let title_width = (area.width.saturating_sub(num_width as u16 + 8) as usize * 55) / 100;
    let items: Vec<ListItem> = playlist
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let is_cursor = i == state.cursor;
            let text = format!(
                " {:>num_width$}.  {}  {}",
                i + 1,
                truncate_string(&track.title, title_width),
                track.artist,
            );

            let style = if is_cursor {
                Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    let mut list_state = ListState::default();
    list_state.select(Some(state.cursor));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_open_link(frame: &mut Frame, area: Rect, state: &ResultsState) {
    let line = match &state.playlist_url {
        Some(url) => Line::from(vec![
            Span::styled("Open in Spotify: ", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::styled(url.clone(), Style::default().fg(Color::Cyan)),
        ]),
        None => Line::from(""),
    };

    let widget = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let controls = Line::from(vec![
        Span::styled("R", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" reload   "),
        Span::styled("N", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" new playlist   "),
        Span::styled("Q", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" quit"),
    ]);

    let widget = Paragraph::new(controls)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    let widget = Paragraph::new(message.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true });
    frame.render_widget(widget, chunks[1]);
}

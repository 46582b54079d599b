//! Artist selection screen rendering

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::model::{MAX_SELECTED_ARTISTS, SelectState};

use super::utils::truncate_string;

pub fn render_artist_select(frame: &mut Frame, area: Rect, state: &SelectState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(area);

    render_header(frame, chunks[0], state);
    render_listing(frame, chunks[1], state);
    render_footer(frame, chunks[2], state);
}

fn render_header(frame: &mut Frame, area: Rect, state: &SelectState) {
    let line = Line::from(vec![
        Span::raw("Feeling "),
        Span::styled(
            state.mood.as_str(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - pick up to "),
        Span::styled(
            MAX_SELECTED_ARTISTS.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" artists for your playlist"),
    ]);

    let widget = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Green)));
    frame.render_widget(widget, area);
}

fn render_listing(frame: &mut Frame, area: Rect, state: &SelectState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Your Top Artists ({}/{}) ", state.selected.len(), MAX_SELECTED_ARTISTS))
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    if state.artists.is_loading() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_notice(frame, inner, "Loading your top artists...", Color::Yellow);
        return;
    }

    if let Some(error) = state.artists.error() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_notice(frame, inner, &format!("{error}\n\nPress R to retry"), Color::Red);
        return;
    }

    let Some(artists) = state.artists.ready() else {
        frame.render_widget(block, area);
        return;
    };

    if artists.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_notice(
            frame,
            inner,
            "No top artists found for your account.\nListen to some music on Spotify first.",
            Color::Yellow,
        );
        return;
    }

    let name_width = (area.width.saturating_sub(8) as usize * 40) / 100;
    let items: Vec<ListItem> = artists
        .iter()
        .enumerate()
        .map(|(i, artist)| {
            let is_cursor = i == state.cursor;
            let is_selected = state.is_selected(&artist.id);

            let marker = if is_selected { "[x]" } else { "[ ]" };
            let genres = if artist.genres.is_empty() {
                String::new()
            } else {
                artist.genres.join(", ")
            };

            let text = format!(
                " {} {}  {}",
                marker,
                truncate_string(&artist.name, name_width),
                genres
            );

            let style = if is_cursor {
                Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default().fg(Color::Green)
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

fn render_footer(frame: &mut Frame, area: Rect, state: &SelectState) {
    let status = if state.creating {
        Line::from(Span::styled(
            "Creating your playlist...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(error) = &state.create_error {
        Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red)))
    } else if state.selected.is_empty() {
        Line::from("Select at least one artist to continue")
    } else {
        Line::from("")
    };

    let controls = Line::from(vec![
        Span::styled("Space", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" select   "),
        Span::styled("C", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" create playlist   "),
        Span::styled("R", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" reload   "),
        Span::styled("Esc", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" start over"),
    ]);

    let widget = Paragraph::new(vec![status, controls])
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

//! Landing screen rendering

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render_landing(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Moodify ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(6),
            Constraint::Min(0),
        ])
        .split(inner);

    let lines = vec![
        Line::from(Span::styled(
            "Playlists that match how you feel",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("1.", Style::default().fg(Color::Green)),
            Span::raw(" Snap a photo   "),
            Span::styled("2.", Style::default().fg(Color::Green)),
            Span::raw(" Confirm your mood   "),
            Span::styled("3.", Style::default().fg(Color::Green)),
            Span::raw(" Pick your artists   "),
            Span::styled("4.", Style::default().fg(Color::Green)),
            Span::raw(" Get your playlist"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" start   "),
            Span::styled("H", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" help   "),
            Span::styled("Q", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ]),
    ];

    let body = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(body, chunks[1]);
}

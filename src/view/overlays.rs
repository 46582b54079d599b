//! Overlay rendering (error notification, mood confirmation modal, help popup)

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::model::{CaptureSession, Mood, UiState};

use super::utils::centered_rect;

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        // Fixed width popup (responsive to screen size)
        let popup_width = 52.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4) as usize; // account for borders

        // Calculate how many lines the error message will take when wrapped
        let error_line_count = ((error_msg.chars().count() as f32) / (inner_width as f32)).ceil() as u16;

        // Height: top border (1) + error lines + bottom border (1)
        let popup_height = (2 + error_line_count.max(1)).min(area.height.saturating_sub(4));

        let popup_area = centered_rect(area, popup_width, popup_height);

        // Clear the area behind the popup first
        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(ratatui::widgets::Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

/// The mood confirmation dialog. Shows what the backend detected and lets
/// the user accept it or override with one of the four moods.
pub fn render_mood_modal(frame: &mut Frame, session: &CaptureSession) {
    let area = frame.area();
    let popup_area = centered_rect(area, 56, 9);

    frame.render_widget(Clear, popup_area);

    let detected_line = match &session.mood {
        Some(result) => Line::from(vec![
            Span::raw("You look "),
            Span::styled(
                result.emotion.as_str(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" ({}% confident)", result.confidence_percent()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        None => Line::from("Pick your mood"),
    };

    let mut option_spans: Vec<Span> = Vec::new();
    for (i, mood) in Mood::MODAL_OPTIONS.iter().enumerate() {
        let is_cursor = i == session.modal_cursor;
        let is_override = session.override_mood == Some(*mood);

        let label = format!(" {} {} ", i + 1, mood.as_str());
        let style = if is_cursor {
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
        } else if is_override {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        option_spans.push(Span::styled(label, style));
        option_spans.push(Span::raw("  "));
    }

    let lines = vec![
        detected_line,
        Line::from(""),
        Line::from("Not quite right? Pick another:"),
        Line::from(option_spans),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" confirm   "),
            Span::styled("1-4/Space", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" override   "),
            Span::styled("Esc", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]),
    ];

    let widget = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Mood Detected ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(widget, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    // Keybindings organized by category
    let keybindings = vec![
        ("", "── Flow ──"),
        ("Enter", "Start / Analyze / Confirm"),
        ("Backspace / Esc", "Go back"),
        ("", ""),
        ("", "── Mood Confirmation ──"),
        ("← / →", "Move between moods"),
        ("1-4 / Space", "Override detected mood"),
        ("", ""),
        ("", "── Artist Selection ──"),
        ("↑ / ↓", "Move selection"),
        ("Space", "Select / Deselect artist"),
        ("C", "Create playlist"),
        ("R", "Reload artists"),
        ("", ""),
        ("", "── Results ──"),
        ("R", "Reload playlist"),
        ("N", "Start a new playlist"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_width = 56;
    let popup_height = (keybindings.len() as u16 + 2).min(area.height.saturating_sub(4));
    let popup_area = centered_rect(area, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^36}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn error_popup_survives_tiny_terminals() {
        let mut terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
        let ui_state = UiState {
            error_message: Some("something broke".to_string()),
            ..UiState::default()
        };
        terminal
            .draw(|f| render_error_notification(f, &ui_state))
            .unwrap();
    }

    #[test]
    fn help_popup_survives_tiny_terminals() {
        let mut terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
        terminal.draw(|f| render_help_popup(f)).unwrap();
    }

    #[test]
    fn mood_modal_survives_tiny_terminals() {
        let mut terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
        let session = CaptureSession::default();
        terminal.draw(|f| render_mood_modal(f, &session)).unwrap();
    }
}

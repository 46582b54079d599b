//! Capture screen rendering: live preview and detection status

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::camera::PreviewFrame;
use crate::model::{CameraStatus, CaptureSession};

/// Brightness ramp for the text preview, darkest first
const LUMA_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

pub fn render_capture(frame: &mut Frame, area: Rect, session: &CaptureSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);

    render_preview_pane(frame, chunks[0], session);
    render_status_pane(frame, chunks[1], session);
}

fn render_preview_pane(frame: &mut Frame, area: Rect, session: &CaptureSession) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Camera ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &session.camera {
        CameraStatus::Ready => match &session.preview {
            Some(preview) => {
                let lines = preview_lines(preview);
                frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
            }
            None => render_centered_notice(frame, inner, "Waiting for the first frame...", Color::Yellow),
        },
        CameraStatus::Starting => {
            render_centered_notice(frame, inner, "Starting camera...", Color::Yellow)
        }
        CameraStatus::PermissionDenied => render_centered_notice(
            frame,
            inner,
            "Camera access denied. Re-enable camera permissions and restart.",
            Color::Red,
        ),
        CameraStatus::NotFound => render_centered_notice(
            frame,
            inner,
            "No camera found. Ensure your device has a camera connected.",
            Color::Red,
        ),
        CameraStatus::Unavailable(reason) => {
            render_centered_notice(frame, inner, &format!("Failed to access camera: {reason}"), Color::Red)
        }
    }
}

fn preview_lines(preview: &PreviewFrame) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(preview.rows);
    for row in 0..preview.rows {
        let mut text = String::with_capacity(preview.cols);
        for col in 0..preview.cols {
            let luma = preview
                .luma
                .get(row * preview.cols + col)
                .copied()
                .unwrap_or(0);
            let step = (luma as usize * LUMA_RAMP.len()) / 256;
            text.push(LUMA_RAMP[step.min(LUMA_RAMP.len() - 1)]);
        }
        lines.push(Line::from(Span::styled(text, Style::default().fg(Color::Gray))));
    }
    lines
}

fn render_status_pane(frame: &mut Frame, area: Rect, session: &CaptureSession) {
    let status = if session.analyzing {
        Line::from(Span::styled(
            "Analyzing...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(error) = &session.error {
        Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red)))
    } else if session.camera.is_ready() {
        Line::from("Look at the camera and press Enter to analyze your mood")
    } else {
        Line::from("")
    };

    let controls = Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" analyze   "),
        Span::styled("Esc", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" back"),
    ]);

    let widget = Paragraph::new(vec![status, controls])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(widget, area);
}

fn render_centered_notice(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let widget = Paragraph::new(message.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true });
    frame.render_widget(widget, chunks[1]);
}

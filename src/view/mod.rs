//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, popup placement)
//! - `landing`: Landing screen
//! - `capture`: Camera capture screen with the text preview
//! - `artists`: Artist selection screen
//! - `results`: Generated playlist screen
//! - `overlays`: Modal overlays (error, mood confirmation, help)

mod utils;
mod landing;
mod capture;
mod artists;
mod results;
mod overlays;

use ratatui::Frame;

use crate::model::{CaptureSession, ResultsState, Screen, SelectState, UiState};

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        screen: Screen,
        ui_state: &UiState,
        capture: &CaptureSession,
        select: &SelectState,
        results: &ResultsState,
    ) {
        let area = frame.area();
        match screen {
            Screen::Landing => landing::render_landing(frame, area),
            Screen::Capture => capture::render_capture(frame, area, capture),
            Screen::ArtistSelect => artists::render_artist_select(frame, area, select),
            Screen::Results => results::render_results(frame, area, results),
        }

        // Mood confirmation modal (if open)
        if screen == Screen::Capture && capture.modal_open {
            overlays::render_mood_modal(frame, capture);
        }

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}

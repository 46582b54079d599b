//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::model::{Mood, Screen};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error popup first (blocks all other interactions)
        if model.has_error().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    model.clear_error().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Mood-confirmation modal captures input while open
        if model.is_mood_modal_open().await {
            match key.code {
                KeyCode::Left | KeyCode::Up => {
                    model.modal_move(false).await;
                }
                KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                    model.modal_move(true).await;
                }
                KeyCode::Char(' ') => {
                    model.modal_select_under_cursor().await;
                }
                KeyCode::Char(c @ '1'..='4') => {
                    let index = (c as u8 - b'1') as usize;
                    model.set_mood_override(Mood::MODAL_OPTIONS[index]).await;
                }
                KeyCode::Enter => {
                    drop(model);
                    self.confirm_mood().await;
                }
                KeyCode::Esc => {
                    model.close_mood_modal().await;
                }
                _ => {}
            }
            return Ok(());
        }

        let screen = model.current_screen().await;
        match screen {
            Screen::Landing => match key.code {
                KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => {
                    drop(model);
                    self.enter_capture().await;
                    return Ok(());
                }
                _ => {}
            },
            Screen::Capture => match key.code {
                KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('A') => {
                    drop(model);
                    self.analyze_mood().await;
                    return Ok(());
                }
                KeyCode::Esc | KeyCode::Backspace => {
                    drop(model);
                    self.leave_capture().await;
                    return Ok(());
                }
                _ => {}
            },
            Screen::ArtistSelect => match key.code {
                KeyCode::Up => {
                    model.select_move_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.select_move_down().await;
                    return Ok(());
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    model.toggle_artist_under_cursor().await;
                    return Ok(());
                }
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    drop(model);
                    self.create_playlist().await;
                    return Ok(());
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    drop(model);
                    self.load_artists().await;
                    return Ok(());
                }
                KeyCode::Esc | KeyCode::Backspace => {
                    drop(model);
                    self.back_to_start().await;
                    return Ok(());
                }
                _ => {}
            },
            Screen::Results => match key.code {
                KeyCode::Up => {
                    model.results_move_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.results_move_down().await;
                    return Ok(());
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    drop(model);
                    self.load_playlist().await;
                    return Ok(());
                }
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('n') | KeyCode::Char('N') => {
                    drop(model);
                    self.back_to_start().await;
                    return Ok(());
                }
                _ => {}
            },
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }
}

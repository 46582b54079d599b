//! Results screen state and playlist URL handling

use super::types::{Phase, Playlist};

/// View-local state for the results screen
#[derive(Clone, Default)]
pub struct ResultsState {
    /// The playlist URL passed from the artist selection step, kept verbatim
    /// for the "open in Spotify" affordance
    pub playlist_url: Option<String>,
    pub playlist: Phase<Playlist>,
    pub cursor: usize,
}

impl ResultsState {
    pub fn new(playlist_url: Option<String>) -> Self {
        Self { playlist_url, ..Self::default() }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_down(&mut self) {
        let len = self.playlist.ready().map(|p| p.tracks.len()).unwrap_or(0);
        if self.cursor < len.saturating_sub(1) {
            self.cursor += 1;
        }
    }
}

/// What the results screen should do for a given navigation parameter.
/// Both error cases are decided before any network traffic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchPlan {
    NoUrl,
    InvalidUrl,
    Fetch(String),
}

pub fn plan_fetch(playlist_url: Option<&str>) -> FetchPlan {
    match playlist_url {
        None => FetchPlan::NoUrl,
        Some(url) => match extract_playlist_id(url) {
            Some(id) => FetchPlan::Fetch(id),
            None => FetchPlan::InvalidUrl,
        },
    }
}

/// Extract the playlist identifier: the path segment after `/playlist/`,
/// stripped of any trailing query string.
pub fn extract_playlist_id(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/playlist/")?;
    let id = rest.split('?').next().unwrap_or("");
    let id = id.trim_end_matches('/');
    if id.is_empty() { None } else { Some(id.to_string()) }
}

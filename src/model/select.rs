//! Artist selection screen state

use super::types::{Artist, Mood, Phase};

/// Upper bound on how many artists a playlist request may carry
pub const MAX_SELECTED_ARTISTS: usize = 5;

/// View-local state for the artist selection screen
#[derive(Clone, Default)]
pub struct SelectState {
    pub mood: Mood,
    pub artists: Phase<Vec<Artist>>,
    /// Selected artist ids, insertion-ordered for display
    pub selected: Vec<String>,
    pub cursor: usize,
    pub creating: bool,
    pub create_error: Option<String>,
}

impl SelectState {
    pub fn new(mood: Mood) -> Self {
        Self { mood, artists: Phase::Loading, ..Self::default() }
    }

    pub fn is_selected(&self, artist_id: &str) -> bool {
        self.selected.iter().any(|id| id == artist_id)
    }

    /// Toggle membership. Removal always succeeds; additions past the cap
    /// are silently rejected.
    pub fn toggle(&mut self, artist_id: &str) {
        if let Some(pos) = self.selected.iter().position(|id| id == artist_id) {
            self.selected.remove(pos);
        } else if self.selected.len() < MAX_SELECTED_ARTISTS {
            self.selected.push(artist_id.to_string());
        }
    }

    /// The (id, name) pairs sent to the playlist endpoint, in selection order
    pub fn selected_pairs(&self) -> Vec<(String, String)> {
        let Some(artists) = self.artists.ready() else {
            return Vec::new();
        };
        self.selected
            .iter()
            .filter_map(|id| {
                artists
                    .iter()
                    .find(|a| &a.id == id)
                    .map(|a| (a.id.clone(), a.name.clone()))
            })
            .collect()
    }

    pub fn artist_under_cursor(&self) -> Option<&Artist> {
        self.artists.ready().and_then(|a| a.get(self.cursor))
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_down(&mut self) {
        let len = self.artists.ready().map(|a| a.len()).unwrap_or(0);
        if self.cursor < len.saturating_sub(1) {
            self.cursor += 1;
        }
    }

    pub fn can_create(&self) -> bool {
        !self.selected.is_empty() && !self.creating
    }
}

/// The backend listing may omit ids; fall back to a name-index id so
/// selection still has a stable key.
pub fn assign_fallback_ids(artists: &mut [Artist]) {
    for (index, artist) in artists.iter_mut().enumerate() {
        if artist.id.is_empty() {
            artist.id = format!("{}-{}", artist.name, index);
        }
    }
}

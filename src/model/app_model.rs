//! Main application model with state management
//!
//! Each screen keeps its own state; screens communicate only through
//! `navigate_to`, which carries the forwarded parameter (mood or playlist
//! URL) and bumps the navigation epoch. Async completions must present the
//! epoch they were started under; completions from a screen the user already
//! left are dropped instead of mutating a defunct view.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::camera::PreviewFrame;

use super::backend_client::BackendClient;
use super::capture::{CameraStatus, CaptureSession};
use super::results::ResultsState;
use super::select::{SelectState, assign_fallback_ids};
use super::types::{Artist, Mood, MoodResult, Phase, Playlist, Screen, UiState};

const ERROR_POPUP_SECONDS: u64 = 5;

pub struct AppModel {
    pub backend: Option<BackendClient>,
    screen: Arc<Mutex<Screen>>,
    nav_epoch: Arc<Mutex<u64>>,
    ui_state: Arc<Mutex<UiState>>,
    capture: Arc<Mutex<CaptureSession>>,
    select: Arc<Mutex<SelectState>>,
    results: Arc<Mutex<ResultsState>>,
    should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            backend: None,
            screen: Arc::new(Mutex::new(Screen::Landing)),
            nav_epoch: Arc::new(Mutex::new(0)),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            capture: Arc::new(Mutex::new(CaptureSession::default())),
            select: Arc::new(Mutex::new(SelectState::default())),
            results: Arc::new(Mutex::new(ResultsState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_backend_client(&mut self, client: BackendClient) {
        self.backend = Some(client);
    }

    pub async fn get_backend_client(&self) -> Option<BackendClient> {
        self.backend.clone()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub async fn current_screen(&self) -> Screen {
        *self.screen.lock().await
    }

    pub async fn current_epoch(&self) -> u64 {
        *self.nav_epoch.lock().await
    }

    /// Switch screens, resetting the target screen's state. Returns the new
    /// epoch; in-flight work started before this call is now stale.
    pub async fn navigate_to(&self, target: Screen) -> u64 {
        let mut epoch = self.nav_epoch.lock().await;
        *epoch += 1;
        let mut screen = self.screen.lock().await;
        tracing::info!(from = ?*screen, to = ?target, epoch = *epoch, "navigating");
        *screen = target;

        match target {
            Screen::Landing => {}
            Screen::Capture => {
                *self.capture.lock().await = CaptureSession::default();
            }
            Screen::ArtistSelect => {
                // SelectState is seeded by navigate_to_artist_select
            }
            Screen::Results => {
                // ResultsState is seeded by navigate_to_results
            }
        }
        *epoch
    }

    pub async fn navigate_to_artist_select(&self, mood: Mood) -> u64 {
        *self.select.lock().await = SelectState::new(mood);
        self.navigate_to(Screen::ArtistSelect).await
    }

    pub async fn navigate_to_results(&self, playlist_url: Option<String>) -> u64 {
        *self.results.lock().await = ResultsState::new(playlist_url);
        self.navigate_to(Screen::Results).await
    }

    async fn epoch_is_current(&self, epoch: u64) -> bool {
        let current = *self.nav_epoch.lock().await;
        if current != epoch {
            tracing::debug!(stale = epoch, current, "dropping stale completion");
            false
        } else {
            true
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // Global UI state (error popup, help)
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > ERROR_POPUP_SECONDS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    // ========================================================================
    // Capture screen
    // ========================================================================

    pub async fn get_capture_session(&self) -> CaptureSession {
        self.capture.lock().await.clone()
    }

    pub async fn set_camera_status(&self, epoch: u64, status: CameraStatus) {
        if !self.epoch_is_current(epoch).await {
            return;
        }
        let mut session = self.capture.lock().await;
        session.camera = status;
        if !session.camera.is_ready() {
            session.preview = None;
        }
    }

    pub async fn set_preview(&self, epoch: u64, preview: PreviewFrame) {
        if !self.epoch_is_current(epoch).await {
            return;
        }
        self.capture.lock().await.preview = Some(preview);
    }

    /// Enter the loading state for one detection request. Returns false when
    /// a request is already in flight or the camera is not ready.
    pub async fn begin_analysis(&self) -> bool {
        let mut session = self.capture.lock().await;
        if !session.can_analyze() {
            return false;
        }
        session.analyzing = true;
        session.error = None;
        true
    }

    pub async fn set_detection_outcome(&self, epoch: u64, outcome: Result<MoodResult, String>) {
        if !self.epoch_is_current(epoch).await {
            return;
        }
        let mut session = self.capture.lock().await;
        match outcome {
            Ok(result) => {
                tracing::info!(emotion = %result.emotion, score = result.score, "mood detected");
                session.open_modal(result);
            }
            Err(message) => {
                session.analyzing = false;
                session.error = Some(message);
            }
        }
    }

    pub async fn set_mood_override(&self, mood: Mood) {
        self.capture.lock().await.set_override(mood);
    }

    pub async fn modal_move(&self, forward: bool) {
        let mut session = self.capture.lock().await;
        if session.modal_open {
            session.modal_move(forward);
        }
    }

    pub async fn modal_select_under_cursor(&self) {
        let mut session = self.capture.lock().await;
        if session.modal_open {
            let mood = Mood::MODAL_OPTIONS[session.modal_cursor % Mood::MODAL_OPTIONS.len()];
            session.set_override(mood);
        }
    }

    pub async fn close_mood_modal(&self) {
        self.capture.lock().await.close_modal();
    }

    pub async fn is_mood_modal_open(&self) -> bool {
        self.capture.lock().await.modal_open
    }

    /// Resolve the mood that confirm would use; None means confirm no-ops
    pub async fn resolved_mood(&self) -> Option<Mood> {
        self.capture.lock().await.resolved_mood()
    }

    // ========================================================================
    // Artist selection screen
    // ========================================================================

    pub async fn get_select_state(&self) -> SelectState {
        self.select.lock().await.clone()
    }

    pub async fn selected_mood(&self) -> Mood {
        self.select.lock().await.mood
    }

    pub async fn set_artists_loading(&self) {
        let mut state = self.select.lock().await;
        state.artists = Phase::Loading;
        state.create_error = None;
    }

    pub async fn set_artists_outcome(&self, epoch: u64, outcome: Result<Vec<Artist>, String>) {
        if !self.epoch_is_current(epoch).await {
            return;
        }
        let mut state = self.select.lock().await;
        state.artists = match outcome {
            Ok(mut artists) => {
                assign_fallback_ids(&mut artists);
                tracing::info!(count = artists.len(), "artist listing loaded");
                Phase::Ready(artists)
            }
            Err(message) => Phase::Error(message),
        };
        state.cursor = 0;
        state.selected.clear();
    }

    pub async fn toggle_artist_under_cursor(&self) {
        let mut state = self.select.lock().await;
        let id = state.artist_under_cursor().map(|a| a.id.clone());
        if let Some(id) = id {
            state.toggle(&id);
        }
    }

    pub async fn select_move_up(&self) {
        self.select.lock().await.move_cursor_up();
    }

    pub async fn select_move_down(&self) {
        self.select.lock().await.move_cursor_down();
    }

    /// Enter the creating state. Returns the payload for the playlist
    /// request, or None when creation is not currently allowed.
    pub async fn begin_playlist_creation(&self) -> Option<(Mood, Vec<(String, String)>)> {
        let mut state = self.select.lock().await;
        if !state.can_create() {
            return None;
        }
        let pairs = state.selected_pairs();
        if pairs.is_empty() {
            return None;
        }
        state.creating = true;
        state.create_error = None;
        Some((state.mood, pairs))
    }

    pub async fn set_creation_failed(&self, epoch: u64, message: String) {
        if !self.epoch_is_current(epoch).await {
            return;
        }
        let mut state = self.select.lock().await;
        state.creating = false;
        state.create_error = Some(message);
    }

    // ========================================================================
    // Results screen
    // ========================================================================

    pub async fn get_results_state(&self) -> ResultsState {
        self.results.lock().await.clone()
    }

    pub async fn playlist_url(&self) -> Option<String> {
        self.results.lock().await.playlist_url.clone()
    }

    pub async fn set_playlist_phase(&self, epoch: u64, phase: Phase<Playlist>) {
        if !self.epoch_is_current(epoch).await {
            return;
        }
        let mut state = self.results.lock().await;
        state.playlist = phase;
        state.cursor = 0;
    }

    pub async fn results_move_up(&self) {
        self.results.lock().await.move_cursor_up();
    }

    pub async fn results_move_down(&self) {
        self.results.lock().await.move_cursor_down();
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Track;

    #[tokio::test]
    async fn stale_artist_completion_is_dropped() {
        let model = AppModel::new();
        let epoch = model.navigate_to_artist_select(Mood::Happy).await;

        // user navigates away before the fetch lands
        let _ = model.navigate_to(Screen::Landing).await;

        model
            .set_artists_outcome(epoch, Ok(vec![]))
            .await;
        let state = model.get_select_state().await;
        assert!(state.artists.is_loading(), "stale completion must not touch state");
    }

    #[tokio::test]
    async fn current_artist_completion_is_applied() {
        let model = AppModel::new();
        let epoch = model.navigate_to_artist_select(Mood::Sad).await;
        model.set_artists_outcome(epoch, Err("Server error: 500".to_string())).await;

        let state = model.get_select_state().await;
        assert_eq!(state.artists.error(), Some("Server error: 500"));
    }

    #[tokio::test]
    async fn stale_detection_outcome_is_dropped() {
        let model = AppModel::new();
        let epoch = model.navigate_to(Screen::Capture).await;
        {
            let mut session = model.capture.lock().await;
            session.camera = CameraStatus::Ready;
        }
        assert!(model.begin_analysis().await);

        let _ = model.navigate_to(Screen::Landing).await;
        model
            .set_detection_outcome(epoch, Ok(MoodResult { emotion: Mood::Happy, score: 0.8 }))
            .await;

        assert!(!model.is_mood_modal_open().await);
    }

    #[tokio::test]
    async fn begin_analysis_blocks_duplicate_submissions() {
        let model = AppModel::new();
        let _ = model.navigate_to(Screen::Capture).await;
        {
            let mut session = model.capture.lock().await;
            session.camera = CameraStatus::Ready;
        }

        assert!(model.begin_analysis().await);
        assert!(!model.begin_analysis().await, "second submit while loading must be rejected");
    }

    #[tokio::test]
    async fn detection_failure_clears_loading_without_modal() {
        let model = AppModel::new();
        let epoch = model.navigate_to(Screen::Capture).await;
        {
            let mut session = model.capture.lock().await;
            session.camera = CameraStatus::Ready;
        }
        assert!(model.begin_analysis().await);

        model
            .set_detection_outcome(epoch, Err("Server error occurred".to_string()))
            .await;

        let session = model.get_capture_session().await;
        assert!(!session.analyzing);
        assert!(!session.modal_open);
        assert_eq!(session.error.as_deref(), Some("Server error occurred"));
    }

    #[tokio::test]
    async fn creation_payload_requires_selection() {
        let model = AppModel::new();
        let epoch = model.navigate_to_artist_select(Mood::Neutral).await;
        model
            .set_artists_outcome(
                epoch,
                Ok(vec![Artist {
                    id: "a1".to_string(),
                    name: "Someone".to_string(),
                    image_url: String::new(),
                    genres: vec![],
                }]),
            )
            .await;

        assert!(model.begin_playlist_creation().await.is_none());

        model.toggle_artist_under_cursor().await;
        let (mood, pairs) = model.begin_playlist_creation().await.expect("payload");
        assert_eq!(mood, Mood::Neutral);
        assert_eq!(pairs, vec![("a1".to_string(), "Someone".to_string())]);

        // in flight now, repeated clicks do nothing
        assert!(model.begin_playlist_creation().await.is_none());
    }

    #[tokio::test]
    async fn stale_playlist_phase_is_dropped() {
        let model = AppModel::new();
        let epoch = model
            .navigate_to_results(Some("https://open.spotify.com/playlist/x".to_string()))
            .await;
        let _ = model.navigate_to(Screen::Landing).await;

        model
            .set_playlist_phase(
                epoch,
                Phase::Ready(Playlist {
                    url: "u".to_string(),
                    tracks: vec![Track {
                        title: "t".to_string(),
                        artist: "a".to_string(),
                        spotify_uri: "spotify:track:1".to_string(),
                    }],
                }),
            )
            .await;

        let state = model.get_results_state().await;
        assert!(state.playlist.ready().is_none());
    }
}

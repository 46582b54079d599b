//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the
//! application. It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (moods, artists, playlists, screens)
//! - `capture`: Capture screen state (camera status, detection, modal)
//! - `select`: Artist selection state (listing, max-5 selection)
//! - `results`: Results screen state and playlist URL parsing
//! - `backend_client`: HTTP client for the mood-playlist backend
//! - `app_model`: Main application model with state management methods

mod types;
mod capture;
mod select;
mod results;
mod backend_client;
mod app_model;

// Re-export all public types for convenient access
pub use types::{
    Artist, Mood, MoodResult, Phase, Playlist, Screen, Track, UiState,
};

pub use capture::{CameraStatus, CaptureSession};

pub use select::{MAX_SELECTED_ARTISTS, SelectState};

pub use results::{FetchPlan, ResultsState, plan_fetch};

pub use backend_client::{ApiError, BackendClient};

pub use app_model::AppModel;

//! Core type definitions for the application

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// One of the four moods the backend understands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    #[serde(alias = "happy")]
    Happy,
    #[serde(alias = "sad")]
    Sad,
    #[serde(alias = "neutral")]
    Neutral,
    #[serde(alias = "angry")]
    Angry,
}

impl Mood {
    /// Override buttons in the confirmation modal, in display order
    pub const MODAL_OPTIONS: [Mood; 4] = [Mood::Sad, Mood::Happy, Mood::Neutral, Mood::Angry];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Neutral => "Neutral",
            Mood::Angry => "Angry",
        }
    }

    pub fn parse(s: &str) -> Option<Mood> {
        match s.to_ascii_lowercase().as_str() {
            "happy" => Some(Mood::Happy),
            "sad" => Some(Mood::Sad),
            "neutral" => Some(Mood::Neutral),
            "angry" => Some(Mood::Angry),
            _ => None,
        }
    }
}

impl Default for Mood {
    fn default() -> Self {
        Mood::Happy
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detection result returned by the backend
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoodResult {
    pub emotion: Mood,
    pub score: f32,
}

impl MoodResult {
    /// Confidence as a rounded percentage for display
    pub fn confidence_percent(&self) -> u8 {
        (self.score.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// An artist from the backend's top-artist listing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "image", default)]
    pub image_url: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// A track in a generated playlist
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub spotify_uri: String,
}

/// A generated playlist, referenced by its external URL
#[derive(Clone, Debug)]
pub struct Playlist {
    pub url: String,
    pub tracks: Vec<Track>,
}

/// Which screen of the flow is active
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Landing,
    Capture,
    ArtistSelect,
    Results,
}

/// Loading state for a view that fetches data
#[derive(Clone, Debug, Default)]
pub enum Phase<T> {
    #[default]
    Idle,
    Loading,
    Error(String),
    Ready(T),
}

impl<T> Phase<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Phase::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Phase::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Cross-screen UI state (overlays, transient notices)
#[derive(Clone, Default)]
pub struct UiState {
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_parses_case_insensitively() {
        assert_eq!(Mood::parse("happy"), Some(Mood::Happy));
        assert_eq!(Mood::parse("Angry"), Some(Mood::Angry));
        assert_eq!(Mood::parse("NEUTRAL"), Some(Mood::Neutral));
        assert_eq!(Mood::parse("melancholic"), None);
        assert_eq!(Mood::parse(""), None);
    }

    #[test]
    fn mood_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Mood::Sad).unwrap(), "\"Sad\"");
        let parsed: Mood = serde_json::from_str("\"happy\"").unwrap();
        assert_eq!(parsed, Mood::Happy);
    }

    #[test]
    fn confidence_is_rounded_and_clamped() {
        let r = MoodResult { emotion: Mood::Happy, score: 0.876 };
        assert_eq!(r.confidence_percent(), 88);
        let r = MoodResult { emotion: Mood::Sad, score: 1.4 };
        assert_eq!(r.confidence_percent(), 100);
    }
}

//! Capture screen state: camera status, preview, detection result, modal

use crate::camera::PreviewFrame;

use super::types::{Mood, MoodResult};

/// Lifecycle of the camera resource as seen by the capture view
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum CameraStatus {
    #[default]
    Starting,
    Ready,
    PermissionDenied,
    NotFound,
    Unavailable(String),
}

impl CameraStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, CameraStatus::Ready)
    }
}

/// View-local state for the capture screen
///
/// Created when the capture screen is entered and replaced wholesale on
/// re-entry. The camera handle itself lives in the controller; this struct
/// only mirrors its status for rendering.
#[derive(Clone, Default)]
pub struct CaptureSession {
    pub camera: CameraStatus,
    pub preview: Option<PreviewFrame>,
    pub analyzing: bool,
    pub error: Option<String>,
    pub mood: Option<MoodResult>,
    pub override_mood: Option<Mood>,
    pub modal_open: bool,
    pub modal_cursor: usize,
}

impl CaptureSession {
    /// Analyze is allowed only with a live preview and no request in flight
    pub fn can_analyze(&self) -> bool {
        self.camera.is_ready() && !self.analyzing && !self.modal_open
    }

    /// The mood that would be confirmed right now: override wins, otherwise
    /// the detected emotion, otherwise nothing (confirm is a no-op)
    pub fn resolved_mood(&self) -> Option<Mood> {
        self.override_mood.or(self.mood.map(|m| m.emotion))
    }

    /// Single-choice override: picking a mood replaces any previous pick
    pub fn set_override(&mut self, mood: Mood) {
        self.override_mood = Some(mood);
        if let Some(pos) = Mood::MODAL_OPTIONS.iter().position(|m| *m == mood) {
            self.modal_cursor = pos;
        }
    }

    pub fn open_modal(&mut self, result: MoodResult) {
        self.mood = Some(result);
        self.override_mood = None;
        self.modal_cursor = Mood::MODAL_OPTIONS
            .iter()
            .position(|m| *m == result.emotion)
            .unwrap_or(0);
        self.modal_open = true;
        self.analyzing = false;
        self.error = None;
    }

    /// Cancel discards both the detection result and any override
    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.mood = None;
        self.override_mood = None;
    }

    pub fn modal_move(&mut self, forward: bool) {
        let len = Mood::MODAL_OPTIONS.len();
        self.modal_cursor = if forward {
            (self.modal_cursor + 1) % len
        } else {
            (self.modal_cursor + len - 1) % len
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detected(mood: Mood) -> MoodResult {
        MoodResult { emotion: mood, score: 0.9 }
    }

    #[test]
    fn override_wins_over_detected() {
        let mut session = CaptureSession::default();
        session.open_modal(detected(Mood::Sad));
        assert_eq!(session.resolved_mood(), Some(Mood::Sad));

        session.set_override(Mood::Angry);
        assert_eq!(session.resolved_mood(), Some(Mood::Angry));

        // single-choice: a new pick replaces the old one
        session.set_override(Mood::Neutral);
        assert_eq!(session.override_mood, Some(Mood::Neutral));
        assert_eq!(session.resolved_mood(), Some(Mood::Neutral));
    }

    #[test]
    fn confirm_without_any_mood_resolves_to_none() {
        let session = CaptureSession::default();
        assert_eq!(session.resolved_mood(), None);
    }

    #[test]
    fn cancel_discards_result_and_override() {
        let mut session = CaptureSession::default();
        session.open_modal(detected(Mood::Happy));
        session.set_override(Mood::Sad);
        session.close_modal();

        assert!(!session.modal_open);
        assert_eq!(session.mood, None);
        assert_eq!(session.override_mood, None);
        assert_eq!(session.resolved_mood(), None);
    }

    #[test]
    fn analyze_gated_on_camera_and_inflight_request() {
        let mut session = CaptureSession::default();
        assert!(!session.can_analyze());

        session.camera = CameraStatus::Ready;
        assert!(session.can_analyze());

        session.analyzing = true;
        assert!(!session.can_analyze());
    }

    #[test]
    fn permission_denied_is_never_ready() {
        let mut session = CaptureSession::default();
        session.camera = CameraStatus::PermissionDenied;
        assert!(!session.camera.is_ready());
        assert!(!session.can_analyze());
    }
}

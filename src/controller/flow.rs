//! Screen flow operations: camera lifecycle and backend calls
//!
//! Every backend call runs on its own task and reports back through an
//! epoch-checked model setter, so a completion for a screen the user has
//! already left is dropped instead of applied.

use std::time::Duration;

use crate::camera::{CameraError, CameraSession, Frame};
use crate::model::{CameraStatus, FetchPlan, Phase, Playlist, Screen, plan_fetch};

use super::AppController;

const PREVIEW_COLS: usize = 64;
const PREVIEW_ROWS: usize = 20;
const PREVIEW_INTERVAL: Duration = Duration::from_millis(200);

fn camera_status_from_error(error: &CameraError) -> CameraStatus {
    match error {
        CameraError::PermissionDenied => CameraStatus::PermissionDenied,
        CameraError::NotFound => CameraStatus::NotFound,
        CameraError::Unavailable(reason) => CameraStatus::Unavailable(reason.clone()),
    }
}

impl AppController {
    // ========================================================================
    // Capture screen
    // ========================================================================

    /// Enter the capture screen and open the camera off the UI thread
    pub async fn enter_capture(&self) {
        self.release_camera();

        let model = self.model.lock().await;
        let epoch = model.navigate_to(Screen::Capture).await;
        drop(model);

        let controller = self.clone();
        let index = self.config.camera_index;
        tokio::spawn(async move {
            let opened = tokio::task::spawn_blocking(move || CameraSession::open(index)).await;

            let model = controller.model.lock().await;
            match opened {
                Ok(Ok(session)) => {
                    if model.current_epoch().await != epoch {
                        // user already left; the session drops and releases here
                        tracing::debug!("camera opened for a screen that is gone");
                        return;
                    }
                    if let Ok(mut slot) = controller.camera.lock() {
                        *slot = Some(session);
                    }
                    model.set_camera_status(epoch, CameraStatus::Ready).await;
                    drop(model);
                    controller.run_preview_loop(epoch).await;
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "camera open failed");
                    model.set_camera_status(epoch, camera_status_from_error(&e)).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "camera open task panicked");
                    model
                        .set_camera_status(epoch, CameraStatus::Unavailable(e.to_string()))
                        .await;
                }
            }
        });
    }

    /// Grab one frame off the runtime, on the blocking pool: nokhwa reads
    /// synchronously and a stalled device must not pin an async worker.
    /// Returns None when no camera is currently held.
    pub(crate) async fn grab_frame(&self) -> Option<Result<Frame, CameraError>> {
        let camera = self.camera.clone();
        let grabbed = tokio::task::spawn_blocking(move || {
            let mut slot = match camera.lock() {
                Ok(slot) => slot,
                Err(_) => {
                    return Some(Err(CameraError::Unavailable(
                        "camera state poisoned".to_string(),
                    )));
                }
            };
            slot.as_mut().map(|session| session.grab())
        })
        .await;

        match grabbed {
            Ok(result) => result,
            Err(e) => Some(Err(CameraError::Unavailable(e.to_string()))),
        }
    }

    /// Grab frames for the live preview until the screen changes or the
    /// camera goes away
    async fn run_preview_loop(&self, epoch: u64) {
        loop {
            tokio::time::sleep(PREVIEW_INTERVAL).await;

            let model = self.model.lock().await;
            if model.current_epoch().await != epoch {
                return;
            }
            drop(model);

            let frame = match self.grab_frame().await {
                Some(frame) => frame,
                None => return,
            };

            match frame {
                Ok(frame) => {
                    let preview = frame.to_preview(PREVIEW_COLS, PREVIEW_ROWS);
                    let model = self.model.lock().await;
                    model.set_preview(epoch, preview).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "preview frame grab failed");
                    let model = self.model.lock().await;
                    model
                        .set_camera_status(epoch, camera_status_from_error(&e))
                        .await;
                    return;
                }
            }
        }
    }

    /// Leave the capture screen. The camera is released on every exit path.
    pub async fn leave_capture(&self) {
        self.release_camera();
        let model = self.model.lock().await;
        let _ = model.navigate_to(Screen::Landing).await;
    }

    /// Snapshot the current frame and submit it for mood detection
    pub async fn analyze_mood(&self) {
        let model = self.model.lock().await;
        if !model.begin_analysis().await {
            return;
        }
        let epoch = model.current_epoch().await;
        let backend = model.get_backend_client().await;
        drop(model);

        let frame = self
            .grab_frame()
            .await
            .unwrap_or_else(|| Err(CameraError::Unavailable("camera not running".to_string())));

        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                let model = self.model.lock().await;
                model.set_detection_outcome(epoch, Err(e.to_string())).await;
                return;
            }
        };

        let quality = self.config.jpeg_quality;
        let controller = self.clone();
        tokio::spawn(async move {
            let encoded =
                tokio::task::spawn_blocking(move || frame.to_jpeg_data_url(quality)).await;

            let outcome = match (encoded, backend) {
                (Ok(Ok(data_url)), Some(backend)) => {
                    backend.detect_mood(&data_url).await.map_err(|e| e.to_string())
                }
                (Ok(Err(e)), _) => Err(e.to_string()),
                (Err(e), _) => Err(e.to_string()),
                (_, None) => Err("Backend is not configured".to_string()),
            };

            let model = controller.model.lock().await;
            model.set_detection_outcome(epoch, outcome).await;
        });
    }

    /// Confirm the mood from the modal: no-op without a resolved mood,
    /// otherwise enter the backend authorization flow and move on to artist
    /// selection carrying the mood.
    pub async fn confirm_mood(&self) {
        let model = self.model.lock().await;
        let Some(mood) = model.resolved_mood().await else {
            return;
        };
        let backend = model.get_backend_client().await;
        drop(model);

        tracing::info!(mood = %mood, "mood confirmed");
        self.release_camera();

        if let Some(backend) = &backend {
            if let Err(e) = backend.login(mood).await {
                tracing::warn!(error = %e, "authorization entry failed");
                let model = self.model.lock().await;
                model.set_error(format!("Spotify connection failed: {e}")).await;
            }
        }

        let model = self.model.lock().await;
        let _ = model.navigate_to_artist_select(mood).await;
        drop(model);
        self.load_artists().await;
    }

    // ========================================================================
    // Artist selection screen
    // ========================================================================

    /// Fetch the caller's top-artist listing (also the retry action)
    pub async fn load_artists(&self) {
        let model = self.model.lock().await;
        let epoch = model.current_epoch().await;
        model.set_artists_loading().await;
        let backend = model.get_backend_client().await;
        drop(model);

        let controller = self.clone();
        tokio::spawn(async move {
            let outcome = match backend {
                Some(backend) => backend.top_artists().await.map_err(|e| e.to_string()),
                None => Err("Backend is not configured".to_string()),
            };

            if let Err(ref message) = outcome {
                tracing::warn!(%message, "artist listing failed");
            }
            let model = controller.model.lock().await;
            model.set_artists_outcome(epoch, outcome).await;
        });
    }

    /// Request playlist generation for the selected artists and the chosen
    /// mood, then move to the results screen
    pub async fn create_playlist(&self) {
        let model = self.model.lock().await;
        let Some((mood, artists)) = model.begin_playlist_creation().await else {
            return;
        };
        let epoch = model.current_epoch().await;
        let backend = model.get_backend_client().await;
        drop(model);

        let controller = self.clone();
        tokio::spawn(async move {
            let Some(backend) = backend else {
                let model = controller.model.lock().await;
                model
                    .set_creation_failed(epoch, "Backend is not configured".to_string())
                    .await;
                return;
            };

            match backend.create_playlist(mood, artists).await {
                Ok(playlist) => {
                    let model = controller.model.lock().await;
                    if model.current_epoch().await != epoch {
                        return;
                    }
                    tracing::info!(url = %playlist.url, tracks = playlist.tracks.len(), "playlist created");
                    let _ = model.navigate_to_results(Some(playlist.url)).await;
                    drop(model);
                    controller.load_playlist().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "playlist creation failed");
                    let model = controller.model.lock().await;
                    model.set_creation_failed(epoch, e.to_string()).await;
                }
            }
        });
    }

    // ========================================================================
    // Results screen
    // ========================================================================

    /// Fetch the playlist named by the navigation parameter (also the retry
    /// action). Missing or unparseable URLs error out without touching the
    /// network.
    pub async fn load_playlist(&self) {
        let model = self.model.lock().await;
        let epoch = model.current_epoch().await;
        let url = model.playlist_url().await;
        let backend = model.get_backend_client().await;

        let playlist_id = match plan_fetch(url.as_deref()) {
            FetchPlan::NoUrl => {
                model
                    .set_playlist_phase(epoch, Phase::Error("No playlist URL provided".to_string()))
                    .await;
                return;
            }
            FetchPlan::InvalidUrl => {
                model
                    .set_playlist_phase(epoch, Phase::Error("Invalid playlist URL".to_string()))
                    .await;
                return;
            }
            FetchPlan::Fetch(id) => id,
        };

        model.set_playlist_phase(epoch, Phase::Loading).await;
        drop(model);

        let url = url.unwrap_or_default();
        let controller = self.clone();
        tokio::spawn(async move {
            let phase = match backend {
                Some(backend) => match backend.playlist_tracks(&playlist_id).await {
                    Ok(tracks) => Phase::Ready(Playlist { url, tracks }),
                    Err(e) => {
                        tracing::warn!(error = %e, playlist_id, "playlist fetch failed");
                        Phase::Error(e.to_string())
                    }
                },
                None => Phase::Error("Backend is not configured".to_string()),
            };

            let model = controller.model.lock().await;
            model.set_playlist_phase(epoch, phase).await;
        });
    }

    /// Back to the landing screen from anywhere
    pub async fn back_to_start(&self) {
        self.release_camera();
        let model = self.model.lock().await;
        let _ = model.navigate_to(Screen::Landing).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use clap::Parser;
    use tokio::sync::Mutex;

    use crate::camera::FrameSource;
    use crate::config::Config;
    use crate::model::AppModel;

    use super::*;

    struct StaticSource {
        stops: Arc<AtomicUsize>,
    }

    impl FrameSource for StaticSource {
        fn grab(&mut self) -> Result<Frame, CameraError> {
            Ok(Frame { width: 2, height: 2, rgb: vec![64; 12] })
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn controller() -> AppController {
        AppController::new(
            Arc::new(Mutex::new(AppModel::new())),
            Config::parse_from(["moodify"]),
        )
    }

    #[tokio::test]
    async fn grab_frame_reads_from_the_held_session() {
        let controller = controller();
        let stops = Arc::new(AtomicUsize::new(0));
        *controller.camera.lock().unwrap() =
            Some(CameraSession::from_source(Box::new(StaticSource { stops: stops.clone() })));

        let frame = controller.grab_frame().await.expect("camera held").expect("frame");
        assert_eq!(frame.width, 2);

        controller.release_camera();
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn grab_frame_without_a_camera_yields_none() {
        let controller = controller();
        assert!(controller.grab_frame().await.is_none());

        // release with nothing held stays a no-op
        controller.release_camera();
        assert!(controller.grab_frame().await.is_none());
    }
}

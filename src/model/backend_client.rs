//! HTTP client for the mood-playlist backend
//!
//! All requests go through one reqwest client with a cookie store, so the
//! backend session established by the login redirect is attached to every
//! later call.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{Artist, Mood, MoodResult, Playlist, Track};

const USER_AGENT: &str = concat!("moodify/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Backend call failures, split the way the UI reports them: the server
/// could not be reached, the server answered with an error status, the
/// server answered with something unparseable, or the server answered 200
/// but reported a problem in the body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Cannot connect to server. Ensure the backend is running at {0}")]
    Unreachable(String),

    #[error("Server error: {status}{}", message.as_ref().map(|m| format!(" - {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    #[error("Unexpected response from server: {0}")]
    Malformed(String),

    #[error("{0}")]
    Backend(String),
}

#[derive(Serialize)]
struct DetectMoodRequest<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
struct DetectMoodResponse {
    emotion: Option<String>,
    score: Option<f32>,
    error: Option<String>,
}

#[derive(Serialize)]
struct CreatePlaylistRequest {
    mood: Mood,
    artists: Vec<ArtistRef>,
}

#[derive(Serialize)]
struct ArtistRef {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct CreatePlaylistResponse {
    playlist_url: Option<String>,
    matched: Option<Vec<Track>>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct PlaylistResponse {
    tracks: Option<Vec<Track>>,
    error: Option<String>,
}

/// Client for the external backend holding the session cookie jar
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Malformed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The backend-hosted OAuth entry point, carrying the confirmed mood
    pub fn login_url(&self, mood: Mood) -> String {
        format!("{}/login?mood={}", self.base_url, mood.as_str())
    }

    /// Enter the backend authorization flow. Redirects are followed and the
    /// session cookie ends up in the jar.
    pub async fn login(&self, mood: Mood) -> Result<(), ApiError> {
        let url = self.login_url(mood);
        tracing::debug!(%url, "entering backend authorization flow");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), message: None });
        }
        Ok(())
    }

    /// `GET /top-artist-json` - the caller's top artists, session attached
    pub async fn top_artists(&self) -> Result<Vec<Artist>, ApiError> {
        let url = format!("{}/top-artist-json", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body = Self::read_json_body(response).await?;
        if let Some(message) = error_field(&body) {
            return Err(ApiError::Backend(message));
        }
        serde_json::from_value(body)
            .map_err(|e| ApiError::Malformed(format!("artist listing: {e}")))
    }

    /// `POST /user-top` - request playlist generation for a mood and up to
    /// five artists. Success requires both the playlist URL and the matched
    /// track list in the response.
    pub async fn create_playlist(
        &self,
        mood: Mood,
        artists: Vec<(String, String)>,
    ) -> Result<Playlist, ApiError> {
        let request = CreatePlaylistRequest {
            mood,
            artists: artists
                .into_iter()
                .map(|(id, name)| ArtistRef { id, name })
                .collect(),
        };

        let url = format!("{}/user-top", self.base_url);
        tracing::debug!(mood = %mood, artists = request.artists.len(), "requesting playlist generation");
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body = Self::read_json_body(response).await?;
        let parsed: CreatePlaylistResponse = serde_json::from_value(body)
            .map_err(|e| ApiError::Malformed(format!("playlist response: {e}")))?;

        if let Some(message) = parsed.error {
            return Err(ApiError::Backend(message));
        }
        match (parsed.playlist_url, parsed.matched) {
            (Some(url), Some(tracks)) => Ok(Playlist { url, tracks }),
            _ => Err(ApiError::Malformed(
                "playlist response missing playlist_url or matched tracks".to_string(),
            )),
        }
    }

    /// `GET /playlist/{id}` - track list of a generated playlist
    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ApiError> {
        let url = format!("{}/playlist/{}", self.base_url, playlist_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body = Self::read_json_body(response).await?;
        let parsed: PlaylistResponse = serde_json::from_value(body)
            .map_err(|e| ApiError::Malformed(format!("playlist details: {e}")))?;

        if let Some(message) = parsed.error {
            return Err(ApiError::Backend(message));
        }
        parsed
            .tracks
            .ok_or_else(|| ApiError::Malformed("playlist details missing tracks".to_string()))
    }

    /// `POST /detectmood/` - classify a captured frame, passed as a base64
    /// JPEG data URL
    pub async fn detect_mood(&self, image_data_url: &str) -> Result<MoodResult, ApiError> {
        let url = format!("{}/detectmood/", self.base_url);
        tracing::debug!(image_bytes = image_data_url.len(), "submitting frame for mood detection");
        let response = self
            .http
            .post(&url)
            .json(&DetectMoodRequest { image: image_data_url })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body = Self::read_json_body(response).await?;
        let parsed: DetectMoodResponse = serde_json::from_value(body)
            .map_err(|e| ApiError::Malformed(format!("detection response: {e}")))?;

        if let Some(message) = parsed.error {
            return Err(ApiError::Backend(message));
        }
        let emotion = parsed
            .emotion
            .as_deref()
            .and_then(Mood::parse)
            .ok_or_else(|| ApiError::Malformed("detection response missing a known emotion".to_string()))?;

        Ok(MoodResult {
            emotion,
            score: parsed.score.unwrap_or(0.0).clamp(0.0, 1.0),
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_connect() || error.is_timeout() || error.is_request() {
            ApiError::Unreachable(self.base_url.clone())
        } else {
            ApiError::Malformed(error.to_string())
        }
    }

    /// Shared response handling: non-2xx becomes a status-coded error (with
    /// the backend's error message when the body carries one), a non-JSON
    /// content type becomes a format error.
    async fn read_json_body(response: reqwest::Response) -> Result<serde_json::Value, ApiError> {
        let status = response.status();
        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);

        if !status.is_success() {
            let message = if is_json {
                response
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .as_ref()
                    .and_then(error_field)
            } else {
                None
            };
            return Err(ApiError::Status { status: status.as_u16(), message });
        }

        if !is_json {
            return Err(ApiError::Malformed("server did not return JSON".to_string()));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

fn error_field(body: &serde_json::Value) -> Option<String> {
    body.get("error")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    /// Bind a throwaway backend on an ephemeral port and return a client
    /// pointed at it
    async fn serve(router: Router) -> BackendClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve mock backend");
        });
        BackendClient::new(&format!("http://{addr}")).expect("client")
    }

    #[tokio::test]
    async fn top_artists_parses_the_listing() {
        let client = serve(Router::new().route(
            "/top-artist-json",
            get(|| async {
                Json(json!([
                    {"id": "a1", "name": "First", "image": "http://x/1.jpg", "genres": ["pop"]},
                    {"name": "No Id Artist"}
                ]))
            }),
        ))
        .await;

        let artists = client.top_artists().await.expect("listing");
        assert_eq!(artists.len(), 2);
        assert_eq!(artists[0].id, "a1");
        assert_eq!(artists[0].genres, vec!["pop".to_string()]);
        assert_eq!(artists[1].name, "No Id Artist");
        assert!(artists[1].id.is_empty());
    }

    #[tokio::test]
    async fn top_artists_surfaces_server_error_status() {
        let client = serve(Router::new().route(
            "/top-artist-json",
            get(|| async {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "token expired"})))
            }),
        ))
        .await;

        let err = client.top_artists().await.expect_err("must fail");
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message.as_deref(), Some("token expired"));
            }
            other => panic!("expected status error, got {other}"),
        }
    }

    #[tokio::test]
    async fn top_artists_rejects_html_bodies() {
        let client = serve(Router::new().route(
            "/top-artist-json",
            get(|| async { axum::response::Html("<html>login page</html>").into_response() }),
        ))
        .await;

        let err = client.top_artists().await.expect_err("must fail");
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[tokio::test]
    async fn create_playlist_requires_url_and_tracks() {
        let client = serve(Router::new().route(
            "/user-top",
            post(|| async {
                Json(json!({
                    "playlist_url": "https://open.spotify.com/playlist/abc",
                    "matched": [
                        {"title": "Song", "artist": "Someone", "spotify_uri": "spotify:track:1"}
                    ]
                }))
            }),
        ))
        .await;

        let playlist = client
            .create_playlist(Mood::Happy, vec![("a1".to_string(), "Someone".to_string())])
            .await
            .expect("playlist");
        assert_eq!(playlist.url, "https://open.spotify.com/playlist/abc");
        assert_eq!(playlist.tracks.len(), 1);

        // a 200 with only half the payload is malformed, not success
        let partial = serve(Router::new().route(
            "/user-top",
            post(|| async { Json(json!({"playlist_url": "https://x"})) }),
        ))
        .await;
        let err = partial
            .create_playlist(Mood::Happy, vec![("a1".to_string(), "Someone".to_string())])
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[tokio::test]
    async fn backend_error_field_wins_over_payload() {
        let client = serve(Router::new().route(
            "/user-top",
            post(|| async { Json(json!({"error": "no seed tracks for these artists"})) }),
        ))
        .await;

        let err = client
            .create_playlist(Mood::Sad, vec![("a1".to_string(), "Someone".to_string())])
            .await
            .expect_err("must fail");
        match err {
            ApiError::Backend(message) => assert_eq!(message, "no seed tracks for these artists"),
            other => panic!("expected backend error, got {other}"),
        }
    }

    #[tokio::test]
    async fn playlist_tracks_fetches_by_id() {
        let client = serve(Router::new().route(
            "/playlist/:id",
            get(|axum::extract::Path(id): axum::extract::Path<String>| async move {
                assert_eq!(id, "45jL3crAMlaGKbOdBHyXxA");
                Json(json!({
                    "tracks": [
                        {"title": "One", "artist": "A", "spotify_uri": "spotify:track:1"},
                        {"title": "Two", "artist": "B", "spotify_uri": "spotify:track:2"}
                    ]
                }))
            }),
        ))
        .await;

        let tracks = client
            .playlist_tracks("45jL3crAMlaGKbOdBHyXxA")
            .await
            .expect("tracks");
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].title, "Two");
    }

    #[tokio::test]
    async fn detect_mood_parses_emotion_and_score() {
        let client = serve(Router::new().route(
            "/detectmood/",
            post(|Json(body): Json<serde_json::Value>| async move {
                let image = body["image"].as_str().unwrap_or_default();
                assert!(image.starts_with("data:image/jpeg;base64,"));
                Json(json!({"emotion": "happy", "score": 0.92}))
            }),
        ))
        .await;

        let result = client
            .detect_mood("data:image/jpeg;base64,AAAA")
            .await
            .expect("detection");
        assert_eq!(result.emotion, Mood::Happy);
        assert_eq!(result.confidence_percent(), 92);
    }

    #[tokio::test]
    async fn detect_mood_rejects_unknown_emotions() {
        let client = serve(Router::new().route(
            "/detectmood/",
            post(|| async { Json(json!({"emotion": "confused", "score": 0.5})) }),
        ))
        .await;

        let err = client
            .detect_mood("data:image/jpeg;base64,AAAA")
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[tokio::test]
    async fn session_cookie_from_login_rides_on_later_calls() {
        use axum::http::HeaderMap;
        use axum::http::header::{COOKIE, SET_COOKIE};

        let router = Router::new()
            .route(
                "/login",
                get(|| async {
                    ([(SET_COOKIE, "session=abc123; Path=/")], Json(json!({"ok": true})))
                }),
            )
            .route(
                "/top-artist-json",
                get(|headers: HeaderMap| async move {
                    let has_session = headers
                        .get(COOKIE)
                        .and_then(|v| v.to_str().ok())
                        .map(|v| v.contains("session=abc123"))
                        .unwrap_or(false);
                    if has_session {
                        Json(json!([{"id": "a1", "name": "First"}])).into_response()
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({"error": "no session"})))
                            .into_response()
                    }
                }),
            );
        let client = serve(router).await;

        // without the session the listing is rejected
        let err = client.top_artists().await.expect_err("must fail without session");
        assert!(matches!(err, ApiError::Status { status: 401, .. }));

        client.login(Mood::Happy).await.expect("login");

        let artists = client.top_artists().await.expect("listing with session");
        assert_eq!(artists[0].name, "First");
    }

    #[tokio::test]
    async fn unreachable_backend_maps_to_connect_error() {
        // nothing listens here
        let client = BackendClient::new("http://127.0.0.1:1").expect("client");
        let err = client.top_artists().await.expect_err("must fail");
        assert!(matches!(err, ApiError::Unreachable(_)));
    }

    #[test]
    fn status_error_includes_code_and_message() {
        let err = ApiError::Status { status: 500, message: Some("boom".to_string()) };
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("boom"));

        let bare = ApiError::Status { status: 502, message: None };
        assert_eq!(bare.to_string(), "Server error: 502");
    }

    #[test]
    fn unreachable_message_names_the_backend() {
        let err = ApiError::Unreachable("http://127.0.0.1:5000".to_string());
        assert!(err.to_string().contains("http://127.0.0.1:5000"));
        assert!(err.to_string().contains("Cannot connect"));
    }

    #[test]
    fn login_url_carries_the_mood() {
        let client = BackendClient::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(client.login_url(Mood::Angry), "http://127.0.0.1:5000/login?mood=Angry");
    }

    #[test]
    fn base_url_is_normalized() {
        let client = BackendClient::new("http://localhost:5000///").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}

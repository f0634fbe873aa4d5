//! Axum web server exposing a session to a browser shell.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::error::Error;
use crate::playback::PlaybackStatus;
use crate::session::{Intent, SessionHandle};
use crate::timeline::Timeline;

/// Visualization server.
pub struct VisServer {
    session: SessionHandle,
}

impl VisServer {
    /// Create a server in front of a running session.
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/api/status", get(status_handler))
            .route("/api/timeline", get(timeline_handler))
            .route("/api/scene", get(scene_handler))
            .route("/api/playback/toggle", post(toggle_handler))
            .route("/api/playback/next", post(next_handler))
            .route("/api/playback/prev", post(prev_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/seek", post(seek_handler))
            .route("/api/playback/speed", post(speed_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.session.clone())
    }

    /// Run the server on the given address.
    pub async fn serve(self, addr: std::net::SocketAddr) -> Result<(), std::io::Error> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Visualization server running on http://{}", addr);
        axum::serve(listener, self.router()).await
    }
}

fn status_code(error: &Error) -> StatusCode {
    match error {
        Error::InvalidSpeed(_) | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::SessionClosed => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn index_handler(State(session): State<SessionHandle>) -> Result<Html<String>, StatusCode> {
    let svg = session.svg().await.map_err(|e| status_code(&e))?;
    let status = session.status().await.map_err(|e| status_code(&e))?;
    Ok(Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Missing numbers</title></head>\
         <body>{}<p>Step {} / {}</p><p>{}</p></body></html>",
        svg,
        status.current_step,
        status.total_steps,
        lacuna_scene::escape(&status.log),
    )))
}

async fn status_handler(
    State(session): State<SessionHandle>,
) -> Result<Json<PlaybackStatus>, StatusCode> {
    session
        .status()
        .await
        .map(Json)
        .map_err(|e| status_code(&e))
}

async fn timeline_handler(
    State(session): State<SessionHandle>,
) -> Result<Json<Timeline>, StatusCode> {
    session
        .timeline()
        .await
        .map(Json)
        .map_err(|e| status_code(&e))
}

async fn scene_handler(
    State(session): State<SessionHandle>,
) -> Result<impl IntoResponse, StatusCode> {
    let svg = session.svg().await.map_err(|e| status_code(&e))?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

async fn apply(
    session: &SessionHandle,
    intent: Intent,
) -> Result<Json<PlaybackStatus>, StatusCode> {
    session
        .dispatch(intent)
        .await
        .map(Json)
        .map_err(|e| status_code(&e))
}

async fn toggle_handler(
    State(session): State<SessionHandle>,
) -> Result<Json<PlaybackStatus>, StatusCode> {
    apply(&session, Intent::TogglePlay).await
}

async fn next_handler(
    State(session): State<SessionHandle>,
) -> Result<Json<PlaybackStatus>, StatusCode> {
    apply(&session, Intent::Next).await
}

async fn prev_handler(
    State(session): State<SessionHandle>,
) -> Result<Json<PlaybackStatus>, StatusCode> {
    apply(&session, Intent::Prev).await
}

async fn reset_handler(
    State(session): State<SessionHandle>,
) -> Result<Json<PlaybackStatus>, StatusCode> {
    apply(&session, Intent::Reset).await
}

#[derive(Deserialize)]
struct SeekRequest {
    step: i64,
}

async fn seek_handler(
    State(session): State<SessionHandle>,
    Json(req): Json<SeekRequest>,
) -> Result<Json<PlaybackStatus>, StatusCode> {
    apply(&session, Intent::Seek { step: req.step }).await
}

#[derive(Deserialize)]
struct SpeedRequest {
    speed: f64,
}

async fn speed_handler(
    State(session): State<SessionHandle>,
    Json(req): Json<SpeedRequest>,
) -> Result<Json<PlaybackStatus>, StatusCode> {
    apply(&session, Intent::SetSpeed { speed: req.speed }).await
}

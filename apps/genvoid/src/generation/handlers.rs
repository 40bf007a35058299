//! Axum route handlers for the generator sessions.
//!
//! Every handler is generic over the generator kind; `routes` mounts one copy
//! under `/api/v1/cover` and one under `/api/v1/typography`.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::presenter::{download, present, DownloadArtifact, Presentation};
use crate::generation::session::{GeneratorSession, GeneratorSettings};
use crate::generation::sessions::SessionStore;
use crate::generation::status::GenerationState;
use crate::generation::workflow::start_generation;
use crate::models::image::ArtifactKind;
use crate::models::settings::{CoverSettings, TypographySettings};
use crate::state::AppState;

/// Picks the session registry for a generator kind out of `AppState`.
pub trait RoutedGenerator: GeneratorSettings {
    fn store(state: &AppState) -> &SessionStore<Self>;
}

impl RoutedGenerator for CoverSettings {
    fn store(state: &AppState) -> &SessionStore<Self> {
        &state.cover_sessions
    }
}

impl RoutedGenerator for TypographySettings {
    fn store(state: &AppState) -> &SessionStore<Self> {
        &state.typography_sessions
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateFieldRequest {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView<S> {
    pub id: Uuid,
    pub kind: ArtifactKind,
    pub created_at: DateTime<Utc>,
    pub settings: S,
    pub state: GenerationState,
    pub presentation: Presentation,
    pub placeholders: BTreeMap<String, String>,
    /// Generate button is disabled while a request is loading.
    pub can_generate: bool,
}

impl<S: GeneratorSettings> From<&GeneratorSession<S>> for SessionView<S> {
    fn from(session: &GeneratorSession<S>) -> Self {
        let state = session.state();
        SessionView {
            id: session.id(),
            kind: S::KIND,
            created_at: session.created_at(),
            settings: session.settings().clone(),
            state,
            presentation: present(session.status(), S::KIND),
            placeholders: session.placeholders(),
            can_generate: state != GenerationState::Loading,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/{kind}/sessions
pub async fn handle_create<S: RoutedGenerator>(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView<S>>) {
    let session = S::store(&state).create().await;
    let view = SessionView::from(&*session.lock().await);
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/{kind}/sessions/:id
pub async fn handle_get<S: RoutedGenerator>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView<S>>, AppError> {
    let session = S::store(&state).get(id).await?;
    let view = SessionView::from(&*session.lock().await);
    Ok(Json(view))
}

/// DELETE /api/v1/{kind}/sessions/:id
///
/// Leaving the screen. Any in-flight request still finishes in the
/// background, but its result has nowhere to go.
pub async fn handle_delete<S: RoutedGenerator>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    S::store(&state).remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/{kind}/sessions/:id/fields
pub async fn handle_update_field<S: RoutedGenerator>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFieldRequest>,
) -> Result<Json<SessionView<S>>, AppError> {
    let session = S::store(&state).get(id).await?;
    let mut session = session.lock().await;
    session.update_field(&request.name, &request.value)?;
    Ok(Json(SessionView::from(&*session)))
}

/// POST /api/v1/{kind}/sessions/:id/generate
///
/// Validates and starts the request; the client polls the session for the
/// outcome. A failed validation is reported through the session state, not
/// as an HTTP error.
pub async fn handle_generate<S: RoutedGenerator>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SessionView<S>>), AppError> {
    let session = S::store(&state).get(id).await?;
    start_generation(Arc::clone(&session), Arc::clone(&state.generator)).await?;
    let view = SessionView::from(&*session.lock().await);
    Ok((StatusCode::ACCEPTED, Json(view)))
}

/// POST /api/v1/{kind}/sessions/:id/reset
pub async fn handle_reset<S: RoutedGenerator>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView<S>>, AppError> {
    let session = S::store(&state).get(id).await?;
    let mut session = session.lock().await;
    session.reset();
    Ok(Json(SessionView::from(&*session)))
}

/// GET /api/v1/{kind}/sessions/:id/download
pub async fn handle_download<S: RoutedGenerator>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<DownloadArtifact, AppError> {
    let session = S::store(&state).get(id).await?;
    let session = session.lock().await;
    download(session.status(), S::KIND)
        .ok_or_else(|| AppError::Conflict("No generated image to download yet".to_string()))
}

pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::generation::handlers::{
    handle_create, handle_delete, handle_download, handle_generate, handle_get, handle_reset,
    handle_update_field, RoutedGenerator,
};
use crate::models::settings::{CoverSettings, TypographySettings};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/v1/cover", generator_routes::<CoverSettings>())
        .nest("/api/v1/typography", generator_routes::<TypographySettings>())
        .with_state(state)
}

fn generator_routes<S: RoutedGenerator>() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(handle_create::<S>))
        .route(
            "/sessions/:id",
            get(handle_get::<S>).delete(handle_delete::<S>),
        )
        .route("/sessions/:id/fields", patch(handle_update_field::<S>))
        .route("/sessions/:id/generate", post(handle_generate::<S>))
        .route("/sessions/:id/reset", post(handle_reset::<S>))
        .route("/sessions/:id/download", get(handle_download::<S>))
}

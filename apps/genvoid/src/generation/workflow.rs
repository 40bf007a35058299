//! Generation request workflow: validate, call the collaborator once, apply
//! the result to the session.
//!
//! The session lock is never held across the collaborator call.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::generation::session::{GenerationTicket, GeneratorSession, GeneratorSettings};
use crate::generation::status::GenerationState;
use crate::imagen_client::ImageGenerator;

pub type SharedSession<S> = Arc<Mutex<GeneratorSession<S>>>;

/// Validates and, if the submission is accepted, sends the request from a
/// background task. Returns the state right after validation.
pub async fn start_generation<S: GeneratorSettings>(
    session: SharedSession<S>,
    generator: Arc<dyn ImageGenerator>,
) -> Result<GenerationState, AppError> {
    let ticket = session.lock().await.begin()?;
    let Some(ticket) = ticket else {
        return Ok(GenerationState::Error);
    };

    tokio::spawn(async move {
        dispatch(&session, ticket, generator.as_ref()).await;
    });

    Ok(GenerationState::Loading)
}

async fn dispatch<S: GeneratorSettings>(
    session: &Mutex<GeneratorSession<S>>,
    ticket: GenerationTicket<S>,
    generator: &dyn ImageGenerator,
) {
    info!(
        "Sending {:?} generation request {}",
        S::KIND,
        ticket.request_id
    );

    let result = ticket.settings.request_image(generator).await;
    session.lock().await.complete(ticket.request_id, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::defaults::{COLOR_CANDIDATES, ELEMENT_CANDIDATES, THEME_CANDIDATES};
    use crate::generation::presenter::download;
    use crate::generation::session::{
        PROMPT_REQUIRED_MESSAGE, TITLE_REQUIRED_MESSAGE, UNKNOWN_ERROR_MESSAGE,
    };
    use crate::generation::testing::{png, FakeGenerator};
    use crate::models::image::ArtifactKind;
    use crate::models::settings::{CoverSettings, TypographySettings};

    fn session_with<S: GeneratorSettings>(field: &str, value: &str) -> SharedSession<S> {
        let mut session = GeneratorSession::new();
        session.update_field(field, value).unwrap();
        Arc::new(Mutex::new(session))
    }

    fn cover_session(prompt: &str) -> SharedSession<CoverSettings> {
        session_with("prompt", prompt)
    }

    async fn wait_until_settled<S: GeneratorSettings>(session: &SharedSession<S>) -> GenerationState {
        for _ in 0..100 {
            let state = session.lock().await.state();
            if state != GenerationState::Loading {
                return state;
            }
            tokio::task::yield_now().await;
        }
        GenerationState::Loading
    }

    /// Starts a generation and waits for the background request to land.
    async fn generate<S: GeneratorSettings>(
        session: &SharedSession<S>,
        generator: Arc<dyn ImageGenerator>,
    ) -> GenerationState {
        start_generation(Arc::clone(session), generator)
            .await
            .unwrap();
        wait_until_settled(session).await
    }

    #[tokio::test]
    async fn test_empty_required_field_never_calls_collaborator() {
        let generator = Arc::new(FakeGenerator::succeeding(png(1)));

        let cover = cover_session("");
        let state = start_generation(cover.clone(), generator.clone())
            .await
            .unwrap();
        assert_eq!(state, GenerationState::Error);
        assert_eq!(
            cover.lock().await.status().error(),
            Some(PROMPT_REQUIRED_MESSAGE)
        );

        let typography = session_with::<TypographySettings>("title", "   ");
        let state = start_generation(typography.clone(), generator.clone())
            .await
            .unwrap();
        assert_eq!(state, GenerationState::Error);
        assert_eq!(
            typography.lock().await.status().error(),
            Some(TITLE_REQUIRED_MESSAGE)
        );

        tokio::task::yield_now().await;
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_success_stores_returned_image() {
        let generator = Arc::new(FakeGenerator::succeeding(png(42)));
        let session = cover_session("A young woman with silver hair");

        let state = generate(&session, generator.clone()).await;

        assert_eq!(state, GenerationState::Success);
        assert_eq!(session.lock().await.status().image(), Some(&png(42)));
        assert_eq!(generator.call_count(), 1);
        assert_eq!(
            generator.cover_calls.lock().unwrap()[0].prompt,
            "A young woman with silver hair"
        );
    }

    #[tokio::test]
    async fn test_failure_stores_message() {
        let generator = Arc::new(FakeGenerator::failing("Quota exceeded for this project."));
        let session = cover_session("A futuristic city");

        let state = generate(&session, generator).await;

        assert_eq!(state, GenerationState::Error);
        assert_eq!(
            session.lock().await.status().error(),
            Some("Quota exceeded for this project.")
        );
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_fallback() {
        let generator = Arc::new(FakeGenerator::failing(""));
        let session = cover_session("A futuristic city");
        generate(&session, generator).await;
        assert_eq!(
            session.lock().await.status().error(),
            Some(UNKNOWN_ERROR_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_typography_scenario_fills_defaults_and_downloads() {
        let generator = Arc::new(FakeGenerator::succeeding(png(9)));
        let session = session_with::<TypographySettings>("title", "Chronicles of Atheria");

        let state = generate(&session, generator.clone()).await;
        assert_eq!(state, GenerationState::Success);

        let sent = generator.typography_calls.lock().unwrap()[0].clone();
        assert_eq!(sent.title, "Chronicles of Atheria");
        assert!(THEME_CANDIDATES.contains(&sent.theme.as_str()));
        assert!(COLOR_CANDIDATES.contains(&sent.colors.as_str()));
        assert!(ELEMENT_CANDIDATES.contains(&sent.elements.as_str()));

        let guard = session.lock().await;
        assert!(guard.settings().theme.is_empty());
        assert!(guard.settings().colors.is_empty());
        assert!(guard.settings().elements.is_empty());

        let artifact = download(guard.status(), ArtifactKind::Typography).unwrap();
        assert_eq!(artifact.file_name, "webnovel-typography.png");
        assert_eq!(artifact.bytes, png(9).bytes);
    }

    #[tokio::test]
    async fn test_resubmit_while_loading_is_rejected() {
        let generator = Arc::new(FakeGenerator::succeeding(png(3)).gated());
        let session = cover_session("Two lovers under two moons");

        let state = start_generation(session.clone(), generator.clone())
            .await
            .unwrap();
        assert_eq!(state, GenerationState::Loading);

        let second = start_generation(session.clone(), generator.clone()).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));

        generator.release();
        assert_eq!(wait_until_settled(&session).await, GenerationState::Success);
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_reset_during_flight_discards_result() {
        let generator = Arc::new(FakeGenerator::succeeding(png(5)).gated());
        let session = cover_session("A lone knight");

        start_generation(session.clone(), generator.clone())
            .await
            .unwrap();
        session.lock().await.reset();

        generator.release();
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }

        let guard = session.lock().await;
        assert_eq!(guard.state(), GenerationState::Idle);
        assert!(guard.status().image().is_none());
    }

    #[tokio::test]
    async fn test_regenerate_replaces_image() {
        let session = cover_session("A lone knight");

        generate(&session, Arc::new(FakeGenerator::succeeding(png(1)))).await;
        generate(&session, Arc::new(FakeGenerator::succeeding(png(2)))).await;

        assert_eq!(session.lock().await.status().image(), Some(&png(2)));
    }
}

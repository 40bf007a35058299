//! One open generator screen: its settings store, placeholder rotators and
//! generation state machine.
//!
//! State transitions:
//!   idle | success | error --begin (valid)--> loading
//!   idle | success | error --begin (invalid)--> error
//!   loading --complete (matching id)--> success | error
//!   any --reset--> idle
//!
//! `begin` refuses while a request is in flight, and `complete` ignores any
//! result whose request id is no longer the outstanding one.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::thread_rng;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::defaults::fill_blank_defaults;
use crate::generation::status::{GenerationState, GenerationStatus};
use crate::imagen_client::{ImageGenerator, ImageServiceError};
use crate::models::image::{ArtifactKind, GeneratedImage};
use crate::models::settings::{CoverSettings, TypographySettings};
use crate::placeholder::{AnimatedPlaceholder, PlaceholderRotator};

pub const PROMPT_REQUIRED_MESSAGE: &str = "Prompt cannot be empty.";
pub const TITLE_REQUIRED_MESSAGE: &str = "Novel Title is required.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

// ────────────────────────────────────────────────────────────────────────────
// Per-generator behaviour
// ────────────────────────────────────────────────────────────────────────────

/// Everything that differs between the cover and typography generators.
#[async_trait]
pub trait GeneratorSettings: Clone + Default + Serialize + Send + Sync + 'static {
    const KIND: ArtifactKind;

    /// Form fields with rotating example placeholders.
    const PLACEHOLDERS: &'static [(&'static str, &'static [&'static str])];

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), AppError>;

    /// Checks the required field. The error is the user-facing message.
    fn validate(&self) -> Result<(), &'static str>;

    /// Copy of the settings that is actually sent to the collaborator.
    fn prepare_request(&self) -> Self {
        self.clone()
    }

    async fn request_image(
        &self,
        generator: &dyn ImageGenerator,
    ) -> Result<GeneratedImage, ImageServiceError>;
}

#[async_trait]
impl GeneratorSettings for CoverSettings {
    const KIND: ArtifactKind = ArtifactKind::Cover;

    const PLACEHOLDERS: &'static [(&'static str, &'static [&'static str])] = &[
        (
            "prompt",
            &[
                "A lone knight in glowing armor standing on a cliff overlooking a kingdom of clouds",
                "A young woman with silver hair holding a glowing crystal in a dark forest",
                "A futuristic city with flying cars and holographic billboards at night",
                "Two lovers embracing under a sky filled with two moons and swirling nebulae",
            ],
        ),
        ("negativePrompt", &[""]),
    ];

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        CoverSettings::set_field(self, name, value)
    }

    fn validate(&self) -> Result<(), &'static str> {
        if self.prompt.trim().is_empty() {
            return Err(PROMPT_REQUIRED_MESSAGE);
        }
        Ok(())
    }

    async fn request_image(
        &self,
        generator: &dyn ImageGenerator,
    ) -> Result<GeneratedImage, ImageServiceError> {
        generator.generate_cover_image(self).await
    }
}

#[async_trait]
impl GeneratorSettings for TypographySettings {
    const KIND: ArtifactKind = ArtifactKind::Typography;

    const PLACEHOLDERS: &'static [(&'static str, &'static [&'static str])] = &[
        (
            "title",
            &["Chronicles of Atheria", "Cybernetic Dawn", "Echoes of the Void"],
        ),
        (
            "theme",
            &[
                "epic fantasy, magical",
                "high-tech sci-fi, neon",
                "dark romance, elegant",
            ],
        ),
        (
            "colors",
            &[
                "deep purple, glowing gold",
                "electric blue, cyberpunk pink",
                "blood red, black, silver",
            ],
        ),
        (
            "elements",
            &[
                "ancient runes, swirling magical energy",
                "circuits, data streams, glitch effect",
                "thorny roses, ornate filigree",
            ],
        ),
    ];

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        TypographySettings::set_field(self, name, value)
    }

    fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err(TITLE_REQUIRED_MESSAGE);
        }
        Ok(())
    }

    fn prepare_request(&self) -> Self {
        fill_blank_defaults(self, &mut thread_rng())
    }

    async fn request_image(
        &self,
        generator: &dyn ImageGenerator,
    ) -> Result<GeneratedImage, ImageServiceError> {
        generator.generate_typography_image(self).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

/// An accepted submission: the request id and the settings to send.
#[derive(Debug, Clone)]
pub struct GenerationTicket<S> {
    pub request_id: u64,
    pub settings: S,
}

#[derive(Debug)]
pub struct GeneratorSession<S: GeneratorSettings> {
    id: Uuid,
    created_at: DateTime<Utc>,
    settings: S,
    status: GenerationStatus,
    last_request_id: u64,
    placeholders: BTreeMap<&'static str, AnimatedPlaceholder>,
}

impl<S: GeneratorSettings> Default for GeneratorSession<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GeneratorSettings> GeneratorSession<S> {
    /// Opens a session with default settings. Starts placeholder timers, so it
    /// must run inside a tokio runtime.
    pub fn new() -> Self {
        let placeholders = S::PLACEHOLDERS
            .iter()
            .map(|(field, examples)| {
                let rotator = PlaceholderRotator::new(examples.iter().copied());
                (*field, AnimatedPlaceholder::spawn(rotator))
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            settings: S::default(),
            status: GenerationStatus::Idle,
            last_request_id: 0,
            placeholders,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    pub fn state(&self) -> GenerationState {
        self.status.state()
    }

    /// Current placeholder text per field.
    pub fn placeholders(&self) -> BTreeMap<String, String> {
        self.placeholders
            .iter()
            .map(|(field, placeholder)| (field.to_string(), placeholder.display()))
            .collect()
    }

    /// Shallow-merges one field. The edited field's placeholder stops rotating.
    pub fn update_field(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        self.settings.set_field(name, value)?;
        if let Some(placeholder) = self.placeholders.get_mut(name) {
            placeholder.mark_typing();
        }
        debug!("Session {} updated field {}", self.id, name);
        Ok(())
    }

    /// Validates and moves to `Loading`.
    ///
    /// Returns `Ok(None)` when validation failed; the session is then in
    /// `Error` and no request must be sent.
    pub fn begin(&mut self) -> Result<Option<GenerationTicket<S>>, AppError> {
        if let Some(request_id) = self.status.in_flight() {
            return Err(AppError::Conflict(format!(
                "Generation request {request_id} is still in progress"
            )));
        }

        if let Err(message) = self.settings.validate() {
            info!("Session {} rejected submission: {}", self.id, message);
            self.status = GenerationStatus::Error(message.to_string());
            return Ok(None);
        }

        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.status = GenerationStatus::Loading { request_id };

        Ok(Some(GenerationTicket {
            request_id,
            settings: self.settings.prepare_request(),
        }))
    }

    /// Applies a collaborator result. Returns `false` if the result was stale.
    pub fn complete(
        &mut self,
        request_id: u64,
        result: Result<GeneratedImage, ImageServiceError>,
    ) -> bool {
        if self.status.in_flight() != Some(request_id) {
            warn!(
                "Session {} discarded stale result for request {}",
                self.id, request_id
            );
            return false;
        }

        self.status = match result {
            Ok(image) => {
                info!(
                    "Session {} request {} succeeded ({} bytes)",
                    self.id,
                    request_id,
                    image.bytes.len()
                );
                GenerationStatus::Success(image)
            }
            Err(err) => {
                warn!("Session {} request {} failed: {}", self.id, request_id, err);
                GenerationStatus::Error(failure_message(&err))
            }
        };
        true
    }

    /// Back to idle. Drops any image and invalidates an in-flight request.
    pub fn reset(&mut self) {
        if let Some(request_id) = self.status.in_flight() {
            info!(
                "Session {} reset while request {} was in flight",
                self.id, request_id
            );
        }
        self.status = GenerationStatus::Idle;
    }
}

fn failure_message(err: &ImageServiceError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

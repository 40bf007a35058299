//! Fake collaborators shared by the generation and route tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::imagen_client::{ImageGenerator, ImageServiceError};
use crate::models::image::GeneratedImage;
use crate::models::settings::{CoverSettings, TypographySettings};

pub fn png(seed: u8) -> GeneratedImage {
    GeneratedImage::new(vec![0x89, b'P', b'N', b'G', seed], "image/png")
}

/// Records every request and answers with a fixed outcome. With a gate, each
/// call waits for `release()` before answering.
pub struct FakeGenerator {
    outcome: Result<GeneratedImage, String>,
    gate: Option<Arc<Notify>>,
    pub cover_calls: Mutex<Vec<CoverSettings>>,
    pub typography_calls: Mutex<Vec<TypographySettings>>,
}

impl FakeGenerator {
    pub fn succeeding(image: GeneratedImage) -> Self {
        Self {
            outcome: Ok(image),
            gate: None,
            cover_calls: Mutex::new(Vec::new()),
            typography_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            ..Self::succeeding(png(0))
        }
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn call_count(&self) -> usize {
        self.cover_calls.lock().unwrap().len() + self.typography_calls.lock().unwrap().len()
    }

    async fn answer(&self) -> Result<GeneratedImage, ImageServiceError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.outcome.clone().map_err(|message| ImageServiceError::Api {
            status: 500,
            message,
        })
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate_cover_image(
        &self,
        settings: &CoverSettings,
    ) -> Result<GeneratedImage, ImageServiceError> {
        self.cover_calls.lock().unwrap().push(settings.clone());
        self.answer().await
    }

    async fn generate_typography_image(
        &self,
        settings: &TypographySettings,
    ) -> Result<GeneratedImage, ImageServiceError> {
        self.typography_calls.lock().unwrap().push(settings.clone());
        self.answer().await
    }
}

/// Imagen client — the single point of entry for all image-generation calls.
///
/// No other module talks to the generative-image API directly. The workflow
/// only sees the `ImageGenerator` trait, so tests swap in fakes.
///
/// Calls are single-shot: no retries, no cancellation.
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::image::GeneratedImage;
use crate::models::settings::{AspectRatio, CoverSettings, TypographySettings};

pub mod prompts;

const OUTPUT_MIME_TYPE: &str = "image/png";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ImageServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("The image service returned no image. The prompt may have been blocked; try rephrasing it.")]
    NoImage,

    #[error("The image service returned a malformed image: {0}")]
    Malformed(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Collaborator contract
// ────────────────────────────────────────────────────────────────────────────

/// The external generative-image service as the workflow sees it.
///
/// Carried in `AppState` as `Arc<dyn ImageGenerator>`.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_cover_image(
        &self,
        settings: &CoverSettings,
    ) -> Result<GeneratedImage, ImageServiceError>;

    async fn generate_typography_image(
        &self,
        settings: &TypographySettings,
    ) -> Result<GeneratedImage, ImageServiceError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<PredictInstance<'a>>,
    parameters: PredictParameters<'a>,
}

#[derive(Debug, Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters<'a> {
    sample_count: u32,
    aspect_ratio: &'a str,
    output_options: OutputOptions<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions<'a> {
    mime_type: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// ImagenClient
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Imagen `:predict` endpoint of the Gemini API.
#[derive(Clone)]
pub struct ImagenClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl ImagenClient {
    pub fn new(api_key: String, api_base: &str, model: &str) -> Result<Self, ImageServiceError> {
        Ok(Self {
            client: Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?,
            api_key,
            endpoint: format!("{api_base}/models/{model}:predict"),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issues one prediction request and returns the first image.
    pub async fn predict(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage, ImageServiceError> {
        let body = PredictRequest {
            instances: vec![PredictInstance { prompt }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: aspect_ratio.as_str(),
                output_options: OutputOptions {
                    mime_type: OUTPUT_MIME_TYPE,
                },
            },
        };

        debug!(
            "Imagen request: aspect_ratio={}, prompt_chars={}",
            aspect_ratio,
            prompt.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Imagen API returned {}: {}", status, body);
            return Err(ImageServiceError::Api {
                status: status.as_u16(),
                message: extract_api_message(&body),
            });
        }

        let predict: PredictResponse = response.json().await?;
        first_image(predict)
    }
}

#[async_trait]
impl ImageGenerator for ImagenClient {
    async fn generate_cover_image(
        &self,
        settings: &CoverSettings,
    ) -> Result<GeneratedImage, ImageServiceError> {
        let prompt = prompts::cover_prompt(settings);
        self.predict(&prompt, settings.aspect_ratio).await
    }

    async fn generate_typography_image(
        &self,
        settings: &TypographySettings,
    ) -> Result<GeneratedImage, ImageServiceError> {
        let prompt = prompts::typography_prompt(settings);
        self.predict(&prompt, settings.aspect_ratio).await
    }
}

/// Pulls `error.message` out of a Google API error body, falling back to the
/// raw body.
fn extract_api_message(body: &str) -> String {
    serde_json::from_str::<GoogleError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn first_image(response: PredictResponse) -> Result<GeneratedImage, ImageServiceError> {
    let prediction = response
        .predictions
        .into_iter()
        .find(|p| p.bytes_base64_encoded.is_some())
        .ok_or(ImageServiceError::NoImage)?;

    let encoded = prediction.bytes_base64_encoded.unwrap_or_default();
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ImageServiceError::Malformed(e.to_string()))?;

    if bytes.is_empty() {
        return Err(ImageServiceError::NoImage);
    }

    let mime_type = prediction
        .mime_type
        .unwrap_or_else(|| OUTPUT_MIME_TYPE.to_string());

    Ok(GeneratedImage::new(bytes, mime_type))
}

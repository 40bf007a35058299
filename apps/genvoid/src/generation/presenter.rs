//! Result presenter: what the result panel shows for each generation state,
//! and the download action for a finished image.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;

use crate::generation::status::GenerationStatus;
use crate::models::image::ArtifactKind;

pub const IDLE_HINT: &str = "Your generated image will appear here.";
pub const IDLE_DETAIL: &str = "Fill out the options and click \"Generate\".";
pub const LOADING_MESSAGE: &str = "Generating your masterpiece...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Presentation {
    Idle {
        hint: &'static str,
        detail: &'static str,
    },
    Loading {
        message: &'static str,
    },
    Error {
        message: String,
    },
    Success {
        image_url: String,
        download: DownloadAction,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadAction {
    pub file_name: String,
}

pub fn present(status: &GenerationStatus, kind: ArtifactKind) -> Presentation {
    match status {
        GenerationStatus::Idle => Presentation::Idle {
            hint: IDLE_HINT,
            detail: IDLE_DETAIL,
        },
        GenerationStatus::Loading { .. } => Presentation::Loading {
            message: LOADING_MESSAGE,
        },
        GenerationStatus::Error(message) => Presentation::Error {
            message: message.clone(),
        },
        GenerationStatus::Success(image) => Presentation::Success {
            image_url: image.to_data_url(),
            download: DownloadAction {
                file_name: kind.file_name(),
            },
        },
    }
}

/// A finished image materialized as a named file.
#[derive(Debug, Clone)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

/// The download is only available once an image exists.
pub fn download(status: &GenerationStatus, kind: ArtifactKind) -> Option<DownloadArtifact> {
    status.image().map(|image| DownloadArtifact {
        file_name: kind.file_name(),
        mime_type: image.mime_type.clone(),
        bytes: image.bytes.clone(),
    })
}

impl IntoResponse for DownloadArtifact {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name);
        (
            [
                (header::CONTENT_TYPE, self.mime_type),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

use serde::Serialize;

use crate::models::image::GeneratedImage;

/// Where a session's current request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    Idle,
    Loading,
    Success,
    Error,
}

/// Generation state plus the data that only exists in that state.
///
/// The image lives only in `Success` and the message only in `Error`, so the
/// two can never disagree with the state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationStatus {
    #[default]
    Idle,
    Loading {
        request_id: u64,
    },
    Success(GeneratedImage),
    Error(String),
}

impl GenerationStatus {
    pub fn state(&self) -> GenerationState {
        match self {
            GenerationStatus::Idle => GenerationState::Idle,
            GenerationStatus::Loading { .. } => GenerationState::Loading,
            GenerationStatus::Success(_) => GenerationState::Success,
            GenerationStatus::Error(_) => GenerationState::Error,
        }
    }

    pub fn image(&self) -> Option<&GeneratedImage> {
        match self {
            GenerationStatus::Success(image) => Some(image),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match self {
            GenerationStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Id of the outstanding request, if any.
    pub fn in_flight(&self) -> Option<u64> {
        match self {
            GenerationStatus::Loading { request_id } => Some(*request_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_present_only_on_success() {
        let image = GeneratedImage::new(vec![0u8; 4], "image/png");
        let statuses = [
            GenerationStatus::Idle,
            GenerationStatus::Loading { request_id: 1 },
            GenerationStatus::Success(image),
            GenerationStatus::Error("boom".to_string()),
        ];
        for status in &statuses {
            assert_eq!(
                status.image().is_some(),
                status.state() == GenerationState::Success
            );
            assert_eq!(
                status.error().is_some(),
                status.state() == GenerationState::Error
            );
        }
    }

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(GenerationState::Loading).unwrap(),
            "loading"
        );
    }
}

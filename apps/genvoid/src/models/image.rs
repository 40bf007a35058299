use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::Serialize;

/// The two things GenVoid can produce. Decides the download file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Cover,
    Typography,
}

impl ArtifactKind {
    pub fn file_stem(&self) -> &'static str {
        match self {
            ArtifactKind::Cover => "webnovel-cover",
            ArtifactKind::Typography => "webnovel-typography",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.png", self.file_stem())
    }
}

/// Image bytes returned by the collaborator. Owned by one session and
/// replaced on every regeneration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    /// `data:` URL suitable for an `<img src>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

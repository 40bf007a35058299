//! Form settings for the two generators.
//!
//! Field names on the wire match the form inputs (`negativePrompt`,
//! `aspectRatio`), so a field update by name is a shallow merge into one of
//! these structs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Enumerated field values
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "3:4")]
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Widescreen,
        AspectRatio::Tall,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Tall => "9:16",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Portrait => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s.trim())
            .ok_or_else(|| AppError::Validation(format!("Unsupported aspect ratio '{s}'")))
    }
}

/// Art styles offered by the cover form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverStyle {
    #[serde(rename = "Anime/Manga")]
    AnimeManga,
    #[serde(rename = "Default")]
    Default,
    #[serde(rename = "Photorealistic")]
    Photorealistic,
    #[serde(rename = "Fantasy Art")]
    FantasyArt,
    #[serde(rename = "Sci-Fi Concept Art")]
    SciFiConceptArt,
    #[serde(rename = "Oil Painting")]
    OilPainting,
}

impl CoverStyle {
    pub const ALL: [CoverStyle; 6] = [
        CoverStyle::AnimeManga,
        CoverStyle::Default,
        CoverStyle::Photorealistic,
        CoverStyle::FantasyArt,
        CoverStyle::SciFiConceptArt,
        CoverStyle::OilPainting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverStyle::AnimeManga => "Anime/Manga",
            CoverStyle::Default => "Default",
            CoverStyle::Photorealistic => "Photorealistic",
            CoverStyle::FantasyArt => "Fantasy Art",
            CoverStyle::SciFiConceptArt => "Sci-Fi Concept Art",
            CoverStyle::OilPainting => "Oil Painting",
        }
    }
}

impl fmt::Display for CoverStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoverStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s.trim())
            .ok_or_else(|| AppError::Validation(format!("Unsupported art style '{s}'")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Settings records
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_NEGATIVE_PROMPT: &str = "bad limbs, unattached limbs, ugly, disfigured, blurry";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverSettings {
    pub prompt: String,
    pub negative_prompt: String,
    pub aspect_ratio: AspectRatio,
    pub style: CoverStyle,
}

impl Default for CoverSettings {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            aspect_ratio: AspectRatio::Portrait,
            style: CoverStyle::AnimeManga,
        }
    }
}

impl CoverSettings {
    /// Replaces exactly one field by its form name. Other fields are untouched,
    /// and an invalid value leaves the record unchanged.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        match name {
            "prompt" => self.prompt = value.to_string(),
            "negativePrompt" => self.negative_prompt = value.to_string(),
            "aspectRatio" => self.aspect_ratio = value.parse()?,
            "style" => self.style = value.parse()?,
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown cover field '{other}'"
                )))
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographySettings {
    pub title: String,
    pub theme: String,
    pub colors: String,
    pub elements: String,
    pub aspect_ratio: AspectRatio,
}

impl Default for TypographySettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            theme: String::new(),
            colors: String::new(),
            elements: String::new(),
            aspect_ratio: AspectRatio::Widescreen,
        }
    }
}

impl TypographySettings {
    /// Same shallow-merge contract as [`CoverSettings::set_field`].
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        match name {
            "title" => self.title = value.to_string(),
            "theme" => self.theme = value.to_string(),
            "colors" => self.colors = value.to_string(),
            "elements" => self.elements = value.to_string(),
            "aspectRatio" => self.aspect_ratio = value.parse()?,
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown typography field '{other}'"
                )))
            }
        }
        Ok(())
    }
}

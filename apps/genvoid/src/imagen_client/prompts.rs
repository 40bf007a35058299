// Prompt builders for the two generators.
// Inputs are the settings exactly as they will be sent; typography defaults
// have already been filled in by the time these run.

use crate::models::settings::{CoverSettings, CoverStyle, TypographySettings};

/// Shared tail for every cover prompt.
pub const COVER_QUALITY_INSTRUCTION: &str = "Professional webnovel book cover, \
    striking focal composition, rich detail, dramatic lighting. \
    Do not render any text, letters or watermarks.";

/// Shared tail for every typography prompt.
pub const TYPOGRAPHY_LEGIBILITY_INSTRUCTION: &str = "The title text must be spelled exactly \
    as given and remain clearly legible. Center the title on a clean, dark background. \
    Render no other words.";

pub fn cover_prompt(settings: &CoverSettings) -> String {
    let mut prompt = match settings.style {
        CoverStyle::Default => format!("{}.", settings.prompt.trim()),
        style => format!("{style} style artwork. {}.", settings.prompt.trim()),
    };

    prompt.push(' ');
    prompt.push_str(COVER_QUALITY_INSTRUCTION);

    let negative = settings.negative_prompt.trim();
    if !negative.is_empty() {
        prompt.push_str(&format!(" Avoid: {negative}."));
    }

    prompt
}

pub fn typography_prompt(settings: &TypographySettings) -> String {
    format!(
        "Stylized title typography for a webnovel titled \"{title}\". \
         Design theme: {theme}. Color palette: {colors}. \
         Decorative elements woven into the lettering: {elements}. {instruction}",
        title = settings.title.trim(),
        theme = settings.theme.trim(),
        colors = settings.colors.trim(),
        elements = settings.elements.trim(),
        instruction = TYPOGRAPHY_LEGIBILITY_INSTRUCTION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_prompt_includes_style_and_negative() {
        let settings = CoverSettings {
            prompt: "A lone knight on a cliff".to_string(),
            ..CoverSettings::default()
        };
        let prompt = cover_prompt(&settings);
        assert!(prompt.starts_with("Anime/Manga style artwork. A lone knight on a cliff."));
        assert!(prompt.contains("Avoid: bad limbs"));
    }

    #[test]
    fn test_cover_prompt_default_style_has_no_style_prefix() {
        let settings = CoverSettings {
            prompt: "A futuristic city".to_string(),
            negative_prompt: "  ".to_string(),
            style: CoverStyle::Default,
            ..CoverSettings::default()
        };
        let prompt = cover_prompt(&settings);
        assert!(prompt.starts_with("A futuristic city."));
        assert!(!prompt.contains("Avoid:"));
    }

    #[test]
    fn test_typography_prompt_names_every_field() {
        let settings = TypographySettings {
            title: "Chronicles of Atheria".to_string(),
            theme: "Elegant Dark Romance".to_string(),
            colors: "blood red and silver".to_string(),
            elements: "thorny roses and filigree".to_string(),
            ..TypographySettings::default()
        };
        let prompt = typography_prompt(&settings);
        assert!(prompt.contains("\"Chronicles of Atheria\""));
        assert!(prompt.contains("Elegant Dark Romance"));
        assert!(prompt.contains("blood red and silver"));
        assert!(prompt.contains("thorny roses and filigree"));
    }
}

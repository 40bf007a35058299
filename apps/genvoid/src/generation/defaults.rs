//! Default randomizer for the typography form.
//!
//! Optional fields left blank get one random candidate at submit time. Only
//! the outgoing copy is filled; the session's settings stay as the user left
//! them.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::settings::TypographySettings;

pub const THEME_CANDIDATES: [&str; 5] = [
    "Epic Fantasy with magical glows",
    "Sleek High-Tech Sci-Fi",
    "Elegant Dark Romance",
    "Mysterious Cosmic Horror",
    "Painted Storybook style",
];

pub const COLOR_CANDIDATES: [&str; 5] = [
    "glowing gold and deep purple",
    "electric blue and neon pink",
    "blood red and silver",
    "black and ethereal white",
    "earthy greens and browns",
];

pub const ELEMENT_CANDIDATES: [&str; 5] = [
    "swirling magical energy",
    "circuit board patterns and data streams",
    "thorny roses and filigree",
    "ancient, cryptic runes",
    "delicate constellations",
];

/// Returns a copy of `settings` with every blank optional field filled.
pub fn fill_blank_defaults<R: Rng + ?Sized>(
    settings: &TypographySettings,
    rng: &mut R,
) -> TypographySettings {
    let mut filled = settings.clone();
    fill_if_blank(&mut filled.theme, &THEME_CANDIDATES, rng);
    fill_if_blank(&mut filled.colors, &COLOR_CANDIDATES, rng);
    fill_if_blank(&mut filled.elements, &ELEMENT_CANDIDATES, rng);
    filled
}

fn fill_if_blank<R: Rng + ?Sized>(field: &mut String, candidates: &[&str], rng: &mut R) {
    if !field.trim().is_empty() {
        return;
    }
    if let Some(choice) = candidates.choose(rng) {
        *field = (*choice).to_string();
    }
}

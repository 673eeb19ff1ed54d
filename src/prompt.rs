//! Prompt templating and model-output cleaning. Pure string work.

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKET_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").expect("valid regex"));
static ANGLE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("valid regex"));

const KNOWN_PREFIXES: &[&str] = &["Slogan:", "Here is a slogan:", "Answer:"];

/// Builds the enriched image-generation prompt for a business.
///
/// Deterministic: a fixed descriptive template, a base quality clause,
/// and a tone clause selected by substring match. Unrecognized tones get
/// the base clause only.
pub fn enhance(business: &str, description: &str, tone: &str) -> String {
    let base = format!("A high-end commercial advertisement poster for {business} featuring {description}.");
    let mut style = String::from("High quality, 8k resolution, cinematic lighting.");
    if tone.contains("Catchy") {
        style.push_str(" Vibrant colors, pop-art style, energetic.");
    } else if tone.contains("Professional") {
        style.push_str(" Sleek, minimalistic, modern office background.");
    } else if tone.contains("Luxury") {
        style.push_str(" Dark moody lighting, gold accents, elegant.");
    } else if tone.contains("Humorous") {
        style.push_str(" Playful, bright lighting, fun props.");
    }
    format!("{base} {style}")
}

/// Strips tag fragments, quotes and known boilerplate prefixes from raw
/// model output.
pub fn clean_model_text(text: &str) -> String {
    let text = BRACKET_TAGS.replace_all(text, "");
    let text = ANGLE_TAGS.replace_all(&text, "");
    let mut text = text.replace(['"', '\''], "").trim().to_string();
    for prefix in KNOWN_PREFIXES {
        if let Some(idx) = text.rfind(prefix) {
            text = text[idx + prefix.len()..].trim().to_string();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhance_includes_business_and_description() {
        let p = enhance("Cafe Luna", "fresh pastries", "Luxury");
        assert!(p.contains("Cafe Luna"));
        assert!(p.contains("fresh pastries"));
        assert!(p.contains("High quality, 8k resolution"));
        assert!(p.contains("gold accents"));
    }

    #[test]
    fn enhance_unknown_tone_gets_base_style_only() {
        let p = enhance("Cafe Luna", "fresh pastries", "Unknown");
        assert!(p.contains("High quality, 8k resolution, cinematic lighting."));
        assert!(!p.contains("pop-art"));
        assert!(!p.contains("gold accents"));
        assert!(!p.contains("office background"));
        assert!(!p.contains("fun props"));
    }

    #[test]
    fn enhance_tone_match_is_substring_and_case_sensitive() {
        assert!(enhance("A", "b", "Very Catchy!").contains("pop-art"));
        assert!(!enhance("A", "b", "catchy").contains("pop-art"));
    }

    #[test]
    fn clean_strips_tags_quotes_and_prefixes() {
        assert_eq!(clean_model_text("Slogan: \"Best Coffee\""), "Best Coffee");
        assert_eq!(clean_model_text("[intro] Fresh <b>Bread</b> Daily"), "Fresh Bread Daily");
        assert_eq!(clean_model_text("Here is a slogan: Taste The Sun"), "Taste The Sun");
        assert_eq!(clean_model_text("  padded  "), "padded");
    }
}

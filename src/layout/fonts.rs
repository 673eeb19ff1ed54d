//! Font loading with a process-wide cache and a compiled-in fallback.
//!
//! Poster rendering must never fail because a font file is missing, so
//! every lookup degrades to the bundled default face.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rusttype::Font;
use std::{collections::HashMap, path::PathBuf, sync::Arc};

static FONT_CACHE: Lazy<Mutex<HashMap<String, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

static DEFAULT_FONT: Lazy<Arc<Font<'static>>> = Lazy::new(|| {
    let bytes: &'static [u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");
    Arc::new(Font::try_from_bytes(bytes).expect("bundled font is a valid TTF"))
});

fn fonts_dir() -> PathBuf {
    std::env::var("FONTS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
            manifest_dir.join("assets").join("fonts")
        })
}

/// Loads `name` from the fonts directory, falling back to the bundled
/// default face when the file is missing or unparseable. Never fails.
pub fn load_font_or_default(name: &str) -> Arc<Font<'static>> {
    if let Some(f) = FONT_CACHE.lock().get(name) {
        return Arc::clone(f);
    }

    let font = match std::fs::read(fonts_dir().join(name)) {
        Ok(bytes) => match Font::try_from_vec(bytes) {
            Some(f) => Arc::new(f),
            None => {
                tracing::warn!(font = name, "font file is not a valid TTF, using default face");
                Arc::clone(&DEFAULT_FONT)
            }
        },
        Err(e) => {
            tracing::debug!(font = name, error = %e, "font not found, using default face");
            Arc::clone(&DEFAULT_FONT)
        }
    };

    FONT_CACHE.lock().insert(name.to_string(), Arc::clone(&font));
    font
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_falls_back_to_default() {
        let f = load_font_or_default("definitely-not-here.ttf");
        // fallback face must be renderable
        let (w, _) = crate::layout::text::measure(&f, 50.0, "FALLBACK");
        assert!(w > 0);
    }

    #[test]
    fn repeated_lookups_hit_the_cache() {
        let a = load_font_or_default("also-missing.ttf");
        let b = load_font_or_default("also-missing.ttf");
        assert!(Arc::ptr_eq(&a, &b));
    }
}

//! Text wrapping, measurement and glyph rasterization.

use image::{ImageBuffer, Rgba};
use rusttype::{point, Font, Scale};

/// Greedy word wrap at a character-count limit.
///
/// Words are accumulated until adding the next one would exceed
/// `max_chars` characters, then a new line starts. A single word longer
/// than the limit is placed whole on its own line, never split.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line.is_empty() {
            line.push_str(word);
            line_len = word_len;
        } else if line_len + 1 + word_len <= max_chars {
            line.push(' ');
            line.push_str(word);
            line_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Pixel bounding box of `text` laid out at `px`.
pub fn measure(font: &Font<'static>, px: f32, text: &str) -> (u32, u32) {
    if text.is_empty() {
        return (0, 0);
    }
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();

    let mut max_x: i32 = 0;
    let mut min_y: i32 = i32::MAX;
    let mut max_y: i32 = 0;
    for g in &glyphs {
        if let Some(bb) = g.pixel_bounding_box() {
            max_x = max_x.max(bb.max.x);
            min_y = min_y.min(bb.min.y);
            max_y = max_y.max(bb.max.y);
        }
    }
    if min_y == i32::MAX {
        // whitespace-only text has no inked glyphs
        return (0, 0);
    }
    (max_x.max(0) as u32, (max_y - min_y).max(0) as u32)
}

/// Draws `text` with its top-left corner at `(x, y)`, alpha-blending
/// glyph coverage onto the buffer. Pixels outside the buffer are clipped.
pub fn draw_text(
    img: &mut ImageBuffer<Rgba<u8>, Vec<u8>>,
    font: &Font<'static>,
    px: f32,
    x: i32,
    y: i32,
    color: Rgba<u8>,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let baseline_y = y as f32 + v_metrics.ascent;

    for glyph in font.layout(text, scale, point(x as f32, baseline_y)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= img.width() || py >= img.height() {
                    return;
                }
                if v <= 0.0 {
                    return;
                }
                let dst = img.get_pixel_mut(px, py);
                let sa = v.min(1.0);
                let inv = 1.0 - sa;
                dst.0[0] = (color.0[0] as f32 * sa + dst.0[0] as f32 * inv) as u8;
                dst.0[1] = (color.0[1] as f32 * sa + dst.0[1] as f32 * inv) as u8;
                dst.0[2] = (color.0[2] as f32 * sa + dst.0[2] as f32 * inv) as u8;
                dst.0[3] = 255;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fonts;

    #[test]
    fn wrap_reconstructs_words_in_order() {
        let s = "the quick brown fox jumps over the lazy dog";
        let lines = wrap(s, 10);
        assert_eq!(lines.join(" "), s);
        for line in &lines {
            assert!(line.chars().count() <= 10, "line too long: {line:?}");
        }
    }

    #[test]
    fn wrap_empty_is_empty() {
        assert!(wrap("", 25).is_empty());
        assert!(wrap("   ", 25).is_empty());
    }

    #[test]
    fn wrap_never_splits_long_words() {
        let lines = wrap("a supercalifragilistic b", 5);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn wrap_fills_lines_greedily() {
        let lines = wrap("aa bb cc dd", 5);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn measure_empty_is_zero() {
        let font = fonts::load_font_or_default("font.ttf");
        assert_eq!(measure(&font, 80.0, ""), (0, 0));
    }

    #[test]
    fn measure_grows_with_text() {
        let font = fonts::load_font_or_default("font.ttf");
        let (short, _) = measure(&font, 80.0, "HI");
        let (long, _) = measure(&font, 80.0, "HI THERE");
        assert!(long > short);
        assert!(short > 0);
    }

    #[test]
    fn draw_text_clips_out_of_bounds() {
        let font = fonts::load_font_or_default("font.ttf");
        let mut img = ImageBuffer::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        // mostly outside the buffer; must not panic
        draw_text(&mut img, &font, 48.0, -30, -30, Rgba([255, 255, 255, 255]), "EDGE");
        draw_text(&mut img, &font, 48.0, 15, 15, Rgba([255, 255, 255, 255]), "EDGE");
    }
}

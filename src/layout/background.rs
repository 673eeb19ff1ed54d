//! Backdrop preparation for the Story layout: cover-resize, blur,
//! center-crop, darken.

use image::{imageops, DynamicImage, ImageBuffer, Rgba, RgbaImage};

/// Margin added around the target before blurring, so the centered crop
/// discards blur edge artifacts.
const BLUR_MARGIN: u32 = 200;

/// Produces a blurred, darkened backdrop of exactly `target_w x target_h`.
///
/// The source is resized (plain stretch, aspect distortion accepted) to
/// the target plus a margin, Gaussian-blurred, center-cropped to the
/// target, then darkened by compositing `overlay` over the whole crop.
/// Sources smaller than the target are simply upscaled.
pub fn prepare_background(
    src: &DynamicImage,
    target_w: u32,
    target_h: u32,
    blur_radius: f32,
    overlay: Rgba<u8>,
) -> RgbaImage {
    let resized = src
        .resize_exact(
            target_w + BLUR_MARGIN,
            target_h + BLUR_MARGIN,
            imageops::FilterType::Lanczos3,
        )
        .to_rgba8();

    let blurred = imageops::fast_blur(&resized, blur_radius);

    let left = (blurred.width() - target_w) / 2;
    let top = (blurred.height() - target_h) / 2;
    let mut cropped = imageops::crop_imm(&blurred, left, top, target_w, target_h).to_image();

    fill_rect_alpha(&mut cropped, 0, 0, target_w, target_h, overlay);
    cropped
}

/// Alpha-composites a solid rectangle over the buffer. Out-of-range rows
/// and columns are clipped.
pub fn fill_rect_alpha(
    img: &mut ImageBuffer<Rgba<u8>, Vec<u8>>,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    color: Rgba<u8>,
) {
    let a = color.0[3] as f32 / 255.0;
    if a <= 0.0 {
        return;
    }
    let inv = 1.0 - a;
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            let dst = img.get_pixel_mut(px, py);
            dst.0[0] = (color.0[0] as f32 * a + dst.0[0] as f32 * inv) as u8;
            dst.0[1] = (color.0[1] as f32 * a + dst.0[1] as f32 * inv) as u8;
            dst.0[2] = (color.0[2] as f32 * a + dst.0[2] as f32 * inv) as u8;
            dst.0[3] = 255;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(w: u32, h: u32, c: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(w, h, Rgb(c)))
    }

    #[test]
    fn output_matches_target_dimensions() {
        let src = solid(640, 480, [120, 40, 40]);
        let bg = prepare_background(&src, 270, 480, 8.0, Rgba([0, 0, 0, 120]));
        assert_eq!((bg.width(), bg.height()), (270, 480));
    }

    #[test]
    fn upscales_sources_smaller_than_target() {
        let src = solid(16, 16, [200, 200, 200]);
        let bg = prepare_background(&src, 300, 500, 4.0, Rgba([0, 0, 0, 120]));
        assert_eq!((bg.width(), bg.height()), (300, 500));
    }

    #[test]
    fn overlay_darkens_the_crop() {
        let src = solid(100, 100, [200, 200, 200]);
        let bg = prepare_background(&src, 80, 80, 0.1, Rgba([0, 0, 0, 120]));
        let p = bg.get_pixel(40, 40);
        assert!(p.0[0] < 200, "expected darkened pixel, got {}", p.0[0]);
    }

    #[test]
    fn fill_rect_alpha_clips_to_buffer() {
        let mut img = ImageBuffer::from_pixel(10, 10, Rgba([100, 100, 100, 255]));
        fill_rect_alpha(&mut img, 5, 5, 100, 100, Rgba([0, 0, 0, 255]));
        assert_eq!(img.get_pixel(9, 9).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [100, 100, 100, 255]);
    }

    #[test]
    fn zero_alpha_overlay_is_a_noop() {
        let mut img = ImageBuffer::from_pixel(4, 4, Rgba([12, 34, 56, 255]));
        fill_rect_alpha(&mut img, 0, 0, 4, 4, Rgba([255, 255, 255, 0]));
        assert_eq!(img.get_pixel(2, 2).0, [12, 34, 56, 255]);
    }
}

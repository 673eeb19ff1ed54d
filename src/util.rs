use base64::Engine;
use image::RgbImage;
use std::io::Cursor;

pub fn parse_data_uri(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(rest) = s.strip_prefix("data:") {
        // data:image/jpeg;base64,....
        let (_, b64) = rest.split_once(',')?;
        return Some(b64.trim().to_string());
    }
    // assume plain base64
    Some(s.to_string())
}

pub fn b64_decode(input: &str) -> Option<Vec<u8>> {
    let b64 = parse_data_uri(input)?;
    let engine = base64::engine::general_purpose::STANDARD;
    engine.decode(b64.as_bytes()).ok()
}

pub fn jpeg_encode_rgb8(img: &RgbImage) -> Result<Vec<u8>, String> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg)
        .map_err(|e| format!("jpeg encode: {e}"))?;
    Ok(buf.into_inner())
}

/// Wraps JPEG bytes as a `data:image/jpeg;base64,...` URI for the JSON
/// response.
pub fn jpeg_data_uri(jpeg: &[u8]) -> String {
    let engine = base64::engine::general_purpose::STANDARD;
    format!("data:image/jpeg;base64,{}", engine.encode(jpeg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn data_uri_round_trip_preserves_dimensions() {
        let img: RgbImage = ImageBuffer::from_pixel(64, 48, Rgb([180, 40, 90]));
        let jpeg = jpeg_encode_rgb8(&img).unwrap();
        let uri = jpeg_data_uri(&jpeg);
        assert!(uri.starts_with("data:image/jpeg;base64,"));

        let bytes = b64_decode(&uri).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn parse_data_uri_accepts_plain_base64() {
        assert_eq!(parse_data_uri("aGVsbG8="), Some("aGVsbG8=".to_string()));
        assert_eq!(parse_data_uri(""), None);
        assert_eq!(
            parse_data_uri("data:image/png;base64,aGVsbG8="),
            Some("aGVsbG8=".to_string())
        );
    }
}

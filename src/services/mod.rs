//! Generation pipeline: inference calls plus the deterministic layout
//! pass. Each request is single-pass and stateless.

use thiserror::Error;

use crate::hf::{self, HfConfig, HfError};
use crate::layout::{self, PosterFormat};
use crate::{prompt, util};

#[derive(Debug, Error)]
pub enum GenError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("inference: {0}")]
    Inference(#[from] HfError),
    #[error("image: {0}")]
    Image(String),
}

pub struct PosterOutput {
    pub image_url: String,
    pub slogan: String,
}

pub struct AnalysisOutput {
    pub description: String,
    pub business_type: String,
    pub tone: String,
}

const FALLBACK_CAPTION: &str = "A product image";

/// Full poster pipeline: slogan generation, prompt enhancement, image
/// generation, composition, JPEG + base64 data URI.
pub async fn generate_poster(
    http: &reqwest::Client,
    cfg: &HfConfig,
    business_type: &str,
    product_description: &str,
    tone: &str,
    language: &str,
    format: PosterFormat,
) -> Result<PosterOutput, GenError> {
    let slogan_prompt = format!("Write a catchy 5-word slogan for {business_type} in {language} language.");
    let raw = hf::chat_completion(http, cfg, &slogan_prompt, 40).await?;
    let slogan = prompt::clean_model_text(&raw);

    let image_prompt = prompt::enhance(business_type, product_description, tone);
    tracing::info!(prompt = %image_prompt, "generating poster image");
    let bytes = hf::text_to_image(http, cfg, &image_prompt).await?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| GenError::Image(format!("decode generated image: {e}")))?;

    let poster = layout::compose(&img, business_type, &slogan, format);
    let jpeg = util::jpeg_encode_rgb8(&poster).map_err(GenError::Image)?;

    Ok(PosterOutput {
        image_url: util::jpeg_data_uri(&jpeg),
        slogan,
    })
}

/// Standalone slogan generation.
pub async fn generate_slogan(
    http: &reqwest::Client,
    cfg: &HfConfig,
    business_type: &str,
    product_description: &str,
    tone: &str,
    language: &str,
) -> Result<String, GenError> {
    let p = format!(
        "Write a {tone} slogan for {business_type} ({product_description}) in {language} language. Output ONLY the slogan."
    );
    let raw = hf::chat_completion(http, cfg, &p, 60).await?;
    Ok(prompt::clean_model_text(&raw))
}

/// Captions an uploaded product photo and guesses a business name and
/// tone from the caption.
pub async fn analyze_image(
    http: &reqwest::Client,
    cfg: &HfConfig,
    upload: &[u8],
) -> Result<AnalysisOutput, GenError> {
    let img = image::load_from_memory(upload)
        .map_err(|e| GenError::BadRequest(format!("invalid image: {e}")))?;
    let thumb = img.thumbnail(512, 512).to_rgb8();
    let jpeg = util::jpeg_encode_rgb8(&thumb).map_err(GenError::Image)?;

    let caption = hf::caption_image(http, cfg, jpeg)
        .await
        .unwrap_or_else(|| FALLBACK_CAPTION.to_string());

    let guess_prompt = format!(
        "Based on: '{caption}', guess a short Business Name (max 3 words) and Tone. Format: Name | Tone"
    );
    let guess = hf::chat_completion(http, cfg, &guess_prompt, 50).await?;

    let (name, tone) = match guess.split_once('|') {
        Some((n, t)) => (n.trim().to_string(), t.trim().to_string()),
        None => ("Auto Business".to_string(), "Professional".to_string()),
    };

    Ok(AnalysisOutput {
        description: caption,
        business_type: name,
        tone,
    })
}

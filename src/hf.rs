//! Hugging Face Inference API client: chat completion, text-to-image
//! and best-effort image captioning.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HfError {
    #[error("http: {0}")]
    Http(String),
    #[error("inference api error {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("model returned no choices")]
    EmptyCompletion,
}

const DEFAULT_API_URL: &str = "https://router.huggingface.co";
const DEFAULT_TEXT_MODEL: &str = "Qwen/Qwen2.5-72B-Instruct";
const DEFAULT_IMAGE_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";
const DEFAULT_VISION_MODEL: &str = "Salesforce/blip-image-captioning-base";

#[derive(Clone, Debug)]
pub struct HfConfig {
    pub token: Option<String>,
    pub api_url: String,
    pub text_model: String,
    pub image_model: String,
    pub vision_model: String,
}

impl HfConfig {
    pub fn from_env() -> Self {
        let token = std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty());
        if token.is_none() {
            tracing::warn!("no HF_TOKEN found, inference calls will be unauthenticated");
        }
        Self {
            token,
            api_url: std::env::var("HF_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            text_model: std::env::var("TEXT_MODEL").unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string()),
            image_model: std::env::var("IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string()),
            vision_model: std::env::var("VISION_MODEL").unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string()),
        }
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct CaptionResult {
    generated_text: Option<String>,
}

/// Sends a single-turn user prompt to the chat completion endpoint and
/// returns the raw assistant message.
pub async fn chat_completion(
    http: &reqwest::Client,
    cfg: &HfConfig,
    prompt: &str,
    max_tokens: u32,
) -> Result<String, HfError> {
    let url = format!("{}/v1/chat/completions", cfg.api_url);
    let body = serde_json::json!({
        "model": cfg.text_model,
        "messages": [{"role": "user", "content": prompt}],
        "max_tokens": max_tokens,
    });

    let resp = cfg
        .authorize(http.post(url))
        .json(&body)
        .send()
        .await
        .map_err(|e| HfError::Http(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(HfError::Api { status, body });
    }

    let parsed = resp
        .json::<ChatCompletionResponse>()
        .await
        .map_err(|e| HfError::Http(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.trim().to_string())
        .ok_or(HfError::EmptyCompletion)
}

/// Generates an image for `prompt` and returns the raw encoded bytes.
pub async fn text_to_image(
    http: &reqwest::Client,
    cfg: &HfConfig,
    prompt: &str,
) -> Result<Vec<u8>, HfError> {
    let url = format!("{}/hf-inference/models/{}", cfg.api_url, cfg.image_model);
    let body = serde_json::json!({"inputs": prompt});

    let resp = cfg
        .authorize(http.post(url))
        .json(&body)
        .send()
        .await
        .map_err(|e| HfError::Http(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(HfError::Api { status, body });
    }

    let bytes = resp.bytes().await.map_err(|e| HfError::Http(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Best-effort image captioning with a small retry loop for model
/// cold-starts (HTTP 503). Any terminal failure yields `None`; the
/// caller substitutes a fallback caption.
pub async fn caption_image(http: &reqwest::Client, cfg: &HfConfig, jpeg: Vec<u8>) -> Option<String> {
    let url = format!("{}/hf-inference/models/{}", cfg.api_url, cfg.vision_model);

    for attempt in 0..3 {
        let resp = cfg
            .authorize(http.post(url.as_str()))
            .body(jpeg.clone())
            .send()
            .await;

        match resp {
            Ok(resp) if resp.status().is_success() => {
                let results = resp.json::<Vec<CaptionResult>>().await.ok()?;
                return results.into_iter().next().and_then(|r| r.generated_text);
            }
            Ok(resp) if resp.status() == StatusCode::SERVICE_UNAVAILABLE => {
                tracing::debug!(attempt, "captioning model is loading, retrying");
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "captioning request failed");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "captioning request failed");
                return None;
            }
        }
    }
    None
}

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::layout::PosterFormat;
use crate::services::{self, GenError};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SloganRequest {
    pub business_type: String,
    #[serde(default)]
    pub product_description: String,
    /// Tone of the ad, e.g. "Catchy", "Professional", "Luxury", "Humorous".
    #[serde(default)]
    pub ad_type: String,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PosterRequest {
    pub business_type: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub ad_type: String,
    pub language: Option<String>,
    /// "Square" or "Story"; anything else is treated as Square.
    pub format: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SloganResponse {
    pub status: String,
    pub slogan: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PosterResponse {
    pub status: String,
    /// `data:image/jpeg;base64,...` URI of the composed poster.
    pub image_url: String,
    pub slogan: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub status: String,
    pub description: String,
    pub business_type: String,
    pub tone: String,
}

type ApiError = (StatusCode, Json<Value>);

fn error_response(e: GenError) -> ApiError {
    let status = match &e {
        GenError::BadRequest(_) => StatusCode::BAD_REQUEST,
        GenError::Inference(_) => StatusCode::BAD_GATEWAY,
        GenError::Image(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({"status": "error", "error": e.to_string()})))
}

#[utoipa::path(get, path = "/", tag = "postergen", responses((status=200, body=Value)))]
pub async fn home() -> impl IntoResponse {
    Json(json!({"status": "active", "message": "Postergen backend is live"}))
}

#[utoipa::path(get, path = "/health", tag = "postergen", responses((status=200, body=Value)))]
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

#[utoipa::path(
    post,
    path = "/generate-slogan",
    tag = "postergen",
    request_body = SloganRequest,
    responses(
        (status=200, body=SloganResponse),
        (status=502, description="Inference backend failed")
    )
)]
pub async fn generate_slogan(
    State(st): State<Arc<AppState>>,
    Json(req): Json<SloganRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let language = req.language.as_deref().unwrap_or("English");
    let slogan = services::generate_slogan(
        &st.http,
        &st.hf,
        &req.business_type,
        &req.product_description,
        &req.ad_type,
        language,
    )
    .await
    .map_err(error_response)?;

    Ok(Json(SloganResponse { status: "success".into(), slogan }))
}

#[utoipa::path(
    post,
    path = "/generate-poster",
    tag = "postergen",
    request_body = PosterRequest,
    responses(
        (status=200, body=PosterResponse),
        (status=502, description="Inference backend failed")
    )
)]
pub async fn generate_poster(
    State(st): State<Arc<AppState>>,
    Json(req): Json<PosterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let language = req.language.as_deref().unwrap_or("English");
    let format = PosterFormat::from_wire(req.format.as_deref().unwrap_or("Square"));

    let out = services::generate_poster(
        &st.http,
        &st.hf,
        &req.business_type,
        &req.product_description,
        &req.ad_type,
        language,
        format,
    )
    .await
    .map_err(error_response)?;

    Ok(Json(PosterResponse {
        status: "success".into(),
        image_url: out.image_url,
        slogan: out.slogan,
    }))
}

#[utoipa::path(
    post,
    path = "/analyze-image",
    tag = "postergen",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status=200, body=AnalyzeResponse),
        (status=400, description="Missing or invalid file"),
        (status=502, description="Inference backend failed")
    )
)]
pub async fn analyze_image(
    State(st): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut file: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_response(GenError::BadRequest(format!("invalid multipart body: {e}")))
    })? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|e| {
                error_response(GenError::BadRequest(format!("failed to read file: {e}")))
            })?;
            file = Some(bytes.to_vec());
        }
    }

    let file = file.ok_or_else(|| error_response(GenError::BadRequest("No file".into())))?;

    let out = services::analyze_image(&st.http, &st.hf, &file)
        .await
        .map_err(error_response)?;

    Ok(Json(AnalyzeResponse {
        status: "success".into(),
        description: out.description,
        business_type: out.business_type,
        tone: out.tone,
    }))
}

//! HTTP handlers: health, diagnose, crop catalog.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use fasal_core::{CropCatalog, DiagnosisRequest, DiagnosisResponse, VERSION};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;

/// Health check payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub version: String,
    pub ai_provider: String,
}

/// `GET /`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        message: "FasalRakshak API is running".to_string(),
        version: VERSION.to_string(),
        ai_provider: state.diagnoser.provider_name().to_string(),
    })
}

/// Diagnose parameters accepted on the query string.
#[derive(Debug, Default, Deserialize)]
pub struct DiagnoseQuery {
    pub crop_type: Option<String>,
    pub language: Option<String>,
    pub location: Option<String>,
}

/// `POST /api/diagnose`
///
/// # Multipart Fields
/// - `image`: crop photo (required)
/// - `crop_type`, `language`, `location`: optional; override the query string
/// - `symptoms`: optional, repeatable
///
/// # Returns
/// - 200 with the diagnosis record
/// - 400 if the upload is not a decodable image
/// - 422 if no `image` part was sent
/// - 500 if no provider is configured or the provider call fails
pub async fn diagnose(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DiagnoseQuery>,
    mut multipart: Multipart,
) -> Result<Json<DiagnosisResponse>, ApiError> {
    let mut image: Option<Vec<u8>> = None;
    let mut request = DiagnosisRequest {
        crop_type: query.crop_type,
        location: query.location,
        ..DiagnosisRequest::default()
    };
    if let Some(language) = query.language {
        request.language = language;
    }

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => image = Some(field.bytes().await?.to_vec()),
            Some("crop_type") => request.crop_type = Some(field.text().await?),
            Some("language") => request.language = field.text().await?,
            Some("location") => request.location = Some(field.text().await?),
            Some("symptoms") => request.symptoms.push(field.text().await?),
            _ => {} // ignore unknown fields
        }
    }

    let image =
        image.ok_or_else(|| ApiError::unprocessable("Missing image file in multipart form"))?;

    tracing::debug!(
        crop_type = ?request.crop_type(),
        language = %request.language,
        symptoms = request.symptoms.len(),
        bytes = image.len(),
        "Diagnose request"
    );

    let response = state.diagnoser.diagnose(image, &request).await?;
    Ok(Json(response))
}

/// `GET /api/crops`
pub async fn crops() -> Json<CropCatalog> {
    Json(CropCatalog::new())
}

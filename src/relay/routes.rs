use super::error::RelayError;
use super::RelayState;
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use tracing::{info, warn};

struct UploadedImage {
    file_name: String,
    content_type: String,
    bytes: Bytes,
}

pub async fn health_handler(State(state): State<RelayState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "modelConfigured": state.model_api_url.is_some(),
    }))
}

/// `image` と `binData` を受け取り、モデルサービスへ `image` と `bin_data` として転送する
pub async fn analyze_bin_handler(
    State(state): State<RelayState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, RelayError> {
    let mut image: Option<UploadedImage> = None;
    let mut bin_data: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::MalformedPayload(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RelayError::MalformedPayload(e.to_string()))?;
                if !bytes.is_empty() {
                    image = Some(UploadedImage {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            Some("binData") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| RelayError::MalformedPayload(e.to_string()))?;
                if !text.trim().is_empty() {
                    bin_data = Some(text);
                }
            }
            _ => {}
        }
    }

    let (Some(image), Some(bin_data)) = (image, bin_data) else {
        return Err(RelayError::MissingFields);
    };

    let bin_data: Value = serde_json::from_str(&bin_data)
        .map_err(|e| RelayError::MalformedPayload(format!("binData: {}", e)))?;

    let model_api_url = state
        .model_api_url
        .as_deref()
        .ok_or(RelayError::ModelNotConfigured)?;

    info!(file = %image.file_name, size = image.bytes.len(), "forwarding to model api");

    let image_part = Part::bytes(image.bytes.to_vec())
        .file_name(image.file_name)
        .mime_str(&image.content_type)
        .map_err(|e| RelayError::MalformedPayload(format!("image content type: {}", e)))?;
    let form = Form::new()
        .part("image", image_part)
        .text("bin_data", bin_data.to_string());

    let response = state
        .client
        .post(model_api_url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "model api request failed");
            RelayError::Upstream(e.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!(%status, "model api returned error status");
        return Err(RelayError::UpstreamStatus(
            status.canonical_reason().unwrap_or(status.as_str()).to_string(),
        ));
    }

    let results: Value = response
        .json()
        .await
        .map_err(|e| RelayError::Upstream(format!("invalid response: {}", e)))?;

    Ok(Json(results))
}

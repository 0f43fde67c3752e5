//! HTTP検出ソース
//!
//! `image`（画像バイナリ）と `binData`（JSON）をmultipartで送信し、
//! `[{product, score}]` 形式のレスポンスを検出結果として受け取る。

use super::DetectionSource;
use crate::config::Config;
use crate::error::{BinVerifyError, Result};
use crate::image_input::BinImage;
use bin_verify_common::{
    parse_detection_response, BinData, Detection, DetectionResponse, ExpectedItem,
};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// エラーメッセージに含めるレスポンス本文の最大文字数
const ERROR_BODY_PREVIEW: usize = 200;

pub struct HttpDetectionSource {
    client: reqwest::Client,
    endpoint: String,
    timeout_seconds: u64,
}

impl HttpDetectionSource {
    pub fn new(endpoint: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout_seconds,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.endpoint()?, config.timeout_seconds)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_error(&self, error: reqwest::Error) -> BinVerifyError {
        if error.is_timeout() {
            BinVerifyError::DetectionTimeout(self.timeout_seconds)
        } else {
            BinVerifyError::DetectionRequest(error)
        }
    }
}

impl DetectionSource for HttpDetectionSource {
    async fn detect(&self, image: &BinImage, items: &[ExpectedItem]) -> Result<Vec<Detection>> {
        let bin_data = BinData::from_items(items).to_json()?;

        let image_part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)?;
        let form = Form::new()
            .part("image", image_part)
            .text("binData", bin_data);

        tracing::debug!(endpoint = %self.endpoint, items = items.len(), "sending detection request");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(BinVerifyError::DetectionStatus(format!("{} {}", status, preview.trim())));
        }

        match parse_detection_response(&body)
            .map_err(|e| BinVerifyError::MalformedResponse(e.to_string()))?
        {
            DetectionResponse::Detections(detections) => {
                tracing::debug!(count = detections.len(), "detections received");
                Ok(detections)
            }
            DetectionResponse::Failure(message) => Err(BinVerifyError::DetectionStatus(message)),
        }
    }
}

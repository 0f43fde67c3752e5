use super::DetectionSource;
use crate::error::{BinVerifyError, Result};
use crate::image_input::BinImage;
use bin_verify_common::{parse_detection_response, Detection, DetectionResponse, ExpectedItem};
use std::path::Path;

/// 保存済みの検出結果を返す検出ソース
#[derive(Debug, Clone, Default)]
pub struct RecordedDetections {
    detections: Vec<Detection>,
}

impl RecordedDetections {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// 検出サービスと同じ形式のJSONから読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        match parse_detection_response(json)
            .map_err(|e| BinVerifyError::MalformedResponse(e.to_string()))?
        {
            DetectionResponse::Detections(detections) => Ok(Self::new(detections)),
            DetectionResponse::Failure(message) => Err(BinVerifyError::DetectionStatus(message)),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BinVerifyError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }
}

impl DetectionSource for RecordedDetections {
    async fn detect(&self, _image: &BinImage, _items: &[ExpectedItem]) -> Result<Vec<Detection>> {
        Ok(self.detections.clone())
    }
}

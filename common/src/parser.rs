//! 検出APIレスポンスパーサー
//!
//! 画像分類サービス（またはリレー）のレスポンスから検出結果を取り出す。
//!
//! 受け付ける形式:
//! 1. `[{"product": "...", "score": 0.8}, ...]`（リレーの配列形式）
//! 2. `{"results": [...], "expected_quantity": 3}`（モデルサービス形式）
//! 3. `{"error": "..."}`（サービス側のエラー）

use crate::error::{Error, Result};
use crate::types::Detection;
use serde_json::Value;

/// 検出レスポンスの解釈結果
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionResponse {
    /// 検出結果（空の場合もある）
    Detections(Vec<Detection>),
    /// サービスがエラーを返した
    Failure(String),
}

/// 検出レスポンスをパース
///
/// 1件でも不正な要素（ラベルが空、スコアが範囲外など）があればレスポンス全体をエラーにする。
///
/// # Examples
/// ```
/// use bin_verify_common::{parse_detection_response, DetectionResponse};
///
/// let body = r#"[{"product": "Pen", "score": 0.3}]"#;
/// match parse_detection_response(body).unwrap() {
///     DetectionResponse::Detections(d) => assert_eq!(d[0].label(), "Pen"),
///     DetectionResponse::Failure(_) => unreachable!(),
/// }
/// ```
pub fn parse_detection_response(body: &str) -> Result<DetectionResponse> {
    let value: Value = serde_json::from_str(body.trim())
        .map_err(|e| Error::Parse(format!("検出レスポンス JSONパースエラー: {}", e)))?;

    match value {
        Value::Array(_) => detections_from_value(value).map(DetectionResponse::Detections),
        Value::Object(mut map) => {
            if let Some(error) = map.remove("error") {
                let message = match error {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                return Ok(DetectionResponse::Failure(message));
            }
            match map.remove("results") {
                Some(results) => detections_from_value(results).map(DetectionResponse::Detections),
                None => Err(Error::Parse(
                    "検出レスポンスに results がありません".into(),
                )),
            }
        }
        _ => Err(Error::Parse("検出レスポンスが配列でもオブジェクトでもありません".into())),
    }
}

fn detections_from_value(value: Value) -> Result<Vec<Detection>> {
    serde_json::from_value(value)
        .map_err(|e| Error::Parse(format!("検出結果が不正です: {}", e)))
}

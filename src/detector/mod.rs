//! 検出ソース
//!
//! 画像と期待品目を受け取り、ラベルと信頼度の組を返す外部機能の抽象。
//! - HttpDetectionSource: リレー/モデルサービスへmultipartで送信
//! - RecordedDetections: 保存済みの検出結果を返す（オフライン照合・テスト用）

mod http;
mod recorded;

pub use http::HttpDetectionSource;
pub use recorded::RecordedDetections;

use crate::error::Result;
use crate::image_input::BinImage;
use bin_verify_common::{Detection, ExpectedItem};

/// 検出ソース
///
/// 失敗（通信・ステータス・不正レスポンス・タイムアウト）は必ず `Err` で返し、
/// 検出0件（`Ok(vec![])`）とは区別すること。返す `Detection` は検証済み。
#[allow(async_fn_in_trait)]
pub trait DetectionSource {
    async fn detect(&self, image: &BinImage, items: &[ExpectedItem]) -> Result<Vec<Detection>>;
}

//! 解析セッション
//!
//! 1回の照合作業の状態（画像・期待品目・結果・直近のエラー）を保持する。
//! `run` は `&mut self` を取るため、実行中の再入はできない。

use crate::detector::DetectionSource;
use crate::error::{BinVerifyError, Result};
use crate::image_input::BinImage;
use bin_verify_common::{reconcile_with, AnalysisResults, ExpectedItem, ReconcileOptions};

#[derive(Debug, Default)]
pub struct AnalysisSession {
    image: Option<BinImage>,
    expected_items: Vec<ExpectedItem>,
    results: Option<AnalysisResults>,
    last_error: Option<String>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_image(&mut self, image: BinImage) {
        self.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn image(&self) -> Option<&BinImage> {
        self.image.as_ref()
    }

    pub fn add_item(&mut self, item: ExpectedItem) {
        self.expected_items.push(item);
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = ExpectedItem>) {
        self.expected_items.extend(items);
    }

    /// 指定位置の品目を削除（範囲外なら `None`）
    pub fn remove_item(&mut self, index: usize) -> Option<ExpectedItem> {
        (index < self.expected_items.len()).then(|| self.expected_items.remove(index))
    }

    pub fn expected_items(&self) -> &[ExpectedItem] {
        &self.expected_items
    }

    pub fn results(&self) -> Option<&AnalysisResults> {
        self.results.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 画像・品目・結果・エラーをすべて破棄
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 検出ソースを呼び出して照合する
    ///
    /// 前回の結果とエラーは開始時に破棄される。検出ソースが失敗した場合は照合を行わず、
    /// エラーメッセージを記録してそのエラーを返す（結果は `None` のまま）。
    pub async fn run<S: DetectionSource>(
        &mut self,
        source: &S,
        options: &ReconcileOptions,
    ) -> Result<&AnalysisResults> {
        let image = self.image.as_ref().ok_or(BinVerifyError::MissingImage)?;
        if self.expected_items.is_empty() {
            return Err(BinVerifyError::NoExpectedItems);
        }

        self.results = None;
        self.last_error = None;

        let outcome = source.detect(image, &self.expected_items).await;
        match outcome {
            Ok(detections) => {
                let results = reconcile_with(&self.expected_items, &detections, options);
                tracing::info!(
                    matched = results.matched.len(),
                    missing = results.missing.len(),
                    "analysis complete"
                );
                let results: &AnalysisResults = self.results.insert(results);
                Ok(results)
            }
            Err(e) => {
                tracing::warn!(error = %e, "analysis failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

//! 解析セッションのテスト
//!
//! 検出ソースはテスト内の固定実装を使う

use bin_verify::detector::{DetectionSource, RecordedDetections};
use bin_verify::error::{BinVerifyError, Result};
use bin_verify::image_input::BinImage;
use bin_verify::session::AnalysisSession;
use bin_verify_common::{Detection, ExpectedItem, MatchPolicy, ReconcileOptions};
use std::cell::Cell;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// 常に失敗する検出ソース
struct FailingSource;

impl DetectionSource for FailingSource {
    async fn detect(&self, _image: &BinImage, _items: &[ExpectedItem]) -> Result<Vec<Detection>> {
        Err(BinVerifyError::DetectionStatus("503 Service Unavailable".into()))
    }
}

/// 呼び出し回数と受け取った品目数を記録する検出ソース
#[derive(Default)]
struct CountingSource {
    calls: Cell<usize>,
    last_item_count: Cell<usize>,
}

impl DetectionSource for CountingSource {
    async fn detect(&self, _image: &BinImage, items: &[ExpectedItem]) -> Result<Vec<Detection>> {
        self.calls.set(self.calls.get() + 1);
        self.last_item_count.set(items.len());
        Ok(vec![Detection::new("pen", 0.8)?])
    }
}

fn item(name: &str, quantity: u32) -> ExpectedItem {
    ExpectedItem::new(name, quantity).unwrap()
}

fn det(label: &str, score: f64) -> Detection {
    Detection::new(label, score).unwrap()
}

fn ready_session() -> AnalysisSession {
    let mut session = AnalysisSession::new();
    session.set_image(BinImage::from_bytes("bin.png", PNG_MAGIC.to_vec()).unwrap());
    session.add_items(vec![item("Pen", 2), item("Cup", 1)]);
    session
}

// =============================================
// 前提条件
// =============================================

#[tokio::test]
async fn test_run_requires_image() {
    let mut session = AnalysisSession::new();
    session.add_item(item("Pen", 2));

    let source = CountingSource::default();
    let result = session.run(&source, &ReconcileOptions::default()).await;

    assert!(matches!(result, Err(BinVerifyError::MissingImage)));
    assert_eq!(source.calls.get(), 0);
}

#[tokio::test]
async fn test_run_requires_items() {
    let mut session = AnalysisSession::new();
    session.set_image(BinImage::from_bytes("bin.png", PNG_MAGIC.to_vec()).unwrap());

    let source = CountingSource::default();
    let result = session.run(&source, &ReconcileOptions::default()).await;

    assert!(matches!(result, Err(BinVerifyError::NoExpectedItems)));
    assert_eq!(source.calls.get(), 0);
}

// =============================================
// 実行
// =============================================

#[tokio::test]
async fn test_run_reconciles() {
    let mut session = ready_session();
    let source = RecordedDetections::new(vec![det("Pen", 0.3), det("Cup", 0.05)]);

    let results = session.run(&source, &ReconcileOptions::default()).await.unwrap();

    assert_eq!(results.matched.len(), 1);
    assert_eq!(results.matched[0].name, "Pen");
    assert_eq!(results.matched[0].quantity_detected, 2);
    assert_eq!(results.missing, vec![item("Cup", 1)]);

    assert!(session.results().is_some());
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn test_run_passes_items_to_source() {
    let mut session = ready_session();
    let source = CountingSource::default();

    session.run(&source, &ReconcileOptions::default()).await.unwrap();

    assert_eq!(source.calls.get(), 1);
    assert_eq!(source.last_item_count.get(), 2);
}

#[tokio::test]
async fn test_zero_detections_is_not_failure() {
    let mut session = ready_session();
    let source = RecordedDetections::default();

    let results = session.run(&source, &ReconcileOptions::default()).await.unwrap();

    assert!(results.matched.is_empty());
    assert_eq!(results.missing.len(), 2);
}

#[tokio::test]
async fn test_run_with_substring_policy() {
    let mut session = ready_session();
    let source = RecordedDetections::new(vec![det("ballpoint pen", 0.6), det("red pen", 0.4)]);
    let options = ReconcileOptions {
        policy: MatchPolicy::Substring,
        ..Default::default()
    };

    let results = session.run(&source, &options).await.unwrap();

    assert_eq!(results.matched.len(), 1);
    assert_eq!(results.matched[0].quantity_detected, 2);
    assert!((results.matched[0].confidence - 0.5).abs() < 1e-12);
}

// =============================================
// 失敗とリトライ
// =============================================

#[tokio::test]
async fn test_failure_clears_previous_results() {
    let mut session = ready_session();

    let ok_source = RecordedDetections::new(vec![det("Pen", 0.9)]);
    session.run(&ok_source, &ReconcileOptions::default()).await.unwrap();
    assert!(session.results().is_some());

    let result = session.run(&FailingSource, &ReconcileOptions::default()).await;
    assert!(matches!(result, Err(ref e) if e.is_detection_failure()));

    // 部分的な結果は残らない
    assert!(session.results().is_none());
    assert!(session.last_error().unwrap().contains("503"));
}

#[tokio::test]
async fn test_retry_replaces_results() {
    let mut session = ready_session();

    let _ = session.run(&FailingSource, &ReconcileOptions::default()).await;
    assert!(session.last_error().is_some());

    let source = RecordedDetections::new(vec![det("Cup", 0.7)]);
    let results = session.run(&source, &ReconcileOptions::default()).await.unwrap();
    assert_eq!(results.matched[0].name, "Cup");

    assert!(session.last_error().is_none());
}

// =============================================
// 品目の操作
// =============================================

#[test]
fn test_remove_item() {
    let mut session = ready_session();

    assert_eq!(session.remove_item(0), Some(item("Pen", 2)));
    assert_eq!(session.expected_items(), &[item("Cup", 1)]);
    assert_eq!(session.remove_item(5), None);
}

#[test]
fn test_duplicate_items_allowed() {
    let mut session = AnalysisSession::new();
    session.add_item(item("Pen", 1));
    session.add_item(item("Pen", 3));

    assert_eq!(session.expected_items().len(), 2);
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let mut session = ready_session();
    let source = RecordedDetections::new(vec![det("Pen", 0.9)]);
    session.run(&source, &ReconcileOptions::default()).await.unwrap();

    session.reset();

    assert!(session.image().is_none());
    assert!(session.expected_items().is_empty());
    assert!(session.results().is_none());
    assert!(session.last_error().is_none());
}

#[test]
fn test_clear_image() {
    let mut session = ready_session();
    session.clear_image();
    assert!(session.image().is_none());
    assert_eq!(session.expected_items().len(), 2);
}

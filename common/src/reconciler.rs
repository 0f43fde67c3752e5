//! 照合ロジック
//!
//! 画像分類の検出結果と期待品目を突き合わせ、確認できた品目（matched）と
//! 確認できなかった品目（missing）に振り分ける。
//!
//! 既定は完全一致ポリシー:
//! - ラベルと品名を `normalize_name`（小文字化・空白の正規化）してから比較
//! - 一致した検出のうち最大スコアを信頼度とする
//! - 信頼度が閾値を超えた場合のみ採用（閾値ちょうどは不採用）
//! - 検出数は数えず、採用時は検出数量 = 期待数量とみなす

use crate::types::{AnalysisResults, Detection, ExpectedItem, MatchedItem};
use serde::{Deserialize, Serialize};

/// 採用する信頼度の下限（この値を超える必要がある）
pub const CONFIDENCE_THRESHOLD: f64 = 0.15;

/// 照合ポリシー
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// ラベルと品名の完全一致（正規化後）
    #[default]
    Exact,
    /// どちらかがもう一方を含む（正規化後）。信頼度は平均、検出数量は一致件数
    #[cfg_attr(feature = "cli", value(alias = "contains"))]
    Substring,
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPolicy::Exact => write!(f, "exact"),
            MatchPolicy::Substring => write!(f, "substring"),
        }
    }
}

/// 照合オプション
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileOptions {
    pub policy: MatchPolicy,
    pub threshold: f64,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            policy: MatchPolicy::default(),
            threshold: CONFIDENCE_THRESHOLD,
        }
    }
}

/// 既定オプション（完全一致、閾値0.15）で照合
pub fn reconcile(expected: &[ExpectedItem], detections: &[Detection]) -> AnalysisResults {
    reconcile_with(expected, detections, &ReconcileOptions::default())
}

/// オプションを指定して照合
///
/// 検出結果は品目ごとに消費されないため、同名の品目が複数あればそれぞれが同じ検出と照合される。
/// 出力の並びは期待品目の並びを保つ。
pub fn reconcile_with(
    expected: &[ExpectedItem],
    detections: &[Detection],
    options: &ReconcileOptions,
) -> AnalysisResults {
    // 正規化したラベルを事前に用意
    let labels: Vec<(String, f64)> = detections
        .iter()
        .map(|d| (normalize_name(d.label()), d.score()))
        .collect();

    let mut results = AnalysisResults::default();

    for item in expected {
        let name = normalize_name(&item.name);
        let candidate = match options.policy {
            MatchPolicy::Exact => exact_candidate(&name, &labels, item.quantity),
            MatchPolicy::Substring => substring_candidate(&name, &labels),
        };

        match candidate {
            Some((confidence, quantity_detected)) if confidence > options.threshold => {
                results.matched.push(MatchedItem {
                    name: item.name.clone(),
                    quantity_expected: item.quantity,
                    quantity_detected,
                    confidence,
                    present: true,
                });
            }
            _ => results.missing.push(item.clone()),
        }
    }

    results
}

/// 照合キー: 小文字化して空白（タブ・連続空白を含む）を1つにまとめる
///
/// 検出サービスへ送る `normalizedName` にも同じキーを使う。
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 完全一致: (最大スコア, 期待数量)
fn exact_candidate(name: &str, labels: &[(String, f64)], quantity: u32) -> Option<(f64, u32)> {
    labels
        .iter()
        .filter(|(label, _)| label == name)
        .map(|(_, score)| *score)
        .fold(None, |best: Option<f64>, score| match best {
            Some(b) if b >= score => Some(b),
            _ => Some(score),
        })
        .map(|score| (score, quantity))
}

/// 部分一致: (平均スコア, 一致件数)
fn substring_candidate(name: &str, labels: &[(String, f64)]) -> Option<(f64, u32)> {
    let scores: Vec<f64> = labels
        .iter()
        .filter(|(label, _)| label.contains(name) || name.contains(label.as_str()))
        .map(|(_, score)| *score)
        .collect();

    if scores.is_empty() {
        return None;
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Some((mean, scores.len() as u32))
}

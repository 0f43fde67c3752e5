//! 照合処理の型定義
//!
//! CLIとリレーサーバーで共有される型:
//! - ExpectedItem: ユーザーが申告したビン内の品目
//! - Detection: 画像分類から得られたラベルと信頼度
//! - MatchedItem / AnalysisResults: 照合の最終出力

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 期待品目（品名と数量）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedItem {
    pub name: String,
    pub quantity: u32,
}

impl ExpectedItem {
    /// 品名と数量を検証して生成
    ///
    /// 品名は前後の空白を除去し、空であればエラー。数量は1以上。
    pub fn new(name: impl Into<String>, quantity: u32) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidItem("name must not be empty".into()));
        }
        if quantity == 0 {
            return Err(Error::InvalidItem(format!(
                "quantity must be at least 1: {}",
                name
            )));
        }
        Ok(Self { name, quantity })
    }
}

impl std::fmt::Display for ExpectedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.quantity)
    }
}

/// 検出結果（ラベルと信頼度）
///
/// `Detection::new` またはデシリアライズ時の検証を通ったものだけが存在する。
/// ラベルは空でなく、スコアは `[0, 1]` の有限値。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDetection")]
pub struct Detection {
    label: String,
    score: f64,
}

/// 検証前の検出結果（外部レスポンスの1要素）
#[derive(Debug, Clone, Deserialize)]
struct RawDetection {
    #[serde(alias = "product")]
    label: String,
    score: f64,
}

impl TryFrom<RawDetection> for Detection {
    type Error = Error;

    fn try_from(raw: RawDetection) -> Result<Self> {
        Detection::new(raw.label, raw.score)
    }
}

impl Detection {
    pub fn new(label: impl Into<String>, score: f64) -> Result<Self> {
        let label = label.into().trim().to_string();
        if label.is_empty() {
            return Err(Error::InvalidDetection("label must not be empty".into()));
        }
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(Error::InvalidDetection(format!(
                "score out of range for {}: {}",
                label, score
            )));
        }
        Ok(Self { label, score })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// 照合できた品目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedItem {
    pub name: String,
    pub quantity_expected: u32,
    pub quantity_detected: u32,
    pub confidence: f64,
    pub present: bool,
}

/// 1回の解析結果
///
/// 照合に渡した期待品目は必ず `matched` か `missing` のどちらか一方に入る。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub matched: Vec<MatchedItem>,
    pub missing: Vec<ExpectedItem>,
}

impl AnalysisResults {
    /// 照合対象だった品目数
    pub fn total(&self) -> usize {
        self.matched.len() + self.missing.len()
    }

    /// すべての品目が確認できたか
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

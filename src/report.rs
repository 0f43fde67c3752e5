//! 解析結果の出力
//!
//! - 端末向けテキスト
//! - JSONファイル

use crate::error::Result;
use bin_verify_common::AnalysisResults;
use std::fmt;
use std::path::Path;

/// 信頼度をパーセント表記（小数1桁）
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// 端末表示用のレポート
pub struct Report<'a>(pub &'a AnalysisResults);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let results = self.0;

        writeln!(f, "確認できた品目: {}件", results.matched.len())?;
        for item in &results.matched {
            writeln!(
                f,
                "  ✔ {}  数量 {}/{}  信頼度 {}",
                item.name,
                item.quantity_detected,
                item.quantity_expected,
                format_confidence(item.confidence)
            )?;
        }

        writeln!(f, "見つからない品目: {}件", results.missing.len())?;
        for item in &results.missing {
            writeln!(f, "  ✘ {}  数量 {}", item.name, item.quantity)?;
        }

        write!(
            f,
            "合計: {}/{} 品目を確認",
            results.matched.len(),
            results.total()
        )
    }
}

/// 端末表示用のテキストを生成
pub fn render(results: &AnalysisResults) -> String {
    Report(results).to_string()
}

/// JSONファイルに保存
pub fn save_json(results: &AnalysisResults, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(path, json)?;
    Ok(())
}

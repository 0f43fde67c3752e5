//! 期待品目リストのパーサー
//!
//! 1行1品目、`<品名> <数量>` 形式のテキストを読み込む。
//! 数量は行末の10進整数で、品名はその直前の空白より前の部分。

use crate::types::ExpectedItem;
use regex::Regex;

lazy_static::lazy_static! {
    // 品名 + 空白 + 行末の整数
    static ref ITEM_LINE_RE: Regex = Regex::new(r"^(.+?)\s+([0-9]+)$").unwrap();
}

/// 読み飛ばした行の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// 行末に数量がない
    MissingQuantity,
    /// 数量が0
    ZeroQuantity,
    /// 数量が大きすぎる
    QuantityOverflow,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MissingQuantity => write!(f, "行末に数量がありません"),
            RejectReason::ZeroQuantity => write!(f, "数量は1以上が必要です"),
            RejectReason::QuantityOverflow => write!(f, "数量が大きすぎます"),
        }
    }
}

/// 読み飛ばした行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1始まりの行番号
    pub line_number: usize,
    pub content: String,
    pub reason: RejectReason,
}

/// パース結果（品目 + 読み飛ばした行）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub items: Vec<ExpectedItem>,
    pub rejected: Vec<RejectedLine>,
}

/// 期待品目テキストをパース
///
/// 空行と形式に合わない行は黙って読み飛ばす。
/// 読み飛ばした行を知りたい場合は [`parse_expected_items_report`] を使う。
///
/// # Examples
/// ```
/// use bin_verify_common::parse_expected_items;
///
/// let items = parse_expected_items("Widget 3\n\nGadget 10\n");
/// assert_eq!(items.len(), 2);
/// assert_eq!(items[0].name, "Widget");
/// assert_eq!(items[1].quantity, 10);
/// ```
pub fn parse_expected_items(text: &str) -> Vec<ExpectedItem> {
    parse_expected_items_report(text).items
}

/// 期待品目テキストをパースし、読み飛ばした行も返す
pub fn parse_expected_items_report(text: &str) -> ParseReport {
    let mut report = ParseReport::default();

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_item_line(trimmed) {
            Ok(item) => report.items.push(item),
            Err(reason) => report.rejected.push(RejectedLine {
                line_number: index + 1,
                content: trimmed.to_string(),
                reason,
            }),
        }
    }

    report
}

/// 1行をパース（前後の空白は除去済みであること）
pub fn parse_item_line(line: &str) -> std::result::Result<ExpectedItem, RejectReason> {
    let caps = ITEM_LINE_RE
        .captures(line)
        .ok_or(RejectReason::MissingQuantity)?;

    let quantity: u32 = caps[2]
        .parse()
        .map_err(|_| RejectReason::QuantityOverflow)?;
    if quantity == 0 {
        return Err(RejectReason::ZeroQuantity);
    }

    Ok(ExpectedItem {
        name: caps[1].trim().to_string(),
        quantity,
    })
}

//! 商品カタログ
//!
//! - 商品名リスト（1行1件）からの検索
//! - 検出サービスへ送る `binData` 構造

use crate::error::Result;
use crate::reconciler::normalize_name;
use crate::types::ExpectedItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 検索結果の既定件数
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// 商品名カタログ
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    names: Vec<String>,
}

impl ProductCatalog {
    /// テキストから読み込み（前後空白を除去し、空行は無視）
    pub fn from_text(text: &str) -> Self {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    /// ファイルから読み込み
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&content))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 部分一致検索（大文字小文字無視、カタログ順に最大 `limit` 件）
    ///
    /// 空白のみのクエリは何も返さない。それ以外のクエリは前後の空白も含めて照合する。
    pub fn search(&self, query: &str, limit: usize) -> Vec<&str> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let query = query.to_lowercase();

        self.names
            .iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .take(limit)
            .map(String::as_str)
            .collect()
    }
}

/// 検出サービスへ送る品目1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinProduct {
    pub asin: String,
    pub name: String,
    pub normalized_name: String,
    pub quantity: u32,
}

/// 検出サービスへ送るビン情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinData {
    #[serde(rename = "BIN_FCSKU_DATA")]
    pub bin_fcsku_data: BTreeMap<String, BinProduct>,
    #[serde(rename = "EXPECTED_QUANTITY")]
    pub expected_quantity: u64,
}

impl BinData {
    /// 期待品目から生成
    ///
    /// 自由入力の品目にはASINがないため、並び順の連番 `ITEM0001` を識別子に使う。
    /// `EXPECTED_QUANTITY` は全品目の数量合計。
    pub fn from_items(items: &[ExpectedItem]) -> Self {
        let bin_fcsku_data = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let id = format!("ITEM{:04}", i + 1);
                let product = BinProduct {
                    asin: id.clone(),
                    name: item.name.clone(),
                    normalized_name: normalize_name(&item.name),
                    quantity: item.quantity,
                };
                (id, product)
            })
            .collect();

        Self {
            bin_fcsku_data,
            expected_quantity: items.iter().map(|i| u64::from(i.quantity)).sum(),
        }
    }

    /// multipartの `binData` フィールドに載せるJSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

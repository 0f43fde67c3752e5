//! 期待品目の入力
//!
//! - 期待品目ファイル / `--item` 引数の読み込み
//! - カタログ検索結果からの対話選択

use crate::error::{BinVerifyError, Result};
use bin_verify_common::items::parse_item_line;
use bin_verify_common::{parse_expected_items_report, ExpectedItem, ParseReport, ProductCatalog};
use dialoguer::{Input, Select};
use std::io::Write;
use std::path::Path;

/// 期待品目ファイルを読み込む（形式に合わない行は `rejected` に入る）
pub fn load_items_file(path: &Path) -> Result<ParseReport> {
    if !path.exists() {
        return Err(BinVerifyError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(parse_expected_items_report(&content))
}

/// `--item` 引数をパース
///
/// 明示的に指定された値なので、形式に合わなければエラーにする。
pub fn parse_item_args(args: &[String]) -> Result<Vec<ExpectedItem>> {
    args.iter()
        .map(|arg| {
            parse_item_line(arg.trim())
                .map_err(|reason| BinVerifyError::InvalidItem(format!("{} ({})", arg, reason)))
        })
        .collect()
}

/// 数量入力を解釈（1以上の整数のみ）
pub fn parse_quantity_input(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|&q| q > 0)
}

/// 期待品目ファイルに1行追記
pub fn append_item_line(path: &Path, item: &ExpectedItem) -> Result<()> {
    // 末尾が改行でなければ先に改行を補う
    let needs_newline = std::fs::read(path)
        .map(|bytes| bytes.last().is_some_and(|&b| b != b'\n'))
        .unwrap_or(false);

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    if needs_newline {
        writeln!(file)?;
    }
    writeln!(file, "{}", item)?;
    Ok(())
}

/// カタログ検索結果から1件選び、数量を入力させる
///
/// 該当なし、または選択をキャンセルした場合は `None`。
pub fn run_interactive_pick(
    catalog: &ProductCatalog,
    query: &str,
    limit: usize,
) -> Result<Option<ExpectedItem>> {
    let hits = catalog.search(query, limit);
    if hits.is_empty() {
        println!("該当する商品がありません: {}", query);
        return Ok(None);
    }

    let selection = Select::new()
        .with_prompt("商品を選択 (Esc:キャンセル)")
        .items(&hits)
        .default(0)
        .interact_opt()
        .map_err(|e| BinVerifyError::Prompt(e.to_string()))?;

    let Some(index) = selection else {
        println!("キャンセルしました");
        return Ok(None);
    };

    let quantity: String = Input::new()
        .with_prompt("数量")
        .default("1".to_string())
        .validate_with(|input: &String| -> std::result::Result<(), &'static str> {
            parse_quantity_input(input)
                .map(|_| ())
                .ok_or("1以上の整数を入力してください")
        })
        .interact_text()
        .map_err(|e| BinVerifyError::Prompt(e.to_string()))?;

    let quantity = parse_quantity_input(&quantity)
        .ok_or_else(|| BinVerifyError::InvalidItem(quantity.clone()))?;

    Ok(Some(ExpectedItem::new(hits[index], quantity)?))
}

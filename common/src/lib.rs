//! Bin Verify Common Library
//!
//! CLIとリレーサーバーで共有される型・パーサー・照合ロジック

pub mod types;
pub mod error;
pub mod items;
pub mod parser;
pub mod reconciler;
pub mod catalog;

pub use types::{AnalysisResults, Detection, ExpectedItem, MatchedItem};
pub use error::{Error, Result};
pub use items::{parse_expected_items, parse_expected_items_report, ParseReport, RejectReason, RejectedLine};
pub use parser::{parse_detection_response, DetectionResponse};
pub use reconciler::{
    normalize_name, reconcile, reconcile_with, MatchPolicy, ReconcileOptions, CONFIDENCE_THRESHOLD,
};
pub use catalog::{BinData, BinProduct, ProductCatalog, DEFAULT_SEARCH_LIMIT};

//! エラー型のテスト

use bin_verify::error::BinVerifyError;

/// 設定エラーの表示
#[test]
fn test_config_error_display() {
    let err = BinVerifyError::Config("閾値が不正".to_string());
    let display = format!("{}", err);

    assert!(display.contains("設定エラー"));
    assert!(display.contains("閾値が不正"));
}

/// エンドポイント未設定の案内
#[test]
fn test_endpoint_not_configured_display() {
    let display = format!("{}", BinVerifyError::EndpointNotConfigured);

    assert!(display.contains("エンドポイント"));
    assert!(display.contains("bin-verify config"));
}

/// 前提条件エラー
#[test]
fn test_precondition_errors_display() {
    assert_eq!(BinVerifyError::MissingImage.to_string(), "ビン画像が指定されていません");
    assert_eq!(BinVerifyError::NoExpectedItems.to_string(), "期待品目を1件以上指定してください");
}

/// 検出ソースの失敗判定
#[test]
fn test_is_detection_failure() {
    assert!(BinVerifyError::EndpointNotConfigured.is_detection_failure());
    assert!(BinVerifyError::DetectionStatus("500".into()).is_detection_failure());
    assert!(BinVerifyError::DetectionTimeout(30).is_detection_failure());
    assert!(BinVerifyError::MalformedResponse("bad".into()).is_detection_failure());

    assert!(!BinVerifyError::NoExpectedItems.is_detection_failure());
    assert!(!BinVerifyError::MissingImage.is_detection_failure());
    assert!(!BinVerifyError::InvalidItem("Pen".into()).is_detection_failure());
}

/// タイムアウト秒数の表示
#[test]
fn test_timeout_display() {
    let display = BinVerifyError::DetectionTimeout(45).to_string();
    assert!(display.contains("45秒"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: BinVerifyError = io_err.into();

    assert!(matches!(err, BinVerifyError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: BinVerifyError = json_err.into();

    assert!(matches!(err, BinVerifyError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = bin_verify_common::Error::InvalidItem("quantity must be at least 1".to_string());
    let err: BinVerifyError = common_err.into();

    assert!(matches!(err, BinVerifyError::Common(_)));
    assert_eq!(err.to_string(), "Invalid item: quantity must be at least 1");
}

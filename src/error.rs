use thiserror::Error;

#[derive(Error, Debug)]
pub enum BinVerifyError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("検出エンドポイントが設定されていません。`bin-verify config --set-endpoint URL` で設定してください")]
    EndpointNotConfigured,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("ビン画像が指定されていません")]
    MissingImage,

    #[error("期待品目を1件以上指定してください")]
    NoExpectedItems,

    #[error("品目の形式が不正です（\"品名 数量\" の形式）: {0}")]
    InvalidItem(String),

    #[error("検出サービス呼び出しエラー: {0}")]
    DetectionRequest(#[from] reqwest::Error),

    #[error("検出サービスがエラーを返しました: {0}")]
    DetectionStatus(String),

    #[error("検出サービスがタイムアウトしました（{0}秒）")]
    DetectionTimeout(u64),

    #[error("検出レスポンスが不正です: {0}")]
    MalformedResponse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("対話入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] bin_verify_common::Error),
}

impl BinVerifyError {
    /// 検出サービス側の失敗か（「検出0件」とは区別される）
    pub fn is_detection_failure(&self) -> bool {
        matches!(
            self,
            BinVerifyError::EndpointNotConfigured
                | BinVerifyError::DetectionRequest(_)
                | BinVerifyError::DetectionStatus(_)
                | BinVerifyError::DetectionTimeout(_)
                | BinVerifyError::MalformedResponse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BinVerifyError>;

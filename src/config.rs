use crate::error::{BinVerifyError, Result};
use bin_verify_common::{MatchPolicy, ReconcileOptions, CONFIDENCE_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENDPOINT_ENV: &str = "BIN_VERIFY_ENDPOINT";
const MODEL_API_URL_ENV: &str = "MODEL_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 検出エンドポイント（リレーまたはモデルサービス）
    pub endpoint: Option<String>,
    /// 商品名カタログ
    pub catalog_path: Option<PathBuf>,
    pub threshold: f64,
    pub policy: MatchPolicy,
    pub timeout_seconds: u64,
    /// リレーサーバーの待受ポート
    pub relay_port: u16,
    /// リレーの転送先
    pub model_api_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            catalog_path: None,
            threshold: CONFIDENCE_THRESHOLD,
            policy: MatchPolicy::Exact,
            timeout_seconds: 60,
            relay_port: 8787,
            model_api_url: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（存在しなければ既定値）
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BinVerifyError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("bin-verify").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..1.0).contains(&self.threshold) {
            return Err(BinVerifyError::Config(format!(
                "閾値は0以上1未満で指定してください: {}",
                self.threshold
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(BinVerifyError::Config("タイムアウトは1秒以上が必要です".into()));
        }
        Ok(())
    }

    /// 検出エンドポイント（環境変数を優先）
    pub fn endpoint(&self) -> Result<String> {
        if let Ok(url) = std::env::var(ENDPOINT_ENV) {
            if !url.trim().is_empty() {
                return Ok(url);
            }
        }

        self.endpoint.clone().ok_or(BinVerifyError::EndpointNotConfigured)
    }

    /// リレーの転送先（環境変数を優先）
    pub fn model_api_url(&self) -> Option<String> {
        std::env::var(MODEL_API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.model_api_url.clone())
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            policy: self.policy,
            threshold: self.threshold,
        }
    }

    pub fn set_endpoint(&mut self, url: String) -> Result<()> {
        self.endpoint = Some(url);
        self.save()
    }

    pub fn set_catalog(&mut self, path: PathBuf) -> Result<()> {
        self.catalog_path = Some(path);
        self.save()
    }
}

//! ビン画像の読み込み
//!
//! 先頭バイトから画像形式を判定し、画像以外のファイルは受け付けない。

use crate::error::{BinVerifyError, Result};
use std::path::Path;

/// 解析対象のビン画像
#[derive(Debug, Clone)]
pub struct BinImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl BinImage {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(BinVerifyError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());

        Self::from_bytes(file_name, bytes)
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let format = image::guess_format(&bytes).map_err(|e| {
            BinVerifyError::ImageLoad(format!("{}: {}", file_name, e))
        })?;

        Ok(Self {
            file_name,
            mime_type: format.to_mime_type().to_string(),
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

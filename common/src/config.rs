//! 推論クライアント設定
//!
//! エンドポイントURL・タイムアウト・アップロード上限・表示幅を保持する。
//! CLIはJSONファイルから、Web版はビルド時の値から構築する

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::geometry::{ScaleMode, DEFAULT_DISPLAY_WIDTH};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predict";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
    pub max_upload_bytes: u64,
    pub display_width: f64,
    pub scale_mode: ScaleMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            display_width: DEFAULT_DISPLAY_WIDTH,
            scale_mode: ScaleMode::default(),
        }
    }
}

impl ClientConfig {
    /// JSON文字列から読み込み、検証する
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ClientConfig = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("JSON parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint {:?}: {}", self.endpoint, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "endpoint must use http or https: {}",
                self.endpoint
            )));
        }

        if self.timeout_ms == 0 {
            return Err(Error::Config("timeoutMs must be greater than 0".into()));
        }

        if self.max_upload_bytes == 0 {
            return Err(Error::Config("maxUploadBytes must be greater than 0".into()));
        }

        if !self.display_width.is_finite() || self.display_width <= 0.0 {
            return Err(Error::Config(format!(
                "displayWidth must be a positive number: {}",
                self.display_width
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.display_width, 500.0);
        assert_eq!(config.scale_mode, ScaleMode::Legacy);
    }

    #[test]
    fn test_from_json_camel_case() {
        let json = r#"{
            "endpoint": "https://detector.example.com/predict",
            "timeoutMs": 1500,
            "maxUploadBytes": 1048576
        }"#;

        let config = ClientConfig::from_json(json).expect("設定読み込み失敗");
        assert_eq!(config.endpoint, "https://detector.example.com/predict");
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.max_upload_bytes, 1_048_576);
        // 省略したフィールドはデフォルト値
        assert_eq!(config.display_width, 500.0);
    }

    #[test]
    fn test_from_json_scale_mode() {
        let config = ClientConfig::from_json(r#"{"scaleMode": "aspect"}"#).expect("設定読み込み失敗");
        assert_eq!(config.scale_mode, ScaleMode::Aspect);
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = ClientConfig {
            endpoint: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_non_http_endpoint() {
        let config = ClientConfig {
            endpoint: "ftp://example.com/predict".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_limits_rejected() {
        let zero_timeout = ClientConfig { timeout_ms: 0, ..Default::default() };
        assert!(zero_timeout.validate().is_err());

        let zero_upload = ClientConfig { max_upload_bytes: 0, ..Default::default() };
        assert!(zero_upload.validate().is_err());

        let bad_width = ClientConfig { display_width: f64::NAN, ..Default::default() };
        assert!(bad_width.validate().is_err());
    }

    #[test]
    fn test_from_json_invalid() {
        let result = ClientConfig::from_json("{");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}

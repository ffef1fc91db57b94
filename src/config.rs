use crate::error::{Result, SpikeDetectError};
use serde::{Deserialize, Serialize};
use spike_detect_common::{ClientConfig, ModelChoice};
use std::path::{Path, PathBuf};

/// エンドポイントを上書きする環境変数
pub const ENDPOINT_ENV: &str = "SPIKE_DETECT_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    #[serde(flatten)]
    pub client: ClientConfig,
    pub default_model: ModelChoice,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 設定ファイルを読み込む。ファイルがなければデフォルト値
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config
            .client
            .validate()
            .map_err(|e| SpikeDetectError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SpikeDetectError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("spike-detect").join("config.json"))
    }

    /// 実際に使うクライアント設定（環境変数を優先）
    pub fn effective_client(&self) -> ClientConfig {
        let mut client = self.client.clone();
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                client.endpoint = endpoint.trim().to_string();
            }
        }
        client
    }
}

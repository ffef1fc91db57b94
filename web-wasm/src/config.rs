//! クライアント設定（ビルド時に決定）
//!
//! `SPIKE_DETECT_ENDPOINT` / `SPIKE_DETECT_TIMEOUT_MS` / `SPIKE_DETECT_SCALE_MODE`
//! をビルド時の環境変数で上書きできる

use spike_detect_common::ClientConfig;

pub fn client_config() -> ClientConfig {
    let mut config = ClientConfig::default();

    if let Some(endpoint) = option_env!("SPIKE_DETECT_ENDPOINT") {
        config.endpoint = endpoint.to_string();
    }
    if let Some(timeout_ms) = option_env!("SPIKE_DETECT_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        config.timeout_ms = timeout_ms;
    }
    if let Some(scale_mode) = option_env!("SPIKE_DETECT_SCALE_MODE").and_then(|v| v.parse().ok()) {
        config.scale_mode = scale_mode;
    }

    if let Err(e) = config.validate() {
        gloo::console::warn!(format!("invalid build-time config, using defaults: {}", e));
        return ClientConfig::default();
    }

    config
}

//! 推論サーバーHTTPクライアント
//!
//! 1回のmultipart POSTのみ。リトライなし、期限を過ぎたら打ち切る

use crate::error::{Result, SpikeDetectError};
use reqwest::multipart::{Form, Part};
use spike_detect_common::{
    parse_predict_response, BoundingBox, ClientConfig, Error, PredictRequest, FILE_FIELD,
    MODEL_FIELD,
};
use std::time::Duration;
use tracing::debug;

pub struct PredictClient {
    http: reqwest::Client,
    endpoint: String,
    timeout_ms: u64,
}

impl PredictClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SpikeDetectError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 推論リクエストを送信し、検出矩形を返す
    ///
    /// 期限内に完了しなければリクエストを破棄して `Error::Timeout`
    pub async fn predict(&self, request: &PredictRequest) -> spike_detect_common::Result<Vec<BoundingBox>> {
        let deadline = Duration::from_millis(self.timeout_ms);

        match tokio::time::timeout(deadline, self.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                timeout_ms: self.timeout_ms,
            }),
        }
    }

    async fn send(&self, request: &PredictRequest) -> spike_detect_common::Result<Vec<BoundingBox>> {
        let file_part = Part::bytes(request.payload.to_vec())
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type)
            .map_err(|e| Error::Network(format!("invalid mime type {:?}: {}", request.mime_type, e)))?;

        // Content-Type: multipart/form-data; boundary=... は reqwest が付与する
        let form = Form::new()
            .part(FILE_FIELD, file_part)
            .text(MODEL_FIELD, request.model.as_str());

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %body, "error response body");
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        debug!(len = body.len(), "response received");

        parse_predict_response(&body)
    }
}

//! 検出セッション
//!
//! 画像選択 → モデル選択 → 推論 → オーバーレイ の流れをまとめる。
//! 状態は `DetectionState` のスナップショットを置き換えて更新する

use crate::client::PredictClient;
use crate::error::Result;
use crate::intake;
use serde::Serialize;
use spike_detect_common::{
    BoundingBox, ClientConfig, DetectionState, DisplayGeometry, Error, ImageDimensions,
    ImageSelection, ModelChoice, Notice, OverlayRect, PredictRequest, ScaleMode, Settlement, Ticket,
};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// ユーザー向け通知の出力先
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// 標準エラー出力に通知を表示
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("⚠ {}", notice.message());
    }
}

/// 推論結果のレポート（JSON出力用）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub file_name: String,
    pub model: ModelChoice,
    pub dimensions: ImageDimensions,
    pub display_width: f64,
    pub scale_mode: ScaleMode,
    pub boxes: Vec<BoundingBox>,
    pub overlay: Vec<OverlayRect>,
}

pub struct DetectionSession<N: Notifier> {
    state: DetectionState,
    client: PredictClient,
    config: ClientConfig,
    notifier: N,
}

impl<N: Notifier> DetectionSession<N> {
    pub fn new(config: ClientConfig, notifier: N) -> Result<Self> {
        let client = PredictClient::new(&config)?;
        Ok(Self {
            state: DetectionState::new(),
            client,
            config,
            notifier,
        })
    }

    pub fn state(&self) -> &DetectionState {
        &self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// 画像ファイルを読み込んで選択する
    ///
    /// 画像として読めない場合は通知し、現在の選択はそのまま
    pub fn select_file(&mut self, path: &Path) -> Result<()> {
        match intake::load_image(path) {
            Ok(selection) => {
                self.select_image(selection);
                Ok(())
            }
            Err(crate::error::SpikeDetectError::Detect(err)) => {
                warn!(path = %path.display(), error = %err, "image decode failed");
                self.notifier.notify(err.notice());
                Err(err.into())
            }
            Err(err) => Err(err),
        }
    }

    pub fn select_image(&mut self, selection: ImageSelection) {
        info!(
            file = %selection.file_name,
            width = selection.dimensions.width,
            height = selection.dimensions.height,
            "image selected"
        );
        self.state = self.state.select_image(selection);
    }

    pub fn select_model(&mut self, model: ModelChoice) {
        debug!(model = %model, "model selected");
        self.state = self.state.select_model(model);
    }

    /// 推論リクエストを作成する（送信はしない）
    ///
    /// 画像未選択・サイズ超過の場合は通知してエラーを返す
    pub fn begin_predict(&mut self) -> std::result::Result<PredictRequest, Error> {
        match self.state.begin_predict(self.config.max_upload_bytes) {
            Ok((next, request)) => {
                self.state = next;
                Ok(request)
            }
            Err(err) => {
                warn!(error = %err, "prediction not started");
                self.notifier.notify(err.notice());
                Err(err)
            }
        }
    }

    /// 応答を反映する。失敗時は通知を1回だけ出す
    pub fn finish_predict(
        &mut self,
        ticket: Ticket,
        outcome: std::result::Result<Vec<BoundingBox>, Error>,
    ) -> Settlement {
        let (next, settlement) = self.state.settle(ticket, outcome);
        self.state = next;

        match &settlement {
            Settlement::Applied { count } => {
                info!(count, "prediction applied");
            }
            Settlement::Failed(err) => {
                error!(error = %err, endpoint = %self.client.endpoint(), "prediction request failed");
                self.notifier.notify(err.notice());
            }
            Settlement::Stale => {
                debug!(?ticket, "discarded stale prediction response");
            }
        }

        settlement
    }

    /// 推論を実行（作成 → 送信 → 反映）
    pub async fn predict(&mut self) -> Settlement {
        let request = match self.begin_predict() {
            Ok(request) => request,
            Err(err) => return Settlement::Failed(err),
        };

        info!(
            model = %request.model,
            file = %request.file_name,
            bytes = request.payload.len(),
            endpoint = %self.client.endpoint(),
            "sending prediction request"
        );

        let outcome = self.client.predict(&request).await;
        self.finish_predict(request.ticket, outcome)
    }

    /// 現在の状態から表示ジオメトリを導出
    pub fn geometry(&self) -> Option<DisplayGeometry> {
        let selection = self.state.selection()?;
        DisplayGeometry::new(
            selection.dimensions,
            self.config.display_width,
            self.config.scale_mode,
        )
    }

    pub fn overlay(&self) -> Vec<OverlayRect> {
        self.state
            .overlay(self.config.display_width, self.config.scale_mode)
    }

    pub fn report(&self) -> Option<PredictionReport> {
        let selection = self.state.selection()?;
        Some(PredictionReport {
            file_name: selection.file_name.clone(),
            model: self.state.model(),
            dimensions: selection.dimensions,
            display_width: self.config.display_width,
            scale_mode: self.config.scale_mode,
            boxes: self.state.boxes().to_vec(),
            overlay: self.overlay(),
        })
    }
}

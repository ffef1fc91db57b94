//! 検出画面の状態管理
//!
//! 状態は不変スナップショットとして扱い、遷移ごとに新しい値を返す。
//! 推論リクエストには世代番号とリクエスト番号（Ticket）を付け、
//! 応答時点で最新でないものは破棄する。

use crate::error::{Error, Result};
use crate::geometry::{overlay_rects, OverlayRect, ScaleMode};
use crate::model::ModelChoice;
use crate::types::{BoundingBox, ImageSelection};
use std::sync::Arc;

/// 推論リクエストの識別子
///
/// - `generation`: 画像選択のたびに増える
/// - `sequence`: 推論開始のたびに増える
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub sequence: u64,
}

/// 送信するリクエストの内容
#[derive(Debug, Clone)]
pub struct PredictRequest {
    pub ticket: Ticket,
    pub model: ModelChoice,
    pub file_name: String,
    pub mime_type: String,
    pub payload: Arc<[u8]>,
}

/// 応答を状態に反映した結果
#[derive(Debug, Clone)]
pub enum Settlement {
    /// 矩形リストを置き換えた
    Applied { count: usize },
    /// 失敗。矩形リストはそのまま
    Failed(Error),
    /// 古いリクエストの応答なので破棄した
    Stale,
}

/// 検出画面の状態スナップショット
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionState {
    selection: Option<ImageSelection>,
    model: ModelChoice,
    boxes: Vec<BoundingBox>,
    generation: u64,
    sequence: u64,
    pending: Option<Ticket>,
    pick: u64,
}

impl DetectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<&ImageSelection> {
        self.selection.as_ref()
    }

    pub fn model(&self) -> ModelChoice {
        self.model
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 最新のリクエストが応答待ちか
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// 新しい画像を選択。前の検出結果は破棄する
    pub fn select_image(&self, selection: ImageSelection) -> Self {
        Self {
            selection: Some(selection),
            boxes: Vec::new(),
            generation: self.generation + 1,
            pending: None,
            ..self.clone()
        }
    }

    /// ファイル選択（デコード前）を記録し、その選択の番号を返す
    pub fn begin_pick(&self) -> (Self, u64) {
        let pick = self.pick + 1;
        (Self { pick, ..self.clone() }, pick)
    }

    pub fn is_latest_pick(&self, pick: u64) -> bool {
        pick == self.pick
    }

    /// デコードが終わった画像を選択する。より新しい選択があれば None
    pub fn select_picked_image(&self, pick: u64, selection: ImageSelection) -> Option<Self> {
        self.is_latest_pick(pick).then(|| self.select_image(selection))
    }

    pub fn select_model(&self, model: ModelChoice) -> Self {
        Self {
            model,
            ..self.clone()
        }
    }

    /// 推論リクエストを開始
    ///
    /// 画像未選択なら `Error::MissingInput`、サイズ超過なら `Error::UploadTooLarge`。
    /// どちらの場合もリクエストは作らない
    pub fn begin_predict(&self, max_upload_bytes: u64) -> Result<(Self, PredictRequest)> {
        let selection = self.selection.as_ref().ok_or(Error::MissingInput)?;

        if selection.size() > max_upload_bytes {
            return Err(Error::UploadTooLarge {
                size: selection.size(),
                limit: max_upload_bytes,
            });
        }

        let ticket = Ticket {
            generation: self.generation,
            sequence: self.sequence + 1,
        };

        let request = PredictRequest {
            ticket,
            model: self.model,
            file_name: selection.file_name.clone(),
            mime_type: selection.mime_type.clone(),
            payload: Arc::clone(&selection.payload),
        };

        let next = Self {
            sequence: ticket.sequence,
            pending: Some(ticket),
            ..self.clone()
        };

        Ok((next, request))
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation && ticket.sequence == self.sequence
    }

    /// 推論結果を反映
    pub fn settle(&self, ticket: Ticket, outcome: Result<Vec<BoundingBox>>) -> (Self, Settlement) {
        if !self.is_current(ticket) {
            return (self.clone(), Settlement::Stale);
        }

        match outcome {
            Ok(boxes) => {
                let count = boxes.len();
                let next = Self {
                    boxes,
                    pending: None,
                    ..self.clone()
                };
                (next, Settlement::Applied { count })
            }
            Err(err) => {
                let next = Self {
                    pending: None,
                    ..self.clone()
                };
                (next, Settlement::Failed(err))
            }
        }
    }

    /// 現在の画像と矩形からオーバーレイを導出
    pub fn overlay(&self, display_width: f64, mode: ScaleMode) -> Vec<OverlayRect> {
        match &self.selection {
            Some(selection) => overlay_rects(&self.boxes, selection.dimensions, display_width, mode),
            None => vec![],
        }
    }
}

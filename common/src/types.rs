//! 検出結果・画像選択の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - BoundingBox: 元画像座標系の検出矩形
//! - ImageDimensions: 元画像のピクセルサイズ
//! - ImageSelection: ユーザーが選んだ画像（バイナリ+MIME+サイズ+プレビュー）

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 検出矩形 `[x_min, y_min, x_max, y_max]`
///
/// JSON上は4要素の数値配列として表現される
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BoundingBox {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x_min, y_min, x_max, y_max]: [f64; 4]) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x_min, b.y_min, b.x_max, b.y_max]
    }
}

/// 元画像のピクセルサイズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// ユーザーが選択した画像
///
/// 新しいファイルを選ぶたびに丸ごと置き換える。
/// `payload` は状態スナップショット間で共有するため `Arc` で保持する
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSelection {
    pub file_name: String,
    pub mime_type: String,
    pub payload: Arc<[u8]>,
    pub dimensions: ImageDimensions,
    /// 表示用の参照（Web版はData URL、CLI版はファイルパス）
    pub preview: String,
}

impl ImageSelection {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        payload: impl Into<Arc<[u8]>>,
        dimensions: ImageDimensions,
        preview: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            payload: payload.into(),
            dimensions,
            preview: preview.into(),
        }
    }

    /// アップロードサイズ（バイト）
    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }
}

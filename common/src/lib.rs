//! Spike Detect Common Library
//!
//! CLIとWeb(WASM)で共有される型・座標変換・状態管理

pub mod types;
pub mod model;
pub mod geometry;
pub mod config;
pub mod error;
pub mod parser;
pub mod state;

pub use types::{BoundingBox, ImageDimensions, ImageSelection};
pub use model::ModelChoice;
pub use geometry::{overlay_rects, DisplayGeometry, OverlayRect, ScaleMode, DEFAULT_DISPLAY_WIDTH};
pub use config::ClientConfig;
pub use error::{Error, Notice, Result};
pub use parser::{parse_predict_response, PredictResponse, FILE_FIELD, MODEL_FIELD};
pub use state::{DetectionState, PredictRequest, Settlement, Ticket};

//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("no image selected")]
    MissingInput,

    #[error("upload too large: {size} bytes (limit {limit} bytes)")]
    UploadTooLarge { size: u64, limit: u64 },

    #[error("request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("server returned HTTP {0}")]
    HttpStatus(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("image decode error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// ユーザー向け通知
///
/// ブラウザ版では `alert`、CLI版では標準エラー出力に表示する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    MissingInput,
    RequestFailed,
    TimedOut,
    UploadTooLarge,
    DecodeFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::MissingInput => "Please upload an image first.",
            Notice::RequestFailed => "Failed to get predictions. Check console for details.",
            Notice::TimedOut => "Prediction request timed out. Please try again.",
            Notice::UploadTooLarge => "The selected image is too large to upload.",
            Notice::DecodeFailed => "The selected file could not be read as an image.",
        }
    }
}

impl Error {
    /// エラー種別からユーザー向け通知を決定
    ///
    /// ネットワーク・HTTPステータス・パース失敗は区別せず汎用通知にまとめる
    pub fn notice(&self) -> Notice {
        match self {
            Error::MissingInput => Notice::MissingInput,
            Error::UploadTooLarge { .. } => Notice::UploadTooLarge,
            Error::Timeout { .. } => Notice::TimedOut,
            Error::Decode(_) => Notice::DecodeFailed,
            Error::HttpStatus(_)
            | Error::Network(_)
            | Error::InvalidResponse(_)
            | Error::Config(_) => Notice::RequestFailed,
        }
    }
}

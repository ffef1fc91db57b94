use crate::error::{Result, SpikeDetectError};
use image::ImageReader;
use spike_detect_common::{Error, ImageDimensions, ImageSelection};
use std::io::Cursor;
use std::path::Path;

const FALLBACK_MIME: &str = "application/octet-stream";

/// 画像ファイルを読み込み、ピクセルサイズを取得する
///
/// 拡張子ではなく内容から形式を判定する。画像として読めない場合は
/// `Error::Decode`
pub fn load_image(path: &Path) -> Result<ImageSelection> {
    if !path.is_file() {
        return Err(SpikeDetectError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let (mime_type, dimensions) = decode_dimensions(&bytes)?;

    Ok(ImageSelection::new(
        file_name,
        mime_type,
        bytes,
        dimensions,
        path.display().to_string(),
    ))
}

/// バイト列から MIME タイプとサイズを取得
pub fn decode_dimensions(bytes: &[u8]) -> std::result::Result<(&'static str, ImageDimensions), Error> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::Decode(e.to_string()))?;

    let mime_type = reader
        .format()
        .map(|f| f.to_mime_type())
        .unwrap_or(FALLBACK_MIME);

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| Error::Decode(e.to_string()))?;

    Ok((mime_type, ImageDimensions::new(width, height)))
}

//! 推論サーバーのリクエスト/レスポンス形式
//!
//! リクエスト: multipart/form-data（`file` に画像バイナリ、`model` にモデル識別子）
//! レスポンス: `{"boxes": [[x_min, y_min, x_max, y_max], ...]}`

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::BoundingBox;

/// 画像バイナリを入れるフィールド名
pub const FILE_FIELD: &str = "file";
/// モデル識別子を入れるフィールド名
pub const MODEL_FIELD: &str = "model";

/// 推論レスポンス
///
/// `boxes` 以外のフィールドは無視する
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub boxes: Vec<BoundingBox>,
}

/// レスポンスボディをパースして検出矩形を返す
///
/// # Arguments
/// * `body` - レスポンスボディ（JSON文字列）
///
/// # Returns
/// * `Ok(Vec<BoundingBox>)` - サーバー応答順の矩形リスト
/// * `Err(Error::InvalidResponse)` - JSONでない、`boxes` がない、要素が4数値配列でない
///
/// # Examples
/// ```
/// use spike_detect_common::parse_predict_response;
///
/// let boxes = parse_predict_response(r#"{"boxes": [[10, 20, 110, 220]]}"#).unwrap();
/// assert_eq!(boxes.len(), 1);
/// assert_eq!(boxes[0].x_max, 110.0);
/// ```
pub fn parse_predict_response(body: &str) -> Result<Vec<BoundingBox>> {
    let response: PredictResponse =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;
    Ok(response.boxes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boxes() {
        let body = r#"{"boxes": [[10, 20, 110, 220], [0.5, 0.5, 8.25, 9.75]]}"#;
        let boxes = parse_predict_response(body).unwrap();

        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0], BoundingBox::new(10.0, 20.0, 110.0, 220.0));
        assert_eq!(boxes[1].x_max, 8.25);
    }

    #[test]
    fn test_parse_empty_boxes() {
        let boxes = parse_predict_response(r#"{"boxes": []}"#).unwrap();
        assert!(boxes.is_empty());
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let body = r#"{"boxes": [[1, 2, 3, 4]], "scores": [0.9], "model": "detr"}"#;
        let boxes = parse_predict_response(body).unwrap();
        assert_eq!(boxes.len(), 1);
    }

    #[test]
    fn test_parse_missing_boxes() {
        let result = parse_predict_response(r#"{"detections": []}"#);
        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_malformed_entry() {
        let result = parse_predict_response(r#"{"boxes": [[1, 2, 3]]}"#);
        assert!(matches!(result, Err(Error::InvalidResponse(_))));

        let result = parse_predict_response(r#"{"boxes": [["a", 2, 3, 4]]}"#);
        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_not_json() {
        let result = parse_predict_response("<html>Bad Gateway</html>");
        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(FILE_FIELD, "file");
        assert_eq!(MODEL_FIELD, "model");
    }
}

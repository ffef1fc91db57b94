//! 表示座標への変換
//!
//! 元画像座標系の検出矩形を、固定幅で表示したプレビュー上の
//! オーバーレイ矩形に写像する。状態を持たない純粋関数のみ。

use serde::{Deserialize, Serialize};

use crate::types::{BoundingBox, ImageDimensions};

/// プレビュー表示幅（px）
pub const DEFAULT_DISPLAY_WIDTH: f64 = 500.0;

/// 縦方向の倍率の決め方
///
/// - `Legacy`: `scale_y = display_width / original_height`
///   （従来の画面と同じ。縦横比が1でない画像では縦位置がずれる）
/// - `Aspect`: プレビューは縦横比を保って表示されるため `scale_y = scale_x`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    #[default]
    Legacy,
    Aspect,
}

impl ScaleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleMode::Legacy => "legacy",
            ScaleMode::Aspect => "aspect",
        }
    }
}

impl std::str::FromStr for ScaleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(ScaleMode::Legacy),
            "aspect" => Ok(ScaleMode::Aspect),
            _ => Err(format!("Unknown scale mode: {}. Use legacy or aspect", s)),
        }
    }
}

impl std::fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 表示ジオメトリ（毎回導出し、保存しない）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    pub display_width: f64,
    /// 縦横比を保った表示高さ
    pub display_height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl DisplayGeometry {
    /// 元画像サイズが0の場合は None
    pub fn new(original: ImageDimensions, display_width: f64, mode: ScaleMode) -> Option<Self> {
        if original.is_empty() {
            return None;
        }

        let width = f64::from(original.width);
        let height = f64::from(original.height);
        let scale_x = display_width / width;
        let scale_y = match mode {
            ScaleMode::Legacy => display_width / height,
            ScaleMode::Aspect => scale_x,
        };

        Some(Self {
            display_width,
            display_height: height * scale_x,
            scale_x,
            scale_y,
        })
    }

    pub fn project(&self, key: usize, b: &BoundingBox) -> OverlayRect {
        OverlayRect {
            key,
            left: b.x_min * self.scale_x,
            top: b.y_min * self.scale_y,
            width: (b.x_max - b.x_min) * self.scale_x,
            height: (b.y_max - b.y_min) * self.scale_y,
        }
    }
}

/// プレビュー上のオーバーレイ矩形
///
/// `key` はリスト内の位置（描画時の識別子）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayRect {
    pub key: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// 検出矩形をすべて表示座標に変換
///
/// クリップ・重複除去・件数制限は行わない。順序はサーバー応答のまま
pub fn overlay_rects(
    boxes: &[BoundingBox],
    original: ImageDimensions,
    display_width: f64,
    mode: ScaleMode,
) -> Vec<OverlayRect> {
    let Some(geometry) = DisplayGeometry::new(original, display_width, mode) else {
        return vec![];
    };

    boxes
        .iter()
        .enumerate()
        .map(|(i, b)| geometry.project(i, b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_box() -> BoundingBox {
        BoundingBox::new(10.0, 20.0, 110.0, 220.0)
    }

    #[test]
    fn test_legacy_uses_display_width_for_both_axes() {
        let rects = overlay_rects(
            &[sample_box()],
            ImageDimensions::new(1000, 2000),
            500.0,
            ScaleMode::Legacy,
        );

        assert_eq!(rects.len(), 1);
        let r = rects[0];
        assert_eq!(r.left, 5.0);
        assert_eq!(r.top, 5.0);
        assert_eq!(r.width, 50.0);
        assert_eq!(r.height, 50.0);
    }

    #[test]
    fn test_aspect_keeps_proportional_height() {
        let rects = overlay_rects(
            &[sample_box()],
            ImageDimensions::new(1000, 2000),
            500.0,
            ScaleMode::Aspect,
        );

        let r = rects[0];
        assert_eq!(r.left, 5.0);
        assert_eq!(r.top, 10.0);
        assert_eq!(r.width, 50.0);
        assert_eq!(r.height, 100.0);
    }

    #[test]
    fn test_square_image_modes_agree() {
        let dims = ImageDimensions::new(1000, 1000);
        let legacy = overlay_rects(&[sample_box()], dims, 500.0, ScaleMode::Legacy);
        let aspect = overlay_rects(&[sample_box()], dims, 500.0, ScaleMode::Aspect);

        assert_eq!(legacy, aspect);
        assert_eq!(legacy[0].top, 10.0);
        assert_eq!(legacy[0].height, 100.0);
    }

    #[test]
    fn test_legacy_formula_holds_for_various_sizes() {
        let cases = [
            (640u32, 480u32, 500.0),
            (1920, 1080, 500.0),
            (333, 777, 250.0),
            (4000, 3000, 800.0),
        ];
        let b = BoundingBox::new(12.5, 40.0, 300.0, 410.0);

        for (w, h, d) in cases {
            let rects = overlay_rects(&[b], ImageDimensions::new(w, h), d, ScaleMode::Legacy);
            let r = rects[0];
            let (w, h) = (f64::from(w), f64::from(h));
            assert!((r.left - b.x_min * d / w).abs() < 1e-9);
            assert!((r.width - (b.x_max - b.x_min) * d / w).abs() < 1e-9);
            assert!((r.top - b.y_min * d / h).abs() < 1e-9);
            assert!((r.height - (b.y_max - b.y_min) * d / h).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_boxes_render_nothing() {
        let rects = overlay_rects(&[], ImageDimensions::new(100, 100), 500.0, ScaleMode::Legacy);
        assert!(rects.is_empty());
    }

    #[test]
    fn test_keys_follow_server_order() {
        let boxes = vec![
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(50.0, 50.0, 60.0, 60.0),
        ];
        let rects = overlay_rects(&boxes, ImageDimensions::new(100, 100), 500.0, ScaleMode::Legacy);

        // 重複も除去しない
        assert_eq!(rects.len(), 3);
        assert_eq!(rects.iter().map(|r| r.key).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(rects[2].left, 250.0);
    }

    #[test]
    fn test_boxes_outside_image_are_not_clipped() {
        let b = BoundingBox::new(-10.0, 0.0, 300.0, 50.0);
        let rects = overlay_rects(&[b], ImageDimensions::new(200, 200), 100.0, ScaleMode::Legacy);
        assert_eq!(rects[0].left, -5.0);
        assert_eq!(rects[0].width, 155.0);
    }

    #[test]
    fn test_zero_dimensions_yield_no_geometry() {
        assert!(DisplayGeometry::new(ImageDimensions::new(0, 100), 500.0, ScaleMode::Legacy).is_none());
        let rects = overlay_rects(&[sample_box()], ImageDimensions::new(100, 0), 500.0, ScaleMode::Legacy);
        assert!(rects.is_empty());
    }

    #[test]
    fn test_display_height_is_proportional() {
        let g = DisplayGeometry::new(ImageDimensions::new(1000, 2000), 500.0, ScaleMode::Legacy)
            .expect("geometry");
        assert_eq!(g.display_height, 1000.0);
        assert_eq!(g.scale_x, 0.5);
        assert_eq!(g.scale_y, 0.25);
    }

    #[test]
    fn test_scale_mode_parse() {
        assert_eq!("legacy".parse::<ScaleMode>(), Ok(ScaleMode::Legacy));
        assert_eq!("Aspect".parse::<ScaleMode>(), Ok(ScaleMode::Aspect));
        assert!("stretch".parse::<ScaleMode>().is_err());
        assert_eq!(ScaleMode::default(), ScaleMode::Legacy);
    }
}

//! 検出モデルの選択肢

use serde::{Deserialize, Serialize};

/// 推論サーバーで選択できる検出モデル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelChoice {
    #[default]
    Detr,
    Yolo,
    FasterRcnn,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 3] = [ModelChoice::Detr, ModelChoice::Yolo, ModelChoice::FasterRcnn];

    /// `model` フィールドに送る識別子
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelChoice::Detr => "detr",
            ModelChoice::Yolo => "yolo",
            ModelChoice::FasterRcnn => "faster_rcnn",
        }
    }

    /// 選択肢の表示名
    pub fn label(&self) -> &'static str {
        match self {
            ModelChoice::Detr => "DETR",
            ModelChoice::Yolo => "YOLOv5",
            ModelChoice::FasterRcnn => "Faster R-CNN",
        }
    }
}

impl std::str::FromStr for ModelChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detr" => Ok(ModelChoice::Detr),
            "yolo" | "yolov5" => Ok(ModelChoice::Yolo),
            "faster_rcnn" | "faster-rcnn" => Ok(ModelChoice::FasterRcnn),
            _ => Err(format!("Unknown model: {}. Use detr, yolo, or faster_rcnn", s)),
        }
    }
}

impl std::fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

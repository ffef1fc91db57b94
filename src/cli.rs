use clap::{Parser, Subcommand};
use spike_detect_common::{ModelChoice, ScaleMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spike-detect")]
#[command(about = "小麦穂検出クライアント: 画像を推論サーバーに送り検出枠を重ねる", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を推論サーバーに送信して検出結果を表示
    Predict {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 検出モデル (detr/yolo/faster_rcnn)
        #[arg(short, long)]
        model: Option<ModelChoice>,

        /// 推論エンドポイントURL（設定ファイル・環境変数より優先）
        #[arg(long)]
        endpoint: Option<String>,

        /// タイムアウト（ミリ秒）
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// 縦方向の倍率 (legacy/aspect)
        #[arg(long)]
        scale_mode: Option<ScaleMode>,

        /// 検出枠を描いた画像の出力先
        #[arg(short, long)]
        overlay: Option<PathBuf>,

        /// 出力形式 (table/json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// 選択できるモデルの一覧
    Models,

    /// 設定を表示/編集
    Config {
        /// 推論エンドポイントURLを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// タイムアウト（ミリ秒）を設定
        #[arg(long)]
        set_timeout_ms: Option<u64>,

        /// アップロード上限（バイト）を設定
        #[arg(long)]
        set_max_upload_bytes: Option<u64>,

        /// 縦方向の倍率 (legacy/aspect) を設定
        #[arg(long)]
        set_scale_mode: Option<ScaleMode>,

        /// デフォルトのモデルを設定
        #[arg(long)]
        set_default_model: Option<ModelChoice>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predict() {
        let cli = Cli::try_parse_from([
            "spike-detect",
            "predict",
            "wheat.jpg",
            "--model",
            "faster_rcnn",
            "--timeout-ms",
            "1500",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Predict { image, model, timeout_ms, format, overlay, .. } => {
                assert_eq!(image, PathBuf::from("wheat.jpg"));
                assert_eq!(model, Some(ModelChoice::FasterRcnn));
                assert_eq!(timeout_ms, Some(1500));
                assert_eq!(format, OutputFormat::Json);
                assert!(overlay.is_none());
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn test_unknown_model_rejected() {
        let result = Cli::try_parse_from(["spike-detect", "predict", "wheat.jpg", "--model", "ssd"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config() {
        let cli = Cli::try_parse_from([
            "spike-detect",
            "-v",
            "config",
            "--set-scale-mode",
            "aspect",
            "--show",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Config { set_scale_mode, show, .. } => {
                assert_eq!(set_scale_mode, Some(ScaleMode::Aspect));
                assert!(show);
            }
            _ => panic!("expected config"),
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("TABLE".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}

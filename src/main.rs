use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use spike_detect::session::{ConsoleNotifier, DetectionSession};
use spike_detect::{cli, config, error, render};
use cli::{Cli, Commands, OutputFormat};
use config::Config;
use error::{Result, SpikeDetectError};
use spike_detect_common::{ModelChoice, Settlement};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;

    match cli.command {
        Commands::Predict { image, model, endpoint, timeout_ms, scale_mode, overlay, format } => {
            let mut client = config.effective_client();
            if let Some(endpoint) = endpoint {
                client.endpoint = endpoint;
            }
            if let Some(timeout_ms) = timeout_ms {
                client.timeout_ms = timeout_ms;
            }
            if let Some(scale_mode) = scale_mode {
                client.scale_mode = scale_mode;
            }

            let mut session = DetectionSession::new(client, ConsoleNotifier)?;

            // 1. 画像読み込み
            // 読めない画像は通知済みなので、終了コードだけ返す
            match session.select_file(&image) {
                Ok(()) => {}
                Err(SpikeDetectError::Detect(_)) => return Ok(ExitCode::FAILURE),
                Err(err) => return Err(err),
            }
            session.select_model(model.unwrap_or(config.default_model));

            // 2. 推論
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message(format!("推論中... ({})", session.state().model().label()));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let settlement = session.predict().await;
            spinner.finish_and_clear();

            match settlement {
                Settlement::Applied { count } => println!("✔ {}件の検出", count),
                // 詳細はログ、利用者への表示は通知の1回だけ
                Settlement::Failed(_) => return Ok(ExitCode::FAILURE),
                Settlement::Stale => println!("古い応答を破棄しました"),
            }

            // 3. 結果出力
            let Some(report) = session.report() else {
                return Ok(ExitCode::SUCCESS);
            };

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Table => print_table(&report),
            }

            // 4. オーバーレイ画像
            if let Some(path) = overlay {
                if let (Some(selection), Some(geometry)) = (session.state().selection(), session.geometry()) {
                    render::render_overlay(selection, &geometry, &report.overlay, &path)?;
                    println!("✔ オーバーレイを保存: {}", path.display());
                }
            }
        }

        Commands::Models => {
            for model in ModelChoice::ALL {
                let marker = if model == config.default_model { "*" } else { " " };
                println!("{} {:<12} {}", marker, model.as_str(), model.label());
            }
        }

        Commands::Config {
            set_endpoint,
            set_timeout_ms,
            set_max_upload_bytes,
            set_scale_mode,
            set_default_model,
            show,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(endpoint) = set_endpoint {
                config.client.endpoint = endpoint;
                changed = true;
            }
            if let Some(timeout_ms) = set_timeout_ms {
                config.client.timeout_ms = timeout_ms;
                changed = true;
            }
            if let Some(max_upload_bytes) = set_max_upload_bytes {
                config.client.max_upload_bytes = max_upload_bytes;
                changed = true;
            }
            if let Some(scale_mode) = set_scale_mode {
                config.client.scale_mode = scale_mode;
                changed = true;
            }
            if let Some(model) = set_default_model {
                config.default_model = model;
                changed = true;
            }

            if changed {
                config.client.validate()?;
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let client = config.effective_client();
                println!("設定:");
                println!("  エンドポイント: {}", client.endpoint);
                println!("  タイムアウト: {}ms", client.timeout_ms);
                println!("  アップロード上限: {} bytes", client.max_upload_bytes);
                println!("  表示幅: {}px", client.display_width);
                println!("  縦方向の倍率: {}", client.scale_mode);
                println!("  デフォルトモデル: {}", config.default_model.label());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_table(report: &spike_detect::session::PredictionReport) {
    println!(
        "{} ({}x{}) / {} / scale={}",
        report.file_name,
        report.dimensions.width,
        report.dimensions.height,
        report.model.label(),
        report.scale_mode
    );

    if report.boxes.is_empty() {
        println!("  検出なし");
        return;
    }

    println!(
        "  {:>3}  {:>8} {:>8} {:>8} {:>8}  |  {:>7} {:>7} {:>7} {:>7}",
        "#", "x_min", "y_min", "x_max", "y_max", "left", "top", "width", "height"
    );
    for (b, r) in report.boxes.iter().zip(&report.overlay) {
        println!(
            "  {:>3}  {:>8.1} {:>8.1} {:>8.1} {:>8.1}  |  {:>7.1} {:>7.1} {:>7.1} {:>7.1}",
            r.key, b.x_min, b.y_min, b.x_max, b.y_max, r.left, r.top, r.width, r.height
        );
    }
}

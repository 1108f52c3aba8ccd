use clap::Parser;
use question_reader::{cli, config, error, logging, surface, transport};
use cli::{Cli, Commands};
use config::Config;
use error::{QuestionReaderError, Result};
use question_reader_common::{normalize, InferenceClient};
use std::process::ExitCode;
use surface::TerminalSurface;
use transport::ReqwestTransport;

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.report());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command.unwrap_or(Commands::Capture) {
        Commands::Capture => {
            let client = build_client(&config, cli.model.as_deref())?;
            let mut surface = TerminalSurface::new(client);
            surface.run().await?;
        }

        Commands::Ask { image, json } => {
            let client = build_client(&config, cli.model.as_deref())?;
            let mut surface = TerminalSurface::new(client);
            if json {
                surface = surface.without_progress();
            }

            let Some(outcome) = surface.capture_file(&image).await? else {
                return Ok(ExitCode::FAILURE);
            };

            if json {
                println!("{}", serde_json::to_string(&outcome)?);
            } else {
                println!("{}", outcome.display_text());
            }

            if outcome.is_error() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Normalize { image, output } => {
            if !image.is_file() {
                return Err(QuestionReaderError::FileNotFound(image.display().to_string()));
            }

            let bytes = std::fs::read(&image)?;
            let payload = normalize(&bytes)?;
            let jpeg = payload.jpeg_bytes()?;

            let output = output.unwrap_or_else(|| cli::default_normalized_path(&image));
            std::fs::write(&output, &jpeg)?;

            println!(
                "✔ {}x{} → {}x{}",
                payload.source_width, payload.source_height, payload.width, payload.height
            );
            println!("  JPEG: {} bytes / Base64: {} chars", jpeg.len(), payload.data.len());
            println!("  保存: {}", output.display());
        }

        Commands::Config { set_api_key, set_model, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.endpoint);
                println!(
                    "  APIキー: {}",
                    if config.get_api_key().is_ok() { "設定済み" } else { "未設定" }
                );
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// APIキーは起動時に一度だけ読み、クライアントに渡す
fn build_client(config: &Config, model: Option<&str>) -> Result<InferenceClient<ReqwestTransport>> {
    let inference = config.inference_config(model)?;
    tracing::debug!(?inference, "inference client configured");
    Ok(InferenceClient::new(inference, ReqwestTransport::new()?))
}

pub mod chart;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod forms;
pub mod ollama;
pub mod panels;
pub mod services;
pub mod store;
pub mod timeline;
pub mod timer;

use anyhow::Context;
use clap::Parser;
use config::ConsoleConfig;
use panels::{Dashboard, UploadForm};
use services::VideoFile;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the default `info`
/// filter; later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Headless episode console: load the sponsor grid, optionally upload a
/// video, then print the diagnostics report as JSON.
#[derive(Parser, Debug)]
#[command(name = "episode-console")]
#[command(version)]
pub struct Cli {
    /// Video file to upload with the default metadata
    pub video: Option<PathBuf>,

    /// Use the instant offline profile instead of the config file
    #[arg(long)]
    pub dry_run: bool,

    /// Config file to load instead of the default location
    #[arg(short, long, conflicts_with = "dry_run")]
    pub config: Option<PathBuf>,
}

async fn video_file(path: &Path) -> anyhow::Result<VideoFile> {
    let meta = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("{:?} has no file name", path))?;
    Ok(VideoFile {
        name,
        size_bytes: meta.len(),
    })
}

/// Headless session for parsed command-line arguments.
pub fn run(args: Cli) -> anyhow::Result<()> {
    init_logging();

    let config = if args.dry_run {
        ConsoleConfig::instant()
    } else {
        ConsoleConfig::load(args.config.as_deref())?
    };
    log::info!("Using config from {}", config.source_label());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build the async runtime")?;

    runtime.block_on(async {
        let dashboard = Dashboard::new(config);

        let ollama_config = &dashboard.context().config.ollama;
        if ollama_config.enabled {
            match ollama::OllamaClient::from_config(ollama_config).health_check().await {
                Ok(status) if status.model_available => log::info!("Ollama ready with {}", status.model),
                Ok(status) => log::warn!(
                    "Ollama is running but {} is not pulled (have: {})",
                    status.model,
                    status.available_models.join(", ")
                ),
                Err(e) => log::warn!("Ollama unavailable, descriptions will fail open: {}", e),
            }
        }

        if let Err(e) = dashboard.sponsor_sync.load().await {
            log::warn!("Sponsor grid unavailable: {}", e);
        }

        if let Some(path) = &args.video {
            let form = UploadForm {
                file: Some(video_file(path).await?),
                ..UploadForm::default()
            };
            match dashboard.upload.submit(&form).await {
                Ok(outcome) => log::info!("Uploaded {} as {}", outcome.filename, outcome.watch_url),
                Err(e) => log::error!("Upload failed: {}", e),
            }
        }

        if let Some(banner) = dashboard.active_context_banner() {
            log::info!("{}", banner);
        }

        let report = serde_json::to_string_pretty(&dashboard.diagnostics())?;
        println!("{}", report);
        Ok::<_, anyhow::Error>(())
    })
}

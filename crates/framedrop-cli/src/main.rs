//! Framedrop CLI: drive the upload client outside the node-graph host.
//!
//! Set FRAMEDROP_UPLOAD_URL and FRAMEDROP_API_KEY, or pass --url/--api-key.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use framedrop_cli::{format_byte_size, init_tracing};
use framedrop_client::{InputSource, UploadClient, UploadPayload, UploadTarget};
use framedrop_core::mime::IMAGE_PNG;
use framedrop_core::target::{DEFAULT_TIMEOUT_SECS, IMAGE_TIMEOUT_SECS};
use framedrop_nodes::default_registry;

#[derive(Parser)]
#[command(name = "framedrop", about = "Upload rendered media to a remote server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a video or other media file (MIME from extension)
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Upload endpoint (falls back to FRAMEDROP_UPLOAD_URL)
        #[arg(long)]
        url: Option<String>,
        /// API key (falls back to FRAMEDROP_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Timeout in seconds, clamped to [30, 3600]
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
    },
    /// Upload an already-encoded PNG image
    UploadImage {
        /// Path to the PNG file to upload
        file: PathBuf,
        /// Upload endpoint (falls back to FRAMEDROP_UPLOAD_URL)
        #[arg(long)]
        url: Option<String>,
        /// API key (falls back to FRAMEDROP_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// List the available nodes and their host-facing declarations
    Nodes,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn target_from(url: Option<String>, api_key: Option<String>) -> anyhow::Result<UploadTarget> {
    let url = url
        .or_else(|| std::env::var("FRAMEDROP_UPLOAD_URL").ok())
        .context("Missing upload URL. Pass --url or set FRAMEDROP_UPLOAD_URL")?;
    let api_key = api_key
        .or_else(|| std::env::var("FRAMEDROP_API_KEY").ok())
        .context("Missing API key. Pass --api-key or set FRAMEDROP_API_KEY")?;
    Ok(UploadTarget::new(url, api_key))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            file,
            url,
            api_key,
            timeout,
        } => {
            let target = target_from(url, api_key)?.with_timeout_secs(timeout);
            target.validate().context("Invalid upload target")?;
            let client = UploadClient::new(target)?;
            let receipt = client.upload(InputSource::Path(file)).await?;
            print_json(&receipt)?;
        }
        Commands::UploadImage { file, url, api_key } => {
            let target = target_from(url, api_key)?
                .with_fixed_timeout(Duration::from_secs(IMAGE_TIMEOUT_SECS));
            target.validate().context("Invalid upload target")?;

            let data = std::fs::read(&file)
                .with_context(|| format!("Failed to read image file {}", file.display()))?;
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image.png".to_string());
            println!("Uploading {} ({})...", filename, format_byte_size(data.len() as u64));

            let client = UploadClient::new(target)?;
            let receipt = client
                .send(UploadPayload::new(data, filename, IMAGE_PNG))
                .await?;
            print_json(&receipt)?;
        }
        Commands::Nodes => {
            let registry = default_registry().await?;
            print_json(&registry.list().await)?;
        }
    }

    Ok(())
}

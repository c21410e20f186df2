//! drive_export CLI - Export a Google Drive folder to local storage.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use drive_export::client::DRIVE_API_BASE;
use drive_export::models::format_size;
use drive_export::{extract_id, list_files, Authenticator, DriveClient, DriveError, Downloader};

/// Exit status when credentials could not be obtained.
const EXIT_AUTH: u8 = 2;

/// Exit status when the batch ran but some files failed.
const EXIT_PARTIAL: u8 = 3;

/// Export every document in a Google Drive folder to local files.
#[derive(Parser)]
#[command(name = "drive_export")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Folder URL or ID. Prompted for when omitted.
    #[arg(env = "DRIVE_FOLDER_ID")]
    folder: Option<String>,

    /// Path to the OAuth client secrets JSON file.
    #[arg(long, env = "GOOGLE_CLIENT_SECRETS", default_value = "credentials.json")]
    credentials: PathBuf,

    /// Where the access/refresh token is cached between runs.
    #[arg(long, env = "GOOGLE_TOKEN_CACHE", default_value = "token.json")]
    token_cache: PathBuf,

    /// Local destination directory.
    #[arg(long, short = 'o', env = "DRIVE_EXPORT_DIR", default_value = "downloads")]
    output: PathBuf,

    /// Only export the folder's direct children.
    #[arg(long)]
    no_recursive: bool,

    #[arg(long, env = "DRIVE_API_BASE", default_value = DRIVE_API_BASE, hide = true)]
    base_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("failed to initialize tracing: {}", err);
    }

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_PARTIAL),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let auth_failure = err.chain().any(|cause| {
                cause
                    .downcast_ref::<DriveError>()
                    .is_some_and(DriveError::is_authentication)
            });
            if auth_failure {
                ExitCode::from(EXIT_AUTH)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Returns whether every supported file was written.
async fn run(cli: Cli) -> Result<bool> {
    let folder = match cli.folder {
        Some(folder) => folder,
        None => read_stdin_trimmed("Enter Google Drive folder ID: ")
            .context("Failed to read folder ID")?,
    };
    let folder_id = extract_id(&folder)
        .with_context(|| format!("Invalid folder URL or ID: {:?}", folder))?;

    let auth = Authenticator::from_files(&cli.credentials, &cli.token_cache)
        .await
        .with_context(|| format!("Failed to load credentials from {:?}", cli.credentials))?;
    auth.get_access_token()
        .await
        .context("Failed to authenticate with Google Drive")?;

    let client = DriveClient::new(auth).with_base_url(cli.base_url);

    println!("Listing files in folder: {}", folder_id);
    let files = list_files(&client, &folder_id, !cli.no_recursive)
        .await
        .with_context(|| format!("Failed to list files in folder: {}", folder_id))?;

    if files.is_empty() {
        println!("No files found in the specified folder.");
        return Ok(true);
    }

    let total_size: u64 = files.iter().filter_map(|f| f.size).sum();
    println!(
        "Found {} files ({}). Starting download...",
        files.len(),
        format_size(total_size)
    );

    let summary = Downloader::new(&client, &cli.output)
        .download(&files)
        .await
        .with_context(|| format!("Failed to create output directory: {:?}", cli.output))?;

    println!(
        "{} written, {} skipped, {} failed.",
        summary.written.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    for failed in &summary.failed {
        eprintln!("  {}: {}", failed.name, failed.error);
    }
    println!("Download complete!");

    Ok(summary.is_success())
}

fn read_stdin_trimmed(prompt: &str) -> std::io::Result<String> {
    let mut stdout = std::io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut buffer = String::new();
    std::io::stdin().read_line(&mut buffer)?;

    Ok(buffer.trim().to_owned())
}

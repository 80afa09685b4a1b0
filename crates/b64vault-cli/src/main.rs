//! b64vault CLI: store, inspect and validate base64 payloads.
//!
//! Configuration is read from the environment (and `.env`), see `B64VAULT_*`.

use std::process::ExitCode;

use anyhow::Context;
use b64vault_cli::{init_tracing, load_env, read_payload, ErrorReport, STDIN_SOURCE};
use b64vault_core::{normalize_extensions, Config};
use b64vault_processing::{Base64FileHandler, HandlerError, StoreOptions};
use b64vault_storage::create_disks;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "b64vault", about = "Decode, validate and store base64 payloads")]
struct Cli {
    /// Environment file to load instead of `.env`
    #[arg(long, global = true)]
    env_file: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a payload and write it to a storage disk
    Store {
        /// File holding the base64 payload, or "-" for stdin
        #[arg(default_value = STDIN_SOURCE)]
        source: String,
        /// Disk to write to (defaults to B64VAULT_DISK)
        #[arg(long)]
        disk: Option<String>,
        /// Directory on the disk (defaults to B64VAULT_PATH)
        #[arg(long)]
        path: Option<String>,
        /// Original file name used to name the stored file
        #[arg(long)]
        name: Option<String>,
        /// Comma separated list of allowed extensions
        #[arg(long, value_delimiter = ',')]
        allow: Option<Vec<String>>,
    },
    /// Print the MIME type, extension and size of a payload
    Info {
        /// File holding the base64 payload, or "-" for stdin
        #[arg(default_value = STDIN_SOURCE)]
        source: String,
    },
    /// Check that a payload is an image
    ValidateImage {
        /// File holding the base64 payload, or "-" for stdin
        #[arg(default_value = STDIN_SOURCE)]
        source: String,
        /// Comma separated list of image extensions
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,
    },
}

#[derive(Serialize)]
struct StoreOutput<'a> {
    disk: &'a str,
    path: String,
}

#[derive(Serialize)]
struct ValidateOutput {
    valid: bool,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    load_env(cli.env_file.as_deref())?;

    let config = Config::from_env().context("Failed to load configuration from B64VAULT_*")?;
    let disks = create_disks(&config)
        .await
        .context("Failed to initialize storage disks")?;
    let handler = Base64FileHandler::new(config.handler().clone(), disks);

    let result = run(&handler, cli.command).await?;
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            tracing::debug!(error = ?err, "Operation failed");
            print_json(&ErrorReport::from_error(&err))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Run one command. The outer error is an I/O or output failure, the inner one
/// a handler failure reported as JSON.
async fn run(
    handler: &Base64FileHandler,
    command: Commands,
) -> anyhow::Result<Result<(), HandlerError>> {
    match command {
        Commands::Store {
            source,
            disk,
            path,
            name,
            allow,
        } => {
            let payload = read_payload(&source)?;

            let mut options = StoreOptions::new();
            options.disk = disk;
            options.path = path;
            options.original_name = name;
            if let Some(allow) = allow {
                options = options.with_allowed_extensions(allow);
            }

            let disk_name = options
                .disk
                .clone()
                .unwrap_or_else(|| handler.config().disk.clone());
            match handler.store(&payload, options).await {
                Ok(path) => print_json(&StoreOutput {
                    disk: &disk_name,
                    path,
                })?,
                Err(err) => return Ok(Err(err)),
            }
        }
        Commands::Info { source } => {
            let payload = read_payload(&source)?;
            match handler.get_file_info(&payload) {
                Ok(info) => print_json(&info)?,
                Err(err) => return Ok(Err(err)),
            }
        }
        Commands::ValidateImage { source, extensions } => {
            let payload = read_payload(&source)?;
            let extensions = extensions.map(normalize_extensions);
            match handler.is_valid_image(&payload, extensions.as_ref()) {
                Ok(valid) => print_json(&ValidateOutput { valid })?,
                Err(err) => return Ok(Err(err)),
            }
        }
    }

    Ok(Ok(()))
}

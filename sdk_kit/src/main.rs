//! # Forge CLI - SDK download tool for services built with `sdk_kit`.
//!
//! Fetches generated SDK files from a running service's exporter and writes them into the
//! project. Defaults are read from `[package.metadata.sdk_kit]` in the current `Cargo.toml`.
//! It can be invoked directly or via a local `cargo forge` alias.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sdk_kit::{File, ManifestConfig};
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// The main CLI entry point for `cargo forge`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Downloads generated client SDKs from services built with sdk_kit."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Defines the available subcommands for `cargo forge`.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Downloads the SDK for one target and writes its files.
    Sdk {
        /// Exporter address, e.g. `http://127.0.0.1:3000`.
        #[arg(short, long, env = "SDK_KIT_ADDRESS")]
        address: Option<String>,

        /// Target maker: go, angular, umi, axios, rust or openapi.
        #[arg(short, long)]
        target: Option<String>,

        /// Directory the files are written to.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Package name hint passed to the maker.
        #[arg(short, long)]
        package: Option<String>,

        /// Create the output directory without asking.
        #[arg(short, long)]
        yes: bool,
    },

    /// Prints the protocol document served by the exporter.
    Protocol {
        #[arg(short, long, env = "SDK_KIT_ADDRESS")]
        address: Option<String>,

        /// Rewrite field types for this language (only `ts` is supported).
        #[arg(short, long, default_value = "")]
        lang: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sdk_kit=debug")),
        )
        .init();

    // When invoked as `cargo forge`, Cargo passes "forge" as the first argument.
    let mut args: Vec<String> = env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("forge") {
        args.remove(1);
    }

    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Sdk {
            address,
            target,
            output,
            package,
            yes,
        } => sdk(address, target, output, package, yes).await?,
        Commands::Protocol { address, lang } => protocol(address, lang).await?,
    }

    Ok(())
}

/// Handler for the `sdk` command.
async fn sdk(
    address: Option<String>,
    target: Option<String>,
    output: Option<PathBuf>,
    package: Option<String>,
    yes: bool,
) -> Result<()> {
    let project_root = get_project_root()?;
    let manifest = load_manifest(&project_root)?;

    let address = resolve_address(address.or(manifest.address))?;
    let target = target
        .or(manifest.target)
        .context("No target given. Pass --target or set `target` in [package.metadata.sdk_kit].")?;
    let output = output
        .or(manifest.output_dir)
        .unwrap_or_else(|| project_root.join("sdk").join(&target));
    let package = package.or(manifest.package).unwrap_or_default();

    println!("{} Fetching '{}' SDK from {}", "▶".green(), target, address);
    let response = reqwest::Client::new()
        .get(format!("{address}/sdk"))
        .query(&[("lang", target.as_str()), ("package", package.as_str())])
        .send()
        .await
        .with_context(|| format!("Failed to reach exporter at {address}"))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Exporter answered {}: {}", status, body.trim());
    }
    let files: Vec<File> = response
        .json()
        .await
        .context("Failed to decode the SDK file list")?;

    ensure_output_dir(&output, yes)?;
    for file in &files {
        let path = output.join(&file.name);
        fs::write(&path, &file.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("   {} {}", "write".cyan(), path.display());
    }

    println!("{} {} files written to {}", "✔".green(), files.len(), output.display());
    Ok(())
}

/// Handler for the `protocol` command.
async fn protocol(address: Option<String>, lang: String) -> Result<()> {
    let manifest = load_manifest(&get_project_root()?)?;
    let address = resolve_address(address.or(manifest.address))?;
    let response = reqwest::Client::new()
        .get(format!("{address}/protocol"))
        .query(&[("lang", lang.as_str())])
        .send()
        .await
        .with_context(|| format!("Failed to reach exporter at {address}"))?
        .error_for_status()?;
    let document: serde_json::Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

// --- Helper Functions ---

/// Helper function to locate the root of the current project.
fn get_project_root() -> Result<PathBuf> {
    env::current_dir().context("Failed to get current directory")
}

/// Reads `[package.metadata.sdk_kit]`, or defaults when there is no `Cargo.toml`.
fn load_manifest(project_root: &Path) -> Result<ManifestConfig> {
    if !project_root.join("Cargo.toml").exists() {
        return Ok(ManifestConfig::default());
    }
    ManifestConfig::from_project(project_root).context("Failed to read [package.metadata.sdk_kit]")
}

fn resolve_address(address: Option<String>) -> Result<String> {
    let address = address
        .context("No exporter address given. Pass --address or set SDK_KIT_ADDRESS.")?
        .trim_end_matches('/')
        .to_string();
    if address.starts_with("http://") || address.starts_with("https://") {
        Ok(address)
    } else {
        Ok(format!("http://{address}"))
    }
}

fn ensure_output_dir(output: &Path, yes: bool) -> Result<()> {
    if output.is_dir() {
        return Ok(());
    }
    if !yes {
        print!("Directory {} does not exist. Create it? [y/N] ", output.display());
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            anyhow::bail!("Aborted, nothing written.");
        }
    }
    fs::create_dir_all(output).with_context(|| format!("Failed to create {}", output.display()))
}

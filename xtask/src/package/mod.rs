//! Lambda packaging command.

mod error;

pub use error::{PackageError, Result};

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::prelude::*;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "tonewatch_lambda";
const LAMBDA_BINARY: &str = "tonewatch-lambda";

/// Entry name the `provided` runtimes execute.
const BOOTSTRAP_ENTRY: &str = "bootstrap";

/// Build the function binary and zip it for deployment.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Build the Lambda binary and package it for deployment.

Compiles the handler for the given target and writes a zip archive holding
the binary as an executable `bootstrap` entry, ready for the provided.al2023
runtime. `cargo xtask pipeline deploy` uploads this archive.")]
pub struct PackageCommand {
    /// Rust target triple to build for.
    #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
    pub target: String,

    /// Build in debug mode instead of release.
    #[arg(long)]
    pub debug: bool,

    /// Archive to write.
    #[arg(long, default_value = "dist/lambda.zip")]
    pub output: PathBuf,
}

/// Main entry point for package command.
pub async fn run(cmd: PackageCommand, global: crate::Global) -> Result<()> {
    let mut cargo_args = vec![
        "build",
        "-p",
        LAMBDA_PACKAGE,
        "--bin",
        LAMBDA_BINARY,
        "--target",
        cmd.target.as_str(),
    ];
    if !cmd.debug {
        cargo_args.push("--release");
    }

    if !global.is_silent() {
        aprintln!("{} cargo {}", p_b("Building:"), cargo_args.join(" "));
    }

    let status = execute_command_interactive("cargo", &cargo_args).await?;
    if !status.success() {
        return Err(PackageError::BuildFailed(status.code().unwrap_or(1)));
    }

    let profile_dir = if cmd.debug { "debug" } else { "release" };
    let target_dir = target_dir(std::env::var_os("CARGO_TARGET_DIR").map(PathBuf::from));
    let binary_path = target_dir
        .join(&cmd.target)
        .join(profile_dir)
        .join(LAMBDA_BINARY);

    package_lambda_zip(&binary_path, &cmd.output)?;

    if !global.is_silent() {
        aprintln!("{} {}", p_g("Packaged:"), cmd.output.display());
        aprintln!(
            "{} deploy with --architecture {}",
            p_b("Next:"),
            lambda_architecture(&cmd.target)
        );
    }

    Ok(())
}

/// Cargo's output directory: `CARGO_TARGET_DIR` when set, else the workspace `target/`.
pub fn target_dir(cargo_target_dir: Option<PathBuf>) -> PathBuf {
    cargo_target_dir.unwrap_or_else(|| {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap_or(Path::new(env!("CARGO_MANIFEST_DIR")))
            .join("target")
    })
}

/// Lambda architecture matching a Rust target triple.
pub fn lambda_architecture(target: &str) -> &'static str {
    if target.starts_with("aarch64") {
        "arm64"
    } else {
        "x86_64"
    }
}

/// Write `binary_path` into a new archive at `zip_path` as an executable `bootstrap`.
pub fn package_lambda_zip(binary_path: &Path, zip_path: &Path) -> Result<()> {
    if !binary_path.is_file() {
        return Err(PackageError::BinaryMissing(binary_path.to_path_buf()));
    }

    if let Some(parent) = zip_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let binary = std::fs::read(binary_path)?;
    let file = std::fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);

    zip.start_file(BOOTSTRAP_ENTRY, options)?;
    zip.write_all(&binary)?;
    zip.finish()?;

    Ok(())
}

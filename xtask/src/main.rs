//! See <https://github.com/matklad/cargo-xtask/>
//!
//! This binary defines various auxiliary build commands, which are not
//! expressible with just `cargo`.
//!
//! The binary is integrated into the `cargo` command line by using an
//! alias in `.cargo/config`.

use clap::Parser;

mod package;
mod pipeline;
mod prelude;

/// Development and deployment tasks for the tonewatch repository
#[derive(Debug, Parser)]
#[command(name = "xtask")]
#[command(about = "Development and deployment tasks for tonewatch", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: Global,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Silence the command output
    #[clap(long, global = true)]
    pub silent: bool,

    /// Enable verbose output
    #[clap(long, global = true)]
    pub verbose: bool,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Provision the AWS pipeline and upload audio
    Pipeline(pipeline::PipelineCommand),

    /// Build the Lambda binary and package it for deployment
    Package(package::PackageCommand),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pipeline(pipeline_cmd) => {
            pipeline::run(pipeline_cmd, cli.global).await?;
        }
        Commands::Package(package_cmd) => {
            package::run(package_cmd, cli.global).await?;
        }
    }

    Ok(())
}

//! Audio sentiment pipeline provisioning commands.

mod client;
mod config;
mod deploy;
mod error;
mod planning;
mod policies;
mod upload;

pub use error::{PipelineError, Result};

use std::path::PathBuf;
use std::time::Duration;

use crate::prelude::*;
use dialoguer::Confirm;
use tonewatch_core::resources::DEFAULT_TABLE_NAME;

use config::{FunctionArchitecture, PipelineConfig};
use planning::StepStatus;

/// Audio sentiment pipeline commands.
#[derive(Debug, clap::Parser)]
pub struct PipelineCommand {
    #[command(subcommand)]
    pub action: PipelineAction,
}

/// Available pipeline actions.
#[derive(Debug, clap::Subcommand)]
pub enum PipelineAction {
    /// Provision every resource of the pipeline.
    Deploy(DeployCommand),

    /// Upload audio files to the pipeline bucket.
    Upload(UploadCommand),
}

/// Provision the pipeline.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Provision the audio sentiment pipeline.

Creates the audio bucket, the notification queue, the DynamoDB table stack,
the function role and the Lambda function, then wires the bucket to the queue
and the queue to the function. Finally uploads the audio directory so every
file runs through the pipeline.

Steps run in order. A failing step is reported and the remaining steps still
run; steps that depend on its output are skipped. Run `cargo xtask package`
first so the function artifact exists.

Environment variables:
  AWS_ENDPOINT_URL    - Use a local AWS emulator (e.g., http://localhost:4566)
  AWS_REGION          - AWS region (defaults to eu-west-2)
  AWS_PROFILE         - AWS profile to use for credentials")]
pub struct DeployCommand {
    /// Bucket receiving audio files.
    #[arg(long, env = "TONEWATCH_BUCKET", default_value = "tonewatch-audio")]
    pub bucket: String,

    /// Queue receiving bucket notifications.
    #[arg(long, env = "TONEWATCH_QUEUE", default_value = "tonewatch-queue")]
    pub queue: String,

    /// CloudFormation stack holding the results table.
    #[arg(long, env = "TONEWATCH_STACK", default_value = "tonewatch-database")]
    pub stack: String,

    /// Results table name, passed to the stack as `TableName`.
    #[arg(long, env = "TONEWATCH_TABLE", default_value = DEFAULT_TABLE_NAME)]
    pub table: String,

    /// CloudFormation template for the results table.
    #[arg(long, default_value = "infra/database.json")]
    pub template: PathBuf,

    /// IAM role assumed by the function.
    #[arg(long, env = "TONEWATCH_ROLE", default_value = "tonewatch-lambda-role")]
    pub role: String,

    /// Lambda function name.
    #[arg(long, env = "TONEWATCH_FUNCTION", default_value = "tonewatch-handler")]
    pub function: String,

    /// Packaged function archive.
    #[arg(long, default_value = "dist/lambda.zip")]
    pub artifact: PathBuf,

    /// Instruction set of the packaged binary (`cargo xtask package` prints it).
    #[arg(
        long,
        value_enum,
        env = "TONEWATCH_ARCHITECTURE",
        default_value_t = FunctionArchitecture::X8664
    )]
    pub architecture: FunctionArchitecture,

    /// Phone number receiving negative sentiment alerts.
    #[arg(long, env = "TONEWATCH_ALERT_PHONE")]
    pub alert_phone: Option<String>,

    /// Directory of audio files to upload.
    #[arg(long, default_value = "audio")]
    pub audio_dir: PathBuf,

    /// Seconds to wait between uploads.
    #[arg(long, default_value = "30")]
    pub upload_delay_secs: u64,

    /// Provision resources without uploading audio.
    #[arg(long)]
    pub skip_upload: bool,

    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,
}

/// Upload audio files to the pipeline bucket.
#[derive(Debug, clap::Parser)]
pub struct UploadCommand {
    /// Bucket receiving audio files.
    #[arg(long, env = "TONEWATCH_BUCKET", default_value = "tonewatch-audio")]
    pub bucket: String,

    /// Directory of audio files to upload.
    #[arg(long, default_value = "audio")]
    pub audio_dir: PathBuf,

    /// Seconds to wait between uploads.
    #[arg(long, default_value = "30")]
    pub upload_delay_secs: u64,
}

impl DeployCommand {
    fn into_config(self, region: String) -> PipelineConfig {
        PipelineConfig {
            region,
            bucket: self.bucket,
            queue: self.queue,
            stack: self.stack,
            table: self.table,
            template: self.template,
            role: self.role,
            function: self.function,
            artifact: self.artifact,
            architecture: self.architecture,
            alert_phone_number: self.alert_phone.filter(|phone| !phone.is_empty()),
            audio_dir: self.audio_dir,
            upload_delay: Duration::from_secs(self.upload_delay_secs),
            skip_upload: self.skip_upload,
        }
    }
}

/// Main entry point for pipeline command.
pub async fn run(command: PipelineCommand, global: crate::Global) -> Result<()> {
    match command.action {
        PipelineAction::Deploy(deploy_cmd) => run_deploy(deploy_cmd, &global).await,
        PipelineAction::Upload(upload_cmd) => run_upload(upload_cmd, &global).await,
    }
}

async fn run_deploy(cmd: DeployCommand, global: &crate::Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();
    let force = cmd.force;
    let config = cmd.into_config(aws_config.region.clone());

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!();
    }

    let steps = planning::deployment_plan(&config);

    if !global.is_silent() {
        aprintln!("{}", p_c("Deploy Plan:"));
        for line in planning::format_deploy_plan(&steps, &config) {
            if line.starts_with('+') {
                aprintln!("  {}", p_g(&line));
            } else if line.starts_with('=') {
                aprintln!("  {}", p_y(&line));
            } else {
                aprintln!("  {}", line);
            }
        }
        aprintln!();
    }

    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Provision these resources?")
            .default(true)
            .interact()
            .map_err(|e| PipelineError::AwsSdk(e.to_string()))?;

        if !confirmed {
            return Err(PipelineError::UserCancelled);
        }
    }

    if !global.is_silent() {
        aprintln!("{}", p_b("Provisioning..."));
    }

    let clients = client::create_clients(&aws_config).await;
    let mut context = deploy::DeployContext::default();
    let mut report = planning::DeployReport::default();

    for step in steps {
        if global.is_verbose() {
            aprintln!("  {}", planning::describe_step(&step, &config));
        }

        let status = deploy::run_step(&clients, &config, &step, &mut context, global).await;

        if !global.is_silent() {
            let line = planning::format_step_status(&step, &status, &config);
            match status {
                StepStatus::Done(_) => aprintln!("  {}", p_g(&line)),
                StepStatus::Existing(_) => aprintln!("  {}", line),
                StepStatus::Failed(_) => aprintln!("  {}", p_r(&line)),
                StepStatus::Skipped(_) => aprintln!("  {}", p_y(&line)),
            }
        }

        report.record(step, status);
    }

    if !global.is_silent() {
        aprintln!();
        let summary = planning::format_summary(&report);
        if report.is_success() {
            aprintln!("{} {}", p_g("Pipeline deployed:"), summary);
        } else {
            aprintln!("{} {}", p_r("Pipeline incomplete:"), summary);
        }
    }

    if !report.is_success() {
        return Err(PipelineError::DeployIncomplete(report.failed()));
    }

    Ok(())
}

async fn run_upload(cmd: UploadCommand, global: &crate::Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!("{} {}", p_b("Bucket:"), cmd.bucket);
        aprintln!("{} {}", p_b("Audio:"), cmd.audio_dir.display());
        aprintln!();
    }

    let clients = client::create_clients(&aws_config).await;
    let uploaded = upload::upload_audio(
        &clients.s3,
        &cmd.bucket,
        &cmd.audio_dir,
        Duration::from_secs(cmd.upload_delay_secs),
        global,
    )
    .await?;

    if !global.is_silent() {
        aprintln!("{} {} file(s) uploaded.", p_g("Success:"), uploaded);
    }

    Ok(())
}

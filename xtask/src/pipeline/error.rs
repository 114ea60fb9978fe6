//! Error types for pipeline provisioning.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for the pipeline module.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while provisioning or feeding the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("{0} is not available because an earlier step failed")]
    MissingPrerequisite(&'static str),

    #[error("Invalid CloudFormation template '{path}': {reason}")]
    InvalidTemplate { path: PathBuf, reason: String },

    #[error("Could not create queue ({create}) or look it up ({lookup})")]
    QueueUnavailable { create: String, lookup: String },

    #[error("Role '{role}' was not readable after {attempts} attempts")]
    RoleNotReady { role: String, attempts: u32 },

    #[error("Audio directory '{0}' does not exist")]
    AudioDirMissing(PathBuf),

    #[error("{failed} of {total} uploads failed")]
    UploadIncomplete { failed: usize, total: usize },

    #[error("{0} deployment step(s) failed")]
    DeployIncomplete(usize),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

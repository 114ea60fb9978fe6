//! Pure functions for building and reporting the deployment plan (Functional Core).

use super::config::{
    PipelineConfig, EVENT_BATCH_SIZE, FUNCTION_RUNTIME, FUNCTION_TIMEOUT_SECONDS,
    MANAGED_POLICY_ARNS, NOTIFICATION_ID, OBJECT_CREATED_EVENT, QUEUE_DELAY_SECONDS,
};

/// One provisioning step, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    CreateBucket,
    CreateQueue,
    CreateDatabaseStack,
    ResolveQueueArn,
    CreateRole,
    AttachPolicy(String),
    WaitForRole,
    CreateFunction,
    CreateEventSourceMapping,
    SetQueuePolicy,
    ConfigureBucketNotifications,
    UploadAudio,
}

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// The step did its work.
    Done(String),
    /// The resource was already in place.
    Existing(String),
    /// The step returned an error.
    Failed(String),
    /// An input the step needs was never produced.
    Skipped(String),
}

/// Step outcomes collected over one deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    pub entries: Vec<(Step, StepStatus)>,
}

impl DeployReport {
    pub fn record(&mut self, step: Step, status: StepStatus) {
        self.entries.push((step, status));
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, StepStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, StepStatus::Skipped(_)))
    }

    pub fn succeeded(&self) -> usize {
        self.count(|status| matches!(status, StepStatus::Done(_) | StepStatus::Existing(_)))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, predicate: impl Fn(&StepStatus) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|(_, status)| predicate(status))
            .count()
    }
}

/// Pure function: List the steps to run for the given configuration.
pub fn deployment_plan(config: &PipelineConfig) -> Vec<Step> {
    let mut steps = vec![
        Step::CreateBucket,
        Step::CreateQueue,
        Step::CreateDatabaseStack,
        Step::ResolveQueueArn,
        Step::CreateRole,
    ];
    steps.extend(
        MANAGED_POLICY_ARNS
            .iter()
            .map(|arn| Step::AttachPolicy((*arn).to_string())),
    );
    steps.extend([
        Step::WaitForRole,
        Step::CreateFunction,
        Step::CreateEventSourceMapping,
        Step::SetQueuePolicy,
        Step::ConfigureBucketNotifications,
    ]);
    if !config.skip_upload {
        steps.push(Step::UploadAudio);
    }
    steps
}

/// Pure function: Short label for a step.
pub fn describe_step(step: &Step, config: &PipelineConfig) -> String {
    match step {
        Step::CreateBucket => format!("Create bucket: {}", config.bucket),
        Step::CreateQueue => format!("Create queue: {}", config.queue),
        Step::CreateDatabaseStack => format!("Create stack: {}", config.stack),
        Step::ResolveQueueArn => format!("Resolve queue ARN: {}", config.queue),
        Step::CreateRole => format!("Create role: {}", config.role),
        Step::AttachPolicy(arn) => format!("Attach policy: {}", policy_name(arn)),
        Step::WaitForRole => format!("Wait for role: {}", config.role),
        Step::CreateFunction => format!("Create function: {}", config.function),
        Step::CreateEventSourceMapping => {
            format!("Map queue to function: {} -> {}", config.queue, config.function)
        }
        Step::SetQueuePolicy => format!("Set queue policy: {}", config.queue),
        Step::ConfigureBucketNotifications => {
            format!("Configure notifications: {} -> {}", config.bucket, config.queue)
        }
        Step::UploadAudio => format!("Upload audio from: {}", config.audio_dir.display()),
    }
}

/// Pure function: Format the deployment plan for display.
pub fn format_deploy_plan(steps: &[Step], config: &PipelineConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for step in steps {
        lines.push(format!("+ {}", describe_step(step, config)));
        lines.extend(step_details(step, config).into_iter().map(|d| format!("  {d}")));
    }
    if config.skip_upload {
        lines.push("= Audio upload skipped".to_string());
    }
    lines
}

fn step_details(step: &Step, config: &PipelineConfig) -> Vec<String> {
    match step {
        Step::CreateBucket if config.needs_location_constraint() => {
            vec![format!("Location: {}", config.region)]
        }
        Step::CreateQueue => vec![format!("Delivery delay: {QUEUE_DELAY_SECONDS}s")],
        Step::CreateDatabaseStack => vec![
            format!("Template: {}", config.template.display()),
            format!("Table: {}", config.table),
        ],
        Step::CreateFunction => {
            let mut details = vec![
                format!("Runtime: {FUNCTION_RUNTIME}"),
                format!("Architecture: {}", config.architecture.as_str()),
                format!("Timeout: {FUNCTION_TIMEOUT_SECONDS}s"),
                format!("Artifact: {}", config.artifact.display()),
            ];
            if config.alert_phone_number.is_some() {
                details.push("Alerts: enabled".to_string());
            }
            details
        }
        Step::CreateEventSourceMapping => vec![format!("Batch size: {EVENT_BATCH_SIZE}")],
        Step::ConfigureBucketNotifications => {
            vec![format!("{OBJECT_CREATED_EVENT} ({NOTIFICATION_ID})")]
        }
        Step::UploadAudio => vec![format!("Delay: {}s", config.upload_delay.as_secs())],
        _ => Vec::new(),
    }
}

/// Pure function: Format one step outcome for display.
pub fn format_step_status(step: &Step, status: &StepStatus, config: &PipelineConfig) -> String {
    let label = describe_step(step, config);
    match status {
        StepStatus::Done(detail) => format!("✓ {label} ({detail})"),
        StepStatus::Existing(detail) => format!("= {label} ({detail})"),
        StepStatus::Failed(reason) => format!("✗ {label}: {reason}"),
        StepStatus::Skipped(reason) => format!("- {label} skipped: {reason}"),
    }
}

/// Pure function: Summarize a finished deployment.
pub fn format_summary(report: &DeployReport) -> String {
    format!(
        "{} succeeded, {} failed, {} skipped",
        report.succeeded(),
        report.failed(),
        report.skipped()
    )
}

fn policy_name(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::config::test_config;

    #[test]
    fn test_plan_order() {
        let steps = deployment_plan(&test_config());

        assert_eq!(steps.len(), 11 + MANAGED_POLICY_ARNS.len());
        assert_eq!(steps.first(), Some(&Step::CreateBucket));
        assert_eq!(steps.last(), Some(&Step::UploadAudio));
        assert_eq!(steps[4], Step::CreateRole);
        assert_eq!(steps[5], Step::AttachPolicy(MANAGED_POLICY_ARNS[0].to_string()));
    }

    #[test]
    fn test_plan_without_upload() {
        let mut config = test_config();
        config.skip_upload = true;

        let steps = deployment_plan(&config);

        assert!(!steps.contains(&Step::UploadAudio));
        assert_eq!(steps.last(), Some(&Step::ConfigureBucketNotifications));
    }

    #[test]
    fn test_role_is_ready_before_function() {
        let steps = deployment_plan(&test_config());
        let position = |target: &Step| steps.iter().position(|s| s == target);

        assert!(position(&Step::WaitForRole) < position(&Step::CreateFunction));
        assert!(position(&Step::ResolveQueueArn) < position(&Step::SetQueuePolicy));
    }

    #[test]
    fn test_format_plan() {
        let config = test_config();
        let lines = format_deploy_plan(&deployment_plan(&config), &config);

        assert_eq!(lines[0], "+ Create bucket: tonewatch-audio");
        assert_eq!(lines[1], "  Location: eu-west-2");
        assert!(lines.contains(&"  Delivery delay: 10s".to_string()));
        assert!(lines.contains(&"+ Attach policy: ComprehendFullAccess".to_string()));
        assert!(lines.contains(&"  Runtime: provided.al2023".to_string()));
        assert!(lines.contains(&"  Architecture: x86_64".to_string()));
        assert!(!lines.contains(&"  Alerts: enabled".to_string()));
    }

    #[test]
    fn test_format_plan_us_east_1_has_no_location() {
        let mut config = test_config();
        config.region = "us-east-1".to_string();
        config.skip_upload = true;

        let lines = format_deploy_plan(&deployment_plan(&config), &config);

        assert_eq!(lines[1], "+ Create queue: tonewatch-queue");
        assert_eq!(lines.last().map(String::as_str), Some("= Audio upload skipped"));
    }

    #[test]
    fn test_format_step_status() {
        let config = test_config();

        assert_eq!(
            format_step_status(
                &Step::CreateBucket,
                &StepStatus::Failed("access denied".to_string()),
                &config
            ),
            "✗ Create bucket: tonewatch-audio: access denied"
        );
        assert_eq!(
            format_step_status(
                &Step::SetQueuePolicy,
                &StepStatus::Skipped("Queue ARN is not available".to_string()),
                &config
            ),
            "- Set queue policy: tonewatch-queue skipped: Queue ARN is not available"
        );
    }

    #[test]
    fn test_report_summary() {
        let mut report = DeployReport::default();
        report.record(Step::CreateBucket, StepStatus::Done("created".to_string()));
        report.record(Step::CreateQueue, StepStatus::Existing("exists".to_string()));
        report.record(Step::ResolveQueueArn, StepStatus::Failed("boom".to_string()));
        report.record(Step::SetQueuePolicy, StepStatus::Skipped("no ARN".to_string()));

        assert!(!report.is_success());
        assert_eq!(format_summary(&report), "2 succeeded, 1 failed, 1 skipped");
    }

    #[test]
    fn test_empty_report_is_success() {
        assert!(DeployReport::default().is_success());
    }
}

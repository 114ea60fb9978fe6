//! Step execution against AWS (Imperative Shell).

use std::collections::HashMap;

use aws_sdk_cloudformation::types::Parameter;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{Architecture, Environment, FunctionCode, Runtime};
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Event, NotificationConfiguration,
    QueueConfiguration,
};
use aws_sdk_sqs::types::QueueAttributeName;
use tonewatch_core::resources::{ALERT_PHONE_NUMBER_ENV, TABLE_NAME_ENV};

use super::client::AwsClients;
use super::config::{
    FunctionArchitecture, PipelineConfig, EVENT_BATCH_SIZE, FUNCTION_CREATE_ATTEMPTS,
    FUNCTION_HANDLER, FUNCTION_RUNTIME, FUNCTION_TIMEOUT_SECONDS, NOTIFICATION_ID,
    OBJECT_CREATED_EVENT, QUEUE_DELAY_SECONDS, ROLE_WAIT_ATTEMPTS, ROLE_WAIT_INITIAL,
    ROLE_WAIT_INTERVAL,
};
use super::error::{PipelineError, Result};
use super::planning::{Step, StepStatus};
use super::policies;
use super::upload;

/// Values produced by earlier steps and consumed by later ones.
#[derive(Debug, Clone, Default)]
pub struct DeployContext {
    pub queue_url: Option<String>,
    pub queue_arn: Option<String>,
    pub role_arn: Option<String>,
    pub function_ready: bool,
}

impl DeployContext {
    fn queue_url(&self) -> Result<&str> {
        self.queue_url
            .as_deref()
            .ok_or(PipelineError::MissingPrerequisite("Queue URL"))
    }

    fn queue_arn(&self) -> Result<&str> {
        self.queue_arn
            .as_deref()
            .ok_or(PipelineError::MissingPrerequisite("Queue ARN"))
    }

    fn role_arn(&self) -> Result<&str> {
        self.role_arn
            .as_deref()
            .ok_or(PipelineError::MissingPrerequisite("Role ARN"))
    }
}

/// Run one step and turn its result into a reportable status.
pub async fn run_step(
    clients: &AwsClients,
    config: &PipelineConfig,
    step: &Step,
    context: &mut DeployContext,
    global: &crate::Global,
) -> StepStatus {
    settle(execute_step(clients, config, step, context, global).await)
}

/// Pure function: Map a step result to its status.
pub fn settle(result: Result<StepStatus>) -> StepStatus {
    match result {
        Ok(status) => status,
        Err(err @ PipelineError::MissingPrerequisite(_)) => StepStatus::Skipped(err.to_string()),
        Err(err) => StepStatus::Failed(err.to_string()),
    }
}

async fn execute_step(
    clients: &AwsClients,
    config: &PipelineConfig,
    step: &Step,
    context: &mut DeployContext,
    global: &crate::Global,
) -> Result<StepStatus> {
    match step {
        Step::CreateBucket => create_bucket(clients, config).await,
        Step::CreateQueue => {
            let (status, url) = create_queue(clients, config).await?;
            context.queue_url = Some(url);
            Ok(status)
        }
        Step::CreateDatabaseStack => create_database_stack(clients, config).await,
        Step::ResolveQueueArn => {
            let arn = resolve_queue_arn(clients, context.queue_url()?).await?;
            context.queue_arn = Some(arn.clone());
            Ok(StepStatus::Done(arn))
        }
        Step::CreateRole => {
            let (status, arn) = create_role(clients, config).await?;
            context.role_arn = Some(arn);
            Ok(status)
        }
        Step::AttachPolicy(policy_arn) => {
            context.role_arn()?;
            attach_policy(clients, config, policy_arn).await
        }
        Step::WaitForRole => {
            context.role_arn()?;
            wait_for_role(clients, &config.role).await
        }
        Step::CreateFunction => {
            let status = create_function(clients, config, context.role_arn()?).await?;
            context.function_ready = true;
            Ok(status)
        }
        Step::CreateEventSourceMapping => {
            if !context.function_ready {
                return Err(PipelineError::MissingPrerequisite("Lambda function"));
            }
            create_event_source_mapping(clients, config, context.queue_arn()?).await
        }
        Step::SetQueuePolicy => {
            set_queue_policy(clients, config, context.queue_url()?, context.queue_arn()?).await
        }
        Step::ConfigureBucketNotifications => {
            configure_notifications(clients, config, context.queue_arn()?).await
        }
        Step::UploadAudio => {
            let uploaded = upload::upload_audio(
                &clients.s3,
                &config.bucket,
                &config.audio_dir,
                config.upload_delay,
                global,
            )
            .await?;
            Ok(StepStatus::Done(format!("{uploaded} file(s) uploaded")))
        }
    }
}

async fn create_bucket(clients: &AwsClients, config: &PipelineConfig) -> Result<StepStatus> {
    let mut request = clients.s3.create_bucket().bucket(&config.bucket);

    if config.needs_location_constraint() {
        request = request.create_bucket_configuration(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(config.region.as_str()))
                .build(),
        );
    }

    match request.send().await {
        Ok(_) => Ok(StepStatus::Done("created".to_string())),
        Err(err)
            if err
                .as_service_error()
                .is_some_and(|e| e.is_bucket_already_owned_by_you()) =>
        {
            Ok(StepStatus::Existing("already owned".to_string()))
        }
        Err(err) => Err(sdk_error(err)),
    }
}

async fn create_queue(
    clients: &AwsClients,
    config: &PipelineConfig,
) -> Result<(StepStatus, String)> {
    let created = clients
        .sqs
        .create_queue()
        .queue_name(&config.queue)
        .attributes(
            QueueAttributeName::DelaySeconds,
            QUEUE_DELAY_SECONDS.to_string(),
        )
        .send()
        .await;

    let create_error = match created {
        Ok(output) => match output.queue_url() {
            Some(url) => return Ok((StepStatus::Done(url.to_string()), url.to_string())),
            None => "CreateQueue returned no URL".to_string(),
        },
        Err(err) => sdk_error(err).to_string(),
    };

    // Creation fails for an existing queue with different attributes; reuse it.
    let lookup = clients
        .sqs
        .get_queue_url()
        .queue_name(&config.queue)
        .send()
        .await
        .map_err(sdk_error)
        .and_then(|output| {
            output
                .queue_url()
                .map(str::to_string)
                .ok_or_else(|| PipelineError::AwsSdk("GetQueueUrl returned no URL".to_string()))
        });

    let url = lookup.map_err(|lookup_error| queue_unavailable(create_error, lookup_error))?;

    Ok((StepStatus::Existing(url.clone()), url))
}

/// Pure function: Report both causes when the queue can be neither created nor found.
pub fn queue_unavailable(create_error: String, lookup_error: PipelineError) -> PipelineError {
    PipelineError::QueueUnavailable {
        create: create_error,
        lookup: lookup_error.to_string(),
    }
}

async fn create_database_stack(
    clients: &AwsClients,
    config: &PipelineConfig,
) -> Result<StepStatus> {
    let body = tokio::fs::read_to_string(&config.template).await?;
    let template: serde_json::Value =
        serde_json::from_str(&body).map_err(|e| PipelineError::InvalidTemplate {
            path: config.template.clone(),
            reason: e.to_string(),
        })?;

    if !policies::template_accepts_table_name(&template) {
        return Err(PipelineError::InvalidTemplate {
            path: config.template.clone(),
            reason: "missing TableName parameter".to_string(),
        });
    }

    let result = clients
        .cloudformation
        .create_stack()
        .stack_name(&config.stack)
        .template_body(body)
        .parameters(
            Parameter::builder()
                .parameter_key("TableName")
                .parameter_value(&config.table)
                .build(),
        )
        .send()
        .await;

    match result {
        Ok(output) => Ok(StepStatus::Done(
            output.stack_id().unwrap_or(config.stack.as_str()).to_string(),
        )),
        Err(err)
            if err
                .as_service_error()
                .is_some_and(|e| e.is_already_exists_exception()) =>
        {
            Ok(StepStatus::Existing("stack already exists".to_string()))
        }
        Err(err) => Err(sdk_error(err)),
    }
}

async fn resolve_queue_arn(clients: &AwsClients, queue_url: &str) -> Result<String> {
    let output = clients
        .sqs
        .get_queue_attributes()
        .queue_url(queue_url)
        .attribute_names(QueueAttributeName::QueueArn)
        .send()
        .await
        .map_err(sdk_error)?;

    output
        .attributes()
        .and_then(|attributes| attributes.get(&QueueAttributeName::QueueArn))
        .cloned()
        .ok_or_else(|| PipelineError::AwsSdk("QueueArn attribute missing".to_string()))
}

async fn create_role(
    clients: &AwsClients,
    config: &PipelineConfig,
) -> Result<(StepStatus, String)> {
    let result = clients
        .iam
        .create_role()
        .role_name(&config.role)
        .assume_role_policy_document(policies::lambda_trust_policy().to_string())
        .send()
        .await;

    match result {
        Ok(output) => {
            let arn = output
                .role()
                .map(|role| role.arn().to_string())
                .ok_or_else(|| PipelineError::AwsSdk("CreateRole returned no role".to_string()))?;
            Ok((StepStatus::Done(arn.clone()), arn))
        }
        Err(err)
            if err
                .as_service_error()
                .is_some_and(|e| e.is_entity_already_exists_exception()) =>
        {
            let arn = get_role_arn(clients, &config.role).await?;
            Ok((StepStatus::Existing(arn.clone()), arn))
        }
        Err(err) => Err(sdk_error(err)),
    }
}

async fn get_role_arn(clients: &AwsClients, role: &str) -> Result<String> {
    clients
        .iam
        .get_role()
        .role_name(role)
        .send()
        .await
        .map_err(sdk_error)?
        .role()
        .map(|role| role.arn().to_string())
        .ok_or_else(|| PipelineError::AwsSdk("GetRole returned no role".to_string()))
}

async fn attach_policy(
    clients: &AwsClients,
    config: &PipelineConfig,
    policy_arn: &str,
) -> Result<StepStatus> {
    clients
        .iam
        .attach_role_policy()
        .role_name(&config.role)
        .policy_arn(policy_arn)
        .send()
        .await
        .map_err(sdk_error)?;

    Ok(StepStatus::Done("attached".to_string()))
}

async fn wait_for_role(clients: &AwsClients, role: &str) -> Result<StepStatus> {
    tokio::time::sleep(ROLE_WAIT_INITIAL).await;

    for attempt in 1..=ROLE_WAIT_ATTEMPTS {
        if get_role_arn(clients, role).await.is_ok() {
            return Ok(StepStatus::Done(format!("ready after {attempt} check(s)")));
        }
        tokio::time::sleep(ROLE_WAIT_INTERVAL).await;
    }

    Err(PipelineError::RoleNotReady {
        role: role.to_string(),
        attempts: ROLE_WAIT_ATTEMPTS,
    })
}

/// Pure function: Environment variables handed to the function.
pub fn function_environment(config: &PipelineConfig) -> HashMap<String, String> {
    let mut variables = HashMap::from([(TABLE_NAME_ENV.to_string(), config.table.clone())]);
    if let Some(phone) = &config.alert_phone_number {
        variables.insert(ALERT_PHONE_NUMBER_ENV.to_string(), phone.clone());
    }
    variables
}

async fn create_function(
    clients: &AwsClients,
    config: &PipelineConfig,
    role_arn: &str,
) -> Result<StepStatus> {
    let archive = tokio::fs::read(&config.artifact).await?;
    let environment = Environment::builder()
        .set_variables(Some(function_environment(config)))
        .build();

    let mut attempt = 1;
    loop {
        let result = clients
            .lambda
            .create_function()
            .function_name(&config.function)
            .runtime(Runtime::from(FUNCTION_RUNTIME))
            .architectures(lambda_architecture(config.architecture))
            .role(role_arn)
            .handler(FUNCTION_HANDLER)
            .timeout(FUNCTION_TIMEOUT_SECONDS)
            .code(
                FunctionCode::builder()
                    .zip_file(Blob::new(archive.clone()))
                    .build(),
            )
            .environment(environment.clone())
            .send()
            .await;

        match result {
            Ok(output) => {
                return Ok(StepStatus::Done(
                    output.function_arn().unwrap_or(config.function.as_str()).to_string(),
                ));
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_conflict_exception()) =>
            {
                return Ok(StepStatus::Existing("function already exists".to_string()));
            }
            // A new role is not assumable by Lambda until IAM has propagated it.
            Err(err)
                if attempt < FUNCTION_CREATE_ATTEMPTS
                    && err
                        .as_service_error()
                        .is_some_and(|e| e.is_invalid_parameter_value_exception()) =>
            {
                attempt += 1;
                tokio::time::sleep(ROLE_WAIT_INTERVAL).await;
            }
            Err(err) => return Err(sdk_error(err)),
        }
    }
}

fn lambda_architecture(architecture: FunctionArchitecture) -> Architecture {
    match architecture {
        FunctionArchitecture::X8664 => Architecture::X8664,
        FunctionArchitecture::Arm64 => Architecture::Arm64,
    }
}

async fn create_event_source_mapping(
    clients: &AwsClients,
    config: &PipelineConfig,
    queue_arn: &str,
) -> Result<StepStatus> {
    let result = clients
        .lambda
        .create_event_source_mapping()
        .event_source_arn(queue_arn)
        .function_name(&config.function)
        .enabled(true)
        .batch_size(EVENT_BATCH_SIZE)
        .send()
        .await;

    match result {
        Ok(output) => Ok(StepStatus::Done(
            output.uuid().unwrap_or("mapping created").to_string(),
        )),
        Err(err)
            if err
                .as_service_error()
                .is_some_and(|e| e.is_resource_conflict_exception()) =>
        {
            Ok(StepStatus::Existing("mapping already exists".to_string()))
        }
        Err(err) => Err(sdk_error(err)),
    }
}

async fn set_queue_policy(
    clients: &AwsClients,
    config: &PipelineConfig,
    queue_url: &str,
    queue_arn: &str,
) -> Result<StepStatus> {
    clients
        .sqs
        .set_queue_attributes()
        .queue_url(queue_url)
        .attributes(
            QueueAttributeName::Policy,
            policies::queue_policy(queue_arn, &config.bucket).to_string(),
        )
        .send()
        .await
        .map_err(sdk_error)?;

    Ok(StepStatus::Done("policy set".to_string()))
}

async fn configure_notifications(
    clients: &AwsClients,
    config: &PipelineConfig,
    queue_arn: &str,
) -> Result<StepStatus> {
    let queue_configuration = QueueConfiguration::builder()
        .id(NOTIFICATION_ID)
        .queue_arn(queue_arn)
        .events(Event::from(OBJECT_CREATED_EVENT))
        .build()
        .map_err(|e| PipelineError::AwsSdk(e.to_string()))?;

    clients
        .s3
        .put_bucket_notification_configuration()
        .bucket(&config.bucket)
        .notification_configuration(
            NotificationConfiguration::builder()
                .queue_configurations(queue_configuration)
                .build(),
        )
        .send()
        .await
        .map_err(sdk_error)?;

    Ok(StepStatus::Done(format!("{OBJECT_CREATED_EVENT} -> queue")))
}

pub(crate) fn sdk_error<E>(err: E) -> PipelineError
where
    E: std::error::Error,
{
    PipelineError::AwsSdk(aws_sdk_s3::error::DisplayErrorContext(err).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::config::test_config;

    #[test]
    fn test_missing_prerequisite_is_skipped() {
        let status = settle(Err(PipelineError::MissingPrerequisite("Queue ARN")));
        assert_eq!(
            status,
            StepStatus::Skipped(
                "Queue ARN is not available because an earlier step failed".to_string()
            )
        );
    }

    #[test]
    fn test_other_errors_fail() {
        let status = settle(Err(PipelineError::AwsSdk("AccessDenied".to_string())));
        assert_eq!(status, StepStatus::Failed("AWS SDK error: AccessDenied".to_string()));
    }

    #[test]
    fn test_success_passes_through() {
        let status = settle(Ok(StepStatus::Existing("already owned".to_string())));
        assert_eq!(status, StepStatus::Existing("already owned".to_string()));
    }

    #[test]
    fn test_queue_failure_keeps_create_error() {
        let error = queue_unavailable(
            "AWS SDK error: AccessDenied: not authorized to perform sqs:createqueue".to_string(),
            PipelineError::AwsSdk("QueueDoesNotExist".to_string()),
        );

        let message = error.to_string();
        assert!(message.contains("sqs:createqueue"));
        assert!(message.contains("QueueDoesNotExist"));
        assert!(matches!(
            settle(Err(error)),
            StepStatus::Failed(reason) if reason.contains("AccessDenied")
        ));
    }

    #[test]
    fn test_context_reports_missing_values() {
        let context = DeployContext::default();

        assert!(matches!(
            context.queue_url(),
            Err(PipelineError::MissingPrerequisite("Queue URL"))
        ));
        assert!(matches!(
            context.role_arn(),
            Err(PipelineError::MissingPrerequisite("Role ARN"))
        ));
    }

    #[test]
    fn test_architecture_mapping() {
        assert_eq!(
            lambda_architecture(FunctionArchitecture::X8664),
            Architecture::X8664
        );
        assert_eq!(
            lambda_architecture(FunctionArchitecture::Arm64),
            Architecture::Arm64
        );
    }

    #[test]
    fn test_function_environment() {
        let mut config = test_config();
        let without_alerts = function_environment(&config);
        assert_eq!(without_alerts.len(), 1);
        assert_eq!(
            without_alerts.get("TABLE_NAME").map(String::as_str),
            Some("tonewatch-sentiment")
        );

        config.alert_phone_number = Some("+447700900123".to_string());
        let with_alerts = function_environment(&config);
        assert_eq!(
            with_alerts.get("ALERT_PHONE_NUMBER").map(String::as_str),
            Some("+447700900123")
        );
    }
}

//! AWS SDK client setup (Imperative Shell).

use aws_config::{BehaviorVersion, Region};

/// AWS client configuration.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// Custom endpoint URL (for LocalStack and similar emulators).
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok(),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-2".to_string()),
        }
    }
}

impl AwsConfig {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local AWS emulator ({})", url),
            None => format!("AWS (region: {})", self.region),
        }
    }
}

/// Service clients used by the provisioner, sharing one SDK configuration.
#[derive(Debug, Clone)]
pub struct AwsClients {
    pub s3: aws_sdk_s3::Client,
    pub sqs: aws_sdk_sqs::Client,
    pub iam: aws_sdk_iam::Client,
    pub lambda: aws_sdk_lambda::Client,
    pub cloudformation: aws_sdk_cloudformation::Client,
}

/// Creates all service clients with the given configuration.
pub async fn create_clients(config: &AwsConfig) -> AwsClients {
    let mut sdk_config_loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    let sdk_config = sdk_config_loader.load().await;

    // Emulators serve buckets from the endpoint path, not a virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.endpoint_url.is_some())
        .build();

    AwsClients {
        s3: aws_sdk_s3::Client::from_conf(s3_config),
        sqs: aws_sdk_sqs::Client::new(&sdk_config),
        iam: aws_sdk_iam::Client::new(&sdk_config),
        lambda: aws_sdk_lambda::Client::new(&sdk_config),
        cloudformation: aws_sdk_cloudformation::Client::new(&sdk_config),
    }
}

use crate::config::AwsConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::time::Duration;

/// Loads the shared SDK configuration used by the SNS and DynamoDB clients.
///
/// Credentials come from the default provider chain.
pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    let timeouts =
        TimeoutConfig::builder().operation_timeout(Duration::from_millis(config.operation_timeout_ms)).build();

    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone())).timeout_config(timeouts);

    if let Some(endpoint) = &config.endpoint {
        tracing::info!(endpoint = %endpoint, "Using custom AWS endpoint");
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

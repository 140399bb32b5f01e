use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;

/// Shared SDK configuration for Secrets Manager and S3 clients: pinned
/// region, bounded connect timeout and no automatic retries.
pub async fn load_sdk_config(region: &str, connect_timeout: Duration) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .timeout_config(
            TimeoutConfig::builder()
                .connect_timeout(connect_timeout)
                .build(),
        )
        .retry_config(RetryConfig::disabled())
        .load()
        .await
}

//! Shared fixtures for API and resource tests

use super::client::{Client, RetryConfig};
use super::signing::Credentials;

/// Client pointed at a local mock server, with fast retry timings so
/// failure-path tests don't sleep.
pub fn test_client(server_url: &str) -> Client {
    Client::with_config(
        "us-east-1",
        Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
        Some(server_url),
        RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            timeout_seconds: 5,
        },
    )
    .expect("test client")
}

/// An ACTIVE pool as DescribePools returns it
pub const POOL_BODY: &str = r#"{
    "PoolArn": "arn:aws:sms-voice:us-east-1:123456789012:pool/pool-123",
    "PoolId": "pool-123",
    "Status": "ACTIVE",
    "MessageType": "TRANSACTIONAL",
    "TwoWayEnabled": false,
    "SelfManagedOptOutsEnabled": false,
    "OptOutListName": "Default",
    "SharedRoutesEnabled": false,
    "DeletionProtectionEnabled": false,
    "CreatedTimestamp": 1700000000.0
}"#;

/// A pool still coming up
pub const CREATING_POOL_BODY: &str = r#"{
    "PoolArn": "arn:aws:sms-voice:us-east-1:123456789012:pool/pool-123",
    "PoolId": "pool-123",
    "Status": "CREATING",
    "MessageType": "TRANSACTIONAL",
    "TwoWayEnabled": false,
    "SelfManagedOptOutsEnabled": false,
    "OptOutListName": "Default",
    "SharedRoutesEnabled": false,
    "DeletionProtectionEnabled": false
}"#;

/// A protect configuration as DescribeProtectConfigurations returns it
pub const PROTECT_CONFIGURATION_BODY: &str = r#"{
    "ProtectConfigurationArn": "arn:aws:sms-voice:us-east-1:123456789012:protect-configuration/pc-123",
    "ProtectConfigurationId": "pc-123",
    "AccountDefault": false,
    "DeletionProtectionEnabled": false,
    "CreatedTimestamp": 1700000000.0
}"#;

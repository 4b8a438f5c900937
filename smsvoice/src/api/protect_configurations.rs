//! Protect configuration operations
//!
//! A protect configuration is an account- or resource-level policy object
//! governing message-sending protections. Creation is synchronous; there
//! is no status to poll.

use serde::{Deserialize, Serialize};

use super::common::Tag;
use super::error::ApiError;
use super::Client;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateProtectConfigurationRequest {
    pub client_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_protection_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProtectConfigurationInformation {
    pub protect_configuration_arn: String,
    pub protect_configuration_id: String,
    #[serde(default)]
    pub account_default: bool,
    #[serde(default)]
    pub deletion_protection_enabled: bool,
    #[serde(default)]
    pub created_timestamp: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeProtectConfigurationsRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub protect_configuration_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeProtectConfigurationsResponse {
    #[serde(default)]
    pub protect_configurations: Vec<ProtectConfigurationInformation>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateProtectConfigurationRequest {
    pub protect_configuration_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_protection_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteProtectConfigurationRequest {
    pub protect_configuration_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetAccountDefaultProtectConfigurationRequest {
    pub protect_configuration_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetAccountDefaultProtectConfigurationResponse {
    #[serde(default)]
    pub default_protect_configuration_id: Option<String>,
}

impl Client {
    /// CreateProtectConfiguration
    pub async fn create_protect_configuration(
        &self,
        request: &CreateProtectConfigurationRequest,
    ) -> Result<ProtectConfigurationInformation, ApiError> {
        self.post("CreateProtectConfiguration", request).await
    }

    /// DescribeProtectConfigurations - one page
    pub async fn describe_protect_configurations(
        &self,
        request: &DescribeProtectConfigurationsRequest,
    ) -> Result<DescribeProtectConfigurationsResponse, ApiError> {
        self.post("DescribeProtectConfigurations", request).await
    }

    /// UpdateProtectConfiguration
    pub async fn update_protect_configuration(
        &self,
        request: &UpdateProtectConfigurationRequest,
    ) -> Result<ProtectConfigurationInformation, ApiError> {
        self.post("UpdateProtectConfiguration", request).await
    }

    /// DeleteProtectConfiguration
    pub async fn delete_protect_configuration(
        &self,
        id: &str,
    ) -> Result<ProtectConfigurationInformation, ApiError> {
        self.post(
            "DeleteProtectConfiguration",
            &DeleteProtectConfigurationRequest {
                protect_configuration_id: id.to_string(),
            },
        )
        .await
    }

    /// SetAccountDefaultProtectConfiguration
    pub async fn set_account_default_protect_configuration(
        &self,
        id: &str,
    ) -> Result<SetAccountDefaultProtectConfigurationResponse, ApiError> {
        self.post(
            "SetAccountDefaultProtectConfiguration",
            &SetAccountDefaultProtectConfigurationRequest {
                protect_configuration_id: id.to_string(),
            },
        )
        .await
    }

    /// Find a single protect configuration by id, draining pagination
    pub async fn find_protect_configuration_by_id(
        &self,
        id: &str,
    ) -> Result<ProtectConfigurationInformation, ApiError> {
        let mut next_token = None;

        loop {
            let page = self
                .describe_protect_configurations(&DescribeProtectConfigurationsRequest {
                    protect_configuration_ids: vec![id.to_string()],
                    next_token: next_token.take(),
                    max_results: None,
                })
                .await?;

            if let Some(configuration) = page
                .protect_configurations
                .into_iter()
                .find(|c| c.protect_configuration_id == id)
            {
                return Ok(configuration);
            }

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Err(ApiError::NotFound(format!(
            "protect configuration {} not found",
            id
        )))
    }
}

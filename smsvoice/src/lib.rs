//! Terraform provider for AWS End User Messaging SMS and Voice
//!
//! Two managed resources: `smsvoice_phone_pool` and
//! `smsvoice_protect_configuration`. The provider owns the signed API
//! client and hands it to resources as provider data.

pub mod api;
pub mod poll;
pub mod provider_data;
pub mod resources;

pub use provider_data::SmsVoiceProviderData;

use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tfplug::context::Context;
use tfplug::provider::{ConfigureProviderRequest, ConfigureProviderResponse, Provider};
use tfplug::resource::ResourceWithConfigure;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic};
use tfplug::{Result, TfplugError};

use api::{Client, Credentials};

pub struct SmsVoiceProvider {
    provider_data: Option<SmsVoiceProviderData>,
}

impl Default for SmsVoiceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SmsVoiceProvider {
    pub fn new() -> Self {
        Self {
            provider_data: None,
        }
    }
}

fn config_or_env(
    request: &ConfigureProviderRequest,
    attribute: &str,
    env_vars: &[&str],
) -> Option<String> {
    request
        .config
        .get_string(&AttributePath::new(attribute))
        .ok()
        .or_else(|| {
            env_vars
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        })
}

#[async_trait]
impl Provider for SmsVoiceProvider {
    fn type_name(&self) -> &str {
        "smsvoice"
    }

    async fn schema(&self, _ctx: Context) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("AWS End User Messaging SMS and Voice provider")
            .attribute(
                AttributeBuilder::new("region", AttributeType::String)
                    .description("AWS region (falls back to AWS_REGION / AWS_DEFAULT_REGION)")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("access_key", AttributeType::String)
                    .description("AWS access key id (falls back to AWS_ACCESS_KEY_ID)")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("secret_key", AttributeType::String)
                    .description("AWS secret access key (falls back to AWS_SECRET_ACCESS_KEY)")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("endpoint", AttributeType::String)
                    .description("Service endpoint override (falls back to AWS_ENDPOINT_URL)")
                    .optional()
                    .build(),
            )
            .build()
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let mut diagnostics = vec![];

        let region = config_or_env(&request, "region", &["AWS_REGION", "AWS_DEFAULT_REGION"]);
        let access_key = config_or_env(&request, "access_key", &["AWS_ACCESS_KEY_ID"]);
        let secret_key = config_or_env(&request, "secret_key", &["AWS_SECRET_ACCESS_KEY"]);
        let endpoint = config_or_env(&request, "endpoint", &["AWS_ENDPOINT_URL"]);
        let session_token = std::env::var("AWS_SESSION_TOKEN").ok().filter(|v| !v.is_empty());

        let (region, access_key, secret_key) = match (region, access_key, secret_key) {
            (Some(region), Some(access_key), Some(secret_key)) => (region, access_key, secret_key),
            (None, _, _) => {
                diagnostics.push(Diagnostic::error(
                    "region is required",
                    "Set it in the provider config or the AWS_REGION env var",
                ));
                return ConfigureProviderResponse { diagnostics };
            }
            (_, None, _) => {
                diagnostics.push(Diagnostic::error(
                    "access_key is required",
                    "Set it in the provider config or the AWS_ACCESS_KEY_ID env var",
                ));
                return ConfigureProviderResponse { diagnostics };
            }
            (_, _, None) => {
                diagnostics.push(Diagnostic::error(
                    "secret_key is required",
                    "Set it in the provider config or the AWS_SECRET_ACCESS_KEY env var",
                ));
                return ConfigureProviderResponse { diagnostics };
            }
        };

        let mut credentials = Credentials::new(access_key, secret_key);
        if let Some(token) = session_token {
            credentials = credentials.with_session_token(token);
        }

        match Client::new(&region, credentials, endpoint.as_deref()) {
            Ok(client) => {
                self.provider_data = Some(SmsVoiceProviderData::new(client));
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to create API client",
                    e.to_string(),
                ));
            }
        }

        ConfigureProviderResponse { diagnostics }
    }

    async fn create_resource(&self, type_name: &str) -> Result<Box<dyn ResourceWithConfigure>> {
        match type_name {
            "smsvoice_phone_pool" => Ok(Box::new(resources::PhonePoolResource::new())),
            "smsvoice_protect_configuration" => {
                Ok(Box::new(resources::ProtectConfigurationResource::new()))
            }
            _ => Err(TfplugError::ResourceNotFound(type_name.to_string())),
        }
    }

    async fn resource_schemas(&self) -> HashMap<String, Schema> {
        let mut schemas = HashMap::new();
        schemas.insert(
            "smsvoice_phone_pool".to_string(),
            resources::PhonePoolResource::schema_static(),
        );
        schemas.insert(
            "smsvoice_protect_configuration".to_string(),
            resources::ProtectConfigurationResource::schema_static(),
        );
        schemas
    }

    fn provider_data(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.provider_data
            .as_ref()
            .map(|data| Arc::new(data.clone()) as Arc<dyn Any + Send + Sync>)
    }
}

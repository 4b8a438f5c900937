//! Protect configuration resource
//!
//! Unlike pools, protect configurations are usable as soon as the create
//! call returns, so no status polling is involved.

use async_trait::async_trait;
use std::collections::HashMap;

use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::plan_modifier::UseStateForUnknown;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure, ResourceWithImportState,
    UpdateResourceRequest, UpdateResourceResponse, ValidateResourceConfigRequest,
    ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

use crate::api::{
    self, CreateProtectConfigurationRequest, ProtectConfigurationInformation,
    UpdateProtectConfigurationRequest,
};
use crate::provider_data::SmsVoiceProviderData;

#[derive(Default)]
pub struct ProtectConfigurationResource {
    provider_data: Option<SmsVoiceProviderData>,
}

impl ProtectConfigurationResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a protect configuration governing message-sending protections")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Protect configuration identifier assigned by the service")
                    .computed()
                    .plan_modifier(UseStateForUnknown::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("arn", AttributeType::String)
                    .description("Protect configuration ARN")
                    .computed()
                    .plan_modifier(UseStateForUnknown::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("account_default", AttributeType::Bool)
                    .description("Promote this configuration to the account default")
                    .optional()
                    .computed()
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("deletion_protection_enabled", AttributeType::Bool)
                    .description("Blocks deletion while enabled")
                    .optional()
                    .computed()
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tags", AttributeType::Map(Box::new(AttributeType::String)))
                    .description("Tags to apply to the configuration")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "tags_all",
                    AttributeType::Map(Box::new(AttributeType::String)),
                )
                .description("All tags on the configuration, including provider defaults")
                .computed()
                .build(),
            )
            .build()
    }
}

/// Typed view of the configuration with schema defaults applied
#[derive(Debug, Clone)]
struct ProtectConfigurationConfig {
    account_default: bool,
    deletion_protection_enabled: bool,
    tags: HashMap<String, String>,
}

impl ProtectConfigurationConfig {
    fn from_value(value: &DynamicValue) -> Result<Self, Diagnostic> {
        let tags = match value.get_map(&AttributePath::new("tags")) {
            Ok(map) => {
                let mut tags = HashMap::new();
                for (key, item) in map {
                    match item {
                        Dynamic::String(s) => {
                            tags.insert(key, s);
                        }
                        other => {
                            return Err(Diagnostic::error(
                                "Invalid tags entry",
                                format!("Tag '{}' must be a string, got {:?}", key, other),
                            ));
                        }
                    }
                }
                tags
            }
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            account_default: value
                .get_bool(&AttributePath::new("account_default"))
                .unwrap_or(false),
            deletion_protection_enabled: value
                .get_bool(&AttributePath::new("deletion_protection_enabled"))
                .unwrap_or(false),
            tags,
        })
    }
}

fn build_state(
    configuration: &ProtectConfigurationInformation,
    account_default: bool,
    tags: &HashMap<String, String>,
    tags_all: &HashMap<String, String>,
) -> DynamicValue {
    let mut state = DynamicValue::empty();

    let _ = state.set_string(
        &AttributePath::new("id"),
        configuration.protect_configuration_id.clone(),
    );
    let _ = state.set_string(
        &AttributePath::new("arn"),
        configuration.protect_configuration_arn.clone(),
    );
    let _ = state.set_bool(&AttributePath::new("account_default"), account_default);
    let _ = state.set_bool(
        &AttributePath::new("deletion_protection_enabled"),
        configuration.deletion_protection_enabled,
    );
    let _ = state.set_map(
        &AttributePath::new("tags"),
        tags.iter()
            .map(|(k, v)| (k.clone(), Dynamic::String(v.clone())))
            .collect(),
    );
    let _ = state.set_map(
        &AttributePath::new("tags_all"),
        tags_all
            .iter()
            .map(|(k, v)| (k.clone(), Dynamic::String(v.clone())))
            .collect(),
    );

    state
}

#[async_trait]
impl Resource for ProtectConfigurationResource {
    fn type_name(&self) -> &str {
        "smsvoice_protect_configuration"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: Self::schema_static(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        // Both flags are plain booleans with defaults; nothing to check
        // until prior state is available (see update)
        ValidateResourceConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn create(
        &self,
        _ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };
        let client = provider_data.client.as_ref();

        let config = match ProtectConfigurationConfig::from_value(&request.config) {
            Ok(config) => config,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        let created = match client
            .create_protect_configuration(&CreateProtectConfigurationRequest {
                client_token: api::client_token(),
                deletion_protection_enabled: Some(config.deletion_protection_enabled),
                tags: api::tags_from_map(&config.tags),
            })
            .await
        {
            Ok(configuration) => configuration,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "creating End User Messaging Protect Configuration",
                    e.to_string(),
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        if config.account_default {
            if let Err(e) = client
                .set_account_default_protect_configuration(&created.protect_configuration_id)
                .await
            {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "setting End User Messaging Protect Configuration ({}) as account default",
                        created.protect_configuration_id
                    ),
                    e.to_string(),
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        }

        let new_state = build_state(&created, config.account_default, &config.tags, &config.tags);

        CreateResourceResponse {
            new_state,
            diagnostics,
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                ));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                };
            }
        };
        let client = provider_data.client.as_ref();

        let id = match request.current_state.get_string(&AttributePath::new("id")) {
            Ok(id) => id,
            Err(_) => {
                return ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                };
            }
        };

        let configuration = match client.find_protect_configuration_by_id(&id).await {
            Ok(configuration) => configuration,
            Err(e) if e.is_not_found() => {
                diagnostics.push(Diagnostic::warning(
                    format!(
                        "End User Messaging Protect Configuration ({}) not found",
                        id
                    ),
                    "Removing from state",
                ));
                return ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                };
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("reading End User Messaging Protect Configuration ({})", id),
                    e.to_string(),
                ));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                };
            }
        };

        let remote_tags = match client
            .list_tags_for_resource(&configuration.protect_configuration_arn)
            .await
        {
            Ok(tags) => api::tags_to_map(&tags),
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "listing tags for End User Messaging Protect Configuration ({})",
                        id
                    ),
                    e.to_string(),
                ));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                };
            }
        };

        let configured_tags = ProtectConfigurationConfig::from_value(&request.current_state)
            .map(|config| config.tags)
            .unwrap_or_default();

        let new_state = build_state(
            &configuration,
            configuration.account_default,
            &configured_tags,
            &remote_tags,
        );

        ReadResourceResponse {
            new_state: Some(new_state),
            diagnostics,
        }
    }

    async fn update(
        &self,
        _ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        };
        let client = provider_data.client.as_ref();

        let id = match request.prior_state.get_string(&AttributePath::new("id")) {
            Ok(id) => id,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Missing protect configuration id in state",
                    e.to_string(),
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        };
        let arn = request
            .prior_state
            .get_string(&AttributePath::new("arn"))
            .unwrap_or_default();

        let old = match ProtectConfigurationConfig::from_value(&request.prior_state) {
            Ok(config) => config,
            Err(diag) => {
                diagnostics.push(diag);
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        };
        let new = match ProtectConfigurationConfig::from_value(&request.planned_state) {
            Ok(config) => config,
            Err(diag) => {
                diagnostics.push(diag);
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        };

        // The service has no call to demote the account default; that
        // transition needs a replacement configuration promoted instead
        if old.account_default && !new.account_default {
            diagnostics.push(
                Diagnostic::error(
                    "Cannot unset account_default",
                    "Another protect configuration must be promoted to account default instead",
                )
                .with_attribute(AttributePath::new("account_default")),
            );
            return UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics,
            };
        }

        let mut latest: Option<ProtectConfigurationInformation> = None;

        if old.deletion_protection_enabled != new.deletion_protection_enabled {
            match client
                .update_protect_configuration(&UpdateProtectConfigurationRequest {
                    protect_configuration_id: id.clone(),
                    deletion_protection_enabled: Some(new.deletion_protection_enabled),
                })
                .await
            {
                Ok(configuration) => latest = Some(configuration),
                Err(e) => {
                    diagnostics.push(Diagnostic::error(
                        format!(
                            "updating End User Messaging Protect Configuration ({})",
                            id
                        ),
                        e.to_string(),
                    ));
                    return UpdateResourceResponse {
                        new_state: request.prior_state,
                        diagnostics,
                    };
                }
            }
        }

        if !old.account_default && new.account_default {
            if let Err(e) = client
                .set_account_default_protect_configuration(&id)
                .await
            {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "setting End User Messaging Protect Configuration ({}) as account default",
                        id
                    ),
                    e.to_string(),
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        }

        if !arn.is_empty() {
            if let Err(e) = client.reconcile_tags(&arn, &old.tags, &new.tags).await {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "updating tags for End User Messaging Protect Configuration ({})",
                        id
                    ),
                    e.to_string(),
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        }

        let new_state = match latest {
            Some(configuration) => {
                build_state(&configuration, new.account_default, &new.tags, &new.tags)
            }
            None => {
                let mut state = request.planned_state.clone();
                let _ = state.set_string(&AttributePath::new("id"), id.clone());
                if !arn.is_empty() {
                    let _ = state.set_string(&AttributePath::new("arn"), arn.clone());
                }
                let _ = state.set_map(
                    &AttributePath::new("tags_all"),
                    new.tags
                        .iter()
                        .map(|(k, v)| (k.clone(), Dynamic::String(v.clone())))
                        .collect(),
                );
                state
            }
        };

        UpdateResourceResponse {
            new_state,
            diagnostics,
        }
    }

    async fn delete(
        &self,
        _ctx: Context,
        request: DeleteResourceRequest,
    ) -> DeleteResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                ));
                return DeleteResourceResponse { diagnostics };
            }
        };
        let client = provider_data.client.as_ref();

        let id = match request.prior_state.get_string(&AttributePath::new("id")) {
            Ok(id) => id,
            Err(_) => {
                return DeleteResourceResponse { diagnostics };
            }
        };

        match client.delete_protect_configuration(&id).await {
            Ok(_) => {}
            // Already gone counts as deleted
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "deleting End User Messaging Protect Configuration ({})",
                        id
                    ),
                    e.to_string(),
                ));
            }
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for ProtectConfigurationResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];

        if let Some(data) = request.provider_data {
            if let Some(provider_data) = data.downcast_ref::<SmsVoiceProviderData>() {
                self.provider_data = Some(provider_data.clone());
            } else {
                diagnostics.push(Diagnostic::error(
                    "Invalid provider data",
                    "Failed to extract SmsVoiceProviderData from provider data",
                ));
            }
        } else {
            diagnostics.push(Diagnostic::error(
                "No provider data",
                "No provider data was provided to the resource",
            ));
        }

        ConfigureResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithImportState for ProtectConfigurationResource {
    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Unable to import resource without provider configuration",
                ));
                return ImportResourceStateResponse {
                    imported_resources: vec![],
                    diagnostics,
                };
            }
        };
        let client = provider_data.client.as_ref();

        let configuration = match client.find_protect_configuration_by_id(&request.id).await {
            Ok(configuration) => configuration,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "importing End User Messaging Protect Configuration ({})",
                        request.id
                    ),
                    e.to_string(),
                ));
                return ImportResourceStateResponse {
                    imported_resources: vec![],
                    diagnostics,
                };
            }
        };

        let tags = match client
            .list_tags_for_resource(&configuration.protect_configuration_arn)
            .await
        {
            Ok(tags) => api::tags_to_map(&tags),
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "listing tags for End User Messaging Protect Configuration ({})",
                        request.id
                    ),
                    e.to_string(),
                ));
                return ImportResourceStateResponse {
                    imported_resources: vec![],
                    diagnostics,
                };
            }
        };

        let state = build_state(
            &configuration,
            configuration.account_default,
            &tags,
            &tags,
        );

        ImportResourceStateResponse {
            imported_resources: vec![ImportedResource {
                type_name: self.type_name().to_string(),
                state,
            }],
            diagnostics,
        }
    }
}

#[cfg(test)]
#[path = "./protect_configuration_test.rs"]
mod protect_configuration_test;

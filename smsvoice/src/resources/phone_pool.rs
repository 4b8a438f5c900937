//! Phone pool resource
//!
//! A pool is created from a seed origination identity, polled until it
//! reaches ACTIVE, then grown to the full identity set and adjusted with
//! the optional settings the create call cannot carry. Deletion polls
//! until the pool disappears from describe results.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::plan_modifier::{RequiresReplace, UseStateForUnknown};
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
use tfplug::timeouts::{timeouts_block, Timeouts};
use tfplug::types::{has_errors, AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::{OneOf, SetSizeAtLeast, StringPattern};

use crate::api::{
    self, AssociateOriginationIdentityRequest, Client, CreatePoolRequest,
    DisassociateOriginationIdentityRequest, PoolInformation, UpdatePoolRequest,
};
use crate::poll::{wait_for_status, WaitConfig, WaitError};
use crate::provider_data::SmsVoiceProviderData;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

const MESSAGE_TYPES: [&str; 2] = ["TRANSACTIONAL", "PROMOTIONAL"];

#[derive(Default)]
pub struct PhonePoolResource {
    provider_data: Option<SmsVoiceProviderData>,
}

impl PhonePoolResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a phone pool of origination identities")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Pool identifier assigned by the service")
                    .computed()
                    .plan_modifier(UseStateForUnknown::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("arn", AttributeType::String)
                    .description("Pool ARN")
                    .computed()
                    .plan_modifier(UseStateForUnknown::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "origination_identities",
                    AttributeType::Set(Box::new(AttributeType::String)),
                )
                .description("ARNs of the phone numbers and sender IDs in the pool")
                .required()
                .validator(SetSizeAtLeast::create(1))
                .build(),
            )
            .attribute(
                AttributeBuilder::new("message_type", AttributeType::String)
                    .description("Type of messages the pool sends")
                    .required()
                    .validator(OneOf::create(&MESSAGE_TYPES))
                    .plan_modifier(RequiresReplace::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("deletion_protection_enabled", AttributeType::Bool)
                    .description("Blocks pool deletion while enabled")
                    .optional()
                    .computed()
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("opt_out_list_name", AttributeType::String)
                    .description("Opt-out list associated with the pool")
                    .optional()
                    .computed()
                    .default(StaticDefault::string("Default"))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("self_managed_opt_outs_enabled", AttributeType::Bool)
                    .optional()
                    .computed()
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("shared_routes_enabled", AttributeType::Bool)
                    .optional()
                    .computed()
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("two_way_channel_enabled", AttributeType::Bool)
                    .description("Enables two-way messaging on the pool")
                    .optional()
                    .computed()
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("two_way_channel_arn", AttributeType::String)
                    .description("Channel receiving inbound messages; requires two_way_channel_enabled")
                    .optional()
                    .validator(StringPattern::create(r"^arn:[a-z0-9-]+:", "an ARN"))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("two_way_channel_role", AttributeType::String)
                    .description("IAM role the service assumes to deliver inbound messages; requires two_way_channel_enabled")
                    .optional()
                    .validator(StringPattern::create(r"^arn:[a-z0-9-]+:", "an ARN"))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tags", AttributeType::Map(Box::new(AttributeType::String)))
                    .description("Tags to apply to the pool")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "tags_all",
                    AttributeType::Map(Box::new(AttributeType::String)),
                )
                .description("All tags on the pool, including provider defaults")
                .computed()
                .build(),
            )
            .block(timeouts_block(true, true, true))
            .build()
    }
}

/// Typed view of the pool configuration with schema defaults applied
#[derive(Debug, Clone)]
pub struct PhonePoolConfig {
    pub origination_identities: Vec<String>,
    pub message_type: String,
    pub deletion_protection_enabled: bool,
    pub opt_out_list_name: String,
    pub self_managed_opt_outs_enabled: bool,
    pub shared_routes_enabled: bool,
    pub two_way_channel_enabled: bool,
    pub two_way_channel_arn: Option<String>,
    pub two_way_channel_role: Option<String>,
    pub tags: HashMap<String, String>,
    pub timeouts: Timeouts,
}

impl PhonePoolConfig {
    pub fn from_value(value: &DynamicValue) -> Result<Self, Diagnostic> {
        let origination_identities = value
            .get_string_list(&AttributePath::new("origination_identities"))
            .map_err(|e| {
                Diagnostic::error("Missing origination_identities", e.to_string())
                    .with_attribute(AttributePath::new("origination_identities"))
            })?;
        let message_type = value
            .get_string(&AttributePath::new("message_type"))
            .map_err(|e| {
                Diagnostic::error("Missing message_type", e.to_string())
                    .with_attribute(AttributePath::new("message_type"))
            })?;

        let timeouts = Timeouts::from_config(value)
            .map_err(|e| Diagnostic::error("Invalid timeouts block", e.to_string()))?;

        Ok(Self {
            origination_identities,
            message_type,
            deletion_protection_enabled: value
                .get_bool(&AttributePath::new("deletion_protection_enabled"))
                .unwrap_or(false),
            opt_out_list_name: value
                .get_string(&AttributePath::new("opt_out_list_name"))
                .unwrap_or_else(|_| "Default".to_string()),
            self_managed_opt_outs_enabled: value
                .get_bool(&AttributePath::new("self_managed_opt_outs_enabled"))
                .unwrap_or(false),
            shared_routes_enabled: value
                .get_bool(&AttributePath::new("shared_routes_enabled"))
                .unwrap_or(false),
            two_way_channel_enabled: value
                .get_bool(&AttributePath::new("two_way_channel_enabled"))
                .unwrap_or(false),
            two_way_channel_arn: value
                .get_string(&AttributePath::new("two_way_channel_arn"))
                .ok(),
            two_way_channel_role: value
                .get_string(&AttributePath::new("two_way_channel_role"))
                .ok(),
            tags: string_map(value, "tags")?,
            timeouts,
        })
    }

    /// Explicit validation pass, run before any remote call
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = vec![];

        if self.origination_identities.is_empty() {
            diagnostics.push(
                Diagnostic::error(
                    "Empty origination_identities",
                    "At least one origination identity is required",
                )
                .with_attribute(AttributePath::new("origination_identities")),
            );
        }
        for identity in &self.origination_identities {
            if !identity.starts_with("arn:") {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid origination identity",
                        format!("'{}' is not an ARN", identity),
                    )
                    .with_attribute(AttributePath::new("origination_identities")),
                );
            }
        }

        if !MESSAGE_TYPES.contains(&self.message_type.as_str()) {
            diagnostics.push(
                Diagnostic::error(
                    "Invalid message_type",
                    format!(
                        "message_type must be one of: {}",
                        MESSAGE_TYPES.join(", ")
                    ),
                )
                .with_attribute(AttributePath::new("message_type")),
            );
        }

        if (self.two_way_channel_arn.is_some() || self.two_way_channel_role.is_some())
            && !self.two_way_channel_enabled
        {
            diagnostics.push(
                Diagnostic::error(
                    "Two-way channel misconfigured",
                    "two_way_channel_arn and two_way_channel_role require two_way_channel_enabled",
                )
                .with_attribute(AttributePath::new("two_way_channel_enabled")),
            );
        }

        diagnostics
    }

    fn settings_differ(&self, other: &Self) -> bool {
        self.deletion_protection_enabled != other.deletion_protection_enabled
            || self.opt_out_list_name != other.opt_out_list_name
            || self.self_managed_opt_outs_enabled != other.self_managed_opt_outs_enabled
            || self.shared_routes_enabled != other.shared_routes_enabled
            || self.two_way_channel_enabled != other.two_way_channel_enabled
            || self.two_way_channel_arn != other.two_way_channel_arn
            || self.two_way_channel_role != other.two_way_channel_role
    }

    fn as_update_request(&self, pool_id: &str) -> UpdatePoolRequest {
        UpdatePoolRequest {
            pool_id: pool_id.to_string(),
            deletion_protection_enabled: Some(self.deletion_protection_enabled),
            opt_out_list_name: Some(self.opt_out_list_name.clone()),
            self_managed_opt_outs_enabled: Some(self.self_managed_opt_outs_enabled),
            shared_routes_enabled: Some(self.shared_routes_enabled),
            two_way_enabled: Some(self.two_way_channel_enabled),
            two_way_channel_arn: self.two_way_channel_arn.clone(),
            two_way_channel_role: self.two_way_channel_role.clone(),
        }
    }
}

fn string_map(value: &DynamicValue, name: &str) -> Result<HashMap<String, String>, Diagnostic> {
    match value.get_map(&AttributePath::new(name)) {
        Ok(map) => map
            .into_iter()
            .map(|(key, item)| match item {
                Dynamic::String(s) => Ok((key, s)),
                other => Err(Diagnostic::error(
                    format!("Invalid {} entry", name),
                    format!("Tag '{}' must be a string, got {:?}", key, other),
                )),
            })
            .collect(),
        Err(_) => Ok(HashMap::new()),
    }
}

/// Sender-ID identities carry their ISO country code in the ARN; phone
/// numbers need a remote lookup.
pub fn is_sender_id(origination_identity: &str) -> bool {
    origination_identity.contains(":sender-id/")
}

/// The country code of a sender ID ARN is its last two characters.
pub fn sender_id_country_code(origination_identity: &str) -> Result<String, Diagnostic> {
    if !is_sender_id(origination_identity) {
        return Err(Diagnostic::error(
            "Not a sender ID",
            format!("'{}' is not a sender ID ARN", origination_identity),
        ));
    }
    origination_identity
        .get(origination_identity.len().saturating_sub(2)..)
        .filter(|code| code.len() == 2)
        .map(|code| code.to_string())
        .ok_or_else(|| {
            Diagnostic::error(
                "Invalid sender ID ARN",
                format!("'{}' has no country code suffix", origination_identity),
            )
        })
}

async fn resolve_iso_country_code(client: &Client, identity: &str) -> Result<String, Diagnostic> {
    if is_sender_id(identity) {
        sender_id_country_code(identity)
    } else {
        client
            .iso_country_code_for_phone_number(identity)
            .await
            .map_err(|e| {
                Diagnostic::error(
                    format!("Error getting ISO country code for phone number ({})", identity),
                    e.to_string(),
                )
            })
    }
}

async fn wait_pool_active(
    client: &Client,
    pool_id: &str,
    timeout: Duration,
) -> Result<PoolInformation, WaitError> {
    let fetch = || {
        let client = client.clone();
        let pool_id = pool_id.to_string();
        async move {
            let pool = client.find_pool_by_id(&pool_id).await?;
            let status = pool.status.clone();
            Ok(Some((pool, status)))
        }
    };

    let pool = wait_for_status(
        fetch,
        &[api::POOL_STATUS_CREATING],
        &[api::POOL_STATUS_ACTIVE],
        WaitConfig::new(timeout),
    )
    .await?;

    // Non-empty target set always yields a resource on success
    pool.ok_or(WaitError::NotFound)
}

async fn wait_pool_deleted(
    client: &Client,
    pool_id: &str,
    timeout: Duration,
) -> Result<(), WaitError> {
    let fetch = || {
        let client = client.clone();
        let pool_id = pool_id.to_string();
        async move {
            let pool = client.find_pool_by_id(&pool_id).await?;
            let status = pool.status.clone();
            Ok(Some((pool, status)))
        }
    };

    wait_for_status(
        fetch,
        &[api::POOL_STATUS_DELETING],
        &[],
        WaitConfig::new(timeout),
    )
    .await?;

    Ok(())
}

/// Flatten pool information and companion lookups into resource state
fn build_pool_state(
    pool: &PoolInformation,
    origination_identities: &[String],
    tags: &HashMap<String, String>,
    tags_all: &HashMap<String, String>,
    carry_from: &DynamicValue,
) -> DynamicValue {
    let mut state = DynamicValue::empty();

    let _ = state.set_string(&AttributePath::new("id"), pool.pool_id.clone());
    let _ = state.set_string(&AttributePath::new("arn"), pool.pool_arn.clone());
    let _ = state.set_string(
        &AttributePath::new("message_type"),
        pool.message_type.clone(),
    );
    let _ = state.set_bool(
        &AttributePath::new("deletion_protection_enabled"),
        pool.deletion_protection_enabled,
    );
    let _ = state.set_string(
        &AttributePath::new("opt_out_list_name"),
        pool.opt_out_list_name.clone(),
    );
    let _ = state.set_bool(
        &AttributePath::new("self_managed_opt_outs_enabled"),
        pool.self_managed_opt_outs_enabled,
    );
    let _ = state.set_bool(
        &AttributePath::new("shared_routes_enabled"),
        pool.shared_routes_enabled,
    );
    let _ = state.set_bool(
        &AttributePath::new("two_way_channel_enabled"),
        pool.two_way_enabled,
    );
    if let Some(arn) = &pool.two_way_channel_arn {
        let _ = state.set_string(&AttributePath::new("two_way_channel_arn"), arn.clone());
    }
    if let Some(role) = &pool.two_way_channel_role {
        let _ = state.set_string(&AttributePath::new("two_way_channel_role"), role.clone());
    }

    let _ = state.set_list(
        &AttributePath::new("origination_identities"),
        origination_identities
            .iter()
            .map(|identity| Dynamic::String(identity.clone()))
            .collect(),
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

    // The timeouts block is configuration, not remote state; carry it over
    if let Ok(timeouts) = carry_from.get_map(&AttributePath::new("timeouts")) {
        let _ = state.set_map(&AttributePath::new("timeouts"), timeouts);
    }

    state
}

#[async_trait]
impl Resource for PhonePoolResource {
    fn type_name(&self) -> &str {
        "smsvoice_phone_pool"
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
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let mut diagnostics = vec![];

        // Values may still be unknown during planning; check what's there
        if let Ok(message_type) = request.config.get_string(&AttributePath::new("message_type")) {
            if !MESSAGE_TYPES.contains(&message_type.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid message_type",
                        format!(
                            "message_type must be one of: {}",
                            MESSAGE_TYPES.join(", ")
                        ),
                    )
                    .with_attribute(AttributePath::new("message_type")),
                );
            }
        }

        if let Ok(identities) = request
            .config
            .get_string_list(&AttributePath::new("origination_identities"))
        {
            if identities.is_empty() {
                diagnostics.push(
                    Diagnostic::error(
                        "Empty origination_identities",
                        "At least one origination identity is required",
                    )
                    .with_attribute(AttributePath::new("origination_identities")),
                );
            }
            for identity in &identities {
                if !identity.starts_with("arn:") {
                    diagnostics.push(
                        Diagnostic::error(
                            "Invalid origination identity",
                            format!("'{}' is not an ARN", identity),
                        )
                        .with_attribute(AttributePath::new("origination_identities")),
                    );
                }
            }
        }

        let two_way_enabled = request
            .config
            .get_bool(&AttributePath::new("two_way_channel_enabled"))
            .unwrap_or(false);
        for attr in ["two_way_channel_arn", "two_way_channel_role"] {
            if request.config.get_string(&AttributePath::new(attr)).is_ok() && !two_way_enabled {
                diagnostics.push(
                    Diagnostic::error(
                        "Two-way channel misconfigured",
                        format!("{} requires two_way_channel_enabled", attr),
                    )
                    .with_attribute(AttributePath::new(attr)),
                );
            }
        }

        ValidateResourceConfigResponse { diagnostics }
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

        let config = match PhonePoolConfig::from_value(&request.config) {
            Ok(config) => config,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        diagnostics.extend(config.validate());
        if has_errors(&diagnostics) {
            return CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics,
            };
        }

        // The create call carries exactly one origination identity and
        // needs that identity's country code
        let seed_identity = config.origination_identities[0].clone();
        let seed_country = match resolve_iso_country_code(client, &seed_identity).await {
            Ok(code) => code,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        let created = match client
            .create_pool(&CreatePoolRequest {
                client_token: api::client_token(),
                origination_identity: seed_identity.clone(),
                iso_country_code: seed_country,
                message_type: config.message_type.clone(),
                deletion_protection_enabled: Some(config.deletion_protection_enabled),
                tags: api::tags_from_map(&config.tags),
            })
            .await
        {
            Ok(pool) => pool,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "creating End User Messaging Phone Pool",
                    e.to_string(),
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        let pool_id = created.pool_id.clone();
        tracing::debug!("created pool {}, waiting for ACTIVE", pool_id);

        if let Err(e) = wait_pool_active(
            client,
            &pool_id,
            config.timeouts.create_or(DEFAULT_TIMEOUT),
        )
        .await
        {
            diagnostics.push(Diagnostic::error(
                format!(
                    "waiting for End User Messaging Phone Pool ({}) create",
                    pool_id
                ),
                e.to_string(),
            ));
            return CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics,
            };
        }

        // The seed identity is already in the pool; associate the rest
        for identity in &config.origination_identities {
            if *identity == seed_identity {
                continue;
            }

            let country = match resolve_iso_country_code(client, identity).await {
                Ok(code) => code,
                Err(diag) => {
                    diagnostics.push(diag);
                    return CreateResourceResponse {
                        new_state: request.planned_state,
                        diagnostics,
                    };
                }
            };

            if let Err(e) = client
                .associate_origination_identity(&AssociateOriginationIdentityRequest {
                    client_token: api::client_token(),
                    iso_country_code: country,
                    origination_identity: identity.clone(),
                    pool_id: pool_id.clone(),
                })
                .await
            {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "associating origination identity ({}) to End User Messaging Phone Pool ({})",
                        identity, pool_id
                    ),
                    e.to_string(),
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        }

        // Optional pool settings only land through UpdatePool
        let updated = match client.update_pool(&config.as_update_request(&pool_id)).await {
            Ok(pool) => pool,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "updating End User Messaging Phone Pool ({}) after create",
                        pool_id
                    ),
                    e.to_string(),
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        let new_state = build_pool_state(
            &updated,
            &config.origination_identities,
            &config.tags,
            &config.tags,
            &request.config,
        );

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

        let pool_id = match request.current_state.get_string(&AttributePath::new("id")) {
            Ok(id) => id,
            Err(_) => {
                return ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                };
            }
        };

        let pool = match client.find_pool_by_id(&pool_id).await {
            Ok(pool) => pool,
            Err(e) if e.is_not_found() => {
                diagnostics.push(Diagnostic::warning(
                    format!("End User Messaging Phone Pool ({}) not found", pool_id),
                    "Removing from state",
                ));
                return ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                };
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("reading End User Messaging Phone Pool ({})", pool_id),
                    e.to_string(),
                ));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                };
            }
        };

        let identities = match client.list_pool_origination_identities(&pool_id).await {
            Ok(identities) => identities
                .into_iter()
                .map(|identity| identity.origination_identity_arn)
                .collect::<Vec<_>>(),
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "listing origination identities for End User Messaging Phone Pool ({})",
                        pool_id
                    ),
                    e.to_string(),
                ));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                };
            }
        };

        let remote_tags = match client.list_tags_for_resource(&pool.pool_arn).await {
            Ok(tags) => api::tags_to_map(&tags),
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("listing tags for End User Messaging Phone Pool ({})", pool_id),
                    e.to_string(),
                ));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                };
            }
        };

        // The configured tag subset stays as the user wrote it; tags_all
        // reflects the remote
        let configured_tags =
            string_map(&request.current_state, "tags").unwrap_or_default();

        let new_state = build_pool_state(
            &pool,
            &identities,
            &configured_tags,
            &remote_tags,
            &request.current_state,
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

        let pool_id = match request.prior_state.get_string(&AttributePath::new("id")) {
            Ok(id) => id,
            Err(e) => {
                diagnostics.push(Diagnostic::error("Missing pool id in state", e.to_string()));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        };
        let pool_arn = request
            .prior_state
            .get_string(&AttributePath::new("arn"))
            .unwrap_or_default();

        let old = match PhonePoolConfig::from_value(&request.prior_state) {
            Ok(config) => config,
            Err(diag) => {
                diagnostics.push(diag);
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        };
        let new = match PhonePoolConfig::from_value(&request.planned_state) {
            Ok(config) => config,
            Err(diag) => {
                diagnostics.push(diag);
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        };

        let mut latest: Option<PoolInformation> = None;

        if old.settings_differ(&new) {
            match client.update_pool(&new.as_update_request(&pool_id)).await {
                Ok(pool) => latest = Some(pool),
                Err(e) => {
                    diagnostics.push(Diagnostic::error(
                        format!("updating End User Messaging Phone Pool ({})", pool_id),
                        e.to_string(),
                    ));
                    return UpdateResourceResponse {
                        new_state: request.prior_state,
                        diagnostics,
                    };
                }
            }
        }

        // Reconcile pool membership
        let old_identities: HashSet<&String> = old.origination_identities.iter().collect();
        let new_identities: HashSet<&String> = new.origination_identities.iter().collect();

        for identity in new_identities.difference(&old_identities) {
            let country = match resolve_iso_country_code(client, identity).await {
                Ok(code) => code,
                Err(diag) => {
                    diagnostics.push(diag);
                    return UpdateResourceResponse {
                        new_state: request.prior_state,
                        diagnostics,
                    };
                }
            };
            if let Err(e) = client
                .associate_origination_identity(&AssociateOriginationIdentityRequest {
                    client_token: api::client_token(),
                    iso_country_code: country,
                    origination_identity: (*identity).clone(),
                    pool_id: pool_id.clone(),
                })
                .await
            {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "associating origination identity ({}) to End User Messaging Phone Pool ({})",
                        identity, pool_id
                    ),
                    e.to_string(),
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        }

        for identity in old_identities.difference(&new_identities) {
            let country = match resolve_iso_country_code(client, identity).await {
                Ok(code) => code,
                Err(diag) => {
                    diagnostics.push(diag);
                    return UpdateResourceResponse {
                        new_state: request.prior_state,
                        diagnostics,
                    };
                }
            };
            if let Err(e) = client
                .disassociate_origination_identity(&DisassociateOriginationIdentityRequest {
                    client_token: api::client_token(),
                    iso_country_code: country,
                    origination_identity: (*identity).clone(),
                    pool_id: pool_id.clone(),
                })
                .await
            {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "disassociating origination identity ({}) from End User Messaging Phone Pool ({})",
                        identity, pool_id
                    ),
                    e.to_string(),
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        }

        if !pool_arn.is_empty() {
            if let Err(e) = client.reconcile_tags(&pool_arn, &old.tags, &new.tags).await {
                diagnostics.push(Diagnostic::error(
                    format!("updating tags for End User Messaging Phone Pool ({})", pool_id),
                    e.to_string(),
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        }

        let new_state = match latest {
            Some(pool) => build_pool_state(
                &pool,
                &new.origination_identities,
                &new.tags,
                &new.tags,
                &request.planned_state,
            ),
            None => {
                // Settings unchanged; planned state plus refreshed tags is
                // already accurate
                let mut state = request.planned_state.clone();
                let _ = state.set_string(&AttributePath::new("id"), pool_id.clone());
                if !pool_arn.is_empty() {
                    let _ = state.set_string(&AttributePath::new("arn"), pool_arn.clone());
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

        let pool_id = match request.prior_state.get_string(&AttributePath::new("id")) {
            Ok(id) => id,
            Err(_) => {
                return DeleteResourceResponse { diagnostics };
            }
        };

        let timeouts = Timeouts::from_config(&request.prior_state).unwrap_or_default();

        match client.delete_pool(&pool_id).await {
            Ok(_) => {}
            // Already gone counts as deleted
            Err(e) if e.is_not_found() => {
                return DeleteResourceResponse { diagnostics };
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("deleting End User Messaging Phone Pool ({})", pool_id),
                    e.to_string(),
                ));
                return DeleteResourceResponse { diagnostics };
            }
        }

        if let Err(e) = wait_pool_deleted(
            client,
            &pool_id,
            timeouts.delete_or(DEFAULT_TIMEOUT),
        )
        .await
        {
            diagnostics.push(Diagnostic::error(
                format!(
                    "waiting for End User Messaging Phone Pool ({}) delete",
                    pool_id
                ),
                e.to_string(),
            ));
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for PhonePoolResource {
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
impl ResourceWithImportState for PhonePoolResource {
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

        let pool = match client.find_pool_by_id(&request.id).await {
            Ok(pool) => pool,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("importing End User Messaging Phone Pool ({})", request.id),
                    e.to_string(),
                ));
                return ImportResourceStateResponse {
                    imported_resources: vec![],
                    diagnostics,
                };
            }
        };

        let identities = match client.list_pool_origination_identities(&pool.pool_id).await {
            Ok(identities) => identities
                .into_iter()
                .map(|identity| identity.origination_identity_arn)
                .collect::<Vec<_>>(),
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "listing origination identities for End User Messaging Phone Pool ({})",
                        pool.pool_id
                    ),
                    e.to_string(),
                ));
                return ImportResourceStateResponse {
                    imported_resources: vec![],
                    diagnostics,
                };
            }
        };

        let tags = match client.list_tags_for_resource(&pool.pool_arn).await {
            Ok(tags) => api::tags_to_map(&tags),
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "listing tags for End User Messaging Phone Pool ({})",
                        pool.pool_id
                    ),
                    e.to_string(),
                ));
                return ImportResourceStateResponse {
                    imported_resources: vec![],
                    diagnostics,
                };
            }
        };

        let state = build_pool_state(&pool, &identities, &tags, &tags, &DynamicValue::empty());

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
#[path = "./phone_pool_test.rs"]
mod phone_pool_test;

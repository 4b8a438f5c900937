use super::*;
use crate::api::test_helpers::{test_client, CREATING_POOL_BODY, POOL_BODY};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;

const SENDER_ID_US: &str = "arn:aws:sms-voice:us-east-1:123456789012:sender-id/SENDER/US";
const SENDER_ID_GB: &str = "arn:aws:sms-voice:us-east-1:123456789012:sender-id/SENDER/GB";
const POOL_ARN: &str = "arn:aws:sms-voice:us-east-1:123456789012:pool/pool-123";

async fn configured_resource(server: &ServerGuard) -> PhonePoolResource {
    let mut resource = PhonePoolResource::new();
    let data = SmsVoiceProviderData::new(test_client(&server.url()));
    let response = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: Some(Arc::new(data)),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    resource
}

fn pool_config(identities: &[&str]) -> DynamicValue {
    let mut config = DynamicValue::empty();
    let _ = config.set_list(
        &AttributePath::new("origination_identities"),
        identities
            .iter()
            .map(|identity| Dynamic::String(identity.to_string()))
            .collect(),
    );
    let _ = config.set_string(
        &AttributePath::new("message_type"),
        "TRANSACTIONAL".to_string(),
    );
    config
}

fn pool_state(identities: &[&str]) -> DynamicValue {
    let mut state = pool_config(identities);
    let _ = state.set_string(&AttributePath::new("id"), "pool-123".to_string());
    let _ = state.set_string(&AttributePath::new("arn"), POOL_ARN.to_string());
    let _ = state.set_bool(&AttributePath::new("deletion_protection_enabled"), false);
    let _ = state.set_string(&AttributePath::new("opt_out_list_name"), "Default".to_string());
    let _ = state.set_bool(&AttributePath::new("self_managed_opt_outs_enabled"), false);
    let _ = state.set_bool(&AttributePath::new("shared_routes_enabled"), false);
    let _ = state.set_bool(&AttributePath::new("two_way_channel_enabled"), false);
    state
}

#[test]
fn schema_marks_expected_attributes() {
    let schema = PhonePoolResource::schema_static();

    let identities = schema.block.attribute("origination_identities").unwrap();
    assert!(identities.required);
    assert!(matches!(identities.r#type, AttributeType::Set(_)));
    assert_eq!(identities.validators.len(), 1);

    let message_type = schema.block.attribute("message_type").unwrap();
    assert!(message_type.required);
    assert_eq!(message_type.plan_modifiers.len(), 1);

    for name in [
        "deletion_protection_enabled",
        "self_managed_opt_outs_enabled",
        "shared_routes_enabled",
        "two_way_channel_enabled",
        "opt_out_list_name",
    ] {
        let attr = schema.block.attribute(name).unwrap();
        assert!(attr.optional, "{} should be optional", name);
        assert!(attr.computed, "{} should be computed", name);
        assert!(attr.default.is_some(), "{} should carry a default", name);
    }

    let id = schema.block.attribute("id").unwrap();
    assert!(id.computed && !id.optional && !id.required);

    let tags_all = schema.block.attribute("tags_all").unwrap();
    assert!(tags_all.computed);

    assert_eq!(schema.block.block_types.len(), 1);
    assert_eq!(schema.block.block_types[0].type_name, "timeouts");
}

#[tokio::test]
async fn validate_rejects_bad_message_type() {
    let server = Server::new_async().await;
    let resource = configured_resource(&server).await;

    let mut config = pool_config(&[SENDER_ID_US]);
    let _ = config.set_string(&AttributePath::new("message_type"), "BULK".to_string());

    let response = resource
        .validate(
            Context::new(),
            ValidateResourceConfigRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                config,
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert!(response.diagnostics[0].summary.contains("message_type"));
}

#[tokio::test]
async fn validate_rejects_empty_identity_set() {
    let server = Server::new_async().await;
    let resource = configured_resource(&server).await;

    let response = resource
        .validate(
            Context::new(),
            ValidateResourceConfigRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                config: pool_config(&[]),
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert!(response.diagnostics[0]
        .summary
        .contains("origination_identities"));
}

#[tokio::test]
async fn validate_requires_two_way_enabled_for_channel_arn() {
    let server = Server::new_async().await;
    let resource = configured_resource(&server).await;

    let mut config = pool_config(&[SENDER_ID_US]);
    let _ = config.set_string(
        &AttributePath::new("two_way_channel_arn"),
        "arn:aws:connect:us-east-1:123456789012:instance/chan".to_string(),
    );

    let response = resource
        .validate(
            Context::new(),
            ValidateResourceConfigRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                config,
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert!(response.diagnostics[0]
        .detail
        .contains("two_way_channel_enabled"));
}

#[tokio::test]
async fn create_seeds_waits_associates_and_updates() {
    let mut server = Server::new_async().await;

    let create = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.CreatePool")
        .match_body(Matcher::PartialJson(json!({
            "OriginationIdentity": SENDER_ID_US,
            "IsoCountryCode": "US",
            "MessageType": "TRANSACTIONAL",
        })))
        .with_status(200)
        .with_body(CREATING_POOL_BODY)
        .create_async()
        .await;
    let describe = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.DescribePools")
        .with_status(200)
        .with_body(format!(r#"{{"Pools":[{}]}}"#, POOL_BODY))
        .create_async()
        .await;
    let associate = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.AssociateOriginationIdentity",
        )
        .match_body(Matcher::PartialJson(json!({
            "OriginationIdentity": SENDER_ID_GB,
            "IsoCountryCode": "GB",
            "PoolId": "pool-123",
        })))
        .with_status(200)
        .with_body(r#"{"PoolId":"pool-123"}"#)
        .create_async()
        .await;
    let update = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.UpdatePool")
        .match_body(Matcher::PartialJson(json!({"PoolId": "pool-123"})))
        .with_status(200)
        .with_body(POOL_BODY)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;
    let config = pool_config(&[SENDER_ID_US, SENDER_ID_GB]);

    let response = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                planned_state: config.clone(),
                config,
            },
        )
        .await;

    assert!(
        response.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        response.diagnostics
    );
    assert_eq!(
        response
            .new_state
            .get_string(&AttributePath::new("id"))
            .unwrap(),
        "pool-123"
    );
    assert_eq!(
        response
            .new_state
            .get_string(&AttributePath::new("arn"))
            .unwrap(),
        POOL_ARN
    );
    let identities = response
        .new_state
        .get_string_list(&AttributePath::new("origination_identities"))
        .unwrap();
    assert_eq!(identities, vec![SENDER_ID_US, SENDER_ID_GB]);

    create.assert_async().await;
    describe.assert_async().await;
    associate.assert_async().await;
    update.assert_async().await;
}

#[tokio::test]
async fn create_resolves_phone_number_country_remotely() {
    let mut server = Server::new_async().await;
    let phone_arn = "arn:aws:sms-voice:us-east-1:123456789012:phone-number/pn-1";

    let lookup = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.DescribePhoneNumbers")
        .match_body(Matcher::PartialJson(json!({"PhoneNumberIds": [phone_arn]})))
        .with_status(200)
        .with_body(
            r#"{"PhoneNumbers":[{"PhoneNumberArn":"arn:aws:sms-voice:us-east-1:123456789012:phone-number/pn-1","PhoneNumber":"+12065550100","IsoCountryCode":"US"}]}"#,
        )
        .create_async()
        .await;
    let create = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.CreatePool")
        .match_body(Matcher::PartialJson(json!({"IsoCountryCode": "US"})))
        .with_status(200)
        .with_body(CREATING_POOL_BODY)
        .create_async()
        .await;
    let _describe = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.DescribePools")
        .with_status(200)
        .with_body(format!(r#"{{"Pools":[{}]}}"#, POOL_BODY))
        .create_async()
        .await;
    let _update = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.UpdatePool")
        .with_status(200)
        .with_body(POOL_BODY)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;
    let config = pool_config(&[phone_arn]);

    let response = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                planned_state: config.clone(),
                config,
            },
        )
        .await;

    assert!(
        response.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        response.diagnostics
    );
    lookup.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn create_surfaces_service_rejection() {
    let mut server = Server::new_async().await;
    let _create = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.CreatePool")
        .with_status(400)
        .with_body(r#"{"__type":"ValidationException","message":"bad origination identity"}"#)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;
    let config = pool_config(&[SENDER_ID_US]);

    let response = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                planned_state: config.clone(),
                config,
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert!(response.diagnostics[0].summary.contains("creating"));
    assert!(response.diagnostics[0].detail.contains("bad origination identity"));
}

#[tokio::test]
async fn read_flattens_pool_and_remote_tags() {
    let mut server = Server::new_async().await;
    let _describe = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.DescribePools")
        .with_status(200)
        .with_body(format!(r#"{{"Pools":[{}]}}"#, POOL_BODY))
        .create_async()
        .await;
    let _identities = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.ListPoolOriginationIdentities",
        )
        .with_status(200)
        .with_body(format!(
            r#"{{"OriginationIdentities":[{{"OriginationIdentityArn":"{}","OriginationIdentity":"SENDER","IsoCountryCode":"US"}}]}}"#,
            SENDER_ID_US
        ))
        .create_async()
        .await;
    let _tags = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.ListTagsForResource")
        .with_status(200)
        .with_body(r#"{"Tags":[{"Key":"env","Value":"prod"}]}"#)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let response = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                current_state: pool_state(&[SENDER_ID_US]),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    let state = response.new_state.expect("state should survive read");
    assert_eq!(
        state.get_string(&AttributePath::new("opt_out_list_name")).unwrap(),
        "Default"
    );
    let identities = state
        .get_string_list(&AttributePath::new("origination_identities"))
        .unwrap();
    assert_eq!(identities, vec![SENDER_ID_US]);
    let tags_all = state.get_map(&AttributePath::new("tags_all")).unwrap();
    assert_eq!(
        tags_all.get("env"),
        Some(&Dynamic::String("prod".to_string()))
    );
}

#[tokio::test]
async fn read_removes_missing_pool_from_state() {
    let mut server = Server::new_async().await;
    let _describe = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.DescribePools")
        .with_status(400)
        .with_body(
            r#"{"__type":"com.amazonaws.smsvoice#ResourceNotFoundException","message":"no such pool"}"#,
        )
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let response = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                current_state: pool_state(&[SENDER_ID_US]),
            },
        )
        .await;

    assert!(response.new_state.is_none());
    assert_eq!(response.diagnostics.len(), 1);
    assert!(matches!(
        response.diagnostics[0].severity,
        tfplug::types::DiagnosticSeverity::Warning
    ));
}

#[tokio::test]
async fn update_applies_changed_settings() {
    let mut server = Server::new_async().await;
    let update = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.UpdatePool")
        .match_body(Matcher::PartialJson(json!({
            "PoolId": "pool-123",
            "DeletionProtectionEnabled": true,
        })))
        .with_status(200)
        .with_body(POOL_BODY)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let prior = pool_state(&[SENDER_ID_US]);
    let mut planned = pool_state(&[SENDER_ID_US]);
    let _ = planned.set_bool(&AttributePath::new("deletion_protection_enabled"), true);

    let response = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                prior_state: prior,
                planned_state: planned.clone(),
                config: planned,
            },
        )
        .await;

    assert!(
        response.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        response.diagnostics
    );
    update.assert_async().await;
}

#[tokio::test]
async fn update_reconciles_pool_membership() {
    let mut server = Server::new_async().await;
    let associate = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.AssociateOriginationIdentity",
        )
        .match_body(Matcher::PartialJson(json!({
            "OriginationIdentity": SENDER_ID_GB,
            "IsoCountryCode": "GB",
        })))
        .with_status(200)
        .with_body(r#"{"PoolId":"pool-123"}"#)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let prior = pool_state(&[SENDER_ID_US]);
    let planned = pool_state(&[SENDER_ID_US, SENDER_ID_GB]);

    let response = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                prior_state: prior,
                planned_state: planned.clone(),
                config: planned,
            },
        )
        .await;

    assert!(
        response.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        response.diagnostics
    );
    associate.assert_async().await;
}

#[tokio::test]
async fn update_disassociates_removed_identities() {
    let mut server = Server::new_async().await;
    let disassociate = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.DisassociateOriginationIdentity",
        )
        .match_body(Matcher::PartialJson(json!({
            "OriginationIdentity": SENDER_ID_GB,
            "IsoCountryCode": "GB",
        })))
        .with_status(200)
        .with_body(r#"{"PoolId":"pool-123"}"#)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let prior = pool_state(&[SENDER_ID_US, SENDER_ID_GB]);
    let planned = pool_state(&[SENDER_ID_US]);

    let response = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                prior_state: prior,
                planned_state: planned.clone(),
                config: planned,
            },
        )
        .await;

    assert!(
        response.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        response.diagnostics
    );
    disassociate.assert_async().await;
}

#[tokio::test]
async fn update_reconciles_tags() {
    let mut server = Server::new_async().await;
    let tag = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.TagResource")
        .match_body(Matcher::PartialJson(json!({
            "ResourceArn": POOL_ARN,
            "Tags": [{"Key": "env", "Value": "prod"}],
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let prior = pool_state(&[SENDER_ID_US]);
    let mut planned = pool_state(&[SENDER_ID_US]);
    let _ = planned.set_map(
        &AttributePath::new("tags"),
        [("env".to_string(), Dynamic::String("prod".to_string()))]
            .into_iter()
            .collect(),
    );

    let response = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                prior_state: prior,
                planned_state: planned.clone(),
                config: planned,
            },
        )
        .await;

    assert!(
        response.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        response.diagnostics
    );
    tag.assert_async().await;
}

#[tokio::test]
async fn delete_waits_until_pool_is_gone() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.DeletePool")
        .match_body(Matcher::PartialJson(json!({"PoolId": "pool-123"})))
        .with_status(200)
        .with_body(r#"{"PoolId":"pool-123","Status":"DELETING"}"#)
        .create_async()
        .await;
    let describe = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.DescribePools")
        .with_status(200)
        .with_body(r#"{"Pools":[]}"#)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let response = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                prior_state: pool_state(&[SENDER_ID_US]),
            },
        )
        .await;

    assert!(
        response.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        response.diagnostics
    );
    delete.assert_async().await;
    describe.assert_async().await;
}

#[tokio::test]
async fn delete_treats_missing_pool_as_success() {
    let mut server = Server::new_async().await;
    let _delete = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.DeletePool")
        .with_status(400)
        .with_body(
            r#"{"__type":"com.amazonaws.smsvoice#ResourceNotFoundException","message":"no such pool"}"#,
        )
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let response = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                prior_state: pool_state(&[SENDER_ID_US]),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
}

#[tokio::test]
async fn import_builds_full_state_from_remote() {
    let mut server = Server::new_async().await;
    let _describe = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.DescribePools")
        .with_status(200)
        .with_body(format!(r#"{{"Pools":[{}]}}"#, POOL_BODY))
        .create_async()
        .await;
    let _identities = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.ListPoolOriginationIdentities",
        )
        .with_status(200)
        .with_body(format!(
            r#"{{"OriginationIdentities":[{{"OriginationIdentityArn":"{}","OriginationIdentity":"SENDER","IsoCountryCode":"US"}}]}}"#,
            SENDER_ID_US
        ))
        .create_async()
        .await;
    let _tags = server
        .mock("POST", "/")
        .match_header("x-amz-target", "PinpointSMSVoiceV2.ListTagsForResource")
        .with_status(200)
        .with_body(r#"{"Tags":[]}"#)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let response = resource
        .import_state(
            Context::new(),
            ImportResourceStateRequest {
                type_name: "smsvoice_phone_pool".to_string(),
                id: "pool-123".to_string(),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    assert_eq!(response.imported_resources.len(), 1);
    let state = &response.imported_resources[0].state;
    assert_eq!(
        state.get_string(&AttributePath::new("id")).unwrap(),
        "pool-123"
    );
    assert_eq!(
        state
            .get_string(&AttributePath::new("message_type"))
            .unwrap(),
        "TRANSACTIONAL"
    );
}

#[test]
fn sender_id_predicate_matches_only_sender_ids() {
    assert!(is_sender_id(SENDER_ID_US));
    assert!(!is_sender_id(
        "arn:aws:sms-voice:us-east-1:123456789012:phone-number/pn-1"
    ));
}

#[test]
fn sender_id_country_code_is_arn_suffix() {
    assert_eq!(sender_id_country_code(SENDER_ID_US).unwrap(), "US");
    assert_eq!(sender_id_country_code(SENDER_ID_GB).unwrap(), "GB");
    assert!(sender_id_country_code("arn:aws:sms-voice:us-east-1:123456789012:phone-number/pn-1").is_err());
}

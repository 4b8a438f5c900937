use super::*;
use crate::api::test_helpers::{test_client, PROTECT_CONFIGURATION_BODY};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;

const CONFIGURATION_ARN: &str =
    "arn:aws:sms-voice:us-east-1:123456789012:protect-configuration/pc-123";

async fn configured_resource(server: &ServerGuard) -> ProtectConfigurationResource {
    let mut resource = ProtectConfigurationResource::new();
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

fn configuration_state(account_default: bool) -> DynamicValue {
    let mut state = DynamicValue::empty();
    let _ = state.set_string(&AttributePath::new("id"), "pc-123".to_string());
    let _ = state.set_string(&AttributePath::new("arn"), CONFIGURATION_ARN.to_string());
    let _ = state.set_bool(&AttributePath::new("account_default"), account_default);
    let _ = state.set_bool(&AttributePath::new("deletion_protection_enabled"), false);
    state
}

#[test]
fn schema_marks_expected_attributes() {
    let schema = ProtectConfigurationResource::schema_static();

    for name in ["account_default", "deletion_protection_enabled"] {
        let attr = schema.block.attribute(name).unwrap();
        assert!(attr.optional, "{} should be optional", name);
        assert!(attr.computed, "{} should be computed", name);
        assert!(attr.default.is_some(), "{} should carry a default", name);
    }

    assert!(schema.block.attribute("id").unwrap().computed);
    assert!(schema.block.attribute("arn").unwrap().computed);
    assert!(schema.block.attribute("tags_all").unwrap().computed);
    // Create is synchronous, so the schema carries no timeouts block
    assert!(schema.block.block_types.is_empty());
}

#[tokio::test]
async fn create_returns_state_from_service_response() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.CreateProtectConfiguration",
        )
        .match_body(Matcher::PartialJson(
            json!({"DeletionProtectionEnabled": false}),
        ))
        .with_status(200)
        .with_body(PROTECT_CONFIGURATION_BODY)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;
    let config = DynamicValue::empty();

    let response = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "smsvoice_protect_configuration".to_string(),
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
        "pc-123"
    );
    assert!(!response
        .new_state
        .get_bool(&AttributePath::new("account_default"))
        .unwrap());
    create.assert_async().await;
}

#[tokio::test]
async fn create_promotes_account_default_when_requested() {
    let mut server = Server::new_async().await;
    let _create = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.CreateProtectConfiguration",
        )
        .with_status(200)
        .with_body(PROTECT_CONFIGURATION_BODY)
        .create_async()
        .await;
    let promote = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.SetAccountDefaultProtectConfiguration",
        )
        .match_body(Matcher::PartialJson(
            json!({"ProtectConfigurationId": "pc-123"}),
        ))
        .with_status(200)
        .with_body(r#"{"DefaultProtectConfigurationId":"pc-123"}"#)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;
    let mut config = DynamicValue::empty();
    let _ = config.set_bool(&AttributePath::new("account_default"), true);

    let response = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "smsvoice_protect_configuration".to_string(),
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
    assert!(response
        .new_state
        .get_bool(&AttributePath::new("account_default"))
        .unwrap());
    promote.assert_async().await;
}

#[tokio::test]
async fn read_flattens_remote_configuration() {
    let mut server = Server::new_async().await;
    let _describe = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.DescribeProtectConfigurations",
        )
        .with_status(200)
        .with_body(format!(
            r#"{{"ProtectConfigurations":[{}]}}"#,
            PROTECT_CONFIGURATION_BODY
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
                type_name: "smsvoice_protect_configuration".to_string(),
                current_state: configuration_state(false),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    let state = response.new_state.expect("state should survive read");
    assert_eq!(
        state.get_string(&AttributePath::new("arn")).unwrap(),
        CONFIGURATION_ARN
    );
    let tags_all = state.get_map(&AttributePath::new("tags_all")).unwrap();
    assert_eq!(
        tags_all.get("env"),
        Some(&Dynamic::String("prod".to_string()))
    );
}

#[tokio::test]
async fn read_removes_missing_configuration_from_state() {
    let mut server = Server::new_async().await;
    let _describe = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.DescribeProtectConfigurations",
        )
        .with_status(200)
        .with_body(r#"{"ProtectConfigurations":[]}"#)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let response = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "smsvoice_protect_configuration".to_string(),
                current_state: configuration_state(false),
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
async fn update_applies_deletion_protection_change() {
    let mut server = Server::new_async().await;
    let update = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.UpdateProtectConfiguration",
        )
        .match_body(Matcher::PartialJson(json!({
            "ProtectConfigurationId": "pc-123",
            "DeletionProtectionEnabled": true,
        })))
        .with_status(200)
        .with_body(PROTECT_CONFIGURATION_BODY)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let prior = configuration_state(false);
    let mut planned = configuration_state(false);
    let _ = planned.set_bool(&AttributePath::new("deletion_protection_enabled"), true);

    let response = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "smsvoice_protect_configuration".to_string(),
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
async fn update_promotes_account_default() {
    let mut server = Server::new_async().await;
    let promote = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.SetAccountDefaultProtectConfiguration",
        )
        .with_status(200)
        .with_body(r#"{"DefaultProtectConfigurationId":"pc-123"}"#)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let prior = configuration_state(false);
    let planned = configuration_state(true);

    let response = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "smsvoice_protect_configuration".to_string(),
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
    promote.assert_async().await;
}

#[tokio::test]
async fn update_rejects_account_default_demotion() {
    // No mocks: the rejection must happen before any remote call
    let server = Server::new_async().await;
    let resource = configured_resource(&server).await;

    let prior = configuration_state(true);
    let planned = configuration_state(false);

    let response = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "smsvoice_protect_configuration".to_string(),
                prior_state: prior,
                planned_state: planned.clone(),
                config: planned,
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert!(response.diagnostics[0]
        .summary
        .contains("account_default"));
}

#[tokio::test]
async fn delete_issues_delete_call() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.DeleteProtectConfiguration",
        )
        .match_body(Matcher::PartialJson(
            json!({"ProtectConfigurationId": "pc-123"}),
        ))
        .with_status(200)
        .with_body(PROTECT_CONFIGURATION_BODY)
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let response = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "smsvoice_protect_configuration".to_string(),
                prior_state: configuration_state(false),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    delete.assert_async().await;
}

#[tokio::test]
async fn delete_treats_missing_configuration_as_success() {
    let mut server = Server::new_async().await;
    let _delete = server
        .mock("POST", "/")
        .with_status(400)
        .with_body(
            r#"{"__type":"com.amazonaws.smsvoice#ResourceNotFoundException","message":"gone"}"#,
        )
        .create_async()
        .await;

    let resource = configured_resource(&server).await;

    let response = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "smsvoice_protect_configuration".to_string(),
                prior_state: configuration_state(false),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
}

#[tokio::test]
async fn import_builds_state_from_remote() {
    let mut server = Server::new_async().await;
    let _describe = server
        .mock("POST", "/")
        .match_header(
            "x-amz-target",
            "PinpointSMSVoiceV2.DescribeProtectConfigurations",
        )
        .with_status(200)
        .with_body(format!(
            r#"{{"ProtectConfigurations":[{}]}}"#,
            PROTECT_CONFIGURATION_BODY
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
                type_name: "smsvoice_protect_configuration".to_string(),
                id: "pc-123".to_string(),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    assert_eq!(response.imported_resources.len(), 1);
    assert_eq!(
        response.imported_resources[0]
            .state
            .get_string(&AttributePath::new("id"))
            .unwrap(),
        "pc-123"
    );
}

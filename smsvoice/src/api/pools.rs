//! Phone pool operations
//!
//! A pool groups origination identities (phone numbers and sender IDs)
//! behind one routing configuration. Pools are created from a seed
//! identity and move CREATING -> ACTIVE; deletion moves ACTIVE ->
//! DELETING until the pool disappears from describe results.

use serde::{Deserialize, Serialize};

use super::common::Tag;
use super::error::ApiError;
use super::Client;

pub const POOL_STATUS_CREATING: &str = "CREATING";
pub const POOL_STATUS_ACTIVE: &str = "ACTIVE";
pub const POOL_STATUS_DELETING: &str = "DELETING";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePoolRequest {
    pub client_token: String,
    pub origination_identity: String,
    /// The service requires one country code at creation time
    pub iso_country_code: String,
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_protection_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoolInformation {
    pub pool_arn: String,
    pub pool_id: String,
    pub status: String,
    pub message_type: String,
    #[serde(default)]
    pub two_way_enabled: bool,
    #[serde(default)]
    pub two_way_channel_arn: Option<String>,
    #[serde(default)]
    pub two_way_channel_role: Option<String>,
    #[serde(default)]
    pub self_managed_opt_outs_enabled: bool,
    #[serde(default)]
    pub opt_out_list_name: String,
    #[serde(default)]
    pub shared_routes_enabled: bool,
    #[serde(default)]
    pub deletion_protection_enabled: bool,
    #[serde(default)]
    pub created_timestamp: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribePoolsRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pool_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribePoolsResponse {
    #[serde(default)]
    pub pools: Vec<PoolInformation>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdatePoolRequest {
    pub pool_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_protection_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opt_out_list_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_managed_opt_outs_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_routes_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_way_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_way_channel_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_way_channel_role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeletePoolRequest {
    pub pool_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeletePoolResponse {
    #[serde(default)]
    pub pool_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssociateOriginationIdentityRequest {
    pub client_token: String,
    pub iso_country_code: String,
    pub origination_identity: String,
    pub pool_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssociateOriginationIdentityResponse {
    #[serde(default)]
    pub origination_identity: Option<String>,
    #[serde(default)]
    pub pool_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisassociateOriginationIdentityRequest {
    pub client_token: String,
    pub iso_country_code: String,
    pub origination_identity: String,
    pub pool_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisassociateOriginationIdentityResponse {
    #[serde(default)]
    pub origination_identity: Option<String>,
    #[serde(default)]
    pub pool_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListPoolOriginationIdentitiesRequest {
    pub pool_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListPoolOriginationIdentitiesResponse {
    #[serde(default)]
    pub origination_identities: Vec<OriginationIdentityMetadata>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginationIdentityMetadata {
    pub origination_identity_arn: String,
    pub origination_identity: String,
    pub iso_country_code: String,
    #[serde(default)]
    pub number_capabilities: Vec<String>,
}

impl Client {
    /// CreatePool - seeds the pool with one origination identity
    pub async fn create_pool(
        &self,
        request: &CreatePoolRequest,
    ) -> Result<PoolInformation, ApiError> {
        self.post("CreatePool", request).await
    }

    /// DescribePools - one page
    pub async fn describe_pools(
        &self,
        request: &DescribePoolsRequest,
    ) -> Result<DescribePoolsResponse, ApiError> {
        self.post("DescribePools", request).await
    }

    /// UpdatePool
    pub async fn update_pool(
        &self,
        request: &UpdatePoolRequest,
    ) -> Result<PoolInformation, ApiError> {
        self.post("UpdatePool", request).await
    }

    /// DeletePool
    pub async fn delete_pool(&self, pool_id: &str) -> Result<DeletePoolResponse, ApiError> {
        self.post(
            "DeletePool",
            &DeletePoolRequest {
                pool_id: pool_id.to_string(),
            },
        )
        .await
    }

    /// AssociateOriginationIdentity
    pub async fn associate_origination_identity(
        &self,
        request: &AssociateOriginationIdentityRequest,
    ) -> Result<AssociateOriginationIdentityResponse, ApiError> {
        self.post("AssociateOriginationIdentity", request).await
    }

    /// DisassociateOriginationIdentity
    pub async fn disassociate_origination_identity(
        &self,
        request: &DisassociateOriginationIdentityRequest,
    ) -> Result<DisassociateOriginationIdentityResponse, ApiError> {
        self.post("DisassociateOriginationIdentity", request).await
    }

    /// ListPoolOriginationIdentities, draining pagination
    pub async fn list_pool_origination_identities(
        &self,
        pool_id: &str,
    ) -> Result<Vec<OriginationIdentityMetadata>, ApiError> {
        let mut identities = Vec::new();
        let mut next_token = None;

        loop {
            let page: ListPoolOriginationIdentitiesResponse = self
                .post(
                    "ListPoolOriginationIdentities",
                    &ListPoolOriginationIdentitiesRequest {
                        pool_id: pool_id.to_string(),
                        next_token: next_token.take(),
                        max_results: None,
                    },
                )
                .await?;

            identities.extend(page.origination_identities);

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(identities)
    }

    /// Find a single pool by id, draining pagination. An empty result set
    /// reports NotFound, same as the service's explicit error.
    pub async fn find_pool_by_id(&self, pool_id: &str) -> Result<PoolInformation, ApiError> {
        let mut next_token = None;

        loop {
            let page = self
                .describe_pools(&DescribePoolsRequest {
                    pool_ids: vec![pool_id.to_string()],
                    next_token: next_token.take(),
                    max_results: None,
                })
                .await?;

            if let Some(pool) = page.pools.into_iter().find(|p| p.pool_id == pool_id) {
                return Ok(pool);
            }

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Err(ApiError::NotFound(format!("pool {} not found", pool_id)))
    }
}

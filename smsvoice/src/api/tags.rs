//! Resource tagging operations and tag reconciliation helpers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::common::Tag;
use super::error::ApiError;
use super::Client;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForResourceRequest {
    pub resource_arn: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForResourceResponse {
    #[serde(default)]
    pub resource_arn: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagResourceRequest {
    pub resource_arn: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UntagResourceRequest {
    pub resource_arn: String,
    pub tag_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmptyOutput {}

impl Client {
    /// ListTagsForResource
    pub async fn list_tags_for_resource(
        &self,
        resource_arn: &str,
    ) -> Result<Vec<Tag>, ApiError> {
        let response: ListTagsForResourceResponse = self
            .post(
                "ListTagsForResource",
                &ListTagsForResourceRequest {
                    resource_arn: resource_arn.to_string(),
                },
            )
            .await?;
        Ok(response.tags)
    }

    /// TagResource
    pub async fn tag_resource(
        &self,
        resource_arn: &str,
        tags: Vec<Tag>,
    ) -> Result<(), ApiError> {
        let _: EmptyOutput = self
            .post(
                "TagResource",
                &TagResourceRequest {
                    resource_arn: resource_arn.to_string(),
                    tags,
                },
            )
            .await?;
        Ok(())
    }

    /// UntagResource
    pub async fn untag_resource(
        &self,
        resource_arn: &str,
        tag_keys: Vec<String>,
    ) -> Result<(), ApiError> {
        let _: EmptyOutput = self
            .post(
                "UntagResource",
                &UntagResourceRequest {
                    resource_arn: resource_arn.to_string(),
                    tag_keys,
                },
            )
            .await?;
        Ok(())
    }

    /// Bring a resource's remote tags in line with the desired map
    pub async fn reconcile_tags(
        &self,
        resource_arn: &str,
        old: &HashMap<String, String>,
        new: &HashMap<String, String>,
    ) -> Result<(), ApiError> {
        let (to_set, to_remove) = tag_diff(old, new);

        if !to_remove.is_empty() {
            self.untag_resource(resource_arn, to_remove).await?;
        }
        if !to_set.is_empty() {
            self.tag_resource(resource_arn, to_set).await?;
        }

        Ok(())
    }
}

/// Tags to upsert and keys to remove to move from `old` to `new`, sorted
/// for stable request bodies.
pub fn tag_diff(
    old: &HashMap<String, String>,
    new: &HashMap<String, String>,
) -> (Vec<Tag>, Vec<String>) {
    let mut to_set: Vec<Tag> = new
        .iter()
        .filter(|(key, value)| old.get(*key) != Some(*value))
        .map(|(key, value)| Tag {
            key: key.clone(),
            value: value.clone(),
        })
        .collect();
    to_set.sort_by(|a, b| a.key.cmp(&b.key));

    let mut to_remove: Vec<String> = old
        .keys()
        .filter(|key| !new.contains_key(*key))
        .cloned()
        .collect();
    to_remove.sort();

    (to_set, to_remove)
}

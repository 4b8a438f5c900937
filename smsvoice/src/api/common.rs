//! Common types shared across service operations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key/value tag as the service represents it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Convert a tag map into the service's list-of-pairs shape, sorted by key
/// for stable request bodies.
pub fn tags_from_map(map: &HashMap<String, String>) -> Vec<Tag> {
    let mut tags: Vec<Tag> = map
        .iter()
        .map(|(key, value)| Tag {
            key: key.clone(),
            value: value.clone(),
        })
        .collect();
    tags.sort_by(|a, b| a.key.cmp(&b.key));
    tags
}

pub fn tags_to_map(tags: &[Tag]) -> HashMap<String, String> {
    tags.iter()
        .map(|tag| (tag.key.clone(), tag.value.clone()))
        .collect()
}

/// Idempotency token for create-style operations
pub fn client_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_map() {
        let mut map = HashMap::new();
        map.insert("env".to_string(), "prod".to_string());
        map.insert("team".to_string(), "messaging".to_string());

        let tags = tags_from_map(&map);
        assert_eq!(tags.len(), 2);
        // Sorted by key
        assert_eq!(tags[0].key, "env");
        assert_eq!(tags[1].key, "team");

        assert_eq!(tags_to_map(&tags), map);
    }

    #[test]
    fn client_tokens_are_unique() {
        assert_ne!(client_token(), client_token());
    }
}

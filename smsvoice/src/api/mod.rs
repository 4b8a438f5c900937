//! API client for AWS End User Messaging SMS and Voice
//!
//! One signed JSON 1.0 client plus typed request/response structs per
//! operation family. Find helpers drain pagination and normalize "absent"
//! into [`ApiError::NotFound`].

pub mod client;
pub mod common;
pub mod error;
pub mod phone_numbers;
pub mod pools;
pub mod protect_configurations;
pub mod signing;
pub mod tags;

#[cfg(test)]
pub mod test_helpers;

pub use client::{Client, RetryConfig};
pub use common::{client_token, tags_from_map, tags_to_map, Tag};
pub use error::ApiError;
pub use phone_numbers::PhoneNumberInformation;
pub use pools::{
    AssociateOriginationIdentityRequest, CreatePoolRequest, DisassociateOriginationIdentityRequest,
    OriginationIdentityMetadata, PoolInformation, UpdatePoolRequest, POOL_STATUS_ACTIVE,
    POOL_STATUS_CREATING, POOL_STATUS_DELETING,
};
pub use protect_configurations::{
    CreateProtectConfigurationRequest, ProtectConfigurationInformation,
    UpdateProtectConfigurationRequest,
};
pub use signing::{Credentials, SigV4Signer};
pub use tags::tag_diff;

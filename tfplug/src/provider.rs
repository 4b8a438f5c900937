//! Provider trait
//!
//! A provider owns the remote-service connection and acts as the factory
//! for its resources. The host configures the provider once per session,
//! then asks it for resources by type name and hands each one the
//! provider data via ResourceWithConfigure.

use crate::context::Context;
use crate::error::Result;
use crate::resource::ResourceWithConfigure;
use crate::schema::Schema;
use crate::types::{Diagnostic, DynamicValue};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider type name, the prefix of its resource type names
    fn type_name(&self) -> &str;

    /// Schema for the provider's own configuration block
    async fn schema(&self, ctx: Context) -> Schema;

    /// Called once with the provider configuration before any resource
    /// operation. Builds clients and stashes them as provider data.
    async fn configure(
        &mut self,
        ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse;

    /// Instantiate a resource by type name. Resources come back
    /// unconfigured; the host passes provider data through
    /// ResourceWithConfigure before dispatching lifecycle calls.
    async fn create_resource(&self, type_name: &str) -> Result<Box<dyn ResourceWithConfigure>>;

    /// Schemas for all resource types, keyed by type name
    async fn resource_schemas(&self) -> HashMap<String, Schema>;

    /// Data handed to each resource's configure call
    fn provider_data(&self) -> Option<Arc<dyn Any + Send + Sync>>;
}

pub struct ConfigureProviderRequest {
    pub config: DynamicValue,
}

pub struct ConfigureProviderResponse {
    pub diagnostics: Vec<Diagnostic>,
}

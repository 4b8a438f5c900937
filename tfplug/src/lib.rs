//! tfplug - the provider-facing surface of a Terraform plugin framework
//!
//! This crate carries the types a provider implements against: declarative
//! schemas, the resource lifecycle traits, the dynamic value model that
//! state and configuration travel in, and the small helpers (defaults,
//! validators, plan modifiers, timeouts, import) that resources compose.
//!
//! The plugin wire protocol itself (handshake, RPC dispatch, state diffing)
//! lives in the host that links this crate; providers never touch it. A
//! provider's obligations end at [`provider::Provider`] and
//! [`resource::Resource`].

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod provider;
pub mod resource;

// Helper modules
pub mod defaults;
pub mod import;
pub mod plan_modifier;
pub mod timeouts;
pub mod validator;

// Re-exports for convenience
pub use context::Context;
pub use error::{Result, TfplugError};
pub use import::import_state_passthrough_id;
pub use provider::{ConfigureProviderRequest, ConfigureProviderResponse, Provider};
pub use resource::{Resource, ResourceWithConfigure, ResourceWithImportState};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use timeouts::Timeouts;
pub use types::{AttributePath, Config, Diagnostic, Dynamic, DynamicValue, State};

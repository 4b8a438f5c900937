//! Default value providers for attributes
//!
//! Default providers are evaluated during the planning phase when an
//! attribute is not set in the configuration. They differ from plan
//! modifiers in that they only run when the value is absent.

use crate::schema::{Default, DefaultRequest, DefaultResponse};
use crate::types::{Dynamic, DynamicValue};

/// StaticDefault provides a static default value
pub struct StaticDefault {
    value: Dynamic,
}

impl StaticDefault {
    /// Create a new static default provider with the given value
    pub fn create(value: Dynamic) -> Box<dyn Default> {
        Box::new(Self { value })
    }

    /// Create a static string default
    pub fn string(value: &str) -> Box<dyn Default> {
        Box::new(Self {
            value: Dynamic::String(value.to_string()),
        })
    }

    /// Create a static number default
    pub fn number(value: f64) -> Box<dyn Default> {
        Box::new(Self {
            value: Dynamic::Number(value),
        })
    }

    /// Create a static boolean default
    pub fn bool(value: bool) -> Box<dyn Default> {
        Box::new(Self {
            value: Dynamic::Bool(value),
        })
    }
}

impl Default for StaticDefault {
    fn description(&self) -> String {
        format!("static default value: {:?}", self.value)
    }

    fn default_value(&self, _request: DefaultRequest) -> DefaultResponse {
        DefaultResponse {
            value: DynamicValue::new(self.value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttributePath;

    #[test]
    fn static_bool_default() {
        let default = StaticDefault::bool(false);
        let response = default.default_value(DefaultRequest {
            path: AttributePath::new("deletion_protection_enabled"),
        });

        assert_eq!(response.value.value, Dynamic::Bool(false));
    }

    #[test]
    fn static_string_default() {
        let default = StaticDefault::string("Default");
        let response = default.default_value(DefaultRequest {
            path: AttributePath::new("opt_out_list_name"),
        });

        assert_eq!(
            response.value.value,
            Dynamic::String("Default".to_string())
        );
    }
}

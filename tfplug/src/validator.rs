//! Built-in validators for common attribute constraints

use crate::schema::{Validator, ValidatorRequest, ValidatorResponse};
use crate::types::{AttributePath, Diagnostic, Dynamic};

/// Requires a set (or list) attribute to contain at least `min` elements.
pub struct SetSizeAtLeast {
    min: usize,
}

impl SetSizeAtLeast {
    pub fn create(min: usize) -> Box<dyn Validator> {
        Box::new(Self { min })
    }
}

impl Validator for SetSizeAtLeast {
    fn description(&self) -> String {
        format!("set must contain at least {} element(s)", self.min)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];

        if let Dynamic::List(items) = &request.config_value.value {
            if items.len() < self.min {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid set size",
                        format!(
                            "Attribute requires at least {} element(s), got {}",
                            self.min,
                            items.len()
                        ),
                    )
                    .with_attribute(request.path),
                );
            }
        }

        ValidatorResponse { diagnostics }
    }
}

/// Requires a string attribute to be one of a fixed set of values.
pub struct OneOf {
    allowed: Vec<String>,
}

impl OneOf {
    pub fn create(allowed: &[&str]) -> Box<dyn Validator> {
        Box::new(Self {
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl Validator for OneOf {
    fn description(&self) -> String {
        format!("value must be one of: {}", self.allowed.join(", "))
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];

        if let Dynamic::String(s) = &request.config_value.value {
            if !self.allowed.iter().any(|a| a == s) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid value",
                        format!(
                            "Value '{}' is not valid; must be one of: {}",
                            s,
                            self.allowed.join(", ")
                        ),
                    )
                    .with_attribute(request.path),
                );
            }
        }

        ValidatorResponse { diagnostics }
    }
}

/// Requires a string attribute to match a regular expression.
pub struct StringPattern {
    pattern: regex::Regex,
    description: String,
}

impl StringPattern {
    pub fn create(pattern: &str, description: &str) -> Box<dyn Validator> {
        Box::new(Self {
            // Patterns are compile-time constants in schema definitions
            pattern: regex::Regex::new(pattern).unwrap_or_else(|e| {
                panic!("invalid validator pattern '{}': {}", pattern, e)
            }),
            description: description.to_string(),
        })
    }
}

impl Validator for StringPattern {
    fn description(&self) -> String {
        format!("value must match {}", self.description)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];

        if let Dynamic::String(s) = &request.config_value.value {
            if !self.pattern.is_match(s) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid value",
                        format!("Value '{}' does not match {}", s, self.description),
                    )
                    .with_attribute(request.path),
                );
            }
        }

        ValidatorResponse { diagnostics }
    }
}

/// Run an attribute's value through a validator, with the path attached.
pub fn validate_value(
    validator: &dyn Validator,
    value: &crate::types::DynamicValue,
    path: AttributePath,
) -> Vec<Diagnostic> {
    validator
        .validate(ValidatorRequest {
            config_value: value.clone(),
            path,
        })
        .diagnostics
}

//! Timeouts block support
//!
//! Resources that perform long-running remote operations accept a
//! `timeouts` block with per-operation durations:
//!
//! ```hcl
//! timeouts {
//!   create = "30m"
//!   update = "30m"
//!   delete = "30m"
//! }
//! ```
//!
//! Durations use Go-style strings: a sequence of integer+unit pairs with
//! units `h`, `m`, `s`, `ms` (e.g. "90s", "1h30m").

use crate::error::{Result, TfplugError};
use crate::schema::{AttributeBuilder, AttributeType, Block, NestedBlock, NestingMode};
use crate::types::{AttributePath, DynamicValue};
use std::time::Duration;

/// Parsed per-operation timeouts for a resource instance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timeouts {
    pub create: Option<Duration>,
    pub update: Option<Duration>,
    pub delete: Option<Duration>,
}

impl Timeouts {
    /// Read the `timeouts` block from a configuration value. A missing
    /// block or missing entries yield None fields; callers supply
    /// per-operation defaults via the *_or accessors.
    pub fn from_config(config: &DynamicValue) -> Result<Self> {
        let mut timeouts = Timeouts::default();

        for (name, slot) in [
            ("create", &mut timeouts.create),
            ("update", &mut timeouts.update),
            ("delete", &mut timeouts.delete),
        ] {
            let path = AttributePath::new("timeouts").attribute(name);
            if let Ok(raw) = config.get_string(&path) {
                *slot = Some(parse_duration(&raw)?);
            }
        }

        Ok(timeouts)
    }

    pub fn create_or(&self, default: Duration) -> Duration {
        self.create.unwrap_or(default)
    }

    pub fn update_or(&self, default: Duration) -> Duration {
        self.update.unwrap_or(default)
    }

    pub fn delete_or(&self, default: Duration) -> Duration {
        self.delete.unwrap_or(default)
    }
}

/// Parse a Go-style duration string such as "30m", "90s" or "1h30m".
pub fn parse_duration(input: &str) -> Result<Duration> {
    let s = input.trim();
    if s.is_empty() {
        return Err(TfplugError::InvalidConfiguration(
            "empty duration string".to_string(),
        ));
    }

    let mut total = Duration::ZERO;
    let mut chars = s.chars().peekable();

    while chars.peek().is_some() {
        let mut digits = String::new();
        while let Some(c) = chars.peek() {
            if c.is_ascii_digit() {
                digits.push(*c);
                chars.next();
            } else {
                break;
            }
        }

        let mut unit = String::new();
        while let Some(c) = chars.peek() {
            if c.is_ascii_alphabetic() {
                unit.push(*c);
                chars.next();
            } else {
                break;
            }
        }

        if digits.is_empty() || unit.is_empty() {
            return Err(TfplugError::InvalidConfiguration(format!(
                "invalid duration '{}'",
                input
            )));
        }

        let value: u64 = digits.parse().map_err(|_| {
            TfplugError::InvalidConfiguration(format!("invalid duration '{}'", input))
        })?;

        total += match unit.as_str() {
            "h" => Duration::from_secs(value * 3600),
            "m" => Duration::from_secs(value * 60),
            "s" => Duration::from_secs(value),
            "ms" => Duration::from_millis(value),
            _ => {
                return Err(TfplugError::InvalidConfiguration(format!(
                    "invalid duration unit '{}' in '{}'",
                    unit, input
                )))
            }
        };
    }

    Ok(total)
}

/// Schema block for `timeouts`, with the listed operations enabled.
pub fn timeouts_block(create: bool, update: bool, delete: bool) -> NestedBlock {
    let mut attributes = Vec::new();

    for (name, enabled) in [("create", create), ("update", update), ("delete", delete)] {
        if enabled {
            attributes.push(
                AttributeBuilder::new(name, AttributeType::String)
                    .optional()
                    .description("Operation timeout, e.g. \"30m\"")
                    .build(),
            );
        }
    }

    NestedBlock {
        type_name: "timeouts".to_string(),
        block: Block {
            version: 0,
            attributes,
            block_types: vec![],
            description: "Per-operation timeouts".to_string(),
            deprecated: false,
        },
        nesting: NestingMode::Single,
        min_items: 0,
        max_items: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes() {
        assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(1800));
    }

    #[test]
    fn parses_compound_durations() {
        assert_eq!(
            parse_duration("1h30m").unwrap(),
            Duration::from_secs(5400)
        );
        assert_eq!(parse_duration("1500ms").unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("30").is_err());
        assert!(parse_duration("m").is_err());
        assert!(parse_duration("30x").is_err());
    }

    #[test]
    fn reads_timeouts_from_config() {
        let mut config = DynamicValue::empty();
        config
            .set_string(
                &AttributePath::new("timeouts").attribute("create"),
                "10m".to_string(),
            )
            .unwrap();

        let timeouts = Timeouts::from_config(&config).unwrap();
        assert_eq!(timeouts.create, Some(Duration::from_secs(600)));
        assert_eq!(timeouts.update, None);
        assert_eq!(
            timeouts.update_or(Duration::from_secs(1800)),
            Duration::from_secs(1800)
        );
    }

    #[test]
    fn invalid_timeout_string_is_an_error() {
        let mut config = DynamicValue::empty();
        config
            .set_string(
                &AttributePath::new("timeouts").attribute("delete"),
                "soon".to_string(),
            )
            .unwrap();

        assert!(Timeouts::from_config(&config).is_err());
    }

    #[test]
    fn timeouts_block_lists_enabled_operations() {
        let block = timeouts_block(true, false, true);
        let names: Vec<&str> = block
            .block
            .attributes
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["create", "delete"]);
    }
}

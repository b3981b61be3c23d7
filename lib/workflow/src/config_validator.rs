//! Validation of node configs against their type's config schema.
//!
//! `validate_node` stops at the first failing field (the contract used by
//! graph validation); `scan_node` reports every failing field for inline
//! feedback. Both run the same per-field rules through `validate_field`.

use crate::error::{FieldError, FieldErrorReason};
use crate::node::{NodeConfig, WorkflowNode};
use crate::node_type::NodeType;
use crate::schema::{FieldSpec, FieldType};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanMode {
    FirstFailure,
    Exhaustive,
}

/// Validates one config field.
///
/// `value` is the raw config value (if any) and `config` the node's full
/// config, against which `showIf` is evaluated.
///
/// # Errors
///
/// Returns the `FieldError` describing the first rule the field breaks.
pub fn validate_field(
    key: &str,
    value: Option<&JsonValue>,
    spec: &FieldSpec,
    config: &NodeConfig,
) -> Result<(), FieldError> {
    if !spec.is_visible(config) {
        return Ok(());
    }

    let fail = |reason: FieldErrorReason| -> Result<(), FieldError> {
        Err(FieldError::new(key, reason))
    };

    let Some(value) = value.filter(|value| !value.is_null()).or(spec.default.as_ref()) else {
        return if spec.required {
            fail(FieldErrorReason::Missing)
        } else {
            Ok(())
        };
    };

    if spec.field_type != FieldType::Boolean && value.as_str().is_some_and(str::is_empty) {
        return if spec.required {
            fail(FieldErrorReason::Empty)
        } else {
            Ok(())
        };
    }

    let checked = match spec.field_type {
        FieldType::Number => check_number(value),
        FieldType::Object => check_structure(value, Shape::Object),
        FieldType::Array => check_structure(value, Shape::Array),
        FieldType::Code if spec.is_structured_code() => check_structure(value, Shape::Any),
        FieldType::String => check_enum(value, spec),
        FieldType::Boolean | FieldType::Code => Ok(()),
    };
    checked.map_err(|reason| FieldError::new(key, reason))
}

/// Validates a node's config, stopping at the first failing field.
///
/// Fields are checked in schema declaration order.
///
/// # Errors
///
/// Returns the first failing field.
pub fn validate_node(node: &WorkflowNode, node_type: &NodeType) -> Result<(), FieldError> {
    match run(node, node_type, ScanMode::FirstFailure).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Validates every field of a node's config, returning all failures in
/// schema declaration order.
#[must_use]
pub fn scan_node(node: &WorkflowNode, node_type: &NodeType) -> Vec<FieldError> {
    run(node, node_type, ScanMode::Exhaustive)
}

fn run(node: &WorkflowNode, node_type: &NodeType, mode: ScanMode) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for (key, spec) in node_type.config_schema.iter() {
        if let Err(error) = validate_field(key, node.config.get(key), spec, &node.config) {
            errors.push(error);
            if mode == ScanMode::FirstFailure {
                break;
            }
        }
    }
    errors
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Object,
    Array,
    Any,
}

impl Shape {
    fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::Any => "value",
        }
    }

    fn matches(self, value: &JsonValue) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Any => true,
        }
    }
}

fn check_number(value: &JsonValue) -> Result<(), FieldErrorReason> {
    let finite = match value {
        JsonValue::Number(number) => number.as_f64().is_some_and(f64::is_finite),
        JsonValue::String(text) => text.trim().parse::<f64>().is_ok_and(f64::is_finite),
        _ => false,
    };
    if finite {
        Ok(())
    } else {
        Err(FieldErrorReason::NotANumber)
    }
}

/// Structured values may arrive already decoded or as JSON text.
fn check_structure(value: &JsonValue, shape: Shape) -> Result<(), FieldErrorReason> {
    let wrong_shape = || FieldErrorReason::WrongShape {
        expected: shape.name().to_string(),
    };

    match value {
        JsonValue::String(text) => {
            let parsed: JsonValue =
                serde_json::from_str(text).map_err(|e| FieldErrorReason::MalformedStructure {
                    expected: shape.name().to_string(),
                    detail: e.to_string(),
                })?;
            if shape.matches(&parsed) {
                Ok(())
            } else {
                Err(wrong_shape())
            }
        }
        other if shape.matches(other) => Ok(()),
        _ => Err(wrong_shape()),
    }
}

fn check_enum(value: &JsonValue, spec: &FieldSpec) -> Result<(), FieldErrorReason> {
    match (&spec.allowed, value.as_str()) {
        (Some(allowed), Some(text)) if !allowed.iter().any(|candidate| candidate == text) => {
            Err(FieldErrorReason::NotInEnum {
                allowed: allowed.clone(),
            })
        }
        _ => Ok(()),
    }
}

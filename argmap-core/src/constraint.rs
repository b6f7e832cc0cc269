//! Declarative per-field constraints.
//!
//! A constraint is one arm of a closed sum type; dispatch is a match, run in
//! declaration order by the container, stopping at the first failure. Each
//! check receives the field's metadata and its current value and answers with
//! the message to record, never with a panic or an escaping error.

use crate::field::FieldMeta;
use crate::value::Value;
use std::fmt;

/// Signature for caller-supplied checks.
pub type CustomCheck = Box<dyn Fn(&FieldMeta, Option<&Value>) -> Result<(), String>>;

/// A validation constraint attached to a single field.
pub enum Constraint {
    /// Numeric lower bound; passes when `bound <= value`.
    MinValue { bound: Value, message: String },
    /// Numeric upper bound; passes when `value <= bound`.
    MaxValue { bound: Value, message: String },
    /// Minimum string length, un-trimmed.
    MinStringLength { bound: usize, message: String },
    /// Maximum string length, un-trimmed.
    MaxStringLength { bound: usize, message: String },
    /// Free-form caller-supplied check.
    Custom { name: String, check: CustomCheck },
}

impl Constraint {
    pub fn min_value(bound: Value, message: impl Into<String>) -> Self {
        Constraint::MinValue {
            bound,
            message: message.into(),
        }
    }

    pub fn max_value(bound: Value, message: impl Into<String>) -> Self {
        Constraint::MaxValue {
            bound,
            message: message.into(),
        }
    }

    pub fn min_string_length(bound: usize, message: impl Into<String>) -> Self {
        Constraint::MinStringLength {
            bound,
            message: message.into(),
        }
    }

    pub fn max_string_length(bound: usize, message: impl Into<String>) -> Self {
        Constraint::MaxStringLength {
            bound,
            message: message.into(),
        }
    }

    pub fn custom(
        name: impl Into<String>,
        check: impl Fn(&FieldMeta, Option<&Value>) -> Result<(), String> + 'static,
    ) -> Self {
        Constraint::Custom {
            name: name.into(),
            check: Box::new(check),
        }
    }

    fn display_name(&self) -> &str {
        match self {
            Constraint::MinValue { .. } => "MinValue",
            Constraint::MaxValue { .. } => "MaxValue",
            Constraint::MinStringLength { .. } => "MinStringLength",
            Constraint::MaxStringLength { .. } => "MaxStringLength",
            Constraint::Custom { name, .. } => name,
        }
    }

    /// Run the check. `Err` carries the message to record on the field.
    pub(crate) fn apply(&self, meta: &FieldMeta, value: Option<&Value>) -> Result<(), String> {
        match self {
            Constraint::MinValue { bound, message } => {
                // An absent value fails the bound with the configured
                // message; this mirrors the mandatory/default resolution
                // having already run before constraints do.
                let value = match value {
                    Some(v) => v,
                    None => return Err(message.clone()),
                };
                if !meta.kind().is_numeric() {
                    return Err(self.not_allowed(meta));
                }
                let bound = bound
                    .convert_to(meta.kind())
                    .map_err(|_| message.clone())?;
                match bound.le(value) {
                    Some(true) => Ok(()),
                    _ => Err(message.clone()),
                }
            }
            Constraint::MaxValue { bound, message } => {
                let value = match value {
                    Some(v) => v,
                    None => return Err(message.clone()),
                };
                if !meta.kind().is_numeric() {
                    return Err(self.not_allowed(meta));
                }
                let bound = bound
                    .convert_to(meta.kind())
                    .map_err(|_| message.clone())?;
                match value.le(&bound) {
                    Some(true) => Ok(()),
                    _ => Err(message.clone()),
                }
            }
            Constraint::MinStringLength { bound, message } => {
                if meta.kind() != crate::value::Kind::Str {
                    return Err(self.not_allowed(meta));
                }
                match value {
                    Some(v) if v.display().chars().count() < *bound => Err(message.clone()),
                    _ => Ok(()),
                }
            }
            Constraint::MaxStringLength { bound, message } => {
                if meta.kind() != crate::value::Kind::Str {
                    return Err(self.not_allowed(meta));
                }
                match value {
                    Some(v) if v.display().chars().count() > *bound => Err(message.clone()),
                    _ => Ok(()),
                }
            }
            Constraint::Custom { check, .. } => check(meta, value),
        }
    }

    fn not_allowed(&self, meta: &FieldMeta) -> String {
        format!(
            "The attribute '{}' is not allowed on properties of type: '{}'.",
            self.display_name(),
            meta.type_display()
        )
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::MinValue { bound, .. } => {
                f.debug_struct("MinValue").field("bound", bound).finish()
            }
            Constraint::MaxValue { bound, .. } => {
                f.debug_struct("MaxValue").field("bound", bound).finish()
            }
            Constraint::MinStringLength { bound, .. } => f
                .debug_struct("MinStringLength")
                .field("bound", bound)
                .finish(),
            Constraint::MaxStringLength { bound, .. } => f
                .debug_struct("MaxStringLength")
                .field("bound", bound)
                .finish(),
            Constraint::Custom { name, .. } => {
                f.debug_struct("Custom").field("name", name).finish()
            }
        }
    }
}

//! Field descriptors and their registration builder.
//!
//! A field is registered once, up front, with everything the pipeline needs
//! to parse and validate it: the command line name, the type tag, optional
//! default, value set, and constraints. The descriptor then carries the
//! mutable per-cycle state (parse result, validation error, value slot)
//! through every parse/validate pass.

use crate::constraint::Constraint;
use crate::error::SetupError;
use crate::validation::{ParseResult, ValidationError};
use crate::value::{Kind, Value};

/// Immutable registration data for one field.
#[derive(Debug)]
pub struct FieldMeta {
    name: String,
    name_override: Option<String>,
    kind: Kind,
    nullable: bool,
    mandatory: bool,
    internal: bool,
    default: Option<Value>,
    description: Option<String>,
    value_set: Vec<Value>,
    constraints: Vec<Constraint>,
}

impl FieldMeta {
    /// The registered field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used on the command line: the override when one was registered
    /// and is non-blank, else the field's own name.
    pub fn effective_name(&self) -> &str {
        match &self.name_override {
            Some(o) if !o.trim().is_empty() => o,
            _ => &self.name,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn internal(&self) -> bool {
        self.internal
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn value_set(&self) -> &[Value] {
        &self.value_set
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Type tag rendered as `"<Type>"` or `"<Type>|Null"`.
    pub fn type_display(&self) -> String {
        if self.nullable {
            format!("{}|Null", self.kind.type_name())
        } else {
            self.kind.type_name().to_string()
        }
    }

    /// The explicitly registered default, if any. Mandatory fields are only
    /// rescued by this one; the implicit zero below never applies to them.
    pub fn declared_default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Default resolution order: explicit default, else none for nullable
    /// fields, else the kind's zero value. Strings never have an implicit
    /// default.
    pub fn resolved_default(&self) -> Option<Value> {
        if let Some(d) = &self.default {
            return Some(d.clone());
        }
        if self.nullable {
            return None;
        }
        self.kind.zero()
    }
}

/// A registered field plus its mutable per-cycle state.
#[derive(Debug)]
pub struct FieldState {
    pub(crate) meta: FieldMeta,
    pub(crate) parse_result: ParseResult,
    pub(crate) validation_error: Option<ValidationError>,
    pub(crate) slot: Option<Value>,
}

impl FieldState {
    pub(crate) fn new(meta: FieldMeta) -> Self {
        // Non-nullable fields start out holding their zero value, the way a
        // freshly constructed options object would.
        let slot = if meta.nullable {
            None
        } else {
            meta.kind.zero()
        };
        Self {
            meta,
            parse_result: ParseResult::NotParsed,
            validation_error: None,
            slot,
        }
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    pub fn parse_result(&self) -> ParseResult {
        self.parse_result
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    /// The live value, if any. Reflects the last parse pass, a default
    /// applied during validation, or the kind's zero value.
    pub fn value(&self) -> Option<&Value> {
        self.slot.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.validation_error.is_none()
    }
}

/// Builder for registering a field on a parameter set.
#[derive(Debug)]
pub struct FieldBuilder {
    name: String,
    kind: Kind,
    name_override: Option<String>,
    nullable: bool,
    mandatory: bool,
    internal: bool,
    default: Option<Value>,
    description: Option<String>,
    value_set: Option<Vec<Value>>,
    constraints: Vec<Constraint>,
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            name_override: None,
            nullable: false,
            mandatory: false,
            internal: false,
            default: None,
            description: None,
            value_set: None,
            constraints: Vec::new(),
        }
    }

    /// Mark the field as nullable: the literal `null` becomes a valid input
    /// and no implicit zero default applies.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Internal fields are never parsed, validated, or rendered.
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Override the name used on the command line.
    pub fn rename(mut self, cli_name: impl Into<String>) -> Self {
        self.name_override = Some(cli_name.into());
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Restrict the field to a finite set of allowed values.
    pub fn value_set(mut self, values: Vec<Value>) -> Self {
        self.value_set = Some(values);
        self
    }

    /// Attach a constraint; declaration order is evaluation order.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub(crate) fn build(self) -> Result<FieldMeta, SetupError> {
        if self.name.trim().is_empty() {
            return Err(SetupError::BlankFieldName);
        }
        if let Some(set) = &self.value_set {
            if set.is_empty() {
                return Err(SetupError::EmptyValueSet(self.name.clone()));
            }
        }
        Ok(FieldMeta {
            name: self.name,
            name_override: self.name_override,
            kind: self.kind,
            nullable: self.nullable,
            mandatory: self.mandatory,
            internal: self.internal,
            default: self.default,
            description: self.description,
            value_set: self.value_set.unwrap_or_default(),
            constraints: self.constraints,
        })
    }

    #[cfg(test)]
    pub(crate) fn into_meta(self) -> FieldMeta {
        self.build().expect("test field must be well-formed")
    }
}

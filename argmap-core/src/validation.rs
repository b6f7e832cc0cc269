//! Per-field parse and validation outcome records.

/// Result of the last parse attempt for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseResult {
    /// No parse attempt reached this field (no matching argument, or the
    /// whole pass was short-circuited by a help/version request).
    NotParsed,
    /// A matching argument was found and coerced successfully.
    Succeeded,
    /// A matching argument was found but its value could not be coerced.
    Failed,
}

/// A recorded, field-scoped validation failure.
///
/// Immutable once created. The container's error list is the live subset of
/// these across all fields, recomputed on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Effective name of the field that failed.
    pub field: String,
    /// Type tag of the field, e.g. `Int16|Null`.
    pub type_display: String,
    /// The offending value at the time of failure, possibly empty.
    pub value: String,
    /// Human-readable failure message.
    pub message: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        type_display: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            type_display: type_display.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

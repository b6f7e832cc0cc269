//! Core types and pipeline for the argmap system.
//!
//! This crate turns raw `key=value` command line tokens into typed,
//! validated field values: fields are registered with a declarative builder,
//! parsed against the token list, and validated against mandatory/default
//! rules, value sets, and constraint chains. Rendering is delegated to the
//! contract in `argmap-render-core`; no formatting or I/O happens here.

mod constraint;
mod container;
mod error;
mod field;
mod tokens;
mod validation;
mod value;

// Re-export core types
pub use constraint::{Constraint, CustomCheck};
pub use container::{Hook, ParamSet, SUMMARY_MESSAGE};
pub use error::{Result, SetupError};
pub use field::{FieldBuilder, FieldMeta, FieldState};
pub use validation::{ParseResult, ValidationError};
pub use value::{FromValue, Kind, Value, ValueError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

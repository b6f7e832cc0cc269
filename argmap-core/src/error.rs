//! Setup-time error types.
//!
//! These cover programmer misconfiguration detected while a parameter set is
//! being assembled. They are meant to abort program initialization, not to be
//! caught and retried. Everything that can go wrong at run time (bad user
//! input) is captured as per-field state instead, never as an error value.

use thiserror::Error;

/// Errors raised while registering commands, fields, or screen texts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// The command name handed to the container was empty or whitespace.
    #[error("command name must not be blank")]
    BlankCommandName,

    /// A field was registered with an empty or whitespace name.
    #[error("field name must not be blank")]
    BlankFieldName,

    /// Two fields were registered under the same name.
    #[error("field '{0}' is already registered")]
    DuplicateField(String),

    /// A value set was attached but contained no elements.
    #[error("value set for field '{0}' must not be empty")]
    EmptyValueSet(String),

    /// A configured usage text was empty or whitespace.
    #[error("usage text must not be blank")]
    BlankUsageText,

    /// A configured help text was empty or whitespace.
    #[error("help text must not be blank")]
    BlankHelpText,

    /// A field name was referenced that was never registered.
    #[error("unknown field '{0}'")]
    UnknownField(String),
}

/// Result type alias for setup operations.
pub type Result<T> = std::result::Result<T, SetupError>;

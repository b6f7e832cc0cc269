//! Render contract for the argmap system.
//!
//! The parameter container never formats text itself. It builds the view
//! types below from its public state and hands them to a [`Renderer`]
//! implementation. Front ends pick the renderer; the core only depends on
//! this contract.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One row of the help screen, describing a single registered parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpEntry {
    /// Name as used on the command line.
    pub name: String,
    /// Type tag, e.g. `Int32` or `Int32|Null`.
    pub kind: String,
    /// Whether the parameter must be supplied.
    pub mandatory: bool,
    /// Rendered default value, if the parameter resolves to one.
    pub default: Option<String>,
    /// Free-form description, empty when none was registered.
    pub description: String,
}

/// Everything a renderer needs to produce the help screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpView {
    pub command: String,
    /// Command-level help text, if one was configured.
    pub help_text: Option<String>,
    /// Usage line, configured or generated.
    pub usage_text: String,
    /// The primary token that triggers this screen, e.g. `help`.
    pub help_indicator: String,
    /// The primary token that triggers the version screen.
    pub version_indicator: String,
    pub entries: Vec<HelpEntry>,
}

/// Everything a renderer needs to produce the usage screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageView {
    pub command: String,
    pub usage_text: String,
}

/// One failed parameter in the validation summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub name: String,
    /// The offending value at the time of failure, possibly empty.
    pub value: String,
    pub message: String,
}

/// Everything a renderer needs to produce the validation summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryView {
    pub command: String,
    /// Headline shown above the failed parameters.
    pub message: String,
    pub entries: Vec<SummaryEntry>,
}

/// The display collaborator consumed by the parameter container.
///
/// All render functions are pure functions of the view they receive. The
/// `show`/`show_error` pair is where console output happens, so the core
/// itself stays free of I/O; implementations may override them to redirect
/// output.
pub trait Renderer {
    fn render_help(&self, view: &HelpView) -> Result<String>;

    fn render_usage(&self, view: &UsageView) -> Result<String>;

    fn render_validation_summary(&self, view: &SummaryView) -> Result<String>;

    /// Render the version screen from a version string. An empty string
    /// means no version information is available.
    fn render_version(&self, version: &str) -> Result<String>;

    fn show(&self, text: &str) {
        print!("{}", text);
    }

    fn show_error(&self, text: &str) {
        eprint!("{}", text);
    }
}

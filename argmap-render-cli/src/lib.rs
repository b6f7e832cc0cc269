//! Terminal renderer for the argmap screen contract.
//!
//! Produces the help table, usage block, validation summary, and version
//! line as plain strings sized to a configurable screen width. Color is
//! applied with `ansi_term` and can be switched off for capture-friendly
//! output.

use ansi_term::Colour::{Cyan, Red};
use ansi_term::Style;
use anyhow::Result;
use argmap_render_core::{HelpView, Renderer, SummaryView, UsageView};

mod table;
use table::{pad, wrap};

const DEFAULT_WIDTH: usize = 80;
const MIN_DESCRIPTION_WIDTH: usize = 10;

pub struct CliRenderer {
    width: usize,
    color: bool,
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            color: true,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(40);
        self
    }

    /// Disable ANSI color, for tests and non-terminal output.
    pub fn monochrome(mut self) -> Self {
        self.color = false;
        self
    }

    fn emphasize(&self, text: &str) -> String {
        if self.color {
            Style::new().bold().paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            Cyan.bold().paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn alert(&self, text: &str) -> String {
        if self.color {
            Red.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// One logical table row: three fixed cells plus a description that wraps.
struct Row {
    name: String,
    kind: String,
    default: String,
    description: String,
}

impl Renderer for CliRenderer {
    fn render_help(&self, view: &HelpView) -> Result<String> {
        let mut output = String::new();

        if let Some(help_text) = &view.help_text {
            for line in wrap(help_text, self.width) {
                output.push_str(&line);
                output.push('\n');
            }
            output.push('\n');
        }

        let mut rows = vec![
            Row {
                name: view.help_indicator.clone(),
                kind: String::new(),
                default: String::new(),
                description: "Shows this help screen.".to_string(),
            },
            Row {
                name: view.version_indicator.clone(),
                kind: String::new(),
                default: String::new(),
                description: "Shows the command version.".to_string(),
            },
        ];
        let mut has_mandatory = false;
        for entry in &view.entries {
            if entry.mandatory {
                has_mandatory = true;
            }
            rows.push(Row {
                name: if entry.mandatory {
                    format!("{}*", entry.name)
                } else {
                    entry.name.clone()
                },
                kind: entry.kind.clone(),
                default: entry.default.clone().unwrap_or_default(),
                description: entry.description.clone(),
            });
        }

        let headers = ("Parameter", "Type", "Default", "Description");
        let name_w = rows
            .iter()
            .map(|r| r.name.chars().count())
            .chain([headers.0.len()])
            .max()
            .unwrap_or(headers.0.len());
        let kind_w = rows
            .iter()
            .map(|r| r.kind.chars().count())
            .chain([headers.1.len()])
            .max()
            .unwrap_or(headers.1.len());
        let default_w = rows
            .iter()
            .map(|r| r.default.chars().count())
            .chain([headers.2.len()])
            .max()
            .unwrap_or(headers.2.len());
        let desc_w = self
            .width
            .saturating_sub(name_w + kind_w + default_w + 13)
            .max(MIN_DESCRIPTION_WIDTH);

        let rule = |left: char, mid: char, right: char| {
            format!(
                "{}{}{}{}{}{}{}{}{}\n",
                left,
                "─".repeat(name_w + 2),
                mid,
                "─".repeat(kind_w + 2),
                mid,
                "─".repeat(default_w + 2),
                mid,
                "─".repeat(desc_w + 2),
                right
            )
        };

        output.push_str(&rule('┌', '┬', '┐'));
        output.push_str(&format!(
            "│ {} │ {} │ {} │ {} │\n",
            self.emphasize(&pad(headers.0, name_w)),
            self.emphasize(&pad(headers.1, kind_w)),
            self.emphasize(&pad(headers.2, default_w)),
            self.emphasize(&pad(headers.3, desc_w)),
        ));
        output.push_str(&rule('├', '┼', '┤'));

        for (index, row) in rows.iter().enumerate() {
            let description_lines = wrap(&row.description, desc_w);
            for (line_index, line) in description_lines.iter().enumerate() {
                if line_index == 0 {
                    output.push_str(&format!(
                        "│ {} │ {} │ {} │ {} │\n",
                        pad(&row.name, name_w),
                        pad(&row.kind, kind_w),
                        pad(&row.default, default_w),
                        pad(line, desc_w),
                    ));
                } else {
                    output.push_str(&format!(
                        "│ {} │ {} │ {} │ {} │\n",
                        pad("", name_w),
                        pad("", kind_w),
                        pad("", default_w),
                        pad(line, desc_w),
                    ));
                }
            }
            if index + 1 < rows.len() {
                output.push_str(&rule('├', '┼', '┤'));
            }
        }
        output.push_str(&rule('└', '┴', '┘'));

        if has_mandatory {
            output.push_str("* marks a mandatory parameter\n");
        }
        output.push('\n');
        output.push_str(&self.render_usage(&UsageView {
            command: view.command.clone(),
            usage_text: view.usage_text.clone(),
        })?);
        Ok(output)
    }

    fn render_usage(&self, view: &UsageView) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.heading("Usage:"));
        output.push('\n');
        for line in wrap(&view.usage_text, self.width.saturating_sub(2)) {
            output.push_str("  ");
            output.push_str(&line);
            output.push('\n');
        }
        Ok(output)
    }

    fn render_validation_summary(&self, view: &SummaryView) -> Result<String> {
        let mut output = String::new();
        for line in wrap(&view.message, self.width) {
            output.push_str(&self.alert(&line));
            output.push('\n');
        }
        for entry in &view.entries {
            output.push('\n');
            if entry.value.is_empty() {
                output.push_str(&self.emphasize(&format!("{}:", entry.name)));
            } else {
                output.push_str(&self.emphasize(&format!("{} = '{}':", entry.name, entry.value)));
            }
            output.push('\n');
            for line in wrap(&entry.message, self.width.saturating_sub(2)) {
                output.push_str("  ");
                output.push_str(&line);
                output.push('\n');
            }
        }
        Ok(output)
    }

    fn render_version(&self, version: &str) -> Result<String> {
        if version.trim().is_empty() {
            Ok("No version info available.\n".to_string())
        } else {
            Ok(format!("{}\n", version))
        }
    }
}

//! Demo command exercising the parameter container end to end.
//!
//! Run with `key=value` tokens, or `help` / `version` to see the
//! generated screens. On success the bound values are printed as JSON.

use std::env;
use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use argmap_core::{Constraint, FieldBuilder, Kind, ParamSet, Value, VERSION};
use argmap_render_cli::CliRenderer;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let params = match build_params() {
        Ok(params) => params,
        Err(e) => {
            tracing::error!("parameter setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(params) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(mut params: ParamSet) -> Result<bool> {
    let tokens: Vec<String> = env::args().skip(1).collect();
    let renderer = CliRenderer::new();

    if !params.process(&tokens, true, &renderer) {
        return Ok(false);
    }

    println!("{}", serde_json::to_string_pretty(&params.to_json())?);
    Ok(true)
}

fn build_params() -> argmap_core::Result<ParamSet> {
    let mut params = ParamSet::new("argmap")?
        .with_help(
            "Demonstrates typed command line parsing: mandatory fields, \
             defaults, value sets and range constraints.",
        )?
        .with_version(VERSION);

    params.register(
        FieldBuilder::new("count", Kind::I32)
            .mandatory()
            .rename("number")
            .describe("How many items to process."),
    )?;

    params.register(
        FieldBuilder::new("name", Kind::Str)
            .default_value(Value::Str("anonymous".to_string()))
            .constraint(Constraint::min_string_length(
                2,
                "The name must be at least 2 characters long.",
            ))
            .constraint(Constraint::max_string_length(
                32,
                "The name must be at most 32 characters long.",
            ))
            .describe("Display name attached to the run."),
    )?;

    params.register(
        FieldBuilder::new("batch", Kind::I32)
            .value_set(vec![
                Value::I32(5),
                Value::I32(10),
                Value::I32(15),
                Value::I32(20),
            ])
            .default_value(Value::I32(5))
            .describe("Batch size, one of the supported steps."),
    )?;

    params.register(
        FieldBuilder::new("retries", Kind::I16)
            .nullable()
            .constraint(Constraint::min_value(
                Value::I16(0),
                "The retry count must not be negative.",
            ))
            .constraint(Constraint::max_value(
                Value::I16(100),
                "The retry count must be at most 100.",
            ))
            .describe("Optional retry budget, leave unset or pass null to disable."),
    )?;

    params.register(
        FieldBuilder::new("email", Kind::Str)
            .mandatory()
            .constraint(Constraint::custom("EMail", |meta, value| {
                let text = match value {
                    Some(Value::Str(text)) => text,
                    _ => return Ok(()),
                };
                if is_email(text) {
                    Ok(())
                } else {
                    Err(format!(
                        "The value of '{}' is not a valid e-mail address.",
                        meta.effective_name()
                    ))
                }
            }))
            .describe("Address the report is sent to."),
    )?;

    Ok(params)
}

/// Minimal shape check: a local part, an '@', and a dotted domain.
fn is_email(text: &str) -> bool {
    let at = match text.rfind('@') {
        Some(at) => at,
        None => return false,
    };
    let dot = match text.rfind('.') {
        Some(dot) => dot,
        None => return false,
    };
    at > 0 && dot >= at + 2 && dot < text.len() - 1
}

#[cfg(test)]
mod tests {
    use super::is_email;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_email("who@where.com"));
        assert!(is_email("a.b@c.d.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_email("blah@blah"));
        assert!(!is_email("@where.com"));
        assert!(!is_email("who@.com"));
        assert!(!is_email("who@where."));
        assert!(!is_email("who.where.com"));
    }
}

//! End-to-end `process` behavior: screen routing and exit status mapping.

use std::cell::RefCell;

use argmap_core::{Constraint, FieldBuilder, Kind, ParamSet, Value, SUMMARY_MESSAGE};
use argmap_render_core::{HelpView, Renderer, SummaryView, UsageView};

/// Renderer that records every screen instead of printing it.
#[derive(Default)]
struct CaptureRenderer {
    shown: RefCell<Vec<String>>,
    errored: RefCell<Vec<String>>,
}

impl CaptureRenderer {
    fn shown(&self) -> Vec<String> {
        self.shown.borrow().clone()
    }

    fn errored(&self) -> Vec<String> {
        self.errored.borrow().clone()
    }
}

impl Renderer for CaptureRenderer {
    fn render_help(&self, view: &HelpView) -> anyhow::Result<String> {
        Ok(format!("HELP {} ({} entries)", view.command, view.entries.len()))
    }

    fn render_usage(&self, view: &UsageView) -> anyhow::Result<String> {
        Ok(format!("USAGE {}", view.usage_text))
    }

    fn render_validation_summary(&self, view: &SummaryView) -> anyhow::Result<String> {
        let fields: Vec<&str> = view.entries.iter().map(|e| e.name.as_str()).collect();
        Ok(format!("SUMMARY {} [{}]", view.message, fields.join(", ")))
    }

    fn render_version(&self, version: &str) -> anyhow::Result<String> {
        Ok(format!("VERSION {}", version))
    }

    fn show(&self, text: &str) {
        self.shown.borrow_mut().push(text.to_string());
    }

    fn show_error(&self, text: &str) {
        self.errored.borrow_mut().push(text.to_string());
    }
}

fn demo_params() -> ParamSet {
    let mut params = ParamSet::new("demo").unwrap().with_version("2.0.1");
    params
        .register(FieldBuilder::new("count", Kind::I32).mandatory())
        .unwrap();
    params
        .register(
            FieldBuilder::new("level", Kind::I16).constraint(Constraint::max_value(
                Value::I16(100),
                "The level must be at most 100.",
            )),
        )
        .unwrap();
    params
}

#[test]
fn valid_arguments_produce_no_screens() {
    let mut params = demo_params();
    let renderer = CaptureRenderer::default();
    assert!(params.process(&["count=5", "level=7"], true, &renderer));
    assert!(renderer.shown().is_empty());
    assert!(renderer.errored().is_empty());
    assert_eq!(params.get::<i32>("count"), Some(5));
}

#[test]
fn empty_arguments_show_usage_when_enabled() {
    let mut params = demo_params();
    let renderer = CaptureRenderer::default();
    assert!(!params.process(&[] as &[&str], true, &renderer));
    assert_eq!(
        renderer.shown(),
        vec!["USAGE demo count=<Int32> [level=<Int16>]".to_string()]
    );
    assert!(renderer.errored().is_empty());
}

#[test]
fn empty_arguments_fall_through_to_validation_when_disabled() {
    let mut params = demo_params();
    let renderer = CaptureRenderer::default();
    assert!(!params.process(&[] as &[&str], false, &renderer));
    assert!(renderer.shown().is_empty());
    assert_eq!(
        renderer.errored(),
        vec![format!("SUMMARY {} [count]", SUMMARY_MESSAGE)]
    );
}

#[test]
fn unrecognized_tokens_count_as_empty_arguments() {
    let mut params = demo_params();
    let renderer = CaptureRenderer::default();
    assert!(!params.process(&["stray", "-v"], true, &renderer));
    assert_eq!(renderer.shown().len(), 1);
    assert!(renderer.shown()[0].starts_with("USAGE"));
}

#[test]
fn help_request_renders_the_help_screen() {
    let mut params = demo_params();
    let renderer = CaptureRenderer::default();
    assert!(!params.process(&["count=5", "--help"], true, &renderer));
    assert_eq!(renderer.shown(), vec!["HELP demo (2 entries)".to_string()]);
    assert!(renderer.errored().is_empty());
}

#[test]
fn version_request_renders_the_configured_version() {
    let mut params = demo_params();
    let renderer = CaptureRenderer::default();
    assert!(!params.process(&["version"], true, &renderer));
    assert_eq!(renderer.shown(), vec!["VERSION 2.0.1".to_string()]);
}

#[test]
fn invalid_arguments_route_the_summary_to_the_error_stream() {
    let mut params = demo_params();
    let renderer = CaptureRenderer::default();
    assert!(!params.process(&["count=5", "level=101"], true, &renderer));
    assert!(renderer.shown().is_empty());
    assert_eq!(
        renderer.errored(),
        vec![format!("SUMMARY {} [level]", SUMMARY_MESSAGE)]
    );
}

#[test]
fn process_is_repeatable_on_one_container() {
    let mut params = demo_params();
    let renderer = CaptureRenderer::default();
    assert!(!params.process(&["count=bad"], true, &renderer));
    assert!(params.process(&["count=3"], true, &renderer));
    assert!(params.is_valid());
    assert_eq!(params.get::<i32>("count"), Some(3));
}

#[test]
fn json_projection_reflects_the_bound_values() {
    let mut params = demo_params();
    let renderer = CaptureRenderer::default();
    assert!(params.process(&["count=5"], true, &renderer));
    let json = params.to_json();
    assert_eq!(json["count"], serde_json::json!(5));
    // Optional numeric fields settle on zero.
    assert_eq!(json["level"], serde_json::json!(0));
}

//! The parameter container: owns the registered fields and drives the
//! parse and validate phases over them.
//!
//! `parse` maps raw `key=value` tokens onto fields and coerces their values;
//! `validate` resolves mandatory/default state, checks value sets, and runs
//! the constraint chain. Both are repeatable: every pass starts with a full
//! reset of the per-field state. `process` is the orchestration surfaced to
//! front ends and routes every screen through the render contract.

use std::collections::HashMap;
use std::fmt;

use argmap_render_core::{HelpEntry, HelpView, Renderer, SummaryEntry, SummaryView, UsageView};
use tracing::{debug, error};

use crate::error::SetupError;
use crate::field::{FieldBuilder, FieldState};
use crate::tokens;
use crate::validation::{ParseResult, ValidationError};
use crate::value::{FromValue, Kind, Value};

/// Headline used on the validation summary screen.
pub const SUMMARY_MESSAGE: &str = "One or more of the command line arguments are invalid.";

/// Callback hooks run after the built-in parse/validate phases. They receive
/// the container itself and may inspect raw arguments, assign values, or
/// record additional validation errors.
pub type Hook = Box<dyn Fn(&mut ParamSet)>;

/// A set of registered command line parameters bound to one command.
///
/// Not synchronized: `parse` and `validate` mutate shared per-field state,
/// so a single container must not be driven from multiple threads. Distinct
/// containers are fully independent.
pub struct ParamSet {
    command: String,
    version: Option<String>,
    usage_text: Option<String>,
    help_text: Option<String>,
    fields: Vec<FieldState>,
    arguments: HashMap<String, String>,
    is_help_request: bool,
    is_version_request: bool,
    help_indicators: Vec<String>,
    version_indicators: Vec<String>,
    post_parse: Option<Hook>,
    extra_validate: Option<Hook>,
}

impl ParamSet {
    /// Create a container for the given command name.
    pub fn new(command: &str) -> Result<Self, SetupError> {
        if command.trim().is_empty() {
            return Err(SetupError::BlankCommandName);
        }
        Ok(Self {
            command: command.to_string(),
            version: None,
            usage_text: None,
            help_text: None,
            fields: Vec::new(),
            arguments: HashMap::new(),
            is_help_request: false,
            is_version_request: false,
            help_indicators: ["help", "/help", "-help", "--help", "/?"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            version_indicators: ["version", "/version", "-version", "--version"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            post_parse: None,
            extra_validate: None,
        })
    }

    /// Configure the usage text shown instead of the generated usage line.
    pub fn with_usage(mut self, text: &str) -> Result<Self, SetupError> {
        if text.trim().is_empty() {
            return Err(SetupError::BlankUsageText);
        }
        self.usage_text = Some(text.to_string());
        Ok(self)
    }

    /// Configure the command-level help text shown above the parameter table.
    pub fn with_help(mut self, text: &str) -> Result<Self, SetupError> {
        if text.trim().is_empty() {
            return Err(SetupError::BlankHelpText);
        }
        self.help_text = Some(text.to_string());
        Ok(self)
    }

    /// Configure the version string reported on a version request.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Register a field. Registration order is declaration order for
    /// validation and for the help screen.
    pub fn register(&mut self, builder: FieldBuilder) -> Result<(), SetupError> {
        let meta = builder.build()?;
        let clash = self.fields.iter().any(|f| {
            f.meta.name() == meta.name()
                || f.meta
                    .effective_name()
                    .eq_ignore_ascii_case(meta.effective_name())
        });
        if clash {
            return Err(SetupError::DuplicateField(meta.name().to_string()));
        }
        self.fields.push(FieldState::new(meta));
        Ok(())
    }

    /// Replace the tokens treated as a help request.
    pub fn set_help_indicators(&mut self, indicators: Vec<String>) {
        self.help_indicators = indicators.into_iter().map(|i| i.to_lowercase()).collect();
    }

    /// Replace the tokens treated as a version request.
    pub fn set_version_indicators(&mut self, indicators: Vec<String>) {
        self.version_indicators = indicators.into_iter().map(|i| i.to_lowercase()).collect();
    }

    /// Install a hook that runs after every parse pass.
    pub fn on_post_parse(&mut self, hook: impl Fn(&mut ParamSet) + 'static) {
        self.post_parse = Some(Box::new(hook));
    }

    /// Install a hook that runs after the built-in validation steps.
    pub fn on_validate(&mut self, hook: impl Fn(&mut ParamSet) + 'static) {
        self.extra_validate = Some(Box::new(hook));
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_help_request(&self) -> bool {
        self.is_help_request
    }

    pub fn is_version_request(&self) -> bool {
        self.is_version_request
    }

    /// True once a parse pass detected a help/version request or parsed at
    /// least one field.
    pub fn is_parsed(&self) -> bool {
        self.is_help_request
            || self.is_version_request
            || self
                .fields
                .iter()
                .any(|f| f.parse_result != ParseResult::NotParsed)
    }

    /// True when no field holds a validation error.
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|f| f.validation_error.is_none())
    }

    /// The live validation errors in declaration order, recomputed on read.
    pub fn validation_errors(&self) -> Vec<&ValidationError> {
        self.fields
            .iter()
            .filter_map(|f| f.validation_error.as_ref())
            .collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldState> {
        self.fields.iter()
    }

    /// Look up a field by registered name, falling back to a
    /// case-insensitive match on the effective name.
    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields
            .iter()
            .find(|f| f.meta.name() == name)
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|f| f.meta.effective_name().eq_ignore_ascii_case(name))
            })
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FieldState> {
        let index = self
            .fields
            .iter()
            .position(|f| f.meta.name() == name)
            .or_else(|| {
                self.fields
                    .iter()
                    .position(|f| f.meta.effective_name().eq_ignore_ascii_case(name))
            })?;
        self.fields.get_mut(index)
    }

    /// The typed value of a field, if it holds one of the requested type.
    pub fn get<T: FromValue>(&self, name: &str) -> Option<T> {
        self.field(name)?.slot.as_ref().and_then(T::from_value)
    }

    /// Raw argument value from the last parse, by lower-cased key.
    pub fn raw_argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Assign a field's value from a hook; marks the field as parsed.
    pub fn set_value(&mut self, name: &str, value: Value) -> Result<(), SetupError> {
        let field = self
            .field_mut(name)
            .ok_or_else(|| SetupError::UnknownField(name.to_string()))?;
        field.slot = Some(value);
        field.parse_result = ParseResult::Succeeded;
        Ok(())
    }

    /// Mark a field's parse attempt as failed from a hook.
    pub fn mark_parse_failed(&mut self, name: &str) -> Result<(), SetupError> {
        let field = self
            .field_mut(name)
            .ok_or_else(|| SetupError::UnknownField(name.to_string()))?;
        field.parse_result = ParseResult::Failed;
        Ok(())
    }

    /// Record a validation error on a field from a hook.
    pub fn set_field_error(&mut self, name: &str, message: &str) -> Result<(), SetupError> {
        let field = self
            .field_mut(name)
            .ok_or_else(|| SetupError::UnknownField(name.to_string()))?;
        let error = ValidationError::new(
            field.meta.effective_name(),
            field.meta.type_display(),
            field.slot.as_ref().map(|v| v.display()).unwrap_or_default(),
            message,
        );
        field.validation_error = Some(error);
        Ok(())
    }

    /// Parse raw tokens into field values.
    ///
    /// Every pass starts with a full reset. A help or version indicator
    /// anywhere in the tokens short-circuits the pass before any field is
    /// touched. Among `key=value` tokens the first occurrence of a key wins;
    /// later duplicates are dropped.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) {
        debug!(command = %self.command, tokens = tokens.len(), "parse pass");

        for field in &mut self.fields {
            field.validation_error = None;
            field.parse_result = ParseResult::NotParsed;
        }
        self.is_help_request = false;
        self.is_version_request = false;
        self.arguments.clear();

        if tokens
            .iter()
            .any(|t| tokens::matches_indicator(t.as_ref(), &self.help_indicators))
        {
            self.is_help_request = true;
            debug!("help request detected");
            return;
        }
        if tokens
            .iter()
            .any(|t| tokens::matches_indicator(t.as_ref(), &self.version_indicators))
        {
            self.is_version_request = true;
            debug!("version request detected");
            return;
        }

        for token in tokens {
            if let Some((key, value)) = tokens::split_token(token.as_ref()) {
                if self.arguments.contains_key(&key) {
                    debug!(%key, "duplicate argument dropped");
                } else {
                    self.arguments.insert(key, value);
                }
            }
        }

        for field in &mut self.fields {
            if field.meta.internal() {
                continue;
            }
            let key = field.meta.effective_name().to_lowercase();
            let raw = match self.arguments.get(&key) {
                Some(raw) => raw,
                None => {
                    field.parse_result = ParseResult::NotParsed;
                    continue;
                }
            };
            let value = tokens::strip_quotes(raw);
            if value.trim().is_empty() {
                field.parse_result = ParseResult::Failed;
                continue;
            }
            let kind = field.meta.kind();
            if kind != Kind::Str
                && field.meta.nullable()
                && value.trim().eq_ignore_ascii_case("null")
            {
                field.slot = None;
                field.parse_result = ParseResult::Succeeded;
                continue;
            }
            match Value::coerce(kind, value) {
                Ok(parsed) => {
                    field.slot = Some(parsed);
                    field.parse_result = ParseResult::Succeeded;
                }
                Err(err) => {
                    debug!(field = field.meta.effective_name(), %err, "coercion failed");
                    field.parse_result = ParseResult::Failed;
                }
            }
        }

        if let Some(hook) = self.post_parse.take() {
            hook(self);
            self.post_parse = Some(hook);
        }
    }

    /// Validate every field against its mandatory/default state, value set,
    /// and constraint chain. Returns `true` iff no field holds an error.
    ///
    /// A pending help or version request returns `false` without touching
    /// any field.
    pub fn validate(&mut self) -> bool {
        for field in &mut self.fields {
            field.validation_error = None;
        }

        if self.is_help_request || self.is_version_request {
            debug!("screen request pending, validation skipped");
            return false;
        }

        for field in &mut self.fields {
            if field.meta.internal() {
                continue;
            }
            validate_field(field);
        }

        if let Some(hook) = self.extra_validate.take() {
            hook(self);
            self.extra_validate = Some(hook);
        }

        let valid = self.is_valid();
        debug!(valid, errors = self.validation_errors().len(), "validate pass");
        valid
    }

    /// Process a command line end to end: parse, validate, and route the
    /// resulting screen through the renderer.
    ///
    /// Returns `true` only for a fully valid argument list. Help and version
    /// requests render their screens and report `false`, so a caller can map
    /// the result straight onto a zero/non-zero exit code. When
    /// `show_usage_on_empty_args` is set and no `key=value` token was
    /// recognized, the usage screen is rendered and validation is skipped.
    pub fn process<S, R>(&mut self, tokens: &[S], show_usage_on_empty_args: bool, renderer: &R) -> bool
    where
        S: AsRef<str>,
        R: Renderer,
    {
        self.parse(tokens);

        if show_usage_on_empty_args
            && self.arguments.is_empty()
            && !self.is_help_request
            && !self.is_version_request
        {
            match renderer.render_usage(&self.usage_view()) {
                Ok(text) => renderer.show(&text),
                Err(err) => error!(%err, "usage rendering failed"),
            }
            return false;
        }

        if self.validate() {
            return true;
        }

        if self.is_help_request {
            match renderer.render_help(&self.help_view()) {
                Ok(text) => renderer.show(&text),
                Err(err) => error!(%err, "help rendering failed"),
            }
            return false;
        }
        if self.is_version_request {
            let version = self.version.clone().unwrap_or_default();
            match renderer.render_version(&version) {
                Ok(text) => renderer.show(&text),
                Err(err) => error!(%err, "version rendering failed"),
            }
            return false;
        }

        match renderer.render_validation_summary(&self.summary_view(SUMMARY_MESSAGE)) {
            Ok(text) => renderer.show_error(&text),
            Err(err) => error!(%err, "summary rendering failed"),
        }
        false
    }

    /// Project the bound values as a JSON object keyed by effective name.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for field in self.fields.iter().filter(|f| !f.meta.internal()) {
            let value = field
                .slot
                .as_ref()
                .map(|v| v.to_json())
                .unwrap_or(serde_json::Value::Null);
            map.insert(field.meta.effective_name().to_string(), value);
        }
        serde_json::Value::Object(map)
    }

    // ------------------------------------------------------------------
    // Render views: pure projections of public state.
    // ------------------------------------------------------------------

    pub fn help_view(&self) -> HelpView {
        HelpView {
            command: self.command.clone(),
            help_text: self.help_text.clone(),
            usage_text: self.usage_line(),
            help_indicator: self.help_indicators.first().cloned().unwrap_or_default(),
            version_indicator: self.version_indicators.first().cloned().unwrap_or_default(),
            entries: self
                .fields
                .iter()
                .filter(|f| !f.meta.internal())
                .map(|f| HelpEntry {
                    name: f.meta.effective_name().to_string(),
                    kind: f.meta.type_display(),
                    mandatory: f.meta.mandatory(),
                    // Mandatory fields only advertise a default they were
                    // actually given; the implicit zero is not one.
                    default: if f.meta.mandatory() {
                        f.meta.declared_default().map(|v| v.display())
                    } else {
                        f.meta.resolved_default().map(|v| v.display())
                    },
                    description: f.meta.description().unwrap_or_default().to_string(),
                })
                .collect(),
        }
    }

    pub fn usage_view(&self) -> UsageView {
        UsageView {
            command: self.command.clone(),
            usage_text: self.usage_line(),
        }
    }

    pub fn summary_view(&self, message: &str) -> SummaryView {
        SummaryView {
            command: self.command.clone(),
            message: message.to_string(),
            entries: self
                .validation_errors()
                .iter()
                .map(|e| SummaryEntry {
                    name: e.field.clone(),
                    value: e.value.clone(),
                    message: e.message.clone(),
                })
                .collect(),
        }
    }

    /// Configured usage text, or a line generated from the registered
    /// fields with optional parameters in brackets.
    fn usage_line(&self) -> String {
        if let Some(usage) = &self.usage_text {
            return usage.clone();
        }
        let mut parts = vec![self.command.clone()];
        for field in self.fields.iter().filter(|f| !f.meta.internal()) {
            let token = format!(
                "{}=<{}>",
                field.meta.effective_name(),
                field.meta.type_display()
            );
            if field.meta.mandatory() {
                parts.push(token);
            } else {
                parts.push(format!("[{}]", token));
            }
        }
        parts.join(" ")
    }
}

// The hook closures are opaque, so Debug is spelled out by hand.
impl fmt::Debug for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSet")
            .field("command", &self.command)
            .field("version", &self.version)
            .field("fields", &self.fields)
            .field("arguments", &self.arguments)
            .field("is_help_request", &self.is_help_request)
            .field("is_version_request", &self.is_version_request)
            .finish_non_exhaustive()
    }
}

/// Validate one field: mandatory/default resolution, then the value set,
/// then the constraint chain, stopping at the first recorded error.
fn validate_field(field: &mut FieldState) {
    let name = field.meta.effective_name().to_string();
    let type_display = field.meta.type_display();

    if field.meta.mandatory() {
        match field.parse_result {
            ParseResult::NotParsed => {
                if let Some(default) = field.meta.declared_default().cloned() {
                    match default.convert_to(field.meta.kind()) {
                        Ok(value) => field.slot = Some(value),
                        Err(err) => {
                            field.validation_error = Some(ValidationError::new(
                                &name,
                                &type_display,
                                "",
                                format!(
                                    "Setting the default value for the mandatory command line argument '{}' is invalid. The exceptions message is: '{}'.",
                                    name, err
                                ),
                            ));
                            return;
                        }
                    }
                } else {
                    field.validation_error = Some(ValidationError::new(
                        &name,
                        &type_display,
                        "",
                        format!(
                            "The mandatory command line argument '{}' is missing or the value is invalid.",
                            name
                        ),
                    ));
                    return;
                }
            }
            ParseResult::Failed => {
                field.validation_error = Some(ValidationError::new(
                    &name,
                    &type_display,
                    "",
                    format!(
                        "The mandatory command line argument '{}' is missing or the value is invalid.",
                        name
                    ),
                ));
                return;
            }
            ParseResult::Succeeded => {}
        }
    } else {
        if field.parse_result == ParseResult::NotParsed {
            if let Some(default) = field.meta.resolved_default() {
                match default.convert_to(field.meta.kind()) {
                    Ok(value) => field.slot = Some(value),
                    Err(err) => {
                        field.validation_error = Some(ValidationError::new(
                            &name,
                            &type_display,
                            "",
                            format!(
                                "The default value for the command line argument '{}' is invalid. The exceptions message is: '{}'.",
                                name, err
                            ),
                        ));
                        return;
                    }
                }
            }
        }
        if field.parse_result == ParseResult::Failed {
            field.validation_error = Some(ValidationError::new(
                &name,
                &type_display,
                "",
                format!("The value of command line argument '{}' is invalid.", name),
            ));
            return;
        }
    }

    if !field.meta.value_set().is_empty() {
        let kind = field.meta.kind();
        let mut compare = Vec::with_capacity(field.meta.value_set().len());
        for item in field.meta.value_set() {
            match item.convert_to(kind) {
                Ok(converted) => compare.push(converted),
                Err(_) => {
                    field.validation_error = Some(ValidationError::new(
                        &name,
                        &type_display,
                        "",
                        format!(
                            "The value set attached to '{}' is not compatible with the parameter property type.",
                            name
                        ),
                    ));
                    return;
                }
            }
        }
        // Strings compare case-insensitively; everything else exactly.
        let contained = match field.slot.as_ref() {
            None => false,
            Some(Value::Str(current)) => {
                let lowered = current.to_lowercase();
                compare
                    .iter()
                    .any(|c| matches!(c, Value::Str(s) if s.to_lowercase() == lowered))
            }
            Some(current) => compare.iter().any(|c| c == current),
        };
        if !contained {
            let listing = compare
                .iter()
                .map(|c| match c {
                    Value::Str(s) => s.to_lowercase(),
                    other => other.display(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            field.validation_error = Some(ValidationError::new(
                &name,
                &type_display,
                field.slot.as_ref().map(|v| v.display()).unwrap_or_default(),
                format!(
                    "The value of command line argument '{}' is not in the set of allowed values.\nAllowed values are:\n[{}]",
                    name, listing
                ),
            ));
            return;
        }
    }

    for constraint in field.meta.constraints() {
        if let Err(message) = constraint.apply(&field.meta, field.slot.as_ref()) {
            field.validation_error = Some(ValidationError::new(
                &name,
                &type_display,
                field.slot.as_ref().map(|v| v.display()).unwrap_or_default(),
                message,
            ));
            return;
        }
    }
}

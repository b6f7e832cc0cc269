//! Validation-phase behavior: mandatory/default resolution, value sets,
//! constraint chains, and hook-recorded errors.

use argmap_core::{Constraint, FieldBuilder, Kind, ParamSet, Value};

// =============================================================================
// MANDATORY AND DEFAULT RESOLUTION
// =============================================================================

#[test]
fn missing_mandatory_field_reports_the_standard_message() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(FieldBuilder::new("email", Kind::Str).mandatory())
        .unwrap();

    params.parse(&[] as &[&str]);
    assert!(!params.validate());

    let errors = params.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "email");
    assert_eq!(
        errors[0].message,
        "The mandatory command line argument 'email' is missing or the value is invalid."
    );
}

#[test]
fn mandatory_field_with_default_passes_when_missing() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("count", Kind::I32)
                .mandatory()
                .default_value(Value::I32(25)),
        )
        .unwrap();

    params.parse(&[] as &[&str]);
    assert!(params.validate());
    assert_eq!(params.get::<i32>("count"), Some(25));
}

#[test]
fn mandatory_parse_failure_is_not_rescued_by_the_default() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("count", Kind::I32)
                .mandatory()
                .default_value(Value::I32(25)),
        )
        .unwrap();

    params.parse(&["count=junk"]);
    assert!(!params.validate());
    assert_eq!(
        params.validation_errors()[0].message,
        "The mandatory command line argument 'count' is missing or the value is invalid."
    );
}

#[test]
fn incompatible_default_on_a_mandatory_field_is_reported() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("count", Kind::I16)
                .mandatory()
                .default_value(Value::I32(70_000)),
        )
        .unwrap();

    params.parse(&[] as &[&str]);
    assert!(!params.validate());
    let message = &params.validation_errors()[0].message;
    assert!(message.starts_with(
        "Setting the default value for the mandatory command line argument 'count' is invalid."
    ));
    assert!(message.contains("out of range"));
}

#[test]
fn optional_field_falls_back_to_its_default() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("name", Kind::Str).default_value(Value::Str("anonymous".to_string())),
        )
        .unwrap();

    params.parse(&[] as &[&str]);
    assert!(params.validate());
    assert_eq!(params.get::<String>("name"), Some("anonymous".to_string()));
}

#[test]
fn optional_numeric_falls_back_to_zero_without_an_explicit_default() {
    let mut params = ParamSet::new("cmd").unwrap();
    params.register(FieldBuilder::new("count", Kind::I32)).unwrap();

    params.parse(&[] as &[&str]);
    assert!(params.validate());
    assert_eq!(params.get::<i32>("count"), Some(0));
}

#[test]
fn optional_nullable_field_stays_unset_without_a_default() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(FieldBuilder::new("limit", Kind::I32).nullable())
        .unwrap();

    params.parse(&[] as &[&str]);
    assert!(params.validate());
    assert_eq!(params.field("limit").unwrap().value(), None);
}

#[test]
fn optional_parse_failure_reports_the_invalid_value_message() {
    let mut params = ParamSet::new("cmd").unwrap();
    params.register(FieldBuilder::new("count", Kind::I32)).unwrap();

    params.parse(&["count=oops"]);
    assert!(!params.validate());
    assert_eq!(
        params.validation_errors()[0].message,
        "The value of command line argument 'count' is invalid."
    );
}

#[test]
fn incompatible_default_on_an_optional_field_is_reported() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("count", Kind::I32)
                .default_value(Value::Str("lots".to_string())),
        )
        .unwrap();

    params.parse(&[] as &[&str]);
    assert!(!params.validate());
    assert!(params.validation_errors()[0]
        .message
        .starts_with("The default value for the command line argument 'count' is invalid."));
}

// =============================================================================
// VALUE SETS
// =============================================================================

fn batch_params() -> ParamSet {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(FieldBuilder::new("batch", Kind::I32).value_set(vec![
            Value::I32(5),
            Value::I32(10),
            Value::I32(15),
            Value::I32(20),
        ]))
        .unwrap();
    params
}

#[test]
fn value_set_accepts_a_member() {
    let mut params = batch_params();
    params.parse(&["batch=15"]);
    assert!(params.validate());
}

#[test]
fn value_set_rejects_a_non_member_and_lists_the_set() {
    let mut params = batch_params();
    params.parse(&["batch=6"]);
    assert!(!params.validate());

    let error = &params.validation_errors()[0];
    assert_eq!(error.value, "6");
    assert_eq!(
        error.message,
        "The value of command line argument 'batch' is not in the set of allowed values.\nAllowed values are:\n[5, 10, 15, 20]"
    );
}

#[test]
fn value_set_elements_convert_to_the_field_kind() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("size", Kind::I64)
                .value_set(vec![Value::I16(1), Value::I32(2), Value::I64(3)]),
        )
        .unwrap();
    params.parse(&["size=2"]);
    assert!(params.validate());
}

#[test]
fn incompatible_value_set_reports_a_misuse_error() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("size", Kind::I16)
                .value_set(vec![Value::I32(70_000)]),
        )
        .unwrap();
    params.parse(&["size=1"]);
    assert!(!params.validate());
    assert_eq!(
        params.validation_errors()[0].message,
        "The value set attached to 'size' is not compatible with the parameter property type."
    );
}

#[test]
fn string_value_sets_compare_case_insensitively() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(FieldBuilder::new("mode", Kind::Str).value_set(vec![
            Value::Str("Fast".to_string()),
            Value::Str("Safe".to_string()),
        ]))
        .unwrap();

    params.parse(&["mode=FAST"]);
    assert!(params.validate());

    params.parse(&["mode=slow"]);
    assert!(!params.validate());
    assert!(params.validation_errors()[0].message.contains("[fast, safe]"));
}

// =============================================================================
// CONSTRAINT CHAINS
// =============================================================================

#[test]
fn range_constraints_pass_and_fail_at_the_bounds() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("level", Kind::I16)
                .constraint(Constraint::min_value(
                    Value::I16(1),
                    "The level must be at least 1.",
                ))
                .constraint(Constraint::max_value(
                    Value::I16(100),
                    "The level must be at most 100.",
                )),
        )
        .unwrap();

    params.parse(&["level=100"]);
    assert!(params.validate());

    params.parse(&["level=101"]);
    assert!(!params.validate());
    assert_eq!(
        params.validation_errors()[0].message,
        "The level must be at most 100."
    );

    params.parse(&["level=0"]);
    assert!(!params.validate());
    assert_eq!(
        params.validation_errors()[0].message,
        "The level must be at least 1."
    );
}

#[test]
fn null_under_a_min_value_constraint_fails_with_its_message() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("level", Kind::I32)
                .nullable()
                .constraint(Constraint::min_value(
                    Value::I32(1),
                    "The level must be at least 1.",
                )),
        )
        .unwrap();

    params.parse(&["level=null"]);
    assert!(!params.validate());
    assert_eq!(
        params.validation_errors()[0].message,
        "The level must be at least 1."
    );
}

#[test]
fn length_constraints_ignore_an_unset_string() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("name", Kind::Str)
                .nullable()
                .constraint(Constraint::min_string_length(2, "Name too short.")),
        )
        .unwrap();

    params.parse(&[] as &[&str]);
    assert!(params.validate());

    params.parse(&["name=x"]);
    assert!(!params.validate());
    assert_eq!(params.validation_errors()[0].message, "Name too short.");
}

#[test]
fn numeric_constraint_on_a_string_field_is_a_misuse_error() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("name", Kind::Str)
                .constraint(Constraint::min_value(Value::I32(1), "unused")),
        )
        .unwrap();

    params.parse(&["name=abc"]);
    assert!(!params.validate());
    assert_eq!(
        params.validation_errors()[0].message,
        "The attribute 'MinValue' is not allowed on properties of type: 'String'."
    );
}

#[test]
fn constraint_chain_stops_at_the_first_failure() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("name", Kind::Str)
                .constraint(Constraint::min_string_length(5, "first"))
                .constraint(Constraint::max_string_length(2, "second")),
        )
        .unwrap();

    params.parse(&["name=abc"]);
    assert!(!params.validate());
    let errors = params.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "first");
}

#[test]
fn custom_constraint_checks_email_shapes() {
    fn is_email(text: &str) -> bool {
        match (text.rfind('@'), text.rfind('.')) {
            (Some(at), Some(dot)) => at > 0 && dot >= at + 2 && dot < text.len() - 1,
            _ => false,
        }
    }

    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(
            FieldBuilder::new("email", Kind::Str)
                .mandatory()
                .constraint(Constraint::custom("EMail", |meta, value| {
                    match value {
                        Some(Value::Str(text)) if !is_email(text) => Err(format!(
                            "The value of '{}' is not a valid e-mail address.",
                            meta.effective_name()
                        )),
                        _ => Ok(()),
                    }
                })),
        )
        .unwrap();

    params.parse(&["email=who@where.com"]);
    assert!(params.validate());

    params.parse(&["email=blah@blah"]);
    assert!(!params.validate());
    assert_eq!(
        params.validation_errors()[0].message,
        "The value of 'email' is not a valid e-mail address."
    );
}

// =============================================================================
// HOOKS AND REVALIDATION
// =============================================================================

#[test]
fn validate_hook_can_add_errors_across_fields() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(FieldBuilder::new("email", Kind::Str).nullable())
        .unwrap();
    params
        .register(FieldBuilder::new("delivery", Kind::Str).nullable())
        .unwrap();
    params.on_validate(|p| {
        let email = p.get::<String>("email");
        let delivery = p.get::<String>("delivery");
        if email.is_none() && delivery.is_none() {
            let _ = p.set_field_error("email", "Provide an e-mail address or a delivery date.");
            let _ = p.set_field_error("delivery", "Provide an e-mail address or a delivery date.");
        }
    });

    params.parse(&[] as &[&str]);
    assert!(!params.validate());
    assert_eq!(params.validation_errors().len(), 2);

    params.parse(&["email=who@where.com"]);
    assert!(params.validate());
}

#[test]
fn two_absent_mandatory_fields_yield_one_error_each() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(FieldBuilder::new("delivery", Kind::I64).mandatory().nullable())
        .unwrap();
    params
        .register(FieldBuilder::new("email", Kind::Str).mandatory())
        .unwrap();
    // The delivery date arrives as text and is parsed into the numeric slot.
    params.on_post_parse(|p| {
        if let Some(raw) = p.raw_argument("delivery").map(str::to_string) {
            let digits: String = raw.split('-').collect();
            match digits.parse::<i64>() {
                Ok(stamp) => {
                    let _ = p.set_value("delivery", Value::I64(stamp));
                }
                Err(_) => {
                    let _ = p.mark_parse_failed("delivery");
                }
            }
        }
    });

    params.parse(&[] as &[&str]);
    assert!(!params.validate());
    let errors = params.validation_errors();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].field, "delivery");
    assert_eq!(errors[1].field, "email");
    assert!(errors
        .iter()
        .all(|e| e.message.contains("is missing or the value is invalid")));

    params.parse(&["delivery=2026-08-28", "email=who@where.com"]);
    assert!(params.validate());
    assert_eq!(params.get::<i64>("delivery"), Some(20_260_828));
}

#[test]
fn validate_after_a_help_request_reports_invalid_without_errors() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(FieldBuilder::new("count", Kind::I32).mandatory())
        .unwrap();

    params.parse(&["help"]);
    assert!(!params.validate());
    assert!(params.validation_errors().is_empty());
}

#[test]
fn revalidation_clears_stale_errors() {
    let mut params = ParamSet::new("cmd").unwrap();
    params
        .register(FieldBuilder::new("count", Kind::I32).mandatory())
        .unwrap();

    params.parse(&[] as &[&str]);
    assert!(!params.validate());
    assert_eq!(params.validation_errors().len(), 1);

    params.parse(&["count=5"]);
    assert!(params.validate());
    assert!(params.validation_errors().is_empty());
    assert!(params.is_valid());
}

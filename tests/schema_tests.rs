//! # Schema, positional and mode-policy tests
//!
//! Covers the core (untyped) API surface:
//! - build-time schema defect detection
//! - positional routing, trailing container positionals, unclaimed tokens
//! - strict vs lenient failure policy
//! - user parse-from-string types end to end

use argbind::{
    parse_with, BindError, BindMode, CoerceRule, FieldDescriptor, FixSuggestion, FromValue,
    Mismatch, Scalar, Schema, Value,
};
use std::str::FromStr;

// ============================================================================
// SCHEMA DEFECTS
// ============================================================================

#[test]
fn switch_and_position_together_is_ambiguous() {
    let err = Schema::builder()
        .field(FieldDescriptor::scalar("x", CoerceRule::Str).switch("-x").position(1))
        .build()
        .unwrap_err();
    assert!(matches!(err, BindError::AmbiguousSchema { .. }));
    assert!(err.fix_suggestion().is_some());
}

#[test]
fn position_gap_is_ambiguous() {
    let err = Schema::builder()
        .field(FieldDescriptor::scalar("a", CoerceRule::Str).position(1))
        .field(FieldDescriptor::scalar("b", CoerceRule::Str).position(3))
        .build()
        .unwrap_err();
    assert!(matches!(err, BindError::AmbiguousSchema { .. }));
}

#[test]
fn shared_position_is_ambiguous() {
    let err = Schema::builder()
        .field(FieldDescriptor::scalar("a", CoerceRule::Str).position(1))
        .field(FieldDescriptor::scalar("b", CoerceRule::Str).position(1))
        .build()
        .unwrap_err();
    assert!(matches!(err, BindError::AmbiguousSchema { .. }));
}

// ============================================================================
// POSITIONAL BINDING
// ============================================================================

fn copy_schema() -> Schema {
    // source and dest by position, plus an optional verbosity switch
    Schema::builder()
        .field(FieldDescriptor::scalar("source", CoerceRule::Path).position(1).required())
        .field(FieldDescriptor::scalar("dest", CoerceRule::Path).position(2).required())
        .field(FieldDescriptor::scalar("verbose", CoerceRule::Bool).switch("-v"))
        .build()
        .unwrap()
}

#[test]
fn leading_tokens_bind_positionals_in_position_order() {
    let schema = copy_schema();
    let mut bound = parse_with(
        &["/tmp/in.txt", "/tmp/out.txt", "-v"],
        &schema,
        BindMode::Lenient,
    )
    .unwrap();

    let source: std::path::PathBuf = bound.required("source").unwrap();
    let dest: std::path::PathBuf = bound.required("dest").unwrap();
    assert_eq!(source, std::path::PathBuf::from("/tmp/in.txt"));
    assert_eq!(dest, std::path::PathBuf::from("/tmp/out.txt"));
    assert_eq!(bound.take::<bool>("verbose").unwrap(), Some(true));
}

#[test]
fn missing_required_positions_reported_ascending() {
    let schema = copy_schema();
    let err = parse_with(&["-v"], &schema, BindMode::Lenient).unwrap_err();
    match err {
        BindError::MissingRequired { switches, positions } => {
            assert!(switches.is_empty());
            assert_eq!(positions, vec![1, 2]);
        }
        other => panic!("expected MissingRequired, got {other:?}"),
    }
}

#[test]
fn partially_supplied_positions_report_the_gap() {
    let schema = copy_schema();
    let err = parse_with(&["/tmp/in.txt"], &schema, BindMode::Lenient).unwrap_err();
    match err {
        BindError::MissingRequired { positions, .. } => assert_eq!(positions, vec![2]),
        other => panic!("expected MissingRequired, got {other:?}"),
    }
}

#[test]
fn unclaimed_leading_token_fails_fast() {
    let schema = copy_schema();
    let err = parse_with(
        &["/tmp/in.txt", "/tmp/out.txt", "stray", "-v"],
        &schema,
        BindMode::Lenient,
    )
    .unwrap_err();
    match err {
        BindError::UnclaimedToken { token, slots } => {
            assert_eq!(token, "stray");
            assert_eq!(slots, 2);
        }
        other => panic!("expected UnclaimedToken, got {other:?}"),
    }
}

#[test]
fn trailing_sequence_positional_collects_remaining_tokens() {
    let schema = Schema::builder()
        .field(FieldDescriptor::scalar("command", CoerceRule::Str).position(1).required())
        .field(FieldDescriptor::sequence("inputs", CoerceRule::Path).position(2))
        .build()
        .unwrap();

    let mut bound = parse_with(&["merge", "a.txt", "b.txt"], &schema, BindMode::Lenient).unwrap();
    assert_eq!(bound.required::<String>("command").unwrap(), "merge");
    let inputs: Vec<std::path::PathBuf> = bound.take("inputs").unwrap().unwrap();
    assert_eq!(inputs.len(), 2);
}

// ============================================================================
// MODE POLICY
// ============================================================================

fn mode_schema() -> Schema {
    Schema::builder()
        .field(FieldDescriptor::scalar("needed", CoerceRule::Str).switch("-m").required())
        .field(
            FieldDescriptor::scalar("count", CoerceRule::Int(argbind::IntWidth::W32)).switch("-i"),
        )
        .build()
        .unwrap()
}

#[test]
fn lenient_tolerates_optional_failure() {
    let schema = mode_schema();
    let mut bound = parse_with(&["-i", "NaN", "-m", "ok"], &schema, BindMode::Lenient).unwrap();
    assert!(!bound.is_bound("count"));
    assert_eq!(bound.required::<String>("needed").unwrap(), "ok");
}

#[test]
fn strict_rejects_optional_failure() {
    let schema = mode_schema();
    let err = parse_with(&["-i", "NaN", "-m", "ok"], &schema, BindMode::Strict).unwrap_err();
    match err {
        BindError::InvalidValue { field, token, .. } => {
            assert_eq!(field, "-i");
            assert_eq!(token, "NaN");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

// ============================================================================
// USER PARSE-FROM-STRING TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Port(u16);

impl FromStr for Port {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>().map(Port).map_err(|e| e.to_string())
    }
}

impl FromValue for Port {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Scalar(Scalar::Str(s)) => {
                s.parse().map_err(|_| Mismatch::new("Port", "unparsable port text"))
            }
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

#[test]
fn parsed_rule_binds_a_user_type() {
    let schema = Schema::builder()
        .field(FieldDescriptor::scalar("port", CoerceRule::parsed::<Port>()).switch("-port"))
        .build()
        .unwrap();

    let mut bound = parse_with(&["-port", "8080"], &schema, BindMode::Strict).unwrap();
    assert_eq!(bound.take::<Port>("port").unwrap(), Some(Port(8080)));
}

#[test]
fn parsed_rule_probe_rejects_during_binding() {
    let schema = Schema::builder()
        .field(FieldDescriptor::scalar("port", CoerceRule::parsed::<Port>()).switch("-port"))
        .build()
        .unwrap();

    let err = parse_with(&["-port", "eighty"], &schema, BindMode::Strict).unwrap_err();
    assert!(matches!(err, BindError::InvalidValue { .. }));
}

#[test]
fn parsed_rule_elements_in_a_sequence() {
    let schema = Schema::builder()
        .field(
            FieldDescriptor::sequence("ports", CoerceRule::parsed::<Port>()).switch("-ports"),
        )
        .build()
        .unwrap();

    let mut bound = parse_with(&["-ports", "80", "443"], &schema, BindMode::Strict).unwrap();
    let ports: Vec<Port> = bound.take("ports").unwrap().unwrap();
    assert_eq!(ports, vec![Port(80), Port(443)]);
}

// ============================================================================
// STRING MAPS
// ============================================================================

#[test]
fn map_value_keeps_text_after_first_separator() {
    let schema = Schema::builder()
        .field(FieldDescriptor::map("env", CoerceRule::Str, CoerceRule::Str).switch("-e"))
        .build()
        .unwrap();

    let mut bound = parse_with(&["-e", "a=b=c", "PATH=/usr/bin"], &schema, BindMode::Strict).unwrap();
    let env: std::collections::HashMap<String, String> = bound.take("env").unwrap().unwrap();
    assert_eq!(env["a"], "b=c");
    assert_eq!(env["PATH"], "/usr/bin");
}

// ============================================================================
// SCHEMA REUSE
// ============================================================================

#[test]
fn one_schema_serves_repeated_parses() {
    let schema = mode_schema();
    for _ in 0..3 {
        let mut bound = parse_with(&["-m", "same"], &schema, BindMode::Lenient).unwrap();
        assert_eq!(bound.required::<String>("needed").unwrap(), "same");
    }
}

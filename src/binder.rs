//! Binding engine
//!
//! Composes the scanner, coercer, container builder and completeness
//! validator into the single `parse` entry point:
//! scan -> bind each run -> validate -> [`Bound`].
//!
//! One parse invocation is a pure function of (tokens, schema); every piece
//! of engine state is a local of the call, so concurrent invocations from
//! independent call sites never interfere.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::coerce::coerce;
use crate::container::build_container;
use crate::error::BindError;
use crate::schema::{CoerceRule, FieldDescriptor, Schema, Shape};
use crate::scanner::scan;
use crate::validate::check_completeness;
use crate::value::{FromValue, Scalar, Value};

/// Policy for coercion failures on non-required fields.
///
/// Required-field failures abort in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindMode {
    /// Tolerate the failure and leave the field unset
    #[default]
    Lenient,
    /// Abort on the first failure
    Strict,
}

/// The untyped parse result: field name -> bound [`Value`], with every
/// required field guaranteed present.
#[derive(Debug, Default)]
pub struct Bound {
    values: FxHashMap<&'static str, Value>,
}

impl Bound {
    /// Remove and extract a field's value as `T`.
    ///
    /// `Ok(None)` when the field was never bound; `UnsupportedType` when the
    /// bound shape/kind does not fit `T`.
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<Option<T>, BindError> {
        match self.values.remove(name) {
            None => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .map_err(|mismatch| BindError::UnsupportedType {
                    field: name.to_string(),
                    requested: mismatch.requested,
                    found: mismatch.found,
                }),
        }
    }

    /// [`take`](Self::take) for fields completeness already guarantees;
    /// absence means the schema passed to `parse_with` did not mark the
    /// field required.
    pub fn required<T: FromValue>(&mut self, name: &str) -> Result<T, BindError> {
        self.take(name)?.ok_or_else(|| BindError::MissingRequired {
            switches: vec![name.to_string()],
            positions: Vec::new(),
        })
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A record type that declares its own field schema and builds itself from
/// the bound values.
pub trait FromBound: Sized {
    /// Field schema for this record type
    fn schema() -> Result<Schema, BindError>;

    /// Assemble the record from a validated [`Bound`]
    fn from_bound(bound: Bound) -> Result<Self, BindError>;
}

/// Parse `tokens` into a record of type `T` under the default mode.
pub fn parse<T: FromBound, S: AsRef<str>>(tokens: &[S]) -> Result<T, BindError> {
    parse_mode(tokens, BindMode::default())
}

/// Parse `tokens` into a record of type `T` under an explicit mode.
///
/// The schema is built fresh from the record type on every call; callers
/// that want reuse hold a `Schema` themselves and go through [`parse_with`].
pub fn parse_mode<T: FromBound, S: AsRef<str>>(
    tokens: &[S],
    mode: BindMode,
) -> Result<T, BindError> {
    let schema = T::schema()?;
    let bound = parse_with(tokens, &schema, mode)?;
    T::from_bound(bound)
}

/// The core entry point: scan, bind every run, validate completeness.
pub fn parse_with<S: AsRef<str>>(
    tokens: &[S],
    schema: &Schema,
    mode: BindMode,
) -> Result<Bound, BindError> {
    let tokens: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
    let runs = scan(&tokens, schema)?;

    let mut values: FxHashMap<&'static str, Value> = FxHashMap::default();
    let mut bound_fields: FxHashSet<usize> = FxHashSet::default();

    for run in runs {
        let field = schema.field(run.owner);
        let display = field.display_name();
        match bind_run(field, &display, &run.values) {
            Ok(Some(value)) => {
                // A later run for the same switch replaces the earlier one
                values.insert(field.name, value);
                bound_fields.insert(run.owner);
            }
            // Empty non-boolean run: missing, not malformed
            Ok(None) => {}
            Err(err) => {
                if field.required || mode == BindMode::Strict {
                    return Err(err);
                }
                debug!(field = field.name, error = %err, "dropping malformed optional binding");
            }
        }
    }

    check_completeness(schema, &bound_fields)?;
    Ok(Bound { values })
}

/// Bind one run to its owning field. `Ok(None)` means the field stays unset.
fn bind_run(
    field: &FieldDescriptor,
    display: &str,
    run: &[String],
) -> Result<Option<Value>, BindError> {
    if run.is_empty() {
        // A bare boolean switch is an implicit true
        return match (field.shape, field.element) {
            (Shape::Scalar, CoerceRule::Bool) => Ok(Some(Value::Scalar(Scalar::Bool(true)))),
            _ => Ok(None),
        };
    }

    match field.shape {
        Shape::Scalar => {
            if run.len() > 1 {
                return Err(BindError::InvalidValue {
                    field: display.to_string(),
                    token: run[1].clone(),
                    reason: format!("expected a single value, got {}", run.len()),
                });
            }
            coerce(display, &run[0], field.element).map(|scalar| Some(Value::Scalar(scalar)))
        }
        _ => build_container(field, display, run).map(Some),
    }
}

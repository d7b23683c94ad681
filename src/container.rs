//! Container construction from a value run
//!
//! Builds the typed container for every non-scalar shape. Construction is
//! all-or-nothing per field: the first element that fails coercion fails the
//! whole run, and nothing is partially populated.

use rustc_hash::FxHashSet;

use crate::coerce::coerce;
use crate::error::BindError;
use crate::schema::{FieldDescriptor, Shape};
use crate::value::{Scalar, Value};

/// Build the container value for `field` from its run.
///
/// The run must be non-empty and the shape must not be `Scalar` (the binder
/// handles scalar runs directly).
pub(crate) fn build_container(
    field: &FieldDescriptor,
    display: &str,
    tokens: &[String],
) -> Result<Value, BindError> {
    let expanded = expand_delimiter(field, tokens);

    match field.shape {
        Shape::Scalar => unreachable!("scalar runs are bound by the engine"),

        Shape::Sequence => {
            let items = coerce_all(display, &expanded, field)?;
            Ok(Value::Seq(items))
        }

        Shape::Set => {
            // First occurrence kept, duplicates collapse
            let mut seen = FxHashSet::default();
            let mut items = Vec::new();
            for scalar in coerce_all(display, &expanded, field)? {
                if seen.insert(scalar.clone()) {
                    items.push(scalar);
                }
            }
            Ok(Value::Set(items))
        }

        Shape::SortedSet => {
            let mut items = coerce_all(display, &expanded, field)?;
            items.sort();
            items.dedup();
            Ok(Value::SortedSet(items))
        }

        Shape::Map => {
            // Schema build guarantees the key rule for map shapes
            let Some(key_rule) = field.key else {
                return Err(BindError::AmbiguousSchema {
                    field: field.name.to_string(),
                    reason: "map shape without a key rule".to_string(),
                });
            };
            let mut pairs: Vec<(Scalar, Scalar)> = Vec::new();
            for token in &expanded {
                // Split on the first '=' so '=' inside the value survives
                let Some((raw_key, raw_value)) = token.split_once('=') else {
                    return Err(BindError::MalformedMapEntry {
                        field: display.to_string(),
                        token: token.clone(),
                    });
                };
                let key = coerce(display, raw_key, key_rule)?;
                let value = coerce(display, raw_value, field.element)?;
                match pairs.iter().position(|(existing, _)| *existing == key) {
                    // Duplicate key: last entry wins
                    Some(index) => pairs[index].1 = value,
                    None => pairs.push((key, value)),
                }
            }
            Ok(Value::Map(pairs))
        }

        Shape::FixedArray => {
            let items = coerce_all(display, &expanded, field)?;
            Ok(Value::Array(items))
        }
    }
}

fn coerce_all(
    display: &str,
    tokens: &[String],
    field: &FieldDescriptor,
) -> Result<Vec<Scalar>, BindError> {
    tokens
        .iter()
        .map(|token| coerce(display, token, field.element))
        .collect()
}

/// Split every raw token on the field's delimiter, if one is declared.
/// Empty segments are kept and coerced like any other token.
fn expand_delimiter(field: &FieldDescriptor, tokens: &[String]) -> Vec<String> {
    match field.delimiter {
        Some(delimiter) => tokens
            .iter()
            .flat_map(|token| token.split(delimiter).map(str::to_string))
            .collect(),
        None => tokens.to_vec(),
    }
}

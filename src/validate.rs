//! Completeness validation
//!
//! After binding, checks that every required field received a value.
//! Missing switch fields are reported by switch name in declaration order,
//! missing positional fields by position index, ascending; both categories
//! travel in one diagnostic.

use rustc_hash::FxHashSet;

use crate::error::BindError;
use crate::schema::Schema;

/// `bound` holds the indices of fields that received a successfully-bound
/// value this parse.
pub(crate) fn check_completeness(
    schema: &Schema,
    bound: &FxHashSet<usize>,
) -> Result<(), BindError> {
    let mut switches = Vec::new();
    let mut positions = Vec::new();

    for (index, field) in schema.fields().iter().enumerate() {
        if !field.required || bound.contains(&index) {
            continue;
        }
        if let Some(switch) = field.switch {
            switches.push(switch.to_string());
        } else if let Some(position) = field.position {
            positions.push(position);
        }
    }
    positions.sort_unstable();

    if switches.is_empty() && positions.is_empty() {
        Ok(())
    } else {
        Err(BindError::MissingRequired {
            switches,
            positions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CoerceRule, FieldDescriptor};

    fn schema() -> Schema {
        Schema::builder()
            .field(FieldDescriptor::scalar("m", CoerceRule::Str).switch("-m").required())
            .field(FieldDescriptor::scalar("o", CoerceRule::Str).switch("-o"))
            .field(FieldDescriptor::scalar("p2", CoerceRule::Str).position(2).required())
            .field(FieldDescriptor::scalar("p1", CoerceRule::Str).position(1).required())
            .build()
            .unwrap()
    }

    #[test]
    fn all_required_bound_passes() {
        let bound: FxHashSet<usize> = [0, 2, 3].into_iter().collect();
        assert!(check_completeness(&schema(), &bound).is_ok());
    }

    #[test]
    fn optional_fields_never_reported() {
        let bound: FxHashSet<usize> = [0, 2, 3].into_iter().collect();
        // "-o" unbound, not required
        assert!(check_completeness(&schema(), &bound).is_ok());
    }

    #[test]
    fn categorizes_switches_and_positions() {
        let bound = FxHashSet::default();
        let err = check_completeness(&schema(), &bound).unwrap_err();
        match err {
            BindError::MissingRequired { switches, positions } => {
                assert_eq!(switches, vec!["-m"]);
                // Ascending, regardless of declaration order
                assert_eq!(positions, vec![1, 2]);
            }
            other => panic!("expected MissingRequired, got {other:?}"),
        }
    }
}

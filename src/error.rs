//! Binding error types with fix suggestions
//!
//! Every failure surfaces as a single structured [`BindError`] returned from
//! `parse` - nothing panics, nothing is retried, and the library never writes
//! to an output stream itself. The caller decides whether to format-and-exit
//! or recover.

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All the ways a parse can fail.
///
/// `AmbiguousSchema` and `UnsupportedType` are schema-authoring defects;
/// the remaining variants are user-input defects.
#[derive(Error, Debug)]
pub enum BindError {
    /// Required fields that never received a value, split by binding mode.
    /// Positions are ascending; switches keep declaration order.
    #[error("{}", missing_summary(.switches, .positions))]
    MissingRequired {
        switches: Vec<String>,
        positions: Vec<usize>,
    },

    /// A value was present but malformed for its declared type.
    #[error("invalid value '{token}' for {field}: {reason}")]
    InvalidValue {
        field: String,
        token: String,
        reason: String,
    },

    /// A bound value was extracted as an incompatible Rust type.
    #[error("field '{field}' was bound as {found} but extracted as {requested}")]
    UnsupportedType {
        field: String,
        requested: &'static str,
        found: String,
    },

    /// The schema itself is contradictory. Detected once at build time,
    /// never a per-parse concern.
    #[error("ambiguous schema for field '{field}': {reason}")]
    AmbiguousSchema { field: String, reason: String },

    /// A map-typed run contained a token without a key/value separator.
    #[error("map entry '{token}' for {field} has no '=' separator")]
    MalformedMapEntry { field: String, token: String },

    /// A leading value had no positional slot left to claim it.
    #[error("unclaimed leading value '{token}': {slots} positional slot(s) declared, all consumed")]
    UnclaimedToken { token: String, slots: usize },
}

impl FixSuggestion for BindError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            BindError::MissingRequired { .. } => {
                Some("Supply the listed switches/positions on the command line")
            }
            BindError::InvalidValue { .. } => {
                Some("Check the value matches the field's declared type")
            }
            BindError::UnsupportedType { .. } => {
                Some("Extract the field with the same type the schema declares")
            }
            BindError::AmbiguousSchema { .. } => {
                Some("Give each field exactly one binding mode and a unique switch/position")
            }
            BindError::MalformedMapEntry { .. } => Some("Write map entries as key=value"),
            BindError::UnclaimedToken { .. } => {
                Some("Declare a positional field for the value or move it behind a switch")
            }
        }
    }
}

/// Render both missing categories as one combined message.
fn missing_summary(switches: &[String], positions: &[usize]) -> String {
    let rendered_positions = positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    match (switches.is_empty(), positions.is_empty()) {
        (false, false) => format!(
            "missing values for required arguments {} and for required positions {}",
            switches.join(", "),
            rendered_positions
        ),
        (false, true) => format!(
            "missing values for required arguments {}",
            switches.join(", ")
        ),
        (true, false) => format!("missing values for required positions {rendered_positions}"),
        (true, true) => "missing values for required arguments".to_string(),
    }
}

//! argbind - declarative switch/positional binding for command-line tokens
//!
//! Binds a raw token sequence to the fields of a user-defined record type
//! from a per-field schema (switch name, required flag, delimiter, optional
//! position, declared shape). The pipeline: scan tokens into per-field value
//! runs, coerce each run into its typed scalar or container, validate that
//! every required field is bound.
//!
//! Two levels of API:
//! - core: build a [`Schema`] and call [`parse_with`] for an untyped
//!   [`Bound`] result
//! - facade: implement [`FromBound`] on a record type and call [`parse`]

pub mod binder;
pub mod error;
pub mod schema;
pub mod value;

mod coerce;
mod container;
mod scanner;
mod validate;

pub use binder::{parse, parse_mode, parse_with, BindMode, Bound, FromBound};
pub use error::{BindError, FixSuggestion};
pub use schema::{CoerceRule, FieldDescriptor, Schema, SchemaBuilder, Shape};
pub use value::{FloatWidth, FromValue, IntWidth, Mismatch, Scalar, Value};

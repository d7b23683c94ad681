//! Field schema and builder
//!
//! A [`Schema`] is the declarative description the binding engine consumes:
//! one [`FieldDescriptor`] per record field, partitioned into a switch index
//! and an ordered positional list. Schema-authoring defects are detected once
//! at [`SchemaBuilder::build`] and never per parse.

use rustc_hash::{FxHashMap, FxHashSet};
use std::str::FromStr;
use tracing::debug;

use crate::error::BindError;
use crate::value::{FloatWidth, IntWidth};

/// How a single token is coerced, resolved once at schema build.
///
/// Match order over these variants is the resolution precedence: strings pass
/// through untouched, user parse hooks run before the built-in kinds,
/// enumerations match member names exactly, paths wrap without validation.
#[derive(Debug, Clone, Copy)]
pub enum CoerceRule {
    /// Token is kept verbatim
    Str,
    /// Radix-10 signed integer of the given width
    Int(IntWidth),
    /// IEEE decimal float of the given width
    Float(FloatWidth),
    /// Case-insensitive `true`/`false`; an empty scalar run means `true`
    Bool,
    /// A type with a canonical parse-from-string form; the probe runs during
    /// binding, the token is retained as its string form
    Parsed {
        type_name: &'static str,
        probe: fn(&str) -> Result<(), String>,
    },
    /// Closed enumeration matched against member names, case-sensitive
    Enum {
        type_name: &'static str,
        variants: &'static [&'static str],
    },
    /// Filesystem path, wrapped without existence validation
    Path,
}

impl CoerceRule {
    /// Rule for any type with a canonical parse-from-string form
    pub fn parsed<T>() -> Self
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        CoerceRule::Parsed {
            type_name: std::any::type_name::<T>(),
            probe: |token| T::from_str(token).map(|_| ()).map_err(|e| e.to_string()),
        }
    }

    /// Rule for a closed enumeration with the given member names
    pub fn enumerated(type_name: &'static str, variants: &'static [&'static str]) -> Self {
        CoerceRule::Enum {
            type_name,
            variants,
        }
    }
}

/// Declared container shape of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Sequence,
    Set,
    SortedSet,
    Map,
    FixedArray,
}

/// Declarative description of one record field.
///
/// Built through the shape constructors plus the chainable modifiers;
/// immutable for the duration of a parse.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Record-field identity, the key into the bound result
    pub name: &'static str,
    /// Switch that introduces this field's runs, e.g. `-m`
    pub switch: Option<&'static str>,
    /// Whether absence from the final bound set fails the parse
    pub required: bool,
    /// Splits each raw token into logical tokens before container building
    pub delimiter: Option<char>,
    /// 1-based slot among tokens preceding the first switch
    pub position: Option<usize>,
    pub shape: Shape,
    /// Element rule; the value rule for maps
    pub element: CoerceRule,
    /// Key rule, maps only
    pub key: Option<CoerceRule>,
}

impl FieldDescriptor {
    fn new(name: &'static str, shape: Shape, element: CoerceRule) -> Self {
        Self {
            name,
            switch: None,
            required: false,
            delimiter: None,
            position: None,
            shape,
            element,
            key: None,
        }
    }

    /// Single-value field
    pub fn scalar(name: &'static str, rule: CoerceRule) -> Self {
        Self::new(name, Shape::Scalar, rule)
    }

    /// Order-preserving collection, duplicates allowed
    pub fn sequence(name: &'static str, rule: CoerceRule) -> Self {
        Self::new(name, Shape::Sequence, rule)
    }

    /// Collection collapsing duplicates, unspecified iteration order
    pub fn set(name: &'static str, rule: CoerceRule) -> Self {
        Self::new(name, Shape::Set, rule)
    }

    /// Collection collapsing duplicates, always iterated ascending
    pub fn sorted_set(name: &'static str, rule: CoerceRule) -> Self {
        Self::new(name, Shape::SortedSet, rule)
    }

    /// `key=value` entries with independently coerced halves
    pub fn map(name: &'static str, key: CoerceRule, value: CoerceRule) -> Self {
        let mut field = Self::new(name, Shape::Map, value);
        field.key = Some(key);
        field
    }

    /// Array sized to the run exactly
    pub fn array(name: &'static str, rule: CoerceRule) -> Self {
        Self::new(name, Shape::FixedArray, rule)
    }

    pub fn switch(mut self, switch: &'static str) -> Self {
        self.switch = Some(switch);
        self
    }

    pub fn position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Switch name, position index, or field name - whichever identifies the
    /// field best in a diagnostic
    pub(crate) fn display_name(&self) -> String {
        if let Some(switch) = self.switch {
            switch.to_string()
        } else if let Some(position) = self.position {
            format!("position {position}")
        } else {
            self.name.to_string()
        }
    }
}

/// The full field schema for one record type, partitioned for scanning
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    switch_index: FxHashMap<&'static str, usize>,
    /// Field indices ordered by position, 1..=n
    positional: Vec<usize>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub(crate) fn field(&self, index: usize) -> &FieldDescriptor {
        &self.fields[index]
    }

    /// Field index a switch token selects, if any
    pub(crate) fn switch_target(&self, token: &str) -> Option<usize> {
        self.switch_index.get(token).copied()
    }

    pub(crate) fn positional(&self) -> &[usize] {
        &self.positional
    }
}

/// Accumulates descriptors and validates the whole schema at `build`
pub struct SchemaBuilder {
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Validate and partition the accumulated descriptors.
    ///
    /// Rejected with `AmbiguousSchema`: duplicate field names, a field bound
    /// both by switch and position (or by neither), duplicate switches,
    /// duplicate or 0-based or gapped positions, a delimiter on a scalar
    /// field, and map key rules outside map shapes.
    pub fn build(self) -> Result<Schema, BindError> {
        let mut switch_index: FxHashMap<&'static str, usize> = FxHashMap::default();
        let mut by_position: Vec<(usize, usize)> = Vec::new();
        let mut names: FxHashSet<&'static str> = FxHashSet::default();

        for (index, field) in self.fields.iter().enumerate() {
            if !names.insert(field.name) {
                return Err(ambiguous(field, "field name declared twice"));
            }

            match (field.switch, field.position) {
                (Some(_), Some(_)) => {
                    return Err(ambiguous(field, "bound both by switch and by position"));
                }
                (None, None) => {
                    return Err(ambiguous(field, "bound neither by switch nor by position"));
                }
                (Some(switch), None) => {
                    if switch_index.insert(switch, index).is_some() {
                        return Err(ambiguous(
                            field,
                            &format!("switch '{switch}' declared twice"),
                        ));
                    }
                }
                (None, Some(position)) => {
                    if position == 0 {
                        return Err(ambiguous(field, "positions are 1-based"));
                    }
                    by_position.push((position, index));
                }
            }

            if field.delimiter.is_some() && field.shape == Shape::Scalar {
                return Err(ambiguous(field, "a scalar field cannot take a delimiter"));
            }

            if (field.shape == Shape::Map) != field.key.is_some() {
                return Err(ambiguous(field, "key rule and map shape must go together"));
            }
        }

        by_position.sort_unstable_by_key(|&(position, _)| position);
        for (slot, &(position, index)) in by_position.iter().enumerate() {
            if position != slot + 1 {
                let field = &self.fields[index];
                if slot > 0 && by_position[slot - 1].0 == position {
                    return Err(ambiguous(
                        field,
                        &format!("position {position} claimed twice"),
                    ));
                }
                return Err(ambiguous(
                    field,
                    &format!("positions must be gap-free, expected {}", slot + 1),
                ));
            }
        }
        let positional: Vec<usize> = by_position.into_iter().map(|(_, index)| index).collect();

        debug!(
            fields = self.fields.len(),
            switches = switch_index.len(),
            positionals = positional.len(),
            "argument schema built"
        );

        Ok(Schema {
            fields: self.fields,
            switch_index,
            positional,
        })
    }
}

fn ambiguous(field: &FieldDescriptor, reason: &str) -> BindError {
    BindError::AmbiguousSchema {
        field: field.name.to_string(),
        reason: reason.to_string(),
    }
}

//! Token scanning
//!
//! Walks the raw argument list once and splits it into per-field value runs:
//! - a token equal to a declared switch name always starts a new run, never
//!   joins one (switches and values occupy disjoint lexical spaces);
//! - tokens before the first switch fill positional slots in position order,
//!   one each, with a trailing container-shaped positional taking the rest;
//! - a leading token with no slot left fails fast.
//!
//! All scan state lives in this function's activation record; nothing
//! carries over between calls.

use tracing::trace;

use crate::error::BindError;
use crate::schema::{Schema, Shape};

/// One field's contiguous value run. Transient: consumed by the binder
/// within the same parse call.
#[derive(Debug)]
pub(crate) struct TokenRun {
    /// Index of the owning field in the schema
    pub owner: usize,
    pub values: Vec<String>,
}

/// Split `tokens` into ordered runs, positional runs first, then switch runs
/// in first-occurrence order. A switch seen again yields a fresh run.
pub(crate) fn scan(tokens: &[&str], schema: &Schema) -> Result<Vec<TokenRun>, BindError> {
    let mut switch_runs: Vec<TokenRun> = Vec::new();
    let mut active: Option<usize> = None;
    let mut leading: Vec<String> = Vec::new();

    for &token in tokens {
        if let Some(field_index) = schema.switch_target(token) {
            trace!(switch = token, "opening run");
            switch_runs.push(TokenRun {
                owner: field_index,
                values: Vec::new(),
            });
            active = Some(switch_runs.len() - 1);
        } else if let Some(run_index) = active {
            switch_runs[run_index].values.push(token.to_string());
        } else {
            leading.push(token.to_string());
        }
    }

    let mut runs = route_positionals(leading, schema)?;
    runs.extend(switch_runs);
    Ok(runs)
}

/// Hand each leading token to the next positional slot. The trailing slot
/// takes all remaining tokens when it is container-shaped.
fn route_positionals(leading: Vec<String>, schema: &Schema) -> Result<Vec<TokenRun>, BindError> {
    let slots = schema.positional();
    let mut runs = Vec::new();
    let mut queue = leading.into_iter();

    for (slot, &field_index) in slots.iter().enumerate() {
        let field = schema.field(field_index);
        let trailing = slot + 1 == slots.len();

        if trailing && field.shape != Shape::Scalar {
            let rest: Vec<String> = queue.by_ref().collect();
            if rest.is_empty() {
                break;
            }
            trace!(field = field.name, values = rest.len(), "trailing positional run");
            runs.push(TokenRun {
                owner: field_index,
                values: rest,
            });
        } else if let Some(token) = queue.next() {
            runs.push(TokenRun {
                owner: field_index,
                values: vec![token],
            });
        } else {
            // Out of leading tokens; completeness validation reports any
            // required slots left unfilled
            break;
        }
    }

    if let Some(stray) = queue.next() {
        return Err(BindError::UnclaimedToken {
            token: stray,
            slots: slots.len(),
        });
    }

    Ok(runs)
}

//! Single-token coercion
//!
//! Turns one raw token into a [`Scalar`] according to the field's
//! [`CoerceRule`]. The match arms run in resolution-precedence order;
//! failures carry the offending token and the rule's reason.

use crate::error::BindError;
use crate::schema::CoerceRule;
use crate::value::{FloatWidth, IntWidth, Scalar};
use std::path::PathBuf;

/// Coerce `token` under `rule`; `display` names the field in diagnostics.
pub(crate) fn coerce(display: &str, token: &str, rule: CoerceRule) -> Result<Scalar, BindError> {
    match rule {
        CoerceRule::Str => Ok(Scalar::Str(token.to_string())),

        CoerceRule::Parsed { type_name, probe } => match probe(token) {
            Ok(()) => Ok(Scalar::Str(token.to_string())),
            Err(reason) => Err(invalid(
                display,
                token,
                format!("not a valid {type_name}: {reason}"),
            )),
        },

        CoerceRule::Int(width) => {
            let parsed = match width {
                IntWidth::W8 => token.parse::<i8>().map(Scalar::I8).map_err(|e| e.to_string()),
                IntWidth::W16 => token
                    .parse::<i16>()
                    .map(Scalar::I16)
                    .map_err(|e| e.to_string()),
                IntWidth::W32 => token
                    .parse::<i32>()
                    .map(Scalar::I32)
                    .map_err(|e| e.to_string()),
                IntWidth::W64 => token
                    .parse::<i64>()
                    .map(Scalar::I64)
                    .map_err(|e| e.to_string()),
            };
            parsed.map_err(|reason| invalid(display, token, reason))
        }

        CoerceRule::Float(width) => {
            let parsed = match width {
                FloatWidth::W32 => token
                    .parse::<f32>()
                    .map(Scalar::F32)
                    .map_err(|e| e.to_string()),
                FloatWidth::W64 => token
                    .parse::<f64>()
                    .map(Scalar::F64)
                    .map_err(|e| e.to_string()),
            };
            parsed.map_err(|reason| invalid(display, token, reason))
        }

        CoerceRule::Bool => {
            if token.eq_ignore_ascii_case("true") {
                Ok(Scalar::Bool(true))
            } else if token.eq_ignore_ascii_case("false") {
                Ok(Scalar::Bool(false))
            } else {
                Err(invalid(display, token, "expected true or false".to_string()))
            }
        }

        CoerceRule::Enum {
            type_name,
            variants,
        } => {
            // Exact member match, case-sensitive, no partial matches
            if variants.contains(&token) {
                Ok(Scalar::Str(token.to_string()))
            } else {
                Err(invalid(
                    display,
                    token,
                    format!("expected one of [{}] for {type_name}", variants.join(", ")),
                ))
            }
        }

        CoerceRule::Path => Ok(Scalar::Path(PathBuf::from(token))),
    }
}

fn invalid(display: &str, token: &str, reason: String) -> BindError {
    BindError::InvalidValue {
        field: display.to_string(),
        token: token.to_string(),
        reason,
    }
}

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AttributeError;

use super::Properties;

/// Property key holding the declared building height.
pub const HEIGHT_KEY: &str = "height";

/// Height used when no usable height is declared.
///
/// Objects without a valid height are still extruded, as zero-thickness
/// solids, so that every footprint appears in the output.
pub const FALLBACK_HEIGHT: f64 = 0.0;

/// Reads a scalar property as a finite number.
///
/// Numbers are taken as-is, strings are parsed after trimming, and null or
/// unparsable text yields `None`.
///
/// # Errors
///
/// Returns [`AttributeError::InvalidHeight`] for booleans, arrays and objects,
/// which cannot be a measurement at all.
pub fn numeric_value(value: &Value) -> Result<Option<f64>, AttributeError> {
    let parsed = match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            return Err(AttributeError::InvalidHeight(value.to_string()))
        }
    };
    Ok(parsed.filter(|v| v.is_finite()))
}

/// Resolves the extrusion height of a footprint from its properties.
///
/// A declared height that parses to a finite value strictly greater than zero
/// is used; anything else falls back to [`FALLBACK_HEIGHT`].
///
/// # Errors
///
/// Returns [`AttributeError::InvalidHeight`] if the height is structurally
/// malformed (see [`numeric_value`]).
pub fn resolve_height(properties: &Properties) -> Result<f64, AttributeError> {
    let Some(raw) = properties.get(HEIGHT_KEY) else {
        debug!("no declared height, using {FALLBACK_HEIGHT}");
        return Ok(FALLBACK_HEIGHT);
    };
    match numeric_value(raw)? {
        Some(h) if h > 0.0 => Ok(h),
        _ => {
            warn!(height = %raw, "unusable height, using {FALLBACK_HEIGHT}");
            Ok(FALLBACK_HEIGHT)
        }
    }
}

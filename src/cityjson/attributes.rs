use serde_json::{Number, Value};
use tracing::warn;

use super::height::numeric_value;
use super::Properties;

/// Source property keys renamed to CityJSON `Building` attributes.
pub const ATTRIBUTE_RENAMES: &[(&str, &str)] = &[
    ("timestamp", "creationDate"),
    ("height", "measuredHeight"),
    ("building:levels", "storeysAboveGround"),
    ("roof:shape", "roofType"),
    ("year_of_construction", "yearOfConstruction"),
    ("year", "yearOfConstruction"),
];

/// The attribute receiving the numeric height.
pub const MEASURED_HEIGHT: &str = "measuredHeight";

/// Looks up the CityJSON name of a source property key.
#[must_use]
pub fn renamed_key(key: &str) -> Option<&'static str> {
    ATTRIBUTE_RENAMES
        .iter()
        .find(|(from, _)| *from == key)
        .map(|(_, to)| *to)
}

/// Attributes split into keys known to the rename table and keys passed
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMapping {
    renamed: Properties,
    passthrough: Properties,
}

impl AttributeMapping {
    /// Maps source properties to attributes.
    ///
    /// Known keys are renamed (null values are dropped); `measuredHeight` is
    /// coerced to a number, or dropped if it does not parse. Unknown keys are
    /// kept verbatim.
    #[must_use]
    pub fn from_properties(properties: &Properties) -> Self {
        let mut mapping = Self::default();
        for (key, value) in properties {
            let Some(target) = renamed_key(key) else {
                mapping.passthrough.insert(key.clone(), value.clone());
                continue;
            };
            if value.is_null() {
                continue;
            }
            let value = if target == MEASURED_HEIGHT {
                match numeric_value(value).ok().flatten().and_then(Number::from_f64) {
                    Some(n) => Value::Number(n),
                    None => {
                        warn!(value = %value, "dropping non-numeric {MEASURED_HEIGHT}");
                        continue;
                    }
                }
            } else {
                value.clone()
            };
            if mapping.renamed.insert(target.to_owned(), value).is_some() {
                warn!(key = %key, attribute = target, "attribute set by more than one source key");
            }
        }
        mapping
    }

    /// Attributes produced by the rename table.
    #[must_use]
    pub fn renamed(&self) -> &Properties {
        &self.renamed
    }

    /// Attributes passed through with their source names.
    #[must_use]
    pub fn passthrough(&self) -> &Properties {
        &self.passthrough
    }

    /// Flattens both groups into one attribute object.
    ///
    /// A passthrough key that collides with a renamed attribute is reported
    /// and discarded; the renamed value wins.
    #[must_use]
    pub fn into_attributes(self) -> Properties {
        let mut attributes = self.renamed;
        for (key, value) in self.passthrough {
            if attributes.contains_key(&key) {
                warn!(attribute = %key, "source key shadows a renamed attribute, keeping renamed value");
                continue;
            }
            attributes.insert(key, value);
        }
        attributes
    }
}

//! CityJSON model: city objects, attribute remapping and document assembly.

pub mod address;
pub mod attributes;
pub mod builder;
pub mod city_object;
pub mod document;
pub mod height;
pub mod schema;

pub use address::map_address;
pub use attributes::AttributeMapping;
pub use builder::{BuiltObject, CityObjectBuilder};
pub use city_object::{CityObject, CityObjectType};
pub use document::{Document, DocumentBuilder};
pub use height::resolve_height;
pub use schema::{SchemaStore, SchemaVersion};

/// Free-form key/value properties as read from a source or written to a
/// city object. Insertion order is preserved.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Level of detail recorded on extruded solids.
pub const DEFAULT_LOD: f64 = 1.2;

/// CityJSON version written when none is requested.
pub const DEFAULT_VERSION: &str = "1.0";

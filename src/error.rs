use thiserror::Error;

/// Top-level error type for the citylift converter.
#[derive(Debug, Error)]
pub enum CityliftError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Attribute(#[from] AttributeError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("duplicate city object id {0}")]
    DuplicateObject(String),

    /// A failure while building one footprint; aborts the whole run.
    #[error("footprint {id}: {source}")]
    Feature {
        id: String,
        #[source]
        source: Box<CityliftError>,
    },
}

impl CityliftError {
    /// Wraps this error with the id of the footprint being converted.
    #[must_use]
    pub fn for_feature(self, id: impl Into<String>) -> Self {
        Self::Feature {
            id: id.into(),
            source: Box::new(self),
        }
    }
}

/// Errors related to footprint geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("ring has {found} distinct points, at least 3 are required")]
    TooFewPoints { found: usize },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("non-finite coordinate in ring")]
    NonFiniteCoordinate,

    #[error("extrusion height must be finite and non-negative, got {0}")]
    InvalidExtrusionHeight(f64),
}

/// Errors related to attribute remapping.
#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("invalid height value: {0}")]
    InvalidHeight(String),
}

/// Internal consistency errors of an assembled solid.
///
/// These always indicate a defect in the builder, never bad input.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("vertex index {index} out of range for buffer of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("shell has {found} surfaces, expected {expected}")]
    SurfaceCount { found: usize, expected: usize },
}

/// Errors related to CityJSON schema discovery.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unsupported CityJSON version {version} (supported: {supported:?})")]
    UnsupportedVersion {
        version: String,
        supported: Vec<String>,
    },

    #[error("schema directory {0} does not exist")]
    MissingDirectory(String),

    #[error("schema file {0} does not exist")]
    MissingSchema(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised while reading footprint sources.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("malformed OSM element: {0}")]
    MalformedElement(String),

    #[error("cannot infer input format of {0}")]
    UnknownFormat(String),
}

/// Convenience type alias for results using [`CityliftError`].
pub type Result<T> = std::result::Result<T, CityliftError>;

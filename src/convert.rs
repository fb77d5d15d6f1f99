//! Footprints to CityJSON conversion pipeline.

use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::cityjson::{CityObjectBuilder, Document, DocumentBuilder, Properties, DEFAULT_LOD, DEFAULT_VERSION};
use crate::error::Result;
use crate::source::{read_features, FootprintFeature};

/// Options controlling a conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Level of detail recorded on every solid.
    pub lod: f64,
    /// CityJSON version written to the document.
    pub version: String,
    /// Metadata block copied into the document.
    pub metadata: Option<Properties>,
    /// Collapse coincident vertices after assembly.
    pub deduplicate: bool,
    /// Fill `metadata.geographicalExtent` from the vertex bounding box.
    pub compute_extent: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            lod: DEFAULT_LOD,
            version: DEFAULT_VERSION.to_owned(),
            metadata: None,
            deduplicate: false,
            compute_extent: true,
        }
    }
}

/// Converts footprints into a CityJSON document.
///
/// Footprints are processed one at a time, in order. The first failure
/// aborts the run and no document is produced.
///
/// # Errors
///
/// Returns [`CityliftError::Feature`](crate::error::CityliftError::Feature)
/// naming the offending footprint, wrapping either a geometry or attribute
/// error or a [`CityliftError::DuplicateObject`](crate::error::CityliftError::DuplicateObject).
pub fn convert(features: &[FootprintFeature], options: &ConvertOptions) -> Result<Document> {
    let started = Instant::now();
    let mut builder = DocumentBuilder::new(options.version.clone())
        .with_metadata(options.metadata.clone())
        .with_extent(options.compute_extent);

    for feature in features {
        let built = CityObjectBuilder::new(feature).with_lod(options.lod).execute()?;
        builder.push(built)?;
    }

    let mut document = builder.finish();
    if options.deduplicate {
        document.deduplicate_vertices();
    }

    info!(
        objects = document.city_objects().len(),
        vertices = document.vertices().len(),
        elapsed_ms = started.elapsed().as_millis(),
        "converted footprints"
    );
    Ok(document)
}

/// Reads `input` (OSM XML or GeoJSON) and converts it.
///
/// # Errors
///
/// Returns a source error if the file cannot be read, otherwise see
/// [`convert`].
pub fn convert_file(input: &Path, options: &ConvertOptions) -> Result<Document> {
    let features = read_features(input)?;
    convert(&features, options)
}

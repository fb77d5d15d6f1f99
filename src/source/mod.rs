//! Footprint sources: OSM XML and GeoJSON readers.

pub mod geojson;
pub mod osm;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use crate::cityjson::{CityObjectType, Properties};
use crate::error::SourceError;
use crate::geometry::Footprint;

/// One building footprint with its source properties.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintFeature {
    /// Identifier of the resulting city object, unique per source.
    pub id: String,
    pub object_type: CityObjectType,
    pub footprint: Footprint,
    pub properties: Properties,
    /// Id of the owning building, for building parts.
    pub parent: Option<String>,
}

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Osm,
    GeoJson,
}

impl InputFormat {
    /// Infers the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnknownFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("osm" | "xml") => Ok(Self::Osm),
            Some("geojson" | "json") => Ok(Self::GeoJson),
            _ => Err(SourceError::UnknownFormat(path.display().to_string())),
        }
    }
}

/// Reads every footprint from `path`, dispatching on its extension.
///
/// # Errors
///
/// Returns a [`SourceError`] if the format is unknown or the file cannot be
/// read or parsed.
pub fn read_features(path: &Path) -> Result<Vec<FootprintFeature>, SourceError> {
    let format = InputFormat::from_path(path)?;
    let reader = BufReader::new(File::open(path)?);
    let features = match format {
        InputFormat::Osm => osm::OsmData::from_reader(reader)?.footprints(),
        InputFormat::GeoJson => geojson::read_features(reader)?,
    };
    info!(path = %path.display(), ?format, features = features.len(), "read footprints");
    Ok(features)
}

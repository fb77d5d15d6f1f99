use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::cityjson::{CityObjectType, Properties};
use crate::error::SourceError;
use crate::geometry::Footprint;
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;

use super::osm::BUILDING_PART_TAG;
use super::FootprintFeature;

/// Coordinate reference system written on exported collections.
pub const CRS_NAME: &str = "urn:ogc:def:crs:EPSG::4326";

type Position = Vec<f64>;
type PolygonCoordinates = Vec<Vec<Position>>;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: PolygonCoordinates },
    MultiPolygon { coordinates: Vec<PolygonCoordinates> },
    #[serde(other)]
    Other,
}

/// Reads the footprints of a GeoJSON `FeatureCollection`.
///
/// Features without a usable polygon are skipped with a warning.
///
/// # Errors
///
/// Returns a [`SourceError`] if the input is not valid JSON, is not a feature
/// collection, or contains a position with fewer than two ordinates.
pub fn read_features<R: Read>(reader: R) -> Result<Vec<FootprintFeature>, SourceError> {
    let collection: FeatureCollection = serde_json::from_reader(reader)?;
    let mut features = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        if let Some(footprint) = convert_feature(index, feature)? {
            features.push(footprint);
        }
    }
    Ok(features)
}

/// Reads footprints from a GeoJSON string.
///
/// # Errors
///
/// See [`read_features`].
pub fn read_features_str(json: &str) -> Result<Vec<FootprintFeature>, SourceError> {
    read_features(json.as_bytes())
}

fn convert_feature(index: usize, feature: Feature) -> Result<Option<FootprintFeature>, SourceError> {
    let properties = feature.properties.unwrap_or_default();
    let id = format!("feat_{}", feature_key(index, feature.id.as_ref(), &properties));

    let coordinates = match feature.geometry {
        Some(Geometry::Polygon { coordinates }) => coordinates,
        Some(Geometry::MultiPolygon { mut coordinates }) if coordinates.len() == 1 => coordinates.remove(0),
        Some(Geometry::MultiPolygon { coordinates }) => {
            warn!(%id, polygons = coordinates.len(), "multi-part footprint, skipping feature");
            return Ok(None);
        }
        Some(Geometry::Other) => {
            warn!(%id, "unsupported geometry type, skipping feature");
            return Ok(None);
        }
        None => {
            warn!(%id, "feature without geometry, skipping");
            return Ok(None);
        }
    };

    let mut rings = coordinates
        .iter()
        .map(|ring| ring.iter().map(|p| position(&id, p)).collect::<Result<Vec<_>, _>>())
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let Some(exterior) = rings.next() else {
        warn!(%id, "polygon without rings, skipping feature");
        return Ok(None);
    };

    let object_type = if properties.contains_key(BUILDING_PART_TAG) {
        CityObjectType::BuildingPart
    } else {
        CityObjectType::Building
    };

    Ok(Some(FootprintFeature {
        id,
        object_type,
        footprint: Footprint::new(exterior, rings.collect()),
        properties,
        parent: None,
    }))
}

fn feature_key(index: usize, id: Option<&Value>, properties: &Properties) -> String {
    id.or_else(|| properties.get("osm_id"))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| index.to_string())
}

fn position(id: &str, ordinates: &[f64]) -> Result<Point2, SourceError> {
    match ordinates {
        [x, y, ..] => Ok(Point2::new(*x, *y)),
        _ => Err(SourceError::MalformedElement(format!(
            "feature {id}: position with {} ordinates",
            ordinates.len()
        ))),
    }
}

#[derive(Serialize)]
struct ExportFeature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    id: &'a str,
    properties: &'a Properties,
    geometry: Value,
}

/// Writes footprints as a GeoJSON `FeatureCollection` in EPSG:4326.
///
/// Rings are closed and rewound to a counter-clockwise exterior with
/// clockwise holes.
///
/// # Errors
///
/// Returns a [`SourceError`] if writing fails.
pub fn write_feature_collection<W: Write>(
    features: &[FootprintFeature],
    writer: W,
    pretty: bool,
) -> Result<(), SourceError> {
    let features: Vec<ExportFeature<'_>> = features
        .iter()
        .map(|feature| ExportFeature {
            kind: "Feature",
            id: &feature.id,
            properties: &feature.properties,
            geometry: json!({
                "type": "Polygon",
                "coordinates": rewound(&feature.footprint),
            }),
        })
        .collect();
    let collection = json!({
        "type": "FeatureCollection",
        "crs": {"type": "name", "properties": {"name": CRS_NAME}},
        "features": features,
    });
    if pretty {
        serde_json::to_writer_pretty(writer, &collection)?;
    } else {
        serde_json::to_writer(writer, &collection)?;
    }
    Ok(())
}

fn rewound(footprint: &Footprint) -> Vec<Vec<[f64; 2]>> {
    let mut rings = footprint.to_closed_coordinates();
    for (i, ring) in rings.iter_mut().enumerate() {
        let points: Vec<Point2> = ring.iter().map(|[x, y]| Point2::new(*x, *y)).collect();
        let area = signed_area_2d(&points);
        let wants_ccw = i == 0;
        if (area < 0.0 && wants_ccw) || (area > 0.0 && !wants_ccw) {
            ring.reverse();
        }
    }
    rings
}

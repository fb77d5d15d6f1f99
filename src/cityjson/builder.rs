use tracing::{debug, warn};

use crate::error::Result;
use crate::operations::shaping::ExtrudeFootprint;
use crate::source::FootprintFeature;
use crate::topology::VertexBuffer;

use super::address::map_address;
use super::attributes::AttributeMapping;
use super::city_object::{CityObject, CityObjectType};
use super::height::resolve_height;
use super::DEFAULT_LOD;

/// A finished city object together with the private vertex buffer its
/// geometry indexes into.
///
/// Handing it to [`DocumentBuilder::push`](super::DocumentBuilder::push)
/// moves the buffer into the document exactly once.
#[derive(Debug, Clone)]
pub struct BuiltObject {
    pub id: String,
    pub object: CityObject,
    pub vertices: VertexBuffer,
}

/// Builds one city object from a footprint feature.
///
/// Resolves the height, remaps attributes and address, and extrudes the
/// footprint into a single solid. Nothing is retained after `execute`.
pub struct CityObjectBuilder<'a> {
    feature: &'a FootprintFeature,
    lod: f64,
}

impl<'a> CityObjectBuilder<'a> {
    /// Creates a new builder at the default level of detail.
    #[must_use]
    pub fn new(feature: &'a FootprintFeature) -> Self {
        Self {
            feature,
            lod: DEFAULT_LOD,
        }
    }

    /// Sets the level of detail recorded on the geometry.
    #[must_use]
    pub fn with_lod(mut self, lod: f64) -> Self {
        self.lod = lod;
        self
    }

    /// Executes the build.
    ///
    /// # Errors
    ///
    /// Returns [`CityliftError::Feature`](crate::error::CityliftError::Feature)
    /// carrying the feature id and the underlying geometry or attribute error.
    pub fn execute(&self) -> Result<BuiltObject> {
        self.build().map_err(|e| e.for_feature(&self.feature.id))
    }

    fn build(&self) -> Result<BuiltObject> {
        let feature = self.feature;
        let properties = &feature.properties;

        let height = resolve_height(properties)?;
        let attributes = AttributeMapping::from_properties(properties).into_attributes();
        let address = map_address(properties);

        let mut vertices = VertexBuffer::new();
        let solid = ExtrudeFootprint::new(&feature.footprint, height, self.lod).execute(&mut vertices)?;

        let parents = match (feature.object_type, &feature.parent) {
            (CityObjectType::BuildingPart, Some(parent)) => vec![parent.clone()],
            (CityObjectType::Building, Some(parent)) => {
                warn!(id = %feature.id, parent = %parent, "ignoring parent of a Building");
                Vec::new()
            }
            (_, None) => Vec::new(),
        };

        debug!(
            id = %feature.id,
            height,
            surfaces = solid.shell().len(),
            vertices = vertices.len(),
            "built city object"
        );

        Ok(BuiltObject {
            id: feature.id.clone(),
            object: CityObject {
                object_type: feature.object_type,
                attributes,
                address,
                geometry: vec![solid],
                parents,
                children: Vec::new(),
            },
            vertices,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cityjson::Properties;
    use crate::error::{CityliftError, GeometryError};
    use crate::geometry::Footprint;
    use crate::math::Point2;
    use serde_json::json;

    fn rectangle() -> Footprint {
        Footprint::from_exterior(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 3.0),
            Point2::new(0.0, 3.0),
            Point2::new(0.0, 0.0),
        ])
    }

    fn feature(properties: serde_json::Value) -> FootprintFeature {
        FootprintFeature {
            id: "way_1".into(),
            object_type: CityObjectType::Building,
            footprint: rectangle(),
            properties: properties.as_object().cloned().unwrap_or_else(Properties::new),
            parent: None,
        }
    }

    #[test]
    fn builds_building_with_attributes_and_address() {
        let f = feature(json!({
            "height": "10",
            "addr:country": "SG",
            "building": "yes",
        }));
        let built = CityObjectBuilder::new(&f).execute().unwrap();
        assert_eq!(built.id, "way_1");
        assert_eq!(built.object.object_type, CityObjectType::Building);
        assert_eq!(built.object.attributes.get("measuredHeight"), Some(&json!(10.0)));
        assert_eq!(built.object.attributes.get("building"), Some(&json!("yes")));
        assert_eq!(built.object.address.get("CountryName"), Some(&json!("SG")));
        assert_eq!(built.object.geometry.len(), 1);
        assert_eq!(built.object.geometry[0].shell().len(), 6);
        assert_eq!(built.vertices.len(), 24);
    }

    #[test]
    fn lod_is_recorded_on_geometry() {
        let f = feature(json!({}));
        let built = CityObjectBuilder::new(&f).with_lod(2.0).execute().unwrap();
        assert!((built.object.geometry[0].lod - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_height_extrudes_flat() {
        let f = feature(json!({}));
        let built = CityObjectBuilder::new(&f).execute().unwrap();
        assert!(built.vertices.points().iter().all(|p| p.z == 0.0));
        assert!(!built.object.attributes.contains_key("measuredHeight"));
    }

    #[test]
    fn building_part_keeps_parent() {
        let mut f = feature(json!({"building:part": "yes"}));
        f.object_type = CityObjectType::BuildingPart;
        f.parent = Some("way_9".into());
        let built = CityObjectBuilder::new(&f).execute().unwrap();
        assert_eq!(built.object.parents, vec!["way_9".to_string()]);
    }

    #[test]
    fn building_ignores_parent() {
        let mut f = feature(json!({}));
        f.parent = Some("way_9".into());
        let built = CityObjectBuilder::new(&f).execute().unwrap();
        assert!(built.object.parents.is_empty());
    }

    #[test]
    fn geometry_error_names_the_feature() {
        let mut f = feature(json!({}));
        f.footprint = Footprint::from_exterior(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        let err = CityObjectBuilder::new(&f).execute().unwrap_err();
        match err {
            CityliftError::Feature { id, source } => {
                assert_eq!(id, "way_1");
                assert!(matches!(
                    *source,
                    CityliftError::Geometry(GeometryError::TooFewPoints { found: 2 })
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_height_aborts_object() {
        let f = feature(json!({"height": {"value": 3}}));
        let err = CityObjectBuilder::new(&f).execute().unwrap_err();
        assert!(err.to_string().starts_with("footprint way_1: invalid height value"));
    }
}

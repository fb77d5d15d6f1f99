use std::io::Write;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{CityliftError, Result, SourceError};
use crate::math::Point3;
use crate::operations::modification::DeduplicateVertices;
use crate::operations::query::BoundingBox;

use super::builder::BuiltObject;
use super::city_object::CityObject;
use super::Properties;

/// Metadata key filled from the vertex bounding box.
pub const GEOGRAPHICAL_EXTENT: &str = "geographicalExtent";

/// A complete CityJSON document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    #[serde(rename = "type")]
    kind: &'static str,
    version: String,
    #[serde(rename = "CityObjects")]
    city_objects: IndexMap<String, CityObject>,
    #[serde(serialize_with = "serialize_vertices")]
    vertices: Vec<Point3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Properties>,
}

impl Document {
    /// The CityJSON version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// City objects keyed by id, in insertion order.
    #[must_use]
    pub fn city_objects(&self) -> &IndexMap<String, CityObject> {
        &self.city_objects
    }

    /// The global vertex list.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// The metadata block, if any.
    #[must_use]
    pub fn metadata(&self) -> Option<&Properties> {
        self.metadata.as_ref()
    }

    /// Merges coincident vertices across all objects, returning how many
    /// were removed. See [`DeduplicateVertices`].
    pub fn deduplicate_vertices(&mut self) -> usize {
        let solids = self
            .city_objects
            .values_mut()
            .flat_map(|object| object.geometry.iter_mut());
        let removed = DeduplicateVertices::new().execute(&mut self.vertices, solids);
        info!(removed, remaining = self.vertices.len(), "deduplicated vertices");
        removed
    }

    /// Converts the document into a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be represented in JSON.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| SourceError::Json(e).into())
    }

    /// Writes the document as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: W, pretty: bool) -> Result<()> {
        let result = if pretty {
            serde_json::to_writer_pretty(writer, self)
        } else {
            serde_json::to_writer(writer, self)
        };
        result.map_err(|e| SourceError::Json(e).into())
    }
}

fn serialize_vertices<S: Serializer>(
    vertices: &[Point3],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(vertices.iter().map(|p| [p.x, p.y, p.z]))
}

/// Collects built objects into a [`Document`].
///
/// Each object's private vertex buffer is appended to the global vertex
/// list and its indices are shifted by the number of vertices already
/// present, so every buffer is merged exactly once.
#[derive(Debug)]
pub struct DocumentBuilder {
    version: String,
    city_objects: IndexMap<String, CityObject>,
    vertices: Vec<Point3>,
    metadata: Option<Properties>,
    compute_extent: bool,
}

impl DocumentBuilder {
    /// Creates an empty builder for the given CityJSON version.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            city_objects: IndexMap::new(),
            vertices: Vec::new(),
            metadata: None,
            compute_extent: true,
        }
    }

    /// Sets the metadata block.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Option<Properties>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Enables or disables filling `geographicalExtent` on `finish`.
    #[must_use]
    pub fn with_extent(mut self, compute_extent: bool) -> Self {
        self.compute_extent = compute_extent;
        self
    }

    /// Number of objects pushed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.city_objects.len()
    }

    /// Returns `true` if no object has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.city_objects.is_empty()
    }

    /// Adds a built object, merging its vertices into the global list.
    ///
    /// # Errors
    ///
    /// Returns [`CityliftError::Feature`] wrapping
    /// [`CityliftError::DuplicateObject`] if an object with the same id was
    /// already added.
    pub fn push(&mut self, built: BuiltObject) -> Result<()> {
        let BuiltObject {
            id,
            mut object,
            vertices,
        } = built;
        if self.city_objects.contains_key(&id) {
            return Err(CityliftError::DuplicateObject(id.clone()).for_feature(id));
        }
        object.offset_indices(self.vertices.len());
        self.vertices.extend(vertices.into_points());
        self.city_objects.insert(id, object);
        Ok(())
    }

    /// Finishes the document: links building parts to their parents and
    /// fills the metadata extent.
    #[must_use]
    pub fn finish(mut self) -> Document {
        self.link_children();
        let metadata = self.extent_metadata();
        Document {
            kind: "CityJSON",
            version: self.version,
            city_objects: self.city_objects,
            vertices: self.vertices,
            metadata,
        }
    }

    fn link_children(&mut self) {
        let links: Vec<(String, String)> = self
            .city_objects
            .iter()
            .flat_map(|(id, object)| {
                object
                    .parents
                    .iter()
                    .map(move |parent| (parent.clone(), id.clone()))
            })
            .collect();

        for (parent, child) in links {
            if let Some(object) = self.city_objects.get_mut(&parent) {
                object.children.push(child);
            } else {
                warn!(id = %child, parent = %parent, "parent not in document, dropping link");
                if let Some(object) = self.city_objects.get_mut(&child) {
                    object.parents.retain(|p| p != &parent);
                }
            }
        }
    }

    fn extent_metadata(&mut self) -> Option<Properties> {
        let mut metadata = self.metadata.take();
        if !self.compute_extent {
            return metadata;
        }
        let Some(aabb) = BoundingBox::new(&self.vertices).execute() else {
            return metadata;
        };
        let entry = metadata.get_or_insert_with(Properties::new);
        if !entry.contains_key(GEOGRAPHICAL_EXTENT) {
            entry.insert(GEOGRAPHICAL_EXTENT.into(), Value::from(aabb.to_extent().to_vec()));
        }
        metadata
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cityjson::{CityObjectBuilder, CityObjectType};
    use crate::geometry::Footprint;
    use crate::math::Point2;
    use crate::source::FootprintFeature;
    use serde_json::json;

    fn square(x: f64, size: f64) -> Footprint {
        Footprint::from_exterior(vec![
            Point2::new(x, 0.0),
            Point2::new(x + size, 0.0),
            Point2::new(x + size, size),
            Point2::new(x, size),
        ])
    }

    fn built(id: &str, footprint: Footprint, height: &str) -> BuiltObject {
        let feature = FootprintFeature {
            id: id.into(),
            object_type: CityObjectType::Building,
            footprint,
            properties: json!({ "height": height }).as_object().cloned().unwrap(),
            parent: None,
        };
        CityObjectBuilder::new(&feature).execute().unwrap()
    }

    #[test]
    fn second_object_indices_are_offset() {
        let mut builder = DocumentBuilder::new("1.0");
        builder.push(built("a", square(0.0, 1.0), "3")).unwrap();
        builder.push(built("b", square(5.0, 1.0), "6")).unwrap();
        let doc = builder.finish();

        assert_eq!(doc.vertices().len(), 48);
        let b = &doc.city_objects()["b"];
        let indices: Vec<usize> = b.geometry[0]
            .shell()
            .surfaces()
            .iter()
            .flat_map(|s| s.indices().collect::<Vec<_>>())
            .collect();
        assert_eq!(indices.iter().min(), Some(&24));
        assert_eq!(indices.iter().max(), Some(&47));
        assert!((doc.vertices()[24].x - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut builder = DocumentBuilder::new("1.0");
        builder.push(built("a", square(0.0, 1.0), "3")).unwrap();
        let err = builder.push(built("a", square(5.0, 1.0), "3")).unwrap_err();
        match err {
            CityliftError::Feature { id, source } => {
                assert_eq!(id, "a");
                assert!(matches!(*source, CityliftError::DuplicateObject(ref dup) if dup == "a"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn document_serializes_as_cityjson() {
        let mut builder = DocumentBuilder::new("1.0").with_extent(false);
        builder.push(built("a", square(0.0, 1.0), "3")).unwrap();
        let value = builder.finish().to_value().unwrap();

        assert_eq!(value["type"], "CityJSON");
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["vertices"].as_array().unwrap().len(), 24);
        assert_eq!(value["vertices"][0].as_array().unwrap().len(), 3);
        assert_eq!(value["CityObjects"]["a"]["type"], "Building");
        assert_eq!(value["CityObjects"]["a"]["geometry"][0]["type"], "Solid");
        assert!(value["CityObjects"]["a"].get("vertices").is_none());
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn extent_is_added_to_metadata() {
        let metadata = json!({"referenceSystem": "urn:ogc:def:crs:EPSG::3414"});
        let mut builder =
            DocumentBuilder::new("1.0").with_metadata(metadata.as_object().cloned());
        builder.push(built("a", square(2.0, 3.0), "7")).unwrap();
        let doc = builder.finish();
        let metadata = doc.metadata().unwrap();
        assert_eq!(metadata[GEOGRAPHICAL_EXTENT], json!([2.0, 0.0, 0.0, 5.0, 3.0, 7.0]));
        assert_eq!(metadata["referenceSystem"], "urn:ogc:def:crs:EPSG::3414");
    }

    #[test]
    fn declared_extent_is_kept() {
        let metadata = json!({"geographicalExtent": [0, 0, 0, 1, 1, 1]});
        let mut builder =
            DocumentBuilder::new("1.0").with_metadata(metadata.as_object().cloned());
        builder.push(built("a", square(2.0, 3.0), "7")).unwrap();
        let doc = builder.finish();
        assert_eq!(doc.metadata().unwrap()[GEOGRAPHICAL_EXTENT], json!([0, 0, 0, 1, 1, 1]));
    }

    #[test]
    fn parts_are_linked_to_parents() {
        let mut builder = DocumentBuilder::new("1.0");
        builder.push(built("way_1", square(0.0, 10.0), "10")).unwrap();

        let mut part = built("way_2", square(0.0, 5.0), "20");
        part.object.object_type = CityObjectType::BuildingPart;
        part.object.parents = vec!["way_1".into()];
        builder.push(part).unwrap();

        let mut orphan = built("way_3", square(20.0, 5.0), "20");
        orphan.object.object_type = CityObjectType::BuildingPart;
        orphan.object.parents = vec!["way_404".into()];
        builder.push(orphan).unwrap();

        let doc = builder.finish();
        assert_eq!(doc.city_objects()["way_1"].children, vec!["way_2".to_string()]);
        assert_eq!(doc.city_objects()["way_2"].parents, vec!["way_1".to_string()]);
        assert!(doc.city_objects()["way_3"].parents.is_empty());
    }

    #[test]
    fn deduplication_keeps_geometry_consistent() {
        let mut builder = DocumentBuilder::new("1.0");
        builder.push(built("a", square(0.0, 1.0), "3")).unwrap();
        builder.push(built("b", square(1.0, 1.0), "3")).unwrap();
        let mut doc = builder.finish();

        let removed = doc.deduplicate_vertices();
        // two boxes sharing one wall: 8 + 8 - 4 corners
        assert_eq!(doc.vertices().len(), 12);
        assert_eq!(removed, 48 - 12);
        for object in doc.city_objects().values() {
            for surface in object.geometry[0].shell().surfaces() {
                assert!(surface.indices().all(|i| i < doc.vertices().len()));
            }
        }
    }
}

use std::io::BufRead;
use std::path::Path;

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cityjson::{CityObjectType, Properties};
use crate::error::SourceError;
use crate::geometry::Footprint;
use crate::math::polygon_2d::distinct_point_count;
use crate::math::Point2;

use super::FootprintFeature;

/// Tag marking a way as a building outline.
pub const BUILDING_TAG: &str = "building";
/// Tag marking a way as part of a building.
pub const BUILDING_PART_TAG: &str = "building:part";

/// An OSM node: a WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OsmNode {
    pub lon: f64,
    pub lat: f64,
}

/// An OSM way: ordered node references plus tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OsmWay {
    /// XML attributes other than `id` (`version`, `user`, `timestamp`, ...).
    pub attributes: Properties,
    pub nodes: Vec<String>,
    pub tags: Properties,
}

/// A relation member reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsmMember {
    pub kind: String,
    pub reference: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OsmRelation {
    pub members: Vec<OsmMember>,
    pub tags: Properties,
}

enum Element {
    Node(String, OsmNode),
    Way(String, OsmWay),
    Relation(String, OsmRelation),
}

impl Element {
    fn tags_mut(&mut self) -> Option<&mut Properties> {
        match self {
            Self::Node(..) => None,
            Self::Way(_, way) => Some(&mut way.tags),
            Self::Relation(_, relation) => Some(&mut relation.tags),
        }
    }
}

/// The contents of an OSM XML document, keyed by element id.
///
/// Ways and relations keep document order.
#[derive(Debug, Clone, Default)]
pub struct OsmData {
    pub nodes: FxHashMap<String, OsmNode>,
    pub ways: IndexMap<String, OsmWay>,
    pub relations: IndexMap<String, OsmRelation>,
}

impl OsmData {
    /// Parses an OSM XML stream.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] on malformed XML or on a node, way or
    /// relation missing a required attribute.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, SourceError> {
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(true);

        let mut data = Self::default();
        let mut current: Option<Element> = None;
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => data.start(&start, &mut current)?,
                Event::Empty(start) => {
                    data.start(&start, &mut current)?;
                    data.end(start.name().as_ref(), &mut current);
                }
                Event::End(end) => data.end(end.name().as_ref(), &mut current),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        debug!(
            nodes = data.nodes.len(),
            ways = data.ways.len(),
            relations = data.relations.len(),
            "parsed OSM document"
        );
        Ok(data)
    }

    /// Parses an OSM XML string.
    ///
    /// # Errors
    ///
    /// See [`OsmData::from_reader`].
    pub fn from_xml_str(xml: &str) -> Result<Self, SourceError> {
        Self::from_reader(xml.as_bytes())
    }

    /// Parses an OSM XML file.
    ///
    /// # Errors
    ///
    /// See [`OsmData::from_reader`].
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    fn start(&mut self, start: &BytesStart<'_>, current: &mut Option<Element>) -> Result<(), SourceError> {
        let attrs = collect_attributes(start)?;
        match start.name().as_ref() {
            b"node" => {
                let id = required(&attrs, "node", "id")?.to_owned();
                let node = OsmNode {
                    lon: coordinate(&attrs, "lon")?,
                    lat: coordinate(&attrs, "lat")?,
                };
                *current = Some(Element::Node(id, node));
            }
            b"way" => {
                let id = required(&attrs, "way", "id")?.to_owned();
                let attributes = attrs
                    .into_iter()
                    .filter(|(key, _)| key != "id")
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect();
                *current = Some(Element::Way(
                    id,
                    OsmWay {
                        attributes,
                        ..OsmWay::default()
                    },
                ));
            }
            b"relation" => {
                let id = required(&attrs, "relation", "id")?.to_owned();
                *current = Some(Element::Relation(id, OsmRelation::default()));
            }
            b"tag" => {
                if let Some(tags) = current.as_mut().and_then(Element::tags_mut) {
                    let key = required(&attrs, "tag", "k")?.to_owned();
                    let value = required(&attrs, "tag", "v")?.to_owned();
                    tags.insert(key, Value::String(value));
                }
            }
            b"nd" => {
                if let Some(Element::Way(_, way)) = current.as_mut() {
                    way.nodes.push(required(&attrs, "nd", "ref")?.to_owned());
                }
            }
            b"member" => {
                if let Some(Element::Relation(_, relation)) = current.as_mut() {
                    relation.members.push(OsmMember {
                        kind: required(&attrs, "member", "type")?.to_owned(),
                        reference: required(&attrs, "member", "ref")?.to_owned(),
                        role: attribute(&attrs, "role")
                            .map(str::trim)
                            .filter(|r| !r.is_empty())
                            .map(str::to_owned),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8], current: &mut Option<Element>) {
        if !matches!(name, b"node" | b"way" | b"relation") {
            return;
        }
        match current.take() {
            Some(Element::Node(id, node)) => {
                self.nodes.insert(id, node);
            }
            Some(Element::Way(id, way)) => {
                self.ways.insert(id, way);
            }
            Some(Element::Relation(id, relation)) => {
                self.relations.insert(id, relation);
            }
            None => {}
        }
    }

    /// Turns every building way into a footprint feature, in document order.
    ///
    /// Node references missing from the document are skipped with a warning;
    /// a way left with fewer than three distinct resolvable nodes (the closing
    /// node does not count twice) is skipped entirely.
    #[must_use]
    pub fn footprints(&self) -> Vec<FootprintFeature> {
        let parents = self.part_parents();
        self.ways
            .iter()
            .filter_map(|(way_id, way)| {
                let object_type = if way.tags.contains_key(BUILDING_PART_TAG) {
                    CityObjectType::BuildingPart
                } else if way.tags.contains_key(BUILDING_TAG) {
                    CityObjectType::Building
                } else {
                    return None;
                };

                let id = format!("way_{way_id}");
                let points = self.resolve_nodes(&id, way);
                let distinct = distinct_point_count(&points);
                if distinct < 3 {
                    warn!(%id, distinct, "too few resolvable nodes, skipping way");
                    return None;
                }

                let mut properties = Properties::new();
                properties.insert("osm_id".into(), Value::String(id.clone()));
                properties.extend(way.attributes.clone());
                properties.extend(way.tags.clone());

                let parent = match object_type {
                    CityObjectType::BuildingPart => parents.get(way_id.as_str()).map(|p| format!("way_{p}")),
                    CityObjectType::Building => None,
                };

                Some(FootprintFeature {
                    id,
                    object_type,
                    footprint: Footprint::from_exterior(points),
                    properties,
                    parent,
                })
            })
            .collect()
    }

    fn resolve_nodes(&self, id: &str, way: &OsmWay) -> Vec<Point2> {
        way.nodes
            .iter()
            .filter_map(|node_ref| match self.nodes.get(node_ref) {
                Some(node) => Some(Point2::new(node.lon, node.lat)),
                None => {
                    warn!(%id, node = %node_ref, "missing node reference");
                    None
                }
            })
            .collect()
    }

    /// Maps building-part way ids to their outline way id, from relations
    /// tagged `type=building`.
    fn part_parents(&self) -> FxHashMap<&str, &str> {
        let mut parents = FxHashMap::default();
        for relation in self.relations.values() {
            if relation.tags.get("type").and_then(Value::as_str) != Some("building") {
                continue;
            }
            let ways = relation.members.iter().filter(|m| m.kind == "way");
            let Some(outline) = ways.clone().find(|m| m.role.as_deref() == Some("outline")) else {
                continue;
            };
            for part in ways.filter(|m| m.role.as_deref() == Some("part")) {
                parents.insert(part.reference.as_str(), outline.reference.as_str());
            }
        }
        parents
    }
}

fn collect_attributes(start: &BytesStart<'_>) -> Result<Vec<(String, String)>, SourceError> {
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.push((key, value));
    }
    Ok(attrs)
}

fn attribute<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

fn required<'a>(attrs: &'a [(String, String)], element: &str, key: &str) -> Result<&'a str, SourceError> {
    attribute(attrs, key).ok_or_else(|| SourceError::MalformedElement(format!("<{element}> without {key}")))
}

fn coordinate(attrs: &[(String, String)], key: &str) -> Result<f64, SourceError> {
    let raw = required(attrs, "node", key)?;
    raw.trim()
        .parse()
        .map_err(|_| SourceError::MalformedElement(format!("<node> with invalid {key} {raw:?}")))
}

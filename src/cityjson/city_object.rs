use serde::Serialize;

use crate::topology::Solid;

use super::Properties;

/// CityJSON object types produced from footprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CityObjectType {
    Building,
    BuildingPart,
}

/// One CityJSON city object.
///
/// Built fresh for each footprint; vertex indices in `geometry` refer to the
/// vertex list of the document that owns the object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityObject {
    #[serde(rename = "type")]
    pub object_type: CityObjectType,
    #[serde(skip_serializing_if = "Properties::is_empty")]
    pub attributes: Properties,
    #[serde(skip_serializing_if = "Properties::is_empty")]
    pub address: Properties,
    pub geometry: Vec<Solid>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
}

impl CityObject {
    /// Shifts every vertex index of every geometry by `offset`.
    pub(crate) fn offset_indices(&mut self, offset: usize) {
        for solid in &mut self.geometry {
            for surface in solid.shell_mut().surfaces_mut() {
                surface.map_indices(|i| i + offset);
            }
        }
    }
}

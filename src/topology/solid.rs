use serde::Serialize;

use super::surface::Shell;

/// A CityJSON `Solid` geometry record.
///
/// Only single-shell, void-free solids are produced, so the boundary list
/// always holds exactly one shell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Solid")]
pub struct Solid {
    /// Level of detail of the record.
    pub lod: f64,
    boundaries: [Shell; 1],
}

impl Solid {
    /// Wraps a closed shell as a solid at the given level of detail.
    #[must_use]
    pub fn new(lod: f64, shell: Shell) -> Self {
        Self {
            lod,
            boundaries: [shell],
        }
    }

    /// The outer (and only) shell.
    #[must_use]
    pub fn shell(&self) -> &Shell {
        &self.boundaries[0]
    }

    /// Mutable access to the shell, for index remapping.
    pub fn shell_mut(&mut self) -> &mut Shell {
        &mut self.boundaries[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Surface;

    #[test]
    fn solid_serializes_with_type_tag() {
        let shell = Shell::new(vec![Surface::quad([0, 1, 2, 3])]);
        let value = serde_json::to_value(Solid::new(1.2, shell)).unwrap_or_default();
        assert_eq!(value["type"], "Solid");
        assert_eq!(value["lod"], 1.2);
        assert_eq!(value["boundaries"], serde_json::json!([[[[0, 1, 2, 3]]]]));
    }
}

use crate::error::Result;
use crate::geometry::{Footprint, Orientation, Ring};

/// The rings of a footprint in canonical form: open, exterior wound
/// counter-clockwise and every hole wound clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRings {
    /// The outer boundary, counter-clockwise.
    pub exterior: Ring,
    /// The holes in source order, each clockwise.
    pub holes: Vec<Ring>,
}

impl NormalizedRings {
    /// Total number of points across the exterior and all holes.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.exterior.len() + self.holes.iter().map(Ring::len).sum::<usize>()
    }
}

/// Normalizes the exterior and interior rings of a footprint.
///
/// The closing point of each ring is removed and the winding is forced so
/// that wall normals point outward whatever the source winding was.
pub struct NormalizeRings<'a> {
    footprint: &'a Footprint,
}

impl<'a> NormalizeRings<'a> {
    /// Creates a new `NormalizeRings` operation.
    #[must_use]
    pub fn new(footprint: &'a Footprint) -> Self {
        Self { footprint }
    }

    /// Executes the normalization.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`](crate::error::GeometryError) if any ring has
    /// fewer than three distinct points, a non-finite coordinate or zero area.
    pub fn execute(&self) -> Result<NormalizedRings> {
        let exterior = Ring::from_closed(self.footprint.exterior().to_vec())?
            .oriented(Orientation::CounterClockwise);

        let holes = self
            .footprint
            .interiors()
            .iter()
            .map(|ring| {
                Ring::from_closed(ring.clone()).map(|r| r.oriented(Orientation::Clockwise))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(NormalizedRings { exterior, holes })
    }
}

use crate::math::Point2;

/// A building outline as delivered by a footprint source.
///
/// Rings are kept exactly as supplied: closed or open, in any winding.
/// Normalization happens in [`NormalizeRings`](crate::operations::shaping::NormalizeRings).
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    exterior: Vec<Point2>,
    interiors: Vec<Vec<Point2>>,
}

impl Footprint {
    /// Creates a footprint from an exterior ring and zero or more holes.
    #[must_use]
    pub fn new(exterior: Vec<Point2>, interiors: Vec<Vec<Point2>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Creates a footprint without holes.
    #[must_use]
    pub fn from_exterior(exterior: Vec<Point2>) -> Self {
        Self::new(exterior, Vec::new())
    }

    /// The outer boundary as supplied.
    #[must_use]
    pub fn exterior(&self) -> &[Point2] {
        &self.exterior
    }

    /// The holes as supplied.
    #[must_use]
    pub fn interiors(&self) -> &[Vec<Point2>] {
        &self.interiors
    }

    /// Returns every ring as a closed `[x, y]` coordinate list, exterior first,
    /// in the nesting used by GeoJSON `Polygon` coordinates.
    #[must_use]
    pub fn to_closed_coordinates(&self) -> Vec<Vec<[f64; 2]>> {
        std::iter::once(&self.exterior)
            .chain(&self.interiors)
            .map(|ring| {
                let mut coords: Vec<[f64; 2]> = ring.iter().map(|p| [p.x, p.y]).collect();
                if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
                    if first != last {
                        coords.push(*first);
                    }
                }
                coords
            })
            .collect()
    }
}

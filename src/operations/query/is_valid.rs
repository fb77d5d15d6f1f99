use crate::error::TopologyError;
use crate::topology::{Solid, VertexBuffer};

/// Validates that a solid only references vertices present in a buffer and,
/// optionally, that its shell has the expected number of surfaces.
pub struct IsValid<'a> {
    solid: &'a Solid,
    expected_surfaces: Option<usize>,
}

impl<'a> IsValid<'a> {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(solid: &'a Solid) -> Self {
        Self {
            solid,
            expected_surfaces: None,
        }
    }

    /// Also require the shell to have exactly `count` surfaces.
    #[must_use]
    pub fn with_expected_surfaces(mut self, count: usize) -> Self {
        self.expected_surfaces = Some(count);
        self
    }

    /// Executes the validation.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`] for the first index not yet
    /// assigned by `buffer`, or [`TopologyError::SurfaceCount`] if the shell
    /// has the wrong number of surfaces.
    pub fn execute(&self, buffer: &VertexBuffer) -> Result<(), TopologyError> {
        let shell = self.solid.shell();
        if let Some(expected) = self.expected_surfaces {
            if shell.len() != expected {
                return Err(TopologyError::SurfaceCount {
                    found: shell.len(),
                    expected,
                });
            }
        }
        let len = buffer.len();
        for surface in shell.surfaces() {
            if let Some(index) = surface.indices().find(|&i| i >= len) {
                return Err(TopologyError::IndexOutOfRange { index, len });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::topology::{Shell, Surface};

    fn buffer(n: usize) -> VertexBuffer {
        let mut buf = VertexBuffer::new();
        for i in 0..n {
            #[allow(clippy::cast_precision_loss)]
            buf.push(Point3::new(i as f64, 0.0, 0.0));
        }
        buf
    }

    #[test]
    fn in_range_indices_pass() {
        let solid = Solid::new(1.0, Shell::new(vec![Surface::quad([0, 1, 2, 3])]));
        assert!(IsValid::new(&solid).execute(&buffer(4)).is_ok());
    }

    #[test]
    fn unassigned_index_fails() {
        let solid = Solid::new(1.0, Shell::new(vec![Surface::quad([0, 1, 2, 4])]));
        let err = IsValid::new(&solid).execute(&buffer(4)).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::IndexOutOfRange { index: 4, len: 4 }
        ));
    }

    #[test]
    fn wrong_surface_count_fails() {
        let solid = Solid::new(1.0, Shell::new(vec![Surface::quad([0, 1, 2, 3])]));
        let err = IsValid::new(&solid)
            .with_expected_surfaces(6)
            .execute(&buffer(4))
            .unwrap_err();
        assert!(matches!(
            err,
            TopologyError::SurfaceCount {
                found: 1,
                expected: 6
            }
        ));
    }
}

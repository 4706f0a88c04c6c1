// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Region algebra on top of the mesh primitives: cutting a region by a
// polygon, merging regions back together, and removing redundant vertices.
// `group` lifts cutting and merging to lists of regions.

mod clean;
mod group;
mod interiors;
mod mark;
mod merge;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::error::Result;
use crate::mesh::{Mesh, RegionIdx};
use crate::point::Point2D;
use crate::scalar::Scalar;

/// Regions produced by [`Mesh::sub_allocate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Pieces inside the cutting polygon.
    pub interior: Vec<RegionIdx>,
    /// Pieces outside it.
    pub exterior: Vec<RegionIdx>,
}

impl<S: Scalar> Mesh<S> {
    pub(crate) fn after_operation(&self) -> Result<()> {
        if self.check_invariants {
            self.validate()?;
        }
        Ok(())
    }

    /// Cut region `target` by the simple polygon `boundary`.
    ///
    /// Every face of the region ends up in exactly one returned region, on
    /// the interior list when it lies inside the polygon. When the polygon
    /// never meets the region the mesh is left untouched; otherwise `target`
    /// is dissolved and replaced by one region per resulting face.
    pub fn sub_allocate(&mut self, target: RegionIdx, boundary: &[Point2D<S>]) -> Result<Allocation> {
        self.check_region(target)?;
        let (mut ring, area) = self.normalized_ring(boundary)?;
        if area.is_negative() {
            ring.reverse();
        }
        debug!(region = target, points = ring.len(), "sub_allocate");

        let mut marking = self.mark_region(target, &ring)?;
        let allocation = if marking.untouched {
            self.route_untouched(target, &ring)?
        } else {
            self.insert_interior_runs(target, &mut marking.details)?;
            self.split_by_side(target, &ring)?
        };
        debug!(
            interior = allocation.interior.len(),
            exterior = allocation.exterior.len(),
            "sub_allocate finished"
        );
        self.after_operation()?;
        Ok(allocation)
    }
}

// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Operations over lists of regions: merging a group down to its connected
// pieces, and cutting every member of a set by one polygon.

use tracing::debug;

use crate::error::Result;
use crate::mesh::{Mesh, RegionIdx};
use crate::point::Point2D;
use crate::scalar::Scalar;

impl<S: Scalar> Mesh<S> {
    /// Merge every pair of adjacent regions in `group`, then merge each
    /// survivor with itself. Absorbed regions are dissolved and dropped from
    /// the list; the first region of each connected cluster survives.
    pub fn merge_group(&mut self, group: &mut Vec<RegionIdx>) -> Result<()> {
        let mut seen: Vec<RegionIdx> = Vec::with_capacity(group.len());
        group.retain(|r| {
            if seen.contains(r) {
                false
            } else {
                seen.push(*r);
                true
            }
        });

        let before = group.len();
        let mut k = 0;
        while k < group.len() {
            let focus = group[k];
            self.merge_regions(focus, focus)?;
            let mut j = k + 1;
            while j < group.len() {
                if self.merge_regions(focus, group[j])? {
                    group.remove(j);
                    // focus grew; rescan the members it skipped
                    j = k + 1;
                } else {
                    j += 1;
                }
            }
            k += 1;
        }
        debug!(before, after = group.len(), "merge_group");
        Ok(())
    }

    /// Cut every region of `set` by `boundary`. The pieces inside are merged
    /// into connected regions and returned; `set` is replaced by the merged
    /// pieces outside.
    pub fn allocate_boundary_from(
        &mut self,
        boundary: &[Point2D<S>],
        set: &mut Vec<RegionIdx>,
    ) -> Result<Vec<RegionIdx>> {
        let mut inside = Vec::new();
        self.allocate_boundary_from_into(boundary, set, &mut inside)?;
        Ok(inside)
    }

    /// Like [`Mesh::allocate_boundary_from`], but the inside pieces join
    /// `result` and are merged together with whatever it already holds.
    pub fn allocate_boundary_from_into(
        &mut self,
        boundary: &[Point2D<S>],
        set: &mut Vec<RegionIdx>,
        result: &mut Vec<RegionIdx>,
    ) -> Result<()> {
        self.normalized_ring(boundary)?;
        for &r in set.iter() {
            self.check_region(r)?;
        }

        let mut outside: Vec<RegionIdx> = Vec::new();
        for &member in set.iter() {
            let allocation = self.sub_allocate(member, boundary)?;
            result.extend(allocation.interior);
            outside.extend(allocation.exterior);
        }
        self.merge_group(result)?;
        self.merge_group(&mut outside)?;
        debug!(inside = result.len(), outside = outside.len(), "allocate_boundary_from");
        *set = outside;
        Ok(())
    }
}

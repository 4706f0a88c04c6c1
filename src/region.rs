// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Regions group faces into one logical area. Membership is mutual: a face
// names its region in `Face::group`, and the region lists the face.

use std::collections::HashSet;

use crate::error::{DcelError, Result};
use crate::mesh::{sym, EdgeIdx, FaceIdx, FaceRelation, Mesh, RegionIdx, INVALID, UNIVERSE};
use crate::point::{Point2D, Relation};
use crate::scalar::Scalar;

#[derive(Clone, Debug, Default)]
pub struct Region {
    pub(crate) faces: Vec<FaceIdx>,
    pub(crate) live: bool,
}

impl Region {
    pub fn faces(&self) -> &[FaceIdx] {
        &self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl<S: Scalar> Mesh<S> {
    /// Create an empty region.
    pub fn new_region(&mut self) -> RegionIdx {
        let region = Region { faces: Vec::new(), live: true };
        if let Some(r) = self.region_free.pop() {
            self.regions[r as usize] = region;
            r
        } else {
            self.regions.push(region);
            (self.regions.len() - 1) as RegionIdx
        }
    }

    /// Create a region holding `f`, moving it out of any previous region.
    pub fn region_from_face(&mut self, f: FaceIdx) -> Result<RegionIdx> {
        self.check_face(f)?;
        if f == UNIVERSE {
            return Err(DcelError::Unbounded(f));
        }
        let r = self.new_region();
        self.attach_face(r, f);
        Ok(r)
    }

    /// Draw `boundary` as a new face and wrap it in a new region.
    pub fn region_from_boundary(&mut self, boundary: &[Point2D<S>]) -> Result<RegionIdx> {
        let f = self.draw(boundary)?;
        let r = self.new_region();
        self.attach_face(r, f);
        Ok(r)
    }

    /// # Panics
    /// If `r` is out of range.
    #[inline]
    pub fn region(&self, r: RegionIdx) -> &Region {
        &self.regions[r as usize]
    }

    /// Member faces of `r`; empty for a dissolved region.
    ///
    /// # Panics
    /// If `r` is out of range.
    #[inline]
    pub fn region_faces(&self, r: RegionIdx) -> &[FaceIdx] {
        &self.regions[r as usize].faces
    }

    /// Move `f` into `r`. Both handles must be live.
    pub(crate) fn attach_face(&mut self, r: RegionIdx, f: FaceIdx) {
        let old = self.faces[f as usize].group;
        if old == r {
            return;
        }
        if old != INVALID {
            self.regions[old as usize].faces.retain(|&x| x != f);
        }
        self.faces[f as usize].group = r;
        self.regions[r as usize].faces.push(f);
    }

    pub fn region_append(&mut self, r: RegionIdx, f: FaceIdx) -> Result<()> {
        self.check_region(r)?;
        self.check_face(f)?;
        if f == UNIVERSE {
            return Err(DcelError::Unbounded(f));
        }
        self.attach_face(r, f);
        Ok(())
    }

    /// Take `f` out of `r`; a face that is not a member is left alone.
    pub fn region_remove(&mut self, r: RegionIdx, f: FaceIdx) -> Result<()> {
        self.check_region(r)?;
        self.check_face(f)?;
        if self.faces[f as usize].group == r {
            self.faces[f as usize].group = INVALID;
            self.regions[r as usize].faces.retain(|&x| x != f);
        }
        Ok(())
    }

    pub fn region_clear(&mut self, r: RegionIdx) -> Result<()> {
        self.check_region(r)?;
        for f in std::mem::take(&mut self.regions[r as usize].faces) {
            self.faces[f as usize].group = INVALID;
        }
        Ok(())
    }

    /// Dissolve `r`. Its faces stay in the mesh, ungrouped.
    pub fn remove_region(&mut self, r: RegionIdx) -> Result<()> {
        self.region_clear(r)?;
        self.regions[r as usize] = Region::default();
        self.region_free.push(r);
        Ok(())
    }

    /// Distinct other regions owning a face adjacent to any face of `r`.
    pub fn region_neighbors(&self, r: RegionIdx) -> Result<Vec<RegionIdx>> {
        self.check_region(r)?;
        let mut out: Vec<RegionIdx> = Vec::new();
        for &f in &self.regions[r as usize].faces {
            for g in self.face_neighbors(f) {
                let owner = self.faces[g as usize].group;
                if owner != INVALID && owner != r && !out.contains(&owner) {
                    out.push(owner);
                }
            }
        }
        Ok(out)
    }

    /// On the boundary of any member face wins over interior to any member
    /// face; otherwise the point is outside the region.
    pub fn region_contains(&self, r: RegionIdx, p: &Point2D<S>) -> Result<FaceRelation> {
        self.check_region(r)?;
        let mut result = FaceRelation::exterior();
        for &f in &self.regions[r as usize].faces {
            let relation = self.point_relation(f, p)?;
            match relation.kind {
                Relation::OnBoundary => return Ok(relation),
                Relation::Interior => result = relation,
                Relation::Exterior => {}
            }
        }
        Ok(result)
    }

    /// Member face whose interior holds `p`.
    pub(crate) fn region_face_at(&self, r: RegionIdx, p: &Point2D<S>) -> Result<Option<FaceIdx>> {
        for &f in &self.regions[r as usize].faces {
            if self.point_relation(f, p)?.kind == Relation::Interior {
                return Ok(Some(f));
            }
        }
        Ok(None)
    }

    pub fn region_area(&self, r: RegionIdx) -> Result<S> {
        self.check_region(r)?;
        let mut total = S::zero();
        for &f in &self.regions[r as usize].faces {
            total = total.checked_add(self.face_area(f)?)?;
        }
        Ok(total)
    }

    /// Boundary edges of every member face, one half of each pair.
    pub(crate) fn region_edges(&self, r: RegionIdx) -> Vec<EdgeIdx> {
        let mut out: Vec<EdgeIdx> = Vec::new();
        let mut seen: HashSet<EdgeIdx> = HashSet::new();
        for &f in &self.regions[r as usize].faces {
            for h in self.face_edges(f) {
                if seen.contains(&sym(h)) {
                    continue;
                }
                seen.insert(h);
                out.push(h);
            }
        }
        out
    }
}

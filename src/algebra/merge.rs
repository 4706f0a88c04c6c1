// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

use tracing::debug;

use crate::error::{DcelError, Result};
use crate::mesh::{sym, EdgeIdx, EdgeModResult, FaceIdx, Mesh, RegionIdx};
use crate::scalar::Scalar;

impl<S: Scalar> Mesh<S> {
    /// Delete every edge face `a` shares with face `b`.
    ///
    /// Returns the faces left standing where `a` and `b` were, or `None`
    /// when the two share no edge (including `a == b`).
    pub fn merge_faces(&mut self, a: FaceIdx, b: FaceIdx) -> Result<Option<Vec<FaceIdx>>> {
        self.check_face(a)?;
        self.check_face(b)?;
        if a == b {
            return Ok(None);
        }
        let shared: Vec<EdgeIdx> = self
            .face_edges(a)
            .into_iter()
            .filter(|&h| self.face_of(sym(h)) == b)
            .collect();
        if shared.is_empty() {
            return Ok(None);
        }

        let mut product = vec![a, b];
        for h in shared {
            match self.delete_edge(h)? {
                EdgeModResult::FaceCreated(f) => product.push(f),
                EdgeModResult::FaceDestroyed(f) => product.retain(|&x| x != f),
                EdgeModResult::FacesPreserved => {}
            }
        }
        product.retain(|&f| self.is_live_face(f));
        debug!(a, b, faces = product.len(), "faces merged");
        Ok(Some(product))
    }

    fn adjacent_pair(&self, a: RegionIdx, b: RegionIdx) -> Option<(FaceIdx, FaceIdx)> {
        for &fa in self.region_faces(a) {
            for g in self.face_neighbors(fa) {
                if g != fa && self.faces[g as usize].group == b {
                    return Some((fa, g));
                }
            }
        }
        None
    }

    /// Union two regions along their shared boundary. `b` is folded into
    /// `a` and dissolved. With `a == b`, every pair of adjacent member faces
    /// is merged instead.
    ///
    /// Returns `false` when nothing was adjacent, leaving both untouched.
    pub fn merge_regions(&mut self, a: RegionIdx, b: RegionIdx) -> Result<bool> {
        self.check_region(a)?;
        self.check_region(b)?;
        let mut merged = false;
        while let Some((fa, fb)) = self.adjacent_pair(a, b) {
            self.merge_faces(fa, fb)?;
            merged = true;
        }
        if merged && a != b {
            for f in self.region_faces(b).to_vec() {
                self.attach_face(a, f);
            }
            self.remove_region(b)?;
        }
        debug!(a, b, merged, faces = self.region_faces(a).len(), "merge_regions");
        self.after_operation()?;
        Ok(merged)
    }

    /// Connect the ends of edges `a` and `b`, both on faces of region `r`.
    /// When the new edge splits a face, the split-off face moves to a new
    /// region, which is returned.
    pub fn region_add(&mut self, r: RegionIdx, a: EdgeIdx, b: EdgeIdx) -> Result<Option<RegionIdx>> {
        self.check_region(r)?;
        self.check_edge(a)?;
        self.check_edge(b)?;
        if self.faces[self.face_of(a) as usize].group != r {
            return Err(DcelError::FaceMismatch { a, b });
        }
        let (e, result) = self.connect(a, b)?;
        let split = match result {
            EdgeModResult::FaceCreated(f) => Some(self.region_from_face(f)?),
            _ => None,
        };
        debug!(region = r, edge = e, split = split.is_some(), "region_add");
        self.after_operation()?;
        Ok(split)
    }
}

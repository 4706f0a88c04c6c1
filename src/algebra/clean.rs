// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

use tracing::{debug, trace};

use crate::error::Result;
use crate::mesh::{sym, EdgeIdx, Mesh, RegionIdx};
use crate::scalar::Scalar;

impl<S: Scalar> Mesh<S> {
    /// Whether the vertex between `focus` and `next` has no other edges and
    /// the two edges continue in the same direction.
    fn is_straight_pass(&self, focus: EdgeIdx, next: EdgeIdx) -> Result<bool> {
        if self.last(sym(focus)) != sym(next) {
            return Ok(false);
        }
        let (a, m, b) = (self.start_pos(focus), self.end_pos(focus), self.end_pos(next));
        if a == b {
            return Ok(false);
        }
        let u = m.sub(&a)?;
        let w = b.sub(&m)?;
        let parallel = if u.x.is_zero() || w.x.is_zero() {
            // vertical
            u.x.is_zero() && w.x.is_zero()
        } else {
            u.y.checked_div(u.x)? == w.y.checked_div(w.x)?
        };
        Ok(parallel && u.dot(&w)?.is_positive())
    }

    fn clean_loop(&mut self, start: EdgeIdx) -> Result<usize> {
        let mut remaining = self.loop_size(start);
        let mut focus = start;
        let mut steps = 0;
        let mut removed = 0;
        while steps < remaining && remaining > 3 {
            let next = self.next(focus);
            if self.is_straight_pass(focus, next)? {
                self.contract(sym(next))?;
                trace!(edge = focus, "straight vertex contracted");
                removed += 1;
                remaining -= 1;
            } else {
                focus = next;
                steps += 1;
            }
        }
        Ok(removed)
    }

    /// Remove every vertex of region `r`'s boundary that sits in the middle
    /// of a straight run. Faces keep their identity. Returns how many
    /// vertices were removed.
    pub fn clean_region(&mut self, r: RegionIdx) -> Result<usize> {
        self.check_region(r)?;
        let mut removed = 0;
        for f in self.region_faces(r).to_vec() {
            let count = self.face_loops(f).len();
            for k in 0..count {
                let handle = self.face_loops(f)[k];
                removed += self.clean_loop(handle)?;
            }
        }
        debug!(region = r, removed, "clean_region");
        self.after_operation()?;
        Ok(removed)
    }
}

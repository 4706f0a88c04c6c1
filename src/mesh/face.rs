// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Read-only queries over faces and their loops.

use std::cmp::Ordering;

use super::{sym, EdgeIdx, FaceIdx, Mesh, INVALID};
use crate::error::{DcelError, Result};
use crate::point::{Point2D, Relation, SegmentRelation};
use crate::scalar::Scalar;

/// Where a point sits relative to a face, with the boundary edge it lies on
/// when there is one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FaceRelation {
    pub kind: Relation,
    /// Edge carrying the point, INVALID unless `kind` is OnBoundary.
    pub edge: EdgeIdx,
}

impl FaceRelation {
    pub const fn exterior() -> Self {
        FaceRelation { kind: Relation::Exterior, edge: INVALID }
    }

    pub const fn interior() -> Self {
        FaceRelation { kind: Relation::Interior, edge: INVALID }
    }

    pub const fn on_boundary(edge: EdgeIdx) -> Self {
        FaceRelation { kind: Relation::OnBoundary, edge }
    }
}

/// Closest crossing of a segment with a face boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopHit<S> {
    pub point: Point2D<S>,
    pub edge: EdgeIdx,
    /// Index into the face's holes, `None` for the outer loop.
    pub hole: Option<usize>,
    /// Parameter along the query segment.
    pub along: S,
}

impl<S: Scalar> Mesh<S> {
    /// Outer loop handle (when bounded) followed by every hole handle.
    /// Panics if `f` is out of range.
    pub fn face_loops(&self, f: FaceIdx) -> Vec<EdgeIdx> {
        let face = &self.faces[f as usize];
        let mut loops = Vec::with_capacity(face.holes.len() + 1);
        if face.root != INVALID {
            loops.push(face.root);
        }
        loops.extend_from_slice(&face.holes);
        loops
    }

    /// Every half-edge bounding `f`, outer loop first.
    pub fn face_edges(&self, f: FaceIdx) -> Vec<EdgeIdx> {
        self.face_loops(f)
            .into_iter()
            .flat_map(|e| self.loop_iter(e))
            .collect()
    }

    /// Corner positions of the outer loop.
    pub fn face_points(&self, f: FaceIdx) -> Vec<Point2D<S>> {
        let root = self.faces[f as usize].root;
        if root == INVALID {
            return Vec::new();
        }
        self.loop_points(root)
    }

    fn loop_parity(&self, e: EdgeIdx, p: &Point2D<S>) -> Result<bool> {
        let mut inside = false;
        for h in self.loop_iter(e) {
            if p.ray_crosses(&self.start_pos(h), &self.end_pos(h))? {
                inside = !inside;
            }
        }
        Ok(inside)
    }

    /// Classify `p` against the area enclosed by a single loop, ignoring its
    /// orientation.
    pub fn loop_relation(&self, e: EdgeIdx, p: &Point2D<S>) -> Result<FaceRelation> {
        for h in self.loop_iter(e) {
            if Point2D::is_on_segment(p, &self.start_pos(h), &self.end_pos(h))? {
                return Ok(FaceRelation::on_boundary(h));
            }
        }
        Ok(if self.loop_parity(e, p)? {
            FaceRelation::interior()
        } else {
            FaceRelation::exterior()
        })
    }

    /// Classify `p` against face `f`: on any of its loops, inside the outer
    /// loop and outside every hole, or neither.
    pub fn point_relation(&self, f: FaceIdx, p: &Point2D<S>) -> Result<FaceRelation> {
        self.check_face(f)?;
        let loops = self.face_loops(f);
        for &e in &loops {
            for h in self.loop_iter(e) {
                if Point2D::is_on_segment(p, &self.start_pos(h), &self.end_pos(h))? {
                    return Ok(FaceRelation::on_boundary(h));
                }
            }
        }
        let face = &self.faces[f as usize];
        if face.root != INVALID && !self.loop_parity(face.root, p)? {
            return Ok(FaceRelation::exterior());
        }
        for &hole in &face.holes {
            if self.loop_parity(hole, p)? {
                return Ok(FaceRelation::exterior());
            }
        }
        Ok(FaceRelation::interior())
    }

    /// Closest valid crossing of `start -> end` with any loop of `f`.
    /// Collinear overlaps are not reported.
    pub fn first_intersect(&self, f: FaceIdx, start: &Point2D<S>, end: &Point2D<S>) -> Result<Option<LoopHit<S>>> {
        self.check_face(f)?;
        let face = &self.faces[f as usize];
        let loops = std::iter::once((None, face.root))
            .filter(|&(_, e)| e != INVALID)
            .chain(face.holes.iter().enumerate().map(|(k, &e)| (Some(k), e)));
        let mut best: Option<LoopHit<S>> = None;
        for (hole, e) in loops {
            for h in self.loop_iter(e) {
                let crossing = Point2D::intersect(start, end, &self.start_pos(h), &self.end_pos(h))?;
                let Some(c) = crossing else { continue };
                if !c.valid {
                    continue;
                }
                let closer = best.map_or(true, |b| c.along_a.compare(&b.along) == Ordering::Less);
                if closer {
                    best = Some(LoopHit { point: c.point, edge: h, hole, along: c.along_a });
                }
            }
        }
        Ok(best)
    }

    /// Boundary edge of `f` whose half-open span `[start, end)` holds `p`.
    pub fn containing_segment(&self, f: FaceIdx, p: &Point2D<S>) -> Result<Option<EdgeIdx>> {
        self.check_face(f)?;
        for h in self.face_edges(f) {
            match p.segment_relation(&self.start_pos(h), &self.end_pos(h))? {
                SegmentRelation::OnStart | SegmentRelation::OnSegment => return Ok(Some(h)),
                _ => {}
            }
        }
        Ok(None)
    }

    /// Enclosed area of `f`, holes subtracted.
    pub fn face_area(&self, f: FaceIdx) -> Result<S> {
        self.check_face(f)?;
        let face = &self.faces[f as usize];
        if face.root == INVALID {
            return Err(DcelError::Unbounded(f));
        }
        let mut area = self.loop_area(face.root)?.checked_neg()?;
        for &hole in &face.holes {
            area = area.checked_sub(self.loop_area(hole)?)?;
        }
        Ok(area)
    }

    /// Distinct faces across any boundary edge of `f`. `f` must be in range.
    pub fn face_neighbors(&self, f: FaceIdx) -> Vec<FaceIdx> {
        let mut out: Vec<FaceIdx> = Vec::new();
        for h in self.face_edges(f) {
            let g = self.face_of(sym(h));
            if g != f && !out.contains(&g) {
                out.push(g);
            }
        }
        out
    }
}

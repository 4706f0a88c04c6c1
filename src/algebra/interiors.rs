// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Build phase of sub-allocation: thread the interior spans of the cutting
// polygon into the mesh, then sort the resulting faces by side.

use tracing::{trace, warn};

use super::mark::Interact;
use super::Allocation;
use crate::error::{DcelError, Result};
use crate::mesh::{FaceIdx, Mesh, RegionIdx, INVALID};
use crate::point::{polygon_relation, Point2D, Relation};
use crate::scalar::Scalar;

impl<S: Scalar> Mesh<S> {
    /// Insert an edge for every span whose midpoint lies inside region
    /// `target`, creating vertices for interior corners as they are reached.
    pub(crate) fn insert_interior_runs(&mut self, target: RegionIdx, details: &mut [Interact<S>]) -> Result<()> {
        let n = details.len();
        for k in 0..n {
            if details[k].mid_kind != Relation::Interior {
                continue;
            }
            let j = (k + 1) % n;
            let (from, into) = (details[k], details[j]);
            if from.kind == Relation::Exterior || into.kind == Relation::Exterior {
                warn!(span = k, "interior span starts or ends outside the region");
                continue;
            }
            match (from.vertex != INVALID, into.vertex != INVALID) {
                (true, true) => {
                    let a = self.find_wedge(from.vertex, &into.location)?;
                    let b = self.find_wedge(into.vertex, &from.location)?;
                    let (e, result) = self.connect(a, b)?;
                    trace!(edge = e, ?result, "span joined two vertices");
                }
                (true, false) => {
                    let a = self.find_wedge(from.vertex, &into.location)?;
                    let e = self.add_edge_vertex(a, into.location)?;
                    details[j].vertex = self.end(e);
                    trace!(edge = e, "span extended forward");
                }
                (false, true) => {
                    let b = self.find_wedge(into.vertex, &from.location)?;
                    let e = self.add_edge_vertex(b, from.location)?;
                    details[k].vertex = self.end(e);
                    trace!(edge = e, "span extended backward");
                }
                (false, false) => {
                    let f = self
                        .region_face_at(target, &from.location)?
                        .ok_or(DcelError::OffBoundary)?;
                    let e = self.add_edge(f, from.location, into.location)?;
                    details[k].vertex = self.start(e);
                    details[j].vertex = self.end(e);
                    trace!(edge = e, face = f, "span started as a free strand");
                }
            }
        }
        Ok(())
    }

    /// Which side of the counter-clockwise `ring` face `f` lies on, once no
    /// polygon span crosses its interior.
    pub(crate) fn classify_face(&self, f: FaceIdx, ring: &[Point2D<S>]) -> Result<Relation> {
        let edges = self.face_edges(f);
        for &h in &edges {
            let mid = Point2D::midpoint(&self.start_pos(h), &self.end_pos(h))?;
            match polygon_relation(ring, &mid)? {
                Relation::OnBoundary => {}
                side => return Ok(side),
            }
        }
        // Every edge runs along the polygon. The face is inside when its
        // edges run against the polygon's direction.
        let Some(&h) = edges.first() else {
            return Ok(Relation::Exterior);
        };
        let (a, b) = (self.start_pos(h), self.end_pos(h));
        let mid = Point2D::midpoint(&a, &b)?;
        let dir = b.sub(&a)?;
        for (k, p) in ring.iter().enumerate() {
            let q = &ring[(k + 1) % ring.len()];
            if Point2D::is_on_segment(&mid, p, q)? {
                return Ok(if dir.dot(&q.sub(p)?)?.is_negative() {
                    Relation::Interior
                } else {
                    Relation::Exterior
                });
            }
        }
        Ok(Relation::Exterior)
    }

    /// The polygon never met the region: decide per face without editing
    /// the mesh. A region entirely on one side is returned as is.
    pub(crate) fn route_untouched(&mut self, target: RegionIdx, ring: &[Point2D<S>]) -> Result<Allocation> {
        let faces = self.region_faces(target).to_vec();
        let mut inside: Vec<FaceIdx> = Vec::new();
        let mut outside: Vec<FaceIdx> = Vec::new();
        for f in faces {
            let corner = self.start_pos(self.faces[f as usize].root);
            if polygon_relation(ring, &corner)? == Relation::Interior {
                inside.push(f);
            } else {
                outside.push(f);
            }
        }
        if inside.is_empty() {
            return Ok(Allocation { interior: Vec::new(), exterior: vec![target] });
        }
        if outside.is_empty() {
            return Ok(Allocation { interior: vec![target], exterior: Vec::new() });
        }
        self.remove_region(target)?;
        let mut allocation = Allocation::default();
        for f in inside {
            allocation.interior.push(self.region_from_face(f)?);
        }
        for f in outside {
            allocation.exterior.push(self.region_from_face(f)?);
        }
        Ok(allocation)
    }

    /// Sort the faces of `target` by side of `ring`. A region whose faces all
    /// fall on one side is kept whole; otherwise it is dissolved and each face
    /// gets a region of its own.
    pub(crate) fn split_by_side(&mut self, target: RegionIdx, ring: &[Point2D<S>]) -> Result<Allocation> {
        let faces = self.region_faces(target).to_vec();
        let mut sides: Vec<(FaceIdx, Relation)> = Vec::with_capacity(faces.len());
        for f in faces {
            sides.push((f, self.classify_face(f, ring)?));
        }
        if sides.iter().all(|&(_, side)| side == Relation::Interior) {
            return Ok(Allocation { interior: vec![target], exterior: Vec::new() });
        }
        if sides.iter().all(|&(_, side)| side != Relation::Interior) {
            return Ok(Allocation { interior: Vec::new(), exterior: vec![target] });
        }

        self.remove_region(target)?;
        let mut allocation = Allocation::default();
        for (f, side) in sides {
            let r = self.region_from_face(f)?;
            if side == Relation::Interior {
                allocation.interior.push(r);
            } else {
                allocation.exterior.push(r);
            }
        }
        Ok(allocation)
    }
}

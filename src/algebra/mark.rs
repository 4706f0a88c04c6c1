// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Mark phase of sub-allocation: walk the cutting polygon, record every place
// it meets the region boundary, and make sure each of those places is a mesh
// vertex.

use std::cmp::Ordering;

use tracing::trace;

use crate::error::{DcelError, Result};
use crate::mesh::{EdgeIdx, Mesh, RegionIdx, VertIdx, INVALID};
use crate::point::{Point2D, Relation, SegmentRelation};
use crate::scalar::Scalar;

/// A point where a query segment meets a mesh edge.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Intersect<S> {
    pub location: Point2D<S>,
    pub edge: EdgeIdx,
    /// Squared distance from the segment start.
    pub distance: S,
}

/// One stop along the cutting polygon.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Interact<S> {
    pub location: Point2D<S>,
    pub kind: Relation,
    /// Mesh vertex at `location`, INVALID until one exists.
    pub vertex: VertIdx,
    /// Classification of the open span from here to the next stop.
    pub mid_kind: Relation,
}

pub(crate) struct Marking<S> {
    pub details: Vec<Interact<S>>,
    /// No stop touched or entered the region.
    pub untouched: bool,
}

fn insert_sorted<S: Scalar>(hits: &mut Vec<Intersect<S>>, hit: Intersect<S>) {
    let at = hits.partition_point(|h| h.distance.compare(&hit.distance) != Ordering::Greater);
    hits.insert(at, hit);
}

fn push_detail<S: Scalar>(details: &mut Vec<Interact<S>>, location: Point2D<S>, kind: Relation, vertex: VertIdx) {
    if details.last().map_or(false, |d| d.location == location) {
        return;
    }
    details.push(Interact { location, kind, vertex, mid_kind: Relation::Exterior });
}

impl<S: Scalar> Mesh<S> {
    /// Every point where `start -> stop` meets one of `edges`, ordered by
    /// distance from `start`. Collinear overlaps contribute their endpoints.
    pub(crate) fn find_intersects(
        &self,
        start: &Point2D<S>,
        stop: &Point2D<S>,
        edges: &[EdgeIdx],
    ) -> Result<Vec<Intersect<S>>> {
        let mut hits: Vec<Intersect<S>> = Vec::new();
        let record = |hits: &mut Vec<Intersect<S>>, location: Point2D<S>, edge: EdgeIdx| -> Result<()> {
            let distance = location.sub(start)?.size_squared()?;
            insert_sorted(hits, Intersect { location, edge, distance });
            Ok(())
        };
        for &edge in edges {
            let (q0, q1) = (self.start_pos(edge), self.end_pos(edge));
            match Point2D::intersect(start, stop, &q0, &q1)? {
                Some(c) => {
                    if c.valid {
                        record(&mut hits, c.point, edge)?;
                    }
                }
                None => {
                    if Point2D::orient(start, stop, &q0)? != Ordering::Equal {
                        continue;
                    }
                    if Point2D::is_on_segment(stop, &q0, &q1)? {
                        record(&mut hits, *stop, edge)?;
                    }
                    for q in [q0, q1] {
                        if Point2D::is_on_segment(&q, start, stop)? {
                            record(&mut hits, q, edge)?;
                        }
                    }
                }
            }
        }
        Ok(hits)
    }

    /// Mesh vertex of region `target` at `location`, splitting the boundary
    /// edge that carries it when no vertex is there yet. `hint` is the edge
    /// the location was found on; earlier splits may have moved it.
    fn ensure_vertex(&mut self, target: RegionIdx, location: &Point2D<S>, hint: EdgeIdx) -> Result<VertIdx> {
        if self.is_live_edge(hint) {
            let (a, b) = (self.start_pos(hint), self.end_pos(hint));
            match location.segment_relation(&a, &b)? {
                SegmentRelation::OnStart => return Ok(self.start(hint)),
                SegmentRelation::OnEnd => return Ok(self.end(hint)),
                SegmentRelation::OnSegment => {
                    let n = self.subdivide(hint, *location)?;
                    trace!(edge = hint, "boundary edge split at intersection");
                    return Ok(self.start(n));
                }
                SegmentRelation::LeftOf | SegmentRelation::RightOf => {
                    // rounding drift: split at the nearest point of the edge
                    let snapped = location.project_to_segment(&a, &b)?;
                    if snapped == *location && snapped != a && snapped != b {
                        let n = self.subdivide(hint, snapped)?;
                        trace!(edge = hint, "boundary edge split at snapped intersection");
                        return Ok(self.start(n));
                    }
                }
                _ => {}
            }
        }
        let edges = self.region_edges(target);
        for &h in &edges {
            if self.start_pos(h) == *location {
                return Ok(self.start(h));
            }
            if self.end_pos(h) == *location {
                return Ok(self.end(h));
            }
        }
        for &h in &edges {
            if location.segment_relation(&self.start_pos(h), &self.end_pos(h))? == SegmentRelation::OnSegment {
                let n = self.subdivide(h, *location)?;
                trace!(edge = h, "boundary edge split at intersection");
                return Ok(self.start(n));
            }
        }
        Err(DcelError::OffBoundary)
    }

    /// Walk `ring` against region `target`, recording each boundary touch
    /// and each polygon corner, then classify the span after every stop.
    pub(crate) fn mark_region(&mut self, target: RegionIdx, ring: &[Point2D<S>]) -> Result<Marking<S>> {
        let mut details: Vec<Interact<S>> = Vec::new();
        let mut untouched = true;
        let Some(&tail) = ring.last() else {
            return Err(DcelError::DegenerateBoundary);
        };
        let mut last = tail;
        for &next in ring {
            let candidates = self.region_edges(target);
            let hits = self.find_intersects(&last, &next, &candidates)?;
            let mut end_collision = false;
            for hit in hits {
                if hit.location == last {
                    continue;
                }
                let vertex = self.ensure_vertex(target, &hit.location, hit.edge)?;
                if hit.location == next {
                    end_collision = true;
                }
                untouched = false;
                push_detail(&mut details, self.position(vertex), Relation::OnBoundary, vertex);
            }
            if !end_collision {
                let relation = self.region_contains(target, &next)?;
                match relation.kind {
                    Relation::OnBoundary => {
                        let vertex = self.ensure_vertex(target, &next, relation.edge)?;
                        untouched = false;
                        push_detail(&mut details, self.position(vertex), Relation::OnBoundary, vertex);
                    }
                    Relation::Interior => {
                        untouched = false;
                        push_detail(&mut details, next, Relation::Interior, INVALID);
                    }
                    Relation::Exterior => {
                        push_detail(&mut details, next, Relation::Exterior, INVALID);
                    }
                }
            }
            last = next;
        }
        while details.len() > 1 && details.first().map(|d| d.location) == details.last().map(|d| d.location) {
            details.pop();
        }

        let n = details.len();
        for k in 0..n {
            let mid = Point2D::midpoint(&details[k].location, &details[(k + 1) % n].location)?;
            details[k].mid_kind = self.region_contains(target, &mid)?.kind;
        }
        for d in &details {
            trace!(x = d.location.x.to_f64(), y = d.location.y.to_f64(), kind = ?d.kind, mid = ?d.mid_kind, "interact");
        }
        Ok(Marking { details, untouched })
    }
}

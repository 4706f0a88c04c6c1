// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Doubly-connected edge list over exact coordinates.
//
// All links are u32 indices into Vec arenas.
//
// Design:
//   - INVALID: u32::MAX  (null handle)
//   - Half-edges allocated in pairs: edges[i] and edges[i^1] are always a pair.
//     sym(e) = e ^ 1.
//   - faces[0] is the unbounded universe face. It has no outer loop; every
//     top-level boundary drawn into the mesh is one of its holes.
//   - A face lies to the right of each of its half-edges. Outer loops are
//     clockwise (negative signed area), hole loops are counter-clockwise or
//     zero-area strands.
//   - Dead slots stay in the arenas with `live == false` and are recycled
//     through free lists.

pub mod face;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use tracing::{trace, warn};

use crate::error::{DcelError, Entity, Result};
use crate::point::{first_self_intersection, Point2D};
use crate::region::Region;
use crate::scalar::Scalar;

pub use face::{FaceRelation, LoopHit};

pub const INVALID: u32 = u32::MAX;

/// Index into Mesh::verts
pub type VertIdx = u32;
/// Index into Mesh::edges
pub type EdgeIdx = u32;
/// Index into Mesh::faces
pub type FaceIdx = u32;
/// Index into Mesh::regions
pub type RegionIdx = u32;

/// The unbounded face every mesh starts with.
pub const UNIVERSE: FaceIdx = 0;

/// Compute the symmetric half-edge index (always the other half of the pair).
#[inline(always)]
pub fn sym(e: EdgeIdx) -> EdgeIdx {
    e ^ 1
}

#[derive(Clone, Debug)]
pub struct Vertex<S> {
    pub position: Point2D<S>,
    /// Any half-edge leaving this vertex.
    pub root: EdgeIdx,
    pub(crate) live: bool,
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    /// Origin vertex.
    pub root: VertIdx,
    /// Next half-edge around the face.
    pub next: EdgeIdx,
    /// Previous half-edge around the face.
    pub last: EdgeIdx,
    /// Face on the right of this half-edge.
    pub face: FaceIdx,
    pub(crate) live: bool,
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self {
            root: INVALID,
            next: INVALID,
            last: INVALID,
            face: INVALID,
            live: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Face {
    /// An edge of the outer loop, INVALID for the universe.
    pub root: EdgeIdx,
    /// One edge per hole loop.
    pub holes: Vec<EdgeIdx>,
    /// Owning region, INVALID when ungrouped.
    pub group: RegionIdx,
    pub(crate) live: bool,
}

impl Default for Face {
    fn default() -> Self {
        Self {
            root: INVALID,
            holes: Vec::new(),
            group: INVALID,
            live: false,
        }
    }
}

/// How an edit changed the face set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeModResult {
    FacesPreserved,
    FaceCreated(FaceIdx),
    FaceDestroyed(FaceIdx),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshOption {
    /// Reject self-intersecting boundaries passed to draw and sub_allocate.
    ValidateInput,
    /// Run the full sanity check after every region operation.
    CheckInvariants,
}

/// The half-edge mesh.
pub struct Mesh<S> {
    pub(crate) verts: Vec<Vertex<S>>,
    pub(crate) edges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
    pub(crate) regions: Vec<Region>,
    vert_free: Vec<VertIdx>,
    edge_free: Vec<EdgeIdx>,
    face_free: Vec<FaceIdx>,
    pub(crate) region_free: Vec<RegionIdx>,
    pub(crate) validate_input: bool,
    pub(crate) check_invariants: bool,
}

/// Walks a face loop starting at a given half-edge.
pub struct LoopIter<'a, S> {
    mesh: &'a Mesh<S>,
    start: EdgeIdx,
    cur: EdgeIdx,
}

impl<'a, S> Iterator for LoopIter<'a, S> {
    type Item = EdgeIdx;

    fn next(&mut self) -> Option<EdgeIdx> {
        if self.cur == INVALID {
            return None;
        }
        let e = self.cur;
        let n = self.mesh.edges[e as usize].next;
        self.cur = if n == self.start { INVALID } else { n };
        Some(e)
    }
}

/// Walks the outgoing half-edges of a vertex clockwise.
pub struct StarIter<'a, S> {
    mesh: &'a Mesh<S>,
    start: EdgeIdx,
    cur: EdgeIdx,
}

impl<'a, S> Iterator for StarIter<'a, S> {
    type Item = EdgeIdx;

    fn next(&mut self) -> Option<EdgeIdx> {
        if self.cur == INVALID {
            return None;
        }
        let e = self.cur;
        let n = sym(self.mesh.edges[e as usize].last);
        self.cur = if n == self.start { INVALID } else { n };
        Some(e)
    }
}

struct LoopRecord<S> {
    rep: EdgeIdx,
    edges: Vec<EdgeIdx>,
    area: S,
    owner: FaceIdx,
}

struct Owner {
    face: FaceIdx,
    outer: Option<usize>,
    old_root: EdgeIdx,
}

fn violated(detail: String) -> DcelError {
    DcelError::InvariantViolated { detail }
}

impl<S: Scalar> Mesh<S> {
    /// Create an empty mesh holding only the universe face.
    pub fn new() -> Self {
        let mut m = Mesh {
            verts: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            regions: Vec::new(),
            vert_free: Vec::new(),
            edge_free: Vec::new(),
            face_free: Vec::new(),
            region_free: Vec::new(),
            validate_input: true,
            check_invariants: false,
        };
        let universe = m.create_face();
        debug_assert_eq!(universe, UNIVERSE);
        m
    }

    pub fn set_option(&mut self, option: MeshOption, value: bool) {
        match option {
            MeshOption::ValidateInput => self.validate_input = value,
            MeshOption::CheckInvariants => self.check_invariants = value,
        }
    }

    // ──────────────────────────── Handle checks ────────────────────────────

    #[inline]
    pub fn is_live_vertex(&self, v: VertIdx) -> bool {
        self.verts.get(v as usize).map_or(false, |x| x.live)
    }

    #[inline]
    pub fn is_live_edge(&self, e: EdgeIdx) -> bool {
        self.edges.get(e as usize).map_or(false, |x| x.live)
    }

    #[inline]
    pub fn is_live_face(&self, f: FaceIdx) -> bool {
        self.faces.get(f as usize).map_or(false, |x| x.live)
    }

    #[inline]
    pub fn is_live_region(&self, r: RegionIdx) -> bool {
        self.regions.get(r as usize).map_or(false, |x| x.live)
    }

    pub(crate) fn check_vertex(&self, v: VertIdx) -> Result<()> {
        if self.is_live_vertex(v) {
            Ok(())
        } else {
            Err(DcelError::DeadHandle { entity: Entity::Point, index: v })
        }
    }

    pub(crate) fn check_edge(&self, e: EdgeIdx) -> Result<()> {
        if self.is_live_edge(e) {
            Ok(())
        } else {
            Err(DcelError::DeadHandle { entity: Entity::Edge, index: e })
        }
    }

    pub(crate) fn check_face(&self, f: FaceIdx) -> Result<()> {
        if self.is_live_face(f) {
            Ok(())
        } else {
            Err(DcelError::DeadHandle { entity: Entity::Face, index: f })
        }
    }

    pub(crate) fn check_region(&self, r: RegionIdx) -> Result<()> {
        if self.is_live_region(r) {
            Ok(())
        } else {
            Err(DcelError::DeadHandle { entity: Entity::Region, index: r })
        }
    }

    // ──────────────────────────── Accessors ────────────────────────────────
    //
    // Accessors index the arenas directly and panic on out-of-range handles.
    // Check untrusted handles with the `is_live_*` methods first.

    /// # Panics
    /// If `v` is out of range.
    #[inline]
    pub fn vertex(&self, v: VertIdx) -> &Vertex<S> {
        &self.verts[v as usize]
    }

    /// # Panics
    /// If `e` is out of range.
    #[inline]
    pub fn edge(&self, e: EdgeIdx) -> &HalfEdge {
        &self.edges[e as usize]
    }

    /// # Panics
    /// If `f` is out of range.
    #[inline]
    pub fn face(&self, f: FaceIdx) -> &Face {
        &self.faces[f as usize]
    }

    #[inline]
    pub fn next(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].next
    }

    #[inline]
    pub fn last(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].last
    }

    #[inline]
    pub fn start(&self, e: EdgeIdx) -> VertIdx {
        self.edges[e as usize].root
    }

    #[inline]
    pub fn end(&self, e: EdgeIdx) -> VertIdx {
        self.edges[(e ^ 1) as usize].root
    }

    #[inline]
    pub fn face_of(&self, e: EdgeIdx) -> FaceIdx {
        self.edges[e as usize].face
    }

    /// Next outgoing edge clockwise around the origin of e.
    #[inline]
    pub fn cw(&self, e: EdgeIdx) -> EdgeIdx {
        sym(self.edges[e as usize].last)
    }

    /// Next outgoing edge counter-clockwise around the origin of e.
    #[inline]
    pub fn ccw(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[(e ^ 1) as usize].next
    }

    #[inline]
    pub fn position(&self, v: VertIdx) -> Point2D<S> {
        self.verts[v as usize].position
    }

    #[inline]
    pub fn start_pos(&self, e: EdgeIdx) -> Point2D<S> {
        self.position(self.start(e))
    }

    #[inline]
    pub fn end_pos(&self, e: EdgeIdx) -> Point2D<S> {
        self.position(self.end(e))
    }

    pub fn vertex_count(&self) -> usize {
        self.verts.iter().filter(|v| v.live).count()
    }

    /// Number of live half-edges (twice the number of edges).
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.live).count()
    }

    /// Number of live faces, the universe included.
    pub fn face_count(&self) -> usize {
        self.faces.iter().filter(|f| f.live).count()
    }

    pub fn region_count(&self) -> usize {
        self.regions.iter().filter(|r| r.live).count()
    }

    // ──────────────────────────── Loop and star walks ──────────────────────

    pub fn loop_iter(&self, e: EdgeIdx) -> LoopIter<'_, S> {
        LoopIter { mesh: self, start: e, cur: e }
    }

    /// Outgoing edges of `v`, clockwise from its root edge.
    pub fn star(&self, v: VertIdx) -> StarIter<'_, S> {
        let root = self.verts[v as usize].root;
        StarIter { mesh: self, start: root, cur: root }
    }

    pub fn loop_edges(&self, e: EdgeIdx) -> Vec<EdgeIdx> {
        self.loop_iter(e).collect()
    }

    pub fn loop_points(&self, e: EdgeIdx) -> Vec<Point2D<S>> {
        self.loop_iter(e).map(|h| self.start_pos(h)).collect()
    }

    pub fn loop_size(&self, e: EdgeIdx) -> usize {
        self.loop_iter(e).count()
    }

    /// Signed shoelace area of the loop through `e`.
    pub fn loop_area(&self, e: EdgeIdx) -> Result<S> {
        let mut twice = S::zero();
        for h in self.loop_iter(e) {
            let a = self.start_pos(h);
            let b = self.end_pos(h);
            twice = twice.checked_add(a.cross(&b)?)?;
        }
        Ok(twice.half()?)
    }

    // ──────────────────────────── Arena primitives ─────────────────────────

    pub(crate) fn create_vertex(&mut self, position: Point2D<S>) -> VertIdx {
        let vertex = Vertex { position, root: INVALID, live: true };
        if let Some(v) = self.vert_free.pop() {
            self.verts[v as usize] = vertex;
            v
        } else {
            self.verts.push(vertex);
            (self.verts.len() - 1) as VertIdx
        }
    }

    /// Allocate an unlinked pair; returns the even half.
    pub(crate) fn create_edge_pair(&mut self) -> EdgeIdx {
        let fresh = HalfEdge { live: true, ..HalfEdge::default() };
        if let Some(e) = self.edge_free.pop() {
            self.edges[e as usize] = fresh.clone();
            self.edges[(e ^ 1) as usize] = fresh;
            e
        } else {
            let e = self.edges.len() as EdgeIdx;
            self.edges.push(fresh.clone());
            self.edges.push(fresh);
            e
        }
    }

    pub(crate) fn create_face(&mut self) -> FaceIdx {
        let face = Face { live: true, ..Face::default() };
        if let Some(f) = self.face_free.pop() {
            self.faces[f as usize] = face;
            f
        } else {
            self.faces.push(face);
            (self.faces.len() - 1) as FaceIdx
        }
    }

    pub(crate) fn remove_vertex(&mut self, v: VertIdx) {
        let vertex = &mut self.verts[v as usize];
        vertex.live = false;
        vertex.root = INVALID;
        self.vert_free.push(v);
    }

    pub(crate) fn remove_edge_pair(&mut self, e: EdgeIdx) {
        let even = e & !1;
        self.edges[even as usize] = HalfEdge::default();
        self.edges[(even ^ 1) as usize] = HalfEdge::default();
        self.edge_free.push(even);
    }

    /// Destroy a face, detaching it from its region first.
    pub(crate) fn remove_face(&mut self, f: FaceIdx) {
        let group = self.faces[f as usize].group;
        if group != INVALID {
            self.regions[group as usize].faces.retain(|&x| x != f);
        }
        self.faces[f as usize] = Face::default();
        self.face_free.push(f);
    }

    #[inline]
    fn link(&mut self, from: EdgeIdx, to: EdgeIdx) {
        self.edges[from as usize].next = to;
        self.edges[to as usize].last = from;
    }

    /// Point the root/hole handles of face `f` that name `old` at `new`
    /// (dropping the hole when `new` is INVALID).
    fn replace_handle(&mut self, f: FaceIdx, old: EdgeIdx, new: EdgeIdx) {
        if !self.is_live_face(f) {
            return;
        }
        let face = &mut self.faces[f as usize];
        if face.root == old {
            face.root = new;
        }
        if let Some(pos) = face.holes.iter().position(|&h| h == old) {
            if new == INVALID {
                face.holes.remove(pos);
            } else {
                face.holes[pos] = new;
            }
        }
    }

    // ──────────────────────────── Loop ownership ───────────────────────────

    /// Re-derive which face owns each loop reachable from `faces` and
    /// `seeds` after a rewiring.
    ///
    /// Clockwise loops are outer loops: a face keeps the one through its old
    /// root, takes any spare one otherwise, and is destroyed if none is left.
    /// Spare clockwise loops become new faces that join the region of the
    /// first face. Every other loop becomes a hole of the innermost face whose
    /// outer loop strictly contains it.
    pub(crate) fn settle(&mut self, faces: &[FaceIdx], seeds: &[EdgeIdx]) -> Result<EdgeModResult> {
        let mut involved: Vec<FaceIdx> = Vec::new();
        for &f in faces {
            if self.is_live_face(f) && !involved.contains(&f) {
                involved.push(f);
            }
        }
        let group = involved
            .first()
            .map_or(INVALID, |&f| self.faces[f as usize].group);

        let mut starts: Vec<EdgeIdx> = Vec::new();
        for &f in &involved {
            let face = &self.faces[f as usize];
            if face.root != INVALID {
                starts.push(face.root);
            }
            starts.extend_from_slice(&face.holes);
        }
        starts.extend_from_slice(seeds);

        let mut loops: Vec<LoopRecord<S>> = Vec::new();
        let mut loop_of: HashMap<EdgeIdx, usize> = HashMap::new();
        for e in starts {
            if !self.is_live_edge(e) || loop_of.contains_key(&e) {
                continue;
            }
            let edges = self.loop_edges(e);
            for &x in &edges {
                loop_of.insert(x, loops.len());
            }
            let area = self.loop_area(e)?;
            loops.push(LoopRecord { rep: e, edges, area, owner: INVALID });
        }

        let old_roots: Vec<EdgeIdx> = involved
            .iter()
            .map(|&f| self.faces[f as usize].root)
            .collect();
        let mut outer: Vec<Option<usize>> = vec![None; involved.len()];
        let mut claimed = vec![false; loops.len()];
        for (k, root) in old_roots.iter().enumerate() {
            if let Some(&li) = loop_of.get(root) {
                if loops[li].area.is_negative() && !claimed[li] {
                    claimed[li] = true;
                    outer[k] = Some(li);
                }
            }
        }
        for k in 0..involved.len() {
            if outer[k].is_some() || old_roots[k] == INVALID {
                continue;
            }
            let spare = (0..loops.len()).find(|&li| !claimed[li] && loops[li].area.is_negative());
            if let Some(li) = spare {
                claimed[li] = true;
                outer[k] = Some(li);
            }
        }

        let mut owners: Vec<Owner> = Vec::new();
        let mut destroyed: Vec<FaceIdx> = Vec::new();
        for (k, &f) in involved.iter().enumerate() {
            if old_roots[k] != INVALID && outer[k].is_none() {
                destroyed.push(f);
            } else {
                owners.push(Owner { face: f, outer: outer[k], old_root: old_roots[k] });
            }
        }
        let mut created: Vec<FaceIdx> = Vec::new();
        for li in 0..loops.len() {
            if claimed[li] || !loops[li].area.is_negative() {
                continue;
            }
            let f = self.create_face();
            created.push(f);
            owners.push(Owner { face: f, outer: Some(li), old_root: INVALID });
        }

        for owner in &owners {
            if let Some(li) = owner.outer {
                loops[li].owner = owner.face;
            }
        }
        for li in 0..loops.len() {
            if loops[li].owner == INVALID {
                let owner = self.hole_owner(&loops, li, &owners)?;
                loops[li].owner = owner;
            }
        }

        for owner in &owners {
            let face = &mut self.faces[owner.face as usize];
            face.holes.clear();
            if let Some(li) = owner.outer {
                face.root = if loop_of.get(&owner.old_root) == Some(&li) {
                    owner.old_root
                } else {
                    loops[li].rep
                };
            }
        }
        for lp in &loops {
            for &e in &lp.edges {
                self.edges[e as usize].face = lp.owner;
            }
            if !lp.area.is_negative() {
                self.faces[lp.owner as usize].holes.push(lp.rep);
            }
        }

        for &f in &destroyed {
            trace!(face = f, "face destroyed");
            self.remove_face(f);
        }
        for &f in &created {
            trace!(face = f, region = group, "face created");
            if group != INVALID {
                self.attach_face(group, f);
            }
        }

        Ok(match (created.first(), destroyed.first()) {
            (Some(&f), _) => EdgeModResult::FaceCreated(f),
            (None, Some(&f)) => EdgeModResult::FaceDestroyed(f),
            (None, None) => EdgeModResult::FacesPreserved,
        })
    }

    fn hole_owner(&self, loops: &[LoopRecord<S>], li: usize, owners: &[Owner]) -> Result<FaceIdx> {
        let mut best: Option<(FaceIdx, S)> = None;
        for owner in owners {
            let Some(oi) = owner.outer else { continue };
            if !self.loop_encloses(loops[oi].rep, &loops[li].edges)? {
                continue;
            }
            // Outer areas are negative; the innermost is the one nearest zero.
            let area = loops[oi].area;
            if best.map_or(true, |(_, a)| area > a) {
                best = Some((owner.face, area));
            }
        }
        if let Some((f, _)) = best {
            return Ok(f);
        }
        if let Some(owner) = owners.iter().find(|o| o.outer.is_none()) {
            return Ok(owner.face);
        }
        let fallback = owners
            .first()
            .map(|o| o.face)
            .ok_or_else(|| violated(format!("loop {} has no candidate face", loops[li].rep)))?;
        warn!(edge = loops[li].rep, face = fallback, "hole loop not enclosed by any face");
        Ok(fallback)
    }

    /// Whether the loop through `outer` strictly contains the loop made of
    /// `edges`, judged at the first sample point off the outer boundary.
    fn loop_encloses(&self, outer: EdgeIdx, edges: &[EdgeIdx]) -> Result<bool> {
        use crate::point::Relation;
        for &e in edges {
            match self.loop_relation(outer, &self.start_pos(e))?.kind {
                Relation::Interior => return Ok(true),
                Relation::Exterior => return Ok(false),
                Relation::OnBoundary => {}
            }
        }
        for &e in edges {
            let mid = Point2D::midpoint(&self.start_pos(e), &self.end_pos(e))?;
            match self.loop_relation(outer, &mid)?.kind {
                Relation::Interior => return Ok(true),
                Relation::Exterior => return Ok(false),
                Relation::OnBoundary => {}
            }
        }
        Ok(false)
    }

    // ──────────────────────────── Edge construction ────────────────────────

    /// Insert a new vertex at `position` into `e` and its inverse.
    ///
    /// `e` keeps its origin and now ends at the new vertex; the returned edge
    /// runs from the new vertex to the old end. Faces are unchanged.
    pub fn subdivide(&mut self, e: EdgeIdx, position: Point2D<S>) -> Result<EdgeIdx> {
        self.check_edge(e)?;
        let i = sym(e);
        let b = self.edges[i as usize].root;
        let old_next = self.edges[e as usize].next;
        let old_ilast = self.edges[i as usize].last;

        let m = self.create_vertex(position);
        let n = self.create_edge_pair();
        let ni = sym(n);
        self.edges[n as usize].root = m;
        self.edges[ni as usize].root = b;
        self.edges[n as usize].face = self.edges[e as usize].face;
        self.edges[ni as usize].face = self.edges[i as usize].face;
        self.edges[i as usize].root = m;
        self.verts[m as usize].root = n;
        self.verts[b as usize].root = ni;

        self.link(e, n);
        if old_next == i {
            self.link(n, ni);
        } else {
            self.link(n, old_next);
            self.link(old_ilast, ni);
        }
        self.link(ni, i);
        Ok(n)
    }

    /// Add a free strand `a -> b` as a hole of face `f`.
    pub fn add_edge(&mut self, f: FaceIdx, a: Point2D<S>, b: Point2D<S>) -> Result<EdgeIdx> {
        self.check_face(f)?;
        if a == b {
            return Err(DcelError::DegenerateBoundary);
        }
        let va = self.create_vertex(a);
        let vb = self.create_vertex(b);
        let e = self.create_edge_pair();
        let i = sym(e);
        self.edges[e as usize].root = va;
        self.edges[i as usize].root = vb;
        self.edges[e as usize].face = f;
        self.edges[i as usize].face = f;
        self.link(e, i);
        self.link(i, e);
        self.verts[va as usize].root = e;
        self.verts[vb as usize].root = i;
        self.faces[f as usize].holes.push(e);
        Ok(e)
    }

    /// Add an edge from the end of `after` to a new vertex at `position`,
    /// spliced into the loop right after `after`. Faces are unchanged.
    pub fn add_edge_vertex(&mut self, after: EdgeIdx, position: Point2D<S>) -> Result<EdgeIdx> {
        self.check_edge(after)?;
        let from = self.end(after);
        let f = self.face_of(after);
        let old_next = self.next(after);

        let v = self.create_vertex(position);
        let e = self.create_edge_pair();
        let i = sym(e);
        self.edges[e as usize].root = from;
        self.edges[i as usize].root = v;
        self.edges[e as usize].face = f;
        self.edges[i as usize].face = f;
        self.verts[v as usize].root = i;

        self.link(after, e);
        self.link(e, i);
        self.link(i, old_next);
        Ok(e)
    }

    /// Add an edge from the end of `a` to the end of `b`, entering each
    /// vertex right after the given edge. Splits the loop when both lie on
    /// one loop, joins the two loops otherwise.
    pub fn connect(&mut self, a: EdgeIdx, b: EdgeIdx) -> Result<(EdgeIdx, EdgeModResult)> {
        self.check_edge(a)?;
        self.check_edge(b)?;
        let f = self.face_of(a);
        if self.face_of(b) != f {
            return Err(DcelError::FaceMismatch { a, b });
        }
        let (va, vb) = (self.end(a), self.end(b));
        if va == vb {
            return Err(DcelError::DegenerateBoundary);
        }
        let (a_next, b_next) = (self.next(a), self.next(b));

        let e = self.create_edge_pair();
        let i = sym(e);
        self.edges[e as usize].root = va;
        self.edges[i as usize].root = vb;
        self.edges[e as usize].face = f;
        self.edges[i as usize].face = f;
        self.link(a, e);
        self.link(e, b_next);
        self.link(b, i);
        self.link(i, a_next);

        let result = self.settle(&[f], &[e, i])?;
        Ok((e, result))
    }

    /// The incoming edge at `v` after which a new edge heading toward
    /// `toward` must be spliced.
    pub fn find_wedge(&self, v: VertIdx, toward: &Point2D<S>) -> Result<EdgeIdx> {
        self.check_vertex(v)?;
        let corner = self.position(v);
        for o in self.star(v) {
            let incoming = self.last(o);
            let before = self.start_pos(incoming);
            let after = self.end_pos(o);
            if Point2D::in_region_cw(&before, &corner, &after, toward)? {
                return Ok(incoming);
            }
        }
        Err(DcelError::NoWedge { edge: self.verts[v as usize].root })
    }

    // ──────────────────────────── Edge removal ─────────────────────────────

    /// Remove an edge pair, deleting either endpoint left isolated.
    ///
    /// Joining two faces reports the face that disappeared; cutting a loop
    /// in two reports the face that appeared. Removing an isolated strand
    /// drops the hole and preserves faces.
    pub fn delete_edge(&mut self, e: EdgeIdx) -> Result<EdgeModResult> {
        self.check_edge(e)?;
        let i = sym(e);
        let (a, b) = (self.start(e), self.start(i));
        let (x, y) = (self.last(e), self.next(e));
        let (p, q) = (self.last(i), self.next(i));
        let (fe, fi) = (self.face_of(e), self.face_of(i));

        let for_e = if x != i { x } else if y != i { y } else { INVALID };
        let for_i = if p != e { p } else if q != e { q } else { INVALID };
        for f in [fe, fi] {
            self.replace_handle(f, e, for_e);
            self.replace_handle(f, i, for_i);
        }

        if y == i {
            self.remove_vertex(b);
        } else {
            self.link(p, y);
            self.verts[b as usize].root = y;
        }
        if x == i {
            self.remove_vertex(a);
        } else {
            self.link(x, q);
            self.verts[a as usize].root = q;
        }
        self.remove_edge_pair(e);

        let seeds: Vec<EdgeIdx> = [x, y, p, q]
            .into_iter()
            .filter(|&s| s != e && s != i)
            .collect();
        if seeds.is_empty() {
            return Ok(EdgeModResult::FacesPreserved);
        }
        self.settle(&[fe, fi], &seeds)
    }

    /// Collapse `e` onto its origin: every edge leaving its end is re-homed
    /// to the origin, then the edge pair and the end vertex are deleted.
    /// Faces are unchanged.
    pub fn contract(&mut self, e: EdgeIdx) -> Result<()> {
        self.check_edge(e)?;
        let i = sym(e);
        let (x, y) = (self.last(e), self.next(e));
        let (p, q) = (self.last(i), self.next(i));
        if y == i {
            self.delete_edge(e)?;
            return Ok(());
        }
        let (a, b) = (self.start(e), self.start(i));

        let mut o = y;
        while o != i {
            self.edges[o as usize].root = a;
            o = self.ccw(o);
        }

        let (fe, fi) = (self.face_of(e), self.face_of(i));
        for f in [fe, fi] {
            self.replace_handle(f, e, y);
            self.replace_handle(f, i, p);
        }
        if x == i {
            self.link(p, y);
        } else {
            self.link(x, y);
            self.link(p, q);
        }
        self.verts[a as usize].root = y;
        self.remove_vertex(b);
        self.remove_edge_pair(e);
        Ok(())
    }

    /// Unhook `edge` from its origin star, leaving it as a dangling tip whose
    /// origin is `tip`.
    fn detach_root(&mut self, edge: EdgeIdx, tip: VertIdx) -> Result<EdgeModResult> {
        let i = sym(edge);
        let r = self.start(edge);
        let x = self.last(edge);
        let q = self.next(i);
        self.link(x, q);
        self.link(i, edge);
        self.verts[r as usize].root = q;
        self.edges[edge as usize].root = tip;
        if tip != r {
            self.verts[tip as usize].root = edge;
        }
        let faces = [self.face_of(edge), self.face_of(i)];
        self.settle(&faces, &[x, q, edge, i])
    }

    /// Move the origin of `edge` to the end of `target`, splicing it in
    /// right after `target`. Reports the face change of the detach and of the
    /// attach separately.
    pub fn insert_after(&mut self, edge: EdgeIdx, target: EdgeIdx) -> Result<(EdgeModResult, EdgeModResult)> {
        self.check_edge(edge)?;
        self.check_edge(target)?;
        let i = sym(edge);
        if target == edge || target == i || self.end(target) == self.end(edge) {
            return Err(DcelError::SelfSplice { edge });
        }

        let r = self.start(edge);
        let detached = if self.last(edge) == i {
            self.remove_vertex(r);
            EdgeModResult::FacesPreserved
        } else {
            self.detach_root(edge, r)?
        };

        let t = self.end(target);
        let o = self.next(target);
        self.edges[edge as usize].root = t;
        self.link(target, edge);
        self.link(i, o);
        let faces = [self.face_of(target), self.face_of(edge)];
        let attached = self.settle(&faces, &[edge, i, target, o])?;
        Ok((detached, attached))
    }

    /// Give `edge` a brand-new origin at `position`. An origin used by no
    /// other edge is simply moved.
    pub fn move_root(&mut self, edge: EdgeIdx, position: Point2D<S>) -> Result<EdgeModResult> {
        self.check_edge(edge)?;
        let r = self.start(edge);
        if self.last(edge) == sym(edge) {
            self.verts[r as usize].position = position;
            return Ok(EdgeModResult::FacesPreserved);
        }
        let v = self.create_vertex(position);
        self.detach_root(edge, v)
    }

    // ──────────────────────────── Boundaries ───────────────────────────────

    /// Drop repeated points and check a ring is usable as a boundary.
    /// Returns the cleaned ring and its signed area.
    pub(crate) fn normalized_ring(&self, boundary: &[Point2D<S>]) -> Result<(Vec<Point2D<S>>, S)> {
        let mut ring: Vec<Point2D<S>> = Vec::with_capacity(boundary.len());
        for p in boundary {
            if ring.last() != Some(p) {
                ring.push(*p);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(DcelError::DegenerateBoundary);
        }
        let area = Point2D::signed_area(&ring)?;
        if area.is_zero() {
            return Err(DcelError::DegenerateBoundary);
        }
        if self.validate_input {
            if let Some((first, second)) = first_self_intersection(&ring)? {
                return Err(DcelError::SelfIntersecting { first, second });
            }
        }
        Ok((ring, area))
    }

    /// Draw a closed polygon as a new face inside the universe.
    ///
    /// The boundary may be given in either orientation; the face's outer loop
    /// is stored clockwise.
    pub fn draw(&mut self, boundary: &[Point2D<S>]) -> Result<FaceIdx> {
        let (mut ring, area) = self.normalized_ring(boundary)?;
        if area.is_positive() {
            ring.reverse();
        }
        let n = ring.len();
        let verts: Vec<VertIdx> = ring.iter().map(|p| self.create_vertex(*p)).collect();
        let pairs: Vec<EdgeIdx> = (0..n).map(|_| self.create_edge_pair()).collect();
        let f = self.create_face();
        for k in 0..n {
            let e = pairs[k];
            let i = sym(e);
            self.edges[e as usize].root = verts[k];
            self.edges[i as usize].root = verts[(k + 1) % n];
            self.edges[e as usize].face = f;
            self.edges[i as usize].face = UNIVERSE;
            self.link(e, pairs[(k + 1) % n]);
            self.link(i, sym(pairs[(k + n - 1) % n]));
            self.verts[verts[k] as usize].root = e;
        }
        self.faces[f as usize].root = pairs[0];
        self.faces[UNIVERSE as usize].holes.push(sym(pairs[0]));
        trace!(face = f, points = n, "boundary drawn");
        Ok(f)
    }

    // ──────────────────────────── Sanity check ─────────────────────────────

    /// Check every structural invariant of the mesh.
    pub fn validate(&self) -> Result<()> {
        for (idx, he) in self.edges.iter().enumerate() {
            if !he.live {
                continue;
            }
            let e = idx as EdgeIdx;
            if !self.is_live_edge(sym(e)) {
                return Err(violated(format!("edge {e} has a dead inverse")));
            }
            if !self.is_live_edge(he.next) || !self.is_live_edge(he.last) {
                return Err(violated(format!("edge {e} links to a dead edge")));
            }
            if self.edges[he.next as usize].last != e || self.edges[he.last as usize].next != e {
                return Err(violated(format!("edge {e} next/last are not mutual")));
            }
            if !self.is_live_vertex(he.root) {
                return Err(violated(format!("edge {e} starts at a dead vertex")));
            }
            if self.end(e) != self.start(he.next) {
                return Err(violated(format!("edge {e} does not end where its next starts")));
            }
            if !self.is_live_face(he.face) || self.edges[he.next as usize].face != he.face {
                return Err(violated(format!("edge {e} disagrees with its next on the face")));
            }
        }
        for (idx, v) in self.verts.iter().enumerate() {
            if v.live && (!self.is_live_edge(v.root) || self.start(v.root) != idx as VertIdx) {
                return Err(violated(format!("vertex {idx} root edge does not start at it")));
            }
        }
        for (idx, face) in self.faces.iter().enumerate() {
            if !face.live {
                continue;
            }
            let f = idx as FaceIdx;
            if (face.root == INVALID) != (f == UNIVERSE) {
                return Err(violated(format!("face {f} outer loop presence is wrong")));
            }
            for &h in face.holes.iter().chain(std::iter::once(&face.root)) {
                if h == INVALID {
                    continue;
                }
                if !self.is_live_edge(h) || self.face_of(h) != f {
                    return Err(violated(format!("face {f} handle {h} is not on the face")));
                }
            }
            if face.root != INVALID && !self.loop_area(face.root)?.is_negative() {
                return Err(violated(format!("face {f} outer loop is not clockwise")));
            }
            if face.group != INVALID
                && (!self.is_live_region(face.group) || !self.regions[face.group as usize].faces.contains(&f))
            {
                return Err(violated(format!("face {f} group back-reference is broken")));
            }
        }
        for (idx, region) in self.regions.iter().enumerate() {
            if !region.live {
                continue;
            }
            for &f in &region.faces {
                if !self.is_live_face(f) || self.faces[f as usize].group != idx as RegionIdx {
                    return Err(violated(format!("region {idx} lists face {f} that is not its own")));
                }
            }
        }
        Ok(())
    }
}

impl<S: Scalar> Default for Mesh<S> {
    fn default() -> Self {
        Self::new()
    }
}

// Copyright 2025 Lars Brubaker
// Unit tests for the mesh primitives.

use super::*;
use crate::point::Relation;
use crate::scalar::{Fixed, Ratio};

fn p(x: i64, y: i64) -> Point2D<Ratio> {
    Point2D::from_ints(x, y).unwrap()
}

fn n(v: i64) -> Ratio {
    Ratio::from_integer(v)
}

/// 4x4 square at the origin. Its outer loop runs
/// (0,4) -> (4,4) -> (4,0) -> (0,0), starting at the face root.
fn square() -> (Mesh<Ratio>, FaceIdx) {
    let mut mesh = Mesh::new();
    let f = mesh.draw(&[p(0, 0), p(4, 0), p(4, 4), p(0, 4)]).unwrap();
    (mesh, f)
}

fn outer(mesh: &Mesh<Ratio>, f: FaceIdx) -> Vec<EdgeIdx> {
    mesh.loop_edges(mesh.face(f).root)
}

#[test]
fn new_mesh_holds_only_the_universe() {
    let mesh: Mesh<Ratio> = Mesh::new();
    assert_eq!(mesh.face_count(), 1);
    assert_eq!(mesh.vertex_count(), 0);
    assert_eq!(mesh.edge_count(), 0);
    assert_eq!(mesh.face(UNIVERSE).root, INVALID);
    assert!(mesh.validate().is_ok());
    assert_eq!(mesh.face_area(UNIVERSE), Err(DcelError::Unbounded(UNIVERSE)));
}

#[test]
fn out_of_range_handles_are_reported_by_checked_calls() {
    let (mesh, _) = square();
    assert!(!mesh.is_live_face(99));
    assert!(!mesh.is_live_region(99));
    assert!(matches!(mesh.point_relation(99, &p(1, 1)), Err(DcelError::DeadHandle { .. })));
    assert!(matches!(mesh.region_area(99), Err(DcelError::DeadHandle { .. })));
}

#[test]
#[should_panic]
fn accessor_panics_on_out_of_range_face() {
    let (mesh, _) = square();
    let _ = mesh.face(99);
}

#[test]
fn draw_stores_outer_loop_clockwise() {
    let (mesh, f) = square();
    let root = mesh.face(f).root;
    assert_eq!(mesh.loop_size(root), 4);
    assert_eq!(mesh.loop_area(root).unwrap(), n(-16));
    assert_eq!(mesh.face_area(f).unwrap(), n(16));
    assert_eq!(mesh.start_pos(root), p(0, 4));
    assert_eq!(mesh.end_pos(root), p(4, 4));
    assert_eq!(mesh.face(UNIVERSE).holes.len(), 1);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.edge_count(), 8);
    for h in mesh.loop_iter(root) {
        assert_eq!(mesh.face_of(h), f);
        assert_eq!(mesh.face_of(sym(h)), UNIVERSE);
    }
    mesh.validate().unwrap();
}

#[test]
fn draw_accepts_either_orientation() {
    let mut mesh: Mesh<Ratio> = Mesh::new();
    let f = mesh.draw(&[p(0, 4), p(4, 4), p(4, 0), p(0, 0)]).unwrap();
    assert_eq!(mesh.face_area(f).unwrap(), n(16));
    mesh.validate().unwrap();
}

#[test]
fn draw_rejects_bad_boundaries() {
    let mut mesh: Mesh<Ratio> = Mesh::new();
    assert_eq!(mesh.draw(&[p(0, 0), p(1, 0)]), Err(DcelError::DegenerateBoundary));
    assert_eq!(
        mesh.draw(&[p(0, 0), p(1, 0), p(1, 0), p(0, 0)]),
        Err(DcelError::DegenerateBoundary)
    );
    assert_eq!(mesh.draw(&[p(0, 0), p(1, 1), p(2, 2)]), Err(DcelError::DegenerateBoundary));
    assert!(matches!(
        mesh.draw(&[p(0, 0), p(4, 4), p(4, 0), p(0, 2)]),
        Err(DcelError::SelfIntersecting { first: 0, second: 2 })
    ));
    assert_eq!(mesh.face_count(), 1);
    assert_eq!(mesh.vertex_count(), 0);
}

#[test]
fn closing_point_is_ignored() {
    let mut mesh: Mesh<Ratio> = Mesh::new();
    let f = mesh.draw(&[p(0, 0), p(4, 0), p(4, 4), p(0, 4), p(0, 0)]).unwrap();
    assert_eq!(mesh.loop_size(mesh.face(f).root), 4);
}

#[test]
fn subdivide_inserts_a_vertex() {
    let (mut mesh, f) = square();
    let e0 = mesh.face(f).root;
    let old_end = mesh.end(e0);
    let m = mesh.subdivide(e0, p(2, 4)).unwrap();
    assert_eq!(mesh.end_pos(e0), p(2, 4));
    assert_eq!(mesh.start_pos(m), p(2, 4));
    assert_eq!(mesh.end(m), old_end);
    assert_eq!(mesh.next(e0), m);
    assert_eq!(mesh.face_of(m), f);
    assert_eq!(mesh.face_of(sym(m)), UNIVERSE);
    assert_eq!(mesh.loop_size(e0), 5);
    assert_eq!(mesh.loop_size(sym(e0)), 5);
    assert_eq!(mesh.face_area(f).unwrap(), n(16));
    mesh.validate().unwrap();
}

#[test]
fn contract_undoes_subdivide() {
    let (mut mesh, f) = square();
    let e0 = mesh.face(f).root;
    let m = mesh.subdivide(e0, p(2, 4)).unwrap();
    mesh.contract(sym(m)).unwrap();
    assert_eq!(mesh.end_pos(e0), p(4, 4));
    assert_eq!(mesh.loop_size(e0), 4);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.edge_count(), 8);
    assert!(!mesh.is_live_edge(m));
    mesh.validate().unwrap();
}

#[test]
fn find_wedge_picks_the_matching_corner_slot() {
    let (mesh, f) = square();
    let edges = outer(&mesh, f);
    let (e2, e3) = (edges[2], edges[3]);
    let corner = mesh.start(e3);
    assert_eq!(mesh.position(corner), p(0, 0));
    assert_eq!(mesh.find_wedge(corner, &p(1, 1)).unwrap(), e2);
    assert_eq!(mesh.find_wedge(corner, &p(-1, -1)).unwrap(), sym(e3));
}

#[test]
fn star_walks_every_outgoing_edge() {
    let (mut mesh, f) = square();
    let edges = outer(&mesh, f);
    let (e0, e2) = (edges[0], edges[2]);
    mesh.connect(e0, e2).unwrap();
    let corner = mesh.end(e0);
    let star: Vec<EdgeIdx> = mesh.star(corner).collect();
    assert_eq!(star.len(), 3);
    for o in star {
        assert_eq!(mesh.start(o), corner);
        assert_eq!(mesh.cw(mesh.ccw(o)), o);
    }
}

#[test]
fn connect_splits_a_face() {
    let (mut mesh, f) = square();
    let edges = outer(&mesh, f);
    let (e, result) = mesh.connect(edges[0], edges[2]).unwrap();
    let EdgeModResult::FaceCreated(g) = result else {
        panic!("expected a new face, got {result:?}");
    };
    assert_eq!(mesh.start_pos(e), p(4, 4));
    assert_eq!(mesh.end_pos(e), p(0, 0));
    assert_eq!(mesh.face_of(e), f);
    assert_eq!(mesh.face_of(sym(e)), g);
    assert_eq!(mesh.face_area(f).unwrap(), n(8));
    assert_eq!(mesh.face_area(g).unwrap(), n(8));
    assert_eq!(mesh.face_count(), 3);
    let mut neighbors = mesh.face_neighbors(f);
    neighbors.sort_unstable();
    assert_eq!(neighbors, vec![UNIVERSE, g]);
    mesh.validate().unwrap();
}

#[test]
fn connect_rejects_edges_on_different_faces() {
    let (mut mesh, f) = square();
    let e0 = mesh.face(f).root;
    assert_eq!(
        mesh.connect(e0, sym(e0)),
        Err(DcelError::FaceMismatch { a: e0, b: sym(e0) })
    );
}

#[test]
fn delete_edge_joins_the_faces_again() {
    let (mut mesh, f) = square();
    let edges = outer(&mesh, f);
    let (e, _) = mesh.connect(edges[0], edges[2]).unwrap();
    let g = mesh.face_of(sym(e));
    assert_eq!(mesh.delete_edge(e).unwrap(), EdgeModResult::FaceDestroyed(g));
    assert!(!mesh.is_live_face(g));
    assert_eq!(mesh.face_area(f).unwrap(), n(16));
    assert_eq!(mesh.face_count(), 2);
    assert_eq!(mesh.vertex_count(), 4);
    mesh.validate().unwrap();
}

#[test]
fn delete_edge_reports_dead_handles() {
    let (mut mesh, f) = square();
    let edges = outer(&mesh, f);
    let (e, _) = mesh.connect(edges[0], edges[2]).unwrap();
    mesh.delete_edge(e).unwrap();
    assert_eq!(
        mesh.delete_edge(e),
        Err(DcelError::DeadHandle { entity: Entity::Edge, index: e })
    );
}

#[test]
fn free_strand_is_a_hole_until_deleted() {
    let (mut mesh, f) = square();
    let e = mesh.add_edge(f, p(1, 1), p(2, 2)).unwrap();
    assert_eq!(mesh.face(f).holes, vec![e]);
    assert_eq!(mesh.loop_size(e), 2);
    assert_eq!(mesh.face_area(f).unwrap(), n(16));
    assert_eq!(mesh.point_relation(f, &p(1, 1)).unwrap(), FaceRelation::on_boundary(e));
    mesh.validate().unwrap();

    assert_eq!(mesh.delete_edge(e).unwrap(), EdgeModResult::FacesPreserved);
    assert!(mesh.face(f).holes.is_empty());
    assert_eq!(mesh.vertex_count(), 4);
    mesh.validate().unwrap();
}

#[test]
fn add_edge_vertex_extends_a_strand() {
    let (mut mesh, f) = square();
    let e = mesh.add_edge(f, p(1, 1), p(2, 1)).unwrap();
    let x = mesh.add_edge_vertex(e, p(2, 3)).unwrap();
    assert_eq!(mesh.start_pos(x), p(2, 1));
    assert_eq!(mesh.end_pos(x), p(2, 3));
    assert_eq!(mesh.loop_size(e), 4);
    assert_eq!(mesh.face_of(x), f);
    mesh.validate().unwrap();
}

#[test]
fn connect_merges_a_hole_into_the_outer_loop() {
    let (mut mesh, f) = square();
    let e = mesh.add_edge(f, p(1, 1), p(2, 2)).unwrap();
    let corner = mesh.start(outer(&mesh, f)[3]);
    let a = mesh.find_wedge(corner, &p(1, 1)).unwrap();
    let (bridge, result) = mesh.connect(a, sym(e)).unwrap();
    assert_eq!(result, EdgeModResult::FacesPreserved);
    assert!(mesh.face(f).holes.is_empty());
    assert_eq!(mesh.loop_size(mesh.face(f).root), 8);
    assert_eq!(mesh.face_area(f).unwrap(), n(16));
    assert_eq!(mesh.face_of(bridge), f);
    mesh.validate().unwrap();
}

#[test]
fn insert_after_moves_a_strand_tip_to_a_corner() {
    let (mut mesh, f) = square();
    let e = mesh.add_edge(f, p(1, 1), p(2, 2)).unwrap();
    let e2 = outer(&mesh, f)[2];
    let (detached, attached) = mesh.insert_after(e, e2).unwrap();
    assert_eq!(detached, EdgeModResult::FacesPreserved);
    assert_eq!(attached, EdgeModResult::FacesPreserved);
    assert_eq!(mesh.start_pos(e), p(0, 0));
    assert_eq!(mesh.next(e2), e);
    assert!(mesh.face(f).holes.is_empty());
    assert_eq!(mesh.loop_size(mesh.face(f).root), 6);
    assert_eq!(mesh.vertex_count(), 5);
    mesh.validate().unwrap();
}

#[test]
fn insert_after_rejects_splicing_onto_itself() {
    let (mut mesh, f) = square();
    let e = mesh.add_edge(f, p(1, 1), p(2, 2)).unwrap();
    assert_eq!(mesh.insert_after(e, e), Err(DcelError::SelfSplice { edge: e }));
    assert_eq!(mesh.insert_after(e, sym(e)), Err(DcelError::SelfSplice { edge: e }));
}

#[test]
fn move_root_of_a_tip_moves_the_vertex() {
    let (mut mesh, f) = square();
    let e = mesh.add_edge(f, p(1, 1), p(2, 2)).unwrap();
    let before = mesh.vertex_count();
    assert_eq!(mesh.move_root(e, p(1, 2)).unwrap(), EdgeModResult::FacesPreserved);
    assert_eq!(mesh.start_pos(e), p(1, 2));
    assert_eq!(mesh.vertex_count(), before);
    mesh.validate().unwrap();
}

#[test]
fn point_relation_against_a_square() {
    let (mesh, f) = square();
    let e1 = outer(&mesh, f)[1];
    assert_eq!(mesh.point_relation(f, &p(2, 2)).unwrap().kind, Relation::Interior);
    assert_eq!(mesh.point_relation(f, &p(4, 2)).unwrap(), FaceRelation::on_boundary(e1));
    assert_eq!(mesh.point_relation(f, &p(5, 5)).unwrap().kind, Relation::Exterior);
    assert_eq!(mesh.point_relation(UNIVERSE, &p(5, 5)).unwrap().kind, Relation::Interior);
    assert_eq!(mesh.point_relation(UNIVERSE, &p(2, 2)).unwrap().kind, Relation::Exterior);
}

#[test]
fn first_intersect_finds_the_nearest_crossing() {
    let (mesh, f) = square();
    let e1 = outer(&mesh, f)[1];
    let hit = mesh.first_intersect(f, &p(2, 2), &p(6, 2)).unwrap().unwrap();
    assert_eq!(hit.point, p(4, 2));
    assert_eq!(hit.edge, e1);
    assert_eq!(hit.hole, None);
    assert_eq!(hit.along, Ratio::new(1, 2).unwrap());
    assert!(mesh.first_intersect(f, &p(1, 1), &p(2, 2)).unwrap().is_none());
}

#[test]
fn containing_segment_is_half_open() {
    let (mesh, f) = square();
    let edges = outer(&mesh, f);
    assert_eq!(mesh.containing_segment(f, &p(4, 4)).unwrap(), Some(edges[1]));
    assert_eq!(mesh.containing_segment(f, &p(2, 4)).unwrap(), Some(edges[0]));
    assert_eq!(mesh.containing_segment(f, &p(2, 2)).unwrap(), None);
}

#[test]
fn fixed_point_square_has_the_same_shape() {
    let mut mesh: Mesh<Fixed> = Mesh::new();
    let pts: Vec<Point2D<Fixed>> = [(0, 0), (4, 0), (4, 4), (0, 4)]
        .iter()
        .map(|&(x, y)| Point2D::from_ints(x, y).unwrap())
        .collect();
    let f = mesh.draw(&pts).unwrap();
    assert_eq!(mesh.face_area(f).unwrap(), Fixed::from_i64(16).unwrap());
    mesh.validate().unwrap();
}

#[test]
fn validate_catches_a_broken_link() {
    let (mut mesh, f) = square();
    let e0 = mesh.face(f).root;
    let e1 = mesh.next(e0);
    mesh.edges[e1 as usize].last = sym(e0);
    assert!(matches!(mesh.validate(), Err(DcelError::InvariantViolated { .. })));
}

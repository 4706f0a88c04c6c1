// Copyright 2025 Lars Brubaker
// Unit tests for the marking and build phases of sub-allocation.

use super::*;
use crate::error::DcelError;
use crate::mesh::{MeshOption, INVALID};
use crate::point::Relation;
use crate::scalar::Ratio;

fn p(x: i64, y: i64) -> Point2D<Ratio> {
    Point2D::from_ints(x, y).unwrap()
}

fn ring(points: &[(i64, i64)]) -> Vec<Point2D<Ratio>> {
    points.iter().map(|&(x, y)| p(x, y)).collect()
}

fn n(v: i64) -> Ratio {
    Ratio::from_integer(v)
}

fn square_region() -> (Mesh<Ratio>, RegionIdx) {
    let mut mesh = Mesh::new();
    mesh.set_option(MeshOption::CheckInvariants, true);
    let r = mesh
        .region_from_boundary(&ring(&[(0, 0), (4, 0), (4, 4), (0, 4)]))
        .unwrap();
    (mesh, r)
}

#[test]
fn find_intersects_orders_hits_by_distance() {
    let (mesh, r) = square_region();
    let edges = mesh.region_edges(r);
    let hits = mesh.find_intersects(&p(2, 5), &p(2, -1), &edges).unwrap();
    let points: Vec<Point2D<Ratio>> = hits.iter().map(|h| h.location).collect();
    assert_eq!(points, vec![p(2, 4), p(2, 0)]);
    assert_eq!(hits[0].distance, n(1));
    assert_eq!(hits[1].distance, n(25));
}

#[test]
fn find_intersects_reports_collinear_endpoints() {
    let (mesh, r) = square_region();
    let edges = mesh.region_edges(r);
    let hits = mesh.find_intersects(&p(4, 5), &p(4, 2), &edges).unwrap();
    assert!(hits.iter().all(|h| h.location == p(4, 4) || h.location == p(4, 2)));
    assert!(hits.iter().any(|h| h.location == p(4, 4)));
    assert!(hits.iter().any(|h| h.location == p(4, 2)));
}

#[test]
fn mark_records_interior_corners() {
    let (mut mesh, r) = square_region();
    let inner = ring(&[(1, 1), (3, 1), (3, 3), (1, 3)]);
    let marking = mesh.mark_region(r, &inner).unwrap();
    assert!(!marking.untouched);
    assert_eq!(marking.details.len(), 4);
    for d in &marking.details {
        assert_eq!(d.kind, Relation::Interior);
        assert_eq!(d.mid_kind, Relation::Interior);
        assert_eq!(d.vertex, INVALID);
    }
    assert_eq!(mesh.vertex_count(), 4);
}

#[test]
fn mark_splits_crossed_edges() {
    let (mut mesh, r) = square_region();
    let cut = ring(&[(2, -1), (6, -1), (6, 5), (2, 5)]);
    let marking = mesh.mark_region(r, &cut).unwrap();
    let kinds: Vec<Relation> = marking.details.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            Relation::OnBoundary,
            Relation::OnBoundary,
            Relation::Exterior,
            Relation::Exterior,
            Relation::Exterior,
            Relation::Exterior,
        ]
    );
    assert_eq!(marking.details[0].location, p(2, 4));
    assert_eq!(marking.details[0].mid_kind, Relation::Interior);
    assert_eq!(mesh.position(marking.details[0].vertex), p(2, 4));
    assert_eq!(mesh.position(marking.details[1].vertex), p(2, 0));
    assert_eq!(mesh.vertex_count(), 6);
}

#[test]
fn mark_leaves_distant_polygons_untouched() {
    let (mut mesh, r) = square_region();
    let far = ring(&[(10, 10), (12, 10), (12, 12)]);
    let marking = mesh.mark_region(r, &far).unwrap();
    assert!(marking.untouched);
    assert!(marking.details.iter().all(|d| d.kind == Relation::Exterior));
}

#[test]
fn face_on_its_own_boundary_classifies_inside() {
    let (mesh, r) = square_region();
    let f = mesh.region_faces(r)[0];
    let same = ring(&[(0, 0), (4, 0), (4, 4), (0, 4)]);
    assert_eq!(mesh.classify_face(f, &same).unwrap(), Relation::Interior);
    let beside = ring(&[(4, 0), (8, 0), (8, 4), (4, 4)]);
    assert_eq!(mesh.classify_face(f, &beside).unwrap(), Relation::Exterior);
}

#[test]
fn cut_through_splits_in_half() {
    let (mut mesh, r) = square_region();
    let cut = ring(&[(2, -1), (6, -1), (6, 5), (2, 5)]);
    let allocation = mesh.sub_allocate(r, &cut).unwrap();
    assert_eq!(allocation.interior.len(), 1);
    assert_eq!(allocation.exterior.len(), 1);
    assert_eq!(mesh.region_area(allocation.interior[0]).unwrap(), n(8));
    assert_eq!(mesh.region_area(allocation.exterior[0]).unwrap(), n(8));
    mesh.validate().unwrap();
}

#[test]
fn inner_square_leaves_a_hole() {
    let (mut mesh, r) = square_region();
    let allocation = mesh
        .sub_allocate(r, &ring(&[(1, 1), (3, 1), (3, 3), (1, 3)]))
        .unwrap();
    let inside = allocation.interior[0];
    let outside = allocation.exterior[0];
    assert_eq!(mesh.region_area(inside).unwrap(), n(4));
    assert_eq!(mesh.region_area(outside).unwrap(), n(12));
    let hollow = mesh.region_faces(outside)[0];
    assert_eq!(mesh.face(hollow).holes.len(), 1);
    assert_eq!(mesh.region_contains(outside, &p(2, 2)).unwrap().kind, Relation::Exterior);
    assert_eq!(mesh.region_contains(inside, &p(2, 2)).unwrap().kind, Relation::Interior);
}

#[test]
fn clockwise_polygon_gives_the_same_split() {
    let (mut mesh, r) = square_region();
    let allocation = mesh
        .sub_allocate(r, &ring(&[(1, 3), (3, 3), (3, 1), (1, 1)]))
        .unwrap();
    assert_eq!(mesh.region_area(allocation.interior[0]).unwrap(), n(4));
    assert_eq!(mesh.region_area(allocation.exterior[0]).unwrap(), n(12));
}

#[test]
fn neighbouring_polygon_keeps_the_region_whole() {
    let (mut mesh, r) = square_region();
    let allocation = mesh
        .sub_allocate(r, &ring(&[(4, 0), (8, 0), (8, 4), (4, 4)]))
        .unwrap();
    assert_eq!(allocation, Allocation { interior: vec![], exterior: vec![r] });
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.face_count(), 2);
}

#[test]
fn enclosing_polygon_takes_the_whole_region() {
    let (mut mesh, r) = square_region();
    let allocation = mesh
        .sub_allocate(r, &ring(&[(-1, -1), (5, -1), (5, 5), (-1, 5)]))
        .unwrap();
    assert_eq!(allocation, Allocation { interior: vec![r], exterior: vec![] });
    assert_eq!(mesh.vertex_count(), 4);
}

#[test]
fn degenerate_polygon_is_rejected_before_editing() {
    let (mut mesh, r) = square_region();
    assert_eq!(
        mesh.sub_allocate(r, &ring(&[(1, 1), (2, 2), (3, 3)])),
        Err(DcelError::DegenerateBoundary)
    );
    assert!(mesh.is_live_region(r));
    assert_eq!(mesh.vertex_count(), 4);
}

#[test]
fn dead_region_is_rejected() {
    let (mut mesh, r) = square_region();
    mesh.remove_region(r).unwrap();
    assert!(matches!(
        mesh.sub_allocate(r, &ring(&[(1, 1), (3, 1), (3, 3)])),
        Err(DcelError::DeadHandle { .. })
    ));
}

// Copyright 2025 Lars Brubaker
// Shared test utilities for dcel-cuts tests.

#![allow(dead_code)]

use dcel_cuts::{Mesh, MeshOption, Point2D, Ratio, RegionIdx};

/// Route tracing output through the test harness. Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

pub fn pt(x: i64, y: i64) -> Point2D<Ratio> {
    Point2D::from_ints(x, y).unwrap()
}

pub fn ratio(v: i64) -> Ratio {
    Ratio::from_integer(v)
}

pub fn ring(points: &[(i64, i64)]) -> Vec<Point2D<Ratio>> {
    points.iter().map(|&(x, y)| pt(x, y)).collect()
}

/// Counter-clockwise axis-aligned rectangle.
pub fn rect(x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<Point2D<Ratio>> {
    ring(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

/// Empty mesh that re-validates itself after every region operation.
pub fn checked_mesh() -> Mesh<Ratio> {
    init_tracing();
    let mut mesh = Mesh::new();
    mesh.set_option(MeshOption::CheckInvariants, true);
    mesh
}

/// Mesh holding one region: the square [0, 4] x [0, 4].
pub fn square_region() -> (Mesh<Ratio>, RegionIdx) {
    let mut mesh = checked_mesh();
    let r = mesh.region_from_boundary(&rect(0, 0, 4, 4)).unwrap();
    (mesh, r)
}

pub fn total_area(mesh: &Mesh<Ratio>, regions: &[RegionIdx]) -> Ratio {
    regions
        .iter()
        .map(|&r| mesh.region_area(r).unwrap())
        .fold(Ratio::ZERO, |acc, a| dcel_cuts::Scalar::checked_add(acc, a).unwrap())
}

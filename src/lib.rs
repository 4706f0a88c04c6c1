// dcel-cuts: exact-arithmetic half-edge mesh for planar region algebra
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

pub mod algebra;
pub mod error;
pub mod mesh;
pub mod point;
pub mod region;
pub mod scalar;

pub use algebra::Allocation;
pub use error::{ArithmeticError, DcelError, Entity, Result};
pub use mesh::{
    sym, EdgeIdx, EdgeModResult, FaceIdx, FaceRelation, LoopHit, Mesh, MeshOption, RegionIdx, VertIdx, INVALID,
    UNIVERSE,
};
pub use point::{polygon_is_simple, polygon_relation, Bounds, Point2D, Relation, SegmentRelation};
pub use region::Region;
pub use scalar::fixed::Fixed;
pub use scalar::ratio::Ratio;
pub use scalar::{Scalar, ScalarResult};

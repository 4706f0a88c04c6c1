// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Error types shared by the scalar layer, the mesh primitives and the region
// algebra.

use thiserror::Error;

use crate::mesh::{EdgeIdx, FaceIdx};

/// Failure of a checked scalar operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("arithmetic overflow in {op}")]
    Overflow { op: &'static str },

    #[error("division by zero")]
    DivisionByZero,
}

/// Which kind of arena slot a stale handle referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Point,
    Edge,
    Face,
    Region,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DcelError {
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error("boundary must have at least 3 distinct points and non-zero area")]
    DegenerateBoundary,

    #[error("boundary segments {first} and {second} intersect")]
    SelfIntersecting { first: usize, second: usize },

    #[error("{entity:?} handle {index} is not live")]
    DeadHandle { entity: Entity, index: u32 },

    #[error("edges {a} and {b} do not bound the same face")]
    FaceMismatch { a: EdgeIdx, b: EdgeIdx },

    #[error("no free angular slot at the root of edge {edge} for the new edge")]
    NoWedge { edge: EdgeIdx },

    #[error("edge {edge} cannot be spliced after itself, its inverse, or onto its own end")]
    SelfSplice { edge: EdgeIdx },

    #[error("intersection point could not be located on the region boundary")]
    OffBoundary,

    #[error("face {0} is unbounded")]
    Unbounded(FaceIdx),

    #[error("mesh invariant violated: {detail}")]
    InvariantViolated { detail: String },
}

pub type Result<T> = std::result::Result<T, DcelError>;

// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Numeric strategy for every coordinate in the mesh.
//
// All geometric predicates (orientation, on-segment, intersection parameters)
// are evaluated through this trait, so the mesh never sees a float. Two
// strategies are provided:
//   - Ratio: exact reduced rational with i64 storage and i128 intermediates.
//   - Fixed: 16.16 fixed point with a small equality tolerance band.
//
// Arithmetic is checked: overflow and division by zero surface as
// ArithmeticError instead of wrapping.

pub mod fixed;
pub mod ratio;

use std::cmp::Ordering;
use std::fmt;

pub use crate::error::ArithmeticError;
pub use fixed::Fixed;
pub use ratio::Ratio;

pub type ScalarResult<T> = Result<T, ArithmeticError>;

/// A coordinate type usable by the mesh.
///
/// `PartialEq` and `PartialOrd` must agree with [`Scalar::compare`]; for the
/// fixed-point strategy that means equality within the tolerance band.
pub trait Scalar:
    Copy + fmt::Debug + fmt::Display + PartialEq + PartialOrd + Send + Sync + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    fn from_i64(value: i64) -> ScalarResult<Self>;
    fn from_ratio(numerator: i64, denominator: i64) -> ScalarResult<Self>;

    fn checked_add(self, rhs: Self) -> ScalarResult<Self>;
    fn checked_sub(self, rhs: Self) -> ScalarResult<Self>;
    fn checked_mul(self, rhs: Self) -> ScalarResult<Self>;
    fn checked_div(self, rhs: Self) -> ScalarResult<Self>;
    fn checked_neg(self) -> ScalarResult<Self>;

    /// Total order consistent with the strategy's equality model.
    fn compare(&self, other: &Self) -> Ordering;

    /// Lossy conversion for display and normalization only.
    fn to_f64(self) -> f64;

    #[inline]
    fn signum(&self) -> Ordering {
        self.compare(&Self::zero())
    }

    /// Sign of `cross`, the cross product of the base vector `(dx, dy)` with
    /// some other vector. Exact strategies take the plain sign; the
    /// fixed-point strategy widens its band with the length of the base so
    /// the band bounds distance from the base line.
    #[inline]
    fn cross_sign(cross: Self, _dx: Self, _dy: Self) -> Ordering {
        cross.signum()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.signum() == Ordering::Equal
    }

    #[inline]
    fn is_positive(&self) -> bool {
        self.signum() == Ordering::Greater
    }

    #[inline]
    fn is_negative(&self) -> bool {
        self.signum() == Ordering::Less
    }

    fn abs(self) -> ScalarResult<Self> {
        if self.is_negative() {
            self.checked_neg()
        } else {
            Ok(self)
        }
    }

    fn half(self) -> ScalarResult<Self> {
        self.checked_div(Self::from_i64(2)?)
    }
}

// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

use std::cmp::Ordering;
use std::fmt;

use super::{ArithmeticError, Scalar, ScalarResult};

/// Number of fractional bits in a [`Fixed`] value.
pub const FRACTION_BITS: u32 = 16;
/// Raw value of 1.0.
pub const SCALE: i64 = 1 << FRACTION_BITS;
/// Two raw values closer than this (inclusive) compare equal.
pub const TOLERANCE: i64 = 4;

/// 16.16 fixed-point coordinate with a tolerance band on comparisons.
///
/// Multiplication rounds to nearest and division truncates, so derived
/// values (intersection points, midpoints of odd spans) can be off by a few
/// raw units; comparisons absorb that drift. Equality is not transitive, so
/// `Fixed` has no `Eq` or `Hash`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fixed {
    raw: i64,
}

impl Fixed {
    pub const ZERO: Fixed = Fixed { raw: 0 };
    pub const ONE: Fixed = Fixed { raw: SCALE };

    #[inline]
    pub const fn from_raw(raw: i64) -> Fixed {
        Fixed { raw }
    }

    #[inline]
    pub const fn raw(&self) -> i64 {
        self.raw
    }
}

fn narrow(value: i128, op: &'static str) -> ScalarResult<Fixed> {
    i64::try_from(value)
        .map(Fixed::from_raw)
        .map_err(|_| ArithmeticError::Overflow { op })
}

impl Scalar for Fixed {
    #[inline]
    fn zero() -> Self {
        Fixed::ZERO
    }

    #[inline]
    fn one() -> Self {
        Fixed::ONE
    }

    fn from_i64(value: i64) -> ScalarResult<Self> {
        narrow((value as i128) << FRACTION_BITS, "fixed from_i64")
    }

    fn from_ratio(numerator: i64, denominator: i64) -> ScalarResult<Self> {
        if denominator == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        narrow(
            ((numerator as i128) << FRACTION_BITS) / denominator as i128,
            "fixed from_ratio",
        )
    }

    fn checked_add(self, rhs: Self) -> ScalarResult<Self> {
        self.raw
            .checked_add(rhs.raw)
            .map(Fixed::from_raw)
            .ok_or(ArithmeticError::Overflow { op: "fixed add" })
    }

    fn checked_sub(self, rhs: Self) -> ScalarResult<Self> {
        self.raw
            .checked_sub(rhs.raw)
            .map(Fixed::from_raw)
            .ok_or(ArithmeticError::Overflow { op: "fixed sub" })
    }

    fn checked_mul(self, rhs: Self) -> ScalarResult<Self> {
        let product = self.raw as i128 * rhs.raw as i128;
        let rounded = (product + (1 << (FRACTION_BITS - 1))) >> FRACTION_BITS;
        narrow(rounded, "fixed mul")
    }

    fn checked_div(self, rhs: Self) -> ScalarResult<Self> {
        if rhs.raw == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        narrow(
            ((self.raw as i128) << FRACTION_BITS) / rhs.raw as i128,
            "fixed div",
        )
    }

    fn checked_neg(self) -> ScalarResult<Self> {
        self.raw
            .checked_neg()
            .map(Fixed::from_raw)
            .ok_or(ArithmeticError::Overflow { op: "fixed neg" })
    }

    fn compare(&self, other: &Self) -> Ordering {
        let delta = self.raw as i128 - other.raw as i128;
        if delta.abs() <= TOLERANCE as i128 {
            Ordering::Equal
        } else {
            delta.cmp(&0)
        }
    }

    fn to_f64(self) -> f64 {
        self.raw as f64 / SCALE as f64
    }

    fn cross_sign(cross: Self, dx: Self, dy: Self) -> Ordering {
        let x = (dx.raw as i128).abs();
        let y = (dy.raw as i128).abs();
        // max + min / 2 never undershoots the Euclidean length
        let span = x.max(y) + x.min(y) / 2;
        let band = (TOLERANCE as i128 * span / SCALE as i128).max(TOLERANCE as i128);
        let c = cross.raw as i128;
        if c.abs() <= band {
            Ordering::Equal
        } else {
            c.cmp(&0)
        }
    }
}

impl PartialEq for Fixed {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl PartialOrd for Fixed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

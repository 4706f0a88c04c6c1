// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

use std::cmp::Ordering;
use std::fmt;

use super::{ArithmeticError, Scalar, ScalarResult};

/// Exact rational number `n / d`.
///
/// Always stored reduced, with the sign carried by the numerator and a
/// strictly positive denominator, so structural equality is value equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ratio {
    n: i64,
    d: i64,
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn narrow(value: i128, op: &'static str) -> ScalarResult<i64> {
    i64::try_from(value).map_err(|_| ArithmeticError::Overflow { op })
}

impl Ratio {
    pub const ZERO: Ratio = Ratio { n: 0, d: 1 };
    pub const ONE: Ratio = Ratio { n: 1, d: 1 };

    /// Build `n / d`, reducing to lowest terms.
    pub fn new(n: i64, d: i64) -> ScalarResult<Ratio> {
        Ratio::reduce(n as i128, d as i128, "new")
    }

    pub const fn from_integer(n: i64) -> Ratio {
        Ratio { n, d: 1 }
    }

    #[inline]
    pub fn numerator(&self) -> i64 {
        self.n
    }

    #[inline]
    pub fn denominator(&self) -> i64 {
        self.d
    }

    fn reduce(n: i128, d: i128, op: &'static str) -> ScalarResult<Ratio> {
        if d == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        if n == 0 {
            return Ok(Ratio::ZERO);
        }
        let g = gcd(n.unsigned_abs(), d.unsigned_abs());
        // g divides both magnitudes, so it fits whenever they do.
        let g = i128::try_from(g).map_err(|_| ArithmeticError::Overflow { op })?;
        let (mut n, mut d) = (n / g, d / g);
        if d < 0 {
            n = n.checked_neg().ok_or(ArithmeticError::Overflow { op })?;
            d = d.checked_neg().ok_or(ArithmeticError::Overflow { op })?;
        }
        Ok(Ratio {
            n: narrow(n, op)?,
            d: narrow(d, op)?,
        })
    }
}

impl Scalar for Ratio {
    #[inline]
    fn zero() -> Self {
        Ratio::ZERO
    }

    #[inline]
    fn one() -> Self {
        Ratio::ONE
    }

    fn from_i64(value: i64) -> ScalarResult<Self> {
        Ok(Ratio::from_integer(value))
    }

    fn from_ratio(numerator: i64, denominator: i64) -> ScalarResult<Self> {
        Ratio::new(numerator, denominator)
    }

    fn checked_add(self, rhs: Self) -> ScalarResult<Self> {
        const OP: &str = "ratio add";
        let (a, b, c, d) = (self.n as i128, self.d as i128, rhs.n as i128, rhs.d as i128);
        let g = gcd(b as u128, d as u128) as i128;
        let n = a
            .checked_mul(d / g)
            .zip(c.checked_mul(b / g))
            .and_then(|(x, y)| x.checked_add(y))
            .ok_or(ArithmeticError::Overflow { op: OP })?;
        let den = b.checked_mul(d / g).ok_or(ArithmeticError::Overflow { op: OP })?;
        Ratio::reduce(n, den, OP)
    }

    fn checked_sub(self, rhs: Self) -> ScalarResult<Self> {
        self.checked_add(rhs.checked_neg()?)
    }

    fn checked_mul(self, rhs: Self) -> ScalarResult<Self> {
        const OP: &str = "ratio mul";
        if self.n == 0 || rhs.n == 0 {
            return Ok(Ratio::ZERO);
        }
        // Cross-reduce first so the i128 products stay small.
        let g1 = gcd(self.n.unsigned_abs() as u128, rhs.d as u128) as i128;
        let g2 = gcd(rhs.n.unsigned_abs() as u128, self.d as u128) as i128;
        let n = (self.n as i128 / g1) * (rhs.n as i128 / g2);
        let d = (self.d as i128 / g2) * (rhs.d as i128 / g1);
        Ratio::reduce(n, d, OP)
    }

    fn checked_div(self, rhs: Self) -> ScalarResult<Self> {
        if rhs.n == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        let inverse = Ratio::reduce(rhs.d as i128, rhs.n as i128, "ratio div")?;
        self.checked_mul(inverse)
    }

    fn checked_neg(self) -> ScalarResult<Self> {
        let n = self
            .n
            .checked_neg()
            .ok_or(ArithmeticError::Overflow { op: "ratio neg" })?;
        Ok(Ratio { n, d: self.d })
    }

    fn compare(&self, other: &Self) -> Ordering {
        // |n| * d < 2^126, so cross products never overflow i128.
        let lhs = self.n as i128 * other.d as i128;
        let rhs = other.n as i128 * self.d as i128;
        lhs.cmp(&rhs)
    }

    fn to_f64(self) -> f64 {
        self.n as f64 / self.d as f64
    }
}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Ratio::ZERO
    }
}

impl From<i32> for Ratio {
    fn from(value: i32) -> Self {
        Ratio::from_integer(value as i64)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.d == 1 {
            write!(f, "{}", self.n)
        } else {
            write!(f, "{}/{}", self.n, self.d)
        }
    }
}

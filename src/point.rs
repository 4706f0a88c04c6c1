// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// 2D points over a Scalar and the exact predicates the mesh is built on.
//
// Orientation convention: with y pointing up, cross(a, b) > 0 means b turns
// counter-clockwise from a. Signed polygon area follows the standard
// shoelace sign, so clockwise rings have negative area.

use std::cmp::Ordering;

use crate::scalar::{Scalar, ScalarResult};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2D<S> {
    pub x: S,
    pub y: S,
}

/// Position of a point relative to a directed segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SegmentRelation {
    OnStart,
    OnEnd,
    LeftOf,
    RightOf,
    /// Collinear, behind the start.
    Before,
    /// Collinear, past the end.
    After,
    /// Collinear, strictly between the endpoints.
    OnSegment,
}

/// Position of a point relative to a closed area.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Relation {
    Exterior,
    OnBoundary,
    Interior,
}

/// Intersection of the infinite lines through two segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing<S> {
    pub point: Point2D<S>,
    /// Parameter along the first segment (0 at its start, 1 at its end).
    pub along_a: S,
    /// Parameter along the second segment.
    pub along_b: S,
    /// Both parameters fall in `[0, 1]`.
    pub valid: bool,
}

impl<S: Scalar> Point2D<S> {
    #[inline]
    pub fn new(x: S, y: S) -> Self {
        Point2D { x, y }
    }

    pub fn from_ints(x: i64, y: i64) -> ScalarResult<Self> {
        Ok(Point2D::new(S::from_i64(x)?, S::from_i64(y)?))
    }

    pub fn origin() -> Self {
        Point2D::new(S::zero(), S::zero())
    }

    pub fn add(&self, other: &Self) -> ScalarResult<Self> {
        Ok(Point2D::new(self.x.checked_add(other.x)?, self.y.checked_add(other.y)?))
    }

    pub fn sub(&self, other: &Self) -> ScalarResult<Self> {
        Ok(Point2D::new(self.x.checked_sub(other.x)?, self.y.checked_sub(other.y)?))
    }

    pub fn scale(&self, k: S) -> ScalarResult<Self> {
        Ok(Point2D::new(self.x.checked_mul(k)?, self.y.checked_mul(k)?))
    }

    pub fn div(&self, k: S) -> ScalarResult<Self> {
        Ok(Point2D::new(self.x.checked_div(k)?, self.y.checked_div(k)?))
    }

    pub fn dot(&self, other: &Self) -> ScalarResult<S> {
        self.x.checked_mul(other.x)?.checked_add(self.y.checked_mul(other.y)?)
    }

    /// z-component of the 3D cross product.
    pub fn cross(&self, other: &Self) -> ScalarResult<S> {
        self.x.checked_mul(other.y)?.checked_sub(self.y.checked_mul(other.x)?)
    }

    pub fn size_squared(&self) -> ScalarResult<S> {
        self.dot(self)
    }

    /// Euclidean length. Display and normalization only.
    pub fn size(&self) -> f64 {
        let (x, y) = self.to_f64();
        x.hypot(y)
    }

    /// Unit vector in floating point; the zero vector stays zero.
    pub fn normalized(&self) -> (f64, f64) {
        let len = self.size();
        if len == 0.0 {
            return (0.0, 0.0);
        }
        let (x, y) = self.to_f64();
        (x / len, y / len)
    }

    pub fn to_f64(&self) -> (f64, f64) {
        (self.x.to_f64(), self.y.to_f64())
    }

    pub fn midpoint(a: &Self, b: &Self) -> ScalarResult<Self> {
        let sum = a.add(b)?;
        Ok(Point2D::new(sum.x.half()?, sum.y.half()?))
    }

    /// Orientation of `c` relative to the directed line `a -> b`.
    pub fn orient(a: &Self, b: &Self, c: &Self) -> ScalarResult<Ordering> {
        let base = b.sub(a)?;
        let cross = base.cross(&c.sub(a)?)?;
        Ok(S::cross_sign(cross, base.x, base.y))
    }

    /// Classify `self` against the directed segment `start -> end`.
    pub fn segment_relation(&self, start: &Self, end: &Self) -> ScalarResult<SegmentRelation> {
        if self == start {
            return Ok(SegmentRelation::OnStart);
        }
        if self == end {
            return Ok(SegmentRelation::OnEnd);
        }
        match Point2D::orient(start, end, self)? {
            Ordering::Greater => return Ok(SegmentRelation::LeftOf),
            Ordering::Less => return Ok(SegmentRelation::RightOf),
            Ordering::Equal => {}
        }
        let length = start.sub(end)?.size_squared()?;
        if self.sub(end)?.size_squared()? > length {
            return Ok(SegmentRelation::Before);
        }
        if self.sub(start)?.size_squared()? > length {
            return Ok(SegmentRelation::After);
        }
        Ok(SegmentRelation::OnSegment)
    }

    /// Closed on-segment test.
    pub fn is_on_segment(test: &Self, a: &Self, b: &Self) -> ScalarResult<bool> {
        Ok(matches!(
            test.segment_relation(a, b)?,
            SegmentRelation::OnStart | SegmentRelation::OnEnd | SegmentRelation::OnSegment
        ))
    }

    /// True when `a_s -> a_e` and `b_s -> b_e` are parallel and point the same
    /// way.
    pub fn are_parallel(a_s: &Self, a_e: &Self, b_s: &Self, b_e: &Self) -> ScalarResult<bool> {
        let moved = a_e.sub(a_s)?.add(b_s)?;
        Ok(matches!(
            moved.segment_relation(b_s, b_e)?,
            SegmentRelation::OnSegment | SegmentRelation::OnEnd | SegmentRelation::After
        ))
    }

    /// True iff `test` lies strictly inside the wedge swept clockwise from
    /// `corner -> after` to `corner -> before`.
    ///
    /// This is the angular slot on the right-hand side of a path that arrives
    /// at `corner` from `before` and leaves toward `after`. When `before` and
    /// `after` lie in the same direction the wedge is the full turn minus that
    /// ray.
    pub fn in_region_cw(before: &Self, corner: &Self, after: &Self, test: &Self) -> ScalarResult<bool> {
        let a = after.sub(corner)?;
        let b = before.sub(corner)?;
        let d = test.sub(corner)?;
        let ad = a.cross(&d)?;
        let db = d.cross(&b)?;
        match a.cross(&b)?.signum() {
            Ordering::Less => Ok(ad.is_negative() && db.is_negative()),
            Ordering::Greater => Ok(ad.is_negative() || db.is_negative()),
            Ordering::Equal => {
                if a.dot(&b)?.is_positive() {
                    Ok(!(ad.is_zero() && a.dot(&d)?.is_positive()))
                } else {
                    Ok(ad.is_negative())
                }
            }
        }
    }

    /// Intersect the lines through `a_s -> a_e` and `b_s -> b_e`.
    ///
    /// Returns `None` when the determinant is exactly zero (parallel or
    /// collinear); otherwise the crossing point and whether it lies on both
    /// closed segments.
    pub fn intersect(a_s: &Self, a_e: &Self, b_s: &Self, b_e: &Self) -> ScalarResult<Option<Crossing<S>>> {
        let a = a_e.sub(a_s)?;
        let b = b_e.sub(b_s)?;
        let denom = a.cross(&b)?;
        if denom.is_zero() {
            return Ok(None);
        }
        let d = a_s.sub(b_s)?;
        let num_a = b.cross(&d)?;
        let along_a = num_a.checked_div(denom)?;
        let along_b = a.cross(&d)?.checked_div(denom)?;
        // multiply before dividing: one rounding per coordinate
        let offset = Point2D::new(
            a.x.checked_mul(num_a)?.checked_div(denom)?,
            a.y.checked_mul(num_a)?.checked_div(denom)?,
        );
        let point = a_s.add(&offset)?;
        let unit = |t: &S| !t.is_negative() && t.compare(&S::one()) != Ordering::Greater;
        let valid = unit(&along_a) && unit(&along_b);
        Ok(Some(Crossing { point, along_a, along_b, valid }))
    }

    /// Closest point to `self` on the closed segment `a -> b`.
    pub fn project_to_segment(&self, a: &Self, b: &Self) -> ScalarResult<Self> {
        let dir = b.sub(a)?;
        let length = dir.size_squared()?;
        if length.is_zero() {
            return Ok(*a);
        }
        let t = self.sub(a)?.dot(&dir)?.checked_div(length)?;
        if t.is_negative() {
            return Ok(*a);
        }
        if t.compare(&S::one()) == Ordering::Greater {
            return Ok(*b);
        }
        a.add(&dir.scale(t)?)
    }

    /// Shoelace area; positive for counter-clockwise rings.
    pub fn signed_area(points: &[Self]) -> ScalarResult<S> {
        let mut twice = S::zero();
        for (i, p) in points.iter().enumerate() {
            let q = &points[(i + 1) % points.len()];
            twice = twice.checked_add(p.cross(q)?)?;
        }
        twice.half()
    }

    /// Whether the ray from `self` toward +x crosses `a -> b`.
    ///
    /// Half-open in y, so a vertex exactly at the ray's height counts once
    /// and horizontal segments never count.
    pub fn ray_crosses(&self, a: &Self, b: &Self) -> ScalarResult<bool> {
        let a_above = a.y > self.y;
        let b_above = b.y > self.y;
        if a_above == b_above {
            return Ok(false);
        }
        let side = Point2D::orient(a, b, self)?;
        Ok(if b.y > a.y {
            side == Ordering::Greater
        } else {
            side == Ordering::Less
        })
    }
}

/// Classify `p` against the closed polygon `ring` (either orientation).
pub fn polygon_relation<S: Scalar>(ring: &[Point2D<S>], p: &Point2D<S>) -> ScalarResult<Relation> {
    let mut inside = false;
    for (i, a) in ring.iter().enumerate() {
        let b = &ring[(i + 1) % ring.len()];
        if Point2D::is_on_segment(p, a, b)? {
            return Ok(Relation::OnBoundary);
        }
        if p.ray_crosses(a, b)? {
            inside = !inside;
        }
    }
    Ok(if inside { Relation::Interior } else { Relation::Exterior })
}

/// Whether closed segments `a0 -> a1` and `b0 -> b1` share any point.
pub fn segments_touch<S: Scalar>(
    a0: &Point2D<S>,
    a1: &Point2D<S>,
    b0: &Point2D<S>,
    b1: &Point2D<S>,
) -> ScalarResult<bool> {
    let o1 = Point2D::orient(a0, a1, b0)?;
    let o2 = Point2D::orient(a0, a1, b1)?;
    let o3 = Point2D::orient(b0, b1, a0)?;
    let o4 = Point2D::orient(b0, b1, a1)?;
    let straddles = |x: Ordering, y: Ordering| {
        x != Ordering::Equal && y != Ordering::Equal && x != y
    };
    if straddles(o1, o2) && straddles(o3, o4) {
        return Ok(true);
    }
    Ok((o1 == Ordering::Equal && Point2D::is_on_segment(b0, a0, a1)?)
        || (o2 == Ordering::Equal && Point2D::is_on_segment(b1, a0, a1)?)
        || (o3 == Ordering::Equal && Point2D::is_on_segment(a0, b0, b1)?)
        || (o4 == Ordering::Equal && Point2D::is_on_segment(a1, b0, b1)?))
}

/// First pair of ring segments `(i, j)` that meet anywhere other than the
/// shared endpoint of neighbouring segments. Segment `i` runs from `ring[i]`
/// to `ring[i + 1]`.
pub fn first_self_intersection<S: Scalar>(ring: &[Point2D<S>]) -> ScalarResult<Option<(usize, usize)>> {
    let n = ring.len();
    let seg = |i: usize| (&ring[i], &ring[(i + 1) % n]);
    for i in 0..n {
        for j in (i + 1)..n {
            let (a0, a1) = seg(i);
            let (b0, b1) = seg(j);
            if j == i + 1 {
                // b0 == a1 is shared; they may not fold back onto each other.
                let folds = matches!(b1.segment_relation(a0, a1)?, SegmentRelation::OnStart | SegmentRelation::OnSegment)
                    || matches!(a0.segment_relation(b0, b1)?, SegmentRelation::OnEnd | SegmentRelation::OnSegment);
                if folds {
                    return Ok(Some((i, j)));
                }
            } else if i == 0 && j == n - 1 {
                // b1 == a0 is shared.
                let folds = matches!(a1.segment_relation(b0, b1)?, SegmentRelation::OnStart | SegmentRelation::OnSegment)
                    || matches!(b0.segment_relation(a0, a1)?, SegmentRelation::OnEnd | SegmentRelation::OnSegment);
                if folds {
                    return Ok(Some((i, j)));
                }
            } else if segments_touch(a0, a1, b0, b1)? {
                return Ok(Some((i, j)));
            }
        }
    }
    Ok(None)
}

pub fn polygon_is_simple<S: Scalar>(ring: &[Point2D<S>]) -> ScalarResult<bool> {
    Ok(first_self_intersection(ring)?.is_none())
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds<S> {
    pub min: Point2D<S>,
    pub max: Point2D<S>,
}

impl<S: Scalar> Bounds<S> {
    pub fn from_points(points: &[Point2D<S>]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds { min: *first, max: *first };
        for p in &points[1..] {
            bounds.include(p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: &Point2D<S>) {
        if p.x < self.min.x {
            self.min.x = p.x;
        }
        if p.y < self.min.y {
            self.min.y = p.y;
        }
        if p.x > self.max.x {
            self.max.x = p.x;
        }
        if p.y > self.max.y {
            self.max.y = p.y;
        }
    }

    pub fn extent(&self) -> ScalarResult<Point2D<S>> {
        self.max.sub(&self.min)
    }

    pub fn center(&self) -> ScalarResult<Point2D<S>> {
        Point2D::midpoint(&self.min, &self.max)
    }

    pub fn contains(&self, p: &Point2D<S>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

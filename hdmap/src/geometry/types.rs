//! Planar geometry type definitions

use std::fmt;

/// A point in planar map coordinates (meters in a local projection).
///
/// Map ingestion is responsible for projecting geographic coordinates into
/// this planar frame; everything downstream treats `x`/`y` as Euclidean.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2d {
    /// East-west coordinate
    pub x: f64,
    /// North-south coordinate
    pub y: f64,
}

impl Point2d {
    /// Creates a point from its coordinates.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    ///
    /// Always non-negative and symmetric.
    #[inline]
    pub fn distance_to(&self, other: &Point2d) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Point2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// An axis-aligned rectangle described by its min and max corners.
///
/// Invariant: `min.x <= max.x` and `min.y <= max.y`. A degenerate box where
/// `min == max` is valid and has zero area; it behaves as a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Lower-left corner
    pub min: Point2d,
    /// Upper-right corner
    pub max: Point2d,
}

impl BoundingBox {
    /// Creates a bounding box from its corners.
    ///
    /// Debug builds assert the corner ordering invariant.
    #[inline]
    pub fn new(min: Point2d, max: Point2d) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y,
            "bounding box corners out of order: min {min}, max {max}"
        );
        Self { min, max }
    }

    /// Creates a degenerate box covering a single point.
    #[inline]
    pub fn from_point(point: Point2d) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Computes the tight box around a sequence of points.
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2d>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::from_point(first);
        for point in iter {
            bbox.expand(point);
        }
        Some(bbox)
    }

    /// Grows the box in place so it covers `point`.
    #[inline]
    pub fn expand(&mut self, point: Point2d) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Whether `point` lies inside the box.
    ///
    /// All four edges are inclusive, so a point exactly on a boundary counts.
    #[inline]
    pub fn contains(&self, point: &Point2d) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Whether two boxes overlap.
    ///
    /// Boxes that merely touch along an edge or corner intersect.
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }

    /// Area of the box. Zero for degenerate boxes.
    #[inline]
    pub fn area(&self) -> f64 {
        (self.max.x - self.min.x) * (self.max.y - self.min.y)
    }

    /// Center point of the box.
    #[inline]
    pub fn center(&self) -> Point2d {
        Point2d {
            x: (self.min.x + self.max.x) / 2.0,
            y: (self.min.y + self.max.y) / 2.0,
        }
    }

    /// Smallest box covering both `self` and `other`.
    #[inline]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: Point2d {
                x: self.min.x.min(other.min.x),
                y: self.min.y.min(other.min.y),
            },
            max: Point2d {
                x: self.max.x.max(other.max.x),
                y: self.max.y.max(other.max.y),
            },
        }
    }

    /// How much `area` would grow if the box were extended to cover `other`.
    ///
    /// Zero when `other` already fits inside `self`.
    #[inline]
    pub fn enlargement(&self, other: &BoundingBox) -> f64 {
        self.union(other).area() - self.area()
    }
}

#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are document coordinates: the page origin is the top-left
//! corner of the scrolled content, so an element's position already includes
//! the current scroll offset. Values may be negative or fractional.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this point moved by the given deltas.
    #[inline]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width times height.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Scroll position of the viewport within the document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScrollOffset {
    pub left: f64,
    pub top: f64,
}

impl ScrollOffset {
    /// Create a new scroll offset.
    #[inline]
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// An axis-aligned rectangle.
///
/// `x`/`y` is the top-left corner. Right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Create a rectangle with the given top-left corner and size.
    #[inline]
    pub const fn from_point_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// The visible viewport of a window of `size`, scrolled by `scroll`.
    #[inline]
    pub const fn viewport(size: Size, scroll: ScrollOffset) -> Self {
        Self::new(scroll.left, scroll.top, size.width, size.height)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Check whether `other` lies entirely inside this rectangle.
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Return this rectangle moved by the given deltas.
    #[inline]
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Create a new rectangle that is the union of this rectangle and another.
    ///
    /// The result is the smallest rectangle that contains both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect::new(x, y, right - x, bottom - y)
    }

    /// Create a new rectangle inside the current one with the given margin.
    ///
    /// Extents never go negative; a margin larger than the rectangle collapses
    /// it to zero width or height.
    pub fn inner(&self, margin: Sides) -> Rect {
        let width = (self.width - margin.horizontal_sum()).max(0.0);
        let height = (self.height - margin.vertical_sum()).max(0.0);
        Rect::new(self.x + margin.left, self.y + margin.top, width, height)
    }

    /// Create a new rectangle grown outward by the given margin.
    pub fn outer(&self, margin: Sides) -> Rect {
        Rect::new(
            self.x - margin.left,
            self.y - margin.top,
            self.width + margin.horizontal_sum(),
            self.height + margin.vertical_sum(),
        )
    }
}

/// Sides for padding/margin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with horizontal values only.
    pub const fn horizontal(val: f64) -> Self {
        Self {
            top: 0.0,
            right: val,
            bottom: 0.0,
            left: val,
        }
    }

    /// Create new sides with vertical values only.
    pub const fn vertical(val: f64) -> Self {
        Self {
            top: val,
            right: 0.0,
            bottom: val,
            left: 0.0,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }
}

impl From<f64> for Sides {
    fn from(val: f64) -> Self {
        Self::all(val)
    }
}

impl From<(f64, f64)> for Sides {
    fn from((vertical, horizontal): (f64, f64)) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, ScrollOffset, Sides, Size};

    #[test]
    fn rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.area(), 1200.0);
        assert_eq!(rect.center(), Point::new(25.0, 40.0));
    }

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert!(rect.contains(Point::new(2.0, 3.0)));
        assert!(rect.contains(Point::new(5.5, 7.5)));
        assert!(!rect.contains(Point::new(6.0, 3.0)));
        assert!(!rect.contains(Point::new(2.0, 8.0)));
    }

    #[test]
    fn rect_contains_rect() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_rect(&Rect::new(10.0, 10.0, 90.0, 90.0)));
        assert!(!outer.contains_rect(&Rect::new(10.0, 10.0, 91.0, 10.0)));
        assert!(!outer.contains_rect(&Rect::new(-1.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn rect_intersection_overlaps() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(2.0, 2.0, 4.0, 4.0);
        assert_eq!(a.intersection(&b), Rect::new(2.0, 2.0, 2.0, 2.0));
    }

    #[test]
    fn rect_intersection_no_overlap_is_empty() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(3.0, 3.0, 2.0, 2.0);
        assert_eq!(a.intersection(&b), Rect::default());
        assert!(a.intersection_opt(&b).is_none());
    }

    #[test]
    fn rect_union_covers_both() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(5.0, -1.0, 1.0, 1.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -1.0, 6.0, 3.0));
    }

    #[test]
    fn rect_inner_reduces() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let inner = rect.inner(Sides::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(inner, Rect::new(4.0, 1.0, 4.0, 6.0));
    }

    #[test]
    fn rect_inner_never_negative() {
        let rect = Rect::new(0.0, 0.0, 10.0, 4.0);
        let inner = rect.inner(Sides::all(8.0));
        assert_eq!(inner.width, 0.0);
        assert_eq!(inner.height, 0.0);
        assert!(inner.is_empty());
    }

    #[test]
    fn rect_outer_grows() {
        let rect = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(rect.outer(Sides::all(2.0)), Rect::new(8.0, 8.0, 14.0, 14.0));
    }

    #[test]
    fn viewport_includes_scroll() {
        let viewport = Rect::viewport(Size::new(800.0, 600.0), ScrollOffset::new(0.0, 250.0));
        assert_eq!(viewport, Rect::new(0.0, 250.0, 800.0, 600.0));
    }

    #[test]
    fn sides_conversions_and_sums() {
        assert_eq!(Sides::all(3.0), Sides::from(3.0));
        assert_eq!(Sides::from((1.0, 2.0)), Sides::new(1.0, 2.0, 1.0, 2.0));
        let sides = Sides::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(sides.horizontal_sum(), 6.0);
        assert_eq!(sides.vertical_sum(), 4.0);
        assert_eq!(Sides::horizontal(2.0).vertical_sum(), 0.0);
        assert_eq!(Sides::vertical(2.0).horizontal_sum(), 0.0);
    }
}

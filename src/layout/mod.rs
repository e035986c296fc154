//! Pure geometry used by the docking tree.
//!
//! Nothing in here knows about nodes or ids: splitter math, tab strips,
//! floating resize grips, the panel content grid and anchor detection all
//! take rectangles in and give rectangles back, so they can be tested
//! without a docker or a terminal.

pub mod anchor;
pub mod floating;
pub mod grid;
pub mod splitter;
pub mod tabs;

pub use anchor::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn along(self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };
    pub const INFINITE: Size = Size {
        width: f64::INFINITY,
        height: f64::INFINITY,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn along(self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    pub fn across(self, orientation: Orientation) -> f64 {
        self.along(orientation.flip())
    }

    /// Builds a size from an extent along `orientation` and one across it.
    pub fn from_axes(orientation: Orientation, along: f64, across: f64) -> Self {
        match orientation {
            Orientation::Horizontal => Size::new(along, across),
            Orientation::Vertical => Size::new(across, along),
        }
    }

    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    pub fn min(self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_center(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment, so two rectangles sharing an edge never both
    /// claim a point.
    pub fn contains(&self, point: Point) -> bool {
        !self.is_empty()
            && point.x >= self.x
            && point.x < self.right()
            && point.y >= self.y
            && point.y < self.bottom()
    }

    pub fn start(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    pub fn extent(&self, orientation: Orientation) -> f64 {
        self.size().along(orientation)
    }

    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::new(x, y, 0.0, 0.0);
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Splits off a slice of `thickness` along `edge`, returning the slice
    /// and the remainder.
    pub fn cut(&self, edge: Edge, thickness: f64) -> (Rect, Rect) {
        let t = thickness.clamp(0.0, self.extent(edge.axis()));
        match edge {
            Edge::Top => (
                Rect::new(self.x, self.y, self.width, t),
                Rect::new(self.x, self.y + t, self.width, self.height - t),
            ),
            Edge::Bottom => (
                Rect::new(self.x, self.bottom() - t, self.width, t),
                Rect::new(self.x, self.y, self.width, self.height - t),
            ),
            Edge::Left => (
                Rect::new(self.x, self.y, t, self.height),
                Rect::new(self.x + t, self.y, self.width - t, self.height),
            ),
            Edge::Right => (
                Rect::new(self.right() - t, self.y, t, self.height),
                Rect::new(self.x, self.y, self.width - t, self.height),
            ),
        }
    }

    pub fn lerp(&self, to: &Rect, t: f64) -> Rect {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Rect::new(
            mix(self.x, to.x),
            mix(self.y, to.y),
            mix(self.width, to.width),
            mix(self.height, to.height),
        )
    }
}

/// Split axis of a splitter. `Horizontal` places the panes side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flip(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// One side of a rectangle: where a tab strip sits, or which surface edge a
/// drawer is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Axis a slice cut from this edge is measured on.
    pub fn axis(self) -> Orientation {
        match self {
            Edge::Top | Edge::Bottom => Orientation::Vertical,
            Edge::Left | Edge::Right => Orientation::Horizontal,
        }
    }

    /// Axis a tab strip on this edge runs along.
    pub fn strip_axis(self) -> Orientation {
        self.axis().flip()
    }
}

/// Semantic placement of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DockLocation {
    Stacked,
    Top,
    Bottom,
    Left,
    Right,
    Float,
    Modal,
}

impl DockLocation {
    /// Splitter orientation and whether the new pane goes first, for the
    /// four splitting locations.
    pub fn split(self) -> Option<(Orientation, bool)> {
        match self {
            DockLocation::Left => Some((Orientation::Horizontal, true)),
            DockLocation::Right => Some((Orientation::Horizontal, false)),
            DockLocation::Top => Some((Orientation::Vertical, true)),
            DockLocation::Bottom => Some((Orientation::Vertical, false)),
            _ => None,
        }
    }

    pub fn edge(self) -> Option<Edge> {
        match self {
            DockLocation::Left => Some(Edge::Left),
            DockLocation::Right => Some(Edge::Right),
            DockLocation::Top => Some(Edge::Top),
            DockLocation::Bottom => Some(Edge::Bottom),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 5.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(!r.contains(Point::new(10.0, 2.0)));
        assert!(!Rect::new(0.0, 0.0, 0.0, 5.0).contains(Point::new(0.0, 0.0)));
    }

    #[test]
    fn cut_returns_slice_and_rest() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        let (top, rest) = r.cut(Edge::Top, 5.0);
        assert_eq!(top, Rect::new(10.0, 20.0, 100.0, 5.0));
        assert_eq!(rest, Rect::new(10.0, 25.0, 100.0, 45.0));
        let (right, rest) = r.cut(Edge::Right, 200.0);
        assert_eq!(right.width, 100.0);
        assert_eq!(rest.width, 0.0);
    }

    #[test]
    fn intersection_of_disjoint_is_empty() {
        let a = Rect::new(0.0, 0.0, 5.0, 5.0);
        let b = Rect::new(6.0, 0.0, 5.0, 5.0);
        assert!(a.intersection(&b).is_empty());
        assert_eq!(
            a.intersection(&Rect::new(2.0, 2.0, 10.0, 10.0)),
            Rect::new(2.0, 2.0, 3.0, 3.0)
        );
    }

    #[test]
    fn split_locations_map_to_orientation() {
        assert_eq!(
            DockLocation::Left.split(),
            Some((Orientation::Horizontal, true))
        );
        assert_eq!(
            DockLocation::Bottom.split(),
            Some((Orientation::Vertical, false))
        );
        assert_eq!(DockLocation::Stacked.split(), None);
    }
}

use super::{Orientation, Rect, Size};

/// Size constraints one pane reports to its splitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneBounds {
    pub min: Size,
    pub max: Size,
    /// Preferred size, used only while the splitter is still choosing its
    /// first position.
    pub initial: Option<Size>,
}

impl Default for PaneBounds {
    fn default() -> Self {
        Self {
            min: Size::ZERO,
            max: Size::INFINITE,
            initial: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitGeometry {
    pub panes: [Rect; 2],
    pub bar: Rect,
    /// Position actually applied after clamping.
    pub pos: f64,
    pub is_static: bool,
}

/// Allowed range for the extent of pane 0, as `(lo, hi)`.
pub fn divider_bounds(
    orientation: Orientation,
    available: f64,
    first: &PaneBounds,
    second: &PaneBounds,
) -> (f64, f64) {
    let lo = first
        .min
        .along(orientation)
        .max(available - second.max.along(orientation));
    let hi = first
        .max
        .along(orientation)
        .min(available - second.min.along(orientation));
    (lo, hi)
}

/// Clamps a pane 0 extent into `(lo, hi)`. When the bounds cross, pane 0's
/// minimum wins, capped at what is available.
pub fn clamp_extent(extent: f64, lo: f64, hi: f64, available: f64) -> f64 {
    let available = available.max(0.0);
    if lo > hi {
        return lo.clamp(0.0, available);
    }
    extent.clamp(lo, hi).clamp(0.0, available)
}

/// Position inferred from the panes' preferred sizes: proportional when
/// both ask, exact when one asks, even when neither does.
pub fn best_position(available: f64, first: Option<f64>, second: Option<f64>) -> f64 {
    if available <= 0.0 {
        return 0.5;
    }
    let pos = match (first, second) {
        (Some(a), Some(b)) if a + b > 0.0 => a / (a + b),
        (Some(a), None) => a / available,
        (None, Some(b)) => 1.0 - b / available,
        _ => 0.5,
    };
    pos.clamp(0.0, 1.0)
}

/// The bar is not draggable when either pane is pinned to one extent on the
/// split axis.
pub fn is_static(orientation: Orientation, first: &PaneBounds, second: &PaneBounds) -> bool {
    let pinned = |b: &PaneBounds| b.max.along(orientation) == b.min.along(orientation);
    pinned(first) || pinned(second)
}

/// Lays two panes and the bar between them inside `rect`.
///
/// `pos` is `None` while the splitter is in best-position mode.
pub fn split(
    rect: Rect,
    orientation: Orientation,
    pos: Option<f64>,
    bar: f64,
    snap: bool,
    first: &PaneBounds,
    second: &PaneBounds,
) -> SplitGeometry {
    let total = rect.extent(orientation);
    let bar = bar.min(total).max(0.0);
    let available = (total - bar).max(0.0);
    let pos = pos.unwrap_or_else(|| {
        best_position(
            available,
            first
                .initial
                .map(|s| s.along(orientation))
                .filter(|v| v.is_finite()),
            second
                .initial
                .map(|s| s.along(orientation))
                .filter(|v| v.is_finite()),
        )
    });
    let (lo, hi) = divider_bounds(orientation, available, first, second);
    let mut extent = clamp_extent(pos.clamp(0.0, 1.0) * available, lo, hi, available);
    if snap {
        extent = extent.round().clamp(0.0, available);
    }
    let applied = if available > 0.0 {
        extent / available
    } else {
        pos.clamp(0.0, 1.0)
    };

    let start = rect.start(orientation);
    let (pane0, bar_rect, pane1) = match orientation {
        Orientation::Horizontal => (
            Rect::new(rect.x, rect.y, extent, rect.height),
            Rect::new(start + extent, rect.y, bar, rect.height),
            Rect::new(
                start + extent + bar,
                rect.y,
                available - extent,
                rect.height,
            ),
        ),
        Orientation::Vertical => (
            Rect::new(rect.x, rect.y, rect.width, extent),
            Rect::new(rect.x, start + extent, rect.width, bar),
            Rect::new(
                rect.x,
                start + extent + bar,
                rect.width,
                available - extent,
            ),
        ),
    };

    SplitGeometry {
        panes: [pane0, pane1],
        bar: bar_rect,
        pos: applied,
        is_static: is_static(orientation, first, second),
    }
}

/// Combined minimum of two panes and a bar.
pub fn combined_min(orientation: Orientation, bar: f64, first: Size, second: Size) -> Size {
    Size::from_axes(
        orientation,
        first.along(orientation) + bar + second.along(orientation),
        first.across(orientation).max(second.across(orientation)),
    )
}

/// Combined maximum of two panes and a bar.
pub fn combined_max(orientation: Orientation, bar: f64, first: Size, second: Size) -> Size {
    Size::from_axes(
        orientation,
        first.along(orientation) + bar + second.along(orientation),
        first.across(orientation).min(second.across(orientation)),
    )
}

/// Position implied by a pointer at `coordinate` while dragging the bar.
pub fn position_at(rect: Rect, orientation: Orientation, bar: f64, coordinate: f64) -> f64 {
    let available = (rect.extent(orientation) - bar).max(0.0);
    if available <= 0.0 {
        return 0.5;
    }
    ((coordinate - rect.start(orientation) - bar / 2.0) / available).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min: f64, max: f64) -> PaneBounds {
        PaneBounds {
            min: Size::new(min, min),
            max: Size::new(max, max),
            initial: None,
        }
    }

    #[test]
    fn unconstrained_panes_split_evenly() {
        let rect = Rect::new(0.0, 0.0, 204.0, 50.0);
        let g = split(
            rect,
            Orientation::Horizontal,
            None,
            4.0,
            true,
            &PaneBounds::default(),
            &PaneBounds::default(),
        );
        assert_eq!(g.panes[0].width, 100.0);
        assert_eq!(g.bar.x, 100.0);
        assert_eq!(g.panes[1].x, 104.0);
        assert_eq!(g.panes[1].width, 100.0);
        assert_eq!(g.pos, 0.5);
    }

    #[test]
    fn one_sided_initial_size_is_honoured_exactly() {
        let rect = Rect::new(0.0, 0.0, 300.0, 300.0);
        let first = PaneBounds {
            initial: Some(Size::new(0.0, 90.0)),
            ..PaneBounds::default()
        };
        let g = split(
            rect,
            Orientation::Vertical,
            None,
            0.0,
            true,
            &first,
            &PaneBounds::default(),
        );
        assert_eq!(g.panes[0].height, 90.0);
        let second = PaneBounds {
            initial: Some(Size::new(0.0, 60.0)),
            ..PaneBounds::default()
        };
        let g = split(
            rect,
            Orientation::Vertical,
            None,
            0.0,
            true,
            &PaneBounds::default(),
            &second,
        );
        assert_eq!(g.panes[1].height, 60.0);
    }

    #[test]
    fn position_is_clamped_by_pane_limits() {
        let rect = Rect::new(0.0, 0.0, 100.0, 10.0);
        let g = split(
            rect,
            Orientation::Horizontal,
            Some(0.95),
            0.0,
            false,
            &PaneBounds::default(),
            &bounds(30.0, f64::INFINITY),
        );
        assert_eq!(g.panes[0].width, 70.0);
        let g = split(
            rect,
            Orientation::Horizontal,
            Some(0.05),
            0.0,
            false,
            &bounds(20.0, 40.0),
            &PaneBounds::default(),
        );
        assert_eq!(g.panes[0].width, 20.0);
    }

    #[test]
    fn crossing_bounds_pin_to_first_minimum() {
        let rect = Rect::new(0.0, 0.0, 100.0, 10.0);
        let g = split(
            rect,
            Orientation::Horizontal,
            Some(0.5),
            0.0,
            false,
            &bounds(70.0, f64::INFINITY),
            &bounds(60.0, f64::INFINITY),
        );
        assert_eq!(g.panes[0].width, 70.0);
        assert_eq!(g.panes[1].width, 30.0);
    }

    #[test]
    fn static_when_a_pane_is_fixed() {
        assert!(is_static(
            Orientation::Horizontal,
            &bounds(50.0, 50.0),
            &PaneBounds::default()
        ));
        assert!(!is_static(
            Orientation::Horizontal,
            &bounds(10.0, 50.0),
            &PaneBounds::default()
        ));
    }

    #[test]
    fn combined_limits_add_along_and_intersect_across() {
        let min = combined_min(
            Orientation::Horizontal,
            4.0,
            Size::new(10.0, 20.0),
            Size::new(30.0, 5.0),
        );
        assert_eq!(min, Size::new(44.0, 20.0));
        let max = combined_max(
            Orientation::Horizontal,
            4.0,
            Size::new(10.0, 20.0),
            Size::new(30.0, 5.0),
        );
        assert_eq!(max, Size::new(44.0, 5.0));
    }

    #[test]
    fn pointer_position_maps_to_fraction() {
        let rect = Rect::new(100.0, 0.0, 204.0, 10.0);
        let pos = position_at(rect, Orientation::Horizontal, 4.0, 202.0);
        assert_eq!(pos, 0.5);
    }
}

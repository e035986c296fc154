use super::{Point, Rect, Size};
use crate::constants::MIN_FLOATING_VISIBLE_MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizerHandle {
    pub rect: Rect,
    pub edge: ResizeEdge,
}

/// Grips around a floating frame. Corners come first so they win over the
/// edges they overlap.
pub fn sizer_handles(rect: Rect, thickness: f64) -> Vec<SizerHandle> {
    let mut handles = Vec::new();
    if rect.is_empty() || thickness <= 0.0 {
        return handles;
    }
    let t = thickness.min(rect.width / 2.0).min(rect.height / 2.0);
    let right = rect.right() - t;
    let bottom = rect.bottom() - t;
    let corner = |x: f64, y: f64, edge| SizerHandle {
        rect: Rect::new(x, y, t, t),
        edge,
    };
    handles.push(corner(rect.x, rect.y, ResizeEdge::TopLeft));
    handles.push(corner(right, rect.y, ResizeEdge::TopRight));
    handles.push(corner(rect.x, bottom, ResizeEdge::BottomLeft));
    handles.push(corner(right, bottom, ResizeEdge::BottomRight));
    let inner_w = rect.width - 2.0 * t;
    let inner_h = rect.height - 2.0 * t;
    if inner_w > 0.0 {
        handles.push(SizerHandle {
            rect: Rect::new(rect.x + t, rect.y, inner_w, t),
            edge: ResizeEdge::Top,
        });
        handles.push(SizerHandle {
            rect: Rect::new(rect.x + t, bottom, inner_w, t),
            edge: ResizeEdge::Bottom,
        });
    }
    if inner_h > 0.0 {
        handles.push(SizerHandle {
            rect: Rect::new(rect.x, rect.y + t, t, inner_h),
            edge: ResizeEdge::Left,
        });
        handles.push(SizerHandle {
            rect: Rect::new(right, rect.y + t, t, inner_h),
            edge: ResizeEdge::Right,
        });
    }
    handles
}

pub fn hit_sizer(rect: Rect, thickness: f64, point: Point) -> Option<ResizeEdge> {
    sizer_handles(rect, thickness)
        .into_iter()
        .find(|handle| handle.rect.contains(point))
        .map(|handle| handle.edge)
}

/// New rect for a floating frame whose `edge` was dragged from `start_mouse`
/// to `mouse`. Shrinking stops at `min`, growing stops at `max`; unless
/// `allow_offscreen`, the moving edges stay inside `bounds`.
#[allow(clippy::too_many_arguments)]
pub fn apply_resize_drag(
    start: Rect,
    edge: ResizeEdge,
    start_mouse: Point,
    mouse: Point,
    min: Size,
    max: Size,
    bounds: Rect,
    allow_offscreen: bool,
) -> Rect {
    let dx = mouse.x - start_mouse.x;
    let dy = mouse.y - start_mouse.y;
    let mut x = start.x;
    let mut y = start.y;
    let mut width = start.width;
    let mut height = start.height;

    if edge.moves_left() {
        x += dx;
        width -= dx;
    } else if edge.moves_right() {
        width += dx;
    }
    if edge.moves_top() {
        y += dy;
        height -= dy;
    } else if edge.moves_bottom() {
        height += dy;
    }

    if !allow_offscreen {
        if edge.moves_left() && x < bounds.x {
            width -= bounds.x - x;
            x = bounds.x;
        }
        if edge.moves_top() && y < bounds.y {
            height -= bounds.y - y;
            y = bounds.y;
        }
        if edge.moves_right() && x + width > bounds.right() {
            width = bounds.right() - x;
        }
        if edge.moves_bottom() && y + height > bounds.bottom() {
            height = bounds.bottom() - y;
        }
    }

    let clamp_w = width.clamp(min.width, max.width.max(min.width));
    if clamp_w != width {
        if edge.moves_left() {
            x -= clamp_w - width;
        }
        width = clamp_w;
    }
    let clamp_h = height.clamp(min.height, max.height.max(min.height));
    if clamp_h != height {
        if edge.moves_top() {
            y -= clamp_h - height;
        }
        height = clamp_h;
    }

    Rect::new(x, y, width.max(1.0), height.max(1.0))
}

/// Moves `rect` so at least a margin of it (title strip included) stays on
/// the surface.
pub fn keep_reachable(rect: Rect, bounds: Rect) -> Rect {
    let margin = MIN_FLOATING_VISIBLE_MARGIN
        .min(rect.width)
        .min(bounds.width.max(0.0));
    let min_x = bounds.x - rect.width + margin;
    let max_x = bounds.right() - margin;
    let max_y = (bounds.bottom() - margin.min(rect.height)).max(bounds.y);
    Rect {
        x: rect.x.clamp(min_x.min(max_x), max_x.max(min_x)),
        y: rect.y.clamp(bounds.y, max_y),
        ..rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn resize_top_drag_down() {
        let start = Rect::new(0.0, 50.0, 20.0, 20.0);
        let res = apply_resize_drag(
            start,
            ResizeEdge::Top,
            Point::new(10.0, 50.0),
            Point::new(10.0, 55.0),
            Size::new(6.0, 3.0),
            Size::INFINITE,
            bounds(),
            false,
        );
        assert_eq!(res, Rect::new(0.0, 55.0, 20.0, 15.0));
    }

    #[test]
    fn resize_top_drag_up() {
        let start = Rect::new(0.0, 50.0, 20.0, 20.0);
        let res = apply_resize_drag(
            start,
            ResizeEdge::Top,
            Point::new(10.0, 50.0),
            Point::new(10.0, 45.0),
            Size::new(6.0, 3.0),
            Size::INFINITE,
            bounds(),
            false,
        );
        assert_eq!(res, Rect::new(0.0, 45.0, 20.0, 25.0));
    }

    #[test]
    fn shrinking_left_edge_stops_at_minimum_without_moving_right_edge() {
        let start = Rect::new(10.0, 10.0, 30.0, 12.0);
        let res = apply_resize_drag(
            start,
            ResizeEdge::Left,
            Point::new(10.0, 15.0),
            Point::new(60.0, 15.0),
            Size::new(8.0, 3.0),
            Size::INFINITE,
            bounds(),
            false,
        );
        assert_eq!(res.width, 8.0);
        assert_eq!(res.right(), start.right());
    }

    #[test]
    fn bottom_right_grows_until_bounds() {
        let start = Rect::new(50.0, 50.0, 20.0, 20.0);
        let res = apply_resize_drag(
            start,
            ResizeEdge::BottomRight,
            Point::new(69.0, 69.0),
            Point::new(200.0, 200.0),
            Size::ZERO,
            Size::INFINITE,
            bounds(),
            false,
        );
        assert_eq!(res, Rect::new(50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn corners_win_over_edges() {
        let rect = Rect::new(0.0, 0.0, 20.0, 10.0);
        assert_eq!(
            hit_sizer(rect, 1.0, Point::new(0.5, 0.5)),
            Some(ResizeEdge::TopLeft)
        );
        assert_eq!(
            hit_sizer(rect, 1.0, Point::new(10.0, 9.5)),
            Some(ResizeEdge::Bottom)
        );
        assert_eq!(hit_sizer(rect, 1.0, Point::new(10.0, 5.0)), None);
    }

    #[test]
    fn offscreen_frames_are_pulled_back() {
        let rect = Rect::new(-50.0, 200.0, 30.0, 10.0);
        let kept = keep_reachable(rect, bounds());
        assert_eq!(kept.x, -30.0 + MIN_FLOATING_VISIBLE_MARGIN);
        assert!(kept.y <= 100.0 - MIN_FLOATING_VISIBLE_MARGIN);
    }
}

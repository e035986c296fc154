use super::{Edge, Orientation, Rect};
use crate::config::TabMetrics;

/// Result of laying out one tab strip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabStrip {
    /// Area the tabs scroll inside, excluding scroll buttons.
    pub visible: Rect,
    /// One rect per tab in strip coordinates after scrolling. Tabs may lie
    /// partly or wholly outside `visible`.
    pub tabs: Vec<Rect>,
    pub offset: f64,
    pub overflow: bool,
    pub scroll_back: Option<Rect>,
    pub scroll_forward: Option<Rect>,
}

impl TabStrip {
    pub fn tab_at(&self, x: f64, y: f64) -> Option<usize> {
        let point = super::Point::new(x, y);
        if !self.visible.contains(point) {
            return None;
        }
        self.tabs.iter().position(|tab| tab.contains(point))
    }
}

/// Input for [`layout_tabs`].
#[derive(Debug, Clone, Copy)]
pub struct TabStripRequest<'a> {
    /// The whole strip, buttons included.
    pub strip: Rect,
    pub edge: Edge,
    pub lengths: &'a [f64],
    pub current: Option<usize>,
    pub offset: f64,
    /// Keep `current` in view by adjusting `offset`.
    pub reveal_current: bool,
    /// Space at the end of the strip taken by title-bar buttons.
    pub reserved: f64,
    pub buffer: f64,
}

/// Lays tabs along a strip: decides overflow, places the scroll buttons and
/// keeps the active tab at least `buffer` away from the strip ends when
/// `reveal_current` is set.
pub fn layout_tabs(req: TabStripRequest<'_>, metrics: &TabMetrics) -> TabStrip {
    let axis = req.edge.strip_axis();
    let strip_len = req.strip.extent(axis);
    let mut available = (strip_len - req.reserved).max(0.0);
    let total: f64 = req.lengths.iter().sum();
    let overflow = total > available && !req.lengths.is_empty();

    let start = req.strip.start(axis);
    let mut scroll_back = None;
    let mut scroll_forward = None;
    if overflow {
        let button = metrics.scroll_button_size.min(available / 2.0);
        available = (available - button * 2.0).max(0.0);
        scroll_back = Some(segment(req.strip, axis, start + available, button));
        scroll_forward = Some(segment(req.strip, axis, start + available + button, button));
    }

    let max_offset = (total - available).max(0.0);
    let mut offset = if overflow {
        req.offset.clamp(0.0, max_offset)
    } else {
        0.0
    };
    if overflow
        && req.reveal_current
        && let Some(current) = req.current
        && current < req.lengths.len()
    {
        let tab_start: f64 = req.lengths[..current].iter().sum();
        let tab_end = tab_start + req.lengths[current];
        let buffer = req.buffer.min(available / 2.0).max(0.0);
        if tab_start - offset < buffer {
            offset = tab_start - buffer;
        }
        if tab_end - offset > available - buffer {
            offset = tab_end - available + buffer;
        }
        offset = offset.clamp(0.0, max_offset);
    }

    let mut cursor = start - offset;
    let tabs = req
        .lengths
        .iter()
        .map(|len| {
            let rect = segment(req.strip, axis, cursor, *len);
            cursor += len;
            rect
        })
        .collect();

    TabStrip {
        visible: segment(req.strip, axis, start, available),
        tabs,
        offset,
        overflow,
        scroll_back,
        scroll_forward,
    }
}

fn segment(strip: Rect, axis: Orientation, from: f64, length: f64) -> Rect {
    match axis {
        Orientation::Horizontal => Rect::new(from, strip.y, length, strip.height),
        Orientation::Vertical => Rect::new(strip.x, from, strip.width, length),
    }
}

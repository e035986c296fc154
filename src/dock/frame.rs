use super::{DockNode, NodeId, NodeKind};
use crate::config::TabMetrics;
use crate::layout::floating::{ResizeEdge, hit_sizer};
use crate::layout::tabs::{TabStrip, TabStripRequest, layout_tabs};
use crate::layout::{Edge, Orientation, Point, Rect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameButton {
    Close,
    /// A panel button, by name.
    Custom(String),
}

/// What a point inside a frame lands on.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameHit {
    Tab(usize),
    Title,
    Button(FrameButton),
    ScrollBack,
    ScrollForward,
    Sizer(ResizeEdge),
    Content,
}

/// A tab group.
#[derive(Debug, Clone)]
pub struct Frame {
    pub(crate) parent: Option<NodeId>,
    pub(crate) panels: Vec<NodeId>,
    pub(crate) current: Option<usize>,
    /// Tab to reopen when a collapsed drawer frame expands.
    pub(crate) collapsed_tab: Option<usize>,
    pub(crate) tab_orientation: Edge,
    pub(crate) floating: bool,
    pub(crate) modal: bool,
    /// Edge of the drawer this frame lives in.
    pub(crate) drawer: Option<Edge>,
    /// Absolute rect of a floating frame.
    pub(crate) float_rect: Rect,
    pub(crate) tab_offset: f64,
    pub(crate) reveal_current: bool,

    pub(crate) rect: Rect,
    pub(crate) title_rect: Rect,
    pub(crate) content_rect: Rect,
    pub(crate) strip: TabStrip,
    pub(crate) buttons: Vec<(FrameButton, Rect)>,
    pub(crate) has_title: bool,
    pub(crate) sizer: f64,
}

/// Inputs of [`Frame::layout`] that come from the panels and the options.
#[derive(Debug, Clone)]
pub(crate) struct FrameLayout<'a> {
    pub title_height: f64,
    pub orientation: Edge,
    pub has_title: bool,
    pub tab_lengths: &'a [f64],
    pub buttons: Vec<(FrameButton, f64)>,
    pub metrics: &'a TabMetrics,
    pub buffer: f64,
    /// Resize grip thickness around floating frames.
    pub sizer: f64,
}

impl Frame {
    pub fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            panels: Vec::new(),
            current: None,
            collapsed_tab: None,
            tab_orientation: Edge::Top,
            floating: false,
            modal: false,
            drawer: None,
            float_rect: Rect::default(),
            tab_offset: 0.0,
            reveal_current: true,
            rect: Rect::default(),
            title_rect: Rect::default(),
            content_rect: Rect::default(),
            strip: TabStrip::default(),
            buttons: Vec::new(),
            has_title: false,
            sizer: 0.0,
        }
    }

    pub fn panels(&self) -> &[NodeId] {
        &self.panels
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_panel(&self) -> Option<NodeId> {
        self.current.and_then(|index| self.panels.get(index).copied())
    }

    pub fn tab_orientation(&self) -> Edge {
        self.tab_orientation
    }

    pub fn is_floating(&self) -> bool {
        self.floating
    }

    pub fn is_modal(&self) -> bool {
        self.modal
    }

    pub fn drawer_edge(&self) -> Option<Edge> {
        self.drawer
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn title_rect(&self) -> Rect {
        self.title_rect
    }

    pub fn content_rect(&self) -> Rect {
        self.content_rect
    }

    pub fn strip(&self) -> &TabStrip {
        &self.strip
    }

    pub fn buttons(&self) -> &[(FrameButton, Rect)] {
        &self.buttons
    }

    pub fn has_title(&self) -> bool {
        self.has_title
    }

    pub fn index_of(&self, panel: NodeId) -> Option<usize> {
        self.panels.iter().position(|id| *id == panel)
    }

    /// Inserts `panel` at `index` (the end by default), or moves it there if
    /// it is already in this frame. The first panel becomes current and the
    /// current panel stays current across the insert.
    pub fn add_panel(&mut self, panel: NodeId, index: Option<usize>) -> usize {
        let selected = self.current_panel();
        if let Some(existing) = self.index_of(panel) {
            self.panels.remove(existing);
        }
        let index = index.unwrap_or(self.panels.len()).min(self.panels.len());
        self.panels.insert(index, panel);
        self.current = match selected {
            Some(selected) => self.index_of(selected),
            None if self.drawer.is_some() && self.panels.len() > 1 => None,
            None => Some(0),
        };
        self.reveal_current = true;
        index
    }

    /// Removes `panel` and renormalises the current tab. Returns whether any
    /// panels remain.
    pub fn remove_panel(&mut self, panel: NodeId) -> bool {
        let Some(index) = self.index_of(panel) else {
            return !self.panels.is_empty();
        };
        self.panels.remove(index);
        let shift = |tab: Option<usize>, remaining: usize| match tab {
            _ if remaining == 0 => None,
            Some(cur) if index <= cur => Some(cur.saturating_sub(1)),
            other => other,
        };
        self.current = shift(self.current, self.panels.len());
        self.collapsed_tab = shift(self.collapsed_tab, self.panels.len());
        self.reveal_current = true;
        !self.panels.is_empty()
    }

    /// Selects a tab. Returns whether the selection changed.
    pub fn set_current(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|i| *i < self.panels.len());
        if index == self.current {
            return false;
        }
        self.current = index;
        self.reveal_current = true;
        true
    }

    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        if from >= self.panels.len() || to >= self.panels.len() || from == to {
            return false;
        }
        let selected = self.current_panel();
        let panel = self.panels.remove(from);
        self.panels.insert(to, panel);
        self.current = selected.and_then(|id| self.index_of(id));
        true
    }

    /// Scrolls the tab strip by `delta` and stops following the active tab
    /// until the selection changes again.
    pub fn scroll_tabs(&mut self, delta: f64) {
        self.tab_offset = (self.tab_offset + delta).max(0.0);
        self.reveal_current = false;
    }

    /// The area inside the resize grips of a floating frame.
    fn inner(&self, rect: Rect, sizer: f64) -> Rect {
        if !self.floating || sizer <= 0.0 {
            return rect;
        }
        let s = sizer.min(rect.width / 2.0).min(rect.height / 2.0);
        Rect::new(
            rect.x + s,
            rect.y + s,
            rect.width - 2.0 * s,
            rect.height - 2.0 * s,
        )
    }

    pub(crate) fn layout(&mut self, rect: Rect, params: FrameLayout<'_>) {
        self.rect = rect;
        self.sizer = params.sizer;
        self.has_title = params.has_title;
        let inner = self.inner(rect, params.sizer);
        if !params.has_title {
            self.title_rect = Rect::new(inner.x, inner.y, 0.0, 0.0);
            self.content_rect = inner;
            self.strip = TabStrip::default();
            self.buttons.clear();
            return;
        }

        let edge = params.orientation;
        let (title, content) = inner.cut(edge, params.title_height);
        self.title_rect = title;
        self.content_rect = if self.current.is_some() {
            content
        } else {
            Rect::new(content.x, content.y, 0.0, 0.0)
        };

        let axis = edge.strip_axis();
        let reserved: f64 = params.buttons.iter().map(|(_, len)| len).sum();
        let reserved = reserved.min(title.extent(axis));
        let strip = layout_tabs(
            TabStripRequest {
                strip: title,
                edge,
                lengths: params.tab_lengths,
                current: self.current,
                offset: self.tab_offset,
                reveal_current: self.reveal_current,
                reserved,
                buffer: params.buffer,
            },
            params.metrics,
        );
        self.tab_offset = strip.offset;
        self.strip = strip;

        self.buttons.clear();
        let mut cursor = title.start(axis) + title.extent(axis) - reserved;
        for (button, length) in params.buttons {
            let length = length.min(title.start(axis) + title.extent(axis) - cursor);
            let rect = match axis {
                Orientation::Horizontal => {
                    Rect::new(cursor, title.y, length, title.height)
                }
                Orientation::Vertical => {
                    Rect::new(title.x, cursor, title.width, length)
                }
            };
            self.buttons.push((button, rect));
            cursor += length;
        }
    }

    /// Hit test against the last layout.
    pub fn hit(&self, point: Point) -> Option<FrameHit> {
        if !self.rect.contains(point) {
            return None;
        }
        let inner = self.inner(self.rect, self.sizer);
        if !inner.contains(point) {
            return hit_sizer(self.rect, self.sizer, point).map(FrameHit::Sizer);
        }
        if let Some((button, _)) = self.buttons.iter().find(|(_, r)| r.contains(point)) {
            return Some(FrameHit::Button(button.clone()));
        }
        if self.strip.scroll_back.is_some_and(|r| r.contains(point)) {
            return Some(FrameHit::ScrollBack);
        }
        if self.strip.scroll_forward.is_some_and(|r| r.contains(point)) {
            return Some(FrameHit::ScrollForward);
        }
        if let Some(index) = self.strip.tab_at(point.x, point.y) {
            return Some(FrameHit::Tab(index));
        }
        if self.title_rect.contains(point) {
            return Some(FrameHit::Title);
        }
        Some(FrameHit::Content)
    }
}

impl DockNode for Frame {
    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dock::{Arena, Node, Panel};

    fn ids(n: usize) -> Vec<NodeId> {
        let mut arena = Arena::default();
        (0..n)
            .map(|_| arena.insert(Node::Panel(Panel::new("p"))))
            .collect()
    }

    #[test]
    fn first_panel_becomes_current_and_current_survives_inserts() {
        let p = ids(3);
        let mut frame = Frame::new(None);
        frame.add_panel(p[0], None);
        assert_eq!(frame.current(), Some(0));
        frame.add_panel(p[1], Some(0));
        assert_eq!(frame.current_panel(), Some(p[0]));
        assert_eq!(frame.current(), Some(1));
        // Re-adding moves instead of duplicating.
        frame.add_panel(p[1], None);
        assert_eq!(frame.panels(), &[p[0], p[1]]);
    }

    #[test]
    fn removing_keeps_index_in_range() {
        let p = ids(3);
        let mut frame = Frame::new(None);
        for id in &p {
            frame.add_panel(*id, None);
        }
        frame.set_current(Some(2));
        assert!(frame.remove_panel(p[2]));
        assert_eq!(frame.current(), Some(1));
        assert!(frame.remove_panel(p[0]));
        assert_eq!(frame.current(), Some(0));
        assert_eq!(frame.current_panel(), Some(p[1]));
        assert!(!frame.remove_panel(p[1]));
        assert_eq!(frame.current(), None);
    }

    #[test]
    fn removing_after_current_keeps_selection() {
        let p = ids(3);
        let mut frame = Frame::new(None);
        for id in &p {
            frame.add_panel(*id, None);
        }
        frame.set_current(Some(0));
        frame.remove_panel(p[1]);
        assert_eq!(frame.current_panel(), Some(p[0]));
    }

    #[test]
    fn collapsed_drawer_frame_stays_collapsed_on_add() {
        let p = ids(2);
        let mut frame = Frame::new(None);
        frame.drawer = Some(Edge::Left);
        frame.add_panel(p[0], None);
        frame.set_current(None);
        frame.add_panel(p[1], None);
        assert_eq!(frame.current(), None);
    }

    #[test]
    fn layout_places_strip_buttons_and_content() {
        let p = ids(2);
        let mut frame = Frame::new(None);
        frame.add_panel(p[0], None);
        frame.add_panel(p[1], None);
        let metrics = TabMetrics {
            char_width: 1.0,
            padding: 2.0,
            min_length: 4.0,
            max_length: 20.0,
            scroll_button_size: 1.0,
        };
        frame.layout(
            Rect::new(0.0, 0.0, 40.0, 10.0),
            FrameLayout {
                title_height: 1.0,
                orientation: Edge::Top,
                has_title: true,
                tab_lengths: &[6.0, 6.0],
                buttons: vec![(FrameButton::Close, 3.0)],
                metrics: &metrics,
                buffer: 1.0,
                sizer: 0.0,
            },
        );
        assert_eq!(frame.content_rect(), Rect::new(0.0, 1.0, 40.0, 9.0));
        assert_eq!(frame.buttons()[0].1, Rect::new(37.0, 0.0, 3.0, 1.0));
        assert_eq!(frame.hit(Point::new(7.0, 0.5)), Some(FrameHit::Tab(1)));
        assert_eq!(frame.hit(Point::new(20.0, 0.5)), Some(FrameHit::Title));
        assert_eq!(
            frame.hit(Point::new(38.0, 0.5)),
            Some(FrameHit::Button(FrameButton::Close))
        );
        assert_eq!(frame.hit(Point::new(5.0, 5.0)), Some(FrameHit::Content));
    }

    #[test]
    fn floating_frame_border_is_a_resize_grip() {
        let p = ids(1);
        let mut frame = Frame::new(None);
        frame.floating = true;
        frame.add_panel(p[0], None);
        let metrics = TabMetrics::default();
        frame.layout(
            Rect::new(10.0, 10.0, 20.0, 10.0),
            FrameLayout {
                title_height: 1.0,
                orientation: Edge::Top,
                has_title: true,
                tab_lengths: &[4.0],
                buttons: Vec::new(),
                metrics: &metrics,
                buffer: 0.0,
                sizer: 1.0,
            },
        );
        assert_eq!(frame.title_rect(), Rect::new(11.0, 11.0, 18.0, 1.0));
        assert_eq!(
            frame.hit(Point::new(10.5, 10.5)),
            Some(FrameHit::Sizer(ResizeEdge::TopLeft))
        );
        assert_eq!(
            frame.hit(Point::new(29.5, 15.0)),
            Some(FrameHit::Sizer(ResizeEdge::Right))
        );
    }
}

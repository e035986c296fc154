use super::splitter::PosAnimation;
use super::{DockNode, NodeId, NodeKind};
use crate::layout::{Edge, Rect};

/// An edge-bound slide-out region.
///
/// The collapser's position works like a splitter position measured from
/// the left/top of the surface: a left drawer is closed at `0`, right and
/// bottom drawers are closed at `1`. A closed drawer still shows its tab
/// strip.
#[derive(Debug, Clone)]
pub struct Collapser {
    pub(crate) edge: Edge,
    pub(crate) pos: f64,
    pub(crate) drawer: NodeId,
    pub(crate) anim: Option<PosAnimation>,
    pub(crate) rect: Rect,
    pub(crate) bar_rect: Rect,
}

impl Collapser {
    pub(crate) fn new(edge: Edge, drawer: NodeId) -> Self {
        Self {
            edge,
            pos: closed_pos(edge),
            drawer,
            anim: None,
            rect: Rect::default(),
            bar_rect: Rect::default(),
        }
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn pos(&self) -> f64 {
        self.pos
    }

    pub fn drawer(&self) -> NodeId {
        self.drawer
    }

    /// Rect of the drawer, tab strip included.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Draggable bar between the drawer and the centre. Empty while closed.
    pub fn bar_rect(&self) -> Rect {
        self.bar_rect
    }

    pub fn is_open(&self) -> bool {
        (self.pos - closed_pos(self.edge)).abs() > f64::EPSILON
    }

    pub fn is_animating(&self) -> bool {
        self.anim.is_some()
    }
}

impl DockNode for Collapser {
    fn parent(&self) -> Option<NodeId> {
        None
    }

    fn set_parent(&mut self, _parent: Option<NodeId>) {}

    fn kind(&self) -> NodeKind {
        NodeKind::Collapser
    }
}

/// The shell between a collapser and its frame.
#[derive(Debug, Clone)]
pub struct Drawer {
    pub(crate) parent: Option<NodeId>,
    pub(crate) frame: NodeId,
}

impl Drawer {
    pub fn frame(&self) -> NodeId {
        self.frame
    }
}

impl DockNode for Drawer {
    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Drawer
    }
}

pub(crate) fn closed_pos(edge: Edge) -> f64 {
    match edge {
        Edge::Left | Edge::Top => 0.0,
        Edge::Right | Edge::Bottom => 1.0,
    }
}

fn open_fraction(edge: Edge, pos: f64) -> f64 {
    match edge {
        Edge::Left | Edge::Top => pos,
        Edge::Right | Edge::Bottom => 1.0 - pos,
    }
    .clamp(0.0, 1.0)
}

/// Drawer thickness along its docking axis for `pos`.
pub(crate) fn drawer_extent(edge: Edge, pos: f64, total: f64, strip: f64) -> f64 {
    let strip = strip.min(total).max(0.0);
    strip + open_fraction(edge, pos) * (total - strip).max(0.0)
}

/// Inverse of [`drawer_extent`].
pub(crate) fn pos_for_extent(edge: Edge, extent: f64, total: f64, strip: f64) -> f64 {
    let room = (total - strip).max(0.0);
    let fraction = if room > 0.0 {
        ((extent - strip) / room).clamp(0.0, 1.0)
    } else {
        0.0
    };
    match edge {
        Edge::Left | Edge::Top => fraction,
        Edge::Right | Edge::Bottom => 1.0 - fraction,
    }
}

/// Carves a drawer and, when it is open, its bar off `area`. The position
/// is measured against `total` so a drawer keeps its size whatever the
/// other drawers take. Returns `(drawer, bar, rest)`.
pub(crate) fn carve(
    area: Rect,
    edge: Edge,
    pos: f64,
    total: f64,
    strip: f64,
    bar: f64,
    snap: bool,
) -> (Rect, Rect, Rect) {
    let mut extent = drawer_extent(edge, pos, total, strip);
    if snap {
        extent = extent.round();
    }
    let (drawer, rest) = area.cut(edge, extent);
    if open_fraction(edge, pos) <= 0.0 {
        let (bar_rect, _) = rest.cut(edge, 0.0);
        return (drawer, bar_rect, rest);
    }
    let (bar_rect, rest) = rest.cut(edge, bar);
    (drawer, bar_rect, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_drawer_keeps_its_strip() {
        let area = Rect::new(0.0, 0.0, 100.0, 40.0);
        let (drawer, bar, rest) = carve(area, Edge::Left, 0.0, 100.0, 2.0, 1.0, true);
        assert_eq!(drawer, Rect::new(0.0, 0.0, 2.0, 40.0));
        assert!(bar.is_empty());
        assert_eq!(rest, Rect::new(2.0, 0.0, 98.0, 40.0));
    }

    #[test]
    fn right_and_bottom_open_towards_zero() {
        let area = Rect::new(0.0, 0.0, 102.0, 40.0);
        let (drawer, bar, rest) = carve(area, Edge::Right, 0.5, 102.0, 2.0, 1.0, true);
        assert_eq!(drawer, Rect::new(50.0, 0.0, 52.0, 40.0));
        assert_eq!(bar, Rect::new(49.0, 0.0, 1.0, 40.0));
        assert_eq!(rest.width, 49.0);
        assert_eq!(closed_pos(Edge::Bottom), 1.0);
    }

    #[test]
    fn extent_and_pos_are_inverse() {
        for edge in [Edge::Left, Edge::Right, Edge::Bottom] {
            let pos = pos_for_extent(edge, 30.0, 120.0, 4.0);
            assert!((drawer_extent(edge, pos, 120.0, 4.0) - 30.0).abs() < 1e-9);
        }
    }
}

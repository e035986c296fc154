//! Drop-zone detection for drags.
//!
//! [`detect_anchor`] decides, for one target rectangle and one pointer
//! position, whether dropping there docks the dragged content and how. It
//! does not touch the tree; the ghost and the docker feed it plain data.
//!
//! Zones are tested in a fixed order and the first match wins, which also
//! settles every corner where two bands overlap:
//!
//! 1. the title band along the top edge (stack, tabs on top),
//! 2. title bands along the other three edges (stack, re-oriented tabs),
//! 3. bands along the outer edges of the docking surface (split the root),
//! 4. nothing further if the target may not be split,
//! 5. placeholder targets (split above the placeholder),
//! 6. interior bands, ordered by the target's aspect ratio.

use super::{DockLocation, Edge, Point, Rect};
use crate::config::Measure;
use crate::constants::ANCHOR_SPLIT_FRACTION;

/// What a drop splits or stacks into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorTarget<Id> {
    Frame(Id),
    /// The whole docked tree.
    Root,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor<Id> {
    /// Area highlighted by the ghost.
    pub rect: Rect,
    pub location: DockLocation,
    /// Set for stacked anchors: the edge the target's tabs will sit on.
    pub tab_orientation: Option<Edge>,
    pub target: AnchorTarget<Id>,
    /// A stacked anchor on the strip the drag started from.
    pub is_self_reference: bool,
}

/// Settings shared by every target tested during one pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorContext {
    /// The docking area the outer edge bands belong to.
    pub surface: Rect,
    pub title_height: f64,
    pub edge_anchor: Measure,
    pub panel_anchor: Measure,
    pub can_orient_tabs: bool,
}

/// One frame as seen by the anchor test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget<Id> {
    pub id: Id,
    /// Outer rect, title strip included.
    pub rect: Rect,
    pub has_title: bool,
    /// `Some(orientation)` when this is the frame the drag started from.
    pub same: Option<Edge>,
    pub can_split: bool,
    /// The whole frame is dragged, not a single tab.
    pub is_topper: bool,
    /// Whether the surface edge bands may split the root from here.
    pub allow_edges: bool,
    pub is_placeholder: bool,
}

fn inside(rect: Rect, point: Point) -> bool {
    point.x >= rect.x && point.x <= rect.right() && point.y >= rect.y && point.y <= rect.bottom()
}

fn split_anchor<Id>(
    area: Rect,
    edge: Edge,
    target: AnchorTarget<Id>,
) -> Anchor<Id> {
    let extent = area.extent(edge.axis()) * ANCHOR_SPLIT_FRACTION;
    let location = match edge {
        Edge::Top => DockLocation::Top,
        Edge::Bottom => DockLocation::Bottom,
        Edge::Left => DockLocation::Left,
        Edge::Right => DockLocation::Right,
    };
    Anchor {
        rect: area.cut(edge, extent).0,
        location,
        tab_orientation: None,
        target,
        is_self_reference: false,
    }
}

pub fn detect_anchor<Id: Copy>(
    ctx: &AnchorContext,
    target: &DropTarget<Id>,
    mouse: Point,
) -> Option<Anchor<Id>> {
    let rect = target.rect;
    if rect.is_empty() || !inside(rect, mouse) {
        return None;
    }

    let title = ctx.title_height;
    let skip_titles = target.is_topper && target.same.is_some();
    if target.has_title && !skip_titles {
        let mut edges = vec![Edge::Top];
        if ctx.can_orient_tabs {
            edges.extend([Edge::Bottom, Edge::Left, Edge::Right]);
        }
        for edge in edges {
            if inside(rect.cut(edge, title).0, mouse) {
                return Some(Anchor {
                    rect,
                    location: DockLocation::Stacked,
                    tab_orientation: Some(edge),
                    target: AnchorTarget::Frame(target.id),
                    is_self_reference: target.same == Some(edge),
                });
            }
        }
    }

    if target.allow_edges && !ctx.surface.is_empty() {
        let surface = ctx.surface;
        for edge in [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right] {
            let band = ctx.edge_anchor.resolve(surface.extent(edge.axis()));
            if band > 0.0 && inside(surface.cut(edge, band).0, mouse) {
                return Some(split_anchor(surface, edge, AnchorTarget::Root));
            }
        }
    }

    if !target.can_split {
        return None;
    }

    if target.is_placeholder {
        return Some(Anchor {
            rect,
            location: DockLocation::Top,
            tab_orientation: None,
            target: AnchorTarget::Frame(target.id),
            is_self_reference: false,
        });
    }

    let across = ctx.panel_anchor.resolve(rect.width) + title;
    let down = ctx.panel_anchor.resolve(rect.height) + title;
    let vertical = [(Edge::Top, down), (Edge::Bottom, down)];
    let horizontal = [(Edge::Left, across), (Edge::Right, across)];
    let order = if rect.width < rect.height {
        [vertical, horizontal]
    } else {
        [horizontal, vertical]
    };
    order
        .into_iter()
        .flatten()
        .find(|(edge, band)| inside(rect.cut(*edge, *band).0, mouse))
        .map(|(edge, _)| split_anchor(rect, edge, AnchorTarget::Frame(target.id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> AnchorContext {
        AnchorContext {
            surface: Rect::new(0.0, 0.0, 1000.0, 800.0),
            title_height: 24.0,
            edge_anchor: Measure::Pixels(50.0),
            panel_anchor: Measure::Percent(15.0),
            can_orient_tabs: true,
        }
    }

    fn target(rect: Rect) -> DropTarget<u32> {
        DropTarget {
            id: 7,
            rect,
            has_title: true,
            same: None,
            can_split: true,
            is_topper: false,
            allow_edges: false,
            is_placeholder: false,
        }
    }

    #[test]
    fn wide_target_prefers_left_band_over_top_band() {
        let t = target(Rect::new(200.0, 200.0, 400.0, 100.0));
        // Inside both the left band (84 wide) and the top band (39 tall).
        let anchor = detect_anchor(&ctx(), &t, Point::new(240.0, 230.0)).expect("anchor");
        assert_eq!(anchor.location, DockLocation::Left);
        assert_eq!(anchor.rect, Rect::new(200.0, 200.0, 200.0, 100.0));
        assert_eq!(anchor.target, AnchorTarget::Frame(7));
    }

    #[test]
    fn tall_target_prefers_top_band() {
        let t = target(Rect::new(200.0, 200.0, 100.0, 400.0));
        let anchor = detect_anchor(&ctx(), &t, Point::new(230.0, 240.0)).expect("anchor");
        assert_eq!(anchor.location, DockLocation::Top);
        assert_eq!(anchor.rect.height, 200.0);
    }

    #[test]
    fn title_band_stacks() {
        let t = target(Rect::new(200.0, 200.0, 400.0, 100.0));
        let anchor = detect_anchor(&ctx(), &t, Point::new(400.0, 210.0)).expect("anchor");
        assert_eq!(anchor.location, DockLocation::Stacked);
        assert_eq!(anchor.tab_orientation, Some(Edge::Top));
        assert!(!anchor.is_self_reference);
    }

    #[test]
    fn side_title_bands_need_orientable_tabs() {
        let t = target(Rect::new(200.0, 200.0, 400.0, 100.0));
        let point = Point::new(205.0, 250.0);
        let anchor = detect_anchor(&ctx(), &t, point).expect("anchor");
        assert_eq!(anchor.tab_orientation, Some(Edge::Left));

        let locked = AnchorContext {
            can_orient_tabs: false,
            ..ctx()
        };
        let anchor = detect_anchor(&locked, &t, point).expect("anchor");
        assert_eq!(anchor.location, DockLocation::Left);
    }

    #[test]
    fn own_strip_is_a_self_reference() {
        let mut t = target(Rect::new(200.0, 200.0, 400.0, 100.0));
        t.same = Some(Edge::Top);
        let anchor = detect_anchor(&ctx(), &t, Point::new(400.0, 210.0)).expect("anchor");
        assert!(anchor.is_self_reference);

        t.is_topper = true;
        let anchor = detect_anchor(&ctx(), &t, Point::new(400.0, 210.0)).expect("anchor");
        assert_eq!(anchor.location, DockLocation::Top);
    }

    #[test]
    fn surface_edges_split_the_root() {
        let mut t = target(Rect::new(0.0, 0.0, 500.0, 800.0));
        t.allow_edges = true;
        let anchor = detect_anchor(&ctx(), &t, Point::new(30.0, 400.0)).expect("anchor");
        assert_eq!(anchor.target, AnchorTarget::Root);
        assert_eq!(anchor.location, DockLocation::Left);
        assert_eq!(anchor.rect, Rect::new(0.0, 0.0, 500.0, 800.0));
    }

    #[test]
    fn edge_band_percent_resolves_against_surface() {
        let mut t = target(Rect::new(0.0, 0.0, 1000.0, 800.0));
        t.allow_edges = true;
        let c = AnchorContext {
            edge_anchor: Measure::Percent(10.0),
            ..ctx()
        };
        let anchor = detect_anchor(&c, &t, Point::new(950.0, 400.0)).expect("anchor");
        assert_eq!(anchor.location, DockLocation::Right);
        assert_eq!(anchor.target, AnchorTarget::Root);
    }

    #[test]
    fn unsplittable_target_only_stacks() {
        let mut t = target(Rect::new(200.0, 200.0, 400.0, 100.0));
        t.can_split = false;
        assert!(detect_anchor(&ctx(), &t, Point::new(240.0, 250.0)).is_none());
        assert!(detect_anchor(&ctx(), &t, Point::new(400.0, 210.0)).is_some());
    }

    #[test]
    fn placeholder_always_splits_top() {
        let mut t = target(Rect::new(0.0, 0.0, 400.0, 400.0));
        t.is_placeholder = true;
        t.has_title = false;
        let anchor = detect_anchor(&ctx(), &t, Point::new(380.0, 380.0)).expect("anchor");
        assert_eq!(anchor.location, DockLocation::Top);
        assert_eq!(anchor.rect, t.rect);
    }

    #[test]
    fn centre_and_outside_yield_nothing() {
        let t = target(Rect::new(200.0, 200.0, 400.0, 100.0));
        assert!(detect_anchor(&ctx(), &t, Point::new(400.0, 250.0)).is_none());
        assert!(detect_anchor(&ctx(), &t, Point::new(50.0, 50.0)).is_none());
    }
}

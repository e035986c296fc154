//! Pointer handling and the drag state machine.
//!
//! At most one [`DragSession`] is live at a time. `mouse_down` decides what
//! the pointer grabbed, `mouse_move` drives it and `mouse_up` commits it.
//! `escape` puts back everything the session changed so far.

use std::time::Instant;

use super::collapser::pos_for_extent;
use super::custom_tabs::TabWidget;
use super::docker::{DockTarget, Docker};
use super::events::{EventPayload, EventType};
use super::frame::{FrameButton, FrameHit};
use super::ghost::Ghost;
use super::panel::{LayoutItem, PanelOptions};
use super::{DockLocation, NodeId, NodeKind};
use crate::layout::floating::{ResizeEdge, apply_resize_drag};
use crate::layout::splitter::position_at;
use crate::layout::tabs::{TabStrip, TabStripRequest, layout_tabs};
use crate::layout::{AnchorContext, AnchorTarget, DropTarget, Edge, Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// A splitter or drawer bar.
    Splitter,
    /// A floating frame's resize grip.
    Sizer,
    /// A tab, or a whole frame by its title.
    Frame,
    CustomTab,
    CreatePanel,
}

#[derive(Debug, Clone)]
pub(crate) struct FrameDrag {
    frame: NodeId,
    /// The grabbed tab's panel. For a whole-frame drag, the current panel.
    panel: NodeId,
    is_topper: bool,
    start_mouse: Point,
    started_at: Instant,
    start_rect: Rect,
    floating: bool,
    ghost: Option<Ghost>,
    moved: bool,
    original_order: Vec<NodeId>,
    original_current: Option<usize>,
}

#[derive(Debug, Clone)]
pub(crate) enum DragSession {
    Splitter {
        id: NodeId,
        start_pos: f64,
    },
    Sizer {
        frame: NodeId,
        edge: ResizeEdge,
        start_rect: Rect,
        start_mouse: Point,
    },
    Frame(FrameDrag),
    CustomTab {
        panel: NodeId,
        item: usize,
        index: usize,
        original: TabWidget,
    },
    CreatePanel {
        type_name: String,
        ghost: Ghost,
    },
}

impl DragSession {
    fn mode(&self) -> DragMode {
        match self {
            DragSession::Splitter { .. } => DragMode::Splitter,
            DragSession::Sizer { .. } => DragMode::Sizer,
            DragSession::Frame(_) => DragMode::Frame,
            DragSession::CustomTab { .. } => DragMode::CustomTab,
            DragSession::CreatePanel { .. } => DragMode::CreatePanel,
        }
    }
}

impl Docker {
    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag.as_ref().map(DragSession::mode)
    }

    /// The drop preview of the running drag, if it shows one.
    pub fn ghost(&self) -> Option<&Ghost> {
        match self.drag.as_ref()? {
            DragSession::Frame(drag) => drag.ghost.as_ref(),
            DragSession::CreatePanel { ghost, .. } => Some(ghost),
            _ => None,
        }
    }

    pub(crate) fn ghost_mut(&mut self) -> Option<&mut Ghost> {
        match self.drag.as_mut()? {
            DragSession::Frame(drag) => drag.ghost.as_mut(),
            DragSession::CreatePanel { ghost, .. } => Some(ghost),
            _ => None,
        }
    }

    pub(crate) fn anchor_context(&self) -> AnchorContext {
        AnchorContext {
            surface: self.center,
            title_height: self.options.title_height,
            edge_anchor: self.options.edge_anchor_size,
            panel_anchor: self.options.panel_anchor_size,
            can_orient_tabs: self.options.can_orient_tabs,
        }
    }

    /// Tab strip of the custom tab widget at grid item `item` of `panel`.
    pub fn custom_tab_strip(&self, panel: NodeId, item: usize) -> Option<TabStrip> {
        let p = self.arena.panel(panel)?;
        let widget = p.tab_widget(item)?;
        let cell = *p.layout.cell_rects(p.rect, 0.0).get(item)?;
        let metrics = &self.options.tab_metrics;
        let lengths: Vec<f64> = widget.titles().map(|t| metrics.tab_length(t)).collect();
        Some(layout_tabs(
            TabStripRequest {
                strip: cell.cut(Edge::Top, self.options.title_height).0,
                edge: Edge::Top,
                lengths: &lengths,
                current: widget.current(),
                offset: widget.offset,
                reveal_current: true,
                reserved: 0.0,
                buffer: self.options.tab_scroll_buffer,
            },
            metrics,
        ))
    }

    fn custom_tab_at(&self, panel: NodeId, point: Point) -> Option<(usize, usize)> {
        let p = self.arena.panel(panel)?;
        p.layout
            .items()
            .iter()
            .enumerate()
            .filter(|(_, item)| matches!(item.content, LayoutItem::Tabs(_)))
            .find_map(|(item, _)| {
                let strip = self.custom_tab_strip(panel, item)?;
                strip.tab_at(point.x, point.y).map(|index| (item, index))
            })
    }

    /// The frame drawn on top at `point`.
    pub fn frame_at(&self, point: Point) -> Option<NodeId> {
        let contains = |id: &NodeId| self.arena.frame(*id).is_some_and(|f| f.rect.contains(point));
        if let Some(frame) = self.floating.iter().rev().find(|id| contains(*id)) {
            return Some(*frame);
        }
        self.collapsers
            .keys()
            .filter_map(|edge| self.drawer_frame(*edge))
            .chain(self.docked_frames())
            .find(contains)
    }

    fn has_modal(&self) -> bool {
        self.floating
            .iter()
            .any(|id| self.arena.frame(*id).is_some_and(|f| f.modal))
    }

    fn bar_at(&self, point: Point) -> Option<NodeId> {
        if let Some(id) = self.collapsers.values().find(|id| {
            self.arena
                .collapser(**id)
                .is_some_and(|c| c.bar_rect.contains(point))
        }) {
            return Some(*id);
        }
        let mut splitters = Vec::new();
        self.splitters_under(self.root, &mut splitters);
        splitters.into_iter().find(|id| {
            self.arena
                .splitter(*id)
                .is_some_and(|s| !s.is_static && s.bar_rect.contains(point))
        })
    }

    /// Handles a button press. Returns whether anything took it.
    pub fn mouse_down(&mut self, point: Point, button: MouseButton, now: Instant) -> bool {
        if self.drag.is_some() {
            return true;
        }
        let top_floating = self.floating.iter().rev().copied().find(|id| {
            self.arena
                .frame(*id)
                .is_some_and(|f| f.rect.contains(point))
        });
        if self.has_modal() {
            return match top_floating {
                Some(frame) if self.arena.frame(frame).is_some_and(|f| f.modal) => {
                    self.press_frame(frame, point, button, now)
                }
                _ => false,
            };
        }
        if let Some(frame) = top_floating {
            return self.press_frame(frame, point, button, now);
        }
        if button == MouseButton::Left
            && let Some(bar) = self.bar_at(point)
        {
            self.begin_bar_drag(bar);
            return true;
        }
        match self.frame_at(point) {
            Some(frame) => self.press_frame(frame, point, button, now),
            None => false,
        }
    }

    fn begin_bar_drag(&mut self, id: NodeId) {
        let start_pos = match self.arena.kind(id) {
            Some(NodeKind::Splitter) => self.arena.splitter(id).map(|s| s.pos),
            Some(NodeKind::Collapser) => self.arena.collapser(id).map(|c| c.pos),
            _ => None,
        };
        let Some(start_pos) = start_pos else {
            return;
        };
        for panel in self.panels_under(id) {
            self.fire_simple(panel, EventType::ResizeStarted);
        }
        tracing::debug!(bar = %id, start_pos, "bar drag started");
        self.drag = Some(DragSession::Splitter { id, start_pos });
    }

    fn press_frame(
        &mut self,
        frame: NodeId,
        point: Point,
        button: MouseButton,
        now: Instant,
    ) -> bool {
        let Some(f) = self.arena.frame(frame) else {
            return false;
        };
        let Some(hit) = f.hit(point) else {
            return false;
        };
        let floating = f.floating;
        let is_drawer = f.drawer.is_some();
        let current = f.current_panel();
        let panels = f.panels.clone();
        let float_rect = f.float_rect;
        let left = button == MouseButton::Left;

        match hit {
            FrameHit::Sizer(edge) => {
                self.focus_frame(frame);
                if floating && left {
                    for panel in panels {
                        self.fire_simple(panel, EventType::ResizeStarted);
                    }
                    self.drag = Some(DragSession::Sizer {
                        frame,
                        edge,
                        start_rect: float_rect,
                        start_mouse: point,
                    });
                }
            }
            FrameHit::Tab(index) => {
                let Some(panel) = panels.get(index).copied() else {
                    return true;
                };
                if button == MouseButton::Middle {
                    if self.arena.panel(panel).is_some_and(|p| p.closeable) {
                        self.remove_panel(panel, false);
                    }
                    return true;
                }
                self.set_current_tab(frame, Some(index), true).ok();
                if left {
                    self.begin_frame_drag(frame, panel, false, point, now);
                }
            }
            FrameHit::Title => {
                self.focus_frame(frame);
                if left
                    && !is_drawer
                    && let Some(panel) = current
                {
                    self.begin_frame_drag(frame, panel, true, point, now);
                }
            }
            FrameHit::Button(FrameButton::Close) => {
                if let Some(panel) = current {
                    self.remove_panel(panel, false);
                }
            }
            FrameHit::Button(FrameButton::Custom(name)) => {
                if let Some(panel) = current {
                    self.click_button(panel, &name);
                }
            }
            FrameHit::ScrollBack => self.scroll_frame_tabs(frame, -1.0),
            FrameHit::ScrollForward => self.scroll_frame_tabs(frame, 1.0),
            FrameHit::Content => {
                self.focus_frame(frame);
                if let Some(panel) = current
                    && let Some((item, index)) = self.custom_tab_at(panel, point)
                {
                    if button == MouseButton::Middle {
                        self.close_custom_tab(panel, item, index);
                        return true;
                    }
                    self.select_custom_tab(panel, item, index);
                    let widget = self
                        .arena
                        .panel(panel)
                        .and_then(|p| p.tab_widget(item))
                        .cloned();
                    if left && let Some(original) = widget {
                        self.drag = Some(DragSession::CustomTab {
                            panel,
                            item,
                            index,
                            original,
                        });
                    }
                }
            }
        }
        true
    }

    fn begin_frame_drag(
        &mut self,
        frame: NodeId,
        panel: NodeId,
        is_topper: bool,
        point: Point,
        now: Instant,
    ) {
        if !self.arena.panel(panel).is_some_and(|p| p.moveable) {
            return;
        }
        let Some(f) = self.arena.frame(frame) else {
            return;
        };
        self.drag = Some(DragSession::Frame(FrameDrag {
            frame,
            panel,
            is_topper,
            start_mouse: point,
            started_at: now,
            start_rect: f.float_rect,
            floating: f.floating,
            ghost: None,
            moved: false,
            original_order: f.panels.clone(),
            original_current: f.current,
        }));
        tracing::debug!(frame = %frame, panel = %panel, is_topper, "frame drag armed");
    }

    /// Starts placing a new panel of `type_name` with the pointer. The panel
    /// is created on `mouse_up`.
    pub fn begin_panel_creation(&mut self, type_name: &str, now: Instant) -> bool {
        if self.drag.is_some() || !self.registry.contains_key(type_name) {
            return false;
        }
        let float_size = self.default_float_size();
        let mut ghost = Ghost::new(
            Rect::from_center(self.center.center(), float_size),
            float_size,
            self.options.ghost_tween,
        );
        ghost.anchor(self.center.center(), None, now);
        self.drag = Some(DragSession::CreatePanel {
            type_name: type_name.to_string(),
            ghost,
        });
        self.broadcast(EventType::BeginDock);
        tracing::debug!(panel_type = type_name, "panel creation started");
        true
    }

    pub fn mouse_move(&mut self, point: Point, now: Instant) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        let session = match session {
            DragSession::Splitter { id, start_pos } => {
                self.drag_bar(id, point);
                DragSession::Splitter { id, start_pos }
            }
            DragSession::Sizer {
                frame,
                edge,
                start_rect,
                start_mouse,
            } => {
                self.drag_sizer(frame, edge, start_rect, start_mouse, point);
                DragSession::Sizer {
                    frame,
                    edge,
                    start_rect,
                    start_mouse,
                }
            }
            DragSession::Frame(drag) => DragSession::Frame(self.drag_frame(drag, point, now)),
            DragSession::CustomTab {
                panel,
                item,
                index,
                original,
            } => DragSession::CustomTab {
                panel,
                item,
                index: self.drag_custom_tab(panel, item, index, point),
                original,
            },
            DragSession::CreatePanel {
                type_name,
                mut ghost,
            } => {
                let targets = self.drop_targets(None);
                let ctx = self.anchor_context();
                ghost.update(point, &targets, &ctx, !self.options.allow_floating, now);
                DragSession::CreatePanel { type_name, ghost }
            }
        };
        self.drag = Some(session);
        true
    }

    fn drag_bar(&mut self, id: NodeId, point: Point) {
        if let Some(splitter) = self.arena.splitter(id) {
            let orientation = splitter.orientation;
            let pos = position_at(
                splitter.rect,
                orientation,
                self.options.splitter_bar_size,
                point.along(orientation),
            );
            self.set_splitter_pos(id, pos).ok();
            return;
        }
        let Some(collapser) = self.arena.collapser(id) else {
            return;
        };
        let edge = collapser.edge;
        let surface = self.surface;
        let half_bar = self.options.splitter_bar_size / 2.0;
        let extent = match edge {
            Edge::Left => point.x - surface.x,
            Edge::Right => surface.right() - point.x,
            Edge::Top => point.y - surface.y,
            Edge::Bottom => surface.bottom() - point.y,
        } - half_bar;
        let title = self.options.title_height;
        let extent = extent.max(title + 1.0);
        let pos = pos_for_extent(edge, extent, surface.extent(edge.axis()), title);
        if let Some(collapser) = self.arena.collapser_mut(id) {
            collapser.anim = None;
            collapser.pos = pos;
        }
        self.update();
    }

    fn drag_sizer(
        &mut self,
        frame: NodeId,
        edge: ResizeEdge,
        start_rect: Rect,
        start_mouse: Point,
        point: Point,
    ) {
        let chrome = 2.0 * self.options.sizer_size;
        let min = self.node_min_size(frame);
        let max = self.node_max_size(frame);
        let min = Size::new(min.width + chrome, min.height + chrome);
        let max = Size::new(max.width + chrome, max.height + chrome);
        let rect = apply_resize_drag(
            start_rect,
            edge,
            start_mouse,
            point,
            min,
            max,
            self.surface,
            false,
        );
        if let Some(f) = self.arena.frame_mut(frame) {
            f.float_rect = rect;
        }
        self.mark_dirty();
    }

    fn drag_custom_tab(&mut self, panel: NodeId, item: usize, index: usize, point: Point) -> usize {
        let Some(to) = self
            .custom_tab_strip(panel, item)
            .and_then(|strip| strip.tab_at(point.x, point.y))
        else {
            return index;
        };
        if to == index {
            return index;
        }
        let moved = self
            .arena
            .panel_mut(panel)
            .and_then(|p| p.tab_widget_mut(item))
            .is_some_and(|widget| widget.move_tab(index, to));
        if !moved {
            return index;
        }
        self.fire(
            panel,
            EventType::OrderChanged,
            &mut EventPayload::Order { from: index, to },
        );
        self.mark_dirty();
        to
    }

    fn drag_frame(&mut self, mut drag: FrameDrag, point: Point, now: Instant) -> FrameDrag {
        let floating_topper = drag.is_topper && drag.floating;
        if floating_topper {
            let rect = Rect {
                x: drag.start_rect.x + point.x - drag.start_mouse.x,
                y: drag.start_rect.y + point.y - drag.start_mouse.y,
                ..drag.start_rect
            };
            if let Some(f) = self.arena.frame_mut(drag.frame) {
                f.float_rect = rect;
            }
            self.mark_dirty();
        }

        if !drag.moved {
            if point == drag.start_mouse
                || now.saturating_duration_since(drag.started_at) < self.options.move_start_delay
            {
                return drag;
            }
            drag.moved = true;
            let frame_rect = self
                .arena
                .frame(drag.frame)
                .map(|f| f.rect)
                .unwrap_or_default();
            let float_size = if drag.floating {
                frame_rect.size()
            } else if frame_rect.is_empty() {
                self.default_float_size()
            } else {
                frame_rect.size().min(self.default_float_size())
            };
            drag.ghost = Some(Ghost::new(frame_rect, float_size, self.options.ghost_tween));
            self.fire_simple(drag.panel, EventType::MoveStarted);
            self.broadcast(EventType::BeginDock);
            tracing::debug!(frame = %drag.frame, panel = %drag.panel, "frame drag started");
        }

        let targets = self.drop_targets(Some(&drag));
        let ctx = self.anchor_context();
        let disable_floating = floating_topper || !self.options.allow_floating;
        let anchor = drag.ghost.as_mut().and_then(|ghost| {
            ghost
                .update(point, &targets, &ctx, disable_floating, now)
                .copied()
        });

        if let Some(anchor) = anchor
            && anchor.is_self_reference
            && !drag.is_topper
        {
            self.reorder_under_pointer(&drag, point);
        }
        drag
    }

    /// Live tab reordering while a tab is dragged along its own strip.
    fn reorder_under_pointer(&mut self, drag: &FrameDrag, point: Point) {
        let Some(f) = self.arena.frame(drag.frame) else {
            return;
        };
        let (Some(to), Some(from)) = (f.strip.tab_at(point.x, point.y), f.index_of(drag.panel))
        else {
            return;
        };
        if from != to {
            self.reorder_tab(drag.frame, from, to).ok();
        }
    }

    /// Frames a drag can drop onto, in priority order: the source frame,
    /// floating frames front to back, docked frames, drawer frames.
    fn drop_targets(&self, drag: Option<&FrameDrag>) -> Vec<DropTarget<NodeId>> {
        let is_topper = drag.is_some_and(|d| d.is_topper);
        let source = drag.map(|d| d.frame);
        let target = |id: NodeId, can_split: bool, allow_edges: bool| {
            let f = self.arena.frame(id)?;
            let is_placeholder = matches!(
                f.panels.as_slice(),
                [only] if self.arena.panel(*only).is_some_and(|p| p.placeholder)
            );
            Some(DropTarget {
                id,
                rect: f.rect,
                has_title: f.has_title,
                same: None,
                can_split,
                is_topper,
                allow_edges,
                is_placeholder,
            })
        };

        let mut targets = Vec::new();
        if let Some(drag) = drag
            && !(drag.is_topper && drag.floating)
            && let Some(f) = self.arena.frame(drag.frame)
        {
            let docked = !f.floating && f.drawer.is_none();
            let can_split = docked && !drag.is_topper && f.panels.len() > 1;
            let same = self.frame_orientation(f);
            if let Some(mut t) = target(drag.frame, can_split, docked) {
                t.same = Some(same);
                targets.push(t);
            }
        }
        let others = |id: &NodeId| Some(*id) != source;
        targets.extend(
            self.floating
                .iter()
                .rev()
                .filter(|id| others(*id))
                .filter_map(|id| target(*id, false, false)),
        );
        targets.extend(
            self.docked_frames()
                .iter()
                .filter(|id| others(*id))
                .filter_map(|id| target(*id, true, true)),
        );
        targets.extend(
            self.collapsers
                .keys()
                .filter_map(|edge| self.drawer_frame(*edge))
                .filter(|id| others(id))
                .filter_map(|id| target(id, false, false)),
        );
        targets
    }

    /// Ends the running drag at `point` and commits it.
    pub fn mouse_up(&mut self, point: Point, now: Instant) -> bool {
        if !self.mouse_move(point, now) {
            return false;
        }
        let Some(session) = self.drag.take() else {
            return false;
        };
        match session {
            DragSession::Splitter { id, .. } => {
                for panel in self.panels_under(id) {
                    self.fire_simple(panel, EventType::ResizeEnded);
                }
            }
            DragSession::Sizer { frame, .. } => {
                for panel in self.panels_under(frame) {
                    self.fire_simple(panel, EventType::ResizeEnded);
                }
            }
            DragSession::Frame(drag) => self.commit_frame_drag(drag),
            DragSession::CustomTab { .. } => {}
            DragSession::CreatePanel { type_name, ghost } => {
                self.commit_creation(&type_name, &ghost, point);
            }
        }
        self.mark_dirty();
        true
    }

    fn anchor_placement(target: AnchorTarget<NodeId>) -> DockTarget {
        match target {
            AnchorTarget::Frame(frame) => DockTarget::Frame(frame),
            AnchorTarget::Root => DockTarget::Auto,
        }
    }

    fn commit_creation(&mut self, type_name: &str, ghost: &Ghost, point: Point) {
        let result = match ghost.current_anchor().copied() {
            Some(anchor) => self.add_panel(
                type_name,
                anchor.location,
                Self::anchor_placement(anchor.target),
                PanelOptions::default(),
            ),
            None if ghost.is_visible() => {
                let rect = ghost.target_rect();
                self.add_panel(
                    type_name,
                    DockLocation::Float,
                    DockTarget::Auto,
                    PanelOptions {
                        size: Some(rect.size()),
                        position: Some(rect.origin()),
                        ..PanelOptions::default()
                    },
                )
            }
            None => {
                self.broadcast(EventType::EndDock);
                return;
            }
        };
        match result {
            Ok(panel) => tracing::debug!(panel = %panel, ?point, "created panel by drag"),
            Err(err) => tracing::warn!(%err, panel_type = type_name, "panel creation failed"),
        }
        self.broadcast(EventType::EndDock);
    }

    fn commit_frame_drag(&mut self, drag: FrameDrag) {
        if !drag.moved {
            return;
        }
        let anchor = drag.ghost.as_ref().and_then(|g| g.current_anchor().copied());
        let ghost_visible = drag.ghost.as_ref().is_some_and(Ghost::is_visible);
        let group: Vec<NodeId> = if drag.is_topper {
            self.arena
                .frame(drag.frame)
                .map(|f| f.panels.clone())
                .unwrap_or_default()
        } else {
            vec![drag.panel]
        };

        match anchor {
            Some(anchor) if anchor.is_self_reference => {}
            Some(anchor) => {
                let target = Self::anchor_placement(anchor.target);
                self.move_group(&group, drag.panel, anchor.location, target, PanelOptions::default());
                if anchor.location == DockLocation::Stacked
                    && let AnchorTarget::Frame(frame) = anchor.target
                    && let Some(edge) = anchor.tab_orientation
                {
                    self.set_tab_orientation(frame, edge).ok();
                }
            }
            None if ghost_visible && !(drag.is_topper && drag.floating) => {
                let rect = drag.ghost.as_ref().map(Ghost::target_rect).unwrap_or_default();
                self.move_group(
                    &group,
                    drag.panel,
                    DockLocation::Float,
                    DockTarget::Auto,
                    PanelOptions {
                        size: Some(rect.size()),
                        position: Some(rect.origin()),
                        ..PanelOptions::default()
                    },
                );
            }
            None => {}
        }
        self.fire_simple(drag.panel, EventType::MoveEnded);
        self.broadcast(EventType::EndDock);
        tracing::debug!(panel = %drag.panel, ?anchor, "frame drag committed");
    }

    /// Moves `group` together: the first panel takes the placement, the rest
    /// stack onto it and `selected` ends up current.
    fn move_group(
        &mut self,
        group: &[NodeId],
        selected: NodeId,
        location: DockLocation,
        target: DockTarget,
        options: PanelOptions,
    ) {
        let Some((first, rest)) = group.split_first() else {
            return;
        };
        if !self.move_panel(*first, location, target, options) {
            return;
        }
        let Some(frame) = self.frame_of(*first) else {
            return;
        };
        for panel in rest {
            self.move_panel(
                *panel,
                DockLocation::Stacked,
                DockTarget::Frame(frame),
                PanelOptions::default(),
            );
        }
        let index = self.arena.frame(frame).and_then(|f| f.index_of(selected));
        if let Some(f) = self.arena.frame_mut(frame) {
            f.set_current(index);
        }
    }

    /// Cancels the running drag and restores what it changed.
    pub fn escape(&mut self) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        match session {
            DragSession::Splitter { id, start_pos } => {
                if let Some(splitter) = self.arena.splitter_mut(id) {
                    splitter.pos = start_pos;
                } else if let Some(collapser) = self.arena.collapser_mut(id) {
                    collapser.pos = start_pos;
                }
                for panel in self.panels_under(id) {
                    self.fire_simple(panel, EventType::ResizeEnded);
                }
            }
            DragSession::Sizer {
                frame, start_rect, ..
            } => {
                if let Some(f) = self.arena.frame_mut(frame) {
                    f.float_rect = start_rect;
                }
                for panel in self.panels_under(frame) {
                    self.fire_simple(panel, EventType::ResizeEnded);
                }
            }
            DragSession::Frame(drag) => {
                if let Some(f) = self.arena.frame_mut(drag.frame) {
                    if drag.is_topper && drag.floating {
                        f.float_rect = drag.start_rect;
                    }
                    let mut sorted = f.panels.clone();
                    let mut original = drag.original_order.clone();
                    sorted.sort();
                    original.sort();
                    if sorted == original {
                        f.panels = drag.original_order;
                        f.current = drag.original_current;
                    }
                }
                if drag.moved {
                    self.fire_simple(drag.panel, EventType::MoveEnded);
                    self.broadcast(EventType::EndDock);
                }
            }
            DragSession::CustomTab {
                panel,
                item,
                original,
                ..
            } => {
                if let Some(widget) = self
                    .arena
                    .panel_mut(panel)
                    .and_then(|p| p.tab_widget_mut(item))
                {
                    *widget = original;
                }
            }
            DragSession::CreatePanel { .. } => self.broadcast(EventType::EndDock),
        }
        tracing::debug!("drag cancelled");
        self.update();
        true
    }

    /// Scrolls a tab strip by `steps` minimum tab lengths.
    fn scroll_frame_tabs(&mut self, frame: NodeId, steps: f64) {
        let delta = steps * self.options.tab_metrics.min_length;
        if let Some(f) = self.arena.frame_mut(frame) {
            f.scroll_tabs(delta);
        }
        self.mark_dirty();
    }

    /// Wheel input: scrolls a tab strip when over one, the panel otherwise.
    pub fn mouse_scroll(&mut self, point: Point, delta: Point) -> bool {
        let Some(frame) = self.frame_at(point) else {
            return false;
        };
        let Some(f) = self.arena.frame(frame) else {
            return false;
        };
        let current = f.current_panel();
        match f.hit(point) {
            Some(FrameHit::Content) => {
                let Some(panel) = current else {
                    return false;
                };
                let Some(scroll) = self.arena.panel(panel).map(|p| p.scroll) else {
                    return false;
                };
                self.scroll_panel(
                    panel,
                    Point::new((scroll.x + delta.x).max(0.0), (scroll.y + delta.y).max(0.0)),
                )
            }
            Some(_) => {
                self.scroll_frame_tabs(frame, delta.y);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::DockerOptions;
    use crate::dock::PanelType;

    fn docker() -> Docker {
        let mut options = DockerOptions::terminal();
        options.move_start_delay = Duration::ZERO;
        options.ghost_tween = Duration::ZERO;
        let mut docker = Docker::new(options);
        docker.register_panel_type("notes", PanelType::new(|_, _| Box::new(())));
        docker.resize_surface(Rect::new(0.0, 0.0, 100.0, 40.0));
        docker
    }

    #[test]
    fn dragging_a_bar_moves_the_divider() {
        let mut docker = docker();
        docker
            .add_panel("notes", DockLocation::Left, DockTarget::Auto, PanelOptions::default())
            .expect("add");
        docker
            .add_panel("notes", DockLocation::Right, DockTarget::Auto, PanelOptions::default())
            .expect("add");
        docker.update();
        let root = docker.root();
        let bar = docker.splitter(root).expect("splitter").bar_rect();
        let now = Instant::now();
        assert!(docker.mouse_down(bar.center(), MouseButton::Left, now));
        assert_eq!(docker.drag_mode(), Some(DragMode::Splitter));
        docker.mouse_move(Point::new(25.5, 20.0), now);
        let pos = docker.splitter_pos(root).expect("pos");
        assert!((pos - 25.0 / 99.0).abs() < 1e-9);
        docker.mouse_up(Point::new(25.5, 20.0), now);
        assert_eq!(docker.drag_mode(), None);
    }

    #[test]
    fn click_without_move_only_selects() {
        let mut docker = docker();
        let a = docker
            .add_panel("notes", DockLocation::Left, DockTarget::Auto, PanelOptions::default())
            .expect("add");
        let b = docker
            .add_panel("notes", DockLocation::Stacked, DockTarget::Panel(a), PanelOptions::default())
            .expect("add");
        docker.update();
        let frame = docker.frame_of(a).expect("frame");
        let first_tab = docker.frame(frame).expect("frame").strip().tabs[0];
        let now = Instant::now();
        docker.mouse_down(first_tab.center(), MouseButton::Left, now);
        docker.mouse_up(first_tab.center(), now);
        let f = docker.frame(frame).expect("frame");
        assert_eq!(f.current_panel(), Some(a));
        assert_eq!(f.panels(), &[a, b]);
    }

    #[test]
    fn tab_dragged_to_empty_space_floats() {
        let mut docker = docker();
        let a = docker
            .add_panel("notes", DockLocation::Left, DockTarget::Auto, PanelOptions::default())
            .expect("add");
        let b = docker
            .add_panel("notes", DockLocation::Stacked, DockTarget::Panel(a), PanelOptions::default())
            .expect("add");
        docker.update();
        let frame = docker.frame_of(a).expect("frame");
        let tab = docker.frame(frame).expect("frame").strip().tabs[1];
        let now = Instant::now();
        docker.mouse_down(tab.center(), MouseButton::Left, now);
        // Middle of the frame, away from every band.
        let drop = Point::new(50.0, 20.0);
        docker.mouse_move(drop, now);
        assert!(docker.ghost().is_some_and(|g| g.current_anchor().is_none()));
        docker.mouse_up(drop, now);
        let floated = docker.frame_of(b).expect("frame");
        assert!(docker.frame(floated).expect("frame").is_floating());
        assert_eq!(docker.floating_frames(), &[floated]);
    }

    #[test]
    fn escape_restores_floating_frame_position() {
        let mut docker = docker();
        let panel = docker
            .add_panel("notes", DockLocation::Float, DockTarget::Auto, PanelOptions::default())
            .expect("add");
        docker.update();
        let frame = docker.frame_of(panel).expect("frame");
        let before = docker.frame(frame).expect("frame").rect();
        let title = docker.frame(frame).expect("frame").title_rect();
        let grab = Point::new(title.right() - 8.0, title.y + 0.5);
        let now = Instant::now();
        docker.mouse_down(grab, MouseButton::Left, now);
        assert_eq!(docker.drag_mode(), Some(DragMode::Frame));
        docker.mouse_move(Point::new(grab.x - 5.0, grab.y + 3.0), now);
        docker.update();
        assert_ne!(docker.frame(frame).expect("frame").rect(), before);
        assert!(docker.escape());
        assert_eq!(docker.frame(frame).expect("frame").rect(), before);
    }
}

//! The layout pass.
//!
//! Geometry is only ever written here: drawers are carved off the surface,
//! the root tree is split recursively, floating frames are kept reachable
//! and finally every panel is synced with the content rect of its frame.

use std::time::Instant;

use super::collapser::carve;
use super::docker::Docker;
use super::events::{EventPayload, EventType};
use super::frame::{Frame, FrameButton, FrameLayout};
use super::splitter::{AnimDone, PosAnimation};
use super::{Node, NodeId, NodeKind, Panel};
use crate::layout::floating::keep_reachable;
use crate::layout::splitter::{PaneBounds, combined_max, combined_min, split};
use crate::layout::{Edge, Orientation, Rect, Size};

enum Step {
    Idle,
    Running,
    Finished(Option<AnimDone>),
}

fn advance(anim: &mut Option<PosAnimation>, pos: &mut f64, now: Instant) -> Step {
    let Some(running) = anim.as_mut() else {
        return Step::Idle;
    };
    let (value, done) = running.step(now);
    *pos = value;
    if done {
        let on_done = running.on_done;
        *anim = None;
        Step::Finished(on_done)
    } else {
        Step::Running
    }
}

impl Docker {
    /// Runs a layout pass right away.
    pub fn update(&mut self) {
        self.layout_pass();
    }

    /// Drives animations and the batched layout. A pass runs when something
    /// animated or when the tree is dirty and `response_rate` has elapsed
    /// since the last one. Returns whether a pass ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut animated = false;
        let mut finished = Vec::new();
        let ids: Vec<NodeId> = self.arena.ids().collect();
        for id in ids {
            let step = if let Some(splitter) = self.arena.splitter_mut(id) {
                let step = advance(&mut splitter.anim, &mut splitter.pos, now);
                if !matches!(step, Step::Idle) {
                    splitter.best_pos = false;
                }
                step
            } else if let Some(collapser) = self.arena.collapser_mut(id) {
                advance(&mut collapser.anim, &mut collapser.pos, now)
            } else {
                Step::Idle
            };
            match step {
                Step::Idle => {}
                Step::Running => animated = true,
                Step::Finished(done) => {
                    animated = true;
                    finished.extend(done);
                }
            }
        }
        if let Some(ghost) = self.ghost_mut() {
            ghost.tick(now);
        }

        let due = self.dirty
            && self.last_update.is_none_or(|last| {
                now.saturating_duration_since(last) >= self.options.response_rate
            });
        let ran = animated || due;
        if ran {
            self.layout_pass();
            self.last_update = Some(now);
        }
        for done in finished {
            self.finish_animation(done);
        }
        ran
    }

    pub(crate) fn layout_pass(&mut self) {
        let title = self.options.title_height;
        let bar = self.options.splitter_bar_size;
        let snap = self.options.pixel_snap;
        let mut area = self.surface;
        for edge in [Edge::Left, Edge::Right, Edge::Bottom] {
            let Some(id) = self.collapser_id(edge) else {
                continue;
            };
            let Some(collapser) = self.arena.collapser(id) else {
                continue;
            };
            let pos = collapser.pos;
            let frame = self.arena.drawer(collapser.drawer).map(|d| d.frame);
            let occupied = frame
                .and_then(|f| self.arena.frame(f))
                .is_some_and(|f| !f.panels.is_empty());
            let (drawer, bar_rect, rest) = if occupied {
                let total = self.surface.extent(edge.axis());
                carve(area, edge, pos, total, title, bar, snap)
            } else {
                (Rect::default(), Rect::default(), area)
            };
            if let Some(collapser) = self.arena.collapser_mut(id) {
                collapser.rect = drawer;
                collapser.bar_rect = bar_rect;
            }
            if let Some(frame) = frame {
                self.layout_frame(frame, drawer);
            }
            area = rest;
        }

        self.center = area;
        self.layout_node(self.root, area);

        for frame in self.floating.clone() {
            let Some(float_rect) = self.arena.frame(frame).map(|f| f.float_rect) else {
                continue;
            };
            let rect = if self.surface.is_empty() {
                float_rect
            } else {
                keep_reachable(float_rect, self.surface)
            };
            if let Some(f) = self.arena.frame_mut(frame) {
                f.float_rect = rect;
            }
            self.layout_frame(frame, rect);
        }

        self.sync_panels();
        self.dirty = false;
        tracing::trace!(center = ?self.center, "layout pass");
    }

    pub(crate) fn layout_node(&mut self, node: NodeId, rect: Rect) {
        match self.arena.kind(node) {
            Some(NodeKind::Frame) => self.layout_frame(node, rect),
            Some(NodeKind::Splitter) => self.layout_splitter(node, rect),
            _ => {}
        }
    }

    fn layout_splitter(&mut self, id: NodeId, rect: Rect) {
        let Some(splitter) = self.arena.splitter(id) else {
            return;
        };
        let (orientation, pos, best, panes) = (
            splitter.orientation,
            splitter.pos,
            splitter.best_pos,
            splitter.panes,
        );
        let bounds = panes.map(|pane| pane.map(|p| self.pane_bounds(p)).unwrap_or_default());
        let geometry = split(
            rect,
            orientation,
            (!best).then_some(pos),
            self.options.splitter_bar_size,
            self.options.pixel_snap,
            &bounds[0],
            &bounds[1],
        );
        if let Some(splitter) = self.arena.splitter_mut(id) {
            splitter.rect = rect;
            splitter.bar_rect = geometry.bar;
            splitter.is_static = geometry.is_static;
            if best && !rect.is_empty() {
                splitter.pos = geometry.pos;
                splitter.best_pos = false;
            }
        }
        for (pane, pane_rect) in panes.into_iter().zip(geometry.panes) {
            if let Some(pane) = pane {
                self.layout_node(pane, pane_rect);
            }
        }
    }

    fn pane_bounds(&self, node: NodeId) -> PaneBounds {
        PaneBounds {
            min: self.node_min_size(node),
            max: self.node_max_size(node),
            initial: self.node_initial_size(node),
        }
    }

    /// Edge the frame's tab strip is drawn on.
    pub(crate) fn frame_orientation(&self, frame: &Frame) -> Edge {
        match frame.drawer {
            Some(edge) => edge,
            None if !self.options.can_orient_tabs => Edge::Top,
            None => frame.tab_orientation,
        }
    }

    /// A lone panel with a hidden title gets no strip at all. Drawer frames
    /// always keep theirs since it is all a collapsed drawer shows.
    pub(crate) fn frame_has_title(&self, frame: &Frame) -> bool {
        if frame.drawer.is_some() {
            return true;
        }
        match frame.panels.as_slice() {
            [] => false,
            [only] => self.arena.panel(*only).is_some_and(|p| p.title_visible),
            _ => true,
        }
    }

    fn with_title(&self, frame: &Frame, size: Size) -> Size {
        if !self.frame_has_title(frame) {
            return size;
        }
        let title = self.options.title_height;
        match self.frame_orientation(frame).axis() {
            Orientation::Horizontal => Size::new(size.width + title, size.height),
            Orientation::Vertical => Size::new(size.width, size.height + title),
        }
    }

    fn frame_panels<'a>(&'a self, frame: &'a Frame) -> impl Iterator<Item = &'a Panel> + 'a {
        frame.panels.iter().filter_map(|id| self.arena.panel(*id))
    }

    pub(crate) fn node_min_size(&self, node: NodeId) -> Size {
        let surface = self.surface.size();
        match self.arena.get(node) {
            Some(Node::Frame(frame)) => {
                let min = self
                    .frame_panels(frame)
                    .fold(Size::ZERO, |acc, p| acc.max(p.min_px(surface)));
                self.with_title(frame, min)
            }
            Some(Node::Splitter(splitter)) => {
                let [a, b] = splitter
                    .panes
                    .map(|pane| pane.map(|p| self.node_min_size(p)).unwrap_or(Size::ZERO));
                combined_min(splitter.orientation, self.options.splitter_bar_size, a, b)
            }
            _ => Size::ZERO,
        }
    }

    pub(crate) fn node_max_size(&self, node: NodeId) -> Size {
        let surface = self.surface.size();
        match self.arena.get(node) {
            Some(Node::Frame(frame)) => {
                let max = self
                    .frame_panels(frame)
                    .fold(Size::INFINITE, |acc, p| acc.min(p.max_px(surface)));
                self.with_title(frame, max)
            }
            Some(Node::Splitter(splitter)) => {
                let [a, b] = splitter.panes.map(|pane| {
                    pane.map(|p| self.node_max_size(p))
                        .unwrap_or(Size::INFINITE)
                });
                combined_max(splitter.orientation, self.options.splitter_bar_size, a, b)
            }
            _ => Size::INFINITE,
        }
    }

    /// Preferred size of a frame: its current panel's request, else any
    /// panel's declared initial size.
    fn node_initial_size(&self, node: NodeId) -> Option<Size> {
        let frame = self.arena.frame(node)?;
        let surface = self.surface.size();
        let current = frame.current_panel().and_then(|id| self.arena.panel(id));
        current
            .and_then(|p| p.preferred_px(surface))
            .or_else(|| {
                self.frame_panels(frame)
                    .find_map(|p| p.preferred_px(surface))
            })
    }

    fn button_length(&self, label: &str) -> f64 {
        let metrics = &self.options.tab_metrics;
        let raw = label.chars().count() as f64 * metrics.char_width + metrics.padding;
        raw.max(self.options.title_height)
    }

    pub(crate) fn layout_frame(&mut self, id: NodeId, rect: Rect) {
        let Some(frame) = self.arena.frame(id) else {
            return;
        };
        let orientation = self.frame_orientation(frame);
        let has_title = self.frame_has_title(frame);
        let metrics = self.options.tab_metrics;
        let tab_lengths: Vec<f64> = self
            .frame_panels(frame)
            .map(|p| metrics.tab_length(&p.title))
            .collect();
        let mut buttons = Vec::new();
        if let Some(panel) = frame.current_panel().and_then(|p| self.arena.panel(p)) {
            for button in &panel.buttons {
                buttons.push((
                    FrameButton::Custom(button.name.clone()),
                    self.button_length(&button.label),
                ));
            }
            if panel.closeable {
                buttons.push((FrameButton::Close, self.button_length("x")));
            }
        }
        let sizer = if frame.floating {
            self.options.sizer_size
        } else {
            0.0
        };
        let panels = frame.panels.clone();
        let params = FrameLayout {
            title_height: self.options.title_height,
            orientation,
            has_title,
            tab_lengths: &tab_lengths,
            buttons,
            metrics: &metrics,
            buffer: self.options.tab_scroll_buffer,
            sizer,
        };
        if let Some(frame) = self.arena.frame_mut(id) {
            frame.layout(rect, params);
        }
        if !rect.is_empty() {
            for panel in panels {
                if let Some(p) = self.arena.panel_mut(panel) {
                    p.requested_size = None;
                }
            }
        }
    }

    /// Pushes frame geometry into the panels and fires the resulting
    /// events once every panel is up to date.
    pub(crate) fn sync_panels(&mut self) {
        let mut events: Vec<(NodeId, EventType, EventPayload)> = Vec::new();
        for frame_id in self.all_frames() {
            let Some(frame) = self.arena.frame(frame_id) else {
                continue;
            };
            let floating = frame.floating;
            let content = frame.content_rect;
            let current = frame.current_panel();
            let panels = frame.panels.clone();
            for panel in panels {
                let Some(p) = self.arena.panel_mut(panel) else {
                    continue;
                };
                let visible = current == Some(panel) && !content.is_empty();
                if !p.attached_once || p.floating != floating {
                    if p.attached_once || floating {
                        let event = if floating {
                            EventType::Detached
                        } else {
                            EventType::Attached
                        };
                        events.push((panel, event, EventPayload::None));
                    }
                    p.attached_once = true;
                    p.floating = floating;
                }
                if p.visible != visible {
                    p.visible = visible;
                    events.push((
                        panel,
                        EventType::VisibilityChanged,
                        EventPayload::Visible(visible),
                    ));
                }
                if !visible {
                    continue;
                }
                let moved = p.rect.origin() != content.origin();
                let resized = p.rect.size() != content.size();
                p.rect = content;
                if moved {
                    events.push((
                        panel,
                        EventType::Moved,
                        EventPayload::Position(content.origin()),
                    ));
                }
                if resized {
                    events.push((
                        panel,
                        EventType::Resized,
                        EventPayload::Size(content.size()),
                    ));
                }
                if moved || resized {
                    events.push((panel, EventType::Updated, EventPayload::None));
                }
            }
        }
        for (panel, event, mut payload) in events {
            self.fire(panel, event, &mut payload);
        }
    }
}

use std::collections::BTreeMap;
use std::time::Instant;

use super::collapser::{Collapser, Drawer, closed_pos, pos_for_extent};
use super::events::{DockerHandlers, EventPayload, EventType};
use super::frame::Frame;
use super::input::DragSession;
use super::panel::{Panel, PanelOptions, PanelType};
use super::splitter::{AnimDone, PosAnimation, Splitter};
use super::{Arena, DockLocation, Node, NodeId, NodeKind};
use crate::config::{DockerOptions, Measure, MeasureSize};
use crate::constants::{DEFAULT_DRAWER_FRACTION, DEFAULT_FLOAT_FRACTION, PLACEHOLDER_TYPE};
use crate::error::{DockError, DockResult};
use crate::layout::{Edge, Orientation, Point, Rect, Size};

/// Where a placement is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DockTarget {
    /// The focused frame when stacking, the whole docked tree when splitting.
    #[default]
    Auto,
    Panel(NodeId),
    Frame(NodeId),
    /// The drawer on the edge named by the location.
    Collapsed,
}

/// One entry of [`Docker::draw_list`], back to front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawItem {
    Frame(NodeId),
    /// A splitter or drawer bar.
    Bar {
        owner: NodeId,
        rect: Rect,
        is_static: bool,
    },
}

/// Owns the docking tree and everything that mutates it.
pub struct Docker {
    pub(crate) registry: BTreeMap<String, PanelType>,
    pub(crate) arena: Arena,
    pub(crate) options: DockerOptions,
    pub(crate) surface: Rect,
    /// Area left for the root tree after the drawers are carved off.
    pub(crate) center: Rect,
    pub(crate) root: NodeId,
    /// Floating frames, back to front.
    pub(crate) floating: Vec<NodeId>,
    pub(crate) collapsers: BTreeMap<Edge, NodeId>,
    pub(crate) persistent: Vec<NodeId>,
    pub(crate) focus: Option<NodeId>,
    pub(crate) drag: Option<DragSession>,
    pub(crate) dirty: bool,
    pub(crate) last_update: Option<Instant>,
    pub(crate) handlers: DockerHandlers,
}

impl std::fmt::Debug for Docker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Docker")
            .field("root", &self.root)
            .field("floating", &self.floating)
            .field("collapsers", &self.collapsers)
            .field("persistent", &self.persistent)
            .field("focus", &self.focus)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Default for Docker {
    fn default() -> Self {
        Self::new(DockerOptions::default())
    }
}

impl Docker {
    /// A docker whose tree is a single frame holding the placeholder.
    pub fn new(options: DockerOptions) -> Self {
        let mut arena = Arena::default();
        let root = arena.insert(Node::Frame(Frame::new(None)));
        let mut docker = Self {
            registry: BTreeMap::new(),
            arena,
            options,
            surface: Rect::default(),
            center: Rect::default(),
            root,
            floating: Vec::new(),
            collapsers: BTreeMap::new(),
            persistent: Vec::new(),
            focus: None,
            drag: None,
            dirty: true,
            last_update: None,
            handlers: DockerHandlers::default(),
        };
        docker.insert_placeholder(root);
        docker
    }

    pub fn options(&self) -> &DockerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: DockerOptions) {
        self.options = options;
        self.mark_dirty();
    }

    pub fn surface(&self) -> Rect {
        self.surface
    }

    pub fn resize_surface(&mut self, surface: Rect) {
        if self.surface != surface {
            tracing::trace!(?surface, "docking surface resized");
            self.surface = surface;
            self.mark_dirty();
        }
    }

    pub fn center(&self) -> Rect {
        self.center
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // ---- registry -------------------------------------------------------

    /// Registers a panel type. Returns `false` if the name is taken.
    pub fn register_panel_type(&mut self, name: impl Into<String>, panel_type: PanelType) -> bool {
        let name = name.into();
        if name == PLACEHOLDER_TYPE || self.registry.contains_key(&name) {
            tracing::warn!(panel_type = %name, "duplicate panel type registration");
            return false;
        }
        tracing::debug!(panel_type = %name, "registered panel type");
        self.registry.insert(name, panel_type);
        true
    }

    pub fn panel_types(&self, include_private: bool) -> Vec<&str> {
        self.registry
            .iter()
            .filter(|(_, ty)| include_private || !ty.is_private)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    fn instance_count(&self, type_name: &str) -> usize {
        self.arena
            .panels()
            .filter(|(_, panel)| panel.type_name == type_name)
            .count()
    }

    pub(crate) fn create_panel(
        &mut self,
        type_name: &str,
        options: &PanelOptions,
    ) -> DockResult<NodeId> {
        let Some(panel_type) = self.registry.get(type_name) else {
            return Err(DockError::UnknownPanelType(type_name.to_string()));
        };
        if let Some(limit) = panel_type.limit
            && self.instance_count(type_name) >= limit
        {
            return Err(DockError::PanelLimitReached(type_name.to_string()));
        }
        let mut panel = Panel::new(type_name);
        if let Some(title) = &panel_type.title {
            panel.title = title.clone();
        }
        if let Some(title) = &options.title {
            panel.title = title.clone();
        }
        panel.persistent = panel_type.persistent;
        let controller = (panel_type.factory)(&mut panel, options);
        panel.controller = Some(controller);
        Ok(self.arena.insert(Node::Panel(panel)))
    }

    // ---- lookups --------------------------------------------------------

    pub fn node_kind(&self, id: NodeId) -> Option<NodeKind> {
        self.arena.kind(id)
    }

    pub fn panel(&self, id: NodeId) -> Option<&Panel> {
        self.arena.panel(id)
    }

    pub fn panel_mut(&mut self, id: NodeId) -> Option<&mut Panel> {
        self.mark_dirty();
        self.arena.panel_mut(id)
    }

    pub fn frame(&self, id: NodeId) -> Option<&Frame> {
        self.arena.frame(id)
    }

    pub fn splitter(&self, id: NodeId) -> Option<&Splitter> {
        self.arena.splitter(id)
    }

    pub fn collapser(&self, edge: Edge) -> Option<&Collapser> {
        self.collapsers
            .get(&edge)
            .and_then(|id| self.arena.collapser(*id))
    }

    pub(crate) fn collapser_id(&self, edge: Edge) -> Option<NodeId> {
        self.collapsers.get(&edge).copied()
    }

    /// The frame inside the drawer on `edge`.
    pub fn drawer_frame(&self, edge: Edge) -> Option<NodeId> {
        let collapser = self.collapser(edge)?;
        self.arena.drawer(collapser.drawer).map(|drawer| drawer.frame)
    }

    pub fn floating_frames(&self) -> &[NodeId] {
        &self.floating
    }

    pub fn persistent_panels(&self) -> &[NodeId] {
        &self.persistent
    }

    pub fn frame_of(&self, panel: NodeId) -> Option<NodeId> {
        self.arena.panel(panel)?.parent
    }

    /// Docked frames in tree order, first pane first.
    pub fn docked_frames(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_frames(self.root, &mut out);
        out
    }

    fn collect_frames(&self, node: NodeId, out: &mut Vec<NodeId>) {
        match self.arena.get(node) {
            Some(Node::Frame(_)) => out.push(node),
            Some(Node::Splitter(splitter)) => {
                for pane in splitter.panes.into_iter().flatten() {
                    self.collect_frames(pane, out);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn splitters_under(&self, node: NodeId, out: &mut Vec<NodeId>) {
        if let Some(splitter) = self.arena.splitter(node) {
            out.push(node);
            for pane in splitter.panes.into_iter().flatten() {
                self.splitters_under(pane, out);
            }
        }
    }

    /// Every attached frame: docked, then floating back to front, then
    /// drawers.
    pub fn all_frames(&self) -> Vec<NodeId> {
        let mut frames = self.docked_frames();
        frames.extend(self.floating.iter().copied());
        frames.extend(
            self.collapsers
                .keys()
                .filter_map(|edge| self.drawer_frame(*edge)),
        );
        frames
    }

    pub(crate) fn panels_under(&self, node: NodeId) -> Vec<NodeId> {
        match self.arena.get(node) {
            Some(Node::Frame(frame)) => frame.panels.clone(),
            Some(Node::Splitter(_)) => {
                let mut frames = Vec::new();
                self.collect_frames(node, &mut frames);
                frames
                    .into_iter()
                    .filter_map(|frame| self.arena.frame(frame))
                    .flat_map(|frame| frame.panels.iter().copied())
                    .collect()
            }
            Some(Node::Collapser(collapser)) => self
                .arena
                .drawer(collapser.drawer)
                .map(|drawer| self.panels_under(drawer.frame))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Attached panels of `type_name` (all types when `None`), placeholders
    /// excluded.
    pub fn find_panels(&self, type_name: Option<&str>) -> Vec<NodeId> {
        self.all_frames()
            .into_iter()
            .filter_map(|frame| self.arena.frame(frame))
            .flat_map(|frame| frame.panels.iter().copied())
            .filter(|id| {
                self.arena.panel(*id).is_some_and(|panel| {
                    !panel.placeholder && type_name.is_none_or(|name| panel.type_name == name)
                })
            })
            .collect()
    }

    pub(crate) fn is_docked_frame(&self, frame: NodeId) -> bool {
        self.arena
            .frame(frame)
            .is_some_and(|f| !f.floating && f.drawer.is_none())
    }

    fn resolve_frame(&self, target: DockTarget) -> Option<NodeId> {
        match target {
            DockTarget::Panel(panel) => self.frame_of(panel),
            DockTarget::Frame(frame) if self.arena.frame(frame).is_some() => Some(frame),
            _ => None,
        }
    }

    /// Frame used for a stacked placement without a target.
    fn default_stack_frame(&self) -> NodeId {
        self.focus
            .filter(|frame| {
                self.arena
                    .frame(*frame)
                    .is_some_and(|f| f.drawer.is_none() && !f.modal)
            })
            .or_else(|| self.docked_frames().first().copied())
            .unwrap_or(self.root)
    }

    // ---- events ---------------------------------------------------------

    /// Registers a docker-wide handler.
    pub fn on<F>(&mut self, event: EventType, handler: F)
    where
        F: FnMut(Option<NodeId>, &mut EventPayload) -> bool + 'static,
    {
        self.handlers.on(event, Box::new(handler));
    }

    /// Runs the panel's handlers, then the docker's. `false` if any vetoed.
    pub(crate) fn fire(&mut self, panel: NodeId, event: EventType, payload: &mut EventPayload) -> bool {
        let mut accepted = self
            .arena
            .panel_mut(panel)
            .is_none_or(|p| p.trigger(event, payload));
        accepted &= self.handlers.trigger(event, Some(panel), payload);
        accepted
    }

    pub(crate) fn fire_simple(&mut self, panel: NodeId, event: EventType) -> bool {
        self.fire(panel, event, &mut EventPayload::None)
    }

    /// Fires `event` on every attached panel.
    pub(crate) fn broadcast(&mut self, event: EventType) {
        for panel in self.find_panels(None) {
            self.fire_simple(panel, event);
        }
    }

    // ---- tree building --------------------------------------------------

    pub(crate) fn attach(&mut self, panel: NodeId, frame: NodeId, index: Option<usize>) -> usize {
        self.arena.set_parent(panel, Some(frame));
        self.arena
            .frame_mut(frame)
            .map(|f| f.add_panel(panel, index))
            .unwrap_or(0)
    }

    pub(crate) fn insert_placeholder(&mut self, frame: NodeId) -> NodeId {
        let placeholder = self.arena.insert(Node::Panel(Panel::placeholder()));
        self.attach(placeholder, frame, None);
        tracing::trace!(frame = %frame, "inserted placeholder");
        placeholder
    }

    fn stack_into(&mut self, panel: NodeId, frame: NodeId) -> NodeId {
        let index = self.attach(panel, frame, None);
        if let Some(f) = self.arena.frame_mut(frame) {
            if f.drawer.is_some() && f.current.is_none() {
                f.collapsed_tab = Some(index);
            } else {
                f.set_current(Some(index));
            }
        }
        frame
    }

    /// Puts `panel` in a new frame beside `node` (a docked frame or the
    /// root) and returns the new frame.
    fn split_beside(&mut self, panel: NodeId, location: DockLocation, node: NodeId) -> NodeId {
        let Some((orientation, new_first)) = location.split() else {
            return self.stack_into(panel, self.default_stack_frame());
        };
        let parent = self.arena.parent(node);
        let frame = self.arena.insert(Node::Frame(Frame::new(None)));
        self.attach(panel, frame, None);
        let mut splitter = Splitter::new(parent, orientation);
        splitter.panes = if new_first {
            [Some(frame), Some(node)]
        } else {
            [Some(node), Some(frame)]
        };
        let splitter = self.arena.insert(Node::Splitter(splitter));
        self.arena.set_parent(frame, Some(splitter));
        self.arena.set_parent(node, Some(splitter));
        if node == self.root {
            self.root = splitter;
        } else if let Some(parent) = parent
            && let Some(p) = self.arena.splitter_mut(parent)
        {
            p.replace_pane(node, splitter);
        }
        tracing::debug!(
            panel = %panel,
            frame = %frame,
            splitter = %splitter,
            beside = %node,
            ?location,
            "split"
        );
        frame
    }

    pub(crate) fn default_float_size(&self) -> Size {
        Size::new(
            (self.surface.width * DEFAULT_FLOAT_FRACTION).max(1.0),
            (self.surface.height * DEFAULT_FLOAT_FRACTION).max(1.0),
        )
    }

    /// Puts `panel` in a new floating frame. Without an explicit rect the
    /// frame is centred on the surface.
    fn float_panel(
        &mut self,
        panel: NodeId,
        modal: bool,
        rect: Option<Rect>,
        position: Option<Point>,
    ) -> NodeId {
        let surface_size = self.surface.size();
        let size = self
            .arena
            .panel_mut(panel)
            .and_then(|p| {
                let preferred = p.preferred_px(surface_size);
                p.requested_size = None;
                preferred
            })
            .filter(|size| {
                size.width.is_finite()
                    && size.height.is_finite()
                    && size.width > 0.0
                    && size.height > 0.0
            })
            .unwrap_or_else(|| self.default_float_size());
        let mut rect = rect.unwrap_or_else(|| match position {
            Some(origin) => Rect::new(origin.x, origin.y, size.width, size.height),
            None => Rect::from_center(self.surface.center(), size),
        });
        if !self.surface.is_empty() && rect.intersection(&self.surface).is_empty() {
            tracing::debug!(?rect, "float rect is off the surface, centring");
            rect = Rect::from_center(self.surface.center(), rect.size());
        }
        let mut frame = Frame::new(None);
        frame.floating = true;
        frame.modal = modal;
        frame.float_rect = rect;
        let frame = self.arena.insert(Node::Frame(frame));
        self.attach(panel, frame, None);
        self.floating.push(frame);
        self.restack();
        tracing::debug!(panel = %panel, frame = %frame, ?rect, modal, "floated");
        frame
    }

    /// Keeps modal frames above everything else.
    fn restack(&mut self) {
        let arena = &self.arena;
        self.floating
            .sort_by_key(|id| arena.frame(*id).is_some_and(|f| f.modal));
    }

    pub(crate) fn ensure_collapser(&mut self, edge: Edge) -> NodeId {
        if let Some(id) = self.collapsers.get(&edge) {
            return *id;
        }
        let mut frame = Frame::new(None);
        frame.drawer = Some(edge);
        frame.tab_orientation = edge;
        let frame = self.arena.insert(Node::Frame(frame));
        let drawer = self
            .arena
            .insert(Node::Drawer(Drawer { parent: None, frame }));
        let collapser = self
            .arena
            .insert(Node::Collapser(Collapser::new(edge, drawer)));
        self.arena.set_parent(frame, Some(drawer));
        self.arena.set_parent(drawer, Some(collapser));
        self.collapsers.insert(edge, collapser);
        tracing::debug!(?edge, collapser = %collapser, "created collapser");
        collapser
    }

    fn dock_in_drawer(&mut self, panel: NodeId, edge: Edge) -> NodeId {
        self.ensure_collapser(edge);
        let Some(frame) = self.drawer_frame(edge) else {
            return self.stack_into(panel, self.default_stack_frame());
        };
        let was_empty = self.arena.frame(frame).is_some_and(|f| f.panels.is_empty());
        let index = self.attach(panel, frame, None);
        if let Some(f) = self.arena.frame_mut(frame) {
            if was_empty {
                f.current = None;
                f.collapsed_tab = Some(index);
            } else if f.current.is_some() {
                f.set_current(Some(index));
            } else {
                f.collapsed_tab = Some(index);
            }
        }
        frame
    }

    /// Places a detached panel and returns its frame.
    pub(crate) fn place_panel(
        &mut self,
        panel: NodeId,
        location: DockLocation,
        target: DockTarget,
        options: &PanelOptions,
    ) -> NodeId {
        match location {
            DockLocation::Float | DockLocation::Modal => {
                self.float_panel(panel, location == DockLocation::Modal, None, options.position)
            }
            _ if target == DockTarget::Collapsed => match location.edge() {
                Some(edge) if edge != Edge::Top && self.options.allow_collapse => {
                    self.dock_in_drawer(panel, edge)
                }
                Some(_) => self.split_beside(panel, location, self.root),
                None => self.stack_into(panel, self.default_stack_frame()),
            },
            DockLocation::Stacked => {
                let frame = match self.resolve_frame(target) {
                    Some(frame) => frame,
                    None if target != DockTarget::Auto => return self.float_stale(panel, target),
                    None => self.default_stack_frame(),
                };
                if let Some(edge) = self.arena.frame(frame).and_then(|f| f.drawer) {
                    return self.dock_in_drawer(panel, edge);
                }
                self.stack_into(panel, frame)
            }
            _ => match self.resolve_frame(target) {
                Some(frame) if self.is_docked_frame(frame) => {
                    self.split_beside(panel, location, frame)
                }
                Some(frame) => match self.arena.frame(frame).and_then(|f| f.drawer) {
                    Some(edge) => self.dock_in_drawer(panel, edge),
                    None => self.stack_into(panel, frame),
                },
                None if target != DockTarget::Auto => self.float_stale(panel, target),
                None => self.split_beside(panel, location, self.root),
            },
        }
    }

    /// Default placement for a target that no longer resolves.
    fn float_stale(&mut self, panel: NodeId, target: DockTarget) -> NodeId {
        tracing::warn!(?target, "dock target is gone, floating at the centre");
        self.float_panel(panel, false, None, None)
    }

    /// Removes placeholders once the docked tree holds a real panel.
    pub(crate) fn remove_obsolete_placeholders(&mut self) {
        let docked: Vec<NodeId> = self
            .docked_frames()
            .into_iter()
            .filter_map(|frame| self.arena.frame(frame))
            .flat_map(|frame| frame.panels.iter().copied())
            .collect();
        let is_placeholder = |id: &NodeId| self.arena.panel(*id).is_some_and(|p| p.placeholder);
        if docked.iter().all(is_placeholder) {
            return;
        }
        let placeholders: Vec<NodeId> = docked.into_iter().filter(is_placeholder).collect();
        for placeholder in placeholders {
            self.detach_panel(placeholder);
            self.arena.remove(placeholder);
            tracing::trace!(placeholder = %placeholder, "removed obsolete placeholder");
        }
    }

    /// Takes a panel out of its frame and restores the tree invariants
    /// right away: empty floating frames go, empty docked frames collapse
    /// their splitter and the root frame gets a placeholder.
    pub(crate) fn detach_panel(&mut self, panel: NodeId) {
        let Some(frame) = self.frame_of(panel) else {
            return;
        };
        self.arena.set_parent(panel, None);
        let remaining = self
            .arena
            .frame_mut(frame)
            .is_some_and(|f| f.remove_panel(panel));
        if !remaining {
            self.dispose_empty_frame(frame);
        }
        self.mark_dirty();
    }

    fn dispose_empty_frame(&mut self, frame: NodeId) {
        let Some((drawer, floating, parent)) = self
            .arena
            .frame(frame)
            .map(|f| (f.drawer, f.floating, f.parent))
        else {
            return;
        };
        if let Some(edge) = drawer {
            if let Some(id) = self.collapser_id(edge)
                && let Some(collapser) = self.arena.collapser_mut(id)
            {
                collapser.anim = None;
                collapser.pos = closed_pos(edge);
            }
            return;
        }
        if floating {
            self.floating.retain(|id| *id != frame);
            self.arena.remove(frame);
            self.forget_focus(frame);
            tracing::debug!(frame = %frame, "closed empty floating frame");
            return;
        }
        if frame == self.root {
            self.insert_placeholder(frame);
            return;
        }
        let Some(splitter) = parent else {
            return;
        };
        let sibling = self
            .arena
            .splitter(splitter)
            .and_then(|s| s.other(frame));
        let grand = self.arena.parent(splitter);
        self.arena.remove(frame);
        self.arena.remove(splitter);
        self.forget_focus(frame);
        if let Some(sibling) = sibling {
            self.arena.set_parent(sibling, grand);
            if splitter == self.root {
                self.root = sibling;
            } else if let Some(grand) = grand
                && let Some(g) = self.arena.splitter_mut(grand)
            {
                g.replace_pane(splitter, sibling);
            }
        }
        tracing::debug!(frame = %frame, splitter = %splitter, "collapsed empty frame");
    }

    fn forget_focus(&mut self, frame: NodeId) {
        if self.focus == Some(frame) {
            self.focus = None;
        }
    }

    // ---- public mutations -----------------------------------------------

    /// Adds a panel of `type_name`. A detached persistent panel of that
    /// type is reopened instead of calling the factory.
    pub fn add_panel(
        &mut self,
        type_name: &str,
        location: DockLocation,
        target: DockTarget,
        options: PanelOptions,
    ) -> DockResult<NodeId> {
        let reopened = self.persistent.iter().position(|id| {
            self.arena
                .panel(*id)
                .is_some_and(|panel| panel.type_name == type_name)
        });
        let (panel, reopened) = match reopened {
            Some(index) => (self.persistent.remove(index), true),
            None => (self.create_panel(type_name, &options)?, false),
        };
        if let Some(size) = options.size
            && let Some(p) = self.arena.panel_mut(panel)
        {
            p.requested_size = Some(size);
        }
        let frame = self.place_panel(panel, location, target, &options);
        self.remove_obsolete_placeholders();
        self.mark_dirty();
        tracing::debug!(
            panel = %panel,
            panel_type = type_name,
            frame = %frame,
            ?location,
            ?target,
            reopened,
            "added panel"
        );
        if reopened {
            self.fire_simple(panel, EventType::PersistentOpened);
        } else {
            self.fire_simple(panel, EventType::Init);
        }
        Ok(panel)
    }

    /// Closes a panel. Any `Closing` handler can veto. Persistent panels
    /// (and any panel when `dont_destroy` is set) are detached and kept for
    /// reopening; the rest are destroyed.
    pub fn remove_panel(&mut self, panel: NodeId, dont_destroy: bool) -> bool {
        let Some(p) = self.arena.panel(panel) else {
            return false;
        };
        if p.placeholder {
            return false;
        }
        let keep = p.persistent || dont_destroy;
        let was_visible = p.visible;
        if !self.fire_simple(panel, EventType::Closing) {
            tracing::debug!(panel = %panel, "close vetoed");
            return false;
        }
        self.detach_panel(panel);
        if was_visible {
            if let Some(p) = self.arena.panel_mut(panel) {
                p.visible = false;
            }
            self.fire(panel, EventType::VisibilityChanged, &mut EventPayload::Visible(false));
        }
        if keep {
            if !self.persistent.contains(&panel) {
                self.persistent.push(panel);
            }
            self.fire_simple(panel, EventType::PersistentClosed);
            tracing::debug!(panel = %panel, "detached persistent panel");
        } else {
            self.fire_simple(panel, EventType::Closed);
            self.arena.remove(panel);
            tracing::debug!(panel = %panel, "destroyed panel");
        }
        self.mark_dirty();
        true
    }

    /// Moves a docked or floating panel, keeping its footprint. Floating
    /// results are centred where the old frame was.
    pub fn move_panel(
        &mut self,
        panel: NodeId,
        location: DockLocation,
        target: DockTarget,
        options: PanelOptions,
    ) -> bool {
        let Some(p) = self.arena.panel(panel) else {
            return false;
        };
        if p.placeholder {
            return false;
        }
        let Some(old_frame) = p.parent else {
            return false;
        };
        let Some(old) = self.arena.frame(old_frame) else {
            return false;
        };
        let old_rect = old.rect;
        let alone = old.panels.len() == 1;
        let target_frame = self.resolve_frame(target);
        let floats = matches!(location, DockLocation::Float | DockLocation::Modal);
        if target_frame == Some(old_frame)
            && !floats
            && (alone || location == DockLocation::Stacked)
        {
            return false;
        }
        let target = target_frame.map(DockTarget::Frame).unwrap_or(target);

        let size = options
            .size
            .or_else(|| (!old_rect.is_empty()).then(|| old_rect.size()));
        if let Some(p) = self.arena.panel_mut(panel) {
            p.requested_size = size;
        }
        self.detach_panel(panel);
        let frame = if floats {
            let rect = size.map(|size| match options.position {
                Some(origin) => Rect::new(origin.x, origin.y, size.width, size.height),
                None => Rect::from_center(old_rect.center(), size),
            });
            self.float_panel(panel, location == DockLocation::Modal, rect, options.position)
        } else {
            self.place_panel(panel, location, target, &options)
        };
        self.remove_obsolete_placeholders();
        self.focus_frame(frame);
        self.mark_dirty();
        tracing::debug!(
            panel = %panel,
            from = %old_frame,
            to = %frame,
            ?location,
            ?target,
            "moved panel"
        );
        true
    }

    /// Closes every panel and resets to a single placeholder frame.
    pub fn clear(&mut self) {
        self.close_all();
        self.reset_tree();
        self.root = self.arena.insert(Node::Frame(Frame::new(None)));
        let root = self.root;
        self.insert_placeholder(root);
        self.mark_dirty();
        tracing::debug!("cleared docker");
    }

    /// Fires `Closed` on every panel, detached persistent ones included.
    pub(crate) fn close_all(&mut self) {
        let mut panels = self.find_panels(None);
        panels.extend(self.persistent.iter().copied());
        for panel in panels {
            self.fire_simple(panel, EventType::Closed);
        }
    }

    /// Drops every node. `root` is left dangling until the caller builds a
    /// new tree.
    pub(crate) fn reset_tree(&mut self) {
        self.arena.clear();
        self.floating.clear();
        self.collapsers.clear();
        self.persistent.clear();
        self.focus = None;
        self.drag = None;
    }

    // ---- frames ---------------------------------------------------------

    /// Selects tab `index` of `frame`. On a drawer frame, selecting `None`
    /// or the tab that is already current collapses the drawer and any other
    /// tab expands it.
    pub fn set_current_tab(
        &mut self,
        frame: NodeId,
        index: Option<usize>,
        auto_focus: bool,
    ) -> DockResult<bool> {
        let Some(f) = self.arena.frame(frame) else {
            return Err(DockError::InvalidNode(frame, NodeKind::Frame));
        };
        let (drawer, current, len) = (f.drawer, f.current, f.panels.len());
        let changed = match drawer {
            Some(edge) => match index {
                None => self.collapse(edge, false),
                Some(i) if Some(i) == current => self.collapse(edge, false),
                Some(i) if i >= len => false,
                Some(i) if current.is_none() => {
                    if let Some(f) = self.arena.frame_mut(frame) {
                        f.collapsed_tab = Some(i);
                    }
                    self.expand(edge)
                }
                Some(i) => self
                    .arena
                    .frame_mut(frame)
                    .is_some_and(|f| f.set_current(Some(i))),
            },
            None if index.is_none() && len > 0 => false,
            None => self
                .arena
                .frame_mut(frame)
                .is_some_and(|f| f.set_current(index)),
        };
        if auto_focus {
            self.focus_frame(frame);
        }
        if changed {
            self.mark_dirty();
        }
        Ok(changed)
    }

    /// Moves the tab strip to `edge`. Returns `false` when tabs are locked
    /// to the top or the frame is a drawer frame.
    pub fn set_tab_orientation(&mut self, frame: NodeId, edge: Edge) -> DockResult<bool> {
        let can_orient = self.options.can_orient_tabs;
        let Some(f) = self.arena.frame_mut(frame) else {
            return Err(DockError::InvalidNode(frame, NodeKind::Frame));
        };
        if !can_orient || f.drawer.is_some() || f.tab_orientation == edge {
            return Ok(false);
        }
        f.tab_orientation = edge;
        self.mark_dirty();
        Ok(true)
    }

    /// Moves a tab within its frame.
    pub fn reorder_tab(&mut self, frame: NodeId, from: usize, to: usize) -> DockResult<bool> {
        let Some(f) = self.arena.frame_mut(frame) else {
            return Err(DockError::InvalidNode(frame, NodeKind::Frame));
        };
        let Some(panel) = f.panels.get(from).copied() else {
            return Ok(false);
        };
        if !f.move_tab(from, to) {
            return Ok(false);
        }
        self.fire(panel, EventType::OrderChanged, &mut EventPayload::Order { from, to });
        self.mark_dirty();
        Ok(true)
    }

    pub fn focused_frame(&self) -> Option<NodeId> {
        self.focus
    }

    /// Focuses `frame`, raising it if it floats.
    pub fn focus_frame(&mut self, frame: NodeId) -> bool {
        if self.arena.frame(frame).is_none() {
            return false;
        }
        self.bring_to_front(frame);
        if self.focus == Some(frame) {
            return true;
        }
        let previous = self.focus.replace(frame);
        if let Some(previous) = previous
            && let Some(panel) = self.arena.frame(previous).and_then(Frame::current_panel)
        {
            self.fire_simple(panel, EventType::LostFocus);
        }
        if let Some(panel) = self.arena.frame(frame).and_then(Frame::current_panel) {
            self.fire_simple(panel, EventType::GainFocus);
        }
        tracing::trace!(frame = %frame, "focused frame");
        true
    }

    /// Raises a floating frame. Modal frames stay on top.
    pub fn bring_to_front(&mut self, frame: NodeId) -> bool {
        let Some(index) = self.floating.iter().position(|id| *id == frame) else {
            return false;
        };
        if index + 1 != self.floating.len() {
            let id = self.floating.remove(index);
            self.floating.push(id);
            self.restack();
        }
        true
    }

    /// Toggles or sets a custom title-bar button and fires `ButtonClicked`.
    pub fn click_button(&mut self, panel: NodeId, name: &str) -> bool {
        let Some(p) = self.arena.panel_mut(panel) else {
            return false;
        };
        let Some(button) = p.buttons.iter_mut().find(|b| b.name == name) else {
            return false;
        };
        if button.toggle {
            button.toggled = !button.toggled;
        }
        let mut payload = EventPayload::Button {
            name: button.name.clone(),
            toggled: button.toggled,
        };
        self.fire(panel, EventType::ButtonClicked, &mut payload);
        self.mark_dirty();
        true
    }

    pub fn scroll_panel(&mut self, panel: NodeId, scroll: Point) -> bool {
        let Some(p) = self.arena.panel_mut(panel) else {
            return false;
        };
        if p.scroll == scroll {
            return false;
        }
        p.scroll = scroll;
        self.fire(panel, EventType::Scrolled, &mut EventPayload::Scroll(scroll));
        true
    }

    /// Selects a tab of a custom tab widget and fires `CustomTabChanged`.
    pub fn select_custom_tab(&mut self, panel: NodeId, item: usize, index: usize) -> bool {
        let Some(widget) = self
            .arena
            .panel_mut(panel)
            .and_then(|p| p.tab_widget_mut(item))
        else {
            return false;
        };
        if !widget.set_current(index) {
            return false;
        }
        let title = widget.tabs()[index].title.clone();
        self.fire(
            panel,
            EventType::CustomTabChanged,
            &mut EventPayload::CustomTab { item, index, title },
        );
        self.mark_dirty();
        true
    }

    /// Closes a tab of a custom tab widget and fires `CustomTabClosed`.
    pub fn close_custom_tab(&mut self, panel: NodeId, item: usize, index: usize) -> bool {
        let Some(removed) = self
            .arena
            .panel_mut(panel)
            .and_then(|p| p.tab_widget_mut(item))
            .and_then(|widget| widget.remove_tab(index))
        else {
            return false;
        };
        self.fire(
            panel,
            EventType::CustomTabClosed,
            &mut EventPayload::CustomTab {
                item,
                index,
                title: removed.title,
            },
        );
        self.mark_dirty();
        true
    }

    // ---- splitters and drawers ------------------------------------------

    pub fn splitter_pos(&self, splitter: NodeId) -> Option<f64> {
        self.arena.splitter(splitter).map(Splitter::pos)
    }

    /// Sets a divider position, lays out the splitter's subtree right away
    /// and fires `Updated` on every panel below it.
    pub fn set_splitter_pos(&mut self, splitter: NodeId, pos: f64) -> DockResult<()> {
        let Some(s) = self.arena.splitter_mut(splitter) else {
            return Err(DockError::InvalidNode(splitter, NodeKind::Splitter));
        };
        s.anim = None;
        s.set_pos(pos);
        let rect = s.rect;
        self.layout_node(splitter, rect);
        self.sync_panels();
        for panel in self.panels_under(splitter) {
            self.fire_simple(panel, EventType::Updated);
        }
        Ok(())
    }

    /// Animates a divider to `target` in steps of `anim_tick`.
    pub fn anim_splitter_pos(
        &mut self,
        splitter: NodeId,
        target: f64,
        on_done: Option<AnimDone>,
    ) -> DockResult<()> {
        let duration = self.options.anim_duration;
        let tick = self.options.anim_tick;
        let Some(s) = self.arena.splitter_mut(splitter) else {
            return Err(DockError::InvalidNode(splitter, NodeKind::Splitter));
        };
        s.anim = Some(PosAnimation::new(
            s.pos,
            target.clamp(0.0, 1.0),
            duration,
            tick,
            on_done,
        ));
        Ok(())
    }

    pub fn is_expanded(&self, edge: Edge) -> bool {
        self.drawer_frame(edge)
            .and_then(|frame| self.arena.frame(frame))
            .is_some_and(|frame| frame.current.is_some())
    }

    fn edge_total(&self, edge: Edge) -> f64 {
        self.surface.extent(edge.axis())
    }

    fn start_drawer_anim(&mut self, edge: Edge, target: f64, on_done: AnimDone, instant: bool) {
        let duration = self.options.anim_duration;
        let tick = self.options.anim_tick;
        let Some(collapser) = self
            .collapser_id(edge)
            .and_then(|id| self.arena.collapser_mut(id))
        else {
            return;
        };
        if instant || duration.is_zero() {
            collapser.anim = None;
            collapser.pos = target;
            self.finish_animation(on_done);
        } else {
            collapser.anim = Some(PosAnimation::new(
                collapser.pos,
                target,
                duration,
                tick,
                Some(on_done),
            ));
        }
        self.mark_dirty();
    }

    /// Closes the drawer on `edge`, remembering the active panel's size for
    /// the next expand.
    pub fn collapse(&mut self, edge: Edge, instant: bool) -> bool {
        let Some(collapser) = self.collapser(edge) else {
            return false;
        };
        let extent = collapser.rect.extent(edge.axis());
        let open = collapser.is_open();
        let Some(frame) = self.drawer_frame(edge) else {
            return false;
        };
        let Some(f) = self.arena.frame(frame) else {
            return false;
        };
        if f.current.is_none() && !open {
            return false;
        }
        if let Some(panel) = f.current_panel()
            && extent > self.options.title_height
            && let Some(p) = self.arena.panel_mut(panel)
        {
            p.init_size = Some(match edge {
                Edge::Left | Edge::Right => {
                    MeasureSize::new(Measure::Pixels(extent), Measure::INFINITE)
                }
                Edge::Top | Edge::Bottom => {
                    MeasureSize::new(Measure::INFINITE, Measure::Pixels(extent))
                }
            });
        }
        if let Some(f) = self.arena.frame_mut(frame) {
            if f.current.is_some() {
                f.collapsed_tab = f.current;
            }
            f.set_current(None);
        }
        self.start_drawer_anim(edge, closed_pos(edge), AnimDone::DrawerClosed(edge), instant);
        tracing::debug!(?edge, instant, "collapsing drawer");
        true
    }

    /// Opens the drawer on `edge` at the size its last active panel had.
    pub fn expand(&mut self, edge: Edge) -> bool {
        let Some(frame) = self.drawer_frame(edge) else {
            return false;
        };
        let Some(f) = self.arena.frame(frame) else {
            return false;
        };
        if f.panels.is_empty() || f.current.is_some() {
            return false;
        }
        let tab = f
            .collapsed_tab
            .filter(|tab| *tab < f.panels.len())
            .unwrap_or(0);
        let panel = f.panels[tab];
        let total = self.edge_total(edge);
        let axis = edge.axis();
        let stored = self
            .arena
            .panel(panel)
            .and_then(|p| p.init_size)
            .map(|size| {
                let measure = match axis {
                    Orientation::Horizontal => size.x,
                    Orientation::Vertical => size.y,
                };
                measure.resolve(total)
            })
            .filter(|extent| extent.is_finite() && *extent > self.options.title_height);
        let extent = stored.unwrap_or(total * DEFAULT_DRAWER_FRACTION);
        let target = pos_for_extent(edge, extent, total, self.options.title_height);
        if let Some(f) = self.arena.frame_mut(frame) {
            f.set_current(Some(tab));
        }
        self.start_drawer_anim(edge, target, AnimDone::DrawerOpened(edge), false);
        tracing::debug!(?edge, extent, "expanding drawer");
        true
    }

    pub(crate) fn finish_animation(&mut self, done: AnimDone) {
        match done {
            AnimDone::DrawerOpened(edge) => {
                if let Some(frame) = self.drawer_frame(edge) {
                    self.focus_frame(frame);
                }
            }
            AnimDone::DrawerClosed(edge) => {
                if let Some(frame) = self.drawer_frame(edge) {
                    self.forget_focus(frame);
                }
            }
        }
        tracing::trace!(?done, "animation finished");
    }

    /// Everything to paint, back to front.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut items: Vec<DrawItem> = self
            .docked_frames()
            .into_iter()
            .map(DrawItem::Frame)
            .collect();
        let mut splitters = Vec::new();
        self.splitters_under(self.root, &mut splitters);
        items.extend(splitters.into_iter().filter_map(|id| {
            self.arena.splitter(id).map(|s| DrawItem::Bar {
                owner: id,
                rect: s.bar_rect,
                is_static: s.is_static,
            })
        }));
        for id in self.collapsers.values() {
            let Some(collapser) = self.arena.collapser(*id) else {
                continue;
            };
            if let Some(drawer) = self.arena.drawer(collapser.drawer) {
                items.push(DrawItem::Frame(drawer.frame));
            }
            if !collapser.bar_rect.is_empty() {
                items.push(DrawItem::Bar {
                    owner: *id,
                    rect: collapser.bar_rect,
                    is_static: false,
                });
            }
        }
        items.extend(self.floating.iter().copied().map(DrawItem::Frame));
        items
    }
}

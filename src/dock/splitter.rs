use std::time::{Duration, Instant};

use super::{DockNode, NodeId, NodeKind};
use crate::layout::{Edge, Orientation, Rect};

/// Follow-up the docker runs when a divider animation lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimDone {
    DrawerOpened(Edge),
    DrawerClosed(Edge),
}

/// A stepped divider animation. The position only changes once per `tick`
/// so every intermediate step gets a full layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosAnimation {
    pub from: f64,
    pub target: f64,
    /// Set by the first tick that sees the animation.
    pub started: Option<Instant>,
    pub duration: Duration,
    pub tick: Duration,
    pub on_done: Option<AnimDone>,
}

impl PosAnimation {
    pub fn new(
        from: f64,
        target: f64,
        duration: Duration,
        tick: Duration,
        on_done: Option<AnimDone>,
    ) -> Self {
        Self {
            from,
            target,
            started: None,
            duration,
            tick,
            on_done,
        }
    }

    /// Position at `now` and whether the animation has finished.
    pub fn step(&mut self, now: Instant) -> (f64, bool) {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.target, true);
        }
        let tick = self.tick.max(Duration::from_millis(1)).as_nanos();
        let steps = elapsed.as_nanos() / tick;
        let total = self.duration.as_nanos().div_ceil(tick).max(1);
        let t = (steps as f64 / total as f64).min(1.0);
        (self.from + (self.target - self.from) * t, t >= 1.0)
    }
}

/// A binary split with a draggable bar.
#[derive(Debug, Clone)]
pub struct Splitter {
    pub(crate) parent: Option<NodeId>,
    pub(crate) orientation: Orientation,
    pub(crate) pos: f64,
    /// Still choosing the position from the panes' preferred sizes.
    pub(crate) best_pos: bool,
    pub(crate) panes: [Option<NodeId>; 2],
    pub(crate) anim: Option<PosAnimation>,
    pub(crate) rect: Rect,
    pub(crate) bar_rect: Rect,
    pub(crate) is_static: bool,
}

impl Splitter {
    pub fn new(parent: Option<NodeId>, orientation: Orientation) -> Self {
        Self {
            parent,
            orientation,
            pos: 0.5,
            best_pos: true,
            panes: [None, None],
            anim: None,
            rect: Rect::default(),
            bar_rect: Rect::default(),
            is_static: false,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn pos(&self) -> f64 {
        self.pos
    }

    /// Clamps to `[0, 1]` and leaves best-position mode.
    pub(crate) fn set_pos(&mut self, pos: f64) {
        self.pos = pos.clamp(0.0, 1.0);
        self.best_pos = false;
    }

    pub fn is_best_pos(&self) -> bool {
        self.best_pos
    }

    pub fn pane(&self, index: usize) -> Option<NodeId> {
        self.panes.get(index).copied().flatten()
    }

    pub fn panes(&self) -> [Option<NodeId>; 2] {
        self.panes
    }

    /// The pane that is not `child`.
    pub fn other(&self, child: NodeId) -> Option<NodeId> {
        match self.panes {
            [Some(a), b] if a == child => b,
            [a, Some(b)] if b == child => a,
            _ => None,
        }
    }

    pub(crate) fn replace_pane(&mut self, old: NodeId, new: NodeId) -> bool {
        for pane in self.panes.iter_mut() {
            if *pane == Some(old) {
                *pane = Some(new);
                return true;
            }
        }
        false
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn bar_rect(&self) -> Rect {
        self.bar_rect
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_animating(&self) -> bool {
        self.anim.is_some()
    }
}

impl DockNode for Splitter {
    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Splitter
    }
}

//! The docking tree.
//!
//! Every node lives in an [`Arena`] owned by the [`Docker`] and is addressed
//! by a stable [`NodeId`]. Parents and children refer to each other by id,
//! so a node never holds a reference into its owner.
//!
//! Structure:
//!
//! - the root tree is a binary tree of [`Splitter`]s whose leaves are
//!   [`Frame`]s,
//! - floating frames have no parent and live in the docker's z-ordered list,
//! - each [`Collapser`] owns one [`Drawer`] which owns one drawer frame,
//! - [`Panel`]s are only ever children of frames (or detached).

mod collapser;
mod custom_tabs;
mod docker;
mod events;
mod frame;
mod ghost;
mod input;
mod panel;
mod persist;
mod splitter;
mod update;

use std::collections::BTreeMap;
use std::fmt;

pub use crate::layout::DockLocation;
pub use collapser::{Collapser, Drawer};
pub use custom_tabs::{CustomTab, TabWidget};
pub use docker::{DockTarget, Docker, DrawItem};
pub use events::{DockerEventHandler, EventHandler, EventHandlers, EventPayload, EventType};
pub use frame::{Frame, FrameButton, FrameHit};
pub use ghost::Ghost;
pub use input::{DragMode, MouseButton};
pub use panel::{LayoutItem, Panel, PanelButton, PanelFactory, PanelOptions, PanelType};
pub use persist::{
    SavedCollapser, SavedFrame, SavedLayout, SavedNode, SavedPanel, SavedSplitter, SavedTabWidget,
};
pub use splitter::{AnimDone, PosAnimation, Splitter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Panel,
    Frame,
    Splitter,
    Collapser,
    Drawer,
}

/// What every node in the tree can report about itself.
pub trait DockNode {
    fn parent(&self) -> Option<NodeId>;
    fn set_parent(&mut self, parent: Option<NodeId>);
    fn kind(&self) -> NodeKind;
}

#[derive(Debug)]
pub enum Node {
    Panel(Panel),
    Frame(Frame),
    Splitter(Splitter),
    Collapser(Collapser),
    Drawer(Drawer),
}

impl Node {
    fn as_dock_node(&self) -> &dyn DockNode {
        match self {
            Node::Panel(n) => n,
            Node::Frame(n) => n,
            Node::Splitter(n) => n,
            Node::Collapser(n) => n,
            Node::Drawer(n) => n,
        }
    }

    fn as_dock_node_mut(&mut self) -> &mut dyn DockNode {
        match self {
            Node::Panel(n) => n,
            Node::Frame(n) => n,
            Node::Splitter(n) => n,
            Node::Collapser(n) => n,
            Node::Drawer(n) => n,
        }
    }
}

impl DockNode for Node {
    fn parent(&self) -> Option<NodeId> {
        self.as_dock_node().parent()
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.as_dock_node_mut().set_parent(parent);
    }

    fn kind(&self) -> NodeKind {
        self.as_dock_node().kind()
    }
}

macro_rules! typed_access {
    ($get:ident, $variant:ident, $ty:ty) => {
        pub(crate) fn $get(&self, id: NodeId) -> Option<&$ty> {
            match self.nodes.get(&id) {
                Some(Node::$variant(node)) => Some(node),
                _ => None,
            }
        }
    };
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        typed_access!($get, $variant, $ty);

        pub(crate) fn $get_mut(&mut self, id: NodeId) -> Option<&mut $ty> {
            match self.nodes.get_mut(&id) {
                Some(Node::$variant(node)) => Some(node),
                _ => None,
            }
        }
    };
}

#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: BTreeMap<NodeId, Node>,
    next: u64,
}

impl Arena {
    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        self.next += 1;
        let id = NodeId(self.next);
        self.nodes.insert(id, node);
        id
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub(crate) fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(&id).map(|node| node.kind())
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent())
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.set_parent(parent);
        }
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub(crate) fn panels(&self) -> impl Iterator<Item = (NodeId, &Panel)> + '_ {
        self.nodes.iter().filter_map(|(id, node)| match node {
            Node::Panel(panel) => Some((*id, panel)),
            _ => None,
        })
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    typed_access!(panel, panel_mut, Panel, Panel);
    typed_access!(frame, frame_mut, Frame, Frame);
    typed_access!(splitter, splitter_mut, Splitter, Splitter);
    typed_access!(collapser, collapser_mut, Collapser, Collapser);
    // Drawers only ever change parent, which goes through `set_parent`.
    typed_access!(drawer, Drawer, Drawer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_ids_are_stable_and_typed() {
        let mut arena = Arena::default();
        let frame = arena.insert(Node::Frame(Frame::new(None)));
        let panel = arena.insert(Node::Panel(Panel::new("notes")));
        arena.set_parent(panel, Some(frame));
        assert_eq!(arena.kind(frame), Some(NodeKind::Frame));
        assert_eq!(arena.parent(panel), Some(frame));
        assert!(arena.panel(frame).is_none());
        assert!(arena.frame(frame).is_some());
        arena.remove(frame);
        assert!(!arena.contains(frame));
        let next = arena.insert(Node::Frame(Frame::new(None)));
        assert_ne!(next, frame);
        assert_eq!(format!("{next}"), "#3");
    }

    #[test]
    fn drawer_lookup_follows_set_parent() {
        let mut arena = Arena::default();
        let frame = arena.insert(Node::Frame(Frame::new(None)));
        let drawer = arena.insert(Node::Drawer(Drawer { parent: None, frame }));
        let collapser = Collapser::new(crate::layout::Edge::Left, drawer);
        let collapser = arena.insert(Node::Collapser(collapser));
        arena.set_parent(drawer, Some(collapser));
        assert_eq!(arena.drawer(drawer).map(|d| d.frame), Some(frame));
        assert_eq!(arena.drawer(drawer).and_then(|d| d.parent), Some(collapser));
        assert!(arena.drawer(frame).is_none());
    }
}

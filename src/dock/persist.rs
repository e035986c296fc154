//! Saving and restoring the whole docking layout as JSON.
//!
//! The format is a tree of tagged nodes (`wcSplitter`, `wcFrame`,
//! `wcPanel`) under `root`, plus the floating frames and the drawers.
//! Infinite sizes are written as the string `"Infinity"`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::custom_tabs::CustomTab;
use super::docker::Docker;
use super::events::{EventPayload, EventType};
use super::frame::Frame;
use super::panel::{LayoutItem, Panel, PanelOptions};
use super::splitter::Splitter;
use super::{Node, NodeId};
use crate::config::MeasureSize;
use crate::constants::PLACEHOLDER_TYPE;
use crate::error::{DockError, DockResult};
use crate::layout::{Edge, Orientation, Point, Rect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLayout {
    pub root: SavedNode,
    #[serde(default)]
    pub floating: Vec<SavedNode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub collapsers: BTreeMap<Edge, SavedCollapser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SavedNode {
    #[serde(rename = "wcSplitter")]
    Splitter(SavedSplitter),
    #[serde(rename = "wcFrame")]
    Frame(SavedFrame),
    #[serde(rename = "wcPanel")]
    Panel(SavedPanel),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSplitter {
    pub orientation: Orientation,
    pub pos: f64,
    pub panes: Vec<SavedNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFrame {
    pub panels: Vec<SavedNode>,
    pub current: Option<usize>,
    pub tab_orientation: Edge,
    /// Absolute rect, present on floating frames only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float: Option<Rect>,
    #[serde(default)]
    pub modal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPanel {
    pub panel_type: String,
    pub title: String,
    #[serde(default = "visible_by_default")]
    pub title_visible: bool,
    #[serde(default)]
    pub init_size: Option<MeasureSize>,
    #[serde(default)]
    pub min_size: MeasureSize,
    #[serde(default = "unbounded")]
    pub max_size: MeasureSize,
    #[serde(default)]
    pub scroll: Point,
    #[serde(default = "visible_by_default")]
    pub moveable: bool,
    #[serde(default = "visible_by_default")]
    pub closeable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toggled_buttons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_tabs: Vec<SavedTabWidget>,
    /// Whatever the panel's `SaveLayout` handlers wrote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTabWidget {
    pub item: usize,
    pub titles: Vec<String>,
    pub closeable: Vec<bool>,
    pub current: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCollapser {
    pub pos: f64,
    #[serde(default)]
    pub collapsed_tab: Option<usize>,
    pub frame: SavedNode,
}

fn visible_by_default() -> bool {
    true
}

fn unbounded() -> MeasureSize {
    MeasureSize::INFINITE
}

fn malformed(message: impl Into<String>) -> DockError {
    DockError::MalformedState(message.into())
}

impl Docker {
    /// Serializes the current layout.
    pub fn save(&mut self) -> DockResult<String> {
        let layout = self.snapshot();
        serde_json::to_string(&layout).map_err(DockError::Serialize)
    }

    pub fn save_to_path(&mut self, path: impl AsRef<Path>) -> DockResult<()> {
        let text = self.save()?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// The layout as data. Fires `SaveLayout` on every panel so handlers
    /// can attach their own state.
    pub fn snapshot(&mut self) -> SavedLayout {
        let root = self.save_node(self.root);
        let floating = self
            .floating
            .clone()
            .into_iter()
            .map(|frame| self.save_node(frame))
            .collect();
        let mut collapsers = BTreeMap::new();
        for (edge, id) in self.collapsers.clone() {
            let Some(collapser) = self.arena.collapser(id) else {
                continue;
            };
            let pos = collapser.pos;
            let Some(frame) = self.drawer_frame(edge) else {
                continue;
            };
            let collapsed_tab = self.arena.frame(frame).and_then(|f| f.collapsed_tab);
            collapsers.insert(
                edge,
                SavedCollapser {
                    pos,
                    collapsed_tab,
                    frame: self.save_node(frame),
                },
            );
        }
        SavedLayout {
            root,
            floating,
            collapsers,
        }
    }

    fn save_node(&mut self, id: NodeId) -> SavedNode {
        match self.arena.get(id) {
            Some(Node::Splitter(splitter)) => {
                let (orientation, pos, panes) = (splitter.orientation, splitter.pos, splitter.panes);
                SavedNode::Splitter(SavedSplitter {
                    orientation,
                    pos,
                    panes: panes
                        .into_iter()
                        .flatten()
                        .map(|pane| self.save_node(pane))
                        .collect(),
                })
            }
            Some(Node::Frame(frame)) => {
                let panels = frame.panels.clone();
                let saved = SavedFrame {
                    panels: Vec::new(),
                    current: frame.current,
                    tab_orientation: frame.tab_orientation,
                    float: frame.floating.then_some(frame.float_rect),
                    modal: frame.modal,
                };
                SavedNode::Frame(SavedFrame {
                    panels: panels.into_iter().map(|p| self.save_node(p)).collect(),
                    ..saved
                })
            }
            Some(Node::Panel(_)) => SavedNode::Panel(self.save_panel(id)),
            _ => SavedNode::Frame(SavedFrame {
                panels: Vec::new(),
                current: None,
                tab_orientation: Edge::Top,
                float: None,
                modal: false,
            }),
        }
    }

    fn save_panel(&mut self, id: NodeId) -> SavedPanel {
        let mut payload = EventPayload::Layout(Value::Null);
        self.fire(id, EventType::SaveLayout, &mut payload);
        let custom_data = match payload {
            EventPayload::Layout(Value::Null) => None,
            EventPayload::Layout(value) => Some(value),
            _ => None,
        };
        let Some(panel) = self.arena.panel(id) else {
            return SavedPanel {
                panel_type: PLACEHOLDER_TYPE.to_string(),
                title: String::new(),
                title_visible: false,
                init_size: None,
                min_size: MeasureSize::ZERO,
                max_size: MeasureSize::INFINITE,
                scroll: Point::default(),
                moveable: false,
                closeable: false,
                toggled_buttons: Vec::new(),
                custom_tabs: Vec::new(),
                custom_data: None,
            };
        };
        let custom_tabs = panel
            .layout
            .items()
            .iter()
            .enumerate()
            .filter_map(|(item, grid_item)| match &grid_item.content {
                LayoutItem::Tabs(widget) => Some(SavedTabWidget {
                    item,
                    titles: widget.tabs().iter().map(|t| t.title.clone()).collect(),
                    closeable: widget.tabs().iter().map(|t| t.closeable).collect(),
                    current: widget.current(),
                }),
                LayoutItem::Text(_) => None,
            })
            .collect();
        SavedPanel {
            panel_type: panel.type_name.clone(),
            title: panel.title.clone(),
            title_visible: panel.title_visible,
            init_size: panel.init_size,
            min_size: panel.min_size,
            max_size: panel.max_size,
            scroll: panel.scroll,
            moveable: panel.moveable,
            closeable: panel.closeable,
            toggled_buttons: panel
                .buttons
                .iter()
                .filter(|b| b.toggled)
                .map(|b| b.name.clone())
                .collect(),
            custom_tabs,
            custom_data,
        }
    }

    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> DockResult<()> {
        let text = std::fs::read_to_string(path)?;
        self.restore(&text)
    }

    /// Replaces the layout with a saved one. The text is parsed and checked
    /// in full before anything is torn down, so on error the current layout
    /// is untouched.
    pub fn restore(&mut self, text: &str) -> DockResult<()> {
        let layout: SavedLayout = serde_json::from_str(text).map_err(DockError::Parse)?;
        self.restore_layout(layout)
    }

    pub fn restore_layout(&mut self, layout: SavedLayout) -> DockResult<()> {
        self.validate(&layout)?;

        self.close_all();
        self.reset_tree();
        let mut restored = Vec::new();

        let Some(root) = self.build_node(&layout.root, None, &mut restored) else {
            return Err(malformed("root is not a splitter or frame"));
        };
        self.root = root;

        for saved in &layout.floating {
            let SavedNode::Frame(frame) = saved else {
                continue;
            };
            let id = self.build_frame(frame, None, &mut restored);
            if let Some(f) = self.arena.frame_mut(id) {
                f.floating = true;
                f.modal = frame.modal;
                f.float_rect = frame.float.unwrap_or_default();
            }
            self.floating.push(id);
        }

        for (edge, saved) in &layout.collapsers {
            let SavedNode::Frame(frame) = &saved.frame else {
                continue;
            };
            let collapser = self.ensure_collapser(*edge);
            let Some(drawer_frame) = self.drawer_frame(*edge) else {
                continue;
            };
            for node in &frame.panels {
                if let SavedNode::Panel(panel) = node
                    && let Some(id) = self.build_panel(panel, &mut restored)
                {
                    self.attach(id, drawer_frame, None);
                }
            }
            if let Some(f) = self.arena.frame_mut(drawer_frame) {
                f.current = frame.current.filter(|cur| *cur < f.panels.len());
                f.collapsed_tab = saved.collapsed_tab.filter(|tab| *tab < f.panels.len());
            }
            if let Some(c) = self.arena.collapser_mut(collapser) {
                c.pos = saved.pos.clamp(0.0, 1.0);
            }
        }

        self.mark_dirty();
        for (panel, data) in restored {
            self.fire_simple(panel, EventType::Init);
            let mut payload = EventPayload::Layout(data.unwrap_or(Value::Null));
            self.fire(panel, EventType::RestoreLayout, &mut payload);
        }
        tracing::debug!(
            frames = self.all_frames().len(),
            floating = self.floating.len(),
            "restored layout"
        );
        Ok(())
    }

    fn validate(&self, layout: &SavedLayout) -> DockResult<()> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        match &layout.root {
            SavedNode::Panel(_) => return Err(malformed("root cannot be a panel")),
            node => self.validate_node(node, false, &mut counts)?,
        }
        for node in &layout.floating {
            let SavedNode::Frame(frame) = node else {
                return Err(malformed("floating entries must be frames"));
            };
            if frame.float.is_none() {
                return Err(malformed("floating frame without a rect"));
            }
            self.validate_node(node, false, &mut counts)?;
        }
        for (edge, collapser) in &layout.collapsers {
            if *edge == Edge::Top {
                return Err(malformed("there is no top drawer"));
            }
            if !matches!(collapser.frame, SavedNode::Frame(_)) {
                return Err(malformed("drawer content must be a frame"));
            }
            self.validate_node(&collapser.frame, true, &mut counts)?;
        }
        for (type_name, count) in counts {
            if let Some(limit) = self.registry.get(type_name).and_then(|t| t.limit)
                && count > limit
            {
                return Err(DockError::PanelLimitReached(type_name.to_string()));
            }
        }
        Ok(())
    }

    fn validate_node<'a>(
        &self,
        node: &'a SavedNode,
        in_drawer: bool,
        counts: &mut BTreeMap<&'a str, usize>,
    ) -> DockResult<()> {
        match node {
            SavedNode::Splitter(splitter) => {
                if splitter.panes.len() != 2 {
                    return Err(malformed("a splitter needs exactly two panes"));
                }
                if !splitter.pos.is_finite() {
                    return Err(malformed("splitter position is not a number"));
                }
                for pane in &splitter.panes {
                    if matches!(pane, SavedNode::Panel(_)) {
                        return Err(malformed("a splitter pane cannot be a panel"));
                    }
                    self.validate_node(pane, in_drawer, counts)?;
                }
            }
            SavedNode::Frame(frame) => {
                if frame.panels.is_empty() && !in_drawer {
                    return Err(malformed("empty frame"));
                }
                if frame.current.is_some_and(|cur| cur >= frame.panels.len()) {
                    return Err(malformed("current tab out of range"));
                }
                if frame.current.is_none() && !frame.panels.is_empty() && !in_drawer {
                    return Err(malformed("a frame with panels needs a current tab"));
                }
                for panel in &frame.panels {
                    if !matches!(panel, SavedNode::Panel(_)) {
                        return Err(malformed("frames can only hold panels"));
                    }
                    self.validate_node(panel, in_drawer, counts)?;
                }
            }
            SavedNode::Panel(panel) => {
                let type_name = panel.panel_type.as_str();
                if type_name != PLACEHOLDER_TYPE && !self.registry.contains_key(type_name) {
                    return Err(DockError::UnknownPanelType(type_name.to_string()));
                }
                *counts.entry(type_name).or_default() += 1;
            }
        }
        Ok(())
    }

    fn build_node(
        &mut self,
        node: &SavedNode,
        parent: Option<NodeId>,
        restored: &mut Vec<(NodeId, Option<Value>)>,
    ) -> Option<NodeId> {
        match node {
            SavedNode::Splitter(saved) => {
                let mut splitter = Splitter::new(parent, saved.orientation);
                splitter.pos = saved.pos.clamp(0.0, 1.0);
                splitter.best_pos = false;
                let id = self.arena.insert(Node::Splitter(splitter));
                let mut panes = [None, None];
                for (slot, pane) in panes.iter_mut().zip(&saved.panes) {
                    *slot = self.build_node(pane, Some(id), restored);
                }
                if let Some(splitter) = self.arena.splitter_mut(id) {
                    splitter.panes = panes;
                }
                Some(id)
            }
            SavedNode::Frame(saved) => Some(self.build_frame(saved, parent, restored)),
            SavedNode::Panel(_) => None,
        }
    }

    fn build_frame(
        &mut self,
        saved: &SavedFrame,
        parent: Option<NodeId>,
        restored: &mut Vec<(NodeId, Option<Value>)>,
    ) -> NodeId {
        let mut frame = Frame::new(parent);
        frame.tab_orientation = saved.tab_orientation;
        let id = self.arena.insert(Node::Frame(frame));
        for node in &saved.panels {
            if let SavedNode::Panel(panel) = node
                && let Some(panel) = self.build_panel(panel, restored)
            {
                self.attach(panel, id, None);
            }
        }
        if let Some(frame) = self.arena.frame_mut(id) {
            frame.current = saved.current.filter(|cur| *cur < frame.panels.len());
        }
        id
    }

    fn build_panel(
        &mut self,
        saved: &SavedPanel,
        restored: &mut Vec<(NodeId, Option<Value>)>,
    ) -> Option<NodeId> {
        if saved.panel_type == PLACEHOLDER_TYPE {
            return Some(self.arena.insert(Node::Panel(Panel::placeholder())));
        }
        let options = PanelOptions {
            title: Some(saved.title.clone()),
            ..PanelOptions::default()
        };
        let id = match self.create_panel(&saved.panel_type, &options) {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(%err, "skipping panel while restoring");
                return None;
            }
        };
        let p = self.arena.panel_mut(id)?;
        p.title = saved.title.clone();
        p.title_visible = saved.title_visible;
        p.init_size = saved.init_size;
        p.min_size = saved.min_size;
        p.max_size = saved.max_size;
        p.scroll = saved.scroll;
        p.moveable = saved.moveable;
        p.closeable = saved.closeable;
        for button in p.buttons.iter_mut() {
            button.toggled = saved.toggled_buttons.contains(&button.name);
        }
        for tabs in &saved.custom_tabs {
            if let Some(widget) = p.tab_widget_mut(tabs.item) {
                let restored_tabs = tabs
                    .titles
                    .iter()
                    .zip(tabs.closeable.iter().chain(std::iter::repeat(&true)))
                    .map(|(title, closeable)| CustomTab {
                        title: title.clone(),
                        closeable: *closeable,
                    })
                    .collect();
                widget.restore(restored_tabs, tabs.current);
            }
        }
        restored.push((id, saved.custom_data.clone()));
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DockerOptions, Measure};
    use crate::dock::{DockLocation, DockTarget, PanelType};

    fn docker() -> Docker {
        let mut docker = Docker::new(DockerOptions::terminal());
        docker.register_panel_type("notes", PanelType::new(|_, _| Box::new(())));
        docker.resize_surface(Rect::new(0.0, 0.0, 100.0, 40.0));
        docker
    }

    #[test]
    fn infinity_is_written_as_a_string() {
        let mut docker = docker();
        docker
            .add_panel("notes", DockLocation::Left, DockTarget::Auto, PanelOptions::default())
            .expect("add");
        let text = docker.save().expect("save");
        assert!(text.contains(r#""type":"wcFrame""#));
        assert!(text.contains(r#""maxSize":{"x":"Infinity","y":"Infinity"}"#));
    }

    #[test]
    fn placeholder_layout_round_trips() {
        let mut docker = docker();
        let text = docker.save().expect("save");
        assert!(text.contains(PLACEHOLDER_TYPE));
        docker.restore(&text).expect("restore");
        assert_eq!(docker.save().expect("save"), text);
    }

    #[test]
    fn unknown_type_leaves_layout_untouched() {
        let mut docker = docker();
        let panel = docker
            .add_panel("notes", DockLocation::Left, DockTarget::Auto, PanelOptions::default())
            .expect("add");
        let before = docker.save().expect("save");
        let bad = before.replace(r#""panelType":"notes""#, r#""panelType":"ghost""#);
        assert!(matches!(
            docker.restore(&bad),
            Err(DockError::UnknownPanelType(name)) if name == "ghost"
        ));
        assert!(docker.panel(panel).is_some());
        assert_eq!(docker.save().expect("save"), before);
    }

    #[test]
    fn docked_frame_without_current_tab_is_rejected() {
        let mut docker = docker();
        docker
            .add_panel("notes", DockLocation::Left, DockTarget::Auto, PanelOptions::default())
            .expect("add");
        let before = docker.save().expect("save");
        assert!(before.contains(r#""current":0"#));
        let bad = before.replace(r#""current":0"#, r#""current":null"#);
        assert!(matches!(docker.restore(&bad), Err(DockError::MalformedState(_))));
        assert_eq!(docker.save().expect("save"), before);
        let root = docker.frame(docker.root()).expect("root frame");
        assert_eq!(root.current(), Some(0));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let mut docker = docker();
        assert!(matches!(docker.restore("{not json"), Err(DockError::Parse(_))));
        assert!(matches!(
            docker.restore(r#"{"root":{"type":"wcPanel","panelType":"notes","title":"x"}}"#),
            Err(DockError::MalformedState(_))
        ));
    }

    #[test]
    fn custom_data_reaches_restore_handlers() {
        let mut docker = docker();
        docker.register_panel_type(
            "counter",
            PanelType::new(|panel, _| {
                panel.on(EventType::SaveLayout, |payload| {
                    *payload = EventPayload::Layout(serde_json::json!({ "count": 7 }));
                    true
                });
                panel.set_init_size(MeasureSize::new(Measure::Percent(30.0), Measure::INFINITE));
                Box::new(())
            }),
        );
        docker
            .add_panel("counter", DockLocation::Left, DockTarget::Auto, PanelOptions::default())
            .expect("add");
        let text = docker.save().expect("save");
        assert!(text.contains(r#""customData":{"count":7}"#));
        assert!(text.contains(r#""initSize":{"x":"30%","y":"Infinity"}"#));

        let seen = std::rc::Rc::new(std::cell::RefCell::new(None));
        let sink = seen.clone();
        docker.on(EventType::RestoreLayout, move |_, payload| {
            if let EventPayload::Layout(value) = payload {
                *sink.borrow_mut() = Some(value.clone());
            }
            true
        });
        docker.restore(&text).expect("restore");
        assert_eq!(*seen.borrow(), Some(serde_json::json!({ "count": 7 })));
    }
}

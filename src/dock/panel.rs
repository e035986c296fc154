use std::any::Any;
use std::fmt;

use serde_json::Value;

use super::custom_tabs::TabWidget;
use super::events::{EventHandlers, EventPayload, EventType};
use super::{DockNode, NodeId, NodeKind};
use crate::config::MeasureSize;
use crate::constants::PLACEHOLDER_TYPE;
use crate::layout::grid::GridLayout;
use crate::layout::{Point, Rect, Size};

/// Creates a panel's content. Called exactly once per panel instance; the
/// returned controller is stored on the panel untouched.
pub type PanelFactory = Box<dyn Fn(&mut Panel, &PanelOptions) -> Box<dyn Any>>;

/// A registered panel type.
pub struct PanelType {
    pub(crate) factory: PanelFactory,
    pub(crate) is_private: bool,
    pub(crate) limit: Option<usize>,
    pub(crate) persistent: bool,
    pub(crate) title: Option<String>,
}

impl PanelType {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&mut Panel, &PanelOptions) -> Box<dyn Any> + 'static,
    {
        Self {
            factory: Box::new(factory),
            is_private: false,
            limit: None,
            persistent: false,
            title: None,
        }
    }

    /// Hidden from [`Docker::panel_types`](super::Docker::panel_types) unless
    /// private types are requested.
    pub fn private(mut self) -> Self {
        self.is_private = true;
        self
    }

    /// Caps how many instances may exist at once.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Closing such a panel detaches it; adding the type again reopens it.
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl fmt::Debug for PanelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelType")
            .field("is_private", &self.is_private)
            .field("limit", &self.limit)
            .field("persistent", &self.persistent)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Options passed through `add_panel` to the factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelOptions {
    pub title: Option<String>,
    /// Free-form argument for the factory.
    pub arg: Option<Value>,
    /// Requested size of the new placement.
    pub size: Option<Size>,
    /// Top-left corner for floating placements.
    pub position: Option<Point>,
}

/// A custom title-bar button.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelButton {
    pub name: String,
    pub label: String,
    pub tooltip: String,
    /// Toggle buttons flip `toggled` on every click.
    pub toggle: bool,
    pub toggled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
    Text(String),
    Tabs(TabWidget),
}

pub struct Panel {
    pub(crate) parent: Option<NodeId>,
    pub(crate) type_name: String,
    pub(crate) title: String,
    pub(crate) title_visible: bool,
    pub(crate) init_size: Option<MeasureSize>,
    pub(crate) min_size: MeasureSize,
    pub(crate) max_size: MeasureSize,
    pub(crate) scroll: Point,
    pub(crate) visible: bool,
    pub(crate) floating: bool,
    pub(crate) moveable: bool,
    pub(crate) closeable: bool,
    pub(crate) persistent: bool,
    pub(crate) placeholder: bool,
    pub(crate) buttons: Vec<PanelButton>,
    pub(crate) layout: GridLayout<LayoutItem>,
    pub(crate) handlers: EventHandlers,
    pub(crate) controller: Option<Box<dyn Any>>,
    /// Content area from the last layout pass.
    pub(crate) rect: Rect,
    /// Footprint asked for by the last move or add; consumed when the new
    /// placement is first laid out.
    pub(crate) requested_size: Option<Size>,
    pub(crate) attached_once: bool,
}

impl Panel {
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            parent: None,
            title: type_name.clone(),
            type_name,
            title_visible: true,
            init_size: None,
            min_size: MeasureSize::ZERO,
            max_size: MeasureSize::INFINITE,
            scroll: Point::default(),
            visible: false,
            floating: false,
            moveable: true,
            closeable: true,
            persistent: false,
            placeholder: false,
            buttons: Vec::new(),
            layout: GridLayout::new(),
            handlers: EventHandlers::default(),
            controller: None,
            rect: Rect::default(),
            requested_size: None,
            attached_once: false,
        }
    }

    pub(crate) fn placeholder() -> Self {
        let mut panel = Panel::new(PLACEHOLDER_TYPE);
        panel.title = String::new();
        panel.title_visible = false;
        panel.moveable = false;
        panel.closeable = false;
        panel.placeholder = true;
        panel
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn title_visible(&self) -> bool {
        self.title_visible
    }

    pub fn set_title_visible(&mut self, visible: bool) {
        self.title_visible = visible;
    }

    pub fn init_size(&self) -> Option<MeasureSize> {
        self.init_size
    }

    pub fn set_init_size(&mut self, size: MeasureSize) {
        self.init_size = Some(size);
    }

    pub fn min_size(&self) -> MeasureSize {
        self.min_size
    }

    pub fn set_min_size(&mut self, size: MeasureSize) {
        self.min_size = size;
    }

    pub fn max_size(&self) -> MeasureSize {
        self.max_size
    }

    pub fn set_max_size(&mut self, size: MeasureSize) {
        self.max_size = size;
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_floating(&self) -> bool {
        self.floating
    }

    pub fn moveable(&self) -> bool {
        self.moveable
    }

    pub fn set_moveable(&mut self, moveable: bool) {
        self.moveable = moveable;
    }

    pub fn closeable(&self) -> bool {
        self.closeable
    }

    pub fn set_closeable(&mut self, closeable: bool) {
        self.closeable = closeable;
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn set_persistent(&mut self, persistent: bool) {
        self.persistent = persistent;
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Content rect from the last layout pass.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn add_button(
        &mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        tooltip: impl Into<String>,
        toggle: bool,
    ) {
        self.buttons.push(PanelButton {
            name: name.into(),
            label: label.into(),
            tooltip: tooltip.into(),
            toggle,
            toggled: false,
        });
    }

    pub fn remove_button(&mut self, name: &str) -> bool {
        let before = self.buttons.len();
        self.buttons.retain(|button| button.name != name);
        self.buttons.len() != before
    }

    pub fn buttons(&self) -> &[PanelButton] {
        &self.buttons
    }

    pub fn button_toggled(&self, name: &str) -> Option<bool> {
        self.buttons
            .iter()
            .find(|button| button.name == name)
            .map(|button| button.toggled)
    }

    pub fn layout(&self) -> &GridLayout<LayoutItem> {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut GridLayout<LayoutItem> {
        &mut self.layout
    }

    pub fn on<F>(&mut self, event: EventType, handler: F)
    where
        F: FnMut(&mut EventPayload) -> bool + 'static,
    {
        self.handlers.on(event, handler);
    }

    pub fn off(&mut self, event: EventType) {
        self.handlers.off(event);
    }

    pub(crate) fn trigger(&mut self, event: EventType, payload: &mut EventPayload) -> bool {
        self.handlers.trigger(event, payload)
    }

    pub fn controller<T: 'static>(&self) -> Option<&T> {
        self.controller.as_deref()?.downcast_ref::<T>()
    }

    pub fn controller_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.controller.as_deref_mut()?.downcast_mut::<T>()
    }

    /// The tab widget at grid item `item`, if that item is one.
    pub fn tab_widget(&self, item: usize) -> Option<&TabWidget> {
        match &self.layout.item(item)?.content {
            LayoutItem::Tabs(widget) => Some(widget),
            LayoutItem::Text(_) => None,
        }
    }

    pub(crate) fn tab_widget_mut(&mut self, item: usize) -> Option<&mut TabWidget> {
        match &mut self.layout.item_mut(item)?.content {
            LayoutItem::Tabs(widget) => Some(widget),
            LayoutItem::Text(_) => None,
        }
    }

    /// Resolved minimum against the docking surface.
    pub(crate) fn min_px(&self, surface: Size) -> Size {
        self.min_size.resolve(surface)
    }

    pub(crate) fn max_px(&self, surface: Size) -> Size {
        self.max_size.resolve(surface)
    }

    /// Preferred size for a fresh placement: an explicit request first, then
    /// the declared initial size.
    pub(crate) fn preferred_px(&self, surface: Size) -> Option<Size> {
        self.requested_size
            .or_else(|| self.init_size.map(|size| size.resolve(surface)))
    }
}

impl DockNode for Panel {
    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Panel
    }
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("parent", &self.parent)
            .field("type_name", &self.type_name)
            .field("title", &self.title)
            .field("visible", &self.visible)
            .field("floating", &self.floating)
            .field("placeholder", &self.placeholder)
            .field("rect", &self.rect)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_downcasts_to_its_type() {
        let mut panel = Panel::new("counter");
        panel.controller = Some(Box::new(41_u32));
        *panel.controller_mut::<u32>().expect("u32 controller") += 1;
        assert_eq!(panel.controller::<u32>(), Some(&42));
        assert!(panel.controller::<String>().is_none());
    }

    #[test]
    fn sizes_resolve_against_surface() {
        let mut panel = Panel::new("notes");
        panel.set_min_size(MeasureSize::percent(10.0, 20.0));
        panel.set_init_size(MeasureSize::pixels(30.0, 5.0));
        let surface = Size::new(200.0, 50.0);
        assert_eq!(panel.min_px(surface), Size::new(20.0, 10.0));
        assert_eq!(panel.preferred_px(surface), Some(Size::new(30.0, 5.0)));
        panel.requested_size = Some(Size::new(1.0, 2.0));
        assert_eq!(panel.preferred_px(surface), Some(Size::new(1.0, 2.0)));
        assert!(panel.max_px(surface).width.is_infinite());
    }

    #[test]
    fn placeholder_is_fixed_and_untitled() {
        let panel = Panel::placeholder();
        assert!(panel.is_placeholder());
        assert!(!panel.moveable());
        assert!(!panel.closeable());
        assert!(!panel.title_visible());
    }
}

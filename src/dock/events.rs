use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::NodeId;
use crate::layout::{Point, Size};

/// Lifecycle notifications a panel (or the docker) can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventType {
    Init,
    Updated,
    VisibilityChanged,
    BeginDock,
    EndDock,
    GainFocus,
    LostFocus,
    /// Cancelable: a handler returning `false` keeps the panel open.
    Closing,
    Closed,
    PersistentOpened,
    PersistentClosed,
    ButtonClicked,
    Attached,
    Detached,
    MoveStarted,
    MoveEnded,
    Moved,
    ResizeStarted,
    ResizeEnded,
    Resized,
    OrderChanged,
    Scrolled,
    SaveLayout,
    RestoreLayout,
    CustomTabChanged,
    CustomTabClosed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventPayload {
    #[default]
    None,
    Position(Point),
    Size(Size),
    Visible(bool),
    Button {
        name: String,
        toggled: bool,
    },
    Scroll(Point),
    /// Per-panel save data. Save handlers fill it, restore handlers read it.
    Layout(Value),
    CustomTab {
        item: usize,
        index: usize,
        title: String,
    },
    Order {
        from: usize,
        to: usize,
    },
}

pub type EventHandler = Box<dyn FnMut(&mut EventPayload) -> bool>;

/// Docker-wide handler; receives the panel the event concerns, if any.
pub type DockerEventHandler = Box<dyn FnMut(Option<NodeId>, &mut EventPayload) -> bool>;

#[derive(Default)]
pub struct EventHandlers {
    handlers: BTreeMap<EventType, Vec<EventHandler>>,
}

impl EventHandlers {
    pub fn on<F>(&mut self, event: EventType, handler: F)
    where
        F: FnMut(&mut EventPayload) -> bool + 'static,
    {
        self.handlers
            .entry(event)
            .or_default()
            .push(Box::new(handler));
    }

    pub fn off(&mut self, event: EventType) {
        self.handlers.remove(&event);
    }

    /// Runs every handler for `event`. All handlers run even after a veto;
    /// the result is `false` if any of them returned `false`.
    pub fn trigger(&mut self, event: EventType, payload: &mut EventPayload) -> bool {
        let Some(list) = self.handlers.get_mut(&event) else {
            return true;
        };
        let mut accepted = true;
        for handler in list.iter_mut() {
            accepted &= handler(payload);
        }
        accepted
    }

    pub fn has(&self, event: EventType) -> bool {
        self.handlers.get(&event).is_some_and(|list| !list.is_empty())
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(event, list)| (event, list.len())))
            .finish()
    }
}

#[derive(Default)]
pub(crate) struct DockerHandlers {
    handlers: BTreeMap<EventType, Vec<DockerEventHandler>>,
}

impl DockerHandlers {
    pub(crate) fn on(&mut self, event: EventType, handler: DockerEventHandler) {
        self.handlers.entry(event).or_default().push(handler);
    }

    pub(crate) fn trigger(
        &mut self,
        event: EventType,
        panel: Option<NodeId>,
        payload: &mut EventPayload,
    ) -> bool {
        let Some(list) = self.handlers.get_mut(&event) else {
            return true;
        };
        let mut accepted = true;
        for handler in list.iter_mut() {
            accepted &= handler(panel, payload);
        }
        accepted
    }
}

impl fmt::Debug for DockerHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(event, list)| (event, list.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn every_handler_runs_and_any_veto_wins() {
        let calls = Rc::new(Cell::new(0));
        let mut handlers = EventHandlers::default();
        let c = calls.clone();
        handlers.on(EventType::Closing, move |_| {
            c.set(c.get() + 1);
            false
        });
        let c = calls.clone();
        handlers.on(EventType::Closing, move |_| {
            c.set(c.get() + 1);
            true
        });
        assert!(!handlers.trigger(EventType::Closing, &mut EventPayload::None));
        assert_eq!(calls.get(), 2);
        assert!(handlers.trigger(EventType::Closed, &mut EventPayload::None));
    }

    #[test]
    fn handlers_can_fill_the_payload() {
        let mut handlers = EventHandlers::default();
        handlers.on(EventType::SaveLayout, |payload| {
            *payload = EventPayload::Layout(serde_json::json!({ "lines": 3 }));
            true
        });
        let mut payload = EventPayload::None;
        handlers.trigger(EventType::SaveLayout, &mut payload);
        assert_eq!(
            payload,
            EventPayload::Layout(serde_json::json!({ "lines": 3 }))
        );
    }
}

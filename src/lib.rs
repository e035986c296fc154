//! Docking window manager engine.
//!
//! The [`dock`] module owns the splitter/frame/drawer tree, the drag state
//! machine and persistence. [`layout`] holds the pure geometry those pieces
//! are built on. [`ui`], [`drivers`] and [`event_loop`] put a docker on a
//! terminal using `ratatui` and `crossterm`.

pub mod config;
pub mod constants;
pub mod dock;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod layout;
pub mod log_buffer;
pub mod theme;
pub mod tracing_sub;
pub mod ui;

pub use config::{DockerOptions, Measure, MeasureSize, TabMetrics};
pub use dock::{
    DockLocation, DockNode, DockTarget, Docker, EventPayload, EventType, NodeId, NodeKind, Panel,
    PanelOptions, PanelType,
};
pub use error::{DockError, DockResult};
pub use layout::{Edge, Orientation, Point, Rect, Size};

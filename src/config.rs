//! Docker configuration.
//!
//! Every tunable the docking engine reads lives on [`DockerOptions`]. The
//! defaults are pixel-scale, matching a browser-like surface;
//! [`DockerOptions::terminal`] is the preset for a character-cell surface
//! where one unit is one cell.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::INFINITY_SENTINEL;
use crate::layout::Size;

/// A length given either in raw units or as a percentage of some basis.
///
/// Percentages are never cached: they are resolved against whatever basis
/// the caller passes at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMeasure", into = "RawMeasure")]
pub enum Measure {
    Pixels(f64),
    Percent(f64),
}

impl Measure {
    pub const ZERO: Measure = Measure::Pixels(0.0);
    pub const INFINITE: Measure = Measure::Pixels(f64::INFINITY);

    pub fn resolve(self, basis: f64) -> f64 {
        match self {
            Measure::Pixels(value) => value,
            Measure::Percent(pct) => basis * pct / 100.0,
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, Measure::Pixels(value) if value.is_infinite())
    }
}

impl Default for Measure {
    fn default() -> Self {
        Measure::ZERO
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Pixels(value) if value.is_infinite() => f.write_str(INFINITY_SENTINEL),
            Measure::Pixels(value) => write!(f, "{value}px"),
            Measure::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMeasureError(String);

impl fmt::Display for ParseMeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid measure `{}`", self.0)
    }
}

impl std::error::Error for ParseMeasureError {}

impl FromStr for Measure {
    type Err = ParseMeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == INFINITY_SENTINEL {
            return Ok(Measure::INFINITE);
        }
        let parse = |text: &str| {
            text.trim()
                .parse::<f64>()
                .map_err(|_| ParseMeasureError(s.to_string()))
        };
        if let Some(pct) = trimmed.strip_suffix('%') {
            return parse(pct).map(Measure::Percent);
        }
        if let Some(px) = trimmed.strip_suffix("px") {
            return parse(px).map(Measure::Pixels);
        }
        parse(trimmed).map(Measure::Pixels)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawMeasure {
    Number(f64),
    Text(String),
}

impl TryFrom<RawMeasure> for Measure {
    type Error = ParseMeasureError;

    fn try_from(raw: RawMeasure) -> Result<Self, Self::Error> {
        match raw {
            RawMeasure::Number(value) => Ok(Measure::Pixels(value)),
            RawMeasure::Text(text) => text.parse(),
        }
    }
}

impl From<Measure> for RawMeasure {
    fn from(measure: Measure) -> Self {
        match measure {
            Measure::Pixels(value) if value.is_finite() => RawMeasure::Number(value),
            other => RawMeasure::Text(other.to_string()),
        }
    }
}

/// A two-axis [`Measure`], resolved against a two-axis basis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasureSize {
    pub x: Measure,
    pub y: Measure,
}

impl MeasureSize {
    pub const ZERO: MeasureSize = MeasureSize {
        x: Measure::ZERO,
        y: Measure::ZERO,
    };
    pub const INFINITE: MeasureSize = MeasureSize {
        x: Measure::INFINITE,
        y: Measure::INFINITE,
    };

    pub fn new(x: Measure, y: Measure) -> Self {
        Self { x, y }
    }

    pub fn pixels(width: f64, height: f64) -> Self {
        Self {
            x: Measure::Pixels(width),
            y: Measure::Pixels(height),
        }
    }

    pub fn percent(width: f64, height: f64) -> Self {
        Self {
            x: Measure::Percent(width),
            y: Measure::Percent(height),
        }
    }

    pub fn resolve(self, basis: Size) -> Size {
        Size::new(self.x.resolve(basis.width), self.y.resolve(basis.height))
    }
}

/// How long a tab is along its strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabMetrics {
    pub char_width: f64,
    pub padding: f64,
    pub min_length: f64,
    pub max_length: f64,
    pub scroll_button_size: f64,
}

impl Default for TabMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            padding: 24.0,
            min_length: 40.0,
            max_length: 200.0,
            scroll_button_size: 18.0,
        }
    }
}

impl TabMetrics {
    pub fn tab_length(&self, title: &str) -> f64 {
        let raw = title.chars().count() as f64 * self.char_width + self.padding;
        raw.clamp(self.min_length, self.max_length.max(self.min_length))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerOptions {
    /// Thickness of a frame's title/tab strip.
    pub title_height: f64,
    /// Thickness of the draggable bar between splitter panes.
    pub splitter_bar_size: f64,
    /// Thickness of the resize grips around floating frames.
    pub sizer_size: f64,
    /// Width of the bands along the docking surface edges that split the
    /// whole surface. Resolved against the surface.
    pub edge_anchor_size: Measure,
    /// Width of the interior bands of a frame that split that frame.
    /// Resolved against the frame being tested.
    pub panel_anchor_size: Measure,
    /// Time after mouse-down before a frame drag starts re-targeting.
    #[serde(with = "millis")]
    pub move_start_delay: Duration,
    /// Minimum time between two batched layout passes.
    #[serde(with = "millis")]
    pub response_rate: Duration,
    /// Interval between the steps of a divider animation.
    #[serde(with = "millis")]
    pub anim_tick: Duration,
    /// Total length of a divider animation.
    #[serde(with = "millis")]
    pub anim_duration: Duration,
    /// Length of the ghost outline tween.
    #[serde(with = "millis")]
    pub ghost_tween: Duration,
    /// Distance kept between the active tab and the strip edge when the
    /// strip auto-scrolls.
    pub tab_scroll_buffer: f64,
    pub tab_metrics: TabMetrics,
    /// Whether tab strips may sit on any frame edge. When false they are
    /// locked to the top.
    pub can_orient_tabs: bool,
    pub allow_collapse: bool,
    pub allow_floating: bool,
    /// Round divider offsets to whole units.
    pub pixel_snap: bool,
}

impl Default for DockerOptions {
    fn default() -> Self {
        Self {
            title_height: 24.0,
            splitter_bar_size: 4.0,
            sizer_size: 4.0,
            edge_anchor_size: Measure::Pixels(50.0),
            panel_anchor_size: Measure::Percent(15.0),
            move_start_delay: Duration::from_millis(300),
            response_rate: Duration::from_millis(10),
            anim_tick: Duration::from_millis(5),
            anim_duration: Duration::from_millis(150),
            ghost_tween: Duration::from_millis(100),
            tab_scroll_buffer: 20.0,
            tab_metrics: TabMetrics::default(),
            can_orient_tabs: true,
            allow_collapse: true,
            allow_floating: true,
            pixel_snap: true,
        }
    }
}

impl DockerOptions {
    /// Preset for a character-cell surface.
    pub fn terminal() -> Self {
        Self {
            title_height: 1.0,
            splitter_bar_size: 1.0,
            sizer_size: 1.0,
            edge_anchor_size: Measure::Pixels(2.0),
            panel_anchor_size: Measure::Percent(15.0),
            move_start_delay: Duration::from_millis(150),
            response_rate: Duration::from_millis(16),
            anim_tick: Duration::from_millis(16),
            anim_duration: Duration::from_millis(120),
            ghost_tween: Duration::from_millis(60),
            tab_scroll_buffer: 2.0,
            tab_metrics: TabMetrics {
                char_width: 1.0,
                padding: 2.0,
                min_length: 4.0,
                max_length: 24.0,
                scroll_button_size: 1.0,
            },
            can_orient_tabs: true,
            allow_collapse: true,
            allow_floating: true,
            pixel_snap: true,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

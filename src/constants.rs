//! Shared crate-wide constants.

/// Panel type name used for the auto-inserted placeholder that keeps the
/// docked tree from ever becoming empty.
pub const PLACEHOLDER_TYPE: &str = "__placeholder";

/// Minimum number of units a floating frame must keep within the docking
/// surface so the user can grab its chrome again.
pub const MIN_FLOATING_VISIBLE_MARGIN: f64 = 4.0;

/// Fraction of the surface a floating frame takes on each axis when neither
/// the caller nor the panel asked for a size.
pub const DEFAULT_FLOAT_FRACTION: f64 = 0.4;

/// Fraction of the surface an expanded drawer takes when its panel never
/// recorded a size.
pub const DEFAULT_DRAWER_FRACTION: f64 = 0.25;

/// Share of the target an interior or edge anchor highlights.
pub const ANCHOR_SPLIT_FRACTION: f64 = 0.5;

/// Literal used to encode infinite measures in saved layouts.
pub const INFINITY_SENTINEL: &str = "Infinity";

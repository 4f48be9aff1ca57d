//! Scroll view options
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```toml
//! h_scroll = true
//! v_scroll = false
//! snap = true          # or a selector string, e.g. "li"
//! momentum = true
//! zoom = true
//! zoom_max = 3
//! wheel_action = "zoom"
//! ```
//!
//! Loading is lenient. A recognized key whose value has the wrong type is
//! logged and ignored, leaving the default in place; camelCase spellings
//! (`hScroll`, `lockDirection`) are accepted. Only unparseable TOML is an
//! error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Momentum overshoot divisor for the default feel
pub const OVERSHOOT_DIVISOR: f32 = 6.0;

/// Momentum overshoot divisor for a tight, short overshoot
pub const OVERSHOOT_DIVISOR_TIGHT: f32 = 30.0;

// ============================================================================
// Option Enums
// ============================================================================

/// How pages are derived for snapping
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSnap", into = "RawSnap")]
pub enum SnapMode {
    /// No snapping
    #[default]
    Off,
    /// One page per viewport length
    Pages,
    /// One page per child element matching the selector
    Selector(String),
}

impl SnapMode {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, SnapMode::Off)
    }
}

/// Wire form of `snap`: a flag or a selector string
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSnap {
    Flag(bool),
    Selector(String),
}

impl From<RawSnap> for SnapMode {
    fn from(raw: RawSnap) -> Self {
        match raw {
            RawSnap::Flag(true) => SnapMode::Pages,
            RawSnap::Flag(false) => SnapMode::Off,
            RawSnap::Selector(s) if s.trim().is_empty() => SnapMode::Off,
            RawSnap::Selector(s) => SnapMode::Selector(s),
        }
    }
}

impl From<SnapMode> for RawSnap {
    fn from(mode: SnapMode) -> Self {
        match mode {
            SnapMode::Off => RawSnap::Flag(false),
            SnapMode::Pages => RawSnap::Flag(true),
            SnapMode::Selector(s) => RawSnap::Selector(s),
        }
    }
}

/// What the mouse wheel does
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelAction {
    #[default]
    Scroll,
    Zoom,
    #[serde(rename = "none")]
    Disabled,
}

/// Which mechanism animates plans
///
/// `Frame` samples the plan on every `tick`; `Transition` hands the
/// destination and duration to the surface and waits for `transition_end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverMode {
    #[default]
    Frame,
    Transition,
}

// ============================================================================
// ScrollOptions
// ============================================================================

/// Configuration for a scroll view
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollOptions {
    /// Allow horizontal scrolling
    pub h_scroll: bool,
    /// Allow vertical scrolling
    pub v_scroll: bool,
    /// Show the horizontal indicator
    pub h_scrollbar: bool,
    /// Show the vertical indicator
    pub v_scrollbar: bool,
    /// Keep indicator size fixed when overscrolling
    pub fixed_scrollbar: bool,
    /// Hide indicators while idle
    pub hide_scrollbar: bool,
    /// Fade indicators out instead of hiding them instantly
    pub fade_scrollbar: bool,
    /// Rubber-band past the edges
    pub bounce: bool,
    /// Only scroll vertically if the content is taller than the viewport
    pub bounce_lock: bool,
    /// Continue with inertia after a quick flick
    pub momentum: bool,
    /// Latch to the dominant axis once a drag direction is clear
    pub lock_direction: bool,
    /// Snap to pages
    pub snap: SnapMode,
    /// Drags shorter than this return to where they started instead of snapping
    pub snap_threshold: f32,
    /// Enable pinch and double-tap zoom
    pub zoom: bool,
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Scale a double tap zooms to
    pub double_tap_zoom: f32,
    pub wheel_action: WheelAction,
    /// Vertical space reserved above the content (pull-to-refresh headers)
    pub top_offset: f32,
    /// Synthesize a click for taps
    pub handle_click: bool,
    pub driver: DriverMode,
    /// Divisor of the momentum overshoot budget (6 default, 30 tight)
    pub overshoot_divisor: f32,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            h_scroll: true,
            v_scroll: true,
            h_scrollbar: true,
            v_scrollbar: true,
            fixed_scrollbar: false,
            hide_scrollbar: true,
            fade_scrollbar: true,
            bounce: true,
            bounce_lock: false,
            momentum: true,
            lock_direction: true,
            snap: SnapMode::Off,
            snap_threshold: 1.0,
            zoom: false,
            zoom_min: 1.0,
            zoom_max: 4.0,
            double_tap_zoom: 2.0,
            wheel_action: WheelAction::Scroll,
            top_offset: 0.0,
            handle_click: true,
            driver: DriverMode::Frame,
            overshoot_divisor: OVERSHOOT_DIVISOR,
        }
    }
}

/// Assign every listed field from the table, skipping malformed values
macro_rules! lenient_fields {
    ($table:expr, $options:expr, $($field:ident),* $(,)?) => {
        $(
            if let Some(value) = $table.remove(stringify!($field)) {
                match value.try_into() {
                    Ok(parsed) => $options.$field = parsed,
                    Err(err) => tracing::warn!(
                        key = stringify!($field),
                        %err,
                        "ignoring malformed scroll option"
                    ),
                }
            }
        )*
    };
}

impl ScrollOptions {
    /// Horizontal-only paging carousel
    pub fn carousel() -> Self {
        Self {
            v_scroll: false,
            v_scrollbar: false,
            snap: SnapMode::Pages,
            ..Default::default()
        }
    }

    /// Zoomable canvas, scrolling both ways
    pub fn zoomable() -> Self {
        Self {
            zoom: true,
            wheel_action: WheelAction::Zoom,
            ..Default::default()
        }
    }

    /// Parse options from TOML text
    ///
    /// Options may sit at the top level or inside a `[scroll]` table.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut root: toml::Table = text.parse()?;
        let mut table = match root.remove("scroll") {
            Some(toml::Value::Table(inner)) => inner,
            Some(other) => {
                tracing::warn!(kind = other.type_str(), "`scroll` is not a table, ignoring");
                root
            }
            None => root,
        };

        // Accept camelCase spellings
        let keys: Vec<String> = table.keys().cloned().collect();
        for key in keys {
            let snake = to_snake_case(&key);
            if snake != key {
                if let Some(value) = table.remove(&key) {
                    table.insert(snake, value);
                }
            }
        }

        let mut options = Self::default();
        lenient_fields!(
            table,
            options,
            h_scroll,
            v_scroll,
            h_scrollbar,
            v_scrollbar,
            fixed_scrollbar,
            hide_scrollbar,
            fade_scrollbar,
            bounce,
            bounce_lock,
            momentum,
            lock_direction,
            snap,
            snap_threshold,
            zoom,
            zoom_min,
            zoom_max,
            double_tap_zoom,
            wheel_action,
            top_offset,
            handle_click,
            driver,
            overshoot_divisor,
        );

        for key in table.keys() {
            tracing::debug!(key = %key, "unknown scroll option");
        }

        Ok(options.sanitized())
    }

    /// Load options from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Clamp numeric options into usable ranges
    ///
    /// Non-finite values fall back to their defaults rather than erroring.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f32, d: f32| if v.is_finite() { v } else { d };

        self.zoom_min = finite_or(self.zoom_min, defaults.zoom_min);
        if self.zoom_min <= 0.0 {
            self.zoom_min = defaults.zoom_min;
        }
        self.zoom_max = finite_or(self.zoom_max, defaults.zoom_max).max(self.zoom_min);
        self.double_tap_zoom = finite_or(self.double_tap_zoom, defaults.double_tap_zoom)
            .clamp(self.zoom_min, self.zoom_max);
        self.snap_threshold = finite_or(self.snap_threshold, defaults.snap_threshold).max(0.0);
        self.top_offset = finite_or(self.top_offset, defaults.top_offset).max(0.0);
        self.overshoot_divisor = finite_or(self.overshoot_divisor, defaults.overshoot_divisor);
        if self.overshoot_divisor <= 0.0 {
            self.overshoot_divisor = defaults.overshoot_divisor;
        }
        self
    }
}

fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

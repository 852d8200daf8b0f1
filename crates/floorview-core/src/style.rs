//! Fixed visual vocabulary: per-status colors, hover emphasis, selection marker.

use serde::Serialize;

use crate::model::UnitStatus;

/// Transient hover emphasis, applied to the hovered region unless it is selected.
pub const HOVER_FILTER: &str = "brightness(1.2) drop-shadow(0 4px 8px rgba(0, 0, 0, 0.15))";

/// Brightness factor of [`HOVER_FILTER`], for renderers without CSS filters.
pub const HOVER_BRIGHTNESS: f64 = 1.2;

/// Transition declared on every styled region.
pub const TRANSITION: &str = "fill 0.3s ease, stroke 0.3s ease, filter 0.3s ease, transform 0.3s ease";

/// Class carried by the selected region.
pub const SELECTED_CLASS: &str = "selected";

/// Fill/outline pair for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub stroke_width: &'static str,
}

const AVAILABLE: StatusStyle = StatusStyle {
    fill: "#e6f0ff",
    stroke: "#3271cc",
    stroke_width: "1.5",
};

const RESERVED: StatusStyle = StatusStyle {
    fill: "#fff4e6",
    stroke: "#ffa500",
    stroke_width: "1.5",
};

const SOLD: StatusStyle = StatusStyle {
    fill: "#ffe6e6",
    stroke: "#ff0000",
    stroke_width: "1.5",
};

/// Style table lookup.
pub fn status_style(status: UnitStatus) -> StatusStyle {
    match status {
        UnitStatus::Available => AVAILABLE,
        UnitStatus::Reserved => RESERVED,
        UnitStatus::Sold => SOLD,
    }
}

/// Color of the status dot in the info card (the outline color).
pub fn status_dot_color(status: UnitStatus) -> &'static str {
    status_style(status).stroke
}

/// 8-bit RGB triple, for hosts that draw without CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` or `#rgb`.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            3 => {
                let expand = |i: usize| -> Option<u8> {
                    let v = channel(hex.get(i..=i)?)?;
                    Some(v * 17)
                };
                Some(Self(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    /// Multiply every channel by `factor`, saturating at 255.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    pub fn brighten(self, factor: f64) -> Self {
        let scale = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Self(scale(self.0), scale(self.1), scale(self.2))
    }
}

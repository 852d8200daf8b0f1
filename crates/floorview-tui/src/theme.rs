//! Palette and semantic styles for the TUI.
//!
//! Status colors come from the core style table so the terminal and the
//! rendered SVG always agree.

use floorview_core::style::{HOVER_BRIGHTNESS, status_style};
use floorview_core::{Rgb, UnitStatus};
use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

/// Outline of regions that take no part in the scene.
pub const INERT_GRAY: Color = Color::Rgb(68, 71, 90); // #44475a

// ── Status colors ─────────────────────────────────────────────────────

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Outline color for `status`, as in the SVG style table.
pub fn status_color(status: UnitStatus) -> Color {
    Rgb::from_hex(status_style(status).stroke).map_or(DIM_WHITE, to_color)
}

/// Outline color under hover emphasis.
pub fn status_color_emphasized(status: UnitStatus) -> Color {
    Rgb::from_hex(status_style(status).stroke)
        .map_or(ELECTRIC_YELLOW, |rgb| to_color(rgb.brighten(HOVER_BRIGHTNESS)))
}

/// Parse one of the core's hex colors, e.g. the tooltip dot.
pub fn hex_color(raw: &str) -> Color {
    Rgb::from_hex(raw).map_or(DIM_WHITE, to_color)
}

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Rows hidden by the current filter.
pub fn table_dimmed() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn error_text() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_colors_follow_style_table() {
        assert_eq!(status_color(UnitStatus::Available), Color::Rgb(0x32, 0x71, 0xcc));
        assert_eq!(status_color(UnitStatus::Sold), Color::Rgb(0xff, 0, 0));
    }

    #[test]
    fn emphasis_brightens() {
        assert_eq!(
            status_color_emphasized(UnitStatus::Available),
            Color::Rgb(60, 136, 245)
        );
    }
}

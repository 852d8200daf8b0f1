//! Status dot and filter checkbox spans.

use floorview_core::UnitStatus;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::theme;

/// `●` in the status color.
pub fn status_span(status: UnitStatus) -> Span<'static> {
    Span::styled("●", Style::default().fg(theme::status_color(status)))
}

/// `[x] Available` / `[ ] Available`, colored by status when checked.
pub fn checkbox_span(status: UnitStatus, checked: bool) -> Span<'static> {
    let mark = if checked { 'x' } else { ' ' };
    let style = if checked {
        Style::default()
            .fg(theme::status_color(status))
            .add_modifier(Modifier::BOLD)
    } else {
        theme::key_hint()
    };
    Span::styled(format!("[{mark}] {}", status.label()), style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_reflects_membership() {
        assert_eq!(checkbox_span(UnitStatus::Sold, true).content, "[x] Sold");
        assert_eq!(checkbox_span(UnitStatus::Sold, false).content, "[ ] Sold");
    }
}

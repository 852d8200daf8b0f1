//! Units screen: every record with its visibility under the current filter.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use floorview_core::format::format_price;
use floorview_core::{FilterState, UnitCode, UnitRecord, UnitRegistry};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState},
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator::status_span;

pub struct UnitsScreen {
    registry: Arc<UnitRegistry>,
    filter: FilterState,
    selected: Option<UnitCode>,
    cursor: usize,
    focused: bool,
}

impl UnitsScreen {
    pub fn new(registry: Arc<UnitRegistry>, filter: FilterState) -> Self {
        Self {
            registry,
            filter,
            selected: None,
            cursor: 0,
            focused: false,
        }
    }

    fn record_at_cursor(&self) -> Option<&UnitRecord> {
        self.registry.iter().nth(self.cursor)
    }

    fn move_cursor(&mut self, delta: isize) {
        let last = self.registry.len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    fn row(&self, record: &UnitRecord) -> Row<'static> {
        let visible = self.filter.admits(record);
        let selected = self.selected == Some(record.code);
        let marker = if selected { "◆" } else { " " };
        let style = if visible {
            theme::table_row()
        } else {
            theme::table_dimmed()
        };
        Row::new(vec![
            Cell::from(Span::styled(marker, theme::table_selected())),
            Cell::from(record.code.to_string()),
            Cell::from(Line::from(vec![
                status_span(record.status),
                Span::raw(format!(" {}", record.status.label())),
            ])),
            Cell::from(format_price(record.price)),
            Cell::from(if visible { "yes" } else { "no" }),
        ])
        .style(style)
    }
}

impl Component for UnitsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                None
            }
            KeyCode::Char('g') => {
                self.cursor = 0;
                None
            }
            KeyCode::Char('G') => {
                self.cursor = self.registry.len().saturating_sub(1);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.record_at_cursor().map(|r| Action::Activate(r.code))
            }
            KeyCode::Esc => Some(Action::ClearSelection),
            _ => Action::from_filter_key(key),
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::PlanChanged(snapshot) = action {
            self.filter = snapshot.filter.clone();
            self.selected = snapshot.selected;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let visible = self
            .registry
            .iter()
            .filter(|r| self.filter.admits(r))
            .count();
        let block = Block::default()
            .title(format!(" Units ({visible}/{}) ", self.registry.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let header = Row::new(["", "Code", "Status", "Price", "Visible"]).style(theme::table_header());
        let rows: Vec<Row> = self.registry.iter().map(|r| self.row(r)).collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Length(8),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Min(7),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(theme::table_selected());

        let mut state = TableState::default().with_selected(
            (!self.registry.is_empty()).then_some(self.cursor),
        );
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("j/k", "move"),
            ("Enter", "select"),
            ("Esc", "clear"),
            ("a/r/s", "status"),
            ("←/→", "price"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use floorview_core::UnitStatus;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::action::PlanSnapshot;

    fn screen() -> UnitsScreen {
        let registry = UnitRegistry::new([
            UnitRecord::new(101, UnitStatus::Available, 50_000.0),
            UnitRecord::new(102, UnitStatus::Sold, 90_000.0),
            UnitRecord::new(103, UnitStatus::Reserved, 75_000.0),
        ]);
        UnitsScreen::new(Arc::new(registry), FilterState::default())
    }

    #[test]
    fn cursor_stays_in_range() {
        let mut units = screen();
        units.move_cursor(-1);
        assert_eq!(units.cursor, 0);
        units.move_cursor(10);
        assert_eq!(units.cursor, 2);
    }

    #[test]
    fn enter_activates_record_under_cursor() -> Result<()> {
        let mut units = screen();
        units.handle_key_event(KeyEvent::from(KeyCode::Down))?;
        let action = units.handle_key_event(KeyEvent::from(KeyCode::Enter))?;
        assert!(matches!(action, Some(Action::Activate(code)) if code == UnitCode::new(102)));
        Ok(())
    }

    #[test]
    fn follows_plan_changes() -> Result<()> {
        let mut units = screen();
        let filter = FilterState::new([UnitStatus::Sold], 100_000.0);
        units.update(&Action::PlanChanged(PlanSnapshot {
            filter: filter.clone(),
            selected: Some(UnitCode::new(103)),
        }))?;
        assert_eq!(units.filter, filter);
        assert_eq!(units.selected, Some(UnitCode::new(103)));
        Ok(())
    }
}

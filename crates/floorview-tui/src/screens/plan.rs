//! Plan screen: the floor plan canvas with the filter sidebar.
//!
//! Owns the [`FloorPlan`]. Every filter or selection change runs a pass
//! inside the plan and is then broadcast as [`Action::PlanChanged`] so the
//! other screens can follow. Hover never leaves this screen.

use std::cell::Cell;
use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use floorview_core::format::format_price;
use floorview_core::{
    FloorPlan, Point, PointerEvent, RegionId, RegionState, SelectionChange, Tooltip, UnitCode,
    UnitRegistry, UnitStatus,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap,
        canvas::{self, Canvas, Context},
    },
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace};

use crate::action::{Action, PlanSnapshot};
use crate::component::Component;
use crate::loader::spawn_diagram_loader;
use crate::theme;
use crate::viewport::Viewport;
use crate::widgets::status_indicator::{checkbox_span, status_span};

const SIDEBAR_WIDTH: u16 = 30;

/// Sidebar rows, relative to the sidebar's inner area.
const STATUS_ROW: u16 = 1;
const GAUGE_ROW: u16 = 6;

/// Diagram source and the knobs the screen reads from configuration.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub diagram: PathBuf,
    pub code_attribute: String,
    pub price_max: f64,
    pub price_step: f64,
    /// Tooltip offset from the pointer, in cells.
    pub tooltip_offset: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// What a click on the sidebar lands on.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SidebarHit {
    Status(UnitStatus),
    /// Fraction of the gauge width, in `[0, 1]`.
    Gauge(f64),
}

pub struct PlanScreen {
    plan: FloorPlan,
    options: PlanOptions,
    load: LoadState,
    throbber: ThrobberState,
    /// Keyboard focus; always a bound region or `None`.
    focus: Option<RegionId>,
    focused: bool,
    viewport: Cell<Option<Viewport>>,
    sidebar: Cell<Rect>,
}

impl PlanScreen {
    pub fn new(registry: Arc<UnitRegistry>, options: PlanOptions) -> Self {
        let mut plan = FloorPlan::new(registry);
        plan.set_price_ceiling(options.price_max);
        Self {
            plan,
            options,
            load: LoadState::Loading,
            throbber: ThrobberState::default(),
            focus: None,
            focused: false,
            viewport: Cell::new(None),
            sidebar: Cell::new(Rect::default()),
        }
    }

    fn snapshot(&self) -> Action {
        Action::PlanChanged(PlanSnapshot {
            filter: self.plan.filter().clone(),
            selected: self.plan.interaction().selected().map(|r| r.code),
        })
    }

    /// Drop focus from a region that lost its binding in the last pass.
    fn settle_focus(&mut self) {
        if self
            .focus
            .is_some_and(|id| self.plan.scene().binding(id).is_none())
        {
            self.focus = None;
        }
    }

    fn focused_code(&self) -> Option<UnitCode> {
        self.plan.scene().binding(self.focus?).map(|b| b.code)
    }

    fn set_ceiling(&mut self, ceiling: f64) -> Option<Action> {
        let ceiling = ceiling.clamp(0.0, self.options.price_max);
        if (ceiling - self.plan.filter().price_ceiling).abs() < f64::EPSILON {
            return None;
        }
        self.plan.set_price_ceiling(ceiling);
        self.settle_focus();
        Some(self.snapshot())
    }

    /// Route pointer motion to enter/move/leave on whatever region is under it.
    fn track_pointer(&mut self, column: u16, row: u16) {
        let Some(viewport) = self.viewport.get() else {
            return;
        };
        self.plan.set_container_origin(viewport.origin());

        let under = viewport
            .cell_to_point(column, row)
            .and_then(|p| self.plan.hit_test(p))
            .map(|(_, code)| code);
        let hovered = self.plan.interaction().hovered().map(|r| r.code);
        let pointer = PointerEvent::at(f64::from(column), f64::from(row));

        match (hovered, under) {
            (Some(current), Some(code)) if current == code => {
                self.plan.hover_move(code, pointer);
            }
            (current, Some(code)) => {
                if let Some(previous) = current {
                    self.plan.hover_leave(previous);
                }
                self.plan.hover_enter(code, pointer);
            }
            (Some(previous), None) => {
                self.plan.hover_leave(previous);
            }
            (None, None) => {}
        }
    }

    fn click(&self, column: u16, row: u16) -> Option<Action> {
        let on_canvas = self
            .viewport
            .get()
            .filter(|vp| vp.contains_cell(column, row));
        if let Some(viewport) = on_canvas {
            let point = viewport.cell_to_point(column, row)?;
            let (_, code) = self.plan.hit_test(point)?;
            return Some(Action::Activate(code));
        }
        match sidebar_hit(self.sidebar.get(), column, row)? {
            SidebarHit::Status(status) => Some(Action::ToggleStatus(status)),
            SidebarHit::Gauge(fraction) => Some(Action::SetCeiling(snap_to_step(
                fraction * self.options.price_max,
                self.options.price_step,
            ))),
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_plan(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Floor plan ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &self.load {
            LoadState::Loading => {
                self.viewport.set(None);
                let throbber = Throbber::default()
                    .label(" Loading diagram...")
                    .style(Style::default().fg(theme::NEON_CYAN))
                    .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
                frame.render_stateful_widget(
                    throbber,
                    centered_row(inner),
                    &mut self.throbber.clone(),
                );
            }
            LoadState::Failed(message) => {
                self.viewport.set(None);
                let text = vec![
                    Line::from(Span::styled("Diagram unavailable", theme::error_text())),
                    Line::from(""),
                    Line::from(Span::styled(message.clone(), theme::table_row())),
                ];
                let area = Rect {
                    y: inner.y + inner.height.saturating_sub(3) / 2,
                    height: inner.height.min(3),
                    ..inner
                };
                frame.render_widget(
                    Paragraph::new(text)
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true }),
                    area,
                );
            }
            LoadState::Loaded => self.render_canvas(frame, inner),
        }
    }

    fn render_canvas(&self, frame: &mut Frame, inner: Rect) {
        let viewport = self
            .plan
            .document()
            .and_then(|doc| doc.view_box())
            .and_then(|view| Viewport::fit(inner, view));
        self.viewport.set(viewport);
        let (Some(viewport), Some(document)) = (viewport, self.plan.document()) else {
            frame.render_widget(
                Paragraph::new("Diagram has no drawable area")
                    .alignment(Alignment::Center)
                    .style(theme::key_hint()),
                centered_row(inner),
            );
            return;
        };

        let scene = self.plan.scene();
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(viewport.x_bounds())
            .y_bounds(viewport.y_bounds())
            .paint(|ctx: &mut Context<'_>| {
                for region in document.regions() {
                    let Some(rendered) = scene.region(region.id) else {
                        continue;
                    };
                    let color = match &rendered.state {
                        RegionState::Hidden { .. } => continue,
                        RegionState::Inert { .. } => theme::INERT_GRAY,
                        RegionState::Shown { .. } if rendered.selected => theme::ELECTRIC_PURPLE,
                        RegionState::Shown { record, .. } => {
                            if self.plan.is_emphasized(region.id) {
                                theme::status_color_emphasized(record.status)
                            } else {
                                theme::status_color(record.status)
                            }
                        }
                    };
                    draw_outline(ctx, &region.shape.outline(), color);
                }
                ctx.layer();
                for rendered in scene.shown() {
                    let (Some(region), Some(code)) =
                        (document.region(rendered.id), rendered.code)
                    else {
                        continue;
                    };
                    let Some(anchor) = region.shape.label_anchor() else {
                        continue;
                    };
                    let (x, y) = Viewport::to_canvas(anchor);
                    ctx.print(x, y, self.label(rendered.id, code, rendered.selected));
                }
            });
        frame.render_widget(canvas, viewport.area);

        if let Some(tooltip) = self.plan.tooltip_with_offset(self.options.tooltip_offset) {
            let screen = frame.area();
            render_tooltip(frame, &tooltip, viewport, screen);
        }
    }

    fn label(&self, id: RegionId, code: UnitCode, selected: bool) -> Line<'static> {
        let mut style = Style::default().fg(theme::DIM_WHITE);
        if selected {
            style = style.fg(theme::ELECTRIC_PURPLE).add_modifier(Modifier::BOLD);
        }
        if self.focus == Some(id) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Line::from(Span::styled(code.to_string(), style))
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Filter ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        self.sidebar.set(inner);
        frame.render_widget(block, area);

        let filter = self.plan.filter();
        let mut lines = vec![Line::from(Span::styled("Status", theme::table_header()))];
        for status in UnitStatus::ALL {
            lines.push(Line::from(vec![
                Span::raw(" "),
                checkbox_span(status, filter.contains(status)),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Max price ", theme::table_header()),
            Span::styled(format_price(filter.price_ceiling), theme::key_hint_key()),
        ]));
        frame.render_widget(Paragraph::new(lines), inner);

        let gauge_area = Rect {
            y: inner.y + GAUGE_ROW,
            height: 1,
            ..inner
        }
        .intersection(inner);
        let ratio = if self.options.price_max > 0.0 {
            (filter.price_ceiling / self.options.price_max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        frame.render_widget(
            Gauge::default()
                .ratio(ratio)
                .label("")
                .gauge_style(Style::default().fg(theme::ELECTRIC_PURPLE).bg(theme::BG_HIGHLIGHT)),
            gauge_area,
        );

        let detail_area = Rect {
            y: inner.y + GAUGE_ROW + 2,
            height: inner.height.saturating_sub(GAUGE_ROW + 2),
            ..inner
        }
        .intersection(inner);
        frame.render_widget(Paragraph::new(self.detail_lines()), detail_area);
    }

    fn detail_lines(&self) -> Vec<Line<'static>> {
        let scene = self.plan.scene();
        let shown = scene.shown().count();
        let matched = scene.regions().iter().filter(|r| r.record().is_some()).count();

        let mut lines = vec![Line::from(vec![
            Span::styled("Visible ", theme::table_header()),
            Span::styled(format!("{shown} / {matched}"), theme::table_row()),
        ])];
        lines.push(Line::from(""));
        match self.plan.interaction().selected() {
            Some(record) => {
                let hidden = scene
                    .selected_region()
                    .is_some_and(|r| !r.is_shown());
                lines.push(Line::from(Span::styled(
                    format!("Unit {}", record.code),
                    theme::table_selected(),
                )));
                lines.push(Line::from(vec![
                    status_span(record.status),
                    Span::styled(format!(" {}", record.status.label()), theme::table_row()),
                ]));
                lines.push(Line::from(Span::styled(
                    format_price(record.price),
                    theme::table_row(),
                )));
                if hidden {
                    lines.push(Line::from(Span::styled(
                        "(hidden by filter)",
                        theme::key_hint(),
                    )));
                }
            }
            None => lines.push(Line::from(Span::styled("No unit selected", theme::key_hint()))),
        }
        lines
    }
}

impl Component for PlanScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        spawn_diagram_loader(
            self.options.diagram.clone(),
            self.options.code_attribute.clone(),
            action_tx,
        );
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Tab => {
                self.focus = self.plan.focus_next(self.focus);
                None
            }
            KeyCode::BackTab => {
                self.focus = self.plan.focus_prev(self.focus);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.focused_code().map(Action::Activate),
            KeyCode::Esc => Some(Action::ClearSelection),
            _ => Action::from_filter_key(key),
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.track_pointer(mouse.column, mouse.row);
                Ok(None)
            }
            MouseEventKind::Down(MouseButton::Left) => Ok(self.click(mouse.column, mouse.row)),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        let follow_up = match action {
            Action::Tick => {
                if self.load == LoadState::Loading {
                    self.throbber.calc_next();
                }
                None
            }
            Action::DiagramLoaded(document) => {
                let scene = self.plan.load_document(document.as_ref().clone());
                debug!(regions = scene.regions().len(), bound = scene.bindings().len(), "plan ready");
                self.load = LoadState::Loaded;
                self.focus = None;
                Some(self.snapshot())
            }
            Action::DiagramFailed(message) => {
                self.load = LoadState::Failed(message.clone());
                None
            }
            Action::ToggleStatus(status) => {
                self.plan.toggle_status(*status);
                self.settle_focus();
                Some(self.snapshot())
            }
            Action::MoveCeiling(step) => {
                let next = step.apply(
                    self.plan.filter().price_ceiling,
                    self.options.price_step,
                    self.options.price_max,
                );
                self.set_ceiling(next)
            }
            Action::SetCeiling(ceiling) => self.set_ceiling(*ceiling),
            Action::Activate(code) => match self.plan.activate(*code) {
                SelectionChange::Ignored => None,
                change => {
                    trace!(?change, "activation");
                    if let SelectionChange::Selected(to) | SelectionChange::Moved { to, .. } = change {
                        self.focus = self.plan.scene().bound_region(to);
                    }
                    self.settle_focus();
                    Some(self.snapshot())
                }
            },
            Action::ClearSelection => self.plan.clear_selection().map(|_| {
                self.settle_focus();
                self.snapshot()
            }),
            _ => None,
        };
        Ok(follow_up)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [plan_area, sidebar_area] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)])
                .areas(area);
        self.render_plan(frame, plan_area);
        self.render_sidebar(frame, sidebar_area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        let hovered = self.plan.interaction().hovered().map(|r| r.code);
        if let (false, Some(code)) = (focused, hovered) {
            self.plan.hover_leave(code);
        }
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("Tab", "focus"),
            ("Enter", "select"),
            ("Esc", "clear"),
            ("a/r/s", "status"),
            ("←/→", "price"),
        ]
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn draw_outline(ctx: &mut Context<'_>, outline: &[Point], color: Color) {
    for pair in outline.windows(2) {
        let [from, to] = pair else { continue };
        let (x1, y1) = Viewport::to_canvas(*from);
        let (x2, y2) = Viewport::to_canvas(*to);
        ctx.draw(&canvas::Line {
            x1,
            y1,
            x2,
            y2,
            color,
        });
    }
}

/// Card near the pointer, kept inside `bounds`.
fn render_tooltip(frame: &mut Frame, tooltip: &Tooltip, viewport: Viewport, bounds: Rect) {
    let title = tooltip.title();
    let status = format!(" {}", tooltip.status_label);
    let width = [title.len(), status.len() + 1, tooltip.price_label.len()]
        .into_iter()
        .max()
        .unwrap_or(0);
    let width = u16::try_from(width).unwrap_or(u16::MAX).saturating_add(4);
    let height = 5;

    let anchor = tooltip.anchor.offset(viewport.origin().x, viewport.origin().y);
    let area = place_card(anchor.x, anchor.y, width, height, bounds);

    let lines = vec![
        Line::from(Span::styled(title, theme::title_style())),
        Line::from(vec![
            Span::styled("●", Style::default().fg(theme::hex_color(tooltip.dot_color))),
            Span::styled(status, theme::table_row()),
        ]),
        Line::from(Span::styled(tooltip.price_label.clone(), theme::table_row())),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_focused())
                .style(Style::default().bg(theme::BG_DARK)),
        ),
        area,
    );
}

/// Card rectangle with its top-left at `(x, y)` cells, shifted to fit `bounds`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn place_card(x: f64, y: f64, width: u16, height: u16, bounds: Rect) -> Rect {
    let width = width.min(bounds.width);
    let height = height.min(bounds.height);
    let max_x = f64::from(bounds.x + bounds.width - width);
    let max_y = f64::from(bounds.y + bounds.height - height);
    let x = x.round().clamp(f64::from(bounds.x), max_x) as u16;
    let y = y.round().clamp(f64::from(bounds.y), max_y) as u16;
    Rect::new(x, y, width, height)
}

fn sidebar_hit(inner: Rect, column: u16, row: u16) -> Option<SidebarHit> {
    if column < inner.x || column >= inner.x + inner.width || row < inner.y {
        return None;
    }
    let line = row - inner.y;
    if (STATUS_ROW..STATUS_ROW + 3).contains(&line) {
        return UnitStatus::ALL
            .get(usize::from(line - STATUS_ROW))
            .copied()
            .map(SidebarHit::Status);
    }
    if line == GAUGE_ROW && inner.width > 0 {
        let fraction = (f64::from(column - inner.x) + 0.5) / f64::from(inner.width);
        return Some(SidebarHit::Gauge(fraction.clamp(0.0, 1.0)));
    }
    None
}

/// Round to the nearest multiple of `step`.
fn snap_to_step(value: f64, step: f64) -> f64 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

fn centered_row(area: Rect) -> Rect {
    Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use floorview_core::{DiagramDocument, UnitRecord};
    use pretty_assertions::assert_eq;

    use super::*;

    fn loaded_screen() -> PlanScreen {
        let registry = UnitRegistry::new([
            UnitRecord::new(101, UnitStatus::Available, 50_000.0),
            UnitRecord::new(102, UnitStatus::Sold, 90_000.0),
        ]);
        let options = PlanOptions {
            diagram: PathBuf::from("plan.svg"),
            code_attribute: "data-code".into(),
            price_max: 100_000.0,
            price_step: 5_000.0,
            tooltip_offset: (2.0, -1.0),
        };
        let mut screen = PlanScreen::new(Arc::new(registry), options);
        let document = DiagramDocument::parse(
            r#"<svg viewBox="0 0 20 10">
  <polygon points="0,0 10,0 10,10 0,10" data-code="101"/>
  <polygon points="10,0 20,0 20,10 10,10" data-code="102"/>
</svg>"#,
        )
        .unwrap();
        screen
            .update(&Action::DiagramLoaded(Arc::new(document)))
            .unwrap();
        screen
    }

    fn selected_in(action: Option<Action>) -> Option<UnitCode> {
        match action {
            Some(Action::PlanChanged(snapshot)) => snapshot.selected,
            other => panic!("expected a plan change, got {other:?}"),
        }
    }

    #[test]
    fn esc_clears_selection_hidden_by_filter() -> Result<()> {
        let mut screen = loaded_screen();
        let code = UnitCode::new(101);
        assert_eq!(selected_in(screen.update(&Action::Activate(code))?), Some(code));

        screen.update(&Action::ToggleStatus(UnitStatus::Available))?;
        assert!(screen.update(&Action::Activate(code))?.is_none());
        assert_eq!(screen.plan.interaction().selected().map(|r| r.code), Some(code));

        let esc = screen.handle_key_event(KeyEvent::from(KeyCode::Esc))?;
        assert!(matches!(esc, Some(Action::ClearSelection)));
        assert_eq!(selected_in(screen.update(&Action::ClearSelection)?), None);
        assert!(screen.plan.interaction().selected().is_none());
        Ok(())
    }

    #[test]
    fn sidebar_rows_map_to_controls() {
        let inner = Rect::new(50, 2, 20, 15);
        assert_eq!(
            sidebar_hit(inner, 55, 3),
            Some(SidebarHit::Status(UnitStatus::Available))
        );
        assert_eq!(
            sidebar_hit(inner, 55, 5),
            Some(SidebarHit::Status(UnitStatus::Sold))
        );
        assert_eq!(sidebar_hit(inner, 55, 2), None);
        assert_eq!(sidebar_hit(inner, 40, 3), None);
        assert_eq!(sidebar_hit(inner, 59, 8), Some(SidebarHit::Gauge(0.475)));
    }

    #[test]
    fn gauge_clicks_snap_to_step() {
        assert_eq!(snap_to_step(47_500.0, 5_000.0), 50_000.0);
        assert_eq!(snap_to_step(41_000.0, 5_000.0), 40_000.0);
        assert_eq!(snap_to_step(41_000.0, 0.0), 41_000.0);
    }

    #[test]
    fn tooltip_card_stays_on_screen() {
        let screen = Rect::new(0, 0, 80, 24);
        assert_eq!(place_card(10.0, 5.0, 16, 5, screen), Rect::new(10, 5, 16, 5));
        assert_eq!(place_card(75.0, -1.0, 16, 5, screen), Rect::new(64, 0, 16, 5));
        assert_eq!(place_card(10.0, 23.0, 16, 5, screen), Rect::new(10, 19, 16, 5));
    }
}

//! Every state transition in the TUI is expressed as an Action.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use floorview_core::{DiagramDocument, FilterState, UnitCode, UnitStatus};

use crate::screen::ScreenId;

/// Movement of the price-ceiling gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeilingMove {
    Down,
    Up,
    Min,
    Max,
}

/// What the other screens need to know about the plan after a change.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSnapshot {
    pub filter: FilterState,
    pub selected: Option<UnitCode>,
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Diagram loading ───────────────────────────────────────────
    DiagramLoaded(Arc<DiagramDocument>),
    DiagramFailed(String),

    // ── Filter ────────────────────────────────────────────────────
    ToggleStatus(UnitStatus),
    MoveCeiling(CeilingMove),
    SetCeiling(f64),

    // ── Selection ─────────────────────────────────────────────────
    Activate(UnitCode),
    ClearSelection,

    // ── Broadcast ─────────────────────────────────────────────────
    PlanChanged(PlanSnapshot),
}

impl Action {
    /// Filter keys shared by every screen: `a`/`r`/`s` toggle a status,
    /// arrows step the ceiling, `Home`/`End` jump to its bounds.
    pub fn from_filter_key(key: KeyEvent) -> Option<Self> {
        if !(key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) {
            return None;
        }
        let action = match key.code {
            KeyCode::Char('a') => Self::ToggleStatus(UnitStatus::Available),
            KeyCode::Char('r') => Self::ToggleStatus(UnitStatus::Reserved),
            KeyCode::Char('s') => Self::ToggleStatus(UnitStatus::Sold),
            KeyCode::Left => Self::MoveCeiling(CeilingMove::Down),
            KeyCode::Right => Self::MoveCeiling(CeilingMove::Up),
            KeyCode::Home => Self::MoveCeiling(CeilingMove::Min),
            KeyCode::End => Self::MoveCeiling(CeilingMove::Max),
            _ => return None,
        };
        Some(action)
    }
}

impl CeilingMove {
    /// New ceiling after this move, clamped to `[0, max]`.
    pub fn apply(self, current: f64, step: f64, max: f64) -> f64 {
        let next = match self {
            Self::Down => current - step,
            Self::Up => current + step,
            Self::Min => 0.0,
            Self::Max => max,
        };
        next.clamp(0.0, max)
    }
}

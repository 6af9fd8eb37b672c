//! Pattern-Engine: nicht-blockierende Wiedergabe von LED-Sequenzen
//!
//! Zustandsmaschine mit zwei Zuständen:
//!
//! ```text
//!   Inactive ──start(id)──▶ Active ──advance(now)──▶ Active
//!      ▲                       │
//!      └────────stop()─────────┘
//! ```
//!
//! `advance()` wird in jedem Scheduler-Durchlauf aufgerufen und wechselt
//! höchstens einen Step pro Aufruf (kein Nachholen bei Verzögerung).
//! Patterns laufen endlos in Schleife.

use crate::catalog::{Catalog, DEFAULT_CATALOG, Pattern, PatternError};
use crate::channel_state::ChannelState;
use crate::traits::ChannelOutput;

/// Interner Zustand der Engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Inactive,
    Active {
        pattern: &'static Pattern,
        step_index: usize,
        /// Zeitpunkt (ms) des letzten Step-Wechsels
        step_started_at: u64,
    },
}

pub struct PatternEngine {
    catalog: Catalog,
    state: EngineState,
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG)
    }
}

impl PatternEngine {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: EngineState::Inactive,
        }
    }

    /// Startet eine Pattern und zeigt Step 0 sofort an
    ///
    /// Bei unbekannter ID bleibt die Engine unverändert: eine bereits
    /// laufende Pattern läuft weiter.
    pub fn start<O: ChannelOutput>(
        &mut self,
        id: i32,
        now_ms: u64,
        channels: &mut ChannelState<O>,
    ) -> Result<&'static Pattern, PatternError> {
        let pattern = self.catalog.lookup(id)?;

        self.state = EngineState::Active {
            pattern,
            step_index: 0,
            step_started_at: now_ms,
        };
        channels.set_levels(pattern.steps[0].levels);

        Ok(pattern)
    }

    /// Stoppt die laufende Pattern
    ///
    /// Die LEDs behalten den zuletzt angezeigten Frame. Gibt die gestoppte
    /// Pattern zurück (falls eine lief).
    pub fn stop(&mut self) -> Option<&'static Pattern> {
        match core::mem::replace(&mut self.state, EngineState::Inactive) {
            EngineState::Active { pattern, .. } => Some(pattern),
            EngineState::Inactive => None,
        }
    }

    /// Schaltet zum nächsten Step, wenn die Dauer des aktuellen abgelaufen ist
    ///
    /// Gibt `true` zurück, wenn ein Step-Wechsel stattgefunden hat.
    /// Ein `now_ms` vor dem Step-Start zählt als "keine Zeit vergangen".
    pub fn advance<O: ChannelOutput>(&mut self, now_ms: u64, channels: &mut ChannelState<O>) -> bool {
        let EngineState::Active {
            pattern,
            step_index,
            step_started_at,
        } = &mut self.state
        else {
            return false;
        };

        let elapsed = now_ms.saturating_sub(*step_started_at);
        if elapsed < u64::from(pattern.steps[*step_index].duration_ms) {
            return false;
        }

        *step_index = (*step_index + 1) % pattern.steps.len();
        *step_started_at = now_ms;
        channels.set_levels(pattern.steps[*step_index].levels);
        true
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, EngineState::Active { .. })
    }

    pub fn active_pattern(&self) -> Option<&'static Pattern> {
        match self.state {
            EngineState::Active { pattern, .. } => Some(pattern),
            EngineState::Inactive => None,
        }
    }

    pub fn current_step(&self) -> Option<usize> {
        match self.state {
            EngineState::Active { step_index, .. } => Some(step_index),
            EngineState::Inactive => None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }
}

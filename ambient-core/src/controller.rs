//! LED-Controller: verbindet Kommandos, Pattern-Engine und LED-Zustand
//!
//! Direkte Kommandos haben immer Vorrang: vor jeder Änderung wird eine
//! laufende Pattern gestoppt. Jede erfolgreiche Ausführung meldet den
//! neuen Zustand an den [`StatusReporter`].

use crate::catalog::Pattern;
use crate::channel_state::ChannelState;
use crate::engine::PatternEngine;
use crate::traits::{ChannelOutput, StatusReporter};
use crate::types::{ChannelLevels, Command, DeviceInfo, StatusSnapshot};

/// Ergebnis einer Kommando-Ausführung (für Logging beim Aufrufer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// LEDs direkt gesetzt
    ChannelsSet(ChannelLevels),
    /// Pattern gestartet, Step 0 angezeigt
    PatternStarted(&'static Pattern),
    /// Pattern-ID unbekannt: laufende Pattern wurde gestoppt, LEDs unverändert
    PatternNotFound(i32),
    /// Kommando ignoriert
    Unrecognized,
}

pub struct LedController<O: ChannelOutput> {
    channels: ChannelState<O>,
    engine: PatternEngine,
    device: DeviceInfo,
}

impl<O: ChannelOutput> LedController<O> {
    pub fn new(output: O, engine: PatternEngine, device: DeviceInfo) -> Self {
        Self {
            channels: ChannelState::new(output),
            engine,
            device,
        }
    }

    /// Führt ein dekodiertes Kommando aus
    pub fn dispatch<R: StatusReporter>(
        &mut self,
        command: Command,
        now_ms: u64,
        reporter: &mut R,
    ) -> DispatchOutcome {
        let outcome = match command {
            Command::AllOn => self.apply(ChannelState::all_on),
            Command::AllOff => self.apply(ChannelState::all_off),
            Command::SetChannels { red, yellow, green } => {
                let current = self.channels.levels();
                let levels = ChannelLevels::new(
                    red.unwrap_or(current.red),
                    yellow.unwrap_or(current.yellow),
                    green.unwrap_or(current.green),
                );
                self.apply(|channels| channels.set_levels(levels))
            }
            Command::StartPattern { id } => {
                self.engine.stop();
                match self.engine.start(id, now_ms, &mut self.channels) {
                    Ok(pattern) => DispatchOutcome::PatternStarted(pattern),
                    Err(_) => return DispatchOutcome::PatternNotFound(id),
                }
            }
            Command::Unrecognized => return DispatchOutcome::Unrecognized,
        };

        reporter.report(&self.snapshot(now_ms));
        outcome
    }

    /// Direktes Kommando: erst Pattern stoppen, dann LEDs setzen
    fn apply(&mut self, set: impl FnOnce(&mut ChannelState<O>)) -> DispatchOutcome {
        self.engine.stop();
        set(&mut self.channels);
        DispatchOutcome::ChannelsSet(self.channels.levels())
    }

    /// Ein Scheduler-Durchlauf: höchstens ein Kommando, danach ein Tick
    ///
    /// Das Kommando wird vor dem Tick ausgeführt, seine Wirkung ist also
    /// nach dem Aufruf sichtbar. Weitere wartende Kommandos bleiben für
    /// den nächsten Durchlauf in der Queue.
    pub fn poll<R: StatusReporter>(
        &mut self,
        command: Option<Command>,
        now_ms: u64,
        reporter: &mut R,
    ) -> Option<DispatchOutcome> {
        let outcome = command.map(|command| self.dispatch(command, now_ms, reporter));
        self.tick(now_ms);
        outcome
    }

    /// Scheduler-Tick: treibt die Pattern-Animation voran
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.engine.advance(now_ms, &mut self.channels)
    }

    pub fn snapshot(&self, now_ms: u64) -> StatusSnapshot {
        StatusSnapshot {
            device_name: self.device.name,
            firmware_version: self.device.firmware_version,
            levels: self.channels.levels(),
            uptime_secs: now_ms / 1000,
        }
    }

    pub fn channels(&self) -> &ChannelState<O> {
        &self.channels
    }

    /// Direkter Zugriff auf die Kanäle (z.B. für den Selbsttest beim Start)
    pub fn channels_mut(&mut self) -> &mut ChannelState<O> {
        &mut self.channels
    }

    pub fn engine(&self) -> &PatternEngine {
        &self.engine
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DispatchOutcome {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DispatchOutcome::ChannelsSet(levels) => defmt::write!(fmt, "ChannelsSet({})", levels),
            DispatchOutcome::PatternStarted(pattern) => {
                defmt::write!(fmt, "PatternStarted({} '{}')", pattern.id, pattern.name)
            }
            DispatchOutcome::PatternNotFound(id) => defmt::write!(fmt, "PatternNotFound({})", id),
            DispatchOutcome::Unrecognized => defmt::write!(fmt, "Unrecognized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Channel;

    struct Sink;
    impl ChannelOutput for Sink {
        fn write(&mut self, _channel: Channel, _on: bool) {}
    }

    #[derive(Default)]
    struct Reports(usize);
    impl StatusReporter for Reports {
        fn report(&mut self, _status: &StatusSnapshot) {
            self.0 += 1;
        }
    }

    const DEVICE: DeviceInfo = DeviceInfo {
        name: "test-device",
        firmware_version: "0.0.1",
    };

    #[test]
    fn test_unrecognized_has_no_effect() {
        let mut controller = LedController::new(Sink, PatternEngine::default(), DEVICE);
        let mut reports = Reports::default();
        controller.dispatch(Command::StartPattern { id: 4 }, 0, &mut reports);

        let outcome = controller.dispatch(Command::Unrecognized, 10, &mut reports);
        assert_eq!(outcome, DispatchOutcome::Unrecognized);
        assert!(controller.engine().is_active());
        assert_eq!(reports.0, 1);
    }

    #[test]
    fn test_snapshot_uptime_in_seconds() {
        let controller = LedController::new(Sink, PatternEngine::default(), DEVICE);
        let snapshot = controller.snapshot(61_999);
        assert_eq!(snapshot.uptime_secs, 61);
        assert_eq!(snapshot.device_name, "test-device");
        assert_eq!(snapshot.levels, ChannelLevels::ALL_OFF);
    }
}

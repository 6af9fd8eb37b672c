//! Integration Tests für LED Logic
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockChannelOutput

use ambient_core::{
    Channel, ChannelLevels, ChannelOutput, Command, DEFAULT_CATALOG, DeviceInfo, DispatchOutcome,
    EngineState, FlagStore, LedController, PatternEngine, RegistrationGate, StatusReporter,
    StatusSnapshot, StorageError,
};

// ============================================================================
// Mocks
// ============================================================================

/// Zeichnet jeden Schreibzugriff auf die LED-Pins auf
#[derive(Default)]
pub struct MockChannelOutput {
    pub pins: ChannelLevels,
    pub write_count: usize,
}

impl MockChannelOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChannelOutput for MockChannelOutput {
    fn write(&mut self, channel: Channel, on: bool) {
        self.pins.set(channel, on);
        self.write_count += 1;
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub reports: Vec<StatusSnapshot>,
}

impl StatusReporter for RecordingReporter {
    fn report(&mut self, status: &StatusSnapshot) {
        self.reports.push(*status);
    }
}

#[derive(Default)]
pub struct MemoryFlagStore {
    pub value: bool,
    pub set_count: usize,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FlagStore for MemoryFlagStore {
    fn get(&mut self) -> Result<bool, StorageError> {
        if self.fail_reads {
            return Err(StorageError::ReadFailed);
        }
        Ok(self.value)
    }

    fn set(&mut self, value: bool) -> Result<(), StorageError> {
        self.set_count += 1;
        if self.fail_writes {
            return Err(StorageError::WriteFailed);
        }
        self.value = value;
        Ok(())
    }
}

const DEVICE: DeviceInfo = DeviceInfo {
    name: "SmartAmbient-3LED",
    firmware_version: "2.0.0",
};

fn controller() -> LedController<MockChannelOutput> {
    LedController::new(MockChannelOutput::new(), PatternEngine::default(), DEVICE)
}

fn levels(red: bool, yellow: bool, green: bool) -> ChannelLevels {
    ChannelLevels::new(red, yellow, green)
}

// ============================================================================
// Tests: Channel State
// ============================================================================

#[test]
fn test_startup_state_is_all_off() {
    let controller = controller();
    assert_eq!(controller.channels().levels(), ChannelLevels::ALL_OFF);
    assert_eq!(controller.channels().output().pins, ChannelLevels::ALL_OFF);
}

#[test]
fn test_set_all_get_each_channel() {
    let mut controller = controller();
    let channels = controller.channels_mut();
    for (r, y, g) in [(true, false, true), (false, true, false), (true, true, true)] {
        channels.set_all(r, y, g);
        assert_eq!(channels.get(Channel::Red), r);
        assert_eq!(channels.get(Channel::Yellow), y);
        assert_eq!(channels.get(Channel::Green), g);
        // Ausgang entspricht immer dem gespeicherten Zustand
        assert_eq!(channels.output().pins, levels(r, y, g));
    }
}

// ============================================================================
// Tests: Pattern Engine
// ============================================================================

#[test]
fn test_rock_pattern_scenario() {
    let mut controller = controller();
    let mut reporter = RecordingReporter::default();

    controller.dispatch(Command::StartPattern { id: 1 }, 0, &mut reporter);
    assert_eq!(controller.channels().levels(), levels(true, false, false));

    assert!(!controller.tick(140));
    assert_eq!(controller.channels().levels(), levels(true, false, false));

    assert!(controller.tick(150));
    assert_eq!(controller.channels().levels(), ChannelLevels::ALL_OFF);
    assert_eq!(controller.engine().current_step(), Some(1));

    assert!(controller.tick(260));
    assert_eq!(controller.channels().levels(), levels(true, true, false));
    assert_eq!(controller.engine().current_step(), Some(2));
}

#[test]
fn test_every_pattern_loops_twice_in_order() {
    for pattern in DEFAULT_CATALOG.patterns() {
        let mut controller = controller();
        let mut reporter = RecordingReporter::default();
        controller.dispatch(
            Command::StartPattern {
                id: i32::from(pattern.id),
            },
            0,
            &mut reporter,
        );

        let mut now = 0u64;
        let mut index = 0usize;
        for _ in 0..(2 * pattern.step_count()) {
            let expected = pattern.steps[index].levels;
            assert_eq!(controller.channels().levels(), expected);

            // Kurz vor Ablauf: nichts passiert
            let duration = u64::from(pattern.steps[index].duration_ms);
            assert!(!controller.tick(now + duration - 1));

            now += duration;
            assert!(controller.tick(now));
            index = (index + 1) % pattern.step_count();
        }
        assert_eq!(controller.engine().current_step(), Some(0));
        assert_eq!(controller.channels().levels(), pattern.steps[0].levels);
    }
}

#[test]
fn test_tick_before_duration_never_writes() {
    let mut controller = controller();
    let mut reporter = RecordingReporter::default();
    controller.dispatch(Command::StartPattern { id: 3 }, 1_000, &mut reporter);
    let writes = controller.channels().output().write_count;

    for t in (1_000..1_800).step_by(10) {
        assert!(!controller.tick(t));
    }
    assert_eq!(controller.channels().output().write_count, writes);
}

#[test]
fn test_invalid_pattern_from_inactive() {
    let mut controller = controller();
    let mut reporter = RecordingReporter::default();
    controller
        .channels_mut()
        .set_levels(levels(false, true, false));

    let outcome = controller.dispatch(Command::StartPattern { id: 7 }, 0, &mut reporter);
    assert_eq!(outcome, DispatchOutcome::PatternNotFound(7));
    assert_eq!(controller.engine().state(), EngineState::Inactive);
    assert_eq!(controller.channels().levels(), levels(false, true, false));
    assert!(reporter.reports.is_empty());
}

#[test]
fn test_engine_start_invalid_keeps_previous_pattern() {
    // Engine direkt (ohne Dispatcher) - kein vorheriges stop()
    let mut engine = PatternEngine::default();
    let mut channels = ambient_core::ChannelState::new(MockChannelOutput::new());
    engine.start(6, 0, &mut channels).unwrap();
    let before = (engine.state(), channels.levels());
    assert!(engine.start(0, 50, &mut channels).is_err());
    assert_eq!((engine.state(), channels.levels()), before);

    // Pattern läuft normal weiter
    assert!(engine.advance(200, &mut channels));
    assert_eq!(channels.levels(), ChannelLevels::ALL_OFF);
}

#[test]
fn test_dispatcher_invalid_pattern_stops_running_pattern() {
    let mut controller = controller();
    let mut reporter = RecordingReporter::default();
    controller.dispatch(Command::StartPattern { id: 2 }, 0, &mut reporter);
    controller.tick(300);
    let frozen = controller.channels().levels();

    controller.dispatch(Command::StartPattern { id: 0 }, 310, &mut reporter);
    assert!(!controller.engine().is_active());
    // kein Restore: LEDs bleiben auf dem letzten Frame
    assert_eq!(controller.channels().levels(), frozen);
    assert!(!controller.tick(5_000));
}

#[test]
fn test_stop_halts_animation() {
    let mut engine = PatternEngine::default();
    let mut channels = ambient_core::ChannelState::new(MockChannelOutput::new());
    engine.start(4, 0, &mut channels).unwrap();
    engine.advance(500, &mut channels);
    let frozen = channels.levels();
    let writes = channels.output().write_count;

    assert_eq!(engine.stop().map(|p| p.name), Some("Classical"));
    for t in [600, 1_000, 10_000, 100_000] {
        assert!(!engine.advance(t, &mut channels));
    }
    assert_eq!(channels.levels(), frozen);
    assert_eq!(channels.output().write_count, writes);
}

#[test]
fn test_restart_same_pattern_resets_to_step_zero() {
    let mut controller = controller();
    let mut reporter = RecordingReporter::default();
    controller.dispatch(Command::StartPattern { id: 1 }, 0, &mut reporter);
    controller.tick(150);
    controller.tick(250);
    assert_eq!(controller.engine().current_step(), Some(2));

    controller.dispatch(Command::StartPattern { id: 1 }, 300, &mut reporter);
    assert_eq!(controller.engine().current_step(), Some(0));
    assert!(!controller.tick(440));
    assert!(controller.tick(450));
}

// ============================================================================
// Tests: Command Dispatcher
// ============================================================================

#[test]
fn test_set_red_during_pattern_merges_and_reports_once() {
    let mut controller = controller();
    let mut reporter = RecordingReporter::default();
    controller.dispatch(Command::StartPattern { id: 2 }, 0, &mut reporter);
    controller.tick(300);
    controller.tick(600);
    // Pop Step 2: nur Grün
    assert_eq!(controller.channels().levels(), levels(false, false, true));
    reporter.reports.clear();

    let outcome = controller.dispatch(
        Command::SetChannels {
            red: Some(true),
            yellow: None,
            green: None,
        },
        700,
        &mut reporter,
    );

    assert_eq!(outcome, DispatchOutcome::ChannelsSet(levels(true, false, true)));
    assert!(!controller.engine().is_active());
    assert_eq!(controller.channels().levels(), levels(true, false, true));
    assert_eq!(reporter.reports.len(), 1);
    assert_eq!(reporter.reports[0].levels, levels(true, false, true));

    // Pattern ist wirklich gestoppt
    assert!(!controller.tick(10_000));
}

#[test]
fn test_all_on_all_off_stop_pattern() {
    let mut controller = controller();
    let mut reporter = RecordingReporter::default();
    controller.dispatch(Command::StartPattern { id: 5 }, 0, &mut reporter);

    controller.dispatch(Command::AllOff, 10, &mut reporter);
    assert!(!controller.engine().is_active());
    assert_eq!(controller.channels().levels(), ChannelLevels::ALL_OFF);

    let writes = controller.channels().output().write_count;
    let outcome = controller.dispatch(Command::AllOn, 20, &mut reporter);
    assert_eq!(outcome, DispatchOutcome::ChannelsSet(ChannelLevels::ALL_ON));
    assert_eq!(controller.channels().levels(), ChannelLevels::ALL_ON);
    assert_eq!(controller.channels().output().pins, ChannelLevels::ALL_ON);
    assert_eq!(controller.channels().output().write_count, writes + 3);
    assert_eq!(reporter.reports.len(), 3);
}

// ============================================================================
// Tests: Scheduler-Durchlauf (poll)
// ============================================================================

#[test]
fn test_poll_without_command_only_ticks() {
    let mut controller = controller();
    let mut reporter = RecordingReporter::default();
    controller.poll(Some(Command::StartPattern { id: 1 }), 0, &mut reporter);
    assert_eq!(controller.channels().levels(), levels(true, false, false));

    assert_eq!(controller.poll(None, 149, &mut reporter), None);
    assert_eq!(controller.channels().levels(), levels(true, false, false));

    // Rock Step 1: alles aus
    assert_eq!(controller.poll(None, 150, &mut reporter), None);
    assert_eq!(controller.channels().levels(), ChannelLevels::ALL_OFF);
    assert_eq!(reporter.reports.len(), 1);
}

#[test]
fn test_poll_applies_command_before_tick_one_command_per_pass() {
    let mut controller = controller();
    let mut reporter = RecordingReporter::default();
    let mut queue = std::collections::VecDeque::from([Command::StartPattern { id: 1 }]);
    controller.poll(queue.pop_front(), 0, &mut reporter);

    queue.push_back(Command::SetChannels {
        red: None,
        yellow: None,
        green: Some(true),
    });
    queue.push_back(Command::AllOff);

    // Rock Step 0 ist abgelaufen: ohne Kommando würde dieser Tick auf "aus" schalten
    let outcome = controller.poll(queue.pop_front(), 200, &mut reporter);
    assert_eq!(outcome, Some(DispatchOutcome::ChannelsSet(levels(true, false, true))));
    assert_eq!(controller.channels().levels(), levels(true, false, true));
    assert!(!controller.engine().is_active());

    // Das zweite Kommando wartet auf den nächsten Durchlauf
    assert_eq!(queue.len(), 1);
    assert_eq!(reporter.reports.len(), 2);

    let outcome = controller.poll(queue.pop_front(), 210, &mut reporter);
    assert_eq!(outcome, Some(DispatchOutcome::ChannelsSet(ChannelLevels::ALL_OFF)));
    assert_eq!(controller.channels().levels(), ChannelLevels::ALL_OFF);
    assert!(queue.is_empty());
}

#[test]
fn test_unrecognized_reports_nothing() {
    let mut controller = controller();
    let mut reporter = RecordingReporter::default();
    controller.dispatch(Command::AllOn, 0, &mut reporter);
    let writes = controller.channels().output().write_count;

    assert_eq!(
        controller.dispatch(Command::Unrecognized, 5, &mut reporter),
        DispatchOutcome::Unrecognized
    );
    assert_eq!(reporter.reports.len(), 1);
    assert_eq!(controller.channels().output().write_count, writes);
}

#[test]
fn test_pattern_start_reports_first_frame() {
    let mut controller = controller();
    let mut reporter = RecordingReporter::default();
    let outcome = controller.dispatch(Command::StartPattern { id: 6 }, 12_345, &mut reporter);

    match outcome {
        DispatchOutcome::PatternStarted(pattern) => assert_eq!(pattern.name, "Hip-Hop"),
        other => panic!("Expected PatternStarted, got {:?}", other),
    }
    assert_eq!(reporter.reports.len(), 1);
    let status = reporter.reports[0];
    assert_eq!(status.levels, levels(true, true, false));
    assert_eq!(status.uptime_secs, 12);
    assert_eq!(status.device_name, "SmartAmbient-3LED");
    assert_eq!(status.firmware_version, "2.0.0");
}

// ============================================================================
// Tests: Registration Gate
// ============================================================================

#[test]
fn test_registration_pending_until_marked() {
    let mut gate = RegistrationGate::new(MemoryFlagStore::default());
    assert!(gate.is_pending());
    gate.mark_registered().unwrap();
    assert!(!gate.is_pending());
    assert!(gate.store().value);
}

#[test]
fn test_registration_skipped_when_flag_persisted() {
    let mut gate = RegistrationGate::new(MemoryFlagStore {
        value: true,
        ..Default::default()
    });
    assert!(!gate.is_pending());
    assert_eq!(gate.store().set_count, 0);
}

#[test]
fn test_registration_read_failure_counts_as_pending() {
    let mut gate = RegistrationGate::new(MemoryFlagStore {
        value: true,
        fail_reads: true,
        ..Default::default()
    });
    assert!(gate.is_pending());
}

#[test]
fn test_registration_sent_once_per_boot_even_if_write_fails() {
    let mut gate = RegistrationGate::new(MemoryFlagStore {
        fail_writes: true,
        ..Default::default()
    });
    assert!(gate.is_pending());
    assert_eq!(gate.mark_registered(), Err(StorageError::WriteFailed));
    assert!(!gate.is_pending());
    assert!(!gate.store().value);
}

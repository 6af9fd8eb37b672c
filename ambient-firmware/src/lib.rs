// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von ambient-core
pub use ambient_core::{
    Command, DispatchOutcome, LedController, PatternEngine, StatusReporter, StatusSnapshot,
};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Diese Type-Aliase vereinfachen die Lesbarkeit der Funktionssignaturen.
// Statt:  Publisher<'static, NoopRawMutex, StatusSnapshot, 4, 1, 1>
// Nutze:  StatusPublisher

/// Channel für LED-Kommandos (MQTT Task → LED Task)
/// - 4: Nachrichten-Kapazität (Kommandos werden einzeln pro Tick verarbeitet)
pub type CommandChannel = embassy_sync::channel::Channel<NoopRawMutex, Command, 4>;

/// Sender für LED-Kommandos (MQTT Task sendet)
pub type CommandSender = Sender<'static, NoopRawMutex, Command, 4>;

/// Receiver für LED-Kommandos (LED Task empfängt)
pub type CommandReceiver = Receiver<'static, NoopRawMutex, Command, 4>;

/// PubSubChannel für Status-Snapshots (LED Task → MQTT Task)
/// - 4: Nachrichten-Kapazität im Queue
/// - 1: Maximale Anzahl Subscribers (MQTT)
/// - 1: Maximale Anzahl Publishers (LED Task)
pub type StatusChannel = PubSubChannel<NoopRawMutex, StatusSnapshot, 4, 1, 1>;

/// Publisher für Status-Snapshots
pub type StatusPublisher = Publisher<'static, NoopRawMutex, StatusSnapshot, 4, 1, 1>;

/// Subscriber für Status-Snapshots
pub type StatusSubscriber = Subscriber<'static, NoopRawMutex, StatusSnapshot, 4, 1, 1>;

/// StatusReporter der Snapshots in den StatusChannel published
///
/// Ist der Queue voll, wird die älteste Meldung verworfen
/// (der neueste Zustand ist wichtiger als die Historie).
pub struct ChannelStatusReporter {
    publisher: StatusPublisher,
}

impl ChannelStatusReporter {
    pub fn new(publisher: StatusPublisher) -> Self {
        Self { publisher }
    }
}

impl StatusReporter for ChannelStatusReporter {
    fn report(&mut self, status: &StatusSnapshot) {
        self.publisher.publish_immediate(*status);
    }
}

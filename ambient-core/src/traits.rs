//! Hardware- und Kollaborator-Traits
//!
//! Diese Traits definieren die Schnittstellen nach außen
//! ohne konkrete Implementierung.

use crate::types::{Channel, StatusSnapshot};

/// Trait für den Schreibzugriff auf eine physische LED
///
/// Jeder Aufruf setzt den Pegel sofort, ohne Pufferung.
///
/// # Implementierungen
/// - **Production:** GpioChannelOutput (drei ESP32 GPIO-Ausgänge)
/// - **Testing:** MockChannelOutput (in-memory Mock)
pub trait ChannelOutput {
    /// Schreibt den Zustand eines Kanals auf den Ausgang
    fn write(&mut self, channel: Channel, on: bool);
}

/// Empfänger für Status-Snapshots (z.B. MQTT Status-Topic)
pub trait StatusReporter {
    fn report(&mut self, status: &StatusSnapshot);
}

/// Fehler-Typ für den persistenten Flag-Speicher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    ReadFailed,
    WriteFailed,
}

/// Persistenter boolescher Flag-Speicher (z.B. Flash-Sektor)
///
/// Wird für das "ist registriert"-Flag verwendet.
pub trait FlagStore {
    fn get(&mut self) -> Result<bool, StorageError>;
    fn set(&mut self, value: bool) -> Result<(), StorageError>;
}

#[cfg(feature = "defmt")]
impl defmt::Format for StorageError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            StorageError::ReadFailed => defmt::write!(fmt, "Flag read failed"),
            StorageError::WriteFailed => defmt::write!(fmt, "Flag write failed"),
        }
    }
}

//! Core Types für die 3-LED-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

/// Einer der drei LED-Kanäle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Yellow,
    Green,
}

impl Channel {
    /// Alle Kanäle in fester Reihenfolge (Rot, Gelb, Grün)
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Yellow, Channel::Green];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Yellow => "yellow",
            Channel::Green => "green",
        }
    }
}

/// Kombination der drei Kanal-Zustände (an/aus)
///
/// Wird sowohl als Frame eines Patterns als auch als
/// aktueller LED-Zustand verwendet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelLevels {
    pub red: bool,
    pub yellow: bool,
    pub green: bool,
}

impl ChannelLevels {
    pub const ALL_OFF: Self = Self::new(false, false, false);
    pub const ALL_ON: Self = Self::new(true, true, true);

    pub const fn new(red: bool, yellow: bool, green: bool) -> Self {
        Self { red, yellow, green }
    }

    pub fn get(&self, channel: Channel) -> bool {
        match channel {
            Channel::Red => self.red,
            Channel::Yellow => self.yellow,
            Channel::Green => self.green,
        }
    }

    pub fn set(&mut self, channel: Channel, on: bool) {
        match channel {
            Channel::Red => self.red = on,
            Channel::Yellow => self.yellow = on,
            Channel::Green => self.green = on,
        }
    }
}

/// Dekodiertes LED-Kommando
///
/// Wird vom MQTT-Task (nach JSON-Parsing) an den LED-Task gesendet.
/// Fehlerhafte Payloads werden bereits beim Dekodieren zu `Unrecognized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Alle LEDs einschalten
    AllOn,
    /// Alle LEDs ausschalten
    AllOff,
    /// Einzelne Kanäle setzen, `None` behält den aktuellen Wert
    SetChannels {
        red: Option<bool>,
        yellow: Option<bool>,
        green: Option<bool>,
    },
    /// Pattern aus dem Katalog starten
    StartPattern { id: i32 },
    /// Unbekanntes oder ungültiges Kommando
    Unrecognized,
}

/// Statische Geräte-Identität für Status-Meldungen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: &'static str,
    pub firmware_version: &'static str,
}

/// Status-Snapshot für externe Beobachter
///
/// Wird nach jeder erfolgreichen Kommando-Ausführung und periodisch
/// (Heartbeat, im Transport-Layer) veröffentlicht.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub device_name: &'static str,
    pub firmware_version: &'static str,
    pub levels: ChannelLevels,
    pub uptime_secs: u64,
}

impl StatusSnapshot {
    /// Kopie mit aktualisierter Uptime (für Heartbeats)
    pub fn with_uptime(self, uptime_secs: u64) -> Self {
        Self {
            uptime_secs,
            ..self
        }
    }
}

/// Einmalige Geräte-Beschreibung für die Registrierung beim Hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor<'a> {
    pub device_name: &'a str,
    pub device_type: &'a str,
    pub mac_address: &'a str,
    pub ip_address: &'a str,
    pub firmware_version: &'a str,
    pub capabilities: &'a str,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Channel {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChannelLevels {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "R:{} Y:{} G:{}",
            self.red as u8,
            self.yellow as u8,
            self.green as u8
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Command::AllOn => defmt::write!(fmt, "AllOn"),
            Command::AllOff => defmt::write!(fmt, "AllOff"),
            Command::SetChannels { red, yellow, green } => {
                defmt::write!(
                    fmt,
                    "SetChannels {{ red: {}, yellow: {}, green: {} }}",
                    red,
                    yellow,
                    green
                )
            }
            Command::StartPattern { id } => defmt::write!(fmt, "StartPattern {{ id: {} }}", id),
            Command::Unrecognized => defmt::write!(fmt, "Unrecognized"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusSnapshot {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusSnapshot {{ device: {}, version: {}, {}, uptime: {}s }}",
            self.device_name,
            self.firmware_version,
            self.levels,
            self.uptime_secs
        )
    }
}

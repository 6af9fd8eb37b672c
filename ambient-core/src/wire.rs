//! JSON Wire-Format für MQTT-Nachrichten
//!
//! - Kommandos (Hub → ESP32): `{"command":"set","red":true}`
//! - Status (ESP32 → Hub): `{"device":..,"version":..,"red":..,"yellow":..,"green":..,"uptime":..}`
//! - Registrierung (ESP32 → Hub): camelCase Geräte-Beschreibung
//!
//! Hinweis: serde-json-core kann keine Strings mit Escape-Sequenzen
//! borgen, solche Kommandos werden zu `Command::Unrecognized`.

use core::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::types::{Command, DeviceDescriptor, StatusSnapshot};

/// Fehler beim Serialisieren
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    BufferTooSmall,
}

/// Eingehende Kommando-Nachricht (Rohform)
#[derive(Debug, Deserialize)]
struct CommandMessage<'a> {
    #[serde(default)]
    command: &'a str,
    #[serde(default)]
    red: Option<bool>,
    #[serde(default)]
    yellow: Option<bool>,
    #[serde(default)]
    green: Option<bool>,
    #[serde(default, rename = "patternId", deserialize_with = "saturating_pattern_id")]
    pattern_id: Option<i32>,
}

/// Liest `patternId` als beliebige JSON-Zahl
///
/// Werte außerhalb von i32 werden auf i32::MIN/MAX begrenzt (stehen nie im
/// Katalog), Nachkommastellen werden abgeschnitten.
fn saturating_pattern_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    // Über f64, damit auch Zahlen jenseits von i64/u64 nicht das ganze Kommando verwerfen
    deserializer.deserialize_f64(PatternIdVisitor).map(Some)
}

struct PatternIdVisitor;

impl Visitor<'_> for PatternIdVisitor {
    type Value = i32;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a pattern id number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i32, E> {
        Ok(v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i32, E> {
        Ok(i32::try_from(v).unwrap_or(i32::MAX))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i32, E> {
        if v.is_nan() {
            return Err(E::invalid_value(de::Unexpected::Float(v), &self));
        }
        // `as` sättigt bei Float → Int
        Ok(v as i32)
    }
}

impl From<CommandMessage<'_>> for Command {
    fn from(msg: CommandMessage<'_>) -> Self {
        match msg.command {
            "on" => Command::AllOn,
            "off" => Command::AllOff,
            "set" => Command::SetChannels {
                red: msg.red,
                yellow: msg.yellow,
                green: msg.green,
            },
            "pattern" => match msg.pattern_id {
                Some(id) => Command::StartPattern { id },
                None => Command::Unrecognized,
            },
            _ => Command::Unrecognized,
        }
    }
}

/// Dekodiert eine MQTT-Payload zu einem Kommando
///
/// Fehlerhaftes JSON wird nie als Fehler weitergereicht,
/// sondern als `Command::Unrecognized`.
pub fn decode_command(payload: &[u8]) -> Command {
    match serde_json_core::from_slice::<CommandMessage>(payload) {
        Ok((msg, _)) => msg.into(),
        Err(_) => Command::Unrecognized,
    }
}

#[derive(Serialize)]
struct StatusMessage<'a> {
    device: &'a str,
    version: &'a str,
    red: bool,
    yellow: bool,
    green: bool,
    uptime: u64,
}

/// Serialisiert einen Status-Snapshot, gibt die Anzahl Bytes zurück
pub fn encode_status(status: &StatusSnapshot, buf: &mut [u8]) -> Result<usize, WireError> {
    let msg = StatusMessage {
        device: status.device_name,
        version: status.firmware_version,
        red: status.levels.red,
        yellow: status.levels.yellow,
        green: status.levels.green,
        uptime: status.uptime_secs,
    };
    serde_json_core::to_slice(&msg, buf).map_err(|_| WireError::BufferTooSmall)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationMessage<'a> {
    device_name: &'a str,
    device_type: &'a str,
    mac_address: &'a str,
    ip_address: &'a str,
    firmware_version: &'a str,
    capabilities: &'a str,
}

/// Serialisiert die Geräte-Beschreibung für das Register-Topic
pub fn encode_registration(
    descriptor: &DeviceDescriptor<'_>,
    buf: &mut [u8],
) -> Result<usize, WireError> {
    let msg = RegistrationMessage {
        device_name: descriptor.device_name,
        device_type: descriptor.device_type,
        mac_address: descriptor.mac_address,
        ip_address: descriptor.ip_address,
        firmware_version: descriptor.firmware_version,
        capabilities: descriptor.capabilities,
    };
    serde_json_core::to_slice(&msg, buf).map_err(|_| WireError::BufferTooSmall)
}

#[cfg(feature = "defmt")]
impl defmt::Format for WireError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            WireError::BufferTooSmall => defmt::write!(fmt, "Buffer too small"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_pattern_out_of_i32_range() {
        let cmd = decode_command(br#"{"command":"pattern","patternId":99999999999}"#);
        assert_eq!(cmd, Command::StartPattern { id: i32::MAX });
    }

    #[test]
    fn test_decode_missing_command_field() {
        assert_eq!(decode_command(br#"{"red":true}"#), Command::Unrecognized);
    }
}

// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use ambient_core::DeviceInfo;

// ============================================================================
// LED Konfiguration (3 einzelne LEDs)
// ============================================================================

/// GPIO-Pin der roten LED
pub const LED_RED_GPIO_PIN: u8 = 18;

/// GPIO-Pin der gelben LED
pub const LED_YELLOW_GPIO_PIN: u8 = 21;

/// GPIO-Pin der grünen LED
pub const LED_GREEN_GPIO_PIN: u8 = 19;

/// Intervall des Scheduler-Loops in Millisekunden
/// Muss deutlich kleiner sein als der kürzeste Pattern-Step (50 ms)
pub const LED_TICK_INTERVAL_MS: u64 = 10;

/// Leuchtdauer pro LED beim Selbsttest nach dem Boot
pub const SELF_TEST_STEP_MS: u64 = 300;

// ============================================================================
// Geräte-Informationen
// ============================================================================

pub const DEVICE_NAME: &str = "SmartAmbient-3LED";
pub const DEVICE_TYPE: &str = "ESP32";
pub const FIRMWARE_VERSION: &str = "2.0.0";
pub const DEVICE_CAPABILITIES: &str = "led_control,mqtt_client";

pub const DEVICE_INFO: DeviceInfo = DeviceInfo {
    name: DEVICE_NAME,
    firmware_version: FIRMWARE_VERSION,
};

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Maximale Zeit bis zur ersten IP-Adresse
/// Danach wird der Chip neu gestartet
pub const WIFI_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// MQTT Konfiguration
// ============================================================================

/// MQTT Broker Hostname oder IP-Adresse (Raspberry-Pi-Hub)
/// Wird zur Build-Zeit aus der Environment Variable MQTT_BROKER geladen
pub const MQTT_BROKER: &str = env!(
    "MQTT_BROKER",
    "MQTT Broker nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Broker Port
pub const MQTT_PORT: u16 = 1883;

/// MQTT Client ID
/// Wird zur Build-Zeit aus der Environment Variable MQTT_CLIENT_ID geladen
pub const MQTT_CLIENT_ID: &str = env!(
    "MQTT_CLIENT_ID",
    "MQTT Client ID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Topic für eingehende LED-Kommandos (JSON)
pub const MQTT_TOPIC_COMMAND: &str = "smartambient/led/command";

/// Topic für Status-Meldungen (JSON)
pub const MQTT_TOPIC_STATUS: &str = "smartambient/led/status";

/// Topic für die einmalige Geräte-Registrierung (JSON)
pub const MQTT_TOPIC_REGISTER: &str = "smartambient/device/register";

/// MQTT Reconnect Delay in Sekunden
pub const MQTT_RECONNECT_DELAY_SECS: u64 = 5;

/// Intervall für periodische Status-Meldungen (Heartbeat)
pub const HEARTBEAT_INTERVAL_SECS: u64 = 60;

/// MQTT Keep-Alive in Sekunden (muss größer als der Heartbeat sein,
/// da jeder Heartbeat-Publish die Verbindung aktiv hält)
pub const MQTT_KEEP_ALIVE_SECS: u16 = 90;

/// MQTT Buffer-Größe in Bytes
pub const MQTT_BUFFER_SIZE: usize = 512;

/// JSON Serialisierungs-Buffer für Status und Registrierung
pub const JSON_BUFFER_SIZE: usize = 256;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Persistenter Speicher
// ============================================================================

/// Flash-Offset des Registrierungs-Flags
/// Liegt im (ungenutzten) NVS-Bereich der Standard-Partitionstabelle
pub const REGISTRATION_FLAG_OFFSET: u32 = 0x9000;

/// Marker für "registriert" (gelöschter Flash liest 0xFFFF_FFFF)
pub const REGISTRATION_FLAG_MAGIC: u32 = 0x5245_4731; // "REG1"

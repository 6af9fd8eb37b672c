// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über Embassy Channels (MQTT → LED Kommandos, LED → MQTT Status).

pub mod led;
pub mod mqtt;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use led::led_task;
pub use mqtt::mqtt_task;
pub use wifi::{connection_task, dhcp_task, net_task};

//! Ambient Core - Platform-agnostic LED Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, den Pattern-Katalog, die Pattern-Engine
//! und den Command-Dispatcher für die 3-LED-Steuerung.

#![no_std]

pub mod catalog;
pub mod channel_state;
pub mod controller;
pub mod engine;
pub mod registration;
pub mod traits;
pub mod types;
#[cfg(feature = "serde")]
pub mod wire;

// Re-exports für einfachen Zugriff
pub use catalog::{Catalog, DEFAULT_CATALOG, Pattern, PatternError, PatternStep};
pub use channel_state::ChannelState;
pub use controller::{DispatchOutcome, LedController};
pub use engine::{EngineState, PatternEngine};
pub use registration::RegistrationGate;
pub use traits::{ChannelOutput, FlagStore, StatusReporter, StorageError};
pub use types::{Channel, ChannelLevels, Command, DeviceDescriptor, DeviceInfo, StatusSnapshot};

//! Aktueller LED-Zustand (Single Source of Truth)
//!
//! Jede Änderung wird sofort an den `ChannelOutput` durchgereicht,
//! der sichtbare LED-Zustand entspricht also immer dem gespeicherten Wert.

use crate::traits::ChannelOutput;
use crate::types::{Channel, ChannelLevels};

pub struct ChannelState<O: ChannelOutput> {
    output: O,
    levels: ChannelLevels,
}

impl<O: ChannelOutput> ChannelState<O> {
    /// Erstellt den Zustand und schaltet alle Ausgänge aus
    pub fn new(output: O) -> Self {
        let mut state = Self {
            output,
            levels: ChannelLevels::ALL_OFF,
        };
        state.set_levels(ChannelLevels::ALL_OFF);
        state
    }

    /// Überschreibt alle drei Kanäle und schreibt jeden Ausgang
    pub fn set_all(&mut self, red: bool, yellow: bool, green: bool) {
        self.set(Channel::Red, red);
        self.set(Channel::Yellow, yellow);
        self.set(Channel::Green, green);
    }

    pub fn set_levels(&mut self, levels: ChannelLevels) {
        self.set_all(levels.red, levels.yellow, levels.green);
    }

    pub fn set(&mut self, channel: Channel, on: bool) {
        self.levels.set(channel, on);
        self.output.write(channel, on);
    }

    pub fn get(&self, channel: Channel) -> bool {
        self.levels.get(channel)
    }

    pub fn levels(&self) -> ChannelLevels {
        self.levels
    }

    pub fn all_on(&mut self) {
        self.set_levels(ChannelLevels::ALL_ON);
    }

    pub fn all_off(&mut self) {
        self.set_levels(ChannelLevels::ALL_OFF);
    }

    /// Zugriff auf den Ausgang (z.B. für Assertions in Tests)
    pub fn output(&self) -> &O {
        &self.output
    }
}

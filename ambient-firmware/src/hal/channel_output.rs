// GPIO Channel Output - drei einzelne LEDs an Push-Pull Ausgängen
//
// Implementiert den ChannelOutput-Trait aus ambient-core, damit die
// Pattern-Engine ohne Hardware (mit Mock) testbar bleibt.

use ambient_core::{Channel, ChannelOutput};
use esp_hal::gpio::{Level, Output, OutputConfig, OutputPin};

/// Real Hardware Channel Output
///
/// Jede LED hängt an einem eigenen GPIO (aktiv High).
pub struct GpioChannelOutput<'a> {
    red: Output<'a>,
    yellow: Output<'a>,
    green: Output<'a>,
}

impl<'a> GpioChannelOutput<'a> {
    /// Erstellt einen neuen GpioChannelOutput, alle LEDs starten aus
    ///
    /// # Parameter
    /// - `red`, `yellow`, `green`: GPIO Peripherals der drei LEDs
    pub fn new(
        red: impl OutputPin + 'a,
        yellow: impl OutputPin + 'a,
        green: impl OutputPin + 'a,
    ) -> Self {
        let config = OutputConfig::default();
        Self {
            red: Output::new(red, Level::Low, config),
            yellow: Output::new(yellow, Level::Low, config),
            green: Output::new(green, Level::Low, config),
        }
    }
}

impl ChannelOutput for GpioChannelOutput<'_> {
    fn write(&mut self, channel: Channel, on: bool) {
        let pin = match channel {
            Channel::Red => &mut self.red,
            Channel::Yellow => &mut self.yellow,
            Channel::Green => &mut self.green,
        };
        pin.set_level(Level::from(on));
    }
}

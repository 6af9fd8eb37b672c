// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul implementiert die Traits aus ambient-core
// für die echte Hardware (GPIO und Flash).

pub mod channel_output;
pub mod flag_store;

pub use channel_output::GpioChannelOutput;
pub use flag_store::FlashFlagStore;

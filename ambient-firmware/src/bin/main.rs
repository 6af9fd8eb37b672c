// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap nur für den WiFi-Treiber (Core und Tasks arbeiten allokationsfrei)
extern crate alloc;

// Embassy: Executor, Netzwerk-Stack, Timer
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL (Takt, RNG, Timer)
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Panic-Handler mit Backtrace + defmt-Ausgabe über esp-println
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use ambient_core::RegistrationGate;
use defmt::info;
use smart_ambient_3led::config::{
    DEVICE_NAME, EXTRA_HEAP_SIZE, FIRMWARE_VERSION, MQTT_BROKER, MQTT_PORT, WIFI_HEAP_SIZE,
};
use smart_ambient_3led::hal::FlashFlagStore;
use smart_ambient_3led::tasks::{connection_task, dhcp_task, led_task, mqtt_task, net_task};
use smart_ambient_3led::{CommandChannel, StatusChannel};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, WiFi, startet Embassy Runtime und spawnt Tasks
/// (LED-Scheduler, WiFi, MQTT).
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // CPU auf 160 MHz
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("========================================");
    info!("   {} Controller", DEVICE_NAME);
    info!("   Firmware: {}", FIRMWARE_VERSION);
    info!("========================================");

    // Heap: reclaimed RAM + zusätzlicher Bereich (Größen in config.rs)
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // esp-rtos starten (Scheduler für Embassy und WiFi)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Radio + WiFi-Controller (Station-Modus)
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Seed für den TCP/IP Stack aus dem Hardware-RNG
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Static resources für embassy-net
    // 4 Sockets: MQTT (1) + DNS (1) + Reserve
    static RESOURCES: static_cell::StaticCell<StackResources<4>> = static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // Stack + Runner mit DHCPv4 auf dem STA-Interface
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // MQTT- und DHCP-Task brauchen &'static Stack
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    // Status-Channel erstellen (LED Task → MQTT Task)
    // Der Subscriber wird vor dem LED Task erstellt, damit der initiale
    // Status nach dem Selbsttest nicht verloren geht.
    static STATUS_CHANNEL: static_cell::StaticCell<StatusChannel> = static_cell::StaticCell::new();
    let status_channel = &*STATUS_CHANNEL.init(StatusChannel::new());
    let status_publisher = status_channel.publisher().unwrap();
    let status_subscriber = status_channel.subscriber().unwrap();

    // Command-Channel erstellen (MQTT Task → LED Task)
    static COMMAND_CHANNEL: static_cell::StaticCell<CommandChannel> =
        static_cell::StaticCell::new();
    let command_channel = COMMAND_CHANNEL.init(CommandChannel::new());
    let command_sender = command_channel.sender();
    let command_receiver = command_channel.receiver();

    // Spawn LED Task (Selbsttest, dann Scheduler-Loop)
    spawner
        .spawn(led_task(
            peripherals.GPIO18,
            peripherals.GPIO21,
            peripherals.GPIO19,
            status_publisher,
            command_receiver,
        ))
        .unwrap();

    // Spawn WiFi Tasks
    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    // Spawn MQTT Task (mit Flash-Flag für die einmalige Registrierung)
    info!("MQTT: Configured for {}:{}", MQTT_BROKER, MQTT_PORT);
    let registration = RegistrationGate::new(FlashFlagStore::new(peripherals.FLASH));
    spawner
        .spawn(mqtt_task(
            stack,
            status_subscriber,
            command_sender,
            registration,
        ))
        .unwrap();

    info!("Setup complete! Waiting for commands...");

    // main() hat nichts mehr zu tun
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

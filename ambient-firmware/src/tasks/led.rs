// LED Task - Scheduler-Loop für Kommandos und Pattern-Animation
use ambient_core::{Channel, ChannelOutput, DispatchOutcome, LedController, PatternEngine};
use defmt::{info, warn};
use embassy_time::{Duration, Instant, Timer};

use crate::config::{
    DEVICE_INFO, LED_GREEN_GPIO_PIN, LED_RED_GPIO_PIN, LED_TICK_INTERVAL_MS, LED_YELLOW_GPIO_PIN,
    SELF_TEST_STEP_MS,
};
use crate::hal::GpioChannelOutput;
use crate::{ChannelStatusReporter, CommandReceiver, StatusPublisher, StatusReporter};

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// LED Logic - Testbare Business Logic ohne Hardware-Abhängigkeit
///
/// Kooperativer Scheduler-Loop, pro Durchlauf:
/// 1. höchstens ein Kommando aus dem Channel holen
/// 2. `LedController::poll`: Kommando ausführen, dann Pattern-Tick
/// 3. kurz schlafen (gibt CPU an andere Tasks zurück)
///
/// # Parameter
/// - `controller`: LED-Controller (Hardware oder Mock Output)
/// - `reporter`: Empfänger für Status-Snapshots
/// - `command_receiver`: Channel Receiver für dekodierte MQTT-Kommandos
pub async fn led_logic<O: ChannelOutput, R: StatusReporter>(
    mut controller: LedController<O>,
    mut reporter: R,
    command_receiver: CommandReceiver,
) {
    self_test(&mut controller).await;

    // Initialer Status (wird nach dem Broker-Connect versendet)
    reporter.report(&controller.snapshot(now_ms()));

    loop {
        // Prüfe auf eingehende Kommandos (non-blocking, höchstens eins pro Durchlauf)
        let command = command_receiver.try_receive().ok();
        if let Some(command) = command {
            info!("LED: Command received: {}", command);
        }
        let running = controller.engine().active_pattern();

        if let Some(outcome) = controller.poll(command, now_ms(), &mut reporter) {
            // Unbekannte Kommandos lassen eine laufende Pattern weiterlaufen
            if let Some(pattern) = running.filter(|_| outcome != DispatchOutcome::Unrecognized) {
                info!("LED: Pattern {} ('{}') stopped", pattern.id, pattern.name);
            }
            log_outcome(outcome);
        }

        Timer::after(Duration::from_millis(LED_TICK_INTERVAL_MS)).await;
    }
}

fn log_outcome(outcome: DispatchOutcome) {
    match outcome {
        DispatchOutcome::ChannelsSet(levels) => info!("LED: Set LEDs - {}", levels),
        DispatchOutcome::PatternStarted(pattern) => info!(
            "LED: Pattern {} ('{}') started ({} steps)",
            pattern.id,
            pattern.name,
            pattern.step_count()
        ),
        DispatchOutcome::PatternNotFound(id) => warn!("LED: Invalid pattern ID: {}", id),
        DispatchOutcome::Unrecognized => warn!("LED: Unknown command ignored"),
    }
}

/// Selbsttest nach dem Boot: jede LED kurz einzeln an (Rot, Gelb, Grün)
async fn self_test<O: ChannelOutput>(controller: &mut LedController<O>) {
    info!("LED: Running self test...");
    let channels = controller.channels_mut();
    for channel in Channel::ALL {
        channels.set(channel, true);
        Timer::after(Duration::from_millis(SELF_TEST_STEP_MS)).await;
        channels.set(channel, false);
    }
    info!("LED: Self test complete");
}

/// LED Task - Embassy Task für parallele Ausführung
///
/// Dieser Task übernimmt die Hardware-Initialisierung und ruft dann
/// die testbare `led_logic()` Funktion auf.
///
/// # Parameter
/// - `red`, `yellow`, `green`: GPIO Peripherals der drei LEDs
/// - `status_publisher`: PubSub Publisher für Status-Snapshots
/// - `command_receiver`: Channel Receiver für MQTT-Kommandos
#[embassy_executor::task]
pub async fn led_task(
    red: esp_hal::peripherals::GPIO18<'static>,
    yellow: esp_hal::peripherals::GPIO21<'static>,
    green: esp_hal::peripherals::GPIO19<'static>,
    status_publisher: StatusPublisher,
    command_receiver: CommandReceiver,
) {
    info!(
        "LED: Red GPIO {}, Yellow GPIO {}, Green GPIO {}",
        LED_RED_GPIO_PIN, LED_YELLOW_GPIO_PIN, LED_GREEN_GPIO_PIN
    );

    // Hardware initialisieren: GpioChannelOutput kapselt die drei Ausgänge
    let output = GpioChannelOutput::new(red, yellow, green);
    let controller = LedController::new(output, PatternEngine::default(), DEVICE_INFO);

    led_logic(
        controller,
        ChannelStatusReporter::new(status_publisher),
        command_receiver,
    )
    .await;
}

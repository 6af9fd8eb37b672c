// WiFi Task - Verbindet mit WLAN und managed Connection
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer, with_timeout};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice};

use crate::config::{WIFI_CONNECT_TIMEOUT_SECS, WIFI_PASSWORD, WIFI_SSID};

/// Wartezeit nach fehlgeschlagenem Verbindungsversuch
const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung im Station-Modus:
/// - Konfiguriert und startet den Controller einmalig
/// - Verbindet mit dem Access Point
/// - Wartet auf Disconnect und verbindet erneut
///
/// Das Zeitlimit für den ersten Verbindungsaufbau überwacht `dhcp_task`.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");

    while !matches!(controller.is_started(), Ok(true)) {
        if let Err(e) = start_station(&mut controller).await {
            error!("WiFi: {}", e);
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
        }
    }
    info!("WiFi: Station started");

    loop {
        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        if let Err(e) = controller.connect_async().await {
            warn!("WiFi: Connection failed: {}", Debug2Format(&e));
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
            continue;
        }
        info!("WiFi: Connected to '{}'", WIFI_SSID);

        controller
            .wait_for_event(esp_radio::wifi::WifiEvent::StaDisconnected)
            .await;
        warn!("WiFi: Disconnected from AP, will retry...");

        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Setzt die Station-Konfiguration und startet den WiFi-Controller
async fn start_station(controller: &mut WifiController<'static>) -> Result<(), &'static str> {
    let station = ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(WIFI_SSID.into())
            .with_password(WIFI_PASSWORD.into()),
    );

    controller
        .set_config(&station)
        .map_err(|_| "Failed to set configuration")?;
    controller
        .start_async()
        .await
        .map_err(|_| "Failed to start controller")
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task
///
/// Wartet bis eine IP-Adresse vom DHCP-Server erhalten wurde
/// und loggt dann die Netzwerk-Konfiguration.
///
/// Ohne IP-Adresse nach `WIFI_CONNECT_TIMEOUT_SECS` wird der Chip
/// neu gestartet (einziger fataler Fehler der Firmware).
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    let bring_up = with_timeout(
        Duration::from_secs(WIFI_CONNECT_TIMEOUT_SECS),
        wait_for_ip(stack),
    )
    .await;

    if bring_up.is_err() {
        error!(
            "WiFi: No IP address after {}s, restarting...",
            WIFI_CONNECT_TIMEOUT_SECS
        );
        Timer::after(Duration::from_millis(100)).await;
        esp_hal::system::software_reset();
    }

    if let Some(config) = stack.config_v4() {
        info!("WiFi: Got IP address!");
        info!("  IP:      {}", Debug2Format(&config.address.address()));
        info!("  Gateway: {}", Debug2Format(&config.gateway));
        info!("  DNS:     {}", Debug2Format(&config.dns_servers));
    }
}

async fn wait_for_ip(stack: &'static Stack<'static>) {
    while !stack.is_link_up() {
        Timer::after(Duration::from_millis(500)).await;
    }

    info!("WiFi: Link is up, waiting for IP address...");

    while stack.config_v4().is_none() {
        Timer::after(Duration::from_millis(500)).await;
    }
}

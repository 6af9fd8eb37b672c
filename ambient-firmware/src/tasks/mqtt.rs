// MQTT Task - Empfängt LED-Kommandos und published Status an den Hub
use core::fmt::Write;

use ambient_core::wire::{decode_command, encode_registration, encode_status};
use ambient_core::{Command, DeviceDescriptor, RegistrationGate, StatusSnapshot};
use defmt::{Debug2Format, error, info, warn};
use embassy_futures::select::{Either3, select3};
use embassy_net::{IpAddress, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, Instant, Timer, with_timeout};
use heapless::String;

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::utils::rng_generator::CountingRng;
use rust_mqtt::utils::types::EncodedString;

use crate::config::*;
use crate::hal::FlashFlagStore;
use crate::{CommandSender, StatusSubscriber};

type Client<'a, 'b> = MqttClient<'a, TcpSocket<'b>, 5, CountingRng>;

/// Registrierungs-Gate mit Flash-Flag
pub type Registration = RegistrationGate<FlashFlagStore<'static>>;

/// MQTT Task - läuft parallel zu anderen Tasks
///
/// Dieser Task ist die Brücke zwischen Hub und LED-Task:
/// - Wartet auf Netzwerk-Verbindung
/// - Verbindet sich mit MQTT Broker und abonniert das Command-Topic
/// - Sendet einmalig die Geräte-Registrierung
/// - Dekodiert JSON-Kommandos und leitet sie an den LED-Task weiter
/// - Published Status-Snapshots **sofort bei Änderung** und als Heartbeat
/// - Automatisches Reconnect bei Fehlern
///
/// # Parameter
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `status_subscriber`: PubSub Subscriber für Status-Snapshots
/// - `command_sender`: Channel Sender für dekodierte Kommandos
/// - `registration`: Gate für die einmalige Registrierung
#[embassy_executor::task]
pub async fn mqtt_task(
    stack: &'static Stack<'static>,
    mut status_subscriber: StatusSubscriber,
    command_sender: CommandSender,
    mut registration: Registration,
) {
    info!("MQTT: Task started, waiting for network...");
    wait_for_network(stack).await;
    info!("MQTT: Network ready");

    // Letzter bekannter Status, überlebt Reconnects (für Heartbeats)
    let mut last_status: Option<StatusSnapshot> = None;

    loop {
        match mqtt_session(
            stack,
            &mut status_subscriber,
            command_sender,
            &mut registration,
            &mut last_status,
        )
        .await
        {
            Ok(_) => warn!("MQTT: Connection closed normally"),
            Err(e) => error!("MQTT: Error: {}", e),
        }
        info!("MQTT: Reconnecting in {}s...", MQTT_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MQTT_RECONNECT_DELAY_SECS)).await;
    }
}

/// Wartet bis Netzwerk-Verbindung verfügbar ist
///
/// Prüft kontinuierlich Link-Status und DHCP-Konfiguration.
async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Ereignisse innerhalb einer MQTT-Session
enum SessionEvent {
    Command(Command),
    Status(StatusSnapshot),
    Heartbeat,
}

/// Eine komplette MQTT-Session
///
/// 1. DNS-Auflösung und TCP-Verbindung
/// 2. MQTT CONNECT + SUBSCRIBE auf das Command-Topic
/// 3. Registrierung (falls noch nicht erfolgt) und initialer Status
/// 4. Event-Loop: Kommandos, Status-Änderungen, Heartbeat
///
/// Bei jedem Fehler wird die Funktion beendet und der Haupt-Loop
/// startet automatisch einen Reconnect-Versuch.
async fn mqtt_session(
    stack: &'static Stack<'static>,
    status_subscriber: &mut StatusSubscriber,
    command_sender: CommandSender,
    registration: &mut Registration,
    last_status: &mut Option<StatusSnapshot>,
) -> Result<(), MqttError> {
    // DNS Lookup
    info!("MQTT: Resolving '{}'...", MQTT_BROKER);
    let broker_ip = resolve_hostname(stack, MQTT_BROKER).await?;
    info!("MQTT: Resolved to {}", Debug2Format(&broker_ip));

    // TCP Connect
    let mut rx_buffer = [0u8; 2048];
    let mut tx_buffer = [0u8; 2048];
    let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(
        u64::from(MQTT_KEEP_ALIVE_SECS) + 10,
    )));

    socket
        .connect((broker_ip, MQTT_PORT))
        .await
        .map_err(|_| MqttError::ConnectionFailed)?;
    info!("MQTT: TCP connected");

    // MQTT Client Configuration
    let rng = CountingRng(20000);
    let mut config = ClientConfig::<5, _>::new(MqttVersion::MQTTv5, rng);
    config.client_id = EncodedString {
        string: MQTT_CLIENT_ID,
        len: MQTT_CLIENT_ID.len() as u16,
    };
    config.keep_alive = MQTT_KEEP_ALIVE_SECS;
    config.max_packet_size = MQTT_BUFFER_SIZE as u32;

    // MQTT Buffer
    let mut send_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut recv_buffer = [0u8; MQTT_BUFFER_SIZE];

    let mut client = MqttClient::<_, 5, _>::new(
        socket,
        &mut send_buffer,
        MQTT_BUFFER_SIZE,
        &mut recv_buffer,
        MQTT_BUFFER_SIZE,
        config,
    );

    // MQTT CONNECT
    client
        .connect_to_broker()
        .await
        .map_err(|_| MqttError::ProtocolError)?;
    info!("MQTT: Connected to broker");

    client
        .subscribe_to_topic(MQTT_TOPIC_COMMAND)
        .await
        .map_err(|_| MqttError::SubscribeFailed)?;
    info!("MQTT: Subscribed to: {}", MQTT_TOPIC_COMMAND);

    if registration.is_pending() {
        send_registration(&mut client, stack).await?;
        if let Err(e) = registration.mark_registered() {
            warn!("REG: Could not persist registration flag: {}", e);
        }
    } else {
        info!("REG: Device already registered, skipping");
    }

    // Verpasste Status-Änderungen nachholen, dann aktuellen Stand senden
    while let Some(status) = status_subscriber.try_next_message_pure() {
        *last_status = Some(status);
    }
    if let Some(status) = *last_status {
        publish_status(&mut client, &status.with_uptime(Instant::now().as_secs())).await?;
    }

    let heartbeat_interval = Duration::from_secs(HEARTBEAT_INTERVAL_SECS);
    let mut next_heartbeat = Instant::now() + heartbeat_interval;

    // receive_message() ist nicht cancel-safe: gewinnt Status oder Heartbeat
    // mitten in einem Paket, ist der Stream danach versetzt. Das nächste
    // receive_message() schlägt dann fehl (ReceiveFailed) und die Session
    // wird per Reconnect neu aufgebaut. Der letzte Status überlebt das.
    loop {
        let event = match select3(
            client.receive_message(),
            status_subscriber.next_message_pure(),
            Timer::at(next_heartbeat),
        )
        .await
        {
            Either3::First(Ok((topic, payload))) => {
                info!("MQTT: Received [{}]: {} bytes", topic, payload.len());
                if topic == MQTT_TOPIC_COMMAND {
                    SessionEvent::Command(decode_command(payload))
                } else {
                    warn!("MQTT: Ignoring message on unexpected topic");
                    continue;
                }
            }
            Either3::First(Err(_)) => return Err(MqttError::ReceiveFailed),
            Either3::Second(status) => SessionEvent::Status(status),
            Either3::Third(()) => SessionEvent::Heartbeat,
        };

        match event {
            SessionEvent::Command(command) => {
                // LED-Task führt aus und meldet den neuen Status zurück
                command_sender.send(command).await;
            }
            SessionEvent::Status(status) => {
                *last_status = Some(status);
                publish_status(&mut client, &status).await?;
            }
            SessionEvent::Heartbeat => {
                next_heartbeat += heartbeat_interval;
                if let Some(status) = *last_status {
                    publish_status(&mut client, &status.with_uptime(Instant::now().as_secs()))
                        .await?;
                }
            }
        }
    }
}

/// Serialisiert und published einen Status-Snapshot
async fn publish_status(client: &mut Client<'_, '_>, status: &StatusSnapshot) -> Result<(), MqttError> {
    let mut json_buffer = [0u8; JSON_BUFFER_SIZE];
    let n = encode_status(status, &mut json_buffer).map_err(|_| MqttError::EncodeFailed)?;

    client
        .send_message(
            MQTT_TOPIC_STATUS,
            &json_buffer[..n],
            QualityOfService::QoS0,
            false,
        )
        .await
        .map_err(|_| MqttError::PublishFailed)?;

    info!("MQTT: Status sent: {}", status);
    Ok(())
}

/// Sendet die Geräte-Beschreibung an das Register-Topic
async fn send_registration(
    client: &mut Client<'_, '_>,
    stack: &'static Stack<'static>,
) -> Result<(), MqttError> {
    let mut mac: String<17> = String::new();
    let [a, b, c, d, e, f] = esp_hal::efuse::Efuse::mac_address();
    write!(mac, "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}", a, b, c, d, e, f)
        .map_err(|_| MqttError::EncodeFailed)?;

    let mut ip: String<15> = String::new();
    if let Some(config) = stack.config_v4() {
        write!(ip, "{}", config.address.address()).map_err(|_| MqttError::EncodeFailed)?;
    }

    let descriptor = DeviceDescriptor {
        device_name: DEVICE_NAME,
        device_type: DEVICE_TYPE,
        mac_address: &mac,
        ip_address: &ip,
        firmware_version: FIRMWARE_VERSION,
        capabilities: DEVICE_CAPABILITIES,
    };

    let mut json_buffer = [0u8; JSON_BUFFER_SIZE];
    let n = encode_registration(&descriptor, &mut json_buffer)
        .map_err(|_| MqttError::EncodeFailed)?;

    client
        .send_message(
            MQTT_TOPIC_REGISTER,
            &json_buffer[..n],
            QualityOfService::QoS0,
            false,
        )
        .await
        .map_err(|_| MqttError::PublishFailed)?;

    info!("REG: Registration sent (MAC {}, IP {})", mac.as_str(), ip.as_str());
    Ok(())
}

/// Löst Hostname zu IPv4-Adresse auf
///
/// Nutzt embassy-net DNS-Stack mit konfigurierbarem Timeout.
async fn resolve_hostname(
    stack: &'static Stack<'static>,
    hostname: &str,
) -> Result<embassy_net::Ipv4Address, MqttError> {
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => {
            for addr in addrs {
                if let IpAddress::Ipv4(ipv4) = addr {
                    return Ok(ipv4);
                }
            }
            Err(MqttError::DnsResolutionFailed)
        }
        Ok(Err(_)) => Err(MqttError::DnsResolutionFailed),
        Err(_) => Err(MqttError::DnsTimeout),
    }
}

/// MQTT Fehler-Typen
///
/// Alle möglichen Fehler die während MQTT-Operationen auftreten können.
#[derive(Debug)]
enum MqttError {
    DnsResolutionFailed,
    DnsTimeout,
    ConnectionFailed,
    ProtocolError,
    SubscribeFailed,
    ReceiveFailed,
    PublishFailed,
    EncodeFailed,
}

impl defmt::Format for MqttError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MqttError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            MqttError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            MqttError::ConnectionFailed => defmt::write!(fmt, "Connection failed"),
            MqttError::ProtocolError => defmt::write!(fmt, "Protocol error"),
            MqttError::SubscribeFailed => defmt::write!(fmt, "Subscribe failed"),
            MqttError::ReceiveFailed => defmt::write!(fmt, "Receive failed"),
            MqttError::PublishFailed => defmt::write!(fmt, "Publish failed"),
            MqttError::EncodeFailed => defmt::write!(fmt, "JSON encode failed"),
        }
    }
}

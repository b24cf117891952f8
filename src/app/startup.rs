//! Blocking bring-up: join the network, then open the socket.
//!
//! Both steps poll forever at a fixed period. The device has nothing useful
//! to do without a controller, so there is no give-up path; `on_retry`
//! lets the caller feed the watchdog and print progress.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::adapters::wifi::{ConnectivityError, ConnectivityPort};
use crate::config::LinkConfig;
use crate::error::TransportError;
use crate::protocol::transport::TextTransport;

/// Poll `is_up` every `retry_ms` until it returns `true`.
///
/// Returns the number of failed polls before success.
pub fn wait_until(
    mut is_up: impl FnMut() -> bool,
    delay: &mut impl DelayNs,
    retry_ms: u32,
    mut on_retry: impl FnMut(u32),
) -> u32 {
    let mut attempts = 0;
    while !is_up() {
        attempts += 1;
        on_retry(attempts);
        delay.delay_ms(retry_ms);
    }
    attempts
}

/// Configure credentials, start association and block until the station
/// has an address.
pub fn join_network(
    wifi: &mut impl ConnectivityPort,
    link: &LinkConfig,
    delay: &mut impl DelayNs,
    retry_ms: u32,
    on_retry: impl FnMut(u32),
) -> Result<u32, ConnectivityError> {
    info!("############### WiFi ###############");
    info!("Connecting to {}", link.wifi_ssid);
    wifi.set_credentials(link.wifi_ssid, link.wifi_password)?;
    wifi.connect()?;

    let attempts = wait_until(
        || {
            wifi.poll();
            wifi.is_connected()
        },
        delay,
        retry_ms,
        on_retry,
    );
    info!("Wi-Fi connected (RSSI: {:?})", wifi.rssi());
    Ok(attempts)
}

/// Open the socket and block until the session is up.
///
/// The `Connected` event stays queued; the first control-loop pass
/// consumes it and sends the auth tag.
pub fn join_socket(
    socket: &mut impl TextTransport,
    link: &LinkConfig,
    delay: &mut impl DelayNs,
    retry_ms: u32,
    on_retry: impl FnMut(u32),
) -> Result<u32, TransportError> {
    info!("############### Socket ###############");
    info!("Connecting to ws://{}:{}{}", link.ws_host, link.ws_port, link.ws_path);
    socket.connect(link.ws_host, link.ws_port, link.ws_path)?;

    let attempts = wait_until(|| socket.is_connected(), delay, retry_ms, on_retry);
    info!("Socket connected");
    Ok(attempts)
}

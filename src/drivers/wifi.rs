// EMG Gesture Watch — WiFi Station
//
// Blocks until the station has an IP.  Association failures are retried
// forever with a fixed delay; the sampler never starts without a network.

use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use esp_idf_sys::EspError;

use emgwatch::config::*;

pub type Wifi = BlockingWifi<EspWifi<'static>>;

pub fn connect(
    modem: Modem,
    sys_loop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
    settings: &Settings,
) -> anyhow::Result<Wifi> {
    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sys_loop.clone(), Some(nvs))?, sys_loop)?;

    let auth_method = if settings.wifi_password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: settings
            .wifi_ssid
            .try_into()
            .map_err(|_| anyhow!("SSID too long: {}", settings.wifi_ssid))?,
        password: settings
            .wifi_password
            .try_into()
            .map_err(|_| anyhow!("WiFi password too long"))?,
        auth_method,
        ..Default::default()
    }))?;

    wifi.start()?;
    log::info!("Connecting to WiFi \"{}\"…", settings.wifi_ssid);

    let retry = Duration::from_millis(WIFI_RETRY_MS);
    let mut attempt: u32 = 0;
    while let Err(e) = try_associate(&mut wifi) {
        attempt += 1;
        log::warn!("WiFi not connected (attempt {}): {} — retrying", attempt, e);
        if let Err(e) = wifi.disconnect() {
            log::debug!("WiFi disconnect before retry failed: {}", e);
        }
        thread::sleep(retry);
    }

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    log::info!("WiFi connected, IP: {}", ip_info.ip);
    Ok(wifi)
}

fn try_associate(wifi: &mut Wifi) -> Result<(), EspError> {
    wifi.connect()?;
    wifi.wait_netif_up()?;
    Ok(())
}

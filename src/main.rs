// EMG Gesture Watch — Firmware Entry Point
//
// Boot sequence:
//   1. Bring up logging and join the configured WiFi network (retries forever).
//   2. Spawn the sampler task, which:
//        - checks the inference server (`/health`, `/info`),
//        - configures the three EMG ADC channels,
//        - samples at ~1 kHz and posts every full window to `/predict_simple`.
//
// The main thread only keeps the WiFi driver alive.

#[cfg(target_os = "espidf")]
mod drivers;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::prelude::*;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;

    use emgwatch::config::*;

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("EMG Gesture Watch firmware starting…");

    let settings = Settings::from_build_env();

    // ---- Peripherals & network --------------------------------------------
    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let wifi = drivers::wifi::connect(peripherals.modem, sys_loop, nvs, &settings)?;

    // ---- Sampler task (own stack: JSON encoding of a full window) ---------
    thread::Builder::new()
        .name("sampler".into())
        .stack_size(STACK_SAMPLER)
        .spawn(move || sampler_task(settings))?;

    // Main thread has nothing left to do — park it forever, holding the
    // WiFi driver so the station stays associated.
    let _wifi = wifi;
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

/// Check the server, set up the ADC on the sampler thread and run the loop.
/// Only returns if bring-up fails.
#[cfg(target_os = "espidf")]
fn sampler_task(settings: emgwatch::config::Settings) {
    use std::time::Duration;

    use emgwatch::config::*;
    use emgwatch::{InferenceClient, SampleWindow, Sampler, WindowPolicy};

    use crate::drivers::emg::EmgAdc;
    use crate::drivers::http::EspTransport;

    log::info!("Sampler task started");

    let mut client = InferenceClient::new(EspTransport::new(), settings.server_url, CONFIDENCE_THRESHOLD);

    if let Err(e) = client.check_health() {
        log::error!("Error reaching API at {}: {}", settings.server_url, e);
    }
    if let Err(e) = client.model_info() {
        log::warn!("Model info unavailable: {}", e);
    }

    let mut adc = match EmgAdc::new() {
        Ok(adc) => adc,
        Err(e) => {
            log::error!("EMG ADC init failed: {}", e);
            return;
        }
    };

    let window = SampleWindow::new(WindowPolicy::default());
    let mut sampler = Sampler::new(window, client, settings.device_id);
    sampler.run(&mut adc, Duration::from_millis(SAMPLE_INTERVAL_MS));
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!(
        "emgwatch is ESP-IDF firmware; build it with `--target riscv32imc-esp-espidf`. \
         The host build only exists for the library tests."
    );
}

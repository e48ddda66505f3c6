// EMG Gesture Watch — Three-Channel EMG ADC Reader
//
// One-shot ADC1 reads via raw ESP-IDF calls, 11 dB attenuation (0–3.3 V),
// 12-bit.  Raw counts are scaled linearly to volts.

use esp_idf_sys::esp;

use emgwatch::config::*;
use emgwatch::events::EmgSample;
use emgwatch::tasks::sampler::EmgSource;

pub struct EmgAdc {
    handle: esp_idf_sys::adc_oneshot_unit_handle_t,
    channels: [esp_idf_sys::adc_channel_t; EMG_CHANNELS],
}

impl EmgAdc {
    /// Claim ADC1 and configure the three EMG inputs.
    pub fn new() -> anyhow::Result<Self> {
        let channels = [ADC_CHANNEL_EMG1, ADC_CHANNEL_EMG2, ADC_CHANNEL_EMG3];
        let mut handle: esp_idf_sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();

        // SAFETY: plain C configuration calls; `handle` is written by the
        // driver and owned by this struct afterwards.
        unsafe {
            let unit_cfg = esp_idf_sys::adc_oneshot_unit_init_cfg_t {
                unit_id: esp_idf_sys::adc_unit_t_ADC_UNIT_1,
                ulp_mode: esp_idf_sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..core::mem::zeroed()
            };
            esp!(esp_idf_sys::adc_oneshot_new_unit(&unit_cfg, &mut handle))?;

            let chan_cfg = esp_idf_sys::adc_oneshot_chan_cfg_t {
                atten: esp_idf_sys::adc_atten_t_ADC_ATTEN_DB_11,
                bitwidth: esp_idf_sys::adc_bitwidth_t_ADC_BITWIDTH_12,
            };
            for channel in channels {
                esp!(esp_idf_sys::adc_oneshot_config_channel(handle, channel, &chan_cfg))?;
            }
        }

        log::info!(
            "EMG ADC initialised (GPIO{}, GPIO{}, GPIO{} @ 11 dB)",
            PIN_EMG1,
            PIN_EMG2,
            PIN_EMG3
        );
        Ok(Self { handle, channels })
    }

    fn read_volts(&self, channel: esp_idf_sys::adc_channel_t) -> anyhow::Result<f32> {
        let mut raw: i32 = 0;
        // SAFETY: `handle` was initialised in `new` and is never freed while
        // `self` lives.
        esp!(unsafe { esp_idf_sys::adc_oneshot_read(self.handle, channel, &mut raw) })?;
        Ok(raw_to_volts(raw))
    }
}

impl EmgSource for EmgAdc {
    fn read(&mut self) -> anyhow::Result<EmgSample> {
        let [c1, c2, c3] = self.channels;
        Ok(EmgSample {
            emg1: self.read_volts(c1)?,
            emg2: self.read_volts(c2)?,
            emg3: self.read_volts(c3)?,
        })
    }
}

impl Drop for EmgAdc {
    fn drop(&mut self) {
        // SAFETY: handle came from `adc_oneshot_new_unit` and is dropped once.
        unsafe {
            esp_idf_sys::adc_oneshot_del_unit(self.handle);
        }
    }
}

fn raw_to_volts(raw: i32) -> f32 {
    raw as f32 * (ADC_REFERENCE_VOLTS / ADC_FULL_SCALE_RAW)
}

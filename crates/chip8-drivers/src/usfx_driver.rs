//! Audio sink: a continuous ~770 Hz tone gated on and off by the sound
//! timer, via `usfx` for synthesis and `cpal` for the output stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chip8_core::capabilities::Audio;
use chip8_core::error::CResult;
use cpal::traits::{DeviceTrait, EventLoopTrait, HostTrait};

const TONE_FREQUENCY: u32 = 770;
const RETRIGGER_INTERVAL_MS: u64 = 60;

/// Drives the host audio device and retriggers a short tone sample on a
/// loop while `set_tone(true)` is in effect.
pub struct UsfxAudioDriver {
    on: Arc<AtomicBool>,
    mixer: Arc<Mutex<usfx::Mixer>>,
}

impl Default for UsfxAudioDriver {
    fn default() -> Self {
        let driver = Self {
            on: Arc::new(AtomicBool::new(false)),
            mixer: Arc::new(Mutex::new(usfx::Mixer::new(44_100))),
        };
        driver.spawn_stream();
        driver.spawn_retrigger();
        driver
    }
}

impl UsfxAudioDriver {
    fn spawn_stream(&self) {
        let mixer = Arc::clone(&self.mixer);

        std::thread::spawn(move || {
            let host = cpal::default_host();
            let event_loop = host.event_loop();
            let device = host
                .default_output_device()
                .expect("no default audio output device");
            let format = device
                .default_output_format()
                .expect("no default output format");

            let stream_id = event_loop
                .build_output_stream(&device, &format)
                .expect("failed to build audio output stream");
            event_loop
                .play_stream(stream_id)
                .expect("failed to start audio output stream");

            event_loop.run(move |_, stream_result| {
                let data = match stream_result {
                    Ok(data) => data,
                    Err(err) => {
                        log::error!("audio stream error: {}", err);
                        return;
                    }
                };

                if let cpal::StreamData::Output {
                    buffer: cpal::UnknownTypeOutputBuffer::F32(mut buffer),
                } = data
                {
                    mixer.lock().unwrap().generate(&mut buffer);
                }
            });
        });
    }

    fn spawn_retrigger(&self) {
        let on = Arc::clone(&self.on);
        let mixer = Arc::clone(&self.mixer);

        std::thread::spawn(move || loop {
            if on.load(Ordering::Relaxed) {
                let mut sample = usfx::Sample::default();
                sample.volume(0.4);
                sample.osc_frequency(TONE_FREQUENCY);
                sample.osc_type(usfx::OscillatorType::Square);
                sample.env_attack(0.0);
                sample.env_decay(0.0);
                sample.env_sustain(1.0);
                sample.env_release(0.02);
                mixer.lock().unwrap().play(sample);
            }
            std::thread::sleep(std::time::Duration::from_millis(RETRIGGER_INTERVAL_MS));
        });
    }
}

impl Audio for UsfxAudioDriver {
    fn set_tone(&mut self, on: bool) -> CResult {
        self.on.store(on, Ordering::Relaxed);
        Ok(())
    }
}

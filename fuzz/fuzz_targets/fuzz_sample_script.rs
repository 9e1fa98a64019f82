//! Fuzz target: sample script parsing and the intensity pipeline.
//!
//! Arbitrary text is parsed as a sample script; any script that parses is
//! replayed through classification and the intensity engine with a fixed
//! border bound.
//!
//! Invariants checked:
//! - No panics under any input
//! - Every shown width lies in `[0, 16]`
//! - Charging samples always hide the border
//!
//! cargo fuzz run fuzz_sample_script

#![no_main]

use borderwatch::adapters::sampler::ScriptedSampler;
use borderwatch::app::ports::SamplerPort;
use borderwatch::classifier::classify;
use borderwatch::config::ThresholdConfig;
use borderwatch::intensity::IntensityEngine;
use borderwatch::intensity::directive::RenderCommand;
use libfuzzer_sys::fuzz_target;

const MAX_WIDTH: f32 = 16.0;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut sampler) = ScriptedSampler::parse(text) else {
        return;
    };

    let thresholds = ThresholdConfig::default();
    let mut engine = IntensityEngine::new();
    while sampler.remaining() > 0 {
        let Some(sample) = sampler.read() else {
            continue;
        };
        let state = classify(&sample, &thresholds);
        match engine.on_sample(&sample, state, &thresholds, MAX_WIDTH) {
            RenderCommand::Show(d) => {
                assert!(!sample.is_charging(), "charging sample was shown");
                assert!((0.0..=MAX_WIDTH).contains(&d.width), "width {} out of range", d.width);
            }
            RenderCommand::Hide => {}
        }
        if engine.is_flashing() {
            let _ = engine.on_flash_tick(&thresholds);
        }
    }
});

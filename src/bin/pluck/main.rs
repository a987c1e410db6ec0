//! pluck - plays a Karplus-Strong chord on the default output device
//!
//! Run with: cargo run --bin pluck
//! Keys 1-4 re-pluck a string, q or Esc quits.

mod driver;
mod keys;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use cpal::traits::StreamTrait;
use std::time::Duration;

use pluck_dsp::{engine, EngineConfig, PluckParams};

const NUM_SECONDS: u64 = 60;
const SAMPLE_RATE: u32 = 44_100;
const FRAMES_PER_BUFFER: u32 = 256;

/// C major seventh, played an octave below these pitches.
const CHORD: [f32; 4] = [261.63, 329.63, 392.00, 493.88];

// Knob positions; the damping knob is squared into the coefficient
const DAMPING_KNOB: f32 = 0.0;
const TONE: f32 = 0.0;
const EXCITATION: f32 = 0.2;

/// Finer control near zero, where a string sustains longest.
fn damping_from_knob(knob: f32) -> f32 {
    knob * knob
}

fn chord_params() -> [PluckParams; 4] {
    CHORD.map(|freq| {
        PluckParams::new(freq / 2.0)
            .with_damping(damping_from_knob(DAMPING_KNOB))
            .with_tone(TONE)
            .with_excitation(EXCITATION)
    })
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EngineConfig::new()
        .sample_rate(SAMPLE_RATE as f32)
        .voice_count(CHORD.len());
    let (mut renderer, mut controller) = engine(&config).wrap_err("invalid engine setup")?;

    let params = chord_params();
    for (voice, p) in params.iter().enumerate() {
        renderer.pluck(voice, *p)?;
    }

    let stream = driver::open(renderer, SAMPLE_RATE, FRAMES_PER_BUFFER)?;
    stream.play().wrap_err("failed to start output stream")?;

    log::info!("playing for {NUM_SECONDS} seconds");
    keys::run(&mut controller, &params, Duration::from_secs(NUM_SECONDS))?;

    stream.pause().wrap_err("failed to stop output stream")?;
    drop(stream);
    log::info!("finished");

    Ok(())
}

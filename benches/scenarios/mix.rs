//! Benchmarks for rendering voice pools into interleaved stereo.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pluck_dsp::{
    synth::renderer::Renderer, EngineConfig, MixWeights, PluckParams, CHANNELS,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

const CHORD: [f32; 4] = [261.63, 329.63, 392.00, 493.88];

fn plucked_pool(voices: usize, weights: MixWeights) -> Renderer<()> {
    let config = EngineConfig::new()
        .sample_rate(SAMPLE_RATE)
        .voice_count(voices)
        .weights(weights);
    let mut renderer = Renderer::new(&config, ()).expect("valid bench config");
    for voice in 0..voices {
        let freq = CHORD[voice % CHORD.len()] / (1 + voice / CHORD.len()) as f32;
        renderer
            .pluck(voice, PluckParams::new(freq))
            .expect("valid pluck");
        renderer
            .set_oscillator_frequency(voice, freq)
            .expect("valid frequency");
    }
    renderer
}

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mix");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * CHANNELS];

        // === 4 strings, the default pool ===
        let mut strings = plucked_pool(4, MixWeights::default());
        group.bench_with_input(BenchmarkId::new("4_strings", size), &size, |b, &size| {
            b.iter(|| {
                strings.render(black_box(&mut buffer), size);
            })
        });

        // === 4 strings blended with sines ===
        let mut blended = plucked_pool(4, MixWeights::new(0.8, 0.2));
        group.bench_with_input(BenchmarkId::new("4_blended", size), &size, |b, &size| {
            b.iter(|| {
                blended.render(black_box(&mut buffer), size);
            })
        });

        // === 16 voices, stress ===
        let mut large = plucked_pool(16, MixWeights::new(0.8, 0.2));
        group.bench_with_input(BenchmarkId::new("16_blended", size), &size, |b, &size| {
            b.iter(|| {
                large.render(black_box(&mut buffer), size);
            })
        });
    }

    group.finish();
}

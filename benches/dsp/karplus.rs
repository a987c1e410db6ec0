//! Benchmarks for the plucked-string voice.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pluck_dsp::dsp::karplus::{PluckParams, PluckedString};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_karplus(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/karplus");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Steady state - one read, one write, a few multiplies per sample
        let mut string = PluckedString::new(SAMPLE_RATE, 20.0, 1);
        string.pluck(&PluckParams::new(110.0).with_tone(0.3));
        group.bench_with_input(BenchmarkId::new("process", size), &size, |b, _| {
            b.iter(|| {
                string.render(black_box(&mut buffer));
            })
        });

        // Pluck - refills the loop with noise, no allocation
        let mut string = PluckedString::new(SAMPLE_RATE, 20.0, 2);
        let params = PluckParams::new(55.0);
        group.bench_with_input(BenchmarkId::new("pluck_then_block", size), &size, |b, _| {
            b.iter(|| {
                string.pluck(black_box(&params));
                string.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

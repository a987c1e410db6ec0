//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pluck_dsp::dsp::delay::{delay_length_for, DelayLine};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Loop lengths across the playable range
    let pitches: &[f32] = &[
        55.0,   // A1, long loop
        440.0,  // A4
        3520.0, // A7, short loop
    ];

    for &size in BLOCK_SIZES {
        for &freq in pitches {
            let mut line = DelayLine::new(delay_length_for(20.0, SAMPLE_RATE));
            line.set_len(delay_length_for(freq, SAMPLE_RATE));

            // Read-modify-write, the string loop without the filter
            group.bench_with_input(
                BenchmarkId::new(format!("recirculate_{}hz", freq as u32), size),
                &size,
                |b, &size| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for _ in 0..size {
                            let s = line.oldest();
                            sum += s;
                            line.write(black_box(s * 0.999));
                        }
                        sum
                    })
                },
            );
        }

        let line = {
            let mut line = DelayLine::new(2048);
            let mut n = 0.0f32;
            line.fill_with(|| {
                n += 0.001;
                n
            });
            line
        };
        group.bench_with_input(BenchmarkId::new("read_at", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for i in 0..size {
                    sum += line.read_at(black_box(i * 7));
                }
                sum
            })
        });
    }

    group.finish();
}

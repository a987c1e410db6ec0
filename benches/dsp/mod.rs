//! Benchmarks for low-level DSP primitives.

mod delay;
mod karplus;
mod oscillator;

pub use delay::bench_delay;
pub use karplus::bench_karplus;
pub use oscillator::bench_oscillator;

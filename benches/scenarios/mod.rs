//! Real-world scenario benchmarks.
//!
//! These render whole voice pools through the stereo mixer, the same call the
//! audio driver makes once per callback.

mod mix;

pub use mix::bench_mix;

//! Low-level DSP primitives used by the voice pool.
//!
//! These components are allocation-free and realtime-safe once constructed,
//! making them safe to embed directly inside voice structs. They stay focused
//! on the signal-processing math; orchestration lives in `synth`.

/// Fixed-storage circular delay line.
pub mod delay;
/// Karplus-Strong plucked string.
pub mod karplus;
/// Phase-accumulator sine oscillator.
pub mod oscillator;

pub mod config; // Stream-fixed engine settings
pub mod dsp;
pub mod error;
pub mod synth; // Voice pool, control messages, rendering

pub use config::{EngineConfig, MixWeights};
pub use dsp::karplus::PluckParams;
pub use error::{EngineError, Result};
#[cfg(feature = "rtrb")]
pub use synth::engine;

/// Output is always interleaved stereo.
pub const CHANNELS: usize = 2;

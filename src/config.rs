//! Engine configuration.
//!
//! Everything here is fixed for the lifetime of a stream. Validation runs once
//! when the engine is built, never on the audio thread.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::delay::MAX_DELAY_SAMPLES;
use crate::error::{check_sample_rate, check_weight, EngineError, Result};

/// Per-voice gains applied before the pool is averaged.
///
/// Any finite, non-negative gain is accepted. Gains summing past 1 can push
/// the mix beyond full scale; the renderer clamps its output to [-1, 1].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixWeights {
    pub string: f32,
    pub oscillator: f32,
}

impl MixWeights {
    pub fn new(string: f32, oscillator: f32) -> Self {
        Self { string, oscillator }
    }

    pub fn validate(&self) -> Result<()> {
        check_weight("string weight", self.string)?;
        check_weight("oscillator weight", self.oscillator)
    }
}

impl Default for MixWeights {
    /// Strings only; the oscillators are silent until weighted in.
    fn default() -> Self {
        Self {
            string: 1.0,
            oscillator: 0.0,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Stream sample rate in Hz.
    pub sample_rate: f32,
    /// Number of (string, oscillator) pairs in the pool.
    pub voice_count: usize,
    pub weights: MixWeights,
    /// Lowest pluckable pitch. Sizes each string's delay storage, so
    /// `sample_rate / min_frequency` may not exceed [`MAX_DELAY_SAMPLES`].
    pub min_frequency: f32,
    /// Capacity of the control → audio message ring.
    pub queue_capacity: usize,
    /// Base seed for excitation noise; voice `i` uses `seed + i`.
    pub seed: u64,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn voice_count(mut self, voice_count: usize) -> Self {
        self.voice_count = voice_count;
        self
    }

    pub fn weights(mut self, weights: MixWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn min_frequency(mut self, min_frequency: f32) -> Self {
        self.min_frequency = min_frequency;
        self
    }

    pub fn queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_sample_rate(self.sample_rate)?;
        if self.voice_count == 0 {
            return Err(EngineError::NoVoices);
        }
        if !(self.min_frequency.is_finite() && self.min_frequency > 0.0) {
            return Err(EngineError::InvalidFrequency(self.min_frequency));
        }
        if self.min_frequency > self.sample_rate * 0.5 {
            return Err(EngineError::FrequencyTooHigh {
                frequency: self.min_frequency,
                max: self.sample_rate * 0.5,
            });
        }
        let period = self.sample_rate / self.min_frequency;
        if !period.is_finite() || period > MAX_DELAY_SAMPLES as f32 {
            return Err(EngineError::FrequencyTooLow {
                frequency: self.min_frequency,
                min: self.sample_rate / MAX_DELAY_SAMPLES as f32,
            });
        }
        if self.queue_capacity == 0 {
            return Err(EngineError::EmptyQueue);
        }
        self.weights.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            voice_count: 4,
            weights: MixWeights::default(),
            min_frequency: 20.0,
            queue_capacity: 64,
            seed: 0x5EED,
        }
    }
}

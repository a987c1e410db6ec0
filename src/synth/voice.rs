use crate::{
    config::MixWeights,
    dsp::{karplus::PluckedString, oscillator::SineOscillator},
};

/// One sounding note: a plucked string and a sine partner.
pub struct Voice {
    string: PluckedString,
    oscillator: SineOscillator,
}

impl Voice {
    pub fn new(sample_rate: f32, min_frequency: f32, seed: u64) -> Self {
        Self {
            string: PluckedString::new(sample_rate, min_frequency, seed),
            oscillator: SineOscillator::new(sample_rate),
        }
    }

    /// Weighted sum of both sources for one tick.
    ///
    /// Both sources always advance, even at zero weight, so re-weighting
    /// between buffers never shifts their phase.
    #[inline]
    pub fn process(&mut self, weights: &MixWeights) -> f32 {
        let string = self.string.process();
        let tone = self.oscillator.process();
        string * weights.string + tone * weights.oscillator
    }

    pub fn string(&self) -> &PluckedString {
        &self.string
    }

    pub fn string_mut(&mut self) -> &mut PluckedString {
        &mut self.string
    }

    pub fn oscillator(&self) -> &SineOscillator {
        &self.oscillator
    }

    pub fn oscillator_mut(&mut self) -> &mut SineOscillator {
        &mut self.oscillator
    }

    pub fn is_active(&self) -> bool {
        self.string.is_active()
    }
}

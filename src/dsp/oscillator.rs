use std::f32::consts::TAU;

/*
Phase Accumulator
=================

The oscillator keeps a single number, `phase`, in [0, 1). One full trip
from 0 up to 1 is one cycle of the waveform. Each sample we:

    out    = sin(2π × phase)        ← read BEFORE advancing
    phase += increment
    if phase >= 1: phase -= 1       ← wrap back into [0, 1)

where

    increment = frequency / sample_rate

Example: 441 Hz at 44.1 kHz → increment = 0.01, so exactly 100 samples per
cycle and sample 100 equals sample 0.

When sample_rate / frequency is not a whole number (440 Hz at 44.1 kHz is
100.227 samples) the cycle does not land on a sample boundary; the phase
carries the leftover fraction into the next cycle so pitch stays exact on
average.

Reading before advancing means a freshly reset oscillator always starts at
sin(0) = 0, which keeps restarts click-free and deterministic.
*/

pub struct SineOscillator {
    sample_rate: f32,
    phase: f32,
    phase_increment: f32,
}

impl SineOscillator {
    /// A silent oscillator (increment 0) at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            phase: 0.0,
            phase_increment: 0.0,
        }
    }

    /// Set the pitch. Only call between buffers.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.phase_increment = frequency / self.sample_rate;
    }

    pub fn frequency(&self) -> f32 {
        self.phase_increment * self.sample_rate
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Restart the waveform from phase 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn process(&mut self) -> f32 {
        let out = (TAU * self.phase).sin();
        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process();
        }
    }
}

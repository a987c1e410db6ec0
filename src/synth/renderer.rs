use crate::{
    config::{EngineConfig, MixWeights},
    dsp::karplus::PluckParams,
    error::Result,
    synth::{
        message::{ControlLimits, ControlMessage, MessageReceiver},
        voice::Voice,
    },
    CHANNELS,
};

/*
Rendering Contract
==================

The driver calls `render` once per hardware callback with an interleaved
stereo buffer. Inside:

  1. Buffer boundary: drain every pending control message and apply it.
     This is the ONLY place plucks and retunes happen, so a buffer is always
     rendered with one consistent set of voice parameters.

  2. For each frame:

         mix = Σ (string_i × w_string + osc_i × w_osc)  /  voice_count

     clamp to [-1, 1], and write the same value to left and right.

        voices            mix          interleaved out
        ┌─────┐
        │ v0  │──┐
        ├─────┤  │      ┌─────┐        [ L0 R0 L1 R1 L2 R2 ... ]
        │ v1  │──┼─────▶│ Σ/N │──┬──▶    ^  ^
        ├─────┤  │      └─────┘  └───────┴──┘ same sample
        │ ... │──┘
        └─────┘

Averaging by voice count keeps the sum in range as long as each voice stays
within ±1; the clamp catches the remaining cases (e.g. both weights at 1.0
with a loud excitation and the sine in phase).


Realtime Rules
--------------

render/process never allocate, lock, log or fail. The voice pool is a boxed
slice created at construction and never resized. Plucks reuse storage sized
for the lowest pitch, so applying one at the buffer boundary is also
allocation-free.
*/

pub struct Renderer<R: MessageReceiver> {
    voices: Box<[Voice]>,
    weights: MixWeights,
    limits: ControlLimits,
    rx: R,
    frames_rendered: u64,
}

impl<R: MessageReceiver> Renderer<R> {
    pub fn new(config: &EngineConfig, rx: R) -> Result<Self> {
        config.validate()?;

        let voices: Box<[Voice]> = (0..config.voice_count)
            .map(|i| {
                Voice::new(
                    config.sample_rate,
                    config.min_frequency,
                    config.seed.wrapping_add(i as u64),
                )
            })
            .collect();

        Ok(Self {
            voices,
            weights: config.weights,
            limits: ControlLimits {
                voice_count: config.voice_count,
                sample_rate: config.sample_rate,
                min_frequency: config.min_frequency,
            },
            rx,
            frames_rendered: 0,
        })
    }

    /// Fill `out` with `frame_count` interleaved stereo frames.
    ///
    /// Renders at most `out.len() / CHANNELS` frames; samples past the rendered
    /// frames are left untouched.
    pub fn render(&mut self, out: &mut [f32], frame_count: usize) {
        self.drain_messages();

        let frames = frame_count.min(out.len() / CHANNELS);
        let voice_count = self.voices.len() as f32;
        let weights = self.weights;

        for frame in out[..frames * CHANNELS].chunks_exact_mut(CHANNELS) {
            let mut mix = 0.0f32;
            for voice in self.voices.iter_mut() {
                mix += voice.process(&weights);
            }
            frame.fill((mix / voice_count).clamp(-1.0, 1.0));
        }

        self.frames_rendered += frames as u64;
    }

    fn drain_messages(&mut self) {
        while let Some(msg) = self.rx.pop() {
            self.apply(msg);
        }
    }

    /// Apply an already validated request. Out-of-range voices are ignored.
    fn apply(&mut self, msg: ControlMessage) {
        let Some(voice) = self.voices.get_mut(msg.voice()) else {
            return;
        };
        match msg {
            ControlMessage::Pluck { params, .. } => voice.string_mut().pluck(&params),
            ControlMessage::SetOscillatorFrequency { frequency, .. } => {
                voice.oscillator_mut().set_frequency(frequency)
            }
            ControlMessage::SetDamping { damping, .. } => voice.string_mut().set_damping(damping),
            ControlMessage::SetTone { tone, .. } => voice.string_mut().set_tone(tone),
            ControlMessage::ResetOscillator { .. } => voice.oscillator_mut().reset(),
        }
    }

    fn submit(&mut self, msg: ControlMessage) -> Result<()> {
        self.limits.validate(&msg)?;
        self.apply(msg);
        Ok(())
    }

    /// Restrike a string from the render thread, between buffers.
    pub fn pluck(&mut self, voice: usize, params: PluckParams) -> Result<()> {
        self.submit(ControlMessage::Pluck { voice, params })
    }

    pub fn set_oscillator_frequency(&mut self, voice: usize, frequency: f32) -> Result<()> {
        self.submit(ControlMessage::SetOscillatorFrequency { voice, frequency })
    }

    pub fn set_damping(&mut self, voice: usize, damping: f32) -> Result<()> {
        self.submit(ControlMessage::SetDamping { voice, damping })
    }

    pub fn set_tone(&mut self, voice: usize, tone: f32) -> Result<()> {
        self.submit(ControlMessage::SetTone { voice, tone })
    }

    pub fn reset_oscillator(&mut self, voice: usize) -> Result<()> {
        self.submit(ControlMessage::ResetOscillator { voice })
    }

    pub fn set_weights(&mut self, weights: MixWeights) -> Result<()> {
        weights.validate()?;
        self.weights = weights;
        Ok(())
    }

    pub fn weights(&self) -> MixWeights {
        self.weights
    }

    pub fn limits(&self) -> ControlLimits {
        self.limits
    }

    pub fn sample_rate(&self) -> f32 {
        self.limits.sample_rate
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Total frames rendered since construction.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

use rtrb::Producer;

use crate::{
    dsp::karplus::PluckParams,
    error::{EngineError, Result},
    synth::message::{ControlLimits, ControlMessage},
};

/// Control-thread handle for a running [`Renderer`](super::renderer::Renderer).
///
/// Requests are validated here, synchronously, and only valid ones are queued.
/// The renderer picks them up at the start of its next buffer.
pub struct Controller {
    tx: Producer<ControlMessage>,
    limits: ControlLimits,
}

impl Controller {
    pub fn new(tx: Producer<ControlMessage>, limits: ControlLimits) -> Self {
        Self { tx, limits }
    }

    pub fn send(&mut self, msg: ControlMessage) -> Result<()> {
        if let Err(err) = self.limits.validate(&msg) {
            log::debug!("rejected {msg:?}: {err}");
            return Err(err);
        }
        self.tx.push(msg).map_err(|_| {
            log::debug!("control queue full, dropped {msg:?}");
            EngineError::QueueFull
        })
    }

    pub fn pluck(&mut self, voice: usize, params: PluckParams) -> Result<()> {
        self.send(ControlMessage::Pluck { voice, params })
    }

    pub fn set_oscillator_frequency(&mut self, voice: usize, frequency: f32) -> Result<()> {
        self.send(ControlMessage::SetOscillatorFrequency { voice, frequency })
    }

    pub fn set_damping(&mut self, voice: usize, damping: f32) -> Result<()> {
        self.send(ControlMessage::SetDamping { voice, damping })
    }

    pub fn set_tone(&mut self, voice: usize, tone: f32) -> Result<()> {
        self.send(ControlMessage::SetTone { voice, tone })
    }

    pub fn reset_oscillator(&mut self, voice: usize) -> Result<()> {
        self.send(ControlMessage::ResetOscillator { voice })
    }

    pub fn limits(&self) -> ControlLimits {
        self.limits
    }

    /// Free slots left in the queue.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }

    /// True once the renderer side has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_abandoned()
    }
}

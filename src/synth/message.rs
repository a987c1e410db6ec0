#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::dsp::karplus::PluckParams;
use crate::error::{check_frequency, check_unit, EngineError, Result};

/// Requests sent from the control side to the renderer.
///
/// Drained only at buffer boundaries, so a request never lands mid-buffer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlMessage {
    Pluck { voice: usize, params: PluckParams },
    SetOscillatorFrequency { voice: usize, frequency: f32 },
    SetDamping { voice: usize, damping: f32 },
    SetTone { voice: usize, tone: f32 },
    ResetOscillator { voice: usize },
}

impl ControlMessage {
    pub fn voice(&self) -> usize {
        match *self {
            ControlMessage::Pluck { voice, .. }
            | ControlMessage::SetOscillatorFrequency { voice, .. }
            | ControlMessage::SetDamping { voice, .. }
            | ControlMessage::SetTone { voice, .. }
            | ControlMessage::ResetOscillator { voice } => voice,
        }
    }
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}

/// No control path: everything is driven through the renderer directly.
impl MessageReceiver for () {
    fn pop(&mut self) -> Option<ControlMessage> {
        None
    }
}

/// The bounds a request must respect for a given engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlLimits {
    pub voice_count: usize,
    pub sample_rate: f32,
    pub min_frequency: f32,
}

impl ControlLimits {
    pub fn check_voice(&self, index: usize) -> Result<()> {
        if index < self.voice_count {
            Ok(())
        } else {
            Err(EngineError::VoiceOutOfRange {
                index,
                count: self.voice_count,
            })
        }
    }

    pub fn validate(&self, msg: &ControlMessage) -> Result<()> {
        self.check_voice(msg.voice())?;
        match msg {
            ControlMessage::Pluck { params, .. } => {
                params.validate(self.sample_rate, self.min_frequency)
            }
            ControlMessage::SetOscillatorFrequency { frequency, .. } => {
                check_frequency(*frequency)?;
                let nyquist = self.sample_rate * 0.5;
                if *frequency > nyquist {
                    return Err(EngineError::FrequencyTooHigh {
                        frequency: *frequency,
                        max: nyquist,
                    });
                }
                Ok(())
            }
            ControlMessage::SetDamping { damping, .. } => check_unit("damping", *damping),
            ControlMessage::SetTone { tone, .. } => check_unit("tone", *tone),
            ControlMessage::ResetOscillator { .. } => Ok(()),
        }
    }
}

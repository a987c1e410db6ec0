//! Control-path errors.
//!
//! Everything in here is raised while validating a request on the control
//! thread (or at a buffer boundary before the request is applied). The audio
//! path itself never fails.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),

    #[error("frequency must be positive and finite, got {0}")]
    InvalidFrequency(f32),

    #[error("frequency {frequency} Hz is below the supported minimum of {min} Hz")]
    FrequencyTooLow { frequency: f32, min: f32 },

    #[error("frequency {frequency} Hz is above the Nyquist limit of {max} Hz")]
    FrequencyTooHigh { frequency: f32, max: f32 },

    #[error("{name} must be within [0, 1], got {value}")]
    ParameterOutOfRange { name: &'static str, value: f32 },

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f32 },

    #[error("voice index {index} out of range (pool has {count} voices)")]
    VoiceOutOfRange { index: usize, count: usize },

    #[error("voice pool must contain at least one voice")]
    NoVoices,

    #[error("control queue must hold at least one message")]
    EmptyQueue,

    #[error("control queue is full, renderer has not drained pending requests")]
    QueueFull,
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Reject non-positive or non-finite sample rates.
pub(crate) fn check_sample_rate(sample_rate: f32) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidSampleRate(sample_rate))
    }
}

/// Reject non-positive or non-finite frequencies.
pub(crate) fn check_frequency(frequency: f32) -> Result<()> {
    if frequency.is_finite() && frequency > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidFrequency(frequency))
    }
}

/// Reject coefficients outside the unit interval (NaN included).
pub(crate) fn check_unit(name: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::ParameterOutOfRange { name, value })
    }
}

/// Reject negative or non-finite gains. Gains above 1 are allowed.
pub(crate) fn check_weight(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidWeight { name, value })
    }
}

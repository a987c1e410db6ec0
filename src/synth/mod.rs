// Voice pool, control messages and the per-buffer mixing contract.
// This layer sits above the dsp primitives and is what the audio driver talks to.

#[cfg(feature = "rtrb")]
pub mod controller;
pub mod message;
pub mod renderer;
pub mod voice;

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, RingBuffer};

#[cfg(feature = "rtrb")]
use crate::{config::EngineConfig, error::Result};

#[cfg(feature = "rtrb")]
use self::{controller::Controller, message::ControlMessage, renderer::Renderer};

/// Renderer fed by the control ring, as handed out by [`engine`].
#[cfg(feature = "rtrb")]
pub type QueuedRenderer = Renderer<Consumer<ControlMessage>>;

/// Build a renderer for the audio thread and its control-thread handle.
///
/// All allocation happens here: the voice pool, every string's delay storage
/// and the message ring.
#[cfg(feature = "rtrb")]
pub fn engine(config: &EngineConfig) -> Result<(QueuedRenderer, Controller)> {
    config.validate()?;

    let (tx, rx) = RingBuffer::<ControlMessage>::new(config.queue_capacity);
    let renderer = Renderer::new(config, rx)?;
    let controller = Controller::new(tx, renderer.limits());

    let storage = renderer
        .voice(0)
        .map(|v| v.string().max_delay_len())
        .unwrap_or_default();
    log::info!(
        "engine ready: {} voices at {} Hz, {} samples of delay storage per string, queue of {}",
        config.voice_count,
        config.sample_rate,
        storage,
        config.queue_capacity
    );

    Ok((renderer, controller))
}

//! cpal output stream around the renderer

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{BufferSize, OutputCallbackInfo, SampleRate, Stream, StreamConfig};
use pluck_dsp::{synth::QueuedRenderer, CHANNELS};

/// Open the default output device as interleaved f32 stereo and move the
/// renderer into its callback. The stream is returned paused.
pub fn open(
    mut renderer: QueuedRenderer,
    sample_rate: u32,
    frames_per_buffer: u32,
) -> EyreResult<Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;

    let name = device.name().unwrap_or_else(|_| "<unnamed>".to_string());
    log::info!("host: {:?}, device: {name}", host.id());

    let config = StreamConfig {
        channels: CHANNELS as u16,
        sample_rate: SampleRate(sample_rate),
        buffer_size: BufferSize::Fixed(frames_per_buffer),
    };
    log::info!(
        "stream: {} Hz, {} channels, {} frames per buffer",
        sample_rate,
        CHANNELS,
        frames_per_buffer
    );

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &OutputCallbackInfo| {
                let frames = data.len() / CHANNELS;
                renderer.render(data, frames);
            },
            |err| log::error!("stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    Ok(stream)
}

/// Offline render of the plucked chord, printing loudness per 100 ms.
///
/// Run with: cargo run --example offline_render
use pluck_dsp::{engine, EngineConfig, MixWeights, PluckParams, CHANNELS};

fn main() -> Result<(), pluck_dsp::EngineError> {
    println!("=== Offline Karplus-Strong Render ===\n");

    let sample_rate = 44_100.0;
    let frames_per_buffer = 256;
    let chord = [261.63, 329.63, 392.00, 493.88];

    // Strings with a quiet sine underneath
    let config = EngineConfig::new()
        .sample_rate(sample_rate)
        .voice_count(chord.len())
        .weights(MixWeights::new(0.9, 0.1));
    let (mut renderer, mut controller) = engine(&config)?;

    for (voice, &freq) in chord.iter().enumerate() {
        controller.pluck(
            voice,
            PluckParams::new(freq / 2.0)
                .with_damping(0.002)
                .with_tone(0.1)
                .with_excitation(0.2),
        )?;
        controller.set_oscillator_frequency(voice, freq / 2.0)?;
        println!("  voice {}: {:.3} Hz", voice + 1, freq / 2.0);
    }
    println!();

    let window = (sample_rate / 10.0) as usize;
    let mut buffer = vec![0.0f32; frames_per_buffer * CHANNELS];
    let mut acc = 0.0f32;
    let mut counted = 0usize;

    for _ in 0..(2 * sample_rate as usize / frames_per_buffer) {
        renderer.render(&mut buffer, frames_per_buffer);

        for frame in buffer.chunks_exact(CHANNELS) {
            acc += frame[0] * frame[0];
            counted += 1;
            if counted == window {
                let secs = renderer.frames_rendered() as f32 / sample_rate;
                let rms = (acc / window as f32).sqrt();
                println!("  {secs:5.2}s  rms {rms:.4}  {}", "#".repeat((rms * 400.0) as usize));
                acc = 0.0;
                counted = 0;
            }
        }
    }

    println!("\nRendered {} frames", renderer.frames_rendered());
    Ok(())
}

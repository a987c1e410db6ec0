use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::dsp::delay::{delay_length_for, DelayLine};
use crate::error::{check_frequency, check_unit, EngineError, Result};

/*
Karplus-Strong Plucked String
=============================

A plucked string is modelled as a loop: a burst of noise travels around a
delay line exactly one pitch period long, and every time it comes round it
passes through a gentle low-pass filter. High harmonics die quickly, low ones
ring on, and the noise turns into a pitched, decaying tone.

    excitation (noise burst, written once at pluck time)
          │
          ▼
    ┌───────────────────────────────┐
    │  delay line, L = round(sr/f)  │──────┬──────▶ output (s0)
    └───────────────────────────────┘      │
          ▲                                │ s0, s1
          │                                ▼
          │                    ┌──────────────────────┐
          └────── feedback ────│ average, tone, damp  │
                               └──────────────────────┘


Vocabulary
----------

  s0          The oldest sample in the ring; it is both the output for this
              tick and the first filter input.

  s1          The sample after s0 (second oldest).

  averaging   (s0 + s1) / 2. A two-tap low-pass. Its gain is 1 at DC and
              falls to 0 at Nyquist, which is what dulls the tone over time.

  tone        Blend between the averaged value and the raw s0:
                  tone = 0.0 → fully averaged (darkest, fastest high decay)
                  tone = 1.0 → filter bypassed (brightest, no filtering)

  damping     Energy removed on every pass: feedback = filtered × (1 − damping)
                  damping = 0.0 → longest sustain
                  damping = 1.0 → silent after one cycle

  excitation  Peak amplitude of the noise burst.


Per-sample Recipe
-----------------

    s0       = oldest()
    s1       = read_ahead(1)
    filtered = (s0 + s1) / 2 × (1 − tone) + s0 × tone
    feedback = filtered × (1 − damping)
    write(feedback)
    return s0

One read, one write, no branches on the signal, no allocation.


Why the Amplitude Never Grows
-----------------------------

`filtered` is a convex blend of s0 and s1, so |filtered| ≤ max(|s0|, |s1|).
Multiplying by (1 − damping) only shrinks it further. Every value written
during a cycle is therefore bounded by the loudest value of the previous
cycle, and since one cycle of output IS the ring contents, the peak per
cycle can only stay level or fall.

With tone = 1 and damping = 0 the loop degenerates to pure recirculation:
each cycle repeats the last one bit for bit.


Pitch
-----

Because the filter averages s0 with the next sample, the loop's effective
length is L + 0.5 samples, so the heard pitch sits slightly below
sample_rate / L. For the usual guitar range at 44.1 kHz this is a few cents;
we size L from the requested frequency and accept that offset.
*/

/// Peak level below which a string counts as silent.
pub const SILENCE_THRESHOLD: f32 = 1.0e-6;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PluckParams {
    /// Pitch in Hz.
    pub frequency: f32,
    /// Energy removed per feedback pass, 0.0 - 1.0.
    pub damping: f32,
    /// Brightness blend, 0.0 (dark) - 1.0 (bright).
    pub tone: f32,
    /// Noise burst amplitude, 0.0 - 1.0.
    pub excitation: f32,
}

impl PluckParams {
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency,
            ..Self::default()
        }
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_tone(mut self, tone: f32) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_excitation(mut self, excitation: f32) -> Self {
        self.excitation = excitation;
        self
    }

    /// Check the parameters against the stream they will be played on.
    ///
    /// `min_frequency` is the lowest pitch the voice storage was sized for.
    pub fn validate(&self, sample_rate: f32, min_frequency: f32) -> Result<()> {
        check_frequency(self.frequency)?;
        if self.frequency < min_frequency {
            return Err(EngineError::FrequencyTooLow {
                frequency: self.frequency,
                min: min_frequency,
            });
        }
        let nyquist = sample_rate * 0.5;
        if self.frequency > nyquist {
            return Err(EngineError::FrequencyTooHigh {
                frequency: self.frequency,
                max: nyquist,
            });
        }
        check_unit("damping", self.damping)?;
        check_unit("tone", self.tone)?;
        check_unit("excitation", self.excitation)?;
        Ok(())
    }
}

impl Default for PluckParams {
    fn default() -> Self {
        Self {
            frequency: 220.0,
            damping: 0.0,
            tone: 0.0,
            excitation: 0.2,
        }
    }
}

pub struct PluckedString {
    line: DelayLine,
    sample_rate: f32,
    damping: f32,
    tone: f32,
    excitation: f32,
    rng: SmallRng,
    // Peak metering per delay cycle
    running_peak: f32,
    cycle_peak: f32,
    cycle_pos: usize,
}

impl PluckedString {
    /// Create a silent string whose storage fits one period of
    /// `min_frequency`. Later plucks at or above that pitch never allocate.
    pub fn new(sample_rate: f32, min_frequency: f32, seed: u64) -> Self {
        let capacity = delay_length_for(min_frequency, sample_rate);
        Self {
            line: DelayLine::new(capacity),
            sample_rate,
            damping: 0.0,
            tone: 0.0,
            excitation: 0.0,
            rng: SmallRng::seed_from_u64(seed),
            running_peak: 0.0,
            cycle_peak: 0.0,
            cycle_pos: 0,
        }
    }

    /// Strike the string.
    ///
    /// Resizes the active loop to one period of `params.frequency` and refills
    /// it with uniform noise in `[-excitation, excitation]`. Parameters are
    /// expected to have passed [`PluckParams::validate`]; pitches below the
    /// storage size are clamped to the longest loop available.
    pub fn pluck(&mut self, params: &PluckParams) {
        let len = delay_length_for(params.frequency, self.sample_rate);
        self.line.set_len(len);

        let excitation = params.excitation;
        let rng = &mut self.rng;
        self.line
            .fill_with(|| rng.gen_range(-1.0f32..=1.0) * excitation);

        self.damping = params.damping;
        self.tone = params.tone;
        self.excitation = excitation;

        self.running_peak = 0.0;
        self.cycle_peak = excitation;
        self.cycle_pos = 0;
    }

    /// Produce the next output sample and advance the loop by one tick.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let s0 = self.line.oldest();
        let s1 = self.line.read_ahead(1);

        let averaged = (s0 + s1) * 0.5;
        let filtered = averaged * (1.0 - self.tone) + s0 * self.tone;
        let feedback = filtered * (1.0 - self.damping);

        self.line.write(feedback);

        self.running_peak = self.running_peak.max(s0.abs());
        self.cycle_pos += 1;
        if self.cycle_pos >= self.line.len() {
            self.cycle_peak = self.running_peak;
            self.running_peak = 0.0;
            self.cycle_pos = 0;
        }

        s0
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process();
        }
    }

    /// Change damping without restriking. Takes effect on the next tick.
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
    }

    /// Change the brightness blend without restriking.
    pub fn set_tone(&mut self, tone: f32) {
        self.tone = tone.clamp(0.0, 1.0);
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn tone(&self) -> f32 {
        self.tone
    }

    pub fn excitation(&self) -> f32 {
        self.excitation
    }

    /// Current loop length in samples.
    pub fn delay_len(&self) -> usize {
        self.line.len()
    }

    /// Longest loop the preallocated storage can hold.
    pub fn max_delay_len(&self) -> usize {
        self.line.capacity()
    }

    /// Loudest sample of the last completed cycle.
    pub fn peak(&self) -> f32 {
        self.cycle_peak
    }

    pub fn is_active(&self) -> bool {
        self.cycle_peak > SILENCE_THRESHOLD
    }

    /// Silence the string immediately.
    pub fn mute(&mut self) {
        self.line.clear();
        self.running_peak = 0.0;
        self.cycle_peak = 0.0;
        self.cycle_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44_100.0;

    fn plucked(params: PluckParams) -> PluckedString {
        let mut string = PluckedString::new(SR, 20.0, 42);
        string.pluck(&params);
        string
    }

    fn rendered(string: &mut PluckedString, len: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; len];
        string.render(&mut out);
        out
    }

    fn peak(block: &[f32]) -> f32 {
        block.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn energy(block: &[f32]) -> f64 {
        block.iter().map(|&x| (x as f64) * (x as f64)).sum()
    }

    #[test]
    fn delay_length_follows_pitch() {
        for &(freq, expected) in &[(130.815, 337usize), (261.63, 169), (493.88, 89)] {
            let string = plucked(PluckParams::new(freq));
            assert_eq!(string.delay_len(), expected, "at {freq} Hz");
        }
    }

    #[test]
    fn storage_fits_min_frequency() {
        let string = PluckedString::new(SR, 20.0, 0);
        assert_eq!(string.max_delay_len(), 2205);

        let mut string = PluckedString::new(SR, 100.0, 0);
        string.pluck(&PluckParams::new(50.0));
        assert_eq!(string.delay_len(), 441, "clamped to storage");
    }

    #[test]
    fn first_cycle_bounded_by_excitation() {
        let params = PluckParams::new(130.815).with_excitation(0.2);
        let mut string = plucked(params);
        let len = string.delay_len();
        let out = rendered(&mut string, len);

        assert!(out.iter().all(|s| s.abs() <= 0.2), "peak {}", peak(&out));
        assert!(peak(&out) > 0.1, "noise burst should be audible");
    }

    #[test]
    fn second_cycle_is_averaged_first_cycle() {
        let params = PluckParams::new(130.815).with_excitation(0.2);
        let mut string = plucked(params);
        let len = string.delay_len();
        let out = rendered(&mut string, len + 2);

        let expected = (out[0] + out[1]) * 0.5;
        assert!(
            (out[len] - expected).abs() < 1e-7,
            "sample {len} = {}, expected {expected}",
            out[len]
        );
    }

    #[test]
    fn peak_never_grows_with_damping() {
        let params = PluckParams::new(220.0).with_damping(0.01).with_excitation(0.8);
        let mut string = plucked(params);
        let len = string.delay_len();
        let out = rendered(&mut string, len * 40);

        let peaks: Vec<f32> = out.chunks_exact(len).map(peak).collect();
        for pair in peaks.windows(2) {
            assert!(pair[1] <= pair[0], "peak rose from {} to {}", pair[0], pair[1]);
        }
        assert!(peaks[39] < peaks[0]);
    }

    #[test]
    fn full_damping_silences_after_one_cycle() {
        let params = PluckParams::new(440.0).with_damping(1.0).with_excitation(1.0);
        let mut string = plucked(params);
        let len = string.delay_len();
        let out = rendered(&mut string, len * 3);

        assert!(peak(&out[..len]) > 0.0);
        assert!(out[len..].iter().all(|&s| s == 0.0));
        assert!(!string.is_active());
    }

    #[test]
    fn bright_undamped_loop_is_lossless() {
        let params = PluckParams::new(196.0).with_tone(1.0).with_excitation(0.5);
        let mut string = plucked(params);
        let len = string.delay_len();
        let out = rendered(&mut string, len * 5);

        let cycles: Vec<&[f32]> = out.chunks_exact(len).collect();
        let first = energy(cycles[0]);
        for cycle in &cycles[1..] {
            assert_eq!(*cycle, cycles[0]);
            assert!((energy(cycle) - first).abs() <= first * 1e-9);
        }
    }

    #[test]
    fn undamped_averaging_loses_energy_slowly() {
        let params = PluckParams::new(130.815).with_excitation(0.2);
        let mut string = plucked(params);
        let len = string.delay_len();
        let out = rendered(&mut string, len * 100);

        let energies: Vec<f64> = out.chunks_exact(len).map(energy).collect();
        // Broadband noise loses its top end on the first pass
        assert!(energies[1] < energies[0]);
        // Later cycles never exceed the initial burst
        assert!(energies.iter().all(|&e| e <= energies[0]));
        assert!(energies[99] < energies[0] * 0.5);
        // ...but the string is still ringing
        assert!(string.is_active());
    }

    #[test]
    fn damping_setter_takes_effect_without_restrike() {
        let mut string = plucked(PluckParams::new(440.0).with_excitation(0.5));
        let len = string.delay_len();
        rendered(&mut string, len);

        string.set_damping(1.0);
        assert_eq!(string.damping(), 1.0);
        let out = rendered(&mut string, len * 2);
        assert!(out[len..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn setters_clamp_into_unit_range() {
        let mut string = PluckedString::new(SR, 20.0, 0);
        string.set_damping(3.0);
        string.set_tone(-1.0);
        assert_eq!(string.damping(), 1.0);
        assert_eq!(string.tone(), 0.0);
    }

    #[test]
    fn same_seed_same_burst() {
        let params = PluckParams::new(330.0);
        let mut a = plucked(params);
        let mut b = plucked(params);
        assert_eq!(rendered(&mut a, 256), rendered(&mut b, 256));

        let mut c = PluckedString::new(SR, 20.0, 7);
        c.pluck(&params);
        let mut a = plucked(params);
        assert_ne!(rendered(&mut a, 256), rendered(&mut c, 256));
    }

    #[test]
    fn restrike_resets_loop() {
        let mut string = plucked(PluckParams::new(440.0).with_damping(1.0));
        rendered(&mut string, 1_000);
        assert!(!string.is_active());

        string.pluck(&PluckParams::new(220.0).with_excitation(0.3));
        assert_eq!(string.delay_len(), 200);
        assert_eq!(string.excitation(), 0.3);
        assert!(string.is_active());
        let out = rendered(&mut string, 200);
        assert!(peak(&out) > 0.0 && peak(&out) <= 0.3);
    }

    #[test]
    fn new_string_is_silent() {
        let mut string = PluckedString::new(SR, 20.0, 0);
        assert!(!string.is_active());
        assert!(rendered(&mut string, 512).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn mute_stops_ringing() {
        let mut string = plucked(PluckParams::new(440.0));
        string.mute();
        assert!(!string.is_active());
        assert!(rendered(&mut string, 200).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn validate_rejects_bad_params() {
        let ok = PluckParams::new(440.0);
        assert!(ok.validate(SR, 20.0).is_ok());

        assert_eq!(
            PluckParams::new(0.0).validate(SR, 20.0),
            Err(EngineError::InvalidFrequency(0.0))
        );
        assert!(matches!(
            PluckParams::new(10.0).validate(SR, 20.0),
            Err(EngineError::FrequencyTooLow { .. })
        ));
        assert!(matches!(
            PluckParams::new(30_000.0).validate(SR, 20.0),
            Err(EngineError::FrequencyTooHigh { .. })
        ));
        assert!(matches!(
            ok.with_damping(1.5).validate(SR, 20.0),
            Err(EngineError::ParameterOutOfRange { name: "damping", .. })
        ));
        assert!(ok.with_tone(f32::NAN).validate(SR, 20.0).is_err());
        assert!(ok.with_excitation(-0.1).validate(SR, 20.0).is_err());
    }
}

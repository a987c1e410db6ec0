/*
Circular Delay Line
===================

A delay line stores the most recent N samples in a ring. Each tick we write
one sample at the cursor and the cursor moves forward, so the slot the cursor
points at is always the OLDEST sample in the ring - the one about to be
overwritten.

    len = 6, write_pos = 2

      index:   0    1    2    3    4    5
             [ e ][ f ][ a ][ b ][ c ][ d ]
                        ^
                        write_pos (oldest = a, newest = f)

    read_at(0) = f      (most recently written)
    read_at(1) = e
    oldest()   = a      (same as read_at(len - 1))
    read_ahead(1) = b   (second oldest)


Storage vs. Active Length
-------------------------

Storage is allocated ONCE, sized for the longest cycle we will ever need
(the lowest pitch). Changing pitch only changes the active length `len`, so a
retune never touches the allocator and is safe at a buffer boundary on the
audio thread.

    capacity = 8, len = 5

      [ x ][ x ][ x ][ x ][ x ][ - ][ - ][ - ]
      \_______ active _______/ \__ unused _/


Why len >= 2?
-------------

The string filter averages the oldest sample with the one after it. With a
single slot "the one after it" would be the oldest sample again, so the
shortest meaningful cycle is two samples.
*/

/// Shortest cycle the ring will run at.
pub const MIN_DELAY_LEN: usize = 2;

/// Longest cycle a ring may be sized for (about 1.5 s at 44.1 kHz).
///
/// At 20 Hz this covers sample rates up to 1.3 MHz.
pub const MAX_DELAY_SAMPLES: usize = 1 << 16;

/// Number of samples in one period of `frequency` at `sample_rate`, rounded
/// to the nearest whole sample.
///
/// Callers validate both values; the result is clamped into
/// `[MIN_DELAY_LEN, MAX_DELAY_SAMPLES]`.
#[inline]
pub fn delay_length_for(frequency: f32, sample_rate: f32) -> usize {
    let period = (sample_rate / frequency).round() as usize;
    period.clamp(MIN_DELAY_LEN, MAX_DELAY_SAMPLES)
}

pub struct DelayLine {
    buffer: Vec<f32>,
    len: usize,
    write_pos: usize,
}

impl DelayLine {
    /// Allocate a ring able to hold up to `max_capacity` samples.
    ///
    /// The active length starts at the full capacity. Storage never exceeds
    /// [`MAX_DELAY_SAMPLES`].
    pub fn new(max_capacity: usize) -> Self {
        let max_capacity = max_capacity.clamp(MIN_DELAY_LEN, MAX_DELAY_SAMPLES);
        Self {
            buffer: vec![0.0; max_capacity],
            len: max_capacity,
            write_pos: 0,
        }
    }

    /// Change the active cycle length without reallocating.
    ///
    /// `len` is clamped into `[MIN_DELAY_LEN, capacity]` and the cursor is
    /// rewound to the start of the ring.
    pub fn set_len(&mut self, len: usize) {
        self.len = len.clamp(MIN_DELAY_LEN, self.buffer.len());
        self.write_pos = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: the ring never runs shorter than [`MIN_DELAY_LEN`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Store `sample` at the cursor and advance it.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.len {
            self.write_pos = 0;
        }
    }

    /// Sample `offset` steps behind the cursor. `0` is the most recent write.
    #[inline]
    pub fn read_at(&self, offset: usize) -> f32 {
        let back = offset % self.len;
        let idx = (self.write_pos + self.len - 1 - back) % self.len;
        self.buffer[idx]
    }

    /// The sample the next `write` will overwrite.
    #[inline]
    pub fn oldest(&self) -> f32 {
        self.buffer[self.write_pos]
    }

    /// Sample `steps` positions after the oldest one.
    #[inline]
    pub fn read_ahead(&self, steps: usize) -> f32 {
        self.buffer[(self.write_pos + steps) % self.len]
    }

    /// Overwrite the active region in cursor order (oldest first).
    pub fn fill_with(&mut self, mut f: impl FnMut() -> f32) {
        for i in 0..self.len {
            let idx = (self.write_pos + i) % self.len;
            self.buffer[idx] = f();
        }
    }

    /// Iterate the active region oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.len).map(move |i| self.read_ahead(i))
    }

    pub fn clear(&mut self) {
        self.buffer[..self.len].fill(0.0);
    }

    /// Zero the whole storage and rewind the cursor.
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

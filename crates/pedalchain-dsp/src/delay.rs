//! Circular delay line with fractional reads.

/// Fractional delay interpolation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Truncate to the nearest earlier sample.
    None,
    /// Two-point linear interpolation.
    #[default]
    Linear,
    /// Four-point cubic interpolation, for modulated delays.
    Cubic,
}

/// Delay line supporting fractional delay times.
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    interpolation: Interpolation,
}

impl InterpolatedDelay {
    /// Creates a delay line able to hold `max_delay_samples` of history.
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(4)],
            write_pos: 0,
            interpolation: Interpolation::Linear,
        }
    }

    /// Creates a delay line from sample rate and max delay time in seconds.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds) as usize + 4)
    }

    /// Sets the interpolation mode.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    /// Reads the sample written `delay_samples` ago (0 = the most recent write).
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(0.0, (len - 3) as f32);
        let whole = delay as usize;
        let frac = delay - whole as f32;
        let pos = (self.write_pos + len - whole - 1) % len;
        let at = |back: usize| self.buffer[(pos + len - back) % len];

        match self.interpolation {
            Interpolation::None => at(0),
            Interpolation::Linear => {
                let a = at(0);
                a + (at(1) - a) * frac
            }
            Interpolation::Cubic => {
                let y0 = self.buffer[(pos + 1) % len];
                let (y1, y2, y3) = (at(0), at(1), at(2));
                let a0 = y3 - y2 - y0 + y1;
                let a1 = y0 - y1 - a0;
                let a2 = y2 - y0;
                ((a0 * frac + a1) * frac + a2) * frac + y1
            }
        }
    }

    /// Writes a sample and advances.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Clears the history.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

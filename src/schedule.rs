/// Maps a possibly fractional steps-per-tick rate to a step count for each host tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickScheduler {
    frames_to_skip: u32,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps to run this tick.
    ///
    /// `rate >= 1` runs `floor(rate)` steps every tick. `0 < rate < 1` runs one step
    /// every `ceil(1 / rate)` ticks, starting with the first. A non-positive or NaN
    /// rate never steps.
    pub fn advance(&mut self, rate: f32) -> u32 {
        if rate.is_nan() || rate <= 0.0 {
            return 0;
        }

        if rate >= 1.0 {
            return (rate as u32).max(1);
        }

        let max_skip = (1.0 / rate).ceil() as u32;

        if self.frames_to_skip > max_skip {
            // rate went up since the last tick
            self.frames_to_skip = max_skip;
            return 1;
        }

        self.frames_to_skip = self.frames_to_skip.saturating_sub(1);
        if self.frames_to_skip > 0 {
            return 0;
        }

        self.frames_to_skip = max_skip;
        1
    }

    pub fn reset(&mut self) {
        self.frames_to_skip = 0;
    }
}

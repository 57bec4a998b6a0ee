/// Fixed-rate logic tick source.
///
/// The clock is advanced once per rendered frame with [`Self::update`] and
/// reports how many logic cycles elapsed during that frame. Fractional
/// progress carries over between frames, so a rate lower than the frame rate
/// yields a cycle every few frames.
///
/// # Example
///
/// ```
/// use dropwise_engine::LogicClock;
///
/// let mut clock = LogicClock::new(60, 30.0);
/// assert_eq!(clock.update(), 0);
/// assert_eq!(clock.update(), 1);
///
/// clock.set_paused(true);
/// assert_eq!(clock.update(), 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LogicClock {
    fps: u32,
    cycles_per_second: f64,
    progress: f64,
    elapsed_cycles: u64,
    paused: bool,
}

impl LogicClock {
    /// Creates a running clock.
    ///
    /// # Panics
    ///
    /// Panics if `fps` is zero.
    #[must_use]
    pub fn new(fps: u32, cycles_per_second: f64) -> Self {
        assert!(fps > 0, "frame rate must be positive");
        Self {
            fps,
            cycles_per_second,
            progress: 0.0,
            elapsed_cycles: 0,
            paused: false,
        }
    }

    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    #[must_use]
    pub fn cycles_per_second(&self) -> f64 {
        self.cycles_per_second
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Total cycles reported since creation or the last [`Self::reset`].
    #[must_use]
    pub fn elapsed_cycles(&self) -> u64 {
        self.elapsed_cycles
    }

    /// Drops any partial progress toward the next cycle.
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.elapsed_cycles = 0;
    }

    /// Advances the clock by one frame and returns the cycles that elapsed.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn update(&mut self) -> u32 {
        if self.paused {
            return 0;
        }
        self.progress += self.cycles_per_second.max(0.0) / f64::from(self.fps);
        let cycles = self.progress.floor();
        self.progress -= cycles;
        let cycles = cycles.min(f64::from(u32::MAX)) as u32;
        self.elapsed_cycles += u64::from(cycles);
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_clock_reports_many_cycles_per_frame() {
        let mut clock = LogicClock::new(60, 999.0);
        let total: u32 = (0..60).map(|_| clock.update()).sum();
        assert!((998..=999).contains(&total), "{total}");
        assert_eq!(clock.elapsed_cycles(), u64::from(total));
    }

    #[test]
    fn test_slow_clock_accumulates_progress() {
        let mut clock = LogicClock::new(60, 1.0);
        let cycles: Vec<u32> = (0..125).map(|_| clock.update()).collect();
        assert_eq!(cycles.iter().sum::<u32>(), 2);
        assert_eq!(cycles[..58].iter().sum::<u32>(), 0);
    }

    #[test]
    fn test_reset_drops_progress() {
        let mut clock = LogicClock::new(4, 2.0);
        assert_eq!(clock.update(), 0);
        clock.reset();
        assert_eq!(clock.update(), 0);
        assert_eq!(clock.update(), 1);
        assert_eq!(clock.update(), 0);
        assert_eq!(clock.update(), 1);
        assert_eq!(clock.elapsed_cycles(), 2);
    }
}

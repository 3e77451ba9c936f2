/// Frame clock driven by the host's animation callback.
/// Elapsed time is accumulated in f64 so long sessions keep orbit angles precise.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    /// Seconds since the first tick.
    elapsed: f64,
    /// Seconds covered by the most recent tick.
    delta: f32,
    /// Number of ticks so far.
    frame: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame. Negative or non-finite deltas count as zero,
    /// so elapsed time never decreases.
    pub fn tick(&mut self, frame_dt: f32) {
        let dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        self.delta = dt;
        self.elapsed += dt as f64;
        self.frame += 1;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_elapsed() {
        let mut clock = Clock::new();
        clock.tick(0.5);
        clock.tick(0.25);
        assert!((clock.elapsed() - 0.75).abs() < 1e-12);
        assert_eq!(clock.delta(), 0.25);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn never_runs_backwards() {
        let mut clock = Clock::new();
        clock.tick(1.0);
        clock.tick(-3.0);
        clock.tick(f32::NAN);
        assert!((clock.elapsed() - 1.0).abs() < 1e-12);
        assert_eq!(clock.delta(), 0.0);
    }
}

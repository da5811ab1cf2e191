/// Interval-averaged FPS readout.
///
/// Accumulates frames over a fixed interval (0.2 s by default) and reports
/// the rounded average, but only when the value actually changed since the
/// last report.
#[derive(Debug)]
pub struct FpsCounter {
    interval: f32,
    frames: u32,
    elapsed: f32,
    last_reported: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::with_interval(0.2)
    }

    pub fn with_interval(interval: f32) -> Self {
        debug_assert!(interval > 0.0);
        Self {
            interval,
            frames: 0,
            elapsed: 0.0,
            last_reported: 0,
        }
    }

    /// Feeds one frame's delta time. Returns `Some(fps)` when the interval
    /// elapsed and the rounded average differs from the previous report.
    pub fn tick(&mut self, dt: f32) -> Option<u32> {
        self.frames += 1;
        self.elapsed += dt;

        if self.elapsed < self.interval {
            return None;
        }

        let fps = (self.frames as f32 / self.elapsed).round() as u32;
        self.frames = 0;
        self.elapsed = 0.0;

        if fps != self.last_reported {
            self.last_reported = fps;
            Some(fps)
        } else {
            None
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_report_before_interval() {
        let mut fps = FpsCounter::with_interval(0.2);
        assert_eq!(fps.tick(0.05), None);
        assert_eq!(fps.tick(0.05), None);
        assert_eq!(fps.tick(0.05), None);
    }

    #[test]
    fn reports_rounded_average_after_interval() {
        let mut fps = FpsCounter::with_interval(0.2);
        for _ in 0..11 {
            assert_eq!(fps.tick(1.0 / 60.0), None);
        }
        // 12th frame crosses 0.2s; 12 frames / 0.2s = 60.
        assert_eq!(fps.tick(1.0 / 60.0), Some(60));
    }

    #[test]
    fn unchanged_readout_is_suppressed() {
        let mut fps = FpsCounter::with_interval(0.1);
        assert_eq!(fps.tick(0.1), Some(10));
        assert_eq!(fps.tick(0.1), None);
        assert_eq!(fps.tick(0.1), None);
        assert_eq!(fps.tick(0.2), Some(5));
    }
}

//! Frame pacing. The frame loop itself lives in the bevy schedule; see
//! `GameSession::frame` for what happens on each tick.

use std::time::Duration;

pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// Free-running frame counter. Only cosmetic effects read it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameClock {
    frame: u32,
}

impl FrameClock {
    pub fn advance(&mut self) -> u32 {
        self.frame = self.frame.wrapping_add(1);
        self.frame
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Opacity of highlighted tiles, pulsing between 0.2 and 1.0.
    pub fn highlight_alpha(&self) -> f32 {
        0.6 + 0.4 * (self.frame as f32 / 20.0).sin()
    }
}

/// Delay between frames for the schedule runner. Rates that are not
/// positive fall back to the default.
pub fn frame_interval(frame_rate: f64) -> Duration {
    let rate = if frame_rate.is_finite() && frame_rate > 0.0 {
        frame_rate
    } else {
        DEFAULT_FRAME_RATE
    };
    Duration::from_secs_f64(1.0 / rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_wraps() {
        let mut clock = FrameClock { frame: u32::MAX };
        assert_eq!(clock.advance(), 0);
        assert_eq!(clock.advance(), 1);
    }

    #[test]
    fn pulse_stays_in_range() {
        let mut clock = FrameClock::default();
        assert!((clock.highlight_alpha() - 0.6).abs() < f32::EPSILON);
        for _ in 0..400 {
            clock.advance();
            let alpha = clock.highlight_alpha();
            assert!((0.2 - 1e-5..=1.0 + 1e-5).contains(&alpha));
        }
    }

    #[test]
    fn interval_defaults_to_sixty_hz() {
        assert_eq!(frame_interval(0.0), frame_interval(60.0));
        assert_eq!(frame_interval(f64::NAN), frame_interval(60.0));
        assert_eq!(frame_interval(10.0), Duration::from_millis(100));
    }
}

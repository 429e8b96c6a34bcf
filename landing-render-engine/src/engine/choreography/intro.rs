use super::easing::ease_in_out_cubic;
use bevy::math::Vec2;
use constants::timing::{
    INTRO_DURATION_MS, INTRO_GRID_DELAY_MS, INTRO_LEFT_DELAY_MS, INTRO_RIGHT_DELAY_MS,
};
use std::time::Duration;

/// What a track animates. Offsets are the starting displacement; every
/// track also fades from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntroMotion {
    Fade,
    SlideX { from_px: f32 },
    SlideY { from_px: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroSample {
    pub offset: Vec2,
    pub opacity: f32,
    pub moves: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroTrack {
    pub delay: Duration,
    pub duration: Duration,
    pub motion: IntroMotion,
}

impl IntroTrack {
    pub const fn new(delay_ms: u64, motion: IntroMotion) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            duration: Duration::from_millis(INTRO_DURATION_MS),
            motion,
        }
    }

    /// Eased progress at `elapsed` since the readiness signal fired.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        let Some(active) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        ease_in_out_cubic(active.as_secs_f32() / self.duration.as_secs_f32())
    }

    pub fn finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.delay + self.duration
    }

    pub fn sample(&self, elapsed: Duration) -> IntroSample {
        let v = self.progress(elapsed);
        let remaining = 1.0 - v;
        let (offset, moves) = match self.motion {
            IntroMotion::Fade => (Vec2::ZERO, false),
            IntroMotion::SlideX { from_px } => (Vec2::new(from_px * remaining, 0.0), true),
            IntroMotion::SlideY { from_px } => (Vec2::new(0.0, from_px * remaining), true),
        };
        IntroSample {
            offset,
            opacity: v,
            moves,
        }
    }

    /// Resting style before the track starts.
    pub fn initial(&self) -> IntroSample {
        self.sample(Duration::ZERO)
    }
}

/// Which hero layer a track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntroLayer {
    Background,
    Blur,
    LeftColumn,
    RightColumn,
    StatsGrid,
}

pub const HERO_INTRO: [(IntroLayer, IntroTrack); 5] = [
    (IntroLayer::Background, IntroTrack::new(0, IntroMotion::Fade)),
    (IntroLayer::Blur, IntroTrack::new(0, IntroMotion::Fade)),
    (
        IntroLayer::LeftColumn,
        IntroTrack::new(INTRO_LEFT_DELAY_MS, IntroMotion::SlideX { from_px: -60.0 }),
    ),
    (
        IntroLayer::RightColumn,
        IntroTrack::new(INTRO_RIGHT_DELAY_MS, IntroMotion::SlideX { from_px: 60.0 }),
    ),
    (
        IntroLayer::StatsGrid,
        IntroTrack::new(INTRO_GRID_DELAY_MS, IntroMotion::SlideY { from_px: 40.0 }),
    ),
];

pub fn intro_finished(elapsed: Duration) -> bool {
    HERO_INTRO.iter().all(|(_, track)| track.finished(elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn delayed_track_holds_initial_pose() {
        let track = IntroTrack::new(150, IntroMotion::SlideX { from_px: 60.0 });
        let sample = track.sample(ms(100));
        assert_eq!(sample.offset, Vec2::new(60.0, 0.0));
        assert_eq!(sample.opacity, 0.0);
    }

    #[test]
    fn track_settles_at_rest() {
        let track = IntroTrack::new(250, IntroMotion::SlideY { from_px: 40.0 });
        assert!(!track.finished(ms(1149)));
        assert!(track.finished(ms(1150)));
        let sample = track.sample(ms(1150));
        assert_eq!(sample.offset, Vec2::ZERO);
        assert_eq!(sample.opacity, 1.0);
    }

    #[test]
    fn midpoint_is_half_way_for_in_out_easing() {
        let track = IntroTrack::new(0, IntroMotion::SlideX { from_px: -60.0 });
        let sample = track.sample(ms(450));
        assert!((sample.opacity - 0.5).abs() < 1e-4);
        assert!((sample.offset.x + 30.0).abs() < 1e-3);
    }

    #[test]
    fn whole_intro_ends_with_the_last_delayed_track() {
        assert!(!intro_finished(ms(1100)));
        assert!(intro_finished(ms(1150)));
    }
}

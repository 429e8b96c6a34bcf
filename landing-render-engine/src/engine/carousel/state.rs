use bevy::prelude::*;
use constants::timing::{CAROUSEL_TRANSITION_MS, GALLERY_AUTOPLAY_MS, TESTIMONIAL_AUTOPLAY_MS};
use std::time::Duration;

const MAX_THUMBNAILS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselPhase {
    /// Nothing to show.
    Empty,
    Displaying {
        index: usize,
    },
    Transitioning {
        from: usize,
        to: usize,
        direction: Direction,
        elapsed: Duration,
    },
}

#[derive(Debug, Clone)]
enum Autoplay {
    Armed(Timer),
    Paused,
    /// No items, so nothing to advance.
    Idle,
}

/// A completed index change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

/// Cyclic carousel with autoplay.
///
/// Manual navigation restarts the autoplay timer, and resuming from a pause
/// restarts it from zero, so an advance never lands right after user input.
#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    phase: CarouselPhase,
    autoplay: Autoplay,
    interval: Duration,
    transition: Duration,
    expanded: bool,
}

impl Carousel {
    pub fn new(interval: Duration, transition: Duration) -> Self {
        Self {
            len: 0,
            phase: CarouselPhase::Empty,
            autoplay: Autoplay::Idle,
            interval,
            transition,
            expanded: false,
        }
    }

    pub fn testimonials() -> Self {
        Self::new(
            Duration::from_millis(TESTIMONIAL_AUTOPLAY_MS),
            Duration::from_millis(CAROUSEL_TRANSITION_MS),
        )
    }

    pub fn gallery() -> Self {
        Self::new(
            Duration::from_millis(GALLERY_AUTOPLAY_MS),
            Duration::from_millis(CAROUSEL_TRANSITION_MS),
        )
    }

    fn armed(&self) -> Autoplay {
        Autoplay::Armed(Timer::new(self.interval, TimerMode::Repeating))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn phase(&self) -> CarouselPhase {
        self.phase
    }

    /// Index on screen, or the one being moved to.
    pub fn current(&self) -> Option<usize> {
        match self.phase {
            CarouselPhase::Empty => None,
            CarouselPhase::Displaying { index } => Some(index),
            CarouselPhase::Transitioning { to, .. } => Some(to),
        }
    }

    pub fn is_timer_armed(&self) -> bool {
        matches!(self.autoplay, Autoplay::Armed(_))
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.autoplay, Autoplay::Paused)
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Replace the item list. Starts over at index 0; a pause is kept.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.expanded = false;
        if len == 0 {
            self.phase = CarouselPhase::Empty;
            self.autoplay = Autoplay::Idle;
            return;
        }
        self.phase = CarouselPhase::Displaying { index: 0 };
        if !self.is_paused() {
            self.autoplay = self.armed();
        }
    }

    fn move_to(&mut self, to: usize, direction: Direction) -> Option<Step> {
        let from = self.current()?;
        if to == from {
            return None;
        }
        self.phase = CarouselPhase::Transitioning {
            from,
            to,
            direction,
            elapsed: Duration::ZERO,
        };
        if self.expanded {
            self.expanded = false;
            self.resume();
        }
        Some(Step {
            from,
            to,
            direction,
        })
    }

    fn step(&mut self, direction: Direction) -> Option<Step> {
        let current = self.current()?;
        let to = match direction {
            Direction::Forward => (current + 1) % self.len,
            Direction::Backward => (current + self.len - 1) % self.len,
        };
        self.move_to(to, direction)
    }

    fn restart_timer(&mut self) {
        if let Autoplay::Armed(timer) = &mut self.autoplay {
            timer.reset();
        }
    }

    pub fn handle_next(&mut self) -> Option<Step> {
        let step = self.step(Direction::Forward)?;
        self.restart_timer();
        Some(step)
    }

    pub fn handle_prev(&mut self) -> Option<Step> {
        let step = self.step(Direction::Backward)?;
        self.restart_timer();
        Some(step)
    }

    /// Jump to `index`. Forward when moving to a higher index.
    pub fn go_to(&mut self, index: usize) -> Option<Step> {
        let current = self.current()?;
        if index >= self.len {
            return None;
        }
        let direction = if index > current {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let step = self.move_to(index, direction)?;
        self.restart_timer();
        Some(step)
    }

    pub fn pause(&mut self) {
        if self.len > 0 {
            self.autoplay = Autoplay::Paused;
        }
    }

    /// No effect while text is expanded.
    pub fn resume(&mut self) {
        if self.is_paused() && self.len > 0 && !self.expanded {
            self.autoplay = self.armed();
        }
    }

    /// Expanded text holds the carousel; collapsing lets it run again.
    pub fn toggle_expanded(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.expanded = !self.expanded;
        if self.expanded {
            self.pause();
        } else {
            self.resume();
        }
        self.expanded
    }

    /// Advance the transition and the autoplay timer.
    pub fn tick(&mut self, delta: Duration) -> Option<Step> {
        if let CarouselPhase::Transitioning { to, elapsed, .. } = &mut self.phase {
            *elapsed += delta;
            if *elapsed >= self.transition {
                let index = *to;
                self.phase = CarouselPhase::Displaying { index };
            }
        }

        let Autoplay::Armed(timer) = &mut self.autoplay else {
            return None;
        };
        timer.tick(delta);
        if timer.just_finished() {
            self.step(Direction::Forward)
        } else {
            None
        }
    }

    /// Up to three previous items, nearest first.
    pub fn thumbnails(&self) -> Vec<usize> {
        let Some(current) = self.current() else {
            return Vec::new();
        };
        let count = MAX_THUMBNAILS.min(self.len - 1);
        (1..=count)
            .map(|k| (current + self.len - k) % self.len)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn carousel(len: usize) -> Carousel {
        let mut carousel = Carousel::testimonials();
        carousel.set_len(len);
        carousel
    }

    #[test]
    fn empty_carousel_never_arms() {
        let mut carousel = carousel(0);
        assert!(!carousel.is_timer_armed());
        assert_eq!(carousel.handle_next(), None);
        assert_eq!(carousel.handle_prev(), None);
        assert_eq!(carousel.go_to(0), None);
        assert_eq!(carousel.tick(ms(60_000)), None);
        carousel.resume();
        assert!(!carousel.is_timer_armed());
        assert_eq!(carousel.phase(), CarouselPhase::Empty);
    }

    #[test]
    fn next_is_cyclic_and_prev_is_its_inverse() {
        let mut carousel = carousel(4);
        for _ in 0..4 {
            carousel.handle_next();
        }
        assert_eq!(carousel.current(), Some(0));

        carousel.handle_next();
        carousel.handle_next();
        carousel.handle_prev();
        carousel.handle_prev();
        assert_eq!(carousel.current(), Some(0));

        let step = carousel.handle_prev().unwrap();
        assert_eq!(step.to, 3);
        assert_eq!(step.direction, Direction::Backward);
    }

    #[test]
    fn autoplay_advances_on_the_interval() {
        let mut carousel = carousel(3);
        assert_eq!(carousel.tick(ms(4999)), None);
        let step = carousel.tick(ms(1)).unwrap();
        assert_eq!((step.from, step.to), (0, 1));
        assert_eq!(step.direction, Direction::Forward);
    }

    #[test]
    fn manual_navigation_restarts_the_timer() {
        let mut carousel = carousel(3);
        carousel.tick(ms(4000));
        carousel.handle_next();
        assert_eq!(carousel.tick(ms(4000)), None);
        assert!(carousel.tick(ms(1000)).is_some());
    }

    #[test]
    fn resume_restarts_from_zero() {
        let mut carousel = carousel(3);
        carousel.tick(ms(4000));
        carousel.pause();
        assert_eq!(carousel.tick(ms(10_000)), None);

        carousel.resume();
        assert_eq!(carousel.tick(ms(4999)), None);
        assert!(carousel.tick(ms(1)).is_some());
    }

    #[test]
    fn transition_settles_after_its_duration() {
        let mut carousel = carousel(3);
        carousel.handle_next();
        assert!(matches!(
            carousel.phase(),
            CarouselPhase::Transitioning { from: 0, to: 1, .. }
        ));
        carousel.tick(ms(599));
        assert!(matches!(carousel.phase(), CarouselPhase::Transitioning { .. }));
        carousel.tick(ms(1));
        assert_eq!(carousel.phase(), CarouselPhase::Displaying { index: 1 });
    }

    #[test]
    fn go_to_picks_direction_from_target() {
        let mut carousel = carousel(5);
        assert_eq!(carousel.go_to(3).unwrap().direction, Direction::Forward);
        assert_eq!(carousel.go_to(1).unwrap().direction, Direction::Backward);
        assert_eq!(carousel.go_to(1), None);
        assert_eq!(carousel.go_to(9), None);
    }

    #[test]
    fn thumbnails_show_previous_items() {
        assert_eq!(carousel(5).thumbnails(), vec![4, 3, 2]);
        assert_eq!(carousel(2).thumbnails(), vec![1]);
        assert!(carousel(1).thumbnails().is_empty());
        assert!(carousel(0).thumbnails().is_empty());
    }

    #[test]
    fn expanding_pauses_and_navigation_collapses() {
        let mut carousel = carousel(3);
        assert!(carousel.toggle_expanded());
        assert!(carousel.is_paused());

        carousel.handle_next();
        assert!(!carousel.is_expanded());
        assert!(carousel.is_timer_armed());

        carousel.toggle_expanded();
        assert!(!carousel.toggle_expanded());
        assert!(carousel.is_timer_armed());
    }

    #[test]
    fn single_item_never_moves() {
        let mut carousel = carousel(1);
        assert_eq!(carousel.handle_next(), None);
        assert_eq!(carousel.tick(ms(5000)), None);
        assert_eq!(carousel.current(), Some(0));
    }
}

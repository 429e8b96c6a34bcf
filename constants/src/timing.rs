//! Durations shared by timers and timed animations, in milliseconds.

pub const TESTIMONIAL_AUTOPLAY_MS: u64 = 5000;
pub const GALLERY_AUTOPLAY_MS: u64 = 3000;

/// Slide transition between two carousel items.
pub const CAROUSEL_TRANSITION_MS: u64 = 600;

/// The loader stays up at least this long, whatever the load speed.
pub const LOADER_MIN_VISIBLE_MS: u64 = 2000;
pub const LOADER_FADE_MS: u64 = 800;

/// Length of each hero intro track.
pub const INTRO_DURATION_MS: u64 = 900;
pub const INTRO_LEFT_DELAY_MS: u64 = 50;
pub const INTRO_RIGHT_DELAY_MS: u64 = 150;
pub const INTRO_GRID_DELAY_MS: u64 = 250;

/// Model load deadline before the hero falls back to the flat halftone.
pub const DEFAULT_READY_TIMEOUT_MS: u64 = 8000;

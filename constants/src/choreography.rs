//! Scroll choreography tuning for the hero and the stacked card deck.

/// Number of cards in the about-section deck.
pub const DECK_CARD_COUNT: usize = 5;

/// How many pixels each buried card peeks above the one in front of it.
pub const PEEK_PX: f32 = 14.0;

/// Scale reduction per level of burial.
pub const SCALE_STEP: f32 = 0.04;

/// Opacity reduction per level of burial, floored at `MIN_BURIED_OPACITY`.
pub const OPACITY_STEP: f32 = 0.06;
pub const MIN_BURIED_OPACITY: f32 = 0.72;

/// Fraction of the viewport height a card starts below its resting spot.
pub const ENTRY_OFFSET_FACTOR: f32 = 0.85;

/// Horizontal distance the flanking panels slide in from.
pub const FLANK_SLIDE_PX: f32 = 80.0;

/// Hero content moves at this fraction of the scroll offset.
pub const HERO_PARALLAX_FACTOR: f32 = 0.6;

/// Scroll distance over which hero content fades to zero.
pub const HERO_FADE_DISTANCE_PX: f32 = 500.0;

pub const PIP_FILLED_SCALE: f32 = 1.35;
pub const PIP_EMPTY_ALPHA: f32 = 0.35;

/// Native scroll step per wheel line.
pub const WHEEL_LINE_PX: f32 = 40.0;

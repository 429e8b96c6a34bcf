use constants::choreography::{HERO_FADE_DISTANCE_PX, HERO_PARALLAX_FACTOR};

/// Style values for one hero recompute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroFrame {
    /// Vertical translation of the content layer. Negative moves it up.
    pub content_translate_y: f32,
    /// Opacity shared by the content layer and the blur overlay.
    pub content_opacity: f32,
    /// Counter-translation of the 3D background layer.
    pub background_translate_y: f32,
}

/// Scroll distance past the hero's top edge, never negative.
pub fn hero_offset(scroll_y: f32, section_top: f32) -> f32 {
    (scroll_y - section_top).max(0.0)
}

pub fn hero_fade(offset: f32) -> f32 {
    (1.0 - offset / HERO_FADE_DISTANCE_PX).max(0.0)
}

/// Map a hero offset to layer styles.
///
/// Returns `None` once the hero is more than one viewport out of view; the
/// caller then leaves the previous frame's styles untouched.
pub fn map_hero(offset: f32, viewport_height: f32) -> Option<HeroFrame> {
    let offset = offset.max(0.0);
    if offset > viewport_height {
        return None;
    }

    let translate = offset * HERO_PARALLAX_FACTOR;
    Some(HeroFrame {
        content_translate_y: -translate,
        content_opacity: hero_fade(offset),
        background_translate_y: translate,
    })
}

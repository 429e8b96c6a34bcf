use bevy::prelude::*;

/// Latest hero scroll offset in CSS pixels, clamped at zero.
///
/// Overwritten on every recompute by the hero choreography, read by the
/// model's per-frame update. Last write wins; there is no history.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct ScrollCursor {
    hero_offset_px: f32,
}

impl ScrollCursor {
    pub fn write(&mut self, offset_px: f32) {
        self.hero_offset_px = offset_px.max(0.0);
    }

    pub fn hero_offset(&self) -> f32 {
        self.hero_offset_px
    }

    /// Whether the hero has scrolled more than `viewport_height` out of view.
    pub fn hero_scrolled_past(&self, viewport_height: f32) -> bool {
        self.hero_offset_px > viewport_height
    }
}

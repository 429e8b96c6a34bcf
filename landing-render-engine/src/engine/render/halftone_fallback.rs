//! Flat halftone drawn on the CPU.
//!
//! There is no scene to sample, so every cell gets the dot size the shader
//! would produce at [`SCENE_LUMINANCE`].

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use constants::halftone::{EDGE_SOFTNESS, HalftoneSettings, SCENE_LUMINANCE};

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Dot radius for a cell of the given luminance. Dark cells get large dots.
pub fn fallback_dot_size(settings: &HalftoneSettings, luminance: f32) -> f32 {
    settings.dot_radius * (1.0 - luminance.clamp(0.0, 1.0))
}

/// Colour at pixel centre `position`.
pub fn halftone_pixel(position: Vec2, settings: &HalftoneSettings, dot_size: f32) -> Vec4 {
    let grid = settings.grid_size.max(1.0);
    let center = ((position / grid).floor() + 0.5) * grid;
    let distance = position.distance(center);
    let coverage = 1.0 - smoothstep(dot_size - EDGE_SOFTNESS, dot_size + EDGE_SOFTNESS, distance);
    settings.bg_color.lerp(settings.dot_color, coverage)
}

/// RGBA8 pixels, row-major from the top-left.
pub fn render_fallback(width: u32, height: u32, settings: &HalftoneSettings) -> Vec<u8> {
    let dot_size = fallback_dot_size(settings, SCENE_LUMINANCE);
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);

    for y in 0..height {
        for x in 0..width {
            let position = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let color = halftone_pixel(position, settings, dot_size);
            data.extend(
                color
                    .to_array()
                    .map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8),
            );
        }
    }
    data
}

pub fn fallback_image(width: u32, height: u32, settings: &HalftoneSettings) -> Image {
    let width = width.max(1);
    let height = height.max(1);
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        render_fallback(width, height, settings),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::halftone::{BG_COLOR, DOT_COLOR, HALFTONE_SETTINGS};

    #[test]
    fn dot_size_shrinks_with_luminance() {
        let settings = HALFTONE_SETTINGS;
        assert_eq!(fallback_dot_size(&settings, 0.0), settings.dot_radius);
        assert_eq!(fallback_dot_size(&settings, 1.0), 0.0);
        let scene = fallback_dot_size(&settings, SCENE_LUMINANCE);
        assert!((scene - 1.944).abs() < 1e-3);
    }

    #[test]
    fn cell_centre_is_dot_and_corner_is_background() {
        let settings = HALFTONE_SETTINGS;
        let dot_size = fallback_dot_size(&settings, SCENE_LUMINANCE);

        let centre = halftone_pixel(Vec2::new(3.0, 3.0), &settings, dot_size);
        let corner = halftone_pixel(Vec2::new(0.5, 0.5), &settings, dot_size);
        assert!((centre - DOT_COLOR).abs().max_element() < 1e-5);
        assert!((corner - BG_COLOR).abs().max_element() < 1e-5);
    }

    #[test]
    fn rendered_buffer_matches_dimensions() {
        let data = render_fallback(12, 6, &HALFTONE_SETTINGS);
        assert_eq!(data.len(), 12 * 6 * 4);
        // Top-left pixel sits in a cell corner.
        assert_eq!(&data[0..4], &[255, 255, 255, 255]);
    }
}

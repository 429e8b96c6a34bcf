use bevy::prelude::*;
use bevy::render::extract_component::ExtractComponent;

/// Uniform block consumed by `shaders/halftone.wgsl`.
///
/// `resolution` tracks the drawing-buffer size in physical pixels and is
/// rewritten whenever the window is resized.
#[derive(
    Component,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    ExtractComponent,
    bevy::render::render_resource::ShaderType,
)]
pub struct HalftoneSettings {
    pub grid_size: f32,
    pub dot_radius: f32,
    pub resolution: Vec2,
    pub dot_color: Vec4,
    pub bg_color: Vec4,
}

/// Distance between cell centres, in pixels.
pub const GRID_SIZE: f32 = 6.0;

/// Gap between neighbouring dots. Negative values make dots overlap.
pub const GRID_SPACING: f32 = -1.2;

/// Full-size dot radius: (GRID_SIZE - GRID_SPACING) / 2 = 3.6
pub const DOT_RADIUS: f32 = (GRID_SIZE - GRID_SPACING) / 2.0;

pub const DOT_COLOR: Vec4 = Vec4::new(0.996, 0.278, 0.035, 1.0);
pub const BG_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

/// Rec. 601 luma weights, matching the shader's `dot(rgb, weights)`.
pub const LUMA_WEIGHTS: Vec3 = Vec3::new(0.299, 0.587, 0.114);

/// Approximate luminance of the rendered hero scene over its orange
/// backdrop. The fallback has no scene to sample so it uses this value
/// everywhere: dot size = DOT_RADIUS * (1 - 0.46) ≈ 1.94 px.
pub const SCENE_LUMINANCE: f32 = 0.46;

/// Width of the anti-aliased dot edge, in pixels.
pub const EDGE_SOFTNESS: f32 = 0.5;

pub const HALFTONE_SETTINGS: HalftoneSettings = HalftoneSettings {
    grid_size: GRID_SIZE,
    dot_radius: DOT_RADIUS,
    resolution: Vec2::ONE,
    dot_color: DOT_COLOR,
    bg_color: BG_COLOR,
};

use bevy::prelude::*;

pub const DEFAULT_MODEL_PATH: &str = "models/brain.glb";

/// Radians per second around the model's Y axis.
pub const DEFAULT_ROTATION_SPEED: f32 = 0.25;
pub const DEFAULT_MODEL_SCALE: f32 = 0.75;

pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 3.0);
pub const CAMERA_FOV_DEGREES: f32 = 45.0;

pub const MODEL_GROUP_OFFSET: Vec3 = Vec3::new(0.4, 0.2, 0.0);

pub const AMBIENT_BRIGHTNESS: f32 = 0.6;
pub const DIRECTIONAL_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);
pub const DIRECTIONAL_INTENSITY: f32 = 0.8;

/// Hero backdrop, #fe4709.
pub const HERO_BACKDROP: Color = Color::srgb(0.996, 0.278, 0.035);

/// Accent used for highlights in page text, #fd4f0c.
pub const ACCENT: Color = Color::srgb(0.992, 0.310, 0.047);

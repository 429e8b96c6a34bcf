/// Camera, lights and the rotating model, with load watching and timeout.
pub mod hero_model;

/// Flat halftone shown when the model is unavailable.
pub mod fallback;

/// Screen-space halftone pass after tonemapping on the hero camera.
pub mod halftone_post_processing;

/// CPU rendition of the same dot pattern at a fixed luminance.
pub mod halftone_fallback;

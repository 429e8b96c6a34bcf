//! Shared constants for the landing page engine.
//!
//! Visual parameters live here so the 3D post-process pass and the flat 2D
//! fallback draw from the same table.

pub mod choreography;
pub mod halftone;
pub mod scene;
pub mod timing;

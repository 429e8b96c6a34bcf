//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, build-time
//! configuration and hero state transitions for native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
pub mod app_setup;

/// Hero state machine: loading, ready, or degraded to the flat fallback.
pub mod app_state;

/// Landing configuration baked in by the build script.
pub mod config;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;

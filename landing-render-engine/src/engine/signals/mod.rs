//! Shared state that bypasses per-frame change detection.
//!
//! Both values are written by exactly one producer and read by any number of
//! consumers. They are injected as resources rather than held in statics so
//! each `App` (and each test) owns its own instance.

/// One-shot latched readiness notification for the hero model.
pub mod readiness;

/// Latest hero scroll offset, read by the 3D view every frame.
pub mod scroll_cursor;

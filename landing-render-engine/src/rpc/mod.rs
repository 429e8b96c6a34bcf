//! JSON-RPC 2.0 communication layer for the host page.
//!
//! The engine runs inside the landing page (or an iframe of it) and talks to
//! the surrounding React page over `postMessage`.
//!
//! ## Message Flow
//!
//! ```text
//! Host page  <──postMessage──>  Bevy canvas
//!     │                              │
//!     ├─ Request (with ID) ────────> │
//!     │                              ├─ Process request
//!     │ <─────── Response (with ID) ─┤
//!     │                              │
//!     ├─ Notification (no ID) ─────> │
//!     │ <───── Notification (no ID) ─┤
//! ```
//!
//! ## Requests
//! - `carousel_command { carousel, action, index? }`: drive the
//!   `testimonials` or `gallery` carousel (`next`, `prev`, `go_to`, `pause`,
//!   `resume`, `toggle_expanded`).
//! - `select_event { id }`: show another event in the activities gallery.
//! - `get_hero_state`: hero state, readiness and current scroll offset.
//!
//! ## Notifications from the host
//! - `store_changed { table }`: the store's realtime channel saw a change;
//!   the table is fetched again.
//!
//! ## Notifications to the host
//! - `hero_ready`, `hero_degraded { reason }`
//! - `carousel_changed { carousel, index, direction }`
//! - `testimonials_loaded { count }`, `events_loaded { count }`
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params

/// JSON-RPC 2.0 bidirectional communication with the host page.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;

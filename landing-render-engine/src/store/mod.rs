//! Read-only client for the hosted data store.
//!
//! Testimonials and events are fetched over the store's REST interface in
//! the browser, or read from a bundled JSON snapshot natively. Results
//! reach the ECS through a delivery queue drained once per frame; failures
//! are logged and leave the affected list empty.

pub mod client;
pub mod error;
pub mod feed;
pub mod records;

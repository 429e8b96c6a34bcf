/// Carousel phases, autoplay timer and index arithmetic.
pub mod state;

/// Testimonial and gallery carousels wired to the feed, input and host.
pub mod systems;

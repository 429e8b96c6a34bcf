pub mod carousel;
pub mod choreography;
pub mod core;
pub mod page;
pub mod render;
pub mod scene;
pub mod signals;

pub mod engine;
pub mod logging;
pub mod palette;
pub mod render;
pub mod surface;
pub mod theme;

pub mod adjust;
pub mod grid;
pub mod loader;
pub mod sampler;

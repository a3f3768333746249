pub mod color;
pub mod compositor;
pub mod fonts;
pub mod surface;
pub mod transform;

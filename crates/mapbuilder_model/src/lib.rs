pub mod color;
pub mod symbol;
pub mod renderer;
pub mod clusterer;
pub mod geometry;
pub mod graphic;
pub mod field;
pub mod services;
pub mod layer;

pub use color::*;
pub use symbol::*;
pub use renderer::*;
pub use clusterer::*;
pub use geometry::*;
pub use graphic::*;
pub use field::*;
pub use services::*;
pub use layer::*;

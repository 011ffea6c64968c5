pub mod errors;
pub mod info;
pub mod maptips;
pub mod template;

pub use errors::*;
pub use info::*;
pub use maptips::*;
pub use template::*;

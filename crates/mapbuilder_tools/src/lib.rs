pub mod errors;
pub mod command;
pub mod registry;
pub mod item;
pub mod panel;
pub mod panels;

pub use errors::*;
pub use command::*;
pub use registry::*;
pub use item::*;
pub use panel::*;
pub use panels::*;

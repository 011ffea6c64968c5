pub mod errors;
pub mod document;
pub mod namespaces;
pub mod format;
pub mod renderer;
pub mod clusterer;
pub mod dataset;
pub mod writer;
pub mod layers;

pub use errors::*;
pub use document::*;
pub use writer::{LayerXamlWriter, WriteContext, XamlWarning, XamlWarningKind};
pub use layers::*;

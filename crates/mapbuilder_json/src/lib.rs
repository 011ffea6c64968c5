pub mod errors;
pub mod number;
pub mod value;
pub mod scanner;
pub mod deserializer;
pub mod converter;
pub mod serializer;
pub mod writer;

pub use errors::*;
pub use number::*;
pub use value::*;
pub use scanner::*;
pub use deserializer::*;
pub use converter::*;
pub use serializer::*;
pub use writer::*;

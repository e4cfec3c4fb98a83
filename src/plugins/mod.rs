pub mod parsers;
pub mod registry;
pub mod traits;

pub use registry::{ParserHandle, ParserRegistry};
pub use traits::{ParseResult, PriceParser};

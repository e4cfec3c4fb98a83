pub mod parser;

pub use parser::{ParseResult, PriceParser};

pub mod compression;
pub mod error;
pub mod price;

pub use compression::ContentDecompressor;
pub use error::{AppError, Result};
pub use price::{extract_price, parse_split_price};

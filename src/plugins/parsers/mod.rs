pub mod amazon;
pub mod argos;
pub mod ebay;
mod page;

pub use amazon::AmazonParser;
pub use argos::ArgosParser;
pub use ebay::EbayParser;

use std::sync::Arc;

use crate::plugins::traits::PriceParser;

/// Every parser that ships with the scraper.
pub fn default_parsers() -> Vec<Arc<dyn PriceParser>> {
    vec![
        Arc::new(AmazonParser::new()),
        Arc::new(EbayParser::new()),
        Arc::new(ArgosParser::new()),
    ]
}

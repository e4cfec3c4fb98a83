use super::page::Page;
use crate::plugins::traits::{ParseResult, PriceParser};

/// The struck-through "was" price doubles as the discount marker.
const ORIGINAL_PRICE: [&str; 2] = [
    ".x-additional-info .ux-textspans--STRIKETHROUGH",
    ".x-price-approx__was .ux-textspans",
];
const CURRENT_PRICE: [&str; 2] = [".x-price-primary .ux-textspans", ".x-price-primary"];

#[derive(Debug, Default)]
pub struct EbayParser;

impl EbayParser {
    pub fn new() -> Self {
        Self
    }
}

impl PriceParser for EbayParser {
    fn name(&self) -> &str {
        "eBay UK"
    }

    fn supported_domain(&self) -> &str {
        "ebay.co.uk"
    }

    fn parse_price(&self, page: &[u8]) -> ParseResult {
        let Some(page) = Page::load(page, self.name()) else {
            return ParseResult::zero();
        };
        let Some(current) = page.price_in(&CURRENT_PRICE) else {
            return ParseResult::zero();
        };

        match page.price_in(&ORIGINAL_PRICE) {
            Some(original) => ParseResult::new(original, current),
            None => ParseResult::undiscounted(current),
        }
    }
}

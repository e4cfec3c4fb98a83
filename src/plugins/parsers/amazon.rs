use rust_decimal::Decimal;

use super::page::Page;
use crate::plugins::traits::{ParseResult, PriceParser};
use crate::utils::parse_split_price;

const DISCOUNT_MARKER: &str = ".savingsPercentage";
const ORIGINAL_PRICE: [&str; 2] = [".basisPrice .a-offscreen", ".a-text-price .a-offscreen"];
const CURRENT_PRICE: [&str; 3] = [
    ".priceToPay .a-offscreen",
    "#corePrice_feature_div .a-offscreen",
    ".a-price .a-offscreen",
];

#[derive(Debug, Default)]
pub struct AmazonParser;

impl AmazonParser {
    pub fn new() -> Self {
        Self
    }

    /// Current price, preferring the whole/fraction split layout.
    fn current_price(page: &Page) -> Decimal {
        let whole = page
            .first_text(".priceToPay .a-price-whole")
            .or_else(|| page.first_text(".a-price-whole"));
        if let Some(whole) = whole {
            let fraction = page
                .first_text(".priceToPay .a-price-fraction")
                .or_else(|| page.first_text(".a-price-fraction"))
                .unwrap_or_default();
            return parse_split_price(&whole, &fraction);
        }
        page.price_in(&CURRENT_PRICE).unwrap_or(Decimal::ZERO)
    }
}

impl PriceParser for AmazonParser {
    fn name(&self) -> &str {
        "Amazon UK"
    }

    fn supported_domain(&self) -> &str {
        "amazon.co.uk"
    }

    fn parse_price(&self, page: &[u8]) -> ParseResult {
        let Some(page) = Page::load(page, self.name()) else {
            return ParseResult::zero();
        };

        let current = Self::current_price(&page);
        if current.is_zero() {
            return ParseResult::zero();
        }

        if page.exists(DISCOUNT_MARKER) {
            let original = page.price_in(&ORIGINAL_PRICE).unwrap_or(current);
            ParseResult::new(original, current)
        } else {
            ParseResult::undiscounted(current)
        }
    }
}

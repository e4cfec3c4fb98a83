use rust_decimal::Decimal;
use std::str::FromStr;

use super::page::Page;
use crate::plugins::traits::{ParseResult, PriceParser};

const DISCOUNT_MARKER: &str = r#"[data-test="product-price-was"]"#;
const CURRENT_PRICE: [&str; 1] = [r#"[data-test="product-price-primary"]"#];

#[derive(Debug, Default)]
pub struct ArgosParser;

impl ArgosParser {
    pub fn new() -> Self {
        Self
    }

    fn current_price(page: &Page) -> Option<Decimal> {
        page.price_in(&CURRENT_PRICE).or_else(|| {
            // Structured-data fallback: <meta itemprop="price" content="49.99">
            page.attr(r#"[itemprop="price"]"#, "content")
                .and_then(|content| Decimal::from_str(&content).ok())
                .filter(|price| !price.is_zero())
        })
    }
}

impl PriceParser for ArgosParser {
    fn name(&self) -> &str {
        "Argos"
    }

    fn supported_domain(&self) -> &str {
        "argos.co.uk"
    }

    fn parse_price(&self, page: &[u8]) -> ParseResult {
        let Some(page) = Page::load(page, self.name()) else {
            return ParseResult::zero();
        };
        let Some(current) = Self::current_price(&page) else {
            return ParseResult::zero();
        };

        if page.exists(DISCOUNT_MARKER) {
            let original = page.price_in(&[DISCOUNT_MARKER]).unwrap_or(current);
            ParseResult::new(original, current)
        } else {
            ParseResult::undiscounted(current)
        }
    }
}

use rust_decimal::Decimal;
use scraper::{Html, Selector};

use crate::utils::{ContentDecompressor, extract_price};

/// Parsed product page with lenient lookups.
pub(crate) struct Page {
    document: Html,
}

impl Page {
    /// Decompresses and parses `body`; `None` when the bytes cannot be inflated.
    pub(crate) fn load(body: &[u8], parser: &str) -> Option<Self> {
        match ContentDecompressor::new().decompress_to_string(body) {
            Ok(html) => Some(Self {
                document: Html::parse_document(&html),
            }),
            Err(e) => {
                tracing::debug!(parser, error = %e, "could not decompress page body");
                None
            }
        }
    }

    pub(crate) fn exists(&self, selector: &str) -> bool {
        self.first_text(selector).is_some()
    }

    /// Trimmed text of the first element matching `selector`.
    pub(crate) fn first_text(&self, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        let element = self.document.select(&selector).next()?;
        Some(element.text().collect::<String>().trim().to_string())
    }

    /// First price token inside any of `selectors`, tried in order.
    pub(crate) fn price_in(&self, selectors: &[&str]) -> Option<Decimal> {
        selectors
            .iter()
            .filter_map(|selector| self.first_text(selector))
            .map(|text| extract_price(&text))
            .find(|price| !price.is_zero())
    }

    pub(crate) fn attr(&self, selector: &str, name: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        let element = self.document.select(&selector).next()?;
        element.value().attr(name).map(|v| v.trim().to_string())
    }
}

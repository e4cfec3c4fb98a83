use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

/// Prices read from one product page.
///
/// `discounted_price == price` when the page shows no markdown. Both are
/// zero when the layout was not recognised.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseResult {
    pub price: Decimal,
    pub discounted_price: Decimal,
}

impl ParseResult {
    /// Builds a result that upholds `0 <= discounted_price <= price`.
    pub fn new(price: Decimal, discounted_price: Decimal) -> Self {
        let price = price.max(Decimal::ZERO);
        let discounted_price = discounted_price.max(Decimal::ZERO);
        if discounted_price > price {
            Self {
                price: discounted_price,
                discounted_price: price,
            }
        } else {
            Self {
                price,
                discounted_price,
            }
        }
    }

    pub fn undiscounted(price: Decimal) -> Self {
        Self::new(price, price)
    }

    pub fn zero() -> Self {
        Self {
            price: Decimal::ZERO,
            discounted_price: Decimal::ZERO,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.price.is_zero() && self.discounted_price.is_zero()
    }

    pub fn has_discount(&self) -> bool {
        self.discounted_price < self.price
    }
}

/// Per-vendor page parser.
pub trait PriceParser: Send + Sync {
    fn name(&self) -> &str;

    /// Canonical registry key, e.g. `amazon.co.uk`.
    fn supported_domain(&self) -> &str;

    /// Host-contains test, so regional and sub-domains of the vendor match.
    fn can_parse(&self, url: &Url) -> bool {
        url.host_str()
            .map(|host| host.to_ascii_lowercase().contains(&self.supported_domain().to_ascii_lowercase()))
            .unwrap_or(false)
    }

    /// Reads prices from a (possibly gzip-compressed) page body. Never fails.
    fn parse_price(&self, page: &[u8]) -> ParseResult;
}

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::parsers::default_parsers;
use super::traits::PriceParser;

pub type ParserHandle = Arc<dyn PriceParser>;

/// Parsers keyed by their lowercased supported domain.
///
/// Lookup is an exact, case-insensitive match on the domain string. The
/// looser host-contains test lives on [`PriceParser::can_parse`].
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, ParserHandle>,
}

impl ParserRegistry {
    /// Builds the registry. A later parser replaces an earlier one for the same domain.
    pub fn new(parsers: impl IntoIterator<Item = ParserHandle>) -> Self {
        let mut map = HashMap::new();
        for parser in parsers {
            let domain = parser.supported_domain().to_ascii_lowercase();
            if let Some(previous) = map.insert(domain.clone(), parser) {
                tracing::warn!(
                    domain = %domain,
                    replaced = previous.name(),
                    "duplicate parser registration, keeping the last one"
                );
            }
        }
        Self { parsers: map }
    }

    pub fn with_default_parsers() -> Self {
        Self::new(default_parsers())
    }

    pub fn has_parser(&self, domain: &str) -> bool {
        self.parsers.contains_key(&domain.to_ascii_lowercase())
    }

    pub fn get_parser(&self, domain: &str) -> Option<ParserHandle> {
        self.parsers.get(&domain.to_ascii_lowercase()).cloned()
    }

    pub fn supported_domains(&self) -> HashSet<String> {
        self.parsers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("domains", &self.supported_domains())
            .finish()
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;

use crate::models::{domain_of, generate_id};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub base_url: String,
    pub supports_automatic_updates: bool,
}

impl Vendor {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, supports_automatic_updates: bool) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            base_url: base_url.into(),
            supports_automatic_updates,
        }
    }

    /// Registry key for this vendor's site, if the base URL parses.
    pub fn domain(&self) -> Option<String> {
        Url::parse(&self.base_url).ok().as_ref().and_then(domain_of)
    }
}

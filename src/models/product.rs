use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::generate_id;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub cheapest_price: Option<Decimal>,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            cheapest_price: None,
        }
    }
}

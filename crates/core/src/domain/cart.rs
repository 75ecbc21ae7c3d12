use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::product::{Product, ProductId};

/// A product the shopper selected, paired with the chosen quantity.
///
/// `amount` is always at least 1; removing a product deletes its line
/// instead of storing a zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
    pub amount: u32,
}

impl CartLine {
    pub fn first_of(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            amount: 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("cart payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cart payload violates an invariant: {0}")]
    Invariant(String),
}

/// Ordered sequence of cart lines, insertion order preserved, at most one
/// line per product id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Parses a persisted payload, enforcing the line invariants. Payloads
    /// written by [`Cart::to_payload`] always pass; externally tampered
    /// ones may not.
    pub fn from_payload(payload: &str) -> Result<Self, PayloadError> {
        let lines: Vec<CartLine> = serde_json::from_str(payload)?;

        let mut seen = std::collections::HashSet::new();
        for line in &lines {
            if line.amount == 0 {
                return Err(PayloadError::Invariant(format!(
                    "line for product {} has amount 0",
                    line.id
                )));
            }
            if !seen.insert(line.id) {
                return Err(PayloadError::Invariant(format!(
                    "duplicate line for product {}",
                    line.id
                )));
            }
        }

        Ok(Self { lines })
    }

    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn find(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// New cart with the matching line's amount replaced in place. Other
    /// lines and their order are untouched; `amount` must be positive.
    pub fn with_line_amount(&self, product_id: ProductId, amount: u32) -> Self {
        let lines = self
            .lines
            .iter()
            .map(|line| {
                if line.id == product_id {
                    CartLine { amount, ..line.clone() }
                } else {
                    line.clone()
                }
            })
            .collect();
        Self { lines }
    }

    /// New cart with `line` appended. The caller ensures no line for that
    /// product already exists.
    pub fn with_appended(&self, line: CartLine) -> Self {
        let mut lines = self.lines.clone();
        lines.push(line);
        Self { lines }
    }

    /// New cart with the matching line filtered out, remainder order
    /// preserved.
    pub fn without(&self, product_id: ProductId) -> Self {
        let lines =
            self.lines.iter().filter(|line| line.id != product_id).cloned().collect();
        Self { lines }
    }
}

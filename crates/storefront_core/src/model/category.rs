//! Category records.

use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

/// Category projection, also nested under products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Create/update input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

//! Product records and category-assignment helpers.
//!
//! # Invariants
//! - A product always has exactly one owning user.
//! - The category set written for a product is exactly the resolvable
//!   subset of the ids supplied on create/update (full replace).

use crate::model::category::{Category, CategoryId};
use crate::model::user::{UserId, UserSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type ProductId = i64;

/// Full product projection with owner and categories eagerly loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Non-negative, enforced by storage.
    pub price: i64,
    pub color: String,
    pub quantity: i64,
    pub owner: UserSummary,
    /// Associated categories ordered by id.
    pub categories: Vec<Category>,
}

impl Product {
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            color: self.color.clone(),
            quantity: self.quantity,
        }
    }

    /// Ids of the associated categories.
    pub fn category_ids(&self) -> Vec<CategoryId> {
        self.categories.iter().map(|category| category.id).collect()
    }
}

/// Product projection nested under its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub color: String,
    pub quantity: i64,
}

/// Create/update input.
///
/// `category_ids` is the complete desired category set. A missing or empty
/// list clears every association on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub color: String,
    pub quantity: i64,
    pub owner_id: UserId,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

/// Deduplicates requested category ids, sorted ascending.
pub fn normalize_category_ids(ids: &[CategoryId]) -> Vec<CategoryId> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

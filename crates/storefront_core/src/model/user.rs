//! User records.

use crate::model::company::CompanySummary;
use crate::model::product::ProductSummary;
use serde::{Deserialize, Serialize};

/// Storage-assigned user identifier.
pub type UserId = i64;

/// Full user projection with its company and products eagerly loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub age: i64,
    /// At most one company (1:1).
    pub company: Option<CompanySummary>,
    /// Owned products ordered by id.
    pub products: Vec<ProductSummary>,
}

impl User {
    /// Drops relation data, keeping only the user's own fields.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            age: self.age,
        }
    }
}

/// Owner projection nested under companies and products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub age: i64,
}

/// Create/update input; update replaces every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub age: i64,
}

impl UserInput {
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

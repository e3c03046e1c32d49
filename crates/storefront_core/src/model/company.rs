//! Company records.
//!
//! A company belongs to exactly one user and a user owns at most one
//! company. Company names are globally unique.

use crate::model::user::{UserId, UserSummary};
use serde::{Deserialize, Serialize};

pub type CompanyId = i64;

/// Company projection with its owner summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub owner: UserSummary,
}

impl Company {
    pub fn summary(&self) -> CompanySummary {
        CompanySummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Company projection nested under its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: CompanyId,
    pub name: String,
}

/// Create input. Ownership is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    pub owner_id: UserId,
}

impl CompanyInput {
    pub fn new(name: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            name: name.into(),
            owner_id,
        }
    }
}

/// Update input; only the name is mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyUpdate {
    pub name: String,
}

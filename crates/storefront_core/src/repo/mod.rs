//! Repository layer: per-entity data access over SQLite.
//!
//! # Responsibility
//! - Expose create/get/list/update/delete per entity behind a trait.
//! - Classify storage failures into the stable error taxonomy.
//!
//! # Invariants
//! - Every write runs in its own transaction and rolls back on failure.
//! - Pre-checks give precise messages; storage constraints remain the
//!   authority under concurrent writers.

pub mod category_repo;
pub mod company_repo;
pub mod constraint;
pub mod error;
mod load;
pub mod product_repo;
mod schema;
mod tx;
pub mod user_repo;

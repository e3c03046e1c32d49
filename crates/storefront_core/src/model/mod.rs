//! Entity model for users, products, companies and categories.
//!
//! # Responsibility
//! - Define the plain records returned by repositories.
//! - Define the write inputs accepted by repositories.
//!
//! # Invariants
//! - Identifiers are storage-assigned and never change once assigned.
//! - Relations are embedded as nested values, never as live references.
//! - Company ownership is 1:1 through a unique `owner_id` column.
//! - Product/Category is N:N through the `product_categories` join table.

pub mod category;
pub mod company;
pub mod product;
pub mod user;

/// Entity families handled by the repository layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Product,
    Company,
    Category,
}

impl EntityKind {
    /// Human-facing entity name used in client messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Product => "Product",
            Self::Company => "Company",
            Self::Category => "Category",
        }
    }

    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Product => "products",
            Self::Company => "companies",
            Self::Category => "categories",
        }
    }
}

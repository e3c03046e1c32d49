//! Relational data layer for users, products, companies and categories.
//!
//! Repositories own every write and every relationship invariant; callers
//! receive plain records or a classified `RepoError`, and can wrap either in
//! an [`Envelope`] for transport.

pub mod config;
pub mod db;
pub mod envelope;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::StoreConfig;
pub use envelope::Envelope;
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::category::{Category, CategoryId, CategoryInput};
pub use model::company::{Company, CompanyId, CompanyInput, CompanySummary, CompanyUpdate};
pub use model::product::{Product, ProductId, ProductInput, ProductSummary};
pub use model::user::{User, UserId, UserInput, UserSummary};
pub use model::EntityKind;
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::company_repo::{CompanyRepository, SqliteCompanyRepository};
pub use repo::error::{ErrorKind, RepoError, RepoResult};
pub use repo::product_repo::{ProductRepository, SqliteProductRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};

/// Minimal health-check probe.
pub fn ping() -> &'static str {
    "pong"
}

/// Core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

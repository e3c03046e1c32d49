//! Eager relation loaders shared by the repositories.
//!
//! All loaders take a plain `&Connection` so they run equally on a
//! transaction (via deref) or on the repository connection.

use crate::model::category::Category;
use crate::model::company::CompanySummary;
use crate::model::product::{ProductId, ProductSummary};
use crate::model::user::{UserId, UserSummary};
use crate::model::EntityKind;
use crate::repo::error::RepoResult;
use rusqlite::{Connection, OptionalExtension, Row};

pub(crate) fn row_exists(conn: &Connection, entity: EntityKind, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);", entity.table()),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Builds the owner summary from `owner_id`, `owner_name`, `owner_age` columns.
pub(crate) fn owner_from_row(row: &Row<'_>) -> rusqlite::Result<UserSummary> {
    Ok(UserSummary {
        id: row.get("owner_id")?,
        name: row.get("owner_name")?,
        age: row.get("owner_age")?,
    })
}

pub(crate) fn load_company_for_owner(
    conn: &Connection,
    owner_id: UserId,
) -> RepoResult<Option<CompanySummary>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM companies WHERE owner_id = ?1;",
            [owner_id],
            |row| {
                Ok(CompanySummary {
                    id: row.get("id")?,
                    name: row.get("name")?,
                })
            },
        )
        .optional()?)
}

pub(crate) fn load_products_for_owner(
    conn: &Connection,
    owner_id: UserId,
) -> RepoResult<Vec<ProductSummary>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, price, color, quantity
         FROM products
         WHERE owner_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([owner_id])?;
    let mut products = Vec::new();
    while let Some(row) = rows.next()? {
        products.push(ProductSummary {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            price: row.get("price")?,
            color: row.get("color")?,
            quantity: row.get("quantity")?,
        });
    }
    Ok(products)
}

pub(crate) fn load_categories_for_product(
    conn: &Connection,
    product_id: ProductId,
) -> RepoResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name
         FROM product_categories pc
         INNER JOIN categories c ON c.id = pc.category_id
         WHERE pc.product_id = ?1
         ORDER BY c.id ASC;",
    )?;
    let mut rows = stmt.query([product_id])?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        categories.push(Category {
            id: row.get("id")?,
            name: row.get("name")?,
        });
    }
    Ok(categories)
}

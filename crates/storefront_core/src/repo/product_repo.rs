//! Product repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `products` with owner and categories eagerly loaded.
//! - Own category-link replacement for the product/category N:N relation.
//!
//! # Invariants
//! - Links are replaced as a whole inside the product's write transaction.
//! - Requested category ids that do not resolve are dropped silently.
//! - An empty category list clears every link.
//! - Deleting a product removes its links in the same transaction.

use crate::model::category::CategoryId;
use crate::model::product::{normalize_category_ids, Product, ProductId, ProductInput};
use crate::model::EntityKind;
use crate::repo::constraint::classify_storage_error;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::load::{load_categories_for_product, owner_from_row};
use crate::repo::schema::ensure_schema_ready;
use crate::repo::tx::{run_read, run_write};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

const PRODUCT_SELECT_SQL: &str = "SELECT
    p.id,
    p.name,
    p.description,
    p.price,
    p.color,
    p.quantity,
    u.id AS owner_id,
    u.name AS owner_name,
    u.age AS owner_age
FROM products p
INNER JOIN users u ON u.id = p.owner_id";

/// Repository interface for products.
pub trait ProductRepository {
    /// Creates a product linked to the resolvable subset of `category_ids`.
    fn create_product(&mut self, input: &ProductInput) -> RepoResult<Product>;
    fn get_product(&self, id: ProductId) -> RepoResult<Product>;
    fn list_products(&self) -> RepoResult<Vec<Product>>;
    /// Replaces every field and the whole category set.
    fn update_product(&mut self, id: ProductId, input: &ProductInput) -> RepoResult<Product>;
    fn delete_product(&mut self, id: ProductId) -> RepoResult<Product>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_ready(
            conn,
            &["users", "products", "categories", "product_categories"],
        )?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&mut self, input: &ProductInput) -> RepoResult<Product> {
        run_write(
            self.conn,
            EntityKind::Product,
            "create",
            classify_storage_error,
            |tx| {
                tx.execute(
                    "INSERT INTO products (name, description, price, color, quantity, owner_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                    params![
                        input.name,
                        input.description,
                        input.price,
                        input.color,
                        input.quantity,
                        input.owner_id,
                    ],
                )?;
                let id = tx.last_insert_rowid();
                replace_category_links(tx, id, &input.category_ids)?;
                Ok(read_product(tx, id)?.ok_or(RepoError::InconsistentState(
                    "created product missing in read-back",
                ))?)
            },
        )
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Product> {
        run_read(self.conn, |conn| {
            read_product(conn, id)?.ok_or_else(|| RepoError::not_found(EntityKind::Product, id))
        })
    }

    fn list_products(&self) -> RepoResult<Vec<Product>> {
        run_read(self.conn, |conn| {
            let mut stmt = conn.prepare(&format!("{PRODUCT_SELECT_SQL} ORDER BY p.id ASC;"))?;
            let mut rows = stmt.query([])?;
            let mut products = Vec::new();
            while let Some(row) = rows.next()? {
                let mut product = parse_product_row(row)?;
                product.categories = load_categories_for_product(conn, product.id)?;
                products.push(product);
            }
            Ok(products)
        })
    }

    fn update_product(&mut self, id: ProductId, input: &ProductInput) -> RepoResult<Product> {
        run_write(
            self.conn,
            EntityKind::Product,
            "update",
            classify_storage_error,
            |tx| {
                let changed = tx.execute(
                    "UPDATE products
                     SET
                        name = ?2,
                        description = ?3,
                        price = ?4,
                        color = ?5,
                        quantity = ?6,
                        owner_id = ?7
                     WHERE id = ?1;",
                    params![
                        id,
                        input.name,
                        input.description,
                        input.price,
                        input.color,
                        input.quantity,
                        input.owner_id,
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::not_found(EntityKind::Product, id).into());
                }
                replace_category_links(tx, id, &input.category_ids)?;
                Ok(read_product(tx, id)?.ok_or(RepoError::InconsistentState(
                    "updated product missing in read-back",
                ))?)
            },
        )
    }

    fn delete_product(&mut self, id: ProductId) -> RepoResult<Product> {
        run_write(
            self.conn,
            EntityKind::Product,
            "delete",
            classify_storage_error,
            |tx| {
                let snapshot = read_product(tx, id)?
                    .ok_or_else(|| RepoError::not_found(EntityKind::Product, id))?;
                tx.execute("DELETE FROM product_categories WHERE product_id = ?1;", [id])?;
                tx.execute("DELETE FROM products WHERE id = ?1;", [id])?;
                Ok(snapshot)
            },
        )
    }
}

/// Sets the product's links to exactly the existing categories in `requested`.
fn replace_category_links(
    tx: &Transaction<'_>,
    product_id: ProductId,
    requested: &[CategoryId],
) -> rusqlite::Result<()> {
    tx.execute(
        "DELETE FROM product_categories WHERE product_id = ?1;",
        [product_id],
    )?;

    let wanted = normalize_category_ids(requested);
    let mut linked = 0usize;
    for category_id in &wanted {
        // Unknown ids select no row and are skipped.
        linked += tx.execute(
            "INSERT INTO product_categories (product_id, category_id)
             SELECT ?1, id
             FROM categories
             WHERE id = ?2;",
            params![product_id, category_id],
        )?;
    }

    debug!(
        "event=product_categories_replace module=repo product_id={product_id} requested={} linked={linked}",
        wanted.len()
    );
    Ok(())
}

fn read_product(conn: &Connection, id: ProductId) -> RepoResult<Option<Product>> {
    let product = conn
        .query_row(
            &format!("{PRODUCT_SELECT_SQL} WHERE p.id = ?1;"),
            [id],
            parse_product_row,
        )
        .optional()?;

    match product {
        Some(mut product) => {
            product.categories = load_categories_for_product(conn, id)?;
            Ok(Some(product))
        }
        None => Ok(None),
    }
}

// Categories are filled in by the caller.
fn parse_product_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        price: row.get("price")?,
        color: row.get("color")?,
        quantity: row.get("quantity")?,
        owner: owner_from_row(row)?,
        categories: Vec::new(),
    })
}

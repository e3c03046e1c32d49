//! Category repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Category names are globally unique; a pre-check produces the friendly
//!   message and the unique column backs it up.
//! - Deleting a category removes its product links in the same transaction.

use crate::model::category::{Category, CategoryId, CategoryInput};
use crate::model::EntityKind;
use crate::repo::constraint::{classify_storage_error, constraint_targets};
use crate::repo::error::{RepoError, RepoResult, CATEGORY_NAME_TAKEN};
use crate::repo::load::row_exists;
use crate::repo::schema::ensure_schema_ready;
use crate::repo::tx::{run_read, run_write};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for categories.
pub trait CategoryRepository {
    fn create_category(&mut self, input: &CategoryInput) -> RepoResult<Category>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Category>;
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    fn update_category(&mut self, id: CategoryId, input: &CategoryInput) -> RepoResult<Category>;
    fn delete_category(&mut self, id: CategoryId) -> RepoResult<Category>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["categories", "product_categories"])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&mut self, input: &CategoryInput) -> RepoResult<Category> {
        run_write(
            self.conn,
            EntityKind::Category,
            "create",
            classify_category_write_error,
            |tx| {
                if category_with_name(tx, &input.name, None)?.is_some() {
                    return Err(RepoError::duplicate(CATEGORY_NAME_TAKEN).into());
                }
                tx.execute(
                    "INSERT INTO categories (name) VALUES (?1);",
                    [input.name.as_str()],
                )?;
                let id = tx.last_insert_rowid();
                Ok(read_category(tx, id)?.ok_or(RepoError::InconsistentState(
                    "created category missing in read-back",
                ))?)
            },
        )
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Category> {
        run_read(self.conn, |conn| {
            read_category(conn, id)?
                .ok_or_else(|| RepoError::not_found(EntityKind::Category, id))
        })
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        run_read(self.conn, |conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id ASC;")?;
            let mut rows = stmt.query([])?;
            let mut categories = Vec::new();
            while let Some(row) = rows.next()? {
                categories.push(parse_category_row(row)?);
            }
            Ok(categories)
        })
    }

    fn update_category(&mut self, id: CategoryId, input: &CategoryInput) -> RepoResult<Category> {
        run_write(
            self.conn,
            EntityKind::Category,
            "update",
            classify_category_write_error,
            |tx| {
                if !row_exists(tx, EntityKind::Category, id)? {
                    return Err(RepoError::not_found(EntityKind::Category, id).into());
                }
                if category_with_name(tx, &input.name, Some(id))?.is_some() {
                    return Err(RepoError::duplicate(CATEGORY_NAME_TAKEN).into());
                }
                tx.execute(
                    "UPDATE categories SET name = ?2 WHERE id = ?1;",
                    params![id, input.name],
                )?;
                Ok(read_category(tx, id)?.ok_or(RepoError::InconsistentState(
                    "updated category missing in read-back",
                ))?)
            },
        )
    }

    fn delete_category(&mut self, id: CategoryId) -> RepoResult<Category> {
        run_write(
            self.conn,
            EntityKind::Category,
            "delete",
            classify_storage_error,
            |tx| {
                let snapshot = read_category(tx, id)?
                    .ok_or_else(|| RepoError::not_found(EntityKind::Category, id))?;
                let unlinked = tx.execute(
                    "DELETE FROM product_categories WHERE category_id = ?1;",
                    [id],
                )?;
                tx.execute("DELETE FROM categories WHERE id = ?1;", [id])?;
                debug!("event=category_delete module=repo category_id={id} unlinked_products={unlinked}");
                Ok(snapshot)
            },
        )
    }
}

fn read_category(conn: &Connection, id: CategoryId) -> RepoResult<Option<Category>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM categories WHERE id = ?1;",
            [id],
            parse_category_row,
        )
        .optional()?)
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn category_with_name(
    conn: &Connection,
    name: &str,
    except: Option<CategoryId>,
) -> RepoResult<Option<CategoryId>> {
    Ok(conn
        .query_row(
            "SELECT id FROM categories WHERE name = ?1 AND (?2 IS NULL OR id <> ?2);",
            params![name, except],
            |row| row.get(0),
        )
        .optional()?)
}

fn classify_category_write_error(err: rusqlite::Error) -> RepoError {
    let name_clash = constraint_targets(&err)
        .iter()
        .any(|target| target == "categories.name");
    match classify_storage_error(err) {
        RepoError::DuplicateEntry(_) if name_clash => RepoError::duplicate(CATEGORY_NAME_TAKEN),
        other => other,
    }
}

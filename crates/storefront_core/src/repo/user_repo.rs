//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `users`, with company and products eagerly loaded on reads.
//!
//! # Invariants
//! - Deleting a user that still owns a company or products is refused
//!   (restrict-delete); nothing is cascaded.

use crate::model::user::{User, UserId, UserInput};
use crate::model::EntityKind;
use crate::repo::constraint::classify_storage_error;
use crate::repo::error::{RepoError, RepoResult, USER_HAS_DEPENDENTS};
use crate::repo::load::{load_company_for_owner, load_products_for_owner};
use crate::repo::schema::ensure_schema_ready;
use crate::repo::tx::{run_read, run_write};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for users.
pub trait UserRepository {
    fn create_user(&mut self, input: &UserInput) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<User>;
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Replaces `name` and `age`.
    fn update_user(&mut self, id: UserId, input: &UserInput) -> RepoResult<User>;
    /// Deletes the user and returns the last snapshot.
    fn delete_user(&mut self, id: UserId) -> RepoResult<User>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["users", "companies", "products"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&mut self, input: &UserInput) -> RepoResult<User> {
        run_write(
            self.conn,
            EntityKind::User,
            "create",
            classify_storage_error,
            |tx| {
                tx.execute(
                    "INSERT INTO users (name, age) VALUES (?1, ?2);",
                    params![input.name, input.age],
                )?;
                let id = tx.last_insert_rowid();
                Ok(read_user(tx, id)?
                    .ok_or(RepoError::InconsistentState("created user missing in read-back"))?)
            },
        )
    }

    fn get_user(&self, id: UserId) -> RepoResult<User> {
        run_read(self.conn, |conn| {
            read_user(conn, id)?.ok_or_else(|| RepoError::not_found(EntityKind::User, id))
        })
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        run_read(self.conn, |conn| {
            let mut stmt = conn.prepare("SELECT id, name, age FROM users ORDER BY id ASC;")?;
            let mut rows = stmt.query([])?;
            let mut users = Vec::new();
            while let Some(row) = rows.next()? {
                let id: UserId = row.get("id")?;
                users.push(User {
                    id,
                    name: row.get("name")?,
                    age: row.get("age")?,
                    company: load_company_for_owner(conn, id)?,
                    products: load_products_for_owner(conn, id)?,
                });
            }
            Ok(users)
        })
    }

    fn update_user(&mut self, id: UserId, input: &UserInput) -> RepoResult<User> {
        run_write(
            self.conn,
            EntityKind::User,
            "update",
            classify_storage_error,
            |tx| {
                let changed = tx.execute(
                    "UPDATE users SET name = ?2, age = ?3 WHERE id = ?1;",
                    params![id, input.name, input.age],
                )?;
                if changed == 0 {
                    return Err(RepoError::not_found(EntityKind::User, id).into());
                }
                Ok(read_user(tx, id)?
                    .ok_or(RepoError::InconsistentState("updated user missing in read-back"))?)
            },
        )
    }

    fn delete_user(&mut self, id: UserId) -> RepoResult<User> {
        run_write(
            self.conn,
            EntityKind::User,
            "delete",
            classify_user_delete_error,
            |tx| {
                let snapshot =
                    read_user(tx, id)?.ok_or(RepoError::not_found(EntityKind::User, id))?;
                if snapshot.company.is_some() || !snapshot.products.is_empty() {
                    return Err(RepoError::foreign_key(USER_HAS_DEPENDENTS).into());
                }
                tx.execute("DELETE FROM users WHERE id = ?1;", [id])?;
                Ok(snapshot)
            },
        )
    }
}

fn read_user(conn: &Connection, id: UserId) -> RepoResult<Option<User>> {
    let base = conn
        .query_row(
            "SELECT id, name, age FROM users WHERE id = ?1;",
            [id],
            |row| {
                Ok((
                    row.get::<_, String>("name")?,
                    row.get::<_, i64>("age")?,
                ))
            },
        )
        .optional()?;

    let Some((name, age)) = base else {
        return Ok(None);
    };
    Ok(Some(User {
        id,
        name,
        age,
        company: load_company_for_owner(conn, id)?,
        products: load_products_for_owner(conn, id)?,
    }))
}

// Dependents that appeared after the pre-check still hit the restrict FK.
fn classify_user_delete_error(err: rusqlite::Error) -> RepoError {
    match classify_storage_error(err) {
        RepoError::ForeignKeyViolation(_) => RepoError::foreign_key(USER_HAS_DEPENDENTS),
        other => other,
    }
}

//! Company repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `companies` with the owner summary eagerly loaded.
//! - Enforce one company per user and globally unique company names.
//!
//! # Invariants
//! - Ownership and name pre-checks run before any insert.
//! - The unique columns stay the final arbiter under races; their failures
//!   map back to the same messages as the pre-checks.
//! - A missing owner on create is reported as "User not found".

use crate::model::company::{Company, CompanyId, CompanyInput, CompanyUpdate};
use crate::model::EntityKind;
use crate::repo::constraint::{classify_storage_error, constraint_targets};
use crate::repo::error::{
    RepoError, RepoResult, COMPANY_NAME_TAKEN, USER_ALREADY_HAS_COMPANY, USER_NOT_FOUND,
};
use crate::repo::load::{load_company_for_owner, owner_from_row, row_exists};
use crate::repo::schema::ensure_schema_ready;
use crate::repo::tx::{run_read, run_write};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COMPANY_SELECT_SQL: &str = "SELECT
    c.id,
    c.name,
    u.id AS owner_id,
    u.name AS owner_name,
    u.age AS owner_age
FROM companies c
INNER JOIN users u ON u.id = c.owner_id";

/// Repository interface for companies.
pub trait CompanyRepository {
    fn create_company(&mut self, input: &CompanyInput) -> RepoResult<Company>;
    fn get_company(&self, id: CompanyId) -> RepoResult<Company>;
    fn list_companies(&self) -> RepoResult<Vec<Company>>;
    /// Replaces the company name. Ownership is immutable.
    fn update_company(&mut self, id: CompanyId, input: &CompanyUpdate) -> RepoResult<Company>;
    fn delete_company(&mut self, id: CompanyId) -> RepoResult<Company>;
}

/// SQLite-backed company repository.
pub struct SqliteCompanyRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCompanyRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["users", "companies"])?;
        Ok(Self { conn })
    }
}

impl CompanyRepository for SqliteCompanyRepository<'_> {
    fn create_company(&mut self, input: &CompanyInput) -> RepoResult<Company> {
        run_write(
            self.conn,
            EntityKind::Company,
            "create",
            classify_company_create_error,
            |tx| {
                if load_company_for_owner(tx, input.owner_id)?.is_some() {
                    return Err(RepoError::duplicate(USER_ALREADY_HAS_COMPANY).into());
                }
                if company_with_name(tx, &input.name, None)?.is_some() {
                    return Err(RepoError::duplicate(COMPANY_NAME_TAKEN).into());
                }

                tx.execute(
                    "INSERT INTO companies (name, owner_id) VALUES (?1, ?2);",
                    params![input.name, input.owner_id],
                )?;
                let id = tx.last_insert_rowid();
                Ok(read_company(tx, id)?.ok_or(RepoError::InconsistentState(
                    "created company missing in read-back",
                ))?)
            },
        )
    }

    fn get_company(&self, id: CompanyId) -> RepoResult<Company> {
        run_read(self.conn, |conn| {
            read_company(conn, id)?.ok_or_else(|| RepoError::not_found(EntityKind::Company, id))
        })
    }

    fn list_companies(&self) -> RepoResult<Vec<Company>> {
        run_read(self.conn, |conn| {
            let mut stmt = conn.prepare(&format!("{COMPANY_SELECT_SQL} ORDER BY c.id ASC;"))?;
            let mut rows = stmt.query([])?;
            let mut companies = Vec::new();
            while let Some(row) = rows.next()? {
                companies.push(parse_company_row(row)?);
            }
            Ok(companies)
        })
    }

    fn update_company(&mut self, id: CompanyId, input: &CompanyUpdate) -> RepoResult<Company> {
        run_write(
            self.conn,
            EntityKind::Company,
            "update",
            classify_company_update_error,
            |tx| {
                if !row_exists(tx, EntityKind::Company, id)? {
                    return Err(RepoError::not_found(EntityKind::Company, id).into());
                }
                if company_with_name(tx, &input.name, Some(id))?.is_some() {
                    return Err(RepoError::duplicate(COMPANY_NAME_TAKEN).into());
                }

                tx.execute(
                    "UPDATE companies SET name = ?2 WHERE id = ?1;",
                    params![id, input.name],
                )?;
                Ok(read_company(tx, id)?.ok_or(RepoError::InconsistentState(
                    "updated company missing in read-back",
                ))?)
            },
        )
    }

    fn delete_company(&mut self, id: CompanyId) -> RepoResult<Company> {
        run_write(
            self.conn,
            EntityKind::Company,
            "delete",
            classify_storage_error,
            |tx| {
                let snapshot = read_company(tx, id)?
                    .ok_or_else(|| RepoError::not_found(EntityKind::Company, id))?;
                tx.execute("DELETE FROM companies WHERE id = ?1;", [id])?;
                Ok(snapshot)
            },
        )
    }
}

fn read_company(conn: &Connection, id: CompanyId) -> RepoResult<Option<Company>> {
    Ok(conn
        .query_row(
            &format!("{COMPANY_SELECT_SQL} WHERE c.id = ?1;"),
            [id],
            parse_company_row,
        )
        .optional()?)
}

fn parse_company_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get("id")?,
        name: row.get("name")?,
        owner: owner_from_row(row)?,
    })
}

fn company_with_name(
    conn: &Connection,
    name: &str,
    except: Option<CompanyId>,
) -> RepoResult<Option<CompanyId>> {
    Ok(conn
        .query_row(
            "SELECT id FROM companies WHERE name = ?1 AND (?2 IS NULL OR id <> ?2);",
            params![name, except],
            |row| row.get(0),
        )
        .optional()?)
}

fn classify_company_create_error(err: rusqlite::Error) -> RepoError {
    match classify_company_update_error(err) {
        RepoError::ForeignKeyViolation(_) => RepoError::foreign_key(USER_NOT_FOUND),
        other => other,
    }
}

fn classify_company_update_error(err: rusqlite::Error) -> RepoError {
    let targets = constraint_targets(&err);
    let hits = |column: &str| targets.iter().any(|target| target == column);
    match classify_storage_error(err) {
        RepoError::DuplicateEntry(_) if hits("companies.owner_id") => {
            RepoError::duplicate(USER_ALREADY_HAS_COMPANY)
        }
        RepoError::DuplicateEntry(_) if hits("companies.name") => {
            RepoError::duplicate(COMPANY_NAME_TAKEN)
        }
        other => other,
    }
}

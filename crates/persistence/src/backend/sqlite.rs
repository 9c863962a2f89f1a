// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening the roster store and the raw-SQL pieces Diesel has no DSL for.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Journal mode for a freshly opened connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Journal {
    /// `SQLite`'s rollback journal. In-memory stores use this.
    Rollback,
    /// Write-ahead logging, so report reads do not block on writers.
    WriteAhead,
}

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

fn pragma(conn: &mut SqliteConnection, statement: &str) -> Result<(), PersistenceError> {
    diesel::sql_query(statement)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("{statement}: {e}")))?;
    Ok(())
}

/// Opens the store at `database_url`, enables foreign keys and brings the
/// schema up to date.
///
/// # Errors
///
/// Returns an error if the connection cannot be established, foreign keys
/// cannot be enforced, or a migration fails.
pub fn open(database_url: &str, journal: Journal) -> Result<SqliteConnection, PersistenceError> {
    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(format!("{database_url}: {e}")))?;

    pragma(&mut conn, "PRAGMA foreign_keys = ON")?;
    if journal == Journal::WriteAhead {
        pragma(&mut conn, "PRAGMA journal_mode = WAL")?;
    }
    verify_foreign_keys(&mut conn)?;

    let applied: usize = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?
        .len();

    info!(database_url, ?journal, migrations_applied = applied, "Roster store opened");
    Ok(conn)
}

/// Fails unless the connection enforces foreign keys. Withdrawing a bid
/// relies on the cascade to its options and allocation.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` if enforcement is off.
pub fn verify_foreign_keys(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysPragma = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    debug!("Foreign key enforcement verified");
    Ok(())
}

/// Id of the row most recently inserted on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

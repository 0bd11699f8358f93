pub mod schema;
pub mod writer;
pub mod query;

use anyhow::Result;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

pub fn open_or_create<P: AsRef<Path>>(db_path: P) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    schema::apply_pragmas(&conn)?;
    schema::apply_schema(&conn)?;
    Ok(conn)
}

/// Build a connection pool over `db_path`. The schema is applied once up
/// front; every pooled connection gets the pragmas.
pub fn create_pool<P: AsRef<Path>>(db_path: P, max_size: u32) -> Result<DbPool> {
    open_or_create(db_path.as_ref())?;
    let manager = SqliteConnectionManager::file(db_path.as_ref())
        .with_init(|c| schema::apply_pragmas(c));
    let pool = r2d2::Pool::builder().max_size(max_size).build(manager)?;
    Ok(pool)
}

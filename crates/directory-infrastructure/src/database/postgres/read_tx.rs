//! Read-only transaction scope shared by every repository query.
//!
//! Dropping the returned transaction (error path or cancelled request)
//! rolls it back and hands the connection back to the pool.

use std::time::Duration;

use directory_core::error::DomainError;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::error;

pub(crate) async fn begin_read_only(
    pool: &PgPool,
    statement_timeout: Duration,
) -> Result<Transaction<'static, Postgres>, DomainError> {
    let mut tx = pool.begin().await.map_err(db_error("beginning transaction"))?;

    sqlx::query("SET TRANSACTION READ ONLY")
        .execute(&mut *tx)
        .await
        .map_err(db_error("setting transaction read only"))?;

    // is_local = true scopes the timeout to this transaction
    sqlx::query("SELECT set_config('statement_timeout', $1, true)")
        .bind(statement_timeout.as_millis().to_string())
        .execute(&mut *tx)
        .await
        .map_err(db_error("setting statement timeout"))?;

    Ok(tx)
}

/// Read transactions carry no changes; committing only releases them early.
pub(crate) async fn finish(tx: Transaction<'static, Postgres>) -> Result<(), DomainError> {
    tx.commit().await.map_err(db_error("committing transaction"))
}

pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e: sqlx::Error| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}

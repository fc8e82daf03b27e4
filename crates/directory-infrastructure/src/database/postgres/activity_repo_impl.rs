// ============================================================================
// Directory Infrastructure - PostgreSQL Activity Repository
// File: crates/directory-infrastructure/src/database/postgres/activity_repo_impl.rs
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use directory_core::domain::Activity;
use directory_core::error::DomainError;
use directory_core::repositories::ActivityRepository;
use directory_core::taxonomy::depth_allows_child;

use super::read_tx::{begin_read_only, db_error, finish};
use super::rows::{ActivityRow, SUBTREE_CTE};

/// Nodes from `$1` up to its root, both inclusive. Zero when `$1` is unknown.
const ANCESTOR_CHAIN_SQL: &str = r#"
    WITH RECURSIVE ancestors (id, parent_id) AS (
        SELECT id, parent_id FROM activities WHERE id = $1
        UNION
        SELECT a.id, a.parent_id
        FROM activities a
        JOIN ancestors c ON a.id = c.parent_id
    )
    SELECT COUNT(*) FROM ancestors
"#;

/// Depth check usable inside any open transaction, including write paths.
pub(crate) async fn depth_is_valid_in(
    conn: &mut PgConnection,
    parent_id: Option<i32>,
) -> Result<bool, DomainError> {
    let Some(parent_id) = parent_id else {
        return Ok(true);
    };

    let chain_len: i64 = sqlx::query_scalar(ANCESTOR_CHAIN_SQL)
        .bind(parent_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_error("counting activity ancestors"))?;

    if chain_len == 0 {
        return Err(DomainError::ActivityNotFound(parent_id));
    }

    debug!("Activity {} sits at depth {}", parent_id, chain_len);
    Ok(depth_allows_child(chain_len as usize))
}

pub struct PgActivityRepository {
    pool: PgPool,
    statement_timeout: Duration,
}

impl PgActivityRepository {
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    async fn list(&self) -> Result<Vec<Activity>, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;

        let rows: Vec<ActivityRow> =
            sqlx::query_as("SELECT id, name, parent_id FROM activities ORDER BY id")
                .fetch_all(&mut *tx)
                .await
                .map_err(db_error("listing activities"))?;

        finish(tx).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn subtree_ids(&self, root_id: i32) -> Result<Vec<i32>, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;

        let sql = format!("{} SELECT id FROM subtree ORDER BY id", SUBTREE_CTE);
        let ids: Vec<i32> = sqlx::query_scalar(&sql)
            .bind(root_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("expanding activity subtree"))?;

        finish(tx).await?;
        Ok(ids)
    }

    async fn depth_is_valid(&self, parent_id: Option<i32>) -> Result<bool, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;
        let valid = depth_is_valid_in(&mut *tx, parent_id).await?;
        finish(tx).await?;
        Ok(valid)
    }
}

// ============================================================================
// Directory Infrastructure - PostgreSQL Building Repository
// File: crates/directory-infrastructure/src/database/postgres/building_repo_impl.rs
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use directory_core::domain::Building;
use directory_core::error::DomainError;
use directory_core::geo::{BoundingBox, RadiusQuery, EARTH_RADIUS_KM};
use directory_core::repositories::BuildingRepository;

use super::read_tx::{begin_read_only, db_error, finish};
use super::rows::{BuildingRow, WITHIN_BBOX_SQL, WITHIN_RADIUS_SQL};

const SELECT_BUILDINGS: &str = "SELECT b.id, b.address, b.latitude, b.longitude FROM buildings b";

pub struct PgBuildingRepository {
    pool: PgPool,
    statement_timeout: Duration,
}

impl PgBuildingRepository {
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }
}

#[async_trait]
impl BuildingRepository for PgBuildingRepository {
    async fn list(&self) -> Result<Vec<Building>, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;

        let sql = format!("{} ORDER BY b.id", SELECT_BUILDINGS);
        let rows: Vec<BuildingRow> = sqlx::query_as(&sql)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("listing buildings"))?;

        finish(tx).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_within_radius(&self, query: &RadiusQuery) -> Result<Vec<Building>, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;

        let sql = format!("{} WHERE {} ORDER BY b.id", SELECT_BUILDINGS, WITHIN_RADIUS_SQL);
        let rows: Vec<BuildingRow> = sqlx::query_as(&sql)
            .bind(query.center.latitude)
            .bind(query.center.longitude)
            .bind(query.radius_km)
            .bind(EARTH_RADIUS_KM)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("searching buildings by radius"))?;

        finish(tx).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_within_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Building>, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;

        let sql = format!("{} WHERE {} ORDER BY b.id", SELECT_BUILDINGS, WITHIN_BBOX_SQL);
        let rows: Vec<BuildingRow> = sqlx::query_as(&sql)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lon)
            .bind(bbox.max_lon)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("searching buildings by bounding box"))?;

        finish(tx).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

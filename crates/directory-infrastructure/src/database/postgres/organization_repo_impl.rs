// ============================================================================
// Directory Infrastructure - PostgreSQL Organization Repository
// File: crates/directory-infrastructure/src/database/postgres/organization_repo_impl.rs
// Description: Organization queries plus batch hydration of building,
//              activities and phones
// ============================================================================

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, error};

use directory_core::domain::{Activity, Building, Organization, Phone};
use directory_core::error::DomainError;
use directory_core::geo::{BoundingBox, RadiusQuery, EARTH_RADIUS_KM};
use directory_core::repositories::OrganizationRepository;

use super::read_tx::{begin_read_only, db_error, finish};
use super::rows::{
    BuildingRow, LinkedActivityRow, OrganizationRow, PhoneRow, SUBTREE_CTE, WITHIN_BBOX_SQL,
    WITHIN_RADIUS_SQL,
};

const SELECT_ORGANIZATIONS: &str = "SELECT o.id, o.name, o.building_id FROM organizations o";

const SELECT_ORGANIZATIONS_IN_BUILDINGS: &str = r#"
    SELECT o.id, o.name, o.building_id
    FROM organizations o
    JOIN buildings b ON b.id = o.building_id
"#;

/// Escapes `%`, `_` and `\` so the query is matched as a literal substring
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Loads building, activities and phones for `rows` with one query per
/// relation and assembles the read models in the order of `rows`.
async fn hydrate(
    conn: &mut PgConnection,
    rows: Vec<OrganizationRow>,
) -> Result<Vec<Organization>, DomainError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let organization_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let building_ids: Vec<i32> = rows
        .iter()
        .map(|r| r.building_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let buildings: HashMap<i32, Building> = sqlx::query_as::<_, BuildingRow>(
        "SELECT id, address, latitude, longitude FROM buildings WHERE id = ANY($1)",
    )
    .bind(&building_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error("loading organization buildings"))?
    .into_iter()
    .map(|row| (row.id, Building::from(row)))
    .collect();

    let mut activities: HashMap<i32, Vec<Activity>> = HashMap::new();
    let activity_rows: Vec<LinkedActivityRow> = sqlx::query_as(
        r#"
        SELECT oa.organization_id, a.id, a.name, a.parent_id
        FROM organization_activity oa
        JOIN activities a ON a.id = oa.activity_id
        WHERE oa.organization_id = ANY($1)
        ORDER BY oa.organization_id, a.id
        "#,
    )
    .bind(&organization_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error("loading organization activities"))?;
    for row in activity_rows {
        activities
            .entry(row.organization_id)
            .or_default()
            .push(row.into());
    }

    let mut phones: HashMap<i32, Vec<Phone>> = HashMap::new();
    let phone_rows: Vec<PhoneRow> = sqlx::query_as(
        r#"
        SELECT organization_id, id, number
        FROM organization_phones
        WHERE organization_id = ANY($1)
        ORDER BY organization_id, id
        "#,
    )
    .bind(&organization_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error("loading organization phones"))?;
    for row in phone_rows {
        phones.entry(row.organization_id).or_default().push(row.into());
    }

    debug!(
        "Hydrated {} organizations across {} buildings",
        rows.len(),
        buildings.len()
    );

    rows.into_iter()
        .map(|row| {
            let building = buildings.get(&row.building_id).cloned().ok_or_else(|| {
                error!(
                    "Organization {} references missing building {}",
                    row.id, row.building_id
                );
                DomainError::BuildingNotFound(row.building_id)
            })?;

            Ok(Organization {
                id: row.id,
                name: row.name,
                building_id: row.building_id,
                building,
                activities: activities.remove(&row.id).unwrap_or_default(),
                phones: phones.remove(&row.id).unwrap_or_default(),
            })
        })
        .collect()
}

pub struct PgOrganizationRepository {
    pool: PgPool,
    statement_timeout: Duration,
}

impl PgOrganizationRepository {
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }
}

#[async_trait]
impl OrganizationRepository for PgOrganizationRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Organization>, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;

        let sql = format!("{} WHERE o.id = $1", SELECT_ORGANIZATIONS);
        let row: Option<OrganizationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("finding organization by id"))?;

        let organization = hydrate(&mut *tx, row.into_iter().collect()).await?.pop();

        finish(tx).await?;
        Ok(organization)
    }

    async fn find_by_building(&self, building_id: i32) -> Result<Vec<Organization>, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;

        let sql = format!("{} WHERE o.building_id = $1 ORDER BY o.id", SELECT_ORGANIZATIONS);
        let rows: Vec<OrganizationRow> = sqlx::query_as(&sql)
            .bind(building_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("finding organizations by building"))?;

        let organizations = hydrate(&mut *tx, rows).await?;

        finish(tx).await?;
        Ok(organizations)
    }

    async fn find_by_activity_subtree(
        &self,
        root_id: i32,
    ) -> Result<Option<Vec<Organization>>, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM activities WHERE id = $1)")
                .bind(root_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error("checking activity"))?;
        if !exists {
            finish(tx).await?;
            return Ok(None);
        }

        let sql = format!(
            r#"{}
            SELECT DISTINCT o.id, o.name, o.building_id
            FROM organizations o
            JOIN organization_activity oa ON oa.organization_id = o.id
            JOIN subtree s ON s.id = oa.activity_id
            ORDER BY o.id
            "#,
            SUBTREE_CTE
        );
        let rows: Vec<OrganizationRow> = sqlx::query_as(&sql)
            .bind(root_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("finding organizations by activity subtree"))?;

        let organizations = hydrate(&mut *tx, rows).await?;

        finish(tx).await?;
        Ok(Some(organizations))
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Organization>, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;

        let sql = format!(
            r#"{} WHERE o.name ILIKE $1 ESCAPE '\' ORDER BY o.id"#,
            SELECT_ORGANIZATIONS
        );
        let rows: Vec<OrganizationRow> = sqlx::query_as(&sql)
            .bind(like_pattern(query))
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("searching organizations by name"))?;

        let organizations = hydrate(&mut *tx, rows).await?;

        finish(tx).await?;
        Ok(organizations)
    }

    async fn find_within_radius(&self, query: &RadiusQuery) -> Result<Vec<Organization>, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;

        let sql = format!(
            "{} WHERE {} ORDER BY o.id",
            SELECT_ORGANIZATIONS_IN_BUILDINGS, WITHIN_RADIUS_SQL
        );
        let rows: Vec<OrganizationRow> = sqlx::query_as(&sql)
            .bind(query.center.latitude)
            .bind(query.center.longitude)
            .bind(query.radius_km)
            .bind(EARTH_RADIUS_KM)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("searching organizations by radius"))?;

        let organizations = hydrate(&mut *tx, rows).await?;

        finish(tx).await?;
        Ok(organizations)
    }

    async fn find_within_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Organization>, DomainError> {
        let mut tx = begin_read_only(&self.pool, self.statement_timeout).await?;

        let sql = format!(
            "{} WHERE {} ORDER BY o.id",
            SELECT_ORGANIZATIONS_IN_BUILDINGS, WITHIN_BBOX_SQL
        );
        let rows: Vec<OrganizationRow> = sqlx::query_as(&sql)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lon)
            .bind(bbox.max_lon)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("searching organizations by bounding box"))?;

        let organizations = hydrate(&mut *tx, rows).await?;

        finish(tx).await?;
        Ok(organizations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_query() {
        assert_eq!(like_pattern("dairy"), "%dairy%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%"), r"%100\%%");
        assert_eq!(like_pattern("a_b"), r"%a\_b%");
        assert_eq!(like_pattern(r"c:\x"), r"%c:\\x%");
    }
}

//! Internal row types for SQLx mapping

use directory_core::domain::{Activity, Building, Phone};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub(crate) struct ActivityRow {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        Activity {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct BuildingRow {
    pub id: i32,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<BuildingRow> for Building {
    fn from(row: BuildingRow) -> Self {
        Building {
            id: row.id,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrganizationRow {
    pub id: i32,
    pub name: String,
    pub building_id: i32,
}

/// Activity joined through `organization_activity`
#[derive(Debug, FromRow)]
pub(crate) struct LinkedActivityRow {
    pub organization_id: i32,
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

impl From<LinkedActivityRow> for Activity {
    fn from(row: LinkedActivityRow) -> Self {
        Activity {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PhoneRow {
    pub organization_id: i32,
    pub id: i32,
    pub number: String,
}

impl From<PhoneRow> for Phone {
    fn from(row: PhoneRow) -> Self {
        Phone {
            id: row.id,
            number: row.number,
        }
    }
}

/// Great-circle distance from ($1, $2) to the row aliased `b`, compared
/// against $3 kilometres, with the Earth radius bound as $4. The acos
/// argument is clamped to [-1, 1]. A building exactly at the center is at
/// distance 0 even where the cosine rounds just below 1.
pub(crate) const WITHIN_RADIUS_SQL: &str = r#"
    (
        (b.latitude = $1 AND b.longitude = $2)
        OR $4 * acos(LEAST(1.0, GREATEST(-1.0,
            cos(radians($1)) * cos(radians(b.latitude)) * cos(radians(b.longitude) - radians($2))
            + sin(radians($1)) * sin(radians(b.latitude))
        ))) <= $3
    )
"#;

/// `subtree (id)`: `$1` and every descendant. `UNION` (not `UNION ALL`)
/// stops cycles. Empty when `$1` is unknown.
pub(crate) const SUBTREE_CTE: &str = r#"
    WITH RECURSIVE subtree (id) AS (
        SELECT id FROM activities WHERE id = $1
        UNION
        SELECT a.id
        FROM activities a
        JOIN subtree s ON a.parent_id = s.id
    )
"#;

/// Inclusive box over the row aliased `b`: lat in [$1, $2], lon in [$3, $4]
pub(crate) const WITHIN_BBOX_SQL: &str = r#"
    b.latitude BETWEEN $1 AND $2
    AND b.longitude BETWEEN $3 AND $4
"#;

// ============================================================================
// Directory Infrastructure - Demo Seed
// File: crates/directory-infrastructure/src/seed.rs
// Description: Populates an empty database with a small demo directory
// ============================================================================

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

use directory_core::domain::MAX_ACTIVITY_DEPTH;
use directory_core::error::DomainError;

use crate::database::postgres::activity_repo_impl::depth_is_valid_in;
use crate::database::postgres::read_tx::db_error;

/// (name, parent name). Parents come before their children.
const SEED_ACTIVITIES: &[(&str, Option<&str>)] = &[
    ("Food", None),
    ("Cars", None),
    ("Meat products", Some("Food")),
    ("Dairy products", Some("Food")),
    ("Spare parts", Some("Cars")),
    ("Beef", Some("Meat products")),
    ("Tyres", Some("Spare parts")),
];

/// (address, latitude, longitude), central Moscow
const SEED_BUILDINGS: &[(&str, f64, f64)] = &[
    ("Moscow, Lenina St 1", 55.7558, 37.6173),
    ("Moscow, Pushkina St 2", 55.751244, 37.618423),
];

struct SeedOrganization {
    name: &'static str,
    building: usize,
    activities: &'static [&'static str],
    phones: &'static [&'static str],
}

const SEED_ORGANIZATIONS: &[SeedOrganization] = &[
    SeedOrganization {
        name: "Horns and Hooves LLC",
        building: 0,
        activities: &["Meat products", "Beef"],
        phones: &["8-800-555-35-35", "2-22-33"],
    },
    SeedOrganization {
        name: "Dairy World",
        building: 1,
        activities: &["Dairy products"],
        phones: &[],
    },
    SeedOrganization {
        name: "Ashot's Tyre Service",
        building: 0,
        activities: &["Tyres"],
        phones: &[],
    },
];

/// Inserts the demo directory when the activity table is empty.
/// Returns whether anything was written.
pub async fn seed_if_empty(pool: &PgPool) -> Result<bool, DomainError> {
    let mut tx = pool.begin().await.map_err(db_error("beginning seed transaction"))?;

    let populated: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM activities)")
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("checking for existing activities"))?;

    if populated {
        debug!("Activities already present, skipping seed");
        return Ok(false);
    }

    let mut activity_ids: HashMap<&str, i32> = HashMap::new();
    for (name, parent) in SEED_ACTIVITIES {
        let parent_id = parent.map(|p| activity_ids[p]);
        let id = insert_activity(&mut *tx, name, parent_id).await?;
        activity_ids.insert(*name, id);
    }

    let mut building_ids = Vec::with_capacity(SEED_BUILDINGS.len());
    for (address, latitude, longitude) in SEED_BUILDINGS {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO buildings (address, latitude, longitude) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(*address)
        .bind(*latitude)
        .bind(*longitude)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("inserting building"))?;
        building_ids.push(id);
    }

    for organization in SEED_ORGANIZATIONS {
        let organization_id: i32 = sqlx::query_scalar(
            "INSERT INTO organizations (name, building_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(organization.name)
        .bind(building_ids[organization.building])
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("inserting organization"))?;

        for activity in organization.activities {
            sqlx::query(
                "INSERT INTO organization_activity (organization_id, activity_id) VALUES ($1, $2)",
            )
            .bind(organization_id)
            .bind(activity_ids[*activity])
            .execute(&mut *tx)
            .await
            .map_err(db_error("linking organization activity"))?;
        }

        for number in organization.phones {
            sqlx::query("INSERT INTO organization_phones (number, organization_id) VALUES ($1, $2)")
                .bind(*number)
                .bind(organization_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("inserting phone"))?;
        }
    }

    tx.commit().await.map_err(db_error("committing seed"))?;

    info!(
        "Seeded {} activities, {} buildings, {} organizations",
        SEED_ACTIVITIES.len(),
        SEED_BUILDINGS.len(),
        SEED_ORGANIZATIONS.len()
    );
    Ok(true)
}

/// Inserts one activity after checking the taxonomy depth limit
async fn insert_activity(
    conn: &mut PgConnection,
    name: &str,
    parent_id: Option<i32>,
) -> Result<i32, DomainError> {
    if !depth_is_valid_in(&mut *conn, parent_id).await? {
        return Err(DomainError::InvalidDepth {
            parent_id: parent_id.unwrap_or_default(),
            max_depth: MAX_ACTIVITY_DEPTH,
        });
    }

    sqlx::query_scalar("INSERT INTO activities (name, parent_id) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(parent_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_error("inserting activity"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory_core::domain::Activity;
    use directory_core::taxonomy::ActivityForest;

    fn seed_forest() -> ActivityForest {
        let mut ids: HashMap<&str, i32> = HashMap::new();
        let mut forest = ActivityForest::default();
        for (index, (name, parent)) in SEED_ACTIVITIES.iter().enumerate() {
            let id = index as i32 + 1;
            let parent_id = parent.map(|p| ids[p]);
            assert!(
                forest.depth_is_valid(parent_id).unwrap(),
                "{} would exceed the depth limit",
                name
            );
            forest.insert(Activity {
                id,
                name: name.to_string(),
                parent_id,
            });
            ids.insert(*name, id);
        }
        forest
    }

    #[test]
    fn test_seed_taxonomy_respects_depth_limit() {
        let forest = seed_forest();
        assert_eq!(forest.len(), SEED_ACTIVITIES.len());
        assert_eq!(forest.trees().len(), 2);
    }

    #[test]
    fn test_seed_names_are_unique() {
        let mut names: Vec<&str> = SEED_ACTIVITIES.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SEED_ACTIVITIES.len());
    }

    #[test]
    fn test_seed_organizations_reference_known_rows() {
        for organization in SEED_ORGANIZATIONS {
            assert!(organization.building < SEED_BUILDINGS.len());
            for activity in organization.activities {
                assert!(
                    SEED_ACTIVITIES.iter().any(|(name, _)| name == activity),
                    "unknown activity {}",
                    activity
                );
            }
        }
    }

    #[test]
    fn test_seed_buildings_have_valid_coordinates() {
        for (_, latitude, longitude) in SEED_BUILDINGS {
            assert!((-90.0..=90.0).contains(latitude));
            assert!((-180.0..=180.0).contains(longitude));
        }
    }
}

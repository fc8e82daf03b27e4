// ============================================================================
// Directory Core - In-Memory Store
// File: crates/directory-core/src/store/memory.rs
// Description: Repository implementations over process memory
// ============================================================================

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};
use validator::Validate;

use crate::domain::{
    Activity, Building, NewActivity, NewBuilding, NewOrganization, Organization, Phone,
};
use crate::error::DomainError;
use crate::geo::{BoundingBox, RadiusQuery};
use crate::repositories::{ActivityRepository, BuildingRepository, OrganizationRepository};
use crate::taxonomy::ActivityForest;

#[derive(Debug, Clone)]
struct OrganizationRecord {
    id: i32,
    name: String,
    building_id: i32,
    activity_ids: BTreeSet<i32>,
    phones: Vec<Phone>,
}

#[derive(Debug, Default)]
struct MemoryState {
    activities: ActivityForest,
    buildings: BTreeMap<i32, Building>,
    organizations: BTreeMap<i32, OrganizationRecord>,
    last_activity_id: i32,
    last_building_id: i32,
    last_organization_id: i32,
    last_phone_id: i32,
}

impl MemoryState {
    fn hydrate(&self, record: &OrganizationRecord) -> Option<Organization> {
        let building = self.buildings.get(&record.building_id)?.clone();
        let activities = record
            .activity_ids
            .iter()
            .filter_map(|id| self.activities.get(*id).cloned())
            .collect();

        Some(Organization {
            id: record.id,
            name: record.name.clone(),
            building_id: record.building_id,
            building,
            activities,
            phones: record.phones.clone(),
        })
    }

    fn organizations_where<F>(&self, predicate: F) -> Vec<Organization>
    where
        F: Fn(&OrganizationRecord) -> bool,
    {
        self.organizations
            .values()
            .filter(|record| predicate(record))
            .filter_map(|record| self.hydrate(record))
            .collect()
    }

    fn building_matches<F>(&self, building_id: i32, predicate: F) -> bool
    where
        F: Fn(&Building) -> bool,
    {
        self.buildings.get(&building_id).is_some_and(predicate)
    }
}

/// Directory held entirely in memory.
///
/// Writes enforce the same rules the database schema and seed path do:
/// unique activity names, the taxonomy depth limit, and existing
/// buildings/activities for organizations.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    state: RwLock<MemoryState>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_building(&self, building: NewBuilding) -> Result<Building, DomainError> {
        building.validate()?;

        let mut state = self.state.write();
        state.last_building_id += 1;
        let building = Building {
            id: state.last_building_id,
            address: building.address,
            latitude: building.latitude,
            longitude: building.longitude,
        };
        state.buildings.insert(building.id, building.clone());

        debug!("Inserted building {} ({})", building.id, building.address);
        Ok(building)
    }

    pub fn insert_activity(&self, activity: NewActivity) -> Result<Activity, DomainError> {
        activity.validate()?;

        let mut state = self.state.write();
        if state.activities.iter().any(|existing| existing.name == activity.name) {
            return Err(DomainError::ActivityNameAlreadyExists(activity.name));
        }

        state.activities.ensure_depth(activity.parent_id)?;

        state.last_activity_id += 1;
        let activity = Activity {
            id: state.last_activity_id,
            name: activity.name,
            parent_id: activity.parent_id,
        };
        state.activities.insert(activity.clone());

        debug!("Inserted activity {} ({})", activity.id, activity.name);
        Ok(activity)
    }

    pub fn insert_organization(
        &self,
        organization: NewOrganization,
    ) -> Result<Organization, DomainError> {
        organization.validate()?;

        let mut state = self.state.write();
        if !state.buildings.contains_key(&organization.building_id) {
            return Err(DomainError::BuildingNotFound(organization.building_id));
        }
        if let Some(missing) = organization
            .activity_ids
            .iter()
            .find(|id| !state.activities.contains(**id))
        {
            return Err(DomainError::ActivityNotFound(*missing));
        }

        let mut phones = Vec::with_capacity(organization.phones.len());
        for number in organization.phones {
            state.last_phone_id += 1;
            phones.push(Phone {
                id: state.last_phone_id,
                number,
            });
        }

        state.last_organization_id += 1;
        let record = OrganizationRecord {
            id: state.last_organization_id,
            name: organization.name,
            building_id: organization.building_id,
            activity_ids: organization.activity_ids.into_iter().collect(),
            phones,
        };
        state.organizations.insert(record.id, record.clone());

        info!("Inserted organization {} ({})", record.id, record.name);
        state
            .hydrate(&record)
            .ok_or(DomainError::BuildingNotFound(record.building_id))
    }

    /// Removes an organization together with its phones
    pub fn delete_organization(&self, id: i32) -> Result<(), DomainError> {
        self.state
            .write()
            .organizations
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::OrganizationNotFound(id))
    }
}

#[async_trait]
impl ActivityRepository for MemoryDirectory {
    async fn list(&self) -> Result<Vec<Activity>, DomainError> {
        Ok(self.state.read().activities.iter().cloned().collect())
    }

    async fn subtree_ids(&self, root_id: i32) -> Result<Vec<i32>, DomainError> {
        Ok(self
            .state
            .read()
            .activities
            .subtree_ids(root_id)
            .into_iter()
            .collect())
    }

    async fn depth_is_valid(&self, parent_id: Option<i32>) -> Result<bool, DomainError> {
        self.state.read().activities.depth_is_valid(parent_id)
    }
}

#[async_trait]
impl BuildingRepository for MemoryDirectory {
    async fn list(&self) -> Result<Vec<Building>, DomainError> {
        Ok(self.state.read().buildings.values().cloned().collect())
    }

    async fn find_within_radius(&self, query: &RadiusQuery) -> Result<Vec<Building>, DomainError> {
        Ok(self
            .state
            .read()
            .buildings
            .values()
            .filter(|b| query.contains(&b.location()))
            .cloned()
            .collect())
    }

    async fn find_within_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Building>, DomainError> {
        Ok(self
            .state
            .read()
            .buildings
            .values()
            .filter(|b| bbox.contains(&b.location()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrganizationRepository for MemoryDirectory {
    async fn find_by_id(&self, id: i32) -> Result<Option<Organization>, DomainError> {
        let state = self.state.read();
        Ok(state.organizations.get(&id).and_then(|r| state.hydrate(r)))
    }

    async fn find_by_building(&self, building_id: i32) -> Result<Vec<Organization>, DomainError> {
        Ok(self
            .state
            .read()
            .organizations_where(|r| r.building_id == building_id))
    }

    async fn find_by_activity_subtree(
        &self,
        root_id: i32,
    ) -> Result<Option<Vec<Organization>>, DomainError> {
        let state = self.state.read();
        let subtree = state.activities.subtree_ids(root_id);
        if subtree.is_empty() {
            return Ok(None);
        }

        Ok(Some(state.organizations_where(|r| {
            !r.activity_ids.is_disjoint(&subtree)
        })))
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Organization>, DomainError> {
        let needle = query.to_lowercase();
        Ok(self
            .state
            .read()
            .organizations_where(|r| r.name.to_lowercase().contains(&needle)))
    }

    async fn find_within_radius(&self, query: &RadiusQuery) -> Result<Vec<Organization>, DomainError> {
        let state = self.state.read();
        Ok(state.organizations_where(|r| {
            state.building_matches(r.building_id, |b| query.contains(&b.location()))
        }))
    }

    async fn find_within_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Organization>, DomainError> {
        let state = self.state.read();
        Ok(state.organizations_where(|r| {
            state.building_matches(r.building_id, |b| bbox.contains(&b.location()))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_ACTIVITY_DEPTH;
    use crate::geo::GeoPoint;

    const CENTER: (f64, f64) = (55.7558, 37.6173);

    fn chain(store: &MemoryDirectory) -> (Activity, Activity, Activity) {
        let root = store.insert_activity(NewActivity::root("Root")).unwrap();
        let child = store.insert_activity(NewActivity::child("Child", root.id)).unwrap();
        let grandchild = store
            .insert_activity(NewActivity::child("Grandchild", child.id))
            .unwrap();
        (root, child, grandchild)
    }

    #[tokio::test]
    async fn test_deep_nesting_search_from_root() {
        let store = MemoryDirectory::new();
        let (root, _child, grandchild) = chain(&store);
        let building = store.insert_building(NewBuilding::new("Test St", 0.0, 0.0).unwrap()).unwrap();
        store
            .insert_organization(
                NewOrganization::new("Deep Org", building.id).with_activities([grandchild.id]),
            )
            .unwrap();

        let found = store
            .find_by_activity_subtree(root.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Deep Org");
        assert_eq!(found[0].activities[0].name, "Grandchild");
    }

    #[tokio::test]
    async fn test_fourth_level_rejected() {
        let store = MemoryDirectory::new();
        let (_root, child, grandchild) = chain(&store);

        assert_eq!(store.depth_is_valid(Some(grandchild.id)).await, Ok(false));
        assert_eq!(store.depth_is_valid(Some(child.id)).await, Ok(true));
        assert_eq!(
            store.insert_activity(NewActivity::child("Too Deep", grandchild.id)),
            Err(DomainError::InvalidDepth {
                parent_id: grandchild.id,
                max_depth: MAX_ACTIVITY_DEPTH
            })
        );
    }

    #[tokio::test]
    async fn test_duplicate_activity_name_rejected() {
        let store = MemoryDirectory::new();
        store.insert_activity(NewActivity::root("Food")).unwrap();
        assert!(matches!(
            store.insert_activity(NewActivity::root("Food")),
            Err(DomainError::ActivityNameAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_organization_linked_twice_is_returned_once() {
        let store = MemoryDirectory::new();
        let (root, child, grandchild) = chain(&store);
        let building = store.insert_building(NewBuilding::new("Test St", 0.0, 0.0).unwrap()).unwrap();
        store
            .insert_organization(
                NewOrganization::new("Twice", building.id).with_activities([child.id, grandchild.id]),
            )
            .unwrap();

        let found = store.find_by_activity_subtree(root.id).await.unwrap();
        assert_eq!(found.map(|orgs| orgs.len()), Some(1));
    }

    #[tokio::test]
    async fn test_subtree_search_on_missing_root() {
        let store = MemoryDirectory::new();
        chain(&store);

        assert_eq!(store.find_by_activity_subtree(404).await, Ok(None));
    }

    #[tokio::test]
    async fn test_subtree_ids_from_root_and_leaf() {
        let store = MemoryDirectory::new();
        let (root, child, grandchild) = chain(&store);

        assert_eq!(
            store.subtree_ids(root.id).await,
            Ok(vec![root.id, child.id, grandchild.id])
        );
        assert_eq!(store.subtree_ids(grandchild.id).await, Ok(vec![grandchild.id]));
    }

    #[tokio::test]
    async fn test_radius_search() {
        let store = MemoryDirectory::new();
        let near = store
            .insert_building(NewBuilding::new("Near", CENTER.0 + 0.0005, CENTER.1).unwrap())
            .unwrap();
        let far = store
            .insert_building(NewBuilding::new("Far", CENTER.0 + 0.05, CENTER.1).unwrap())
            .unwrap();
        store.insert_organization(NewOrganization::new("Near Org", near.id)).unwrap();
        store.insert_organization(NewOrganization::new("Far Org", far.id)).unwrap();

        let center = GeoPoint::new(CENTER.0, CENTER.1).unwrap();
        let query = RadiusQuery::new(center, 1.0).unwrap();

        let orgs = OrganizationRepository::find_within_radius(&store, &query).await.unwrap();
        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs[0].name, "Near Org");

        let buildings = BuildingRepository::find_within_radius(&store, &query).await.unwrap();
        assert_eq!(buildings, vec![near]);
    }

    #[tokio::test]
    async fn test_bbox_search_on_exact_boundary() {
        let store = MemoryDirectory::new();
        let corner = store.insert_building(NewBuilding::new("Corner", 55.0, 37.0).unwrap()).unwrap();
        store.insert_organization(NewOrganization::new("Corner Org", corner.id)).unwrap();

        let bbox = BoundingBox::new(55.0, 56.0, 37.0, 38.0).unwrap();
        assert_eq!(OrganizationRepository::find_within_bbox(&store, &bbox).await.unwrap().len(), 1);
        assert_eq!(BuildingRepository::find_within_bbox(&store, &bbox).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_name_search_is_case_insensitive() {
        let store = MemoryDirectory::new();
        assert!(store.search_by_name("anything").await.unwrap().is_empty());

        let building = store.insert_building(NewBuilding::new("Test St", 0.0, 0.0).unwrap()).unwrap();
        store
            .insert_organization(NewOrganization::new("Dairy World", building.id).with_phones(["2-22-33"]))
            .unwrap();

        let found = store.search_by_name("dAIRY").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].phones[0].number, "2-22-33");
        assert_eq!(store.search_by_name("").await.unwrap().len(), 1);
        assert!(store.search_by_name("meat").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_organization_requires_building() {
        let store = MemoryDirectory::new();
        assert_eq!(
            store.insert_organization(NewOrganization::new("Homeless", 5)),
            Err(DomainError::BuildingNotFound(5))
        );
    }

    #[tokio::test]
    async fn test_delete_organization_drops_phones() {
        let store = MemoryDirectory::new();
        let building = store.insert_building(NewBuilding::new("Test St", 0.0, 0.0).unwrap()).unwrap();
        let org = store
            .insert_organization(NewOrganization::new("Gone", building.id).with_phones(["1", "2"]))
            .unwrap();

        store.delete_organization(org.id).unwrap();
        assert_eq!(OrganizationRepository::find_by_id(&store, org.id).await, Ok(None));
        assert!(store.find_by_building(building.id).await.unwrap().is_empty());
    }
}

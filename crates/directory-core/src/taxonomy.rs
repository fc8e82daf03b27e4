//! Activity taxonomy: parent/child adjacency, subtree expansion and the
//! depth rule.
//!
//! The taxonomy is capped at [`MAX_ACTIVITY_DEPTH`] levels, so loading the
//! whole table into an [`ActivityForest`] stays cheap.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::domain::{Activity, ActivityTree, MAX_ACTIVITY_DEPTH};
use crate::error::DomainError;

/// Whether a parent whose ancestor chain (parent inclusive, root counts as
/// one) has `chain_len` nodes can take another child.
pub fn depth_allows_child(chain_len: usize) -> bool {
    chain_len < MAX_ACTIVITY_DEPTH
}

/// In-memory adjacency map over a set of activities
#[derive(Debug, Clone, Default)]
pub struct ActivityForest {
    nodes: BTreeMap<i32, Activity>,
    children: BTreeMap<i32, Vec<i32>>,
}

impl ActivityForest {
    pub fn new(activities: impl IntoIterator<Item = Activity>) -> Self {
        let mut forest = Self::default();
        for activity in activities {
            forest.insert(activity);
        }
        forest
    }

    pub fn insert(&mut self, activity: Activity) {
        if let Some(parent_id) = activity.parent_id {
            let siblings = self.children.entry(parent_id).or_default();
            if !siblings.contains(&activity.id) {
                siblings.push(activity.id);
                siblings.sort_unstable();
            }
        }
        self.nodes.insert(activity.id, activity);
    }

    pub fn get(&self, id: i32) -> Option<&Activity> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: i32) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Activities ordered by id
    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `root_id` plus every descendant. Empty when `root_id` is unknown.
    pub fn subtree_ids(&self, root_id: i32) -> BTreeSet<i32> {
        let mut visited = BTreeSet::new();
        if !self.contains(root_id) {
            return visited;
        }

        let mut frontier = vec![root_id];
        while let Some(id) = frontier.pop() {
            // insert returns false for nodes already expanded, which also
            // stops any cycle in malformed data
            if !visited.insert(id) {
                continue;
            }
            if let Some(children) = self.children.get(&id) {
                frontier.extend(children.iter().copied().filter(|c| !visited.contains(c)));
            }
        }

        visited
    }

    /// Number of nodes from `id` up to its root, both inclusive.
    pub fn ancestor_chain_len(&self, id: i32) -> Option<usize> {
        let mut current = self.nodes.get(&id)?;
        let mut seen = HashSet::from([current.id]);

        while let Some(parent_id) = current.parent_id {
            match self.nodes.get(&parent_id) {
                Some(parent) if seen.insert(parent.id) => current = parent,
                // dangling parent or cycle
                _ => break,
            }
        }

        Some(seen.len())
    }

    /// Whether a child attached under `parent_id` stays within the depth limit.
    pub fn depth_is_valid(&self, parent_id: Option<i32>) -> Result<bool, DomainError> {
        let Some(parent_id) = parent_id else {
            return Ok(true);
        };

        let chain_len = self
            .ancestor_chain_len(parent_id)
            .ok_or(DomainError::ActivityNotFound(parent_id))?;

        Ok(depth_allows_child(chain_len))
    }

    /// Fails with `InvalidDepth` instead of returning `false`.
    pub fn ensure_depth(&self, parent_id: Option<i32>) -> Result<(), DomainError> {
        if self.depth_is_valid(parent_id)? {
            return Ok(());
        }
        Err(DomainError::InvalidDepth {
            parent_id: parent_id.unwrap_or_default(),
            max_depth: MAX_ACTIVITY_DEPTH,
        })
    }

    /// Roots with their descendants attached, ordered by id at every level
    pub fn trees(&self) -> Vec<ActivityTree> {
        let mut visited = HashSet::new();
        self.nodes
            .values()
            .filter(|a| a.parent_id.map_or(true, |p| !self.contains(p)))
            .map(|root| self.build_tree(root, &mut visited))
            .collect()
    }

    fn build_tree(&self, activity: &Activity, visited: &mut HashSet<i32>) -> ActivityTree {
        visited.insert(activity.id);
        let children = self
            .children
            .get(&activity.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.nodes.get(id))
                    .filter_map(|child| {
                        if visited.contains(&child.id) {
                            None
                        } else {
                            Some(self.build_tree(child, visited))
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        ActivityTree {
            id: activity.id,
            name: activity.name.clone(),
            parent_id: activity.parent_id,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: i32, name: &str, parent_id: Option<i32>) -> Activity {
        Activity {
            id,
            name: name.to_string(),
            parent_id,
        }
    }

    /// Food(1) -> Meat(3) -> Beef(6)
    /// Food(1) -> Dairy(4)
    /// Cars(2) -> Parts(5) -> Tyres(7)
    fn sample_forest() -> ActivityForest {
        ActivityForest::new(vec![
            activity(1, "Food", None),
            activity(2, "Cars", None),
            activity(3, "Meat", Some(1)),
            activity(4, "Dairy", Some(1)),
            activity(5, "Parts", Some(2)),
            activity(6, "Beef", Some(3)),
            activity(7, "Tyres", Some(5)),
        ])
    }

    #[test]
    fn test_subtree_of_root() {
        let forest = sample_forest();
        assert_eq!(forest.subtree_ids(1), BTreeSet::from([1, 3, 4, 6]));
        assert_eq!(forest.subtree_ids(2), BTreeSet::from([2, 5, 7]));
    }

    #[test]
    fn test_subtree_of_leaf_is_itself() {
        let forest = sample_forest();
        assert_eq!(forest.subtree_ids(6), BTreeSet::from([6]));
        assert_eq!(forest.subtree_ids(4), BTreeSet::from([4]));
    }

    #[test]
    fn test_subtree_of_missing_node_is_empty() {
        assert!(sample_forest().subtree_ids(42).is_empty());
    }

    #[test]
    fn test_subtree_survives_cycle() {
        let forest = ActivityForest::new(vec![
            activity(1, "A", Some(3)),
            activity(2, "B", Some(1)),
            activity(3, "C", Some(2)),
        ]);
        assert_eq!(forest.subtree_ids(1), BTreeSet::from([1, 2, 3]));
        assert_eq!(forest.ancestor_chain_len(1), Some(3));
    }

    #[test]
    fn test_ancestor_chain_len() {
        let forest = sample_forest();
        assert_eq!(forest.ancestor_chain_len(1), Some(1));
        assert_eq!(forest.ancestor_chain_len(3), Some(2));
        assert_eq!(forest.ancestor_chain_len(6), Some(3));
        assert_eq!(forest.ancestor_chain_len(99), None);
    }

    #[test]
    fn test_depth_is_valid() {
        let forest = sample_forest();
        assert_eq!(forest.depth_is_valid(None), Ok(true));
        assert_eq!(forest.depth_is_valid(Some(1)), Ok(true));
        // Meat is level 2, a child would be level 3
        assert_eq!(forest.depth_is_valid(Some(3)), Ok(true));
        // Beef is level 3, a child would be level 4
        assert_eq!(forest.depth_is_valid(Some(6)), Ok(false));
    }

    #[test]
    fn test_depth_check_on_missing_parent_errors() {
        assert_eq!(
            sample_forest().depth_is_valid(Some(99)),
            Err(DomainError::ActivityNotFound(99))
        );
    }

    #[test]
    fn test_ensure_depth() {
        let forest = sample_forest();
        assert!(forest.ensure_depth(Some(5)).is_ok());
        assert_eq!(
            forest.ensure_depth(Some(7)),
            Err(DomainError::InvalidDepth {
                parent_id: 7,
                max_depth: MAX_ACTIVITY_DEPTH
            })
        );
    }

    #[test]
    fn test_trees() {
        let trees = sample_forest().trees();
        assert_eq!(trees.len(), 2);

        let food = &trees[0];
        assert_eq!(food.name, "Food");
        assert_eq!(food.children.len(), 2);
        assert_eq!(food.children[0].name, "Meat");
        assert_eq!(food.children[0].children[0].name, "Beef");
        assert!(food.children[1].children.is_empty());
    }
}

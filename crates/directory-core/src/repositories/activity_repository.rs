//! Activity repository trait (taxonomy store port)

use async_trait::async_trait;

use crate::domain::Activity;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Every activity, ordered by id
    async fn list(&self) -> Result<Vec<Activity>, DomainError>;

    /// `root_id` and all of its descendants, ordered by id.
    /// Empty when `root_id` does not exist.
    async fn subtree_ids(&self, root_id: i32) -> Result<Vec<i32>, DomainError>;

    /// Whether a child attached under `parent_id` keeps the taxonomy within
    /// its depth limit. Unknown parents fail with `ActivityNotFound`.
    async fn depth_is_valid(&self, parent_id: Option<i32>) -> Result<bool, DomainError>;
}

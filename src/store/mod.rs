mod schema;
pub mod seed;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Which id space an allocated id must be unique within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScope {
    Project,
    Deliverable { project_id: i64 },
}

/// Store defines the database interface.
///
/// Every call is a single statement; callers sequencing several calls get no
/// atomicity across them.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, name: &str) -> Result<Option<User>>;
    fn update_user_password(&self, name: &str, salt: &[u8], password_hash: &[u8]) -> Result<()>;
    fn set_manager(&self, name: &str, is_manager: bool) -> Result<()>;
    fn delete_user(&self, name: &str) -> Result<bool>;

    // Ownership (`owns`) relation
    fn is_owner(&self, user: &str, project_id: i64) -> Result<bool>;
    fn add_owner(&self, user: &str, project_id: i64) -> Result<()>;
    fn remove_owner(&self, user: &str, project_id: i64) -> Result<bool>;
    fn count_owners(&self, project_id: i64) -> Result<i64>;
    fn list_owned_projects(&self, user: &str) -> Result<Vec<i64>>;
    fn transfer_project(&self, project_id: i64, user: &str) -> Result<()>;

    // Viewing (`views`) relation
    fn is_viewer(&self, user: &str, project_id: i64) -> Result<bool>;
    fn add_viewer(&self, user: &str, project_id: i64) -> Result<()>;
    fn remove_viewer(&self, user: &str, project_id: i64) -> Result<bool>;
    fn list_viewed_projects(&self, user: &str) -> Result<Vec<i64>>;
    fn list_viewers(&self, project_id: i64) -> Result<Vec<String>>;
    fn remove_project_viewers(&self, project_id: i64) -> Result<()>;
    fn remove_user_views(&self, user: &str) -> Result<()>;

    // Project operations
    fn create_project(&self, project: &Project) -> Result<()>;
    fn get_project(&self, id: i64) -> Result<Option<Project>>;
    fn update_project(&self, project: &Project) -> Result<()>;
    fn delete_project(&self, id: i64) -> Result<bool>;

    // Flag operations
    fn get_flag(&self, project_id: i64) -> Result<Option<Flag>>;
    fn set_flag(&self, project_id: i64, flag: &Flag) -> Result<()>;

    // Deliverable operations
    fn create_deliverable(&self, deliverable: &Deliverable) -> Result<()>;
    fn get_deliverable(&self, project_id: i64, id: i64) -> Result<Option<Deliverable>>;
    fn list_deliverables(&self, project_id: i64) -> Result<Vec<i64>>;
    fn update_deliverable(&self, deliverable: &Deliverable) -> Result<()>;
    fn delete_deliverable(&self, project_id: i64, id: i64) -> Result<bool>;
    fn delete_project_deliverables(&self, project_id: i64) -> Result<()>;

    /// Returns true if `id` currently names a live row in `scope`.
    fn id_in_use(&self, scope: IdScope, id: i64) -> Result<bool>;
}

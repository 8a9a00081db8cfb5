//! Demonstration data for a fresh database.

use chrono::NaiveDate;

use super::Store;
use crate::error::Result;
use crate::types::{Deliverable, Flag, Project, User};

/// Name of the passwordless demonstration account.
pub const DEMO_USER: &str = "demo";

/// Seeds the public demonstration account together with two sample projects:
/// one it owns and one it only views. Returns false if the account already
/// exists, in which case nothing is written.
pub fn seed_demo(store: &dyn Store) -> Result<bool> {
    if store.get_user(DEMO_USER)?.is_some() {
        return Ok(false);
    }

    let updated = NaiveDate::from_ymd_opt(2017, 1, 17).unwrap_or_default();

    store.create_user(&User {
        name: DEMO_USER.to_string(),
        salt: Vec::new(),
        password_hash: Vec::new(),
        is_manager: true,
    })?;

    let projects = [
        (0, "Test Project 0", 30, "First test project", true),
        (1, "Test Project 1", 80, "Second test project", false),
    ];
    for (id, name, percentage, description, flag) in projects {
        store.create_project(&Project {
            id,
            name: name.to_string(),
            percentage,
            description: description.to_string(),
            updated,
            version: 0,
            flag: Flag {
                version: 0,
                value: flag,
            },
        })?;
    }

    let deliverables = [
        (0, "Deliverable 0", "11/25/2016", 20, "Finish backend"),
        (1, "Deliverable 1", "12/9/2016", 70, "Finish prototype"),
    ];
    for (id, name, due, percentage, description) in deliverables {
        store.create_deliverable(&Deliverable {
            id,
            project_id: 0,
            name: name.to_string(),
            due: due.to_string(),
            percentage,
            submitted: false,
            description: description.to_string(),
        })?;
    }

    store.add_owner(DEMO_USER, 0)?;
    store.add_viewer(DEMO_USER, 1)?;

    tracing::info!("Seeded demonstration account '{}'", DEMO_USER);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    #[test]
    fn test_seed_demo_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();

        assert!(seed_demo(&store).unwrap());
        assert!(!seed_demo(&store).unwrap());

        let demo = store.get_user(DEMO_USER).unwrap().unwrap();
        assert!(demo.is_passwordless());
        assert!(demo.is_manager);
        assert_eq!(store.list_owned_projects(DEMO_USER).unwrap(), vec![0]);
        assert_eq!(store.list_viewed_projects(DEMO_USER).unwrap(), vec![1]);
        assert_eq!(store.list_deliverables(0).unwrap(), vec![0, 1]);
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum name length (exclusive) for projects and deliverables.
pub const NAME_LEN: usize = 128;
/// Maximum description length (exclusive) for projects and deliverables.
pub const DESCRIPTION_LEN: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub salt: Vec<u8>,
    /// Empty for passwordless (public demonstration) accounts.
    pub password_hash: Vec<u8>,
    pub is_manager: bool,
}

impl User {
    #[must_use]
    pub fn is_passwordless(&self) -> bool {
        self.password_hash.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub percentage: u32,
    pub description: String,
    pub updated: NaiveDate,
    pub version: i64,
    pub flag: Flag,
}

/// The per-project shared boolean guarded by an optimistic version counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Flag {
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deliverable {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    /// Free-form due date; the format is not validated.
    pub due: String,
    pub percentage: u32,
    pub submitted: bool,
    pub description: String,
}

/// Checks the bounds shared by projects and deliverables.
pub fn validate_fields(name: &str, percentage: u32, description: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if name.len() >= NAME_LEN {
        return Err(format!("Name must be shorter than {NAME_LEN} bytes"));
    }
    if description.is_empty() {
        return Err("Description cannot be empty".to_string());
    }
    if description.len() >= DESCRIPTION_LEN {
        return Err(format!(
            "Description must be shorter than {DESCRIPTION_LEN} bytes"
        ));
    }
    if percentage > 100 {
        return Err("Percentage cannot exceed 100".to_string());
    }
    Ok(())
}

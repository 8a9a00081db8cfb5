use std::fs;

use anyhow::{Context, bail};

use crate::auth::PasswordHasher;
use crate::store::seed::seed_demo;
use crate::store::{SqliteStore, Store};
use crate::types::User;

use super::commands::Target;
use super::{init_store, load_config};

pub fn run_init(target: Target, demo: bool, non_interactive: bool) -> anyhow::Result<()> {
    let config = load_config(target.config.as_deref(), target.data_dir)?;
    fs::create_dir_all(&config.data_dir)?;

    let db_path = config.db_path();
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;
    println!("Database ready at {}", db_path.display());

    if demo {
        if seed_demo(&store)? {
            println!("Seeded the demo account.");
        } else {
            println!("Demo account already exists.");
        }
    }

    if !non_interactive {
        let hasher = PasswordHasher::new(config.hash)?;
        create_manager_prompt(&store, &hasher)?;
    }

    Ok(())
}

fn create_manager_prompt(store: &dyn Store, hasher: &PasswordHasher) -> anyhow::Result<()> {
    let create = inquire::Confirm::new("Would you like to create a manager account?")
        .with_default(false)
        .prompt()?;

    if !create {
        return Ok(());
    }

    let username = inquire::Text::new("Username:")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Err("Username cannot be empty".into())
            } else if input.contains(char::is_whitespace) {
                Err("Username cannot contain whitespace".into())
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?;

    let password = inquire::Password::new("Password:").prompt()?;

    create_account(store, hasher, &username, &password, true)?;
    println!("Created manager '{username}'.");
    Ok(())
}

pub(crate) fn create_account(
    store: &dyn Store,
    hasher: &PasswordHasher,
    name: &str,
    password: &str,
    is_manager: bool,
) -> anyhow::Result<()> {
    let salt = hasher.generate_salt();
    let password_hash = hasher.hash(password, &salt)?;
    store
        .create_user(&User {
            name: name.to_string(),
            salt,
            password_hash,
            is_manager,
        })
        .with_context(|| format!("Failed to create '{name}'"))
}

pub fn run_bless(target: Target, user: String, revoke: bool) -> anyhow::Result<()> {
    let config = load_config(target.config.as_deref(), target.data_dir)?;
    let store = init_store(&config)?;
    bless(&store, &user, !revoke)?;

    if revoke {
        println!("'{user}' can no longer create projects.");
    } else {
        println!("'{user}' can now create projects.");
    }
    Ok(())
}

pub(crate) fn bless(store: &dyn Store, user: &str, is_manager: bool) -> anyhow::Result<()> {
    store
        .set_manager(user, is_manager)
        .with_context(|| format!("No such user '{user}'"))
}

pub fn run_password(target: Target, user: String, password: String) -> anyhow::Result<()> {
    let config = load_config(target.config.as_deref(), target.data_dir)?;
    let store = init_store(&config)?;
    let hasher = PasswordHasher::new(config.hash)?;

    reset_password(&store, &hasher, &user, &password)?;
    println!("Password for '{user}' updated.");
    Ok(())
}

pub(crate) fn reset_password(
    store: &dyn Store,
    hasher: &PasswordHasher,
    user: &str,
    password: &str,
) -> anyhow::Result<()> {
    if store.get_user(user)?.is_none() {
        bail!("No such user '{user}'");
    }
    let salt = hasher.generate_salt();
    let hash = hasher.hash(password, &salt)?;
    store.update_user_password(user, &salt, &hash)?;
    Ok(())
}

pub fn run_transfer(target: Target, project: i64, user: String) -> anyhow::Result<()> {
    let config = load_config(target.config.as_deref(), target.data_dir)?;
    let store = init_store(&config)?;

    transfer(&store, project, &user)?;
    println!("Project {project} now belongs to '{user}'.");
    Ok(())
}

pub(crate) fn transfer(store: &dyn Store, project: i64, user: &str) -> anyhow::Result<()> {
    if store.get_user(user)?.is_none() {
        bail!("No such user '{user}'");
    }
    if store.get_project(project)?.is_none() {
        bail!("No such project {project}");
    }
    store.transfer_project(project, user)?;
    Ok(())
}

pub fn run_list(target: Target, user: String) -> anyhow::Result<()> {
    let config = load_config(target.config.as_deref(), target.data_dir)?;
    let store = init_store(&config)?;

    let lines = owned_projects(&store, &user)?;
    if lines.is_empty() {
        println!("'{user}' owns no projects.");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn owned_projects(store: &dyn Store, user: &str) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    for id in store.list_owned_projects(user)? {
        if let Some(project) = store.get_project(id)? {
            lines.push(format!("{}: {}", project.id, project.name));
        }
    }
    Ok(lines)
}

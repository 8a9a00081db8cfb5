use std::collections::BTreeSet;

use super::{Context, Endpoint, ProjectResource, Reply, decode, encode};
use crate::error::{Error, Result};
use crate::types::Capability;

/// The viewers of a project, managed by its owners.
#[derive(Debug)]
pub struct Clients {
    project: ProjectResource,
}

impl Clients {
    pub fn new(project: ProjectResource) -> Self {
        Self { project }
    }
}

impl Endpoint for Clients {
    fn capabilities(&self) -> Capability {
        if self.project.capabilities().has(Capability::SET) {
            Capability::GET | Capability::SET
        } else {
            Capability::NONE
        }
    }

    fn get(&self, ctx: &Context<'_>) -> Result<Reply> {
        let viewers = ctx.store.list_viewers(self.project.id())?;
        Ok(Reply::Body(encode(&viewers)?))
    }

    /// Replaces the viewer set. Additions are applied first, each after
    /// checking the user exists, then removals; nothing is rolled back if a
    /// step fails.
    fn set(&self, ctx: &Context<'_>, body: &[u8]) -> Result<Reply> {
        let desired: BTreeSet<String> = decode::<Vec<String>>(body)?.into_iter().collect();
        let project_id = self.project.id();
        let current: BTreeSet<String> = ctx.store.list_viewers(project_id)?.into_iter().collect();

        for name in desired.difference(&current) {
            if ctx.store.get_user(name)?.is_none() {
                return Err(Error::invalid_body(format!("unknown user '{name}'")));
            }
            ctx.store.add_viewer(name, project_id)?;
        }
        for name in current.difference(&desired) {
            ctx.store.remove_viewer(name, project_id)?;
        }

        tracing::debug!(
            "Project {} viewers reconciled by '{}'",
            project_id,
            self.project.user()
        );
        Ok(Reply::Empty)
    }
}

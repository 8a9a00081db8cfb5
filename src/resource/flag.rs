use super::{Context, Endpoint, ProjectResource, Reply, decode, encode};
use crate::error::{Error, Result};
use crate::types::{Capability, Flag};

/// A project's shared flag. Readable by anyone who can read the project,
/// writable by owners.
#[derive(Debug)]
pub struct FlagResource {
    project: ProjectResource,
}

impl FlagResource {
    pub fn new(project: ProjectResource) -> Self {
        Self { project }
    }
}

/// Applies a client's flag update to the stored state.
///
/// The client echoes the version it last read. A matching version with a
/// different value wins and bumps the version. A stale version, or a value
/// equal to the current one, changes nothing. A version ahead of the stored
/// one is a protocol violation. Returns the state to write, if any.
pub fn merge(current: Flag, update: Flag) -> Result<Option<Flag>> {
    if update.version > current.version {
        return Err(Error::invalid_body(format!(
            "flag version {} is ahead of {}",
            update.version, current.version
        )));
    }
    if update.version == current.version && update.value != current.value {
        return Ok(Some(Flag {
            version: current.version + 1,
            value: update.value,
        }));
    }
    Ok(None)
}

impl Endpoint for FlagResource {
    fn capabilities(&self) -> Capability {
        let parent = self.project.capabilities();
        let mut caps = Capability::NONE;
        if parent.has(Capability::GET) {
            caps = caps | Capability::GET;
        }
        if parent.has(Capability::SET) {
            caps = caps | Capability::SET;
        }
        caps
    }

    fn get(&self, ctx: &Context<'_>) -> Result<Reply> {
        let flag = ctx
            .store
            .get_flag(self.project.id())?
            .ok_or(Error::InvalidResource)?;
        Ok(Reply::Body(encode(&flag)?))
    }

    fn set(&self, ctx: &Context<'_>, body: &[u8]) -> Result<Reply> {
        let update: Flag = decode(body)?;
        let project_id = self.project.id();

        // Read then write with no lock held; concurrent writers that both
        // read the same version may both succeed, last write wins.
        let current = ctx
            .store
            .get_flag(project_id)?
            .ok_or(Error::InvalidResource)?;

        match merge(current, update)? {
            Some(next) => {
                ctx.store.set_flag(project_id, &next)?;
                tracing::debug!(
                    "Flag of project {} set to {} at version {}",
                    project_id,
                    next.value,
                    next.version
                );
            }
            None => {
                tracing::debug!(
                    "Flag update for project {} at version {} was superseded",
                    project_id,
                    update.version
                );
            }
        }
        Ok(Reply::Empty)
    }
}

use serde::{Deserialize, Serialize};

use super::{Context, Endpoint, Reply, decode, encode};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Capability, Project, validate_fields};

/// A single project as seen by one user.
#[derive(Debug)]
pub struct ProjectResource {
    user: String,
    id: i64,
    capabilities: Capability,
}

/// Wire representation of a project. `Updated`, `Version` and `Owns` are
/// ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectBody {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub percentage: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub owns: bool,
}

impl ProjectBody {
    pub fn from_project(project: &Project, owns: bool) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            percentage: project.percentage,
            description: project.description.clone(),
            updated: project.updated.format("%Y-%m-%d").to_string(),
            version: project.version,
            owns,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.name, self.percentage, &self.description).map_err(Error::InvalidBody)
    }
}

pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

impl ProjectResource {
    pub fn resolve(store: &dyn Store, user: &str, id: i64) -> Result<Self> {
        let owns = store.is_owner(user, id)?;
        let views = !owns && store.is_viewer(user, id)?;
        Ok(Self {
            user: user.to_string(),
            id,
            capabilities: Capability::for_project(owns, views),
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl Endpoint for ProjectResource {
    fn capabilities(&self) -> Capability {
        self.capabilities
    }

    fn get(&self, ctx: &Context<'_>) -> Result<Reply> {
        let project = ctx
            .store
            .get_project(self.id)?
            .ok_or(Error::InvalidResource)?;
        let owns = self.capabilities.has(Capability::SET);
        Ok(Reply::Body(encode(&ProjectBody::from_project(&project, owns))?))
    }

    fn set(&self, ctx: &Context<'_>, body: &[u8]) -> Result<Reply> {
        let body: ProjectBody = decode(body)?;
        body.validate()?;
        if body.id != self.id {
            return Err(Error::invalid_body(format!(
                "body id {} does not match project {}",
                body.id, self.id
            )));
        }

        let mut project = ctx
            .store
            .get_project(self.id)?
            .ok_or(Error::InvalidResource)?;
        project.name = body.name;
        project.percentage = body.percentage;
        project.description = body.description;
        project.updated = today();
        project.version += 1;
        ctx.store.update_project(&project)?;

        Ok(Reply::Empty)
    }

    fn delete(&self, ctx: &Context<'_>) -> Result<Reply> {
        if self.capabilities.has(Capability::SET) {
            release_ownership(ctx.store, &self.user, self.id)?;
        } else {
            ctx.store.remove_viewer(&self.user, self.id)?;
            tracing::debug!("'{}' stopped viewing project {}", self.user, self.id);
        }
        Ok(Reply::Empty)
    }
}

/// Drops `user`'s ownership of a project. The last owner leaving deletes the
/// project along with its viewers and deliverables. The steps are separate
/// statements; a failure part way leaves the earlier ones applied.
pub(crate) fn release_ownership(store: &dyn Store, user: &str, project_id: i64) -> Result<()> {
    store.remove_owner(user, project_id)?;
    if store.count_owners(project_id)? > 0 {
        return Ok(());
    }

    store.remove_project_viewers(project_id)?;
    store.delete_project_deliverables(project_id)?;
    store.delete_project(project_id)?;
    tracing::info!("Deleted project {} after its last owner left", project_id);
    Ok(())
}

use serde::{Deserialize, Serialize};

use super::{Context, Endpoint, ProjectResource, Reply, decode, encode};
use crate::error::{Error, Result};
use crate::store::{IdScope, Store};
use crate::types::{Capability, Deliverable, validate_fields};

/// Wire representation of a deliverable. `Id` is ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeliverableBody {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub due: String,
    #[serde(default)]
    pub percentage: u32,
    #[serde(default)]
    pub submitted: bool,
    #[serde(default)]
    pub description: String,
}

impl DeliverableBody {
    fn validate(&self) -> Result<()> {
        validate_fields(&self.name, self.percentage, &self.description).map_err(Error::InvalidBody)
    }

    fn into_deliverable(self, project_id: i64, id: i64) -> Deliverable {
        Deliverable {
            id,
            project_id,
            name: self.name,
            due: self.due,
            percentage: self.percentage,
            submitted: self.submitted,
            description: self.description,
        }
    }
}

impl From<&Deliverable> for DeliverableBody {
    fn from(d: &Deliverable) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            due: d.due.clone(),
            percentage: d.percentage,
            submitted: d.submitted,
            description: d.description.clone(),
        }
    }
}

/// The deliverables of one project.
#[derive(Debug)]
pub struct DeliverableList {
    project: ProjectResource,
}

impl DeliverableList {
    pub fn new(project: ProjectResource) -> Self {
        Self { project }
    }
}

impl Endpoint for DeliverableList {
    fn capabilities(&self) -> Capability {
        let parent = self.project.capabilities();
        if parent.has(Capability::SET) {
            Capability::GET | Capability::CREATE
        } else if parent.has(Capability::GET) {
            Capability::GET
        } else {
            Capability::NONE
        }
    }

    fn get(&self, ctx: &Context<'_>) -> Result<Reply> {
        let ids = ctx.store.list_deliverables(self.project.id())?;
        Ok(Reply::Body(encode(&ids)?))
    }

    fn create(&self, ctx: &Context<'_>, body: &[u8]) -> Result<Reply> {
        let body: DeliverableBody = decode(body)?;
        body.validate()?;

        let project_id = self.project.id();
        let id = ctx
            .ids
            .allocate(ctx.store, IdScope::Deliverable { project_id })?;
        let deliverable = body.into_deliverable(project_id, id);
        ctx.store.create_deliverable(&deliverable)?;

        tracing::info!("Created deliverable {} in project {}", id, project_id);
        Ok(Reply::Created {
            location: format!("/projects/{project_id}/deliverables/{id}"),
            body: encode(&DeliverableBody::from(&deliverable))?,
        })
    }
}

/// A single deliverable.
#[derive(Debug)]
pub struct DeliverableResource {
    project: ProjectResource,
    id: i64,
}

impl DeliverableResource {
    /// Checks the row exists only for callers who may read the project, so
    /// outsiders get Forbidden rather than learning which ids exist.
    pub fn resolve(store: &dyn Store, project: ProjectResource, id: i64) -> Result<Self> {
        if project.capabilities().has(Capability::GET)
            && store.get_deliverable(project.id(), id)?.is_none()
        {
            return Err(Error::InvalidResource);
        }
        Ok(Self { project, id })
    }

    fn load(&self, store: &dyn Store) -> Result<Deliverable> {
        store
            .get_deliverable(self.project.id(), self.id)?
            .ok_or(Error::InvalidResource)
    }
}

impl Endpoint for DeliverableResource {
    fn capabilities(&self) -> Capability {
        let parent = self.project.capabilities();
        if parent.has(Capability::SET) {
            Capability::ALL
        } else {
            parent.intersection(Capability::GET)
        }
    }

    fn get(&self, ctx: &Context<'_>) -> Result<Reply> {
        let deliverable = self.load(ctx.store)?;
        Ok(Reply::Body(encode(&DeliverableBody::from(&deliverable))?))
    }

    fn set(&self, ctx: &Context<'_>, body: &[u8]) -> Result<Reply> {
        let body: DeliverableBody = decode(body)?;
        body.validate()?;

        // Surface a concurrent delete as a missing resource.
        self.load(ctx.store)?;
        ctx.store
            .update_deliverable(&body.into_deliverable(self.project.id(), self.id))?;
        Ok(Reply::Empty)
    }

    fn delete(&self, ctx: &Context<'_>) -> Result<Reply> {
        ctx.store.delete_deliverable(self.project.id(), self.id)?;
        Ok(Reply::Empty)
    }
}

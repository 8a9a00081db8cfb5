//! URI-addressed resources and the capability checks that guard them.
//!
//! A request path resolves to exactly one [`Resource`]. Each variant carries
//! the [`Capability`] mask the requesting user holds on it, computed from the
//! store at resolution time and dropped with the request. Nested variants own
//! their already-resolved parent project and derive their mask from it, so a
//! child never grants more than its parent.

mod clients;
mod deliverables;
mod flag;
mod gate;
mod ids;
mod login;
mod project;
mod project_list;
mod resolver;

pub use clients::Clients;
pub use deliverables::{DeliverableBody, DeliverableList, DeliverableResource};
pub use flag::FlagResource;
pub use gate::{Verb, require};
pub use ids::IdAllocator;
pub use login::{Login, LoginBody};
pub use project::{ProjectBody, ProjectResource};
pub use project_list::ProjectList;
pub use resolver::{LOGIN_PATH, Route, resolve};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::Capability;

/// Outcome of a successful resource operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Operation succeeded with no representation to return.
    Empty,
    /// Operation succeeded and returns a representation.
    Body(Value),
    /// A new resource was created at `location`.
    Created { location: String, body: Value },
}

/// What a resource operation needs besides the resource itself.
pub struct Context<'a> {
    pub store: &'a dyn Store,
    pub ids: &'a IdAllocator,
    pub hasher: &'a crate::auth::PasswordHasher,
}

/// Operations shared by every resource variant. Variants override the verbs
/// they support; the rest fail with [`Error::InvalidMethod`].
pub trait Endpoint {
    fn capabilities(&self) -> Capability;

    fn get(&self, _ctx: &Context<'_>) -> Result<Reply> {
        Err(Error::InvalidMethod)
    }

    fn set(&self, _ctx: &Context<'_>, _body: &[u8]) -> Result<Reply> {
        Err(Error::InvalidMethod)
    }

    fn create(&self, _ctx: &Context<'_>, _body: &[u8]) -> Result<Reply> {
        Err(Error::InvalidMethod)
    }

    fn delete(&self, _ctx: &Context<'_>) -> Result<Reply> {
        Err(Error::InvalidMethod)
    }
}

/// Every addressable resource.
#[derive(Debug)]
pub enum Resource {
    Login(Login),
    ProjectList(ProjectList),
    Project(ProjectResource),
    Flag(FlagResource),
    Clients(Clients),
    DeliverableList(DeliverableList),
    Deliverable(DeliverableResource),
}

impl Resource {
    #[must_use]
    pub fn endpoint(&self) -> &dyn Endpoint {
        match self {
            Resource::Login(r) => r,
            Resource::ProjectList(r) => r,
            Resource::Project(r) => r,
            Resource::Flag(r) => r,
            Resource::Clients(r) => r,
            Resource::DeliverableList(r) => r,
            Resource::Deliverable(r) => r,
        }
    }

    #[must_use]
    pub fn capabilities(&self) -> Capability {
        self.endpoint().capabilities()
    }

    /// Runs the operation selected by `verb`. Capability checks are the
    /// caller's job (see [`require`]).
    pub fn execute(&self, ctx: &Context<'_>, verb: Verb, body: &[u8]) -> Result<Reply> {
        let endpoint = self.endpoint();
        match verb {
            Verb::Get => endpoint.get(ctx),
            Verb::Put => endpoint.set(ctx, body),
            Verb::Post => endpoint.create(ctx, body),
            Verb::Delete => endpoint.delete(ctx),
        }
    }
}

/// Decodes a JSON request body, mapping any failure to `InvalidBody`.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::invalid_body(format!("malformed body: {e}")))
}

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::OnceLock;

    use super::*;
    use crate::auth::PasswordHasher;
    use crate::config::HashConfig;
    use crate::store::SqliteStore;
    use crate::types::{Flag, Project, User};

    pub struct Fixture {
        pub store: SqliteStore,
        pub ids: IdAllocator,
    }

    fn hasher() -> &'static PasswordHasher {
        static HASHER: OnceLock<PasswordHasher> = OnceLock::new();
        HASHER.get_or_init(|| PasswordHasher::new(HashConfig::fast()).unwrap())
    }

    impl Fixture {
        pub fn new() -> Self {
            let store = SqliteStore::in_memory().unwrap();
            store.initialize().unwrap();
            Self {
                store,
                ids: IdAllocator::seeded(7, 64),
            }
        }

        pub fn ctx(&self) -> Context<'_> {
            Context {
                store: &self.store,
                ids: &self.ids,
                hasher: hasher(),
            }
        }

        pub fn user(&self, name: &str, is_manager: bool) {
            self.store
                .create_user(&User {
                    name: name.to_string(),
                    salt: Vec::new(),
                    password_hash: Vec::new(),
                    is_manager,
                })
                .unwrap();
        }

        pub fn project(&self, id: i64, owner: &str) {
            self.store
                .create_project(&Project {
                    id,
                    name: format!("Project {id}"),
                    percentage: 10,
                    description: "desc".to_string(),
                    updated: chrono::NaiveDate::from_ymd_opt(2017, 1, 17).unwrap(),
                    version: 0,
                    flag: Flag::default(),
                })
                .unwrap();
            self.store.add_owner(owner, id).unwrap();
        }

        pub fn resolve(&self, user: &str, path: &str) -> Result<Resource> {
            resolve(&self.store, &crate::auth::Principal::new(user), path)
        }
    }

    pub fn json(reply: Reply) -> Value {
        match reply {
            Reply::Body(v) | Reply::Created { body: v, .. } => v,
            Reply::Empty => Value::Null,
        }
    }
}

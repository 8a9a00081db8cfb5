use super::project::today;
use super::{Context, Endpoint, ProjectBody, Reply, decode, encode};
use crate::error::{Error, Result};
use crate::store::{IdScope, Store};
use crate::types::{Capability, Flag, Project};

/// Every project the user owns or views.
#[derive(Debug)]
pub struct ProjectList {
    user: String,
    capabilities: Capability,
}

impl ProjectList {
    pub fn resolve(store: &dyn Store, user: &str) -> Result<Self> {
        let is_manager = store
            .get_user(user)?
            .ok_or(Error::InvalidCredentials)?
            .is_manager;

        let mut capabilities = Capability::GET;
        if is_manager {
            capabilities = capabilities | Capability::CREATE;
        }
        Ok(Self {
            user: user.to_string(),
            capabilities,
        })
    }
}

impl Endpoint for ProjectList {
    fn capabilities(&self) -> Capability {
        self.capabilities
    }

    fn get(&self, ctx: &Context<'_>) -> Result<Reply> {
        let mut ids = ctx.store.list_viewed_projects(&self.user)?;
        ids.extend(ctx.store.list_owned_projects(&self.user)?);
        Ok(Reply::Body(encode(&ids)?))
    }

    fn create(&self, ctx: &Context<'_>, body: &[u8]) -> Result<Reply> {
        let body: ProjectBody = decode(body)?;
        body.validate()?;

        let id = ctx.ids.allocate(ctx.store, IdScope::Project)?;
        let project = Project {
            id,
            name: body.name,
            percentage: body.percentage,
            description: body.description,
            updated: today(),
            version: 0,
            flag: Flag::default(),
        };
        ctx.store.create_project(&project)?;
        ctx.store.add_owner(&self.user, id)?;

        tracing::info!("'{}' created project {}", self.user, id);
        Ok(Reply::Created {
            location: format!("/projects/{id}"),
            body: encode(&ProjectBody::from_project(&project, true))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::test_support::{Fixture, json};
    use serde_json::json;

    #[test]
    fn test_capabilities_follow_manager_flag() {
        let fx = Fixture::new();
        fx.user("alice", false);
        fx.user("boss", true);

        let caps = |user| ProjectList::resolve(&fx.store, user).unwrap().capabilities;
        assert_eq!(caps("alice"), Capability::GET);
        assert_eq!(caps("boss"), Capability::GET | Capability::CREATE);
    }

    #[test]
    fn test_get_lists_viewed_and_owned() {
        let fx = Fixture::new();
        fx.user("alice", false);
        fx.user("bob", false);
        fx.project(1, "alice");
        fx.project(2, "bob");
        fx.store.add_viewer("alice", 2).unwrap();

        let list = ProjectList::resolve(&fx.store, "alice").unwrap();
        assert_eq!(json(list.get(&fx.ctx()).unwrap()), json!([2, 1]));
    }

    #[test]
    fn test_fresh_user_sees_empty_list() {
        let fx = Fixture::new();
        fx.user("alice", false);
        let list = ProjectList::resolve(&fx.store, "alice").unwrap();
        assert_eq!(json(list.get(&fx.ctx()).unwrap()), json!([]));
    }

    #[test]
    fn test_create() {
        let fx = Fixture::new();
        fx.user("boss", true);
        let ctx = fx.ctx();
        let list = ProjectList::resolve(&fx.store, "boss").unwrap();

        let reply = list
            .create(
                &ctx,
                br#"{"Name":"Apollo","Percentage":0,"Description":"moon"}"#,
            )
            .unwrap();
        let Reply::Created { location, body } = reply else {
            panic!("expected Created");
        };
        let id = body["Id"].as_i64().unwrap();
        assert_eq!(location, format!("/projects/{id}"));
        assert_eq!(body["Owns"], true);
        assert!(fx.store.is_owner("boss", id).unwrap());

        let project = fx.store.get_project(id).unwrap().unwrap();
        assert_eq!(project.name, "Apollo");
        assert_eq!(project.flag, Flag::default());
    }

    #[test]
    fn test_create_rejects_invalid_body() {
        let fx = Fixture::new();
        fx.user("boss", true);
        let list = ProjectList::resolve(&fx.store, "boss").unwrap();
        let long = "x".repeat(200);
        let body = format!(r#"{{"Name":"{long}","Percentage":0,"Description":"d"}}"#);

        assert!(matches!(
            list.create(&fx.ctx(), body.as_bytes()),
            Err(Error::InvalidBody(_))
        ));
        assert!(fx.store.list_owned_projects("boss").unwrap().is_empty());
    }
}

use crate::auth::Principal;
use crate::error::{Error, Result};
use crate::store::Store;

use super::{
    Clients, DeliverableList, DeliverableResource, FlagResource, Login, ProjectList,
    ProjectResource, Resource,
};

pub const LOGIN_PATH: &str = "/login";

/// The closed set of path shapes the server answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    ProjectList,
    Project(i64),
    Flag(i64),
    Clients(i64),
    DeliverableList(i64),
    Deliverable { project_id: i64, id: i64 },
}

impl Route {
    /// Matches `path` exactly against the known shapes. Ids are runs of ASCII
    /// digits; anything else, including trailing slashes, does not match.
    #[must_use]
    pub fn parse(path: &str) -> Option<Route> {
        let rest = path.strip_prefix('/')?;
        let segments: Vec<&str> = rest.split('/').collect();

        let route = match segments.as_slice() {
            ["login"] => Route::Login,
            ["projects"] => Route::ProjectList,
            ["projects", pid] => Route::Project(parse_id(pid)?),
            ["projects", pid, "flag"] => Route::Flag(parse_id(pid)?),
            ["projects", pid, "clients"] => Route::Clients(parse_id(pid)?),
            ["projects", pid, "deliverables"] => Route::DeliverableList(parse_id(pid)?),
            ["projects", pid, "deliverables", id] => Route::Deliverable {
                project_id: parse_id(pid)?,
                id: parse_id(id)?,
            },
            _ => return None,
        };
        Some(route)
    }
}

fn parse_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Resolves `path` into a resource carrying the principal's capabilities.
///
/// Nested resources resolve their project first and derive their own mask
/// from it.
pub fn resolve(store: &dyn Store, principal: &Principal, path: &str) -> Result<Resource> {
    let route = Route::parse(path).ok_or(Error::InvalidResource)?;
    let user = principal.name.as_str();

    let resource = match route {
        Route::Login => Resource::Login(Login::new(principal)),
        Route::ProjectList => Resource::ProjectList(ProjectList::resolve(store, user)?),
        Route::Project(pid) => Resource::Project(ProjectResource::resolve(store, user, pid)?),
        Route::Flag(pid) => {
            Resource::Flag(FlagResource::new(ProjectResource::resolve(store, user, pid)?))
        }
        Route::Clients(pid) => {
            Resource::Clients(Clients::new(ProjectResource::resolve(store, user, pid)?))
        }
        Route::DeliverableList(pid) => Resource::DeliverableList(DeliverableList::new(
            ProjectResource::resolve(store, user, pid)?,
        )),
        Route::Deliverable { project_id, id } => {
            let project = ProjectResource::resolve(store, user, project_id)?;
            Resource::Deliverable(DeliverableResource::resolve(store, project, id)?)
        }
    };

    tracing::debug!(
        "Resolved {} for '{}' with capabilities {}",
        path,
        user,
        resource.capabilities()
    );
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::test_support::Fixture;
    use crate::types::Capability;

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/login"), Some(Route::Login));
        assert_eq!(Route::parse("/projects"), Some(Route::ProjectList));
        assert_eq!(Route::parse("/projects/12"), Some(Route::Project(12)));
        assert_eq!(Route::parse("/projects/0/flag"), Some(Route::Flag(0)));
        assert_eq!(Route::parse("/projects/3/clients"), Some(Route::Clients(3)));
        assert_eq!(
            Route::parse("/projects/3/deliverables"),
            Some(Route::DeliverableList(3))
        );
        assert_eq!(
            Route::parse("/projects/3/deliverables/9"),
            Some(Route::Deliverable {
                project_id: 3,
                id: 9
            })
        );
    }

    #[test]
    fn test_route_parse_rejects_everything_else() {
        for path in [
            "",
            "/",
            "login",
            "/login/",
            "/projects/",
            "/projects/-1",
            "/projects/+1",
            "/projects/abc",
            "/projects/1/flag/extra",
            "/projects/1/unknown",
            "/projects/1/deliverables/",
            "/projects/99999999999999999999999",
            "//projects",
        ] {
            assert_eq!(Route::parse(path), None, "{path:?} should not match");
        }
    }

    #[test]
    fn test_resolve_unknown_path() {
        let fx = Fixture::new();
        fx.user("alice", false);
        assert!(matches!(
            fx.resolve("alice", "/nope"),
            Err(Error::InvalidResource)
        ));
    }

    #[test]
    fn test_child_never_exceeds_parent() {
        let fx = Fixture::new();
        fx.user("alice", false);
        fx.user("bob", false);
        fx.user("eve", false);
        fx.project(1, "alice");
        fx.store.add_viewer("bob", 1).unwrap();

        for user in ["alice", "bob", "eve"] {
            let parent = fx.resolve(user, "/projects/1").unwrap().capabilities();
            for child in [
                "/projects/1/flag",
                "/projects/1/clients",
                "/projects/1/deliverables",
            ] {
                let caps = fx.resolve(user, child).unwrap().capabilities();
                if !parent.has(Capability::GET) {
                    assert!(caps.is_empty(), "{user} {child}");
                }
                if !parent.has(Capability::SET) {
                    assert!(!caps.has(Capability::SET), "{user} {child}");
                    assert!(!caps.has(Capability::CREATE), "{user} {child}");
                }
            }
        }
    }
}

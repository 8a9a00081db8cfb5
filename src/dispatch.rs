//! Transport-independent request handling.
//!
//! A request runs through four stages, stopping at the first failure:
//! authenticate the principal, resolve the path into a resource, check the
//! verb against the resource's capabilities, and run the operation.

use bytes::Bytes;

use crate::auth::{Credentials, authenticate};
use crate::error::Result;
use crate::resource::{Context, Reply, Verb, require, resolve};

/// An inbound request, stripped of transport details.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub credentials: Option<Credentials>,
    pub body: Bytes,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            credentials: None,
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

pub fn dispatch(ctx: &Context<'_>, request: &Request) -> Result<Reply> {
    // An unsupported verb is reported only once the caller is authenticated.
    let verb = Verb::parse(&request.method);

    let principal = authenticate(
        ctx.store,
        ctx.hasher,
        request.credentials.as_ref(),
        &request.path,
        verb.as_ref().ok().copied(),
    )?;
    let verb = verb?;

    let resource = resolve(ctx.store, &principal, &request.path)?;
    require(verb, resource.capabilities())?;

    resource.execute(ctx, verb, &request.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::resource::test_support::{Fixture, json};
    use crate::store::Store;
    use serde_json::json;

    fn as_user(method: &str, path: &str, user: &str) -> Request {
        Request::new(method, path).with_credentials(Credentials::new(user, "pw"))
    }

    #[test]
    fn test_stage_order() {
        let fx = Fixture::new();
        fx.user("alice", false);
        let ctx = fx.ctx();

        let kind = |req: Request| dispatch(&ctx, &req).unwrap_err().kind();

        assert_eq!(
            kind(Request::new("PATCH", "/nowhere")),
            ErrorKind::NoCredentials
        );
        assert_eq!(
            kind(as_user("GET", "/nowhere", "nobody")),
            ErrorKind::InvalidCredentials
        );
        assert_eq!(
            kind(as_user("PATCH", "/nowhere", "alice")),
            ErrorKind::InvalidMethod
        );
        assert_eq!(
            kind(as_user("GET", "/nowhere", "alice")),
            ErrorKind::InvalidResource
        );
        assert_eq!(
            kind(as_user("POST", "/projects", "alice")),
            ErrorKind::Forbidden
        );
        assert_eq!(
            kind(as_user("DELETE", "/projects", "alice")),
            ErrorKind::Forbidden
        );
    }

    #[test]
    fn test_unsupported_verb_on_resource() {
        let fx = Fixture::new();
        fx.user("alice", false);
        fx.project(1, "alice");

        // Owners hold Delete on a deliverable list's parent but the list
        // itself grants no Delete.
        let result = dispatch(
            &fx.ctx(),
            &as_user("DELETE", "/projects/1/deliverables", "alice"),
        );
        assert!(matches!(result, Err(Error::Forbidden)));

        // Login grants everything but has no Create for an existing account.
        let result = dispatch(&fx.ctx(), &as_user("POST", "/login", "alice"));
        assert!(matches!(result, Err(Error::InvalidMethod)));
    }

    #[test]
    fn test_flag_round_trip() {
        let fx = Fixture::new();
        fx.user("alice", false);
        fx.project(1, "alice");
        let ctx = fx.ctx();

        let reply = dispatch(
            &ctx,
            &as_user("PUT", "/projects/1/flag", "alice").with_body(r#"{"Version":0,"Value":true}"#),
        )
        .unwrap();
        assert_eq!(reply, Reply::Empty);

        let reply = dispatch(&ctx, &as_user("GET", "/projects/1/flag", "alice")).unwrap();
        assert_eq!(json(reply), json!({"Version": 1, "Value": true}));
    }

    #[test]
    fn test_provision_through_dispatch() {
        let fx = Fixture::new();
        let reply = dispatch(&fx.ctx(), &as_user("POST", "/login", "newbie")).unwrap();
        assert!(matches!(reply, Reply::Created { .. }));
        assert!(!fx.store.get_user("newbie").unwrap().unwrap().is_manager);
    }
}

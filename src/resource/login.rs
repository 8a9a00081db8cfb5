use serde::{Deserialize, Serialize};

use super::{Context, Endpoint, Reply, decode, encode, project};
use crate::auth::Principal;
use crate::error::{Error, Result};
use crate::resource::LOGIN_PATH;
use crate::types::Capability;

/// The caller's own account.
#[derive(Debug)]
pub struct Login {
    user: String,
    provisioned: bool,
}

/// Request body for `PUT /login`. `User` is accepted but must name the caller.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginBody {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub manager: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Account<'a> {
    user: &'a str,
    manager: bool,
}

impl Login {
    pub fn new(principal: &Principal) -> Self {
        Self {
            user: principal.name.clone(),
            provisioned: principal.provisioned,
        }
    }

    fn account(&self, ctx: &Context<'_>) -> Result<Reply> {
        let user = ctx
            .store
            .get_user(&self.user)?
            .ok_or(Error::InvalidResource)?;
        Ok(Reply::Body(encode(&Account {
            user: &user.name,
            manager: user.is_manager,
        })?))
    }
}

impl Endpoint for Login {
    fn capabilities(&self) -> Capability {
        Capability::ALL
    }

    fn get(&self, ctx: &Context<'_>) -> Result<Reply> {
        self.account(ctx)
    }

    fn set(&self, ctx: &Context<'_>, body: &[u8]) -> Result<Reply> {
        let body: LoginBody = decode(body)?;
        if body.user.as_deref().is_some_and(|u| u != self.user) {
            return Err(Error::invalid_body("cannot modify another account"));
        }

        let current = ctx
            .store
            .get_user(&self.user)?
            .ok_or(Error::InvalidResource)?;
        if current.is_passwordless() {
            return Err(Error::Forbidden);
        }

        if body.manager == Some(true) && !current.is_manager {
            return Err(Error::Forbidden);
        }

        if let Some(password) = body.password {
            if password.is_empty() {
                return Err(Error::invalid_body("password must not be empty"));
            }
            let salt = ctx.hasher.generate_salt();
            let hash = ctx.hasher.hash(&password, &salt)?;
            ctx.store.update_user_password(&self.user, &salt, &hash)?;
            tracing::info!("Changed password for '{}'", self.user);
        }

        if body.manager == Some(false) && current.is_manager {
            ctx.store.set_manager(&self.user, false)?;
            tracing::info!("'{}' gave up manager rights", self.user);
        }

        Ok(Reply::Empty)
    }

    fn create(&self, ctx: &Context<'_>, _body: &[u8]) -> Result<Reply> {
        if !self.provisioned {
            return Err(Error::InvalidMethod);
        }
        let Reply::Body(body) = self.account(ctx)? else {
            return Err(Error::InvalidResource);
        };
        Ok(Reply::Created {
            location: LOGIN_PATH.to_string(),
            body,
        })
    }

    fn delete(&self, ctx: &Context<'_>) -> Result<Reply> {
        let current = ctx
            .store
            .get_user(&self.user)?
            .ok_or(Error::InvalidResource)?;
        if current.is_passwordless() {
            return Err(Error::Forbidden);
        }

        for project_id in ctx.store.list_owned_projects(&self.user)? {
            project::release_ownership(ctx.store, &self.user, project_id)?;
        }
        ctx.store.remove_user_views(&self.user)?;
        ctx.store.delete_user(&self.user)?;

        tracing::info!("Deleted account '{}'", self.user);
        Ok(Reply::Empty)
    }
}

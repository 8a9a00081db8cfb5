#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use mel::auth::PasswordHasher;
use mel::config::HashConfig;
use mel::resource::IdAllocator;
use mel::server::{AppState, create_router};
use mel::store::{SqliteStore, Store};
use mel::types::User;

/// A router over a fresh on-disk database.
pub struct TestApp {
    pub store: Arc<SqliteStore>,
    pub hasher: Arc<PasswordHasher>,
    router: Router,
    _temp: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("temp dir");
        let store = SqliteStore::new(temp.path().join("mel.db")).expect("open store");
        store.initialize().expect("initialize");
        let store = Arc::new(store);

        let state = Arc::new(AppState {
            store: store.clone(),
            hasher: PasswordHasher::new(HashConfig::fast()).expect("hasher"),
            ids: IdAllocator::seeded(0, 1),
        });

        Self {
            store,
            hasher: Arc::new(PasswordHasher::new(HashConfig::fast()).expect("hasher")),
            router: create_router(state),
            _temp: temp,
        }
    }

    pub fn add_user(&self, name: &str, password: &str, is_manager: bool) {
        let salt = self.hasher.generate_salt();
        let password_hash = self.hasher.hash(password, &salt).expect("hash");
        self.store
            .create_user(&User {
                name: name.to_string(),
                salt,
                password_hash,
                is_manager,
            })
            .expect("create user");
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.expect("response")
    }

    pub async fn call(
        &self,
        method: &str,
        path: &str,
        auth: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some((user, password)) = auth {
            builder = builder.header(header::AUTHORIZATION, basic_auth(user, password));
        }
        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("request")).await
    }
}

pub fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

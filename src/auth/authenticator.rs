use crate::error::{Error, Result};
use crate::resource::{LOGIN_PATH, Verb};
use crate::store::Store;
use crate::types::User;

use super::{Credentials, PasswordHasher};

/// Longest accepted username; 320 is the maximum email address length.
const MAX_USERNAME_LEN: usize = 320;

/// The authenticated identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    /// True if the account was created by this request.
    pub provisioned: bool,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provisioned: false,
        }
    }
}

/// Authenticates `credentials` against the store.
///
/// An unknown user sending `POST /login` is provisioned on the spot as a
/// non-manager. An account with an empty stored hash accepts any password.
pub fn authenticate(
    store: &dyn Store,
    hasher: &PasswordHasher,
    credentials: Option<&Credentials>,
    path: &str,
    verb: Option<Verb>,
) -> Result<Principal> {
    let credentials = credentials.ok_or(Error::NoCredentials)?;

    let Some(user) = store.get_user(&credentials.username)? else {
        if path == LOGIN_PATH && verb == Some(Verb::Post) {
            return provision(store, hasher, credentials);
        }
        tracing::debug!("Rejected unknown user '{}'", credentials.username);
        return Err(Error::InvalidCredentials);
    };

    if user.is_passwordless() {
        return Ok(Principal::new(user.name));
    }

    if !hasher.verify(&credentials.password, &user.salt, &user.password_hash)? {
        tracing::debug!("Rejected bad password for '{}'", user.name);
        return Err(Error::InvalidCredentials);
    }

    Ok(Principal::new(user.name))
}

fn provision(
    store: &dyn Store,
    hasher: &PasswordHasher,
    credentials: &Credentials,
) -> Result<Principal> {
    let name = credentials.username.as_str();
    if name.is_empty() || name.len() > MAX_USERNAME_LEN {
        return Err(Error::InvalidCredentials);
    }

    let salt = hasher.generate_salt();
    let password_hash = hasher.hash(&credentials.password, &salt)?;

    let user = User {
        name: name.to_string(),
        salt,
        password_hash,
        is_manager: false,
    };
    match store.create_user(&user) {
        Ok(()) => {}
        // Another request provisioned the same name first.
        Err(Error::AlreadyExists) => return Err(Error::InvalidCredentials),
        Err(e) => return Err(e),
    }

    tracing::info!("Provisioned account '{}'", name);
    Ok(Principal {
        name: user.name,
        provisioned: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashConfig;
    use crate::store::SqliteStore;

    fn setup() -> (SqliteStore, PasswordHasher) {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();
        let hasher = PasswordHasher::new(HashConfig::fast()).unwrap();
        (store, hasher)
    }

    fn add_user(store: &SqliteStore, hasher: &PasswordHasher, name: &str, password: &str) {
        let salt = hasher.generate_salt();
        let password_hash = hasher.hash(password, &salt).unwrap();
        store
            .create_user(&User {
                name: name.to_string(),
                salt,
                password_hash,
                is_manager: false,
            })
            .unwrap();
    }

    #[test]
    fn test_missing_credentials() {
        let (store, hasher) = setup();
        let result = authenticate(&store, &hasher, None, "/login", Some(Verb::Get));
        assert!(matches!(result, Err(Error::NoCredentials)));
    }

    #[test]
    fn test_valid_password() {
        let (store, hasher) = setup();
        add_user(&store, &hasher, "alice", "s3cret");

        let creds = Credentials::new("alice", "s3cret");
        let principal =
            authenticate(&store, &hasher, Some(&creds), "/projects", Some(Verb::Get)).unwrap();
        assert_eq!(principal, Principal::new("alice"));
    }

    #[test]
    fn test_wrong_password() {
        let (store, hasher) = setup();
        add_user(&store, &hasher, "alice", "s3cret");

        let creds = Credentials::new("alice", "guess");
        for verb in [Verb::Get, Verb::Post] {
            let result = authenticate(&store, &hasher, Some(&creds), "/login", Some(verb));
            assert!(matches!(result, Err(Error::InvalidCredentials)));
        }
    }

    #[test]
    fn test_unknown_user_outside_login_create() {
        let (store, hasher) = setup();
        let creds = Credentials::new("mallory", "pw");

        for (path, verb) in [
            ("/login", Some(Verb::Get)),
            ("/login", Some(Verb::Put)),
            ("/login", None),
            ("/projects", Some(Verb::Post)),
        ] {
            let result = authenticate(&store, &hasher, Some(&creds), path, verb);
            assert!(matches!(result, Err(Error::InvalidCredentials)), "{path}");
        }
        assert!(store.get_user("mallory").unwrap().is_none());
    }

    #[test]
    fn test_login_create_provisions() {
        let (store, hasher) = setup();
        let creds = Credentials::new("bob", "pw");

        let principal =
            authenticate(&store, &hasher, Some(&creds), "/login", Some(Verb::Post)).unwrap();
        assert!(principal.provisioned);

        let user = store.get_user("bob").unwrap().unwrap();
        assert!(!user.is_manager);
        assert!(hasher.verify("pw", &user.salt, &user.password_hash).unwrap());

        let again =
            authenticate(&store, &hasher, Some(&creds), "/login", Some(Verb::Post)).unwrap();
        assert!(!again.provisioned);
    }

    #[test]
    fn test_provision_rejects_empty_name() {
        let (store, hasher) = setup();
        let creds = Credentials::new("", "pw");
        let result = authenticate(&store, &hasher, Some(&creds), "/login", Some(Verb::Post));
        assert!(matches!(result, Err(Error::InvalidCredentials)));
    }

    #[test]
    fn test_passwordless_account_accepts_anything() {
        let (store, hasher) = setup();
        store
            .create_user(&User {
                name: "demo".to_string(),
                salt: Vec::new(),
                password_hash: Vec::new(),
                is_manager: true,
            })
            .unwrap();

        for password in ["", "anything"] {
            let creds = Credentials::new("demo", password);
            let principal =
                authenticate(&store, &hasher, Some(&creds), "/projects", Some(Verb::Get)).unwrap();
            assert_eq!(principal.name, "demo");
        }
    }
}

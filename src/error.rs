use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("not found")]
    NotFound,

    #[error("already exists")]
    AlreadyExists,

    #[error("no credentials")]
    NoCredentials,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid resource")]
    InvalidResource,

    #[error("forbidden")]
    Forbidden,

    #[error("invalid body: {0}")]
    InvalidBody(String),

    #[error("invalid method")]
    InvalidMethod,
}

/// Coarse classification of an [`Error`], one per externally visible outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoCredentials,
    InvalidCredentials,
    InvalidResource,
    Forbidden,
    InvalidBody,
    InvalidMethod,
    StoreFailure,
}

impl Error {
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Error::InvalidBody(message.into())
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoCredentials => ErrorKind::NoCredentials,
            Error::InvalidCredentials => ErrorKind::InvalidCredentials,
            Error::InvalidResource => ErrorKind::InvalidResource,
            Error::Forbidden => ErrorKind::Forbidden,
            Error::InvalidBody(_) => ErrorKind::InvalidBody,
            Error::InvalidMethod => ErrorKind::InvalidMethod,
            Error::Database(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Config(_)
            | Error::PasswordHash(_)
            | Error::NotFound
            | Error::AlreadyExists => ErrorKind::StoreFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

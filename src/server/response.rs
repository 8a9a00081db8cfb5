use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::{Error, ErrorKind};
use crate::resource::Reply;

/// API error that converts to a proper HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err.kind() {
            ErrorKind::NoCredentials => StatusCode::UNAUTHORIZED,
            ErrorKind::InvalidCredentials | ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::InvalidResource => StatusCode::NOT_FOUND,
            ErrorKind::InvalidBody => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::StoreFailure => {
                tracing::error!("Request failed: {err}");
                return Self::internal("Internal server error");
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "data": null, "error": self.message });
        let mut response = (self.status, Json(body)).into_response();

        if self.status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"mel\""),
            );
        }

        response
    }
}

/// Renders a successful operation. Bodies are sent bare, without the error
/// envelope.
pub fn reply_response(reply: Reply) -> Response {
    match reply {
        Reply::Empty => StatusCode::OK.into_response(),
        Reply::Body(body) => (StatusCode::OK, Json(body)).into_response(),
        Reply::Created { location, body } => {
            let mut response = (StatusCode::CREATED, Json(body)).into_response();
            match HeaderValue::from_str(&location) {
                Ok(value) => {
                    response.headers_mut().insert(header::LOCATION, value);
                }
                Err(e) => tracing::warn!("Unrepresentable location {location:?}: {e}"),
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (Error::NoCredentials, StatusCode::UNAUTHORIZED),
            (Error::InvalidCredentials, StatusCode::FORBIDDEN),
            (Error::Forbidden, StatusCode::FORBIDDEN),
            (Error::InvalidResource, StatusCode::NOT_FOUND),
            (Error::invalid_body("bad"), StatusCode::BAD_REQUEST),
            (Error::InvalidMethod, StatusCode::METHOD_NOT_ALLOWED),
            (Error::NotFound, StatusCode::INTERNAL_SERVER_ERROR),
            (
                Error::Config("oops".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_store_failure_message_is_generic() {
        let err = ApiError::from(Error::Database(rusqlite::Error::InvalidQuery));
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn test_unauthorized_carries_challenge() {
        let response = ApiError::from(Error::NoCredentials).into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"mel\""
        );

        let response = ApiError::from(Error::Forbidden).into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_created_sets_location() {
        let response = reply_response(Reply::Created {
            location: "/projects/7".to_string(),
            body: json!({"Id": 7}),
        });
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/projects/7");
    }
}

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use tracing::error;

use crate::client::ClientError;

/// Errors produced while forwarding a call to the book API.
#[derive(Debug)]
pub enum ProxyError {
    /// Relay the upstream status and body untouched.
    Upstream { status: StatusCode, body: String },
    /// Answer locally with `{"error": ...}`.
    Local { status: StatusCode, message: String },
}

impl ProxyError {
    pub fn local(status: StatusCode, message: impl Into<String>) -> Self {
        ProxyError::Local { status, message: message.into() }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::Upstream { status, body } => {
                (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
            ProxyError::Local { status, message } => {
                (status, Json(ErrorBody::new(message))).into_response()
            }
        }
    }
}

impl From<ClientError> for ProxyError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Status { status, body } => {
                // reqwest and axum share the same `http` crate version
                ProxyError::Upstream { status, body }
            }
            other => {
                error!(error = %other, "book api unreachable");
                ProxyError::local(StatusCode::BAD_GATEWAY, other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn upstream_status_is_relayed() {
        let e = ProxyError::from(ClientError::Status {
            status: StatusCode::NOT_FOUND,
            body: r#"{"error":"Book not found"}"#.into(),
        });
        let res = e.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn timeouts_become_bad_gateway() {
        let e = ProxyError::from(ClientError::Timeout(Duration::from_millis(5)));
        assert_eq!(e.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}

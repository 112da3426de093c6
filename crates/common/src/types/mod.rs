use serde::{Deserialize, Serialize};

/// Liveness payload returned by `/health`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: String,
    pub message: String,
    pub build_number: String,
}

impl Health {
    pub fn up(build_number: impl Into<String>) -> Self {
        Self {
            status: "OK".into(),
            message: "Service is up and running".into(),
            build_number: build_number.into(),
        }
    }
}

/// JSON error body: `{"error": "..."}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

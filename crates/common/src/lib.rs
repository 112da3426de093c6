//! Plumbing shared by the backend and the front-end server:
//! logging setup, wire types, body extraction, Prometheus metrics and startup checks.

pub mod types;
pub mod utils;
pub mod env;
pub mod extract;
pub mod metrics;
pub mod shutdown;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_build_number_in_camel_case() {
        let h = types::Health::up("42");
        let v = serde_json::to_value(&h).expect("serialize health");
        assert_eq!(v["status"], "OK");
        assert_eq!(v["message"], "Service is up and running");
        assert_eq!(v["buildNumber"], "42");
    }
}

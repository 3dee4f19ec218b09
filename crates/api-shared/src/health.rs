use crate::types::HealthRes;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "cavi-async-calculator";

/// Service version reported by the health endpoint.
pub const SERVICE_VERSION: &str = "1.0.0";

/// Health service for the calculator APIs.
///
/// The calculator is stateless, so being able to answer is the whole health check.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` with status `ok`, the service name and version.
    pub fn check_health() -> HealthRes {
        HealthRes {
            status: "ok".into(),
            service: SERVICE_NAME.into(),
            version: SERVICE_VERSION.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health_body() {
        let body = serde_json::to_value(HealthService::check_health()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "status": "ok",
                "service": "cavi-async-calculator",
                "version": "1.0.0"
            })
        );
    }
}

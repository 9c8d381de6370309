use crate::types::HealthRes;

/// Simple health service shared by the REST API and the workspace binary.
///
/// This service provides a standardised way to check that the Ausome assistant is running.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Static method to check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Ausome assistant is alive".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_health_reports_ok() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert_eq!(res.message, "Ausome assistant is alive");
    }
}

use crate::dto::HealthRes;

/// Plaintext body served on `/`, kept for clients that probe it.
pub const LIVENESS_TEXT: &str = "HEELLLO WORLD";

/// Simple health service shared by the API binaries
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "docstore is alive".into(),
        }
    }

    /// Body of the plaintext liveness probe on `/`.
    pub fn liveness_text() -> &'static str {
        LIVENESS_TEXT
    }
}

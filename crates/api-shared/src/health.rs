use crate::dto::HealthRes;

/// Health service shared by the REST binary and its tests.
///
/// Reports liveness of this process only. Collaborators are not contacted, so a healthy answer
/// says nothing about Metax or the workflow engine.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Static method to check health without creating an instance.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "research-rest-api is alive".into(),
        }
    }
}

//! Input and settings types for the RunCouncil use case.

use council_domain::{BackendId, DomainError, ImagePayload, RefinerMapping};
use std::time::Duration;

/// Input for one council run
#[derive(Debug, Clone)]
pub struct RunCouncilInput {
    /// The task query.
    pub query: String,
    /// Optional image payload (bytes, URL, or both).
    pub image: Option<ImagePayload>,
}

impl RunCouncilInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }
}

/// Backend composition and failure policy for a council
#[derive(Debug, Clone)]
pub struct CouncilSettings {
    /// First-tier backends queried in Stage 1, in order.
    pub members: Vec<BackendId>,
    /// The judge backend invoked in Stage 3.
    pub chairman: BackendId,
    /// How Stage-1 drafts map onto Stage-2 refiners.
    pub refiners: RefinerMapping,
    /// Per-attempt timeout for every backend call.
    pub timeout: Duration,
    /// Retry budget (total attempts) for every backend call.
    pub retries: u32,
}

impl CouncilSettings {
    pub fn new(members: Vec<BackendId>, chairman: BackendId) -> Self {
        Self {
            members,
            chairman,
            refiners: RefinerMapping::default(),
            timeout: council_domain::DEFAULT_TIMEOUT,
            retries: council_domain::DEFAULT_RETRIES,
        }
    }

    pub fn with_refiners(mut self, refiners: RefinerMapping) -> Self {
        self.refiners = refiners;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Reject configurations that cannot produce a run at all.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.members.is_empty() {
            return Err(DomainError::NoBackends);
        }
        if let RefinerMapping::CrossProduct { refiners } = &self.refiners
            && refiners.is_empty()
        {
            return Err(DomainError::InvalidBackend(
                "cross-product refiner list is empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_members() {
        let settings = CouncilSettings::new(vec![], BackendId::new("judge"));
        assert!(matches!(settings.validate(), Err(DomainError::NoBackends)));
    }

    #[test]
    fn test_validate_rejects_empty_cross_product() {
        let settings = CouncilSettings::new(vec![BackendId::new("a")], BackendId::new("judge"))
            .with_refiners(RefinerMapping::cross_product(vec![]));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_default_policy_knobs() {
        let settings = CouncilSettings::new(vec![BackendId::new("a")], BackendId::new("judge"));
        assert_eq!(settings.retries, 3);
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert!(settings.validate().is_ok());
    }
}

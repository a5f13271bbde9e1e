//! Community lookup for connection handshakes and frame handling.

use studyhall_database::{Community, CommunityRepository, CommunityResult};

/// Read-side access to communities.
///
/// Membership lives behind the persistence gateway and is read by the
/// fan-out orchestrator only; this service resolves room slugs for the
/// chat handler.
pub struct CommunityService {
    communities: CommunityRepository,
}

impl CommunityService {
    pub fn new(communities: CommunityRepository) -> Self {
        Self { communities }
    }

    pub async fn find_by_slug(&self, slug: &str) -> CommunityResult<Option<Community>> {
        self.communities.find_by_slug(slug).await
    }
}

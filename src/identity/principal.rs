use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// The authenticated actor for one inbound request plus the organizations it
/// may act on behalf of. Constructed once per request, immutable, never
/// shared across requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub current_user_id: Uuid,
    #[serde(default)]
    pub available_organization_ids: HashSet<Uuid>,
}

impl Principal {
    pub fn new(current_user_id: Uuid, organizations: impl IntoIterator<Item = Uuid>) -> Self {
        Self { current_user_id, available_organization_ids: organizations.into_iter().collect() }
    }

    pub fn acts_for(&self, organization_id: Uuid) -> bool {
        self.available_organization_ids.contains(&organization_id)
    }

    /// Origin-based delegation: a grant attributed to an origin the principal
    /// controls counts as a grant to the principal. A user's own id doubles
    /// as its controlling origin (the same convention used when the service
    /// mints comments and ACL entries on the user's behalf).
    pub fn controls_origin(&self, origin_id: Uuid) -> bool {
        origin_id == self.current_user_id
    }
}

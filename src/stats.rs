//!
//! Object statistics aggregation
//! -----------------------------
//! Per-fact-type counts and recency for one Object, restricted to the Facts
//! the requesting principal may read. The scan itself is delegated to the
//! `FactSearch` collaborator with the principal's identity embedded in the
//! criteria, so the access predicate runs inside the index instead of as a
//! post-filter. Statistics are recomputed per query and never persisted.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::identity::Principal;
use crate::storage::FactSearch;

/// Aggregate for one fact type contributing to an Object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactTypeStatistic {
    pub count: u64,
    pub last_added_timestamp: i64,
    pub last_seen_timestamp: i64,
}

/// Derived per-query view: fact type id to its aggregate. BTreeMap keeps the
/// serialized form stable.
pub type ObjectStatistics = BTreeMap<Uuid, FactTypeStatistic>;

/// Query handed to the search collaborator. Carries the principal's identity
/// so the index can apply the read-access predicate during the scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStatisticsCriteria {
    pub object_id: Uuid,
    pub current_user_id: Uuid,
    #[serde(default)]
    pub available_organization_ids: HashSet<Uuid>,
}

impl ObjectStatisticsCriteria {
    pub fn for_principal(object_id: Uuid, principal: &Principal) -> Self {
        Self {
            object_id,
            current_user_id: principal.current_user_id,
            available_organization_ids: principal.available_organization_ids.clone(),
        }
    }

    /// Reconstruct the principal the criteria was built from; the reference
    /// search implementation evaluates `can_read` against this.
    pub fn principal(&self) -> Principal {
        Principal {
            current_user_id: self.current_user_id,
            available_organization_ids: self.available_organization_ids.clone(),
        }
    }
}

/// Computes per-fact-type statistics for an Object on behalf of a principal.
#[derive(Clone)]
pub struct ObjectStatisticsAggregator {
    search: Arc<dyn FactSearch>,
}

impl ObjectStatisticsAggregator {
    pub fn new(search: Arc<dyn FactSearch>) -> Self {
        Self { search }
    }

    /// An Object with no readable Facts yields an empty mapping, not an error.
    pub fn compute(&self, object_id: Uuid, principal: &Principal) -> anyhow::Result<ObjectStatistics> {
        let criteria = ObjectStatisticsCriteria::for_principal(object_id, principal);
        debug!(target: "factum::stats", "object statistics object={} user={}", object_id, criteria.current_user_id);
        self.search.object_statistics(&criteria)
    }
}

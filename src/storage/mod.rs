//!
//! factum storage collaborators
//! ----------------------------
//! Abstract contracts for the two external collaborators this core consumes:
//! keyed record retrieval/storage (`GraphStore`) and the search index used for
//! statistics aggregation (`FactSearch`). The physical engines behind them are
//! out of scope here; both are treated as synchronous and as the single source
//! of truth at call time (no in-core caching).
//!
//! `MemoryStore` is the in-tree reference implementation backing the test
//! suite; it applies the same `identity::access::can_read` predicate at the
//! "index" level that the in-process gate uses, keeping the two evaluations of
//! the access predicate one shared definition.

use uuid::Uuid;

use crate::model::{FactCommentRecord, FactRecord, ObjectRecord};
use crate::stats::{ObjectStatistics, ObjectStatisticsCriteria};

mod memory;

pub use memory::MemoryStore;

/// Keyed retrieval and storage of raw records.
///
/// Lookup misses surface as `Ok(None)`, never as errors; errors are reserved
/// for collaborator failures and propagate unchanged.
pub trait GraphStore: Send + Sync {
    fn fact(&self, id: Uuid) -> anyhow::Result<Option<FactRecord>>;

    fn object(&self, id: Uuid) -> anyhow::Result<Option<ObjectRecord>>;

    /// Resolve an object-type name to its id.
    fn object_type_id(&self, name: &str) -> anyhow::Result<Option<Uuid>>;

    /// Fetch an Object by its type and value, the graph's natural key.
    fn object_by_type_value(&self, type_id: Uuid, value: &str) -> anyhow::Result<Option<ObjectRecord>>;

    /// Append a comment to a Fact and return the stored record. The sole
    /// mutating operation in this core; mints nothing itself (id and
    /// timestamp arrive on `comment`) and is not idempotent on retry.
    fn store_fact_comment(&self, fact: &FactRecord, comment: FactCommentRecord) -> anyhow::Result<FactCommentRecord>;

    fn fact_comments(&self, fact_id: Uuid) -> anyhow::Result<Vec<FactCommentRecord>>;
}

/// Criteria-based aggregation over the fact index. Implementations must apply
/// a read-access predicate equivalent to `identity::access::can_read` for the
/// principal carried in the criteria; the predicate is pushed down rather than
/// post-filtered because the fact set for a busy Object may be large.
pub trait FactSearch: Send + Sync {
    fn object_statistics(&self, criteria: &ObjectStatisticsCriteria) -> anyhow::Result<ObjectStatistics>;
}

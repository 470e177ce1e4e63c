//! In-memory reference implementation of the storage and search collaborators.
//! Backs the test suite and doubles as the executable definition of the
//! collaborator contracts: misses are `Ok(None)`, comment storage is
//! append-only, and the statistics scan applies the same `can_read` predicate
//! the in-process gate uses.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::identity::{access, ObjectFactSource};
use crate::model::{FactCommentRecord, FactRecord, ObjectRecord};
use crate::resolvers::Directory;
use crate::stats::{FactTypeStatistic, ObjectStatistics, ObjectStatisticsCriteria};

use super::{FactSearch, GraphStore};

#[derive(Default)]
struct State {
    facts: HashMap<Uuid, FactRecord>,
    objects: HashMap<Uuid, ObjectRecord>,
    fact_types: HashMap<Uuid, String>,
    object_types: HashMap<Uuid, String>,
    organizations: HashMap<Uuid, String>,
    origins: HashMap<Uuid, String>,
    subjects: HashMap<Uuid, String>,
}

/// Thread-safe in-memory store over a single locked state map. Clones share
/// the underlying state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_fact(&self, fact: FactRecord) {
        self.state.write().facts.insert(fact.id, fact);
    }

    pub fn put_object(&self, object: ObjectRecord) {
        self.state.write().objects.insert(object.id, object);
    }

    pub fn put_fact_type(&self, id: Uuid, name: impl Into<String>) {
        self.state.write().fact_types.insert(id, name.into());
    }

    pub fn put_object_type(&self, id: Uuid, name: impl Into<String>) {
        self.state.write().object_types.insert(id, name.into());
    }

    pub fn put_organization(&self, id: Uuid, name: impl Into<String>) {
        self.state.write().organizations.insert(id, name.into());
    }

    pub fn put_origin(&self, id: Uuid, name: impl Into<String>) {
        self.state.write().origins.insert(id, name.into());
    }

    pub fn put_subject(&self, id: Uuid, name: impl Into<String>) {
        self.state.write().subjects.insert(id, name.into());
    }
}

fn binds_object(fact: &FactRecord, object_id: Uuid) -> bool {
    fact.source_object_id == Some(object_id) || fact.destination_object_id == Some(object_id)
}

impl GraphStore for MemoryStore {
    fn fact(&self, id: Uuid) -> anyhow::Result<Option<FactRecord>> {
        Ok(self.state.read().facts.get(&id).cloned())
    }

    fn object(&self, id: Uuid) -> anyhow::Result<Option<ObjectRecord>> {
        Ok(self.state.read().objects.get(&id).cloned())
    }

    fn object_type_id(&self, name: &str) -> anyhow::Result<Option<Uuid>> {
        let state = self.state.read();
        Ok(state.object_types.iter().find(|(_, n)| n.as_str() == name).map(|(id, _)| *id))
    }

    fn object_by_type_value(&self, type_id: Uuid, value: &str) -> anyhow::Result<Option<ObjectRecord>> {
        let state = self.state.read();
        Ok(state.objects.values().find(|o| o.type_id == type_id && o.value == value).cloned())
    }

    fn store_fact_comment(&self, fact: &FactRecord, comment: FactCommentRecord) -> anyhow::Result<FactCommentRecord> {
        let mut state = self.state.write();
        let Some(stored_fact) = state.facts.get_mut(&fact.id) else {
            anyhow::bail!("cannot store comment: fact {} is not stored", fact.id);
        };
        stored_fact.comments.push(comment.clone());
        info!(target: "factum::storage", "comment appended fact={} comment={}", fact.id, comment.id);
        Ok(comment)
    }

    fn fact_comments(&self, fact_id: Uuid) -> anyhow::Result<Vec<FactCommentRecord>> {
        Ok(self.state.read().facts.get(&fact_id).map(|f| f.comments.clone()).unwrap_or_default())
    }
}

impl FactSearch for MemoryStore {
    fn object_statistics(&self, criteria: &ObjectStatisticsCriteria) -> anyhow::Result<ObjectStatistics> {
        let principal = criteria.principal();
        let state = self.state.read();
        let mut out = ObjectStatistics::new();
        for fact in state.facts.values() {
            if !binds_object(fact, criteria.object_id) {
                continue;
            }
            // Identical predicate to the in-process gate, applied at scan time.
            if !access::can_read(&principal, fact) {
                continue;
            }
            let entry = out.entry(fact.type_id).or_insert(FactTypeStatistic {
                count: 0,
                last_added_timestamp: i64::MIN,
                last_seen_timestamp: i64::MIN,
            });
            entry.count += 1;
            entry.last_added_timestamp = entry.last_added_timestamp.max(fact.timestamp);
            entry.last_seen_timestamp = entry.last_seen_timestamp.max(fact.last_seen_timestamp);
        }
        Ok(out)
    }
}

impl ObjectFactSource for MemoryStore {
    fn facts_bound_to(&self, object_id: Uuid) -> anyhow::Result<Vec<FactRecord>> {
        let state = self.state.read();
        Ok(state.facts.values().filter(|f| binds_object(f, object_id)).cloned().collect())
    }
}

impl Directory for MemoryStore {
    fn subject_name(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        Ok(self.state.read().subjects.get(&id).cloned())
    }

    fn organization_name(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        Ok(self.state.read().organizations.get(&id).cloned())
    }

    fn origin_name(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        Ok(self.state.read().origins.get(&id).cloned())
    }

    fn fact_type_name(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        Ok(self.state.read().fact_types.get(&id).cloned())
    }

    fn object_type_name(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        Ok(self.state.read().object_types.get(&id).cloned())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod memory_tests;

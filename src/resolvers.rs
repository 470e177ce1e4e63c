//!
//! Identity snapshot resolvers
//! ---------------------------
//! Resolve opaque identifiers (subject, organization, origin, fact/object
//! type, fact, object) into small denormalized info snapshots for embedding in
//! responses and emitted events. Snapshots are produced fresh per call; there
//! is no cache and no shared mutable state.
//!
//! Absence propagates: a `None` id resolves to `None`. A non-null id that no
//! longer resolves upstream produces a placeholder snapshot flagged
//! `unresolved` carrying just the id, so a record remains convertible even
//! after a referenced identity has been deleted. Resolution of nested records
//! (Fact, Object) is deliberately shallow, one level deep, which bounds
//! response size regardless of graph depth.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::storage::GraphStore;

/// Placeholder name carried by unresolved snapshots.
pub const UNRESOLVED_NAME: &str = "N/A";

/// Name lookups for the identities a record may reference. Misses are
/// `Ok(None)`; errors are collaborator failures.
pub trait Directory: Send + Sync {
    fn subject_name(&self, id: Uuid) -> anyhow::Result<Option<String>>;
    fn organization_name(&self, id: Uuid) -> anyhow::Result<Option<String>>;
    fn origin_name(&self, id: Uuid) -> anyhow::Result<Option<String>>;
    fn fact_type_name(&self, id: Uuid) -> anyhow::Result<Option<String>>;
    fn object_type_name(&self, id: Uuid) -> anyhow::Result<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub unresolved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub unresolved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub unresolved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub unresolved: bool,
}

/// Shallow view of a referenced Fact: id, type and value only, no recursion
/// into its own references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactInfo {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub fact_type: Option<TypeInfo>,
    pub value: String,
    #[serde(default)]
    pub unresolved: bool,
}

/// Shallow view of a referenced Object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub object_type: Option<TypeInfo>,
    pub value: String,
    #[serde(default)]
    pub unresolved: bool,
}

/// Resolves identifiers against the directory and store collaborators.
/// Pure function of the identifier at call time; cheap to clone.
#[derive(Clone)]
pub struct SnapshotResolver {
    directory: Arc<dyn Directory>,
    store: Arc<dyn GraphStore>,
}

impl SnapshotResolver {
    pub fn new(directory: Arc<dyn Directory>, store: Arc<dyn GraphStore>) -> Self {
        Self { directory, store }
    }

    pub fn subject_of(&self, id: Uuid) -> anyhow::Result<SubjectInfo> {
        Ok(match self.directory.subject_name(id)? {
            Some(name) => SubjectInfo { id, name, unresolved: false },
            None => SubjectInfo { id, name: UNRESOLVED_NAME.into(), unresolved: true },
        })
    }

    pub fn subject(&self, id: Option<Uuid>) -> anyhow::Result<Option<SubjectInfo>> {
        id.map(|id| self.subject_of(id)).transpose()
    }

    pub fn organization_of(&self, id: Uuid) -> anyhow::Result<OrganizationInfo> {
        Ok(match self.directory.organization_name(id)? {
            Some(name) => OrganizationInfo { id, name, unresolved: false },
            None => OrganizationInfo { id, name: UNRESOLVED_NAME.into(), unresolved: true },
        })
    }

    pub fn organization(&self, id: Option<Uuid>) -> anyhow::Result<Option<OrganizationInfo>> {
        id.map(|id| self.organization_of(id)).transpose()
    }

    pub fn origin_of(&self, id: Uuid) -> anyhow::Result<OriginInfo> {
        Ok(match self.directory.origin_name(id)? {
            Some(name) => OriginInfo { id, name, unresolved: false },
            None => OriginInfo { id, name: UNRESOLVED_NAME.into(), unresolved: true },
        })
    }

    pub fn origin(&self, id: Option<Uuid>) -> anyhow::Result<Option<OriginInfo>> {
        id.map(|id| self.origin_of(id)).transpose()
    }

    pub fn fact_type_of(&self, id: Uuid) -> anyhow::Result<TypeInfo> {
        Ok(match self.directory.fact_type_name(id)? {
            Some(name) => TypeInfo { id, name, unresolved: false },
            None => TypeInfo { id, name: UNRESOLVED_NAME.into(), unresolved: true },
        })
    }

    pub fn object_type_of(&self, id: Uuid) -> anyhow::Result<TypeInfo> {
        Ok(match self.directory.object_type_name(id)? {
            Some(name) => TypeInfo { id, name, unresolved: false },
            None => TypeInfo { id, name: UNRESOLVED_NAME.into(), unresolved: true },
        })
    }

    /// Shallow Fact resolution: the referenced Fact's id, type and value.
    /// A Fact that is gone from storage resolves to an unresolved placeholder.
    pub fn fact(&self, id: Option<Uuid>) -> anyhow::Result<Option<FactInfo>> {
        let Some(id) = id else { return Ok(None) };
        Ok(Some(match self.store.fact(id)? {
            Some(record) => FactInfo {
                id,
                fact_type: Some(self.fact_type_of(record.type_id)?),
                value: record.value,
                unresolved: false,
            },
            None => FactInfo { id, fact_type: None, value: String::new(), unresolved: true },
        }))
    }

    /// Shallow Object resolution, same contract as `fact`.
    pub fn object(&self, id: Option<Uuid>) -> anyhow::Result<Option<ObjectInfo>> {
        let Some(id) = id else { return Ok(None) };
        Ok(Some(match self.store.object(id)? {
            Some(record) => ObjectInfo {
                id,
                object_type: Some(self.object_type_of(record.type_id)?),
                value: record.value,
                unresolved: false,
            },
            None => ObjectInfo { id, object_type: None, value: String::new(), unresolved: true },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn resolver(store: &MemoryStore) -> SnapshotResolver {
        SnapshotResolver::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[test]
    fn null_id_resolves_to_none() {
        let store = MemoryStore::new();
        let r = resolver(&store);
        assert!(r.subject(None).unwrap().is_none());
        assert!(r.organization(None).unwrap().is_none());
        assert!(r.origin(None).unwrap().is_none());
        assert!(r.fact(None).unwrap().is_none());
        assert!(r.object(None).unwrap().is_none());
    }

    #[test]
    fn unknown_id_resolves_to_placeholder_with_same_id() {
        let store = MemoryStore::new();
        let r = resolver(&store);
        let id = Uuid::new_v4();

        let subject = r.subject(Some(id)).unwrap().unwrap();
        assert_eq!(subject.id, id);
        assert!(subject.unresolved);
        assert_eq!(subject.name, UNRESOLVED_NAME);

        let fact = r.fact(Some(id)).unwrap().unwrap();
        assert_eq!(fact.id, id);
        assert!(fact.unresolved);
        assert!(fact.fact_type.is_none());
    }

    #[test]
    fn known_id_resolves_to_named_snapshot() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store.put_organization(id, "ACME CERT");
        let r = resolver(&store);

        let org = r.organization(Some(id)).unwrap().unwrap();
        assert_eq!(org.name, "ACME CERT");
        assert!(!org.unresolved);
    }
}

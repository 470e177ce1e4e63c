//!
//! factum record model
//! -------------------
//! Typed records of the fact graph as handed over by the storage
//! collaborator: Facts (assertions, optionally binding one or two Objects),
//! Objects (entity nodes) and Fact comments. Access-control metadata lives on
//! the Fact record; the `AccessControlled` trait is the seam the decision
//! engine in `identity::access` evaluates against.
//!
//! All identifiers are UUIDs and all timestamps are epoch milliseconds.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Current time in epoch milliseconds; the timestamp convention used on all records.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Policy governing who may read a record.
///
/// This is a closed vocabulary on purpose: every consumer matches
/// exhaustively, so introducing a new mode is a compile-time failure at each
/// decision site rather than a silently-permissive default branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    /// Readable by every principal.
    Public,
    /// Readable by principals acting for the record's owning organization.
    RoleBased,
    /// Readable only by subjects on the record's ACL (or its author).
    Explicit,
}

/// Behavioral flags carried on a Fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactFlag {
    /// A retraction Fact exists for this Fact somewhere in the graph.
    RetractedHint,
}

/// One entry of a Fact's access-control ledger: a grant of read access to a
/// subject, optionally attributed to the origin that delegated it.
/// Entries are append-only and never edited once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    pub id: Uuid,
    pub subject_id: Uuid,
    #[serde(default)]
    pub origin_id: Option<Uuid>,
    pub timestamp: i64,
}

/// A typed assertion in the graph.
///
/// Binding invariant: zero, one or two of `source_object_id` /
/// `destination_object_id` may be set; `bidirectional_binding` is only
/// meaningful when both endpoints are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactRecord {
    pub id: Uuid,
    pub type_id: Uuid,
    pub value: String,
    /// Fact this one is asserted in reference to, if any.
    #[serde(default)]
    pub in_reference_to_id: Option<Uuid>,
    /// Owning organization. Required for RoleBased access to grant anything.
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    /// Provenance: the source system that introduced the Fact.
    #[serde(default)]
    pub origin_id: Option<Uuid>,
    pub added_by_id: Uuid,
    pub access_mode: AccessMode,
    /// Confidence in [0,1] assigned at creation.
    pub confidence: f32,
    /// Trust in [0,1] derived from the origin.
    pub trust: f32,
    pub timestamp: i64,
    pub last_seen_timestamp: i64,
    #[serde(default)]
    pub source_object_id: Option<Uuid>,
    #[serde(default)]
    pub destination_object_id: Option<Uuid>,
    #[serde(default)]
    pub bidirectional_binding: bool,
    #[serde(default)]
    pub flags: HashSet<FactFlag>,
    #[serde(default)]
    pub acl: Vec<AclEntry>,
    #[serde(default)]
    pub comments: Vec<FactCommentRecord>,
}

impl FactRecord {
    /// Minimal well-formed Fact; remaining fields take their defaults and can
    /// be set directly (all fields are public).
    pub fn new(id: Uuid, type_id: Uuid, value: impl Into<String>, added_by_id: Uuid, access_mode: AccessMode) -> Self {
        let now = now_ms();
        Self {
            id,
            type_id,
            value: value.into(),
            in_reference_to_id: None,
            organization_id: None,
            origin_id: None,
            added_by_id,
            access_mode,
            confidence: 1.0,
            trust: 1.0,
            timestamp: now,
            last_seen_timestamp: now,
            source_object_id: None,
            destination_object_id: None,
            bidirectional_binding: false,
            flags: HashSet::new(),
            acl: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// True when the binding arity is consistent with the stored endpoints.
    pub fn binding_is_valid(&self) -> bool {
        if self.bidirectional_binding {
            self.source_object_id.is_some() && self.destination_object_id.is_some()
        } else {
            true
        }
    }

    pub fn is_retracted_hint(&self) -> bool {
        self.flags.contains(&FactFlag::RetractedHint)
    }
}

/// A typed entity node in the graph. Objects carry no ACL of their own;
/// readability is derived from the Facts bound to them (see
/// `identity::context`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: Uuid,
    pub type_id: Uuid,
    pub value: String,
}

impl ObjectRecord {
    pub fn new(id: Uuid, type_id: Uuid, value: impl Into<String>) -> Self {
        Self { id, type_id, value: value.into() }
    }
}

/// An append-only comment on a Fact. `origin_id` is the authoring subject;
/// comments are never edited or deleted by this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCommentRecord {
    pub id: Uuid,
    /// Must reference an existing comment on the same Fact when set.
    #[serde(default)]
    pub reply_to_id: Option<Uuid>,
    pub origin_id: Uuid,
    pub comment: String,
    pub timestamp: i64,
}

/// Seam between records and the access-control decision engine. Anything the
/// engine can gate exposes its access mode, owning organization, authoring
/// subject and ACL ledger through this trait.
pub trait AccessControlled {
    fn access_mode(&self) -> AccessMode;
    fn organization_id(&self) -> Option<Uuid>;
    fn authoring_subject_id(&self) -> Option<Uuid>;
    fn acl(&self) -> &[AclEntry];
}

impl AccessControlled for FactRecord {
    fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    fn organization_id(&self) -> Option<Uuid> {
        self.organization_id
    }

    fn authoring_subject_id(&self) -> Option<Uuid> {
        Some(self.added_by_id)
    }

    fn acl(&self) -> &[AclEntry] {
        &self.acl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_arity() {
        let user = Uuid::new_v4();
        let mut f = FactRecord::new(Uuid::new_v4(), Uuid::new_v4(), "mentions", user, AccessMode::Public);
        assert!(f.binding_is_valid());
        f.bidirectional_binding = true;
        // Bidirectional with no endpoints is inconsistent
        assert!(!f.binding_is_valid());
        f.source_object_id = Some(Uuid::new_v4());
        assert!(!f.binding_is_valid());
        f.destination_object_id = Some(Uuid::new_v4());
        assert!(f.binding_is_valid());
    }

    #[test]
    fn fact_record_serde_roundtrip_defaults_optional_fields() {
        let user = Uuid::new_v4();
        let f = FactRecord::new(Uuid::new_v4(), Uuid::new_v4(), "resolvesTo", user, AccessMode::RoleBased);
        let json = serde_json::to_string(&f).unwrap();
        let back: FactRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, f.id);
        assert_eq!(back.access_mode, AccessMode::RoleBased);
        assert!(back.acl.is_empty());
        assert!(back.comments.is_empty());
    }
}

//!
//! Response converters
//! -------------------
//! Turn raw records into fully-resolved, immutable snapshots for external
//! consumption (API responses, event emission). Converters perform no
//! authorization: the caller must already have authorized the record, which
//! keeps them safely reusable for batch export where the check ran once
//! upstream. Every referenced identifier is resolved through
//! `SnapshotResolver`, so a snapshot is self-contained: no foreign keys leak
//! across the trust boundary, only denormalized info snapshots.
//!
//! Access modes and flags are shared closed enums between record and
//! snapshot; schema drift between the two layers is a compile-time
//! exhaustiveness failure rather than a runtime coercion.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AccessMode, AclEntry, FactCommentRecord, FactFlag, FactRecord, ObjectRecord};
use crate::resolvers::{FactInfo, ObjectInfo, OrganizationInfo, OriginInfo, SnapshotResolver, SubjectInfo, TypeInfo};
use crate::stats::ObjectStatistics;

/// One resolved ACL ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntrySnapshot {
    pub id: Uuid,
    pub subject: SubjectInfo,
    #[serde(default)]
    pub origin: Option<OriginInfo>,
    pub timestamp: i64,
}

/// Fully-resolved view of a Fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactSnapshot {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub fact_type: TypeInfo,
    pub value: String,
    #[serde(default)]
    pub in_reference_to: Option<FactInfo>,
    #[serde(default)]
    pub organization: Option<OrganizationInfo>,
    #[serde(default)]
    pub origin: Option<OriginInfo>,
    pub added_by: SubjectInfo,
    pub access_mode: AccessMode,
    pub trust: f32,
    pub confidence: f32,
    pub timestamp: i64,
    pub last_seen_timestamp: i64,
    #[serde(default)]
    pub source_object: Option<ObjectInfo>,
    #[serde(default)]
    pub destination_object: Option<ObjectInfo>,
    #[serde(default)]
    pub bidirectional_binding: bool,
    #[serde(default)]
    pub flags: Vec<FactFlag>,
    #[serde(default)]
    pub acl: Vec<AclEntrySnapshot>,
}

/// Per-fact-type statistics entry embedded in an Object snapshot, with the
/// fact type resolved to its info snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStatisticSnapshot {
    pub fact_type: TypeInfo,
    pub count: u64,
    pub last_added_timestamp: i64,
    pub last_seen_timestamp: i64,
}

/// Fully-resolved view of an Object plus its per-query statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSnapshot {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub object_type: TypeInfo,
    pub value: String,
    #[serde(default)]
    pub statistics: Vec<ObjectStatisticSnapshot>,
}

/// Resolved view of a Fact comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSnapshot {
    pub id: Uuid,
    #[serde(default)]
    pub reply_to_id: Option<Uuid>,
    pub origin: OriginInfo,
    pub comment: String,
    pub timestamp: i64,
}

/// Converts Fact records into snapshots.
#[derive(Clone)]
pub struct FactConverter {
    resolver: SnapshotResolver,
}

impl FactConverter {
    pub fn new(resolver: SnapshotResolver) -> Self {
        Self { resolver }
    }

    pub fn convert(&self, record: &FactRecord) -> anyhow::Result<FactSnapshot> {
        Ok(FactSnapshot {
            id: record.id,
            fact_type: self.resolver.fact_type_of(record.type_id)?,
            value: record.value.clone(),
            in_reference_to: self.resolver.fact(record.in_reference_to_id)?,
            organization: self.resolver.organization(record.organization_id)?,
            origin: self.resolver.origin(record.origin_id)?,
            added_by: self.resolver.subject_of(record.added_by_id)?,
            access_mode: record.access_mode,
            trust: record.trust,
            confidence: record.confidence,
            timestamp: record.timestamp,
            last_seen_timestamp: record.last_seen_timestamp,
            source_object: self.resolver.object(record.source_object_id)?,
            destination_object: self.resolver.object(record.destination_object_id)?,
            bidirectional_binding: record.bidirectional_binding,
            flags: record.flags.iter().copied().collect(),
            acl: record.acl.iter().map(|e| self.convert_acl_entry(e)).collect::<anyhow::Result<_>>()?,
        })
    }

    fn convert_acl_entry(&self, entry: &AclEntry) -> anyhow::Result<AclEntrySnapshot> {
        Ok(AclEntrySnapshot {
            id: entry.id,
            subject: self.resolver.subject_of(entry.subject_id)?,
            origin: self.resolver.origin(entry.origin_id)?,
            timestamp: entry.timestamp,
        })
    }
}

/// Converts Object records (plus their computed statistics) into snapshots.
#[derive(Clone)]
pub struct ObjectConverter {
    resolver: SnapshotResolver,
}

impl ObjectConverter {
    pub fn new(resolver: SnapshotResolver) -> Self {
        Self { resolver }
    }

    pub fn convert(&self, record: &ObjectRecord, statistics: ObjectStatistics) -> anyhow::Result<ObjectSnapshot> {
        let mut resolved = Vec::with_capacity(statistics.len());
        for (fact_type_id, s) in statistics {
            resolved.push(ObjectStatisticSnapshot {
                fact_type: self.resolver.fact_type_of(fact_type_id)?,
                count: s.count,
                last_added_timestamp: s.last_added_timestamp,
                last_seen_timestamp: s.last_seen_timestamp,
            });
        }
        Ok(ObjectSnapshot {
            id: record.id,
            object_type: self.resolver.object_type_of(record.type_id)?,
            value: record.value.clone(),
            statistics: resolved,
        })
    }
}

/// Converts Fact comment records into snapshots.
#[derive(Clone)]
pub struct CommentConverter {
    resolver: SnapshotResolver,
}

impl CommentConverter {
    pub fn new(resolver: SnapshotResolver) -> Self {
        Self { resolver }
    }

    pub fn convert(&self, record: &FactCommentRecord) -> anyhow::Result<CommentSnapshot> {
        Ok(CommentSnapshot {
            id: record.id,
            reply_to_id: record.reply_to_id,
            origin: self.resolver.origin_of(record.origin_id)?,
            comment: record.comment.clone(),
            timestamp: record.timestamp,
        })
    }
}

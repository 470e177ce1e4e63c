use super::*;
use crate::identity::Principal;
use crate::model::{now_ms, AccessMode};
use crate::storage::GraphStore;

fn bound_fact(type_id: Uuid, object_id: Uuid, org: Uuid) -> FactRecord {
    let mut f = FactRecord::new(Uuid::new_v4(), type_id, "observedIn", Uuid::new_v4(), AccessMode::RoleBased);
    f.organization_id = Some(org);
    f.source_object_id = Some(object_id);
    f
}

#[test]
fn lookup_miss_is_none_not_error() {
    let store = MemoryStore::new();
    assert!(store.fact(Uuid::new_v4()).unwrap().is_none());
    assert!(store.object(Uuid::new_v4()).unwrap().is_none());
    assert!(store.object_type_id("no-such-type").unwrap().is_none());
}

#[test]
fn object_lookup_by_type_and_value() {
    let store = MemoryStore::new();
    let type_id = Uuid::new_v4();
    store.put_object_type(type_id, "ipv4");
    let object = ObjectRecord::new(Uuid::new_v4(), type_id, "192.0.2.1");
    store.put_object(object.clone());

    assert_eq!(store.object_type_id("ipv4").unwrap(), Some(type_id));
    let found = store.object_by_type_value(type_id, "192.0.2.1").unwrap();
    assert_eq!(found, Some(object));
    assert!(store.object_by_type_value(type_id, "192.0.2.2").unwrap().is_none());
}

#[test]
fn comment_append_requires_stored_parent() {
    let store = MemoryStore::new();
    let fact = FactRecord::new(Uuid::new_v4(), Uuid::new_v4(), "x", Uuid::new_v4(), AccessMode::Public);
    let comment = FactCommentRecord {
        id: Uuid::new_v4(),
        reply_to_id: None,
        origin_id: Uuid::new_v4(),
        comment: "orphan".into(),
        timestamp: now_ms(),
    };
    // Parent not stored: the collaborator fails rather than inventing a fact
    assert!(store.store_fact_comment(&fact, comment.clone()).is_err());

    store.put_fact(fact.clone());
    let stored = store.store_fact_comment(&fact, comment.clone()).unwrap();
    assert_eq!(stored, comment);
    assert_eq!(store.fact_comments(fact.id).unwrap(), vec![comment]);
}

#[test]
fn statistics_scan_applies_the_read_predicate() {
    let store = MemoryStore::new();
    let object_id = Uuid::new_v4();
    let type_a = Uuid::new_v4();
    let type_b = Uuid::new_v4();
    let org1 = Uuid::new_v4();
    let org2 = Uuid::new_v4();

    store.put_fact(bound_fact(type_a, object_id, org1));
    store.put_fact(bound_fact(type_a, object_id, org1));
    store.put_fact(bound_fact(type_b, object_id, org2));
    // A fact bound to some other object never contributes
    store.put_fact(bound_fact(type_a, Uuid::new_v4(), org1));

    let principal = Principal::new(Uuid::new_v4(), [org1]);
    let criteria = ObjectStatisticsCriteria::for_principal(object_id, &principal);
    let stats = store.object_statistics(&criteria).unwrap();

    assert_eq!(stats.len(), 1);
    assert_eq!(stats.get(&type_a).map(|s| s.count), Some(2));
    assert!(stats.get(&type_b).is_none());
}

#[test]
fn statistics_track_recency_per_fact_type() {
    let store = MemoryStore::new();
    let object_id = Uuid::new_v4();
    let type_a = Uuid::new_v4();
    let org = Uuid::new_v4();

    let mut older = bound_fact(type_a, object_id, org);
    older.timestamp = 1_000;
    older.last_seen_timestamp = 5_000;
    let mut newer = bound_fact(type_a, object_id, org);
    newer.timestamp = 2_000;
    newer.last_seen_timestamp = 3_000;
    store.put_fact(older);
    store.put_fact(newer);

    let principal = Principal::new(Uuid::new_v4(), [org]);
    let criteria = ObjectStatisticsCriteria::for_principal(object_id, &principal);
    let stats = store.object_statistics(&criteria).unwrap();
    let s = stats.get(&type_a).unwrap();
    assert_eq!(s.count, 2);
    assert_eq!(s.last_added_timestamp, 2_000);
    assert_eq!(s.last_seen_timestamp, 5_000);
}

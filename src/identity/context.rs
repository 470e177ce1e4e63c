//! Request-scoped security gate. Every delegate calls through here before a
//! record is touched or any value derived from one is returned; nothing else
//! in the crate makes authorization decisions.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::model::{AccessControlled, FactRecord, ObjectRecord};

use super::access;
use super::Principal;

/// Service functions a principal can hold, globally or per organization.
/// Closed vocabulary; grows with the operations this core exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    ViewThreatIntelFact,
    ViewThreatIntelObject,
    ViewThreatIntelFactComment,
    AddThreatIntelFactComment,
}

/// Role/function-permission table consulted by the gate. An implementation
/// answers whether a principal holds a function, optionally scoped to one
/// organization.
pub trait FunctionPermissions: Send + Sync {
    fn has_function(&self, principal: &Principal, function: Function, organization_id: Option<Uuid>) -> bool;
}

/// Supplies the Facts bound to an Object. Objects carry no ACL of their own;
/// an Object is readable exactly when the principal can read at least one of
/// its bound Facts, so the gate needs this one probe into storage.
pub trait ObjectFactSource: Send + Sync {
    fn facts_bound_to(&self, object_id: Uuid) -> anyhow::Result<Vec<FactRecord>>;
}

/// Permission table backed by a static set of grants. Serves as the reference
/// implementation and as the deterministic allow/deny substitute in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissions {
    /// (user, function) grants valid for any organization scope.
    global: HashSet<(Uuid, Function)>,
    /// (user, function, organization) grants.
    scoped: HashSet<(Uuid, Function, Uuid)>,
}

impl StaticPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `function` to `user` regardless of organization scope.
    pub fn grant(mut self, user: Uuid, function: Function) -> Self {
        self.global.insert((user, function));
        self
    }

    /// Grant `function` to `user` for one organization only.
    pub fn grant_for(mut self, user: Uuid, function: Function, organization_id: Uuid) -> Self {
        self.scoped.insert((user, function, organization_id));
        self
    }
}

impl FunctionPermissions for StaticPermissions {
    fn has_function(&self, principal: &Principal, function: Function, organization_id: Option<Uuid>) -> bool {
        if self.global.contains(&(principal.current_user_id, function)) {
            return true;
        }
        match organization_id {
            Some(org) => self.scoped.contains(&(principal.current_user_id, function, org)),
            None => false,
        }
    }
}

/// Combines the pure access-mode predicate with the function-permission table
/// for one request. Stateless apart from the immutable principal; cloning is
/// cheap and clones share the collaborators.
#[derive(Clone)]
pub struct SecurityContext {
    principal: Principal,
    permissions: Arc<dyn FunctionPermissions>,
    bound_facts: Arc<dyn ObjectFactSource>,
}

impl SecurityContext {
    pub fn new(
        principal: Principal,
        permissions: Arc<dyn FunctionPermissions>,
        bound_facts: Arc<dyn ObjectFactSource>,
    ) -> Self {
        Self { principal, permissions, bound_facts }
    }

    /// Build the gate for an inbound request. A request without a principal
    /// fails authentication before any resolution happens.
    pub fn for_request(
        principal: Option<Principal>,
        permissions: Arc<dyn FunctionPermissions>,
        bound_facts: Arc<dyn ObjectFactSource>,
    ) -> ServiceResult<Self> {
        match principal {
            Some(p) => Ok(Self::new(p, permissions, bound_facts)),
            None => Err(ServiceError::authentication_failed("request carries no principal")),
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn current_user_id(&self) -> Uuid {
        self.principal.current_user_id
    }

    /// Check that the principal holds `function`, scoped to `organization_id`
    /// when given. Pure check; no side effects.
    pub fn check_permission(&self, function: Function, organization_id: Option<Uuid>) -> ServiceResult<()> {
        if self.permissions.has_function(&self.principal, function, organization_id) {
            return Ok(());
        }
        debug!(target: "factum::identity", "function denied user={} function={:?} org={:?}",
               self.principal.current_user_id, function, organization_id);
        Err(ServiceError::access_denied())
    }

    /// Boolean twin of `check_read_permission` for callers that filter
    /// rather than fail (e.g. the statistics predicate).
    pub fn has_read_permission(&self, record: &impl AccessControlled) -> bool {
        access::can_read(&self.principal, record)
    }

    /// Gate a record read. Callable with `None` on a lookup miss: absence
    /// takes the exact same failure path as a denial, so the caller-observable
    /// outcome never reveals whether the record exists.
    pub fn check_read_permission<R: AccessControlled>(&self, record: Option<&R>) -> ServiceResult<()> {
        match record {
            Some(r) if access::can_read(&self.principal, r) => Ok(()),
            _ => {
                debug!(target: "factum::identity", "read denied user={} present={}",
                       self.principal.current_user_id, record.is_some());
                Err(ServiceError::access_denied())
            }
        }
    }

    /// Gate an Object read. An Object is readable when at least one of its
    /// bound Facts is; a miss (`None`) collapses into the same denial as an
    /// unreadable Object.
    pub fn check_object_read_permission(&self, object: Option<&ObjectRecord>) -> ServiceResult<()> {
        let Some(object) = object else {
            debug!(target: "factum::identity", "object read denied user={} present=false", self.principal.current_user_id);
            return Err(ServiceError::access_denied());
        };
        let facts = self.bound_facts.facts_bound_to(object.id)?;
        if facts.iter().any(|f| access::can_read(&self.principal, f)) {
            return Ok(());
        }
        debug!(target: "factum::identity", "object read denied user={} object={} bound_facts={}",
               self.principal.current_user_id, object.id, facts.len());
        Err(ServiceError::access_denied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccessMode;

    struct NoFacts;

    impl ObjectFactSource for NoFacts {
        fn facts_bound_to(&self, _object_id: Uuid) -> anyhow::Result<Vec<FactRecord>> {
            Ok(Vec::new())
        }
    }

    fn context(principal: Principal, permissions: StaticPermissions) -> SecurityContext {
        SecurityContext::new(principal, Arc::new(permissions), Arc::new(NoFacts))
    }

    #[test]
    fn missing_principal_fails_authentication() {
        let result = SecurityContext::for_request(None, Arc::new(StaticPermissions::new()), Arc::new(NoFacts));
        match result {
            Err(ServiceError::AuthenticationFailed { .. }) => {}
            other => panic!("expected AuthenticationFailed, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn global_grant_covers_any_scope() {
        let user = Uuid::new_v4();
        let org = Uuid::new_v4();
        let perms = StaticPermissions::new().grant(user, Function::ViewThreatIntelFact);
        let ctx = context(Principal::new(user, [org]), perms);
        assert!(ctx.check_permission(Function::ViewThreatIntelFact, None).is_ok());
        assert!(ctx.check_permission(Function::ViewThreatIntelFact, Some(org)).is_ok());
        assert!(ctx.check_permission(Function::AddThreatIntelFactComment, None).is_err());
    }

    #[test]
    fn scoped_grant_is_limited_to_its_organization() {
        let user = Uuid::new_v4();
        let org = Uuid::new_v4();
        let perms = StaticPermissions::new().grant_for(user, Function::AddThreatIntelFactComment, org);
        let ctx = context(Principal::new(user, [org]), perms);
        assert!(ctx.check_permission(Function::AddThreatIntelFactComment, Some(org)).is_ok());
        assert!(ctx.check_permission(Function::AddThreatIntelFactComment, Some(Uuid::new_v4())).is_err());
        assert!(ctx.check_permission(Function::AddThreatIntelFactComment, None).is_err());
    }

    #[test]
    fn read_gate_collapses_miss_and_denial() {
        let ctx = context(Principal::new(Uuid::new_v4(), []), StaticPermissions::new());
        let forbidden = FactRecord::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "domain=example.org",
            Uuid::new_v4(),
            AccessMode::Explicit,
        );

        let on_miss = ctx.check_read_permission::<FactRecord>(None).unwrap_err();
        let on_denial = ctx.check_read_permission(Some(&forbidden)).unwrap_err();
        assert_eq!(on_miss, on_denial);
    }
}

//!
//! Access-mode decision engine
//! ---------------------------
//! Pure read-eligibility predicate over `(Principal, record)`. No collaborator
//! access and no side effects, so the same function serves as the in-process
//! gate (via `SecurityContext`) and as the push-down predicate the reference
//! search implementation applies when aggregating statistics. Keeping one
//! definition is what makes the two call sites provably equivalent.
//!
//! Write eligibility is not decided here; mutations are gated by the
//! function-permission table in `identity::context`.

use crate::model::{AccessControlled, AccessMode};

use super::Principal;

/// Decide whether `principal` may read `record`.
///
/// The match is exhaustive over `AccessMode`: a new mode fails compilation
/// here instead of falling through a permissive default.
pub fn can_read(principal: &Principal, record: &impl AccessControlled) -> bool {
    match record.access_mode() {
        AccessMode::Public => true,
        AccessMode::RoleBased => match record.organization_id() {
            Some(org) => principal.acts_for(org),
            // A RoleBased record without an owning organization grants nothing.
            None => false,
        },
        AccessMode::Explicit => {
            record.authoring_subject_id() == Some(principal.current_user_id) || granted_via_acl(principal, record)
        }
    }
}

/// The ACL is the authoritative allow-list for Explicit records: a direct
/// subject grant, or a grant issued through an origin the principal controls.
fn granted_via_acl(principal: &Principal, record: &impl AccessControlled) -> bool {
    record.acl().iter().any(|entry| {
        entry.subject_id == principal.current_user_id
            || entry.origin_id.map_or(false, |origin| principal.controls_origin(origin))
    })
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod access_tests;

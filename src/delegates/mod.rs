//!
//! Request delegates
//! -----------------
//! One thin orchestrator per operation, each following the same fixed
//! sequence: resolve target, authorize, operate, convert the response. A
//! terminal failure at any step short-circuits; no side effects happen before
//! the operate step. Delegates compose the security gate, the storage/search
//! collaborators and the converters but contain no algorithmic logic of
//! their own.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::model::FactRecord;
use crate::storage::GraphStore;

mod fact_comment;
mod fact_get;
mod object_get;

pub use fact_comment::{
    CreateFactCommentRequest, FactCreateCommentDelegate, FactGetCommentsDelegate, GetFactCommentsRequest,
};
pub use fact_get::{FactGetDelegate, GetFactByIdRequest};
pub use object_get::{GetObjectByIdRequest, GetObjectByTypeValueRequest, ObjectGetDelegate};

/// Shared target resolution for mutation paths. Unlike read paths, a miss
/// here is surfaced as `ObjectNotFound`: you cannot comment on a Fact that
/// does not exist, and the caller is still gated by read and function
/// permission checks before anything derived from the Fact is returned.
#[derive(Clone)]
pub struct FactRequestResolver {
    store: Arc<dyn GraphStore>,
}

impl FactRequestResolver {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    pub fn resolve(&self, id: Uuid) -> ServiceResult<FactRecord> {
        match self.store.fact(id)? {
            Some(fact) => Ok(fact),
            None => Err(ServiceError::object_not_found(
                "fact.not.exist".to_string(),
                format!("Fact with id = {} does not exist.", id),
            )),
        }
    }
}

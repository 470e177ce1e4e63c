use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::convert::{FactConverter, FactSnapshot};
use crate::error::{ServiceError, ServiceResult};
use crate::identity::{Function, SecurityContext};
use crate::storage::GraphStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetFactByIdRequest {
    pub id: Uuid,
}

/// Fetch a single Fact by id. Read path: a miss and a forbidden Fact are
/// indistinguishable to the caller.
#[derive(Clone)]
pub struct FactGetDelegate {
    context: SecurityContext,
    store: Arc<dyn GraphStore>,
    converter: FactConverter,
}

impl FactGetDelegate {
    pub fn new(context: SecurityContext, store: Arc<dyn GraphStore>, converter: FactConverter) -> Self {
        Self { context, store, converter }
    }

    pub fn handle(&self, request: &GetFactByIdRequest) -> ServiceResult<FactSnapshot> {
        self.context.check_permission(Function::ViewThreatIntelFact, None)?;
        let fact = self.store.fact(request.id)?;
        // Absence funnels through the same gate as a denial
        self.context.check_read_permission(fact.as_ref())?;
        let fact = fact.ok_or_else(ServiceError::access_denied)?;
        Ok(self.converter.convert(&fact)?)
    }
}

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::convert::{ObjectConverter, ObjectSnapshot};
use crate::error::{ServiceError, ServiceResult, ValidationError};
use crate::identity::{Function, SecurityContext};
use crate::model::ObjectRecord;
use crate::stats::ObjectStatisticsAggregator;
use crate::storage::GraphStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetObjectByIdRequest {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetObjectByTypeValueRequest {
    #[serde(rename = "type")]
    pub object_type: String,
    pub value: String,
}

/// Fetch a single Object, by id or by its (type, value) natural key, together
/// with per-fact-type statistics restricted to what the principal may read.
///
/// Both lookups end in the same response path: a missing Object and an Object
/// whose bound Facts are all unreadable produce the identical denial. An
/// unknown *type name* is a validation failure instead; type names are
/// caller-supplied vocabulary, not access-controlled records, so revealing
/// their non-existence probes nothing.
#[derive(Clone)]
pub struct ObjectGetDelegate {
    context: SecurityContext,
    store: Arc<dyn GraphStore>,
    statistics: ObjectStatisticsAggregator,
    converter: ObjectConverter,
}

impl ObjectGetDelegate {
    pub fn new(
        context: SecurityContext,
        store: Arc<dyn GraphStore>,
        statistics: ObjectStatisticsAggregator,
        converter: ObjectConverter,
    ) -> Self {
        Self { context, store, statistics, converter }
    }

    pub fn handle_by_id(&self, request: &GetObjectByIdRequest) -> ServiceResult<ObjectSnapshot> {
        self.context.check_permission(Function::ViewThreatIntelObject, None)?;
        let object = self.store.object(request.id)?;
        self.respond(object)
    }

    pub fn handle_by_type_value(&self, request: &GetObjectByTypeValueRequest) -> ServiceResult<ObjectSnapshot> {
        self.context.check_permission(Function::ViewThreatIntelObject, None)?;
        let Some(type_id) = self.store.object_type_id(&request.object_type)? else {
            return Err(ServiceError::invalid_argument(ValidationError::new(
                "Object type does not exist.".to_string(),
                "object.type.not.exist".to_string(),
                "type".to_string(),
                request.object_type.clone(),
            )));
        };
        let object = self.store.object_by_type_value(type_id, &request.value)?;
        self.respond(object)
    }

    fn respond(&self, object: Option<ObjectRecord>) -> ServiceResult<ObjectSnapshot> {
        self.context.check_object_read_permission(object.as_ref())?;
        let object = object.ok_or_else(ServiceError::access_denied)?;
        let statistics = self.statistics.compute(object.id, self.context.principal())?;
        Ok(self.converter.convert(&object, statistics)?)
    }
}

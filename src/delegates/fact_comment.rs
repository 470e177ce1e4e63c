use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::convert::{CommentConverter, CommentSnapshot};
use crate::error::{ServiceError, ServiceResult, ValidationError};
use crate::identity::{Function, SecurityContext};
use crate::model::{now_ms, FactCommentRecord, FactRecord};
use crate::storage::GraphStore;

use super::FactRequestResolver;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFactCommentRequest {
    pub fact: Uuid,
    pub comment: String,
    #[serde(default)]
    pub reply_to: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetFactCommentsRequest {
    pub fact: Uuid,
}

/// Append a comment to a Fact. The sole mutating operation in this core:
/// mints a fresh id and timestamp per call (not idempotent, never retry
/// blindly) and attributes the comment to the current user.
#[derive(Clone)]
pub struct FactCreateCommentDelegate {
    context: SecurityContext,
    store: Arc<dyn GraphStore>,
    fact_resolver: FactRequestResolver,
    converter: CommentConverter,
}

impl FactCreateCommentDelegate {
    pub fn new(
        context: SecurityContext,
        store: Arc<dyn GraphStore>,
        fact_resolver: FactRequestResolver,
        converter: CommentConverter,
    ) -> Self {
        Self { context, store, fact_resolver, converter }
    }

    pub fn handle(&self, request: &CreateFactCommentRequest) -> ServiceResult<CommentSnapshot> {
        // Fetch the Fact and verify that it exists (404-class on this path).
        let fact = self.fact_resolver.resolve(request.fact)?;
        // Verify that the user is allowed to access the Fact.
        self.context.check_read_permission(Some(&fact))?;
        // Verify that the user is allowed to comment on the Fact.
        self.context.check_permission(Function::AddThreatIntelFactComment, fact.organization_id)?;
        // Verify that the replied-to comment exists on this same Fact.
        verify_reply_to_exists(&fact, request)?;
        // Save the comment and hand it back resolved.
        let comment = FactCommentRecord {
            id: Uuid::new_v4(),
            reply_to_id: request.reply_to,
            origin_id: self.context.current_user_id(),
            comment: request.comment.clone(),
            timestamp: now_ms(),
        };
        let stored = self.store.store_fact_comment(&fact, comment)?;
        info!(target: "factum::delegates", "comment created fact={} comment={} user={}",
              fact.id, stored.id, self.context.current_user_id());
        Ok(self.converter.convert(&stored)?)
    }
}

fn verify_reply_to_exists(fact: &FactRecord, request: &CreateFactCommentRequest) -> ServiceResult<()> {
    let Some(reply_to) = request.reply_to else { return Ok(()) };
    if fact.comments.iter().any(|c| c.id == reply_to) {
        return Ok(());
    }
    Err(ServiceError::invalid_argument(ValidationError::new(
        "Comment does not exist.".to_string(),
        "comment.no.exists".to_string(),
        "replyTo".to_string(),
        reply_to.to_string(),
    )))
}

/// List the comments on a Fact. Read path: resolving the Fact funnels misses
/// through the uniform denial like every other read.
#[derive(Clone)]
pub struct FactGetCommentsDelegate {
    context: SecurityContext,
    store: Arc<dyn GraphStore>,
    converter: CommentConverter,
}

impl FactGetCommentsDelegate {
    pub fn new(context: SecurityContext, store: Arc<dyn GraphStore>, converter: CommentConverter) -> Self {
        Self { context, store, converter }
    }

    pub fn handle(&self, request: &GetFactCommentsRequest) -> ServiceResult<Vec<CommentSnapshot>> {
        let fact = self.store.fact(request.fact)?;
        self.context.check_read_permission(fact.as_ref())?;
        let fact = fact.ok_or_else(ServiceError::access_denied)?;
        self.context.check_permission(Function::ViewThreatIntelFactComment, fact.organization_id)?;
        let comments = self.store.fact_comments(fact.id)?;
        comments.iter().map(|c| Ok(self.converter.convert(c)?)).collect()
    }
}

//! Unified service error model and mapping helpers.
//! This module provides the error taxonomy shared by the security gate, the
//! delegates and the converters, along with the HTTP status mapping used by
//! the outer API layer.
//!
//! Read paths deliberately collapse "not found" and "found but forbidden"
//! into the same `AccessDenied` value so that callers cannot probe for the
//! existence of records they may not see. Mutation paths that resolve a
//! parent record (e.g. commenting on a Fact) surface `ObjectNotFound`
//! instead; see the delegates module for where each applies.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A single field-level validation failure attached to `InvalidArgument`.
/// Carries enough detail for the caller to correct the request: a stable
/// reason code, the offending field and the supplied value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    pub code: String,
    pub field: String,
    pub value: String,
}

impl ValidationError {
    pub fn new<S: Into<String>>(message: S, code: S, field: S, value: S) -> Self {
        Self { message: message.into(), code: code.into(), field: field.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceError {
    /// No usable principal on the request; aborts before any resolution.
    AuthenticationFailed { code: String, message: String },
    /// Uniform denial. One canonical value covers both "forbidden" and, on
    /// read paths, "not found"; callers must not differentiate.
    AccessDenied { code: String, message: String },
    /// Recoverable validation failure with field-level reason codes.
    InvalidArgument { errors: Vec<ValidationError> },
    /// A lookup keyed by a caller-supplied value failed where revealing
    /// non-existence has no access-control implication.
    ObjectNotFound { code: String, message: String },
    /// A storage/search collaborator failed; propagated unchanged, no retries.
    Storage { code: String, message: String },
}

impl ServiceError {
    pub fn authentication_failed<S: Into<String>>(msg: S) -> Self {
        ServiceError::AuthenticationFailed { code: "user.not.authenticated".into(), message: msg.into() }
    }

    /// The single denial value used across the service. Deliberately carries
    /// no detail about what was denied or whether the record exists.
    pub fn access_denied() -> Self {
        ServiceError::AccessDenied { code: "access.denied".into(), message: "Access denied.".into() }
    }

    pub fn invalid_argument(error: ValidationError) -> Self {
        ServiceError::InvalidArgument { errors: vec![error] }
    }

    pub fn object_not_found<S: Into<String>>(code: S, msg: S) -> Self {
        ServiceError::ObjectNotFound { code: code.into(), message: msg.into() }
    }

    pub fn storage<S: Into<String>>(msg: S) -> Self {
        ServiceError::Storage { code: "storage.error".into(), message: msg.into() }
    }

    pub fn code_str(&self) -> &str {
        match self {
            ServiceError::AuthenticationFailed { code, .. }
            | ServiceError::AccessDenied { code, .. }
            | ServiceError::ObjectNotFound { code, .. }
            | ServiceError::Storage { code, .. } => code.as_str(),
            ServiceError::InvalidArgument { .. } => "invalid.argument",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ServiceError::AuthenticationFailed { message, .. }
            | ServiceError::AccessDenied { message, .. }
            | ServiceError::ObjectNotFound { message, .. }
            | ServiceError::Storage { message, .. } => message.clone(),
            ServiceError::InvalidArgument { errors } => errors
                .iter()
                .map(|e| format!("{} ({}={})", e.message, e.field, e.value))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    /// Map to HTTP status code. Validation failures map to 412 to match the
    /// precondition semantics of the outer API.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::AuthenticationFailed { .. } => 401,
            ServiceError::AccessDenied { .. } => 403,
            ServiceError::InvalidArgument { .. } => 412,
            ServiceError::ObjectNotFound { .. } => 404,
            ServiceError::Storage { .. } => 500,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for ServiceError {}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        // Collaborator failures surface as Storage unless mapped elsewhere
        ServiceError::storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_mapping() {
        assert_eq!(ServiceError::authentication_failed("no principal").http_status(), 401);
        assert_eq!(ServiceError::access_denied().http_status(), 403);
        let v = ValidationError::new("bad", "bad.code", "field", "value");
        assert_eq!(ServiceError::invalid_argument(v).http_status(), 412);
        assert_eq!(ServiceError::object_not_found("fact.not.exist", "missing").http_status(), 404);
        assert_eq!(ServiceError::storage("io").http_status(), 500);
    }

    #[test]
    fn denial_is_one_canonical_value() {
        // Forbidden and not-found must be indistinguishable to callers.
        assert_eq!(ServiceError::access_denied(), ServiceError::access_denied());
        assert_eq!(ServiceError::access_denied().code_str(), "access.denied");
    }

    #[test]
    fn invalid_argument_message_includes_field_detail() {
        let err = ServiceError::invalid_argument(ValidationError::new(
            "Comment does not exist.",
            "comment.no.exists",
            "replyTo",
            "abc",
        ));
        assert!(err.message().contains("replyTo=abc"));
        assert_eq!(err.code_str(), "invalid.argument");
    }
}

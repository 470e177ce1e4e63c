//! Central identity and authorization for the fact graph service.
//! Keep the public surface thin and split implementation across sub-modules:
//! the per-request `Principal`, the pure access-mode decision engine, and the
//! `SecurityContext` gate every delegate calls before touching a record.

pub mod access;
mod context;
mod principal;

pub use context::{Function, FunctionPermissions, ObjectFactSource, SecurityContext, StaticPermissions};
pub use principal::Principal;

//! Router modules, split by who may call them. Access control is applied per module
//! through axum layers in `create_router`, so a handler can't be exposed by accident.

/// Anonymous, read-only routes. VIEW is never restricted.
pub mod public;

/// Routes behind the identity extractor. Ownership is checked inside the handlers.
pub mod authenticated;

/// Routes that additionally require the ADMIN role.
pub mod admin;

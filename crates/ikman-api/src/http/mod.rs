//! HTTP layer: routes, middleware, and handlers.

pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod health;
pub mod router;
pub(crate) mod rules;

#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Token-protected HTTP front door mapping REST verbs onto the rule stores.
//!
//! Layout: `http/` (routes, auth middleware, handlers, error mapping),
//! `state.rs` (shared application state), `models.rs` (response DTOs).

pub mod error;
pub mod http;
mod models;
pub mod state;

pub use error::ApiServerError;
pub use http::router::ApiServer;
pub use state::ApiState;

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

//! Router-facing core: authenticated transport and the reconcile-by-comment
//! rule protocol.
//!
//! Layout: `transport.rs` (wire envelope and the `RouterTransport` seam),
//! `store.rs` (pagination, matching, and upsert/delete semantics),
//! `families.rs` (per-family shaping policies), `error.rs` (typed failures).

pub mod error;
pub mod families;
pub mod store;
pub mod transport;

pub use error::{RouterError, RouterResult};
pub use families::{PortMappingSpec, QosLimitSpec, StreamRuleSpec};
pub use store::{FamilyDescriptor, RemoteRule, RuleStore, UpsertOutcome};
pub use transport::{Action, CallEnvelope, RouterSession, RouterTransport, SessionConfig};

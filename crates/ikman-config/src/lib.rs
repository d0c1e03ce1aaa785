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

//! YAML-backed configuration for the ikman service.
//!
//! Layout: `model.rs` (typed config sections), `loader.rs` (file loading and
//! validation), `error.rs` (typed failures).

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use model::{ApiServerConfig, Config, DeviceConfig, LogConfig};

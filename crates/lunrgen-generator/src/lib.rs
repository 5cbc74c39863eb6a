//! lunrgen Generator Library
//!
//! Search store generation engine for lunrgen.
//!
//! # Modules
//!
//! - [`collector`] - Content discovery and page descriptor extraction
//! - [`store`] - Records, the store builder, and artifact serialization
//! - [`build`] - Build orchestration

pub mod build;
pub mod collector;
pub mod store;

pub use build::{BuildError, BuildStats, Builder};
pub use collector::{Collection, CollectorError, ContentCollector, Exclusion};
pub use store::{ExcerptMode, Record, Store, StoreBuilder, StoreError, StoreFormat};

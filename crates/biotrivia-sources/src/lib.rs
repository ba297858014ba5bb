//! Markup source integrations for biotrivia.
//!
//! Implements the `MarkupSource` trait for Wikipedia and for an in-memory
//! mock, plus the configuration file that selects between them.

pub mod config;
pub mod mock;
pub mod wikipedia;

pub use config::{create_source, load_config_from, BiotriviaConfig, SourceConfig};
pub use mock::MockSource;
pub use wikipedia::WikipediaSource;

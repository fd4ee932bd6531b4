//! Condense Core - Prompt-sized source bundles
//!
//! This library walks source trees, optionally condenses Python-like files
//! by eliding low-information regions, and assembles the results into one
//! labelled bundle suitable for pasting into a size-constrained context.

pub mod bundle;
pub mod condense;
pub mod config;
pub mod discovery;
pub mod error;
pub mod tokens;

pub use bundle::{Bundle, BundleEntry, BundleStats, SkippedFile};
pub use condense::{condense, CODE_PLACEHOLDER, IMPORTS_PLACEHOLDER, PASS_PLACEHOLDER};
pub use config::{Config, CONFIG_FILE_NAME};
pub use discovery::discover_files;
pub use error::CondenseError;
pub use tokens::estimate_tokens;

/// Result type alias for condense operations
pub type Result<T> = std::result::Result<T, CondenseError>;

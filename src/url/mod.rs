//! URL handling module for link-trawl
//!
//! This module provides seed validation, href resolution against the crawl's
//! base origin, and origin comparison for internal/external classification.

mod origin;
mod resolve;

// Re-export main types and functions
pub use origin::Origin;
pub use resolve::{parse_seed, resolve_href};

//! URL handling module for Site-Walker
//!
//! This module provides reference resolution, host scoping and the
//! canonicalization used to deduplicate fetches.

mod domain;
mod normalize;
mod resolve;

pub use domain::{extract_host, is_same_host};
pub use normalize::{canonicalize, CanonicalKey};
pub use resolve::{parse_absolute, resolve_reference};

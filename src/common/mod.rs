//! Common types, traits, and error definitions for chain_lattice
//!
//! This module provides the foundational building blocks shared by the
//! planning environment, its collaborators and the search engines that
//! consume it.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;

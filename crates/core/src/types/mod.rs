//! Core types for the catalog.
//!
//! This module provides the product record and its type-safe identifier.

pub mod id;
pub mod product;

pub use id::*;
pub use product::Product;

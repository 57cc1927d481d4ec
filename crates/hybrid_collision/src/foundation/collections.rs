//! Specialized collection types
//!
//! Arena storage for tracked objects comes from slotmap; the broad phase
//! keeps its footprints in an insertion-ordered `IndexMap` so pair scans run
//! over contiguous entries.

pub use indexmap::IndexMap;
pub use slotmap::{new_key_type, DenseSlotMap};

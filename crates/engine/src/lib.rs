//! Descriptor normalization and grouping for content-type navigation.
//!
//! The engine is the pure core of the pipeline: it turns raw admin-API
//! records into normalized descriptors ([`normalize`]), partitions them
//! into deterministically ordered groups ([`group_content_types`]), and
//! holds the resulting snapshot in an injectable store ([`NavStore`]).
//! No I/O and no host access happens here, which is what makes the
//! ordering invariants unit-testable in isolation.

mod group;
mod normalize;
mod state;

pub use group::{group_content_types, is_permitted};
pub use normalize::normalize;
pub use state::{NavSnapshot, NavStore};

//! Text-processing helpers shared by the grouping engine and the host
//! synchronization layer.

pub mod text_processing;

pub use text_processing::{parse_order_hint, strip_order_hint};

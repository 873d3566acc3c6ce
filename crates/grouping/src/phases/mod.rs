//! Grouping phases, run in this order:
//!
//! ```text
//! EXTRACT(4) -> EXTRACT(3) -> EXTRACT(2) -> EXTRACT(1)
//!   -> INTEGRATE_PREFORMED -> MERGE_PAIRS -> FILL_TRIPLES -> GENERAL_FILL -> CLEANUP
//! ```
//!
//! Every phase consumes the leftovers of the previous one and never backtracks.

pub(crate) mod cleanup;
pub(crate) mod extract;
pub(crate) mod fill;
pub(crate) mod merge;
pub(crate) mod preformed;

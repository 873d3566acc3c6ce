//! # Roomie Grouping
//!
//! Partitions a gender-homogeneous cohort into rooms of one to four people,
//! favouring mutual preferences first and denser rooms second.
//!
//! ## Pipeline
//!
//! ```text
//! Participant[] + preformed groups
//!     │
//!     ├──> Phase 1: reciprocal cliques of 4, 3, 2, 1 (rooms of 4 are seated)
//!     ├──> Phase 2: preformed groups topped up from leftovers
//!     ├──> Phase 3: pairs merged by mutual demand
//!     ├──> Phase 4: triples completed, then best single moves
//!     └──> Phase 5: whole-room merges, largest with smallest
//!            │
//!            └──> Room[]  (every participant exactly once)
//! ```
//!
//! Ties are broken by ascending participant id or by the order rooms were
//! produced in, so the output is deterministic for a given snapshot.

mod demand;
mod engine;
mod error;
mod phases;
mod pool;
mod room;

pub use demand::{candidate_demand, room_demand};
pub use engine::{group, verify_partition, GroupingEngine};
pub use error::{GroupingError, Result};
pub use room::{Room, ROOM_CAPACITY};

//! # Roomie Graph
//!
//! In-memory snapshot of "wants to room with" preferences for one cohort.
//!
//! ## Architecture
//!
//! ```text
//! Participant[]  (loaded by the store)
//!     │
//!     ├──> GraphBuilder
//!     │      ├─ Reject duplicate ids
//!     │      └─ Drop edges that leave the cohort
//!     │
//!     └──> PreferenceGraph
//!            ├─ id -> { subscriptions, subscribers }
//!            ├─ Reciprocity / clique checks
//!            ├─ Relation lookup used by demand scoring
//!            └─ Pruning when participants get seated
//! ```
//!
//! All sets are ordered, so every traversal visits ids in ascending order.

mod builder;
mod error;
mod graph;
mod types;

pub use builder::GraphBuilder;
pub use error::{GraphError, Result};
pub use graph::PreferenceGraph;
pub use types::{Participant, ParticipantId, PreferenceNode};

//! # Roomie Store
//!
//! Persistence boundary and distribution lifecycle around the grouping and
//! recommendation engines.
//!
//! ```text
//! PREPARING ──> ANSWERING ──> GATHERING ──> CLOSED
//!                  join          join        close_distribution:
//!                  subscribe     recommend     group each gender
//!                                              persist rooms
//! ```
//!
//! [`MemoryStore`] keeps the whole world in one [`Snapshot`] that is
//! saved as a JSON document.

mod error;
mod memory;
mod model;
mod service;
mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use model::{
    Distribution, DistributionId, DistributionState, Gender, GroupId, GroupRecord, Snapshot, UserId,
    UserRecord, SNAPSHOT_SCHEMA_VERSION,
};
pub use service::{advance_state, close_distribution, recommend, ClosedDistribution, GenderGroups};
pub use store::{PreferenceStore, ViewerContext};

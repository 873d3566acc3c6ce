//! # Roomie Recommend
//!
//! "Who to look at next" feed for one viewer while enrollment is open.
//!
//! ```text
//! viewer + same-gender pool
//!     │
//!     ├──> Tier 1: subscribers not yet answered and not yet shown
//!     ├──> Tier 2: unseen pool members (early-stopping partition)
//!     ├──> Tier 3: random sample of seen pool members
//!     └──> Empty
//! ```
//!
//! Pure and read-only: the caller records what was shown after the call.

mod error;
mod partition;
mod selector;

pub use error::{RecommendError, Result};
pub use partition::divide_while;
pub use selector::{recommend, Recommendation, RecommendationSelector, Tier, MAX_AMOUNT};

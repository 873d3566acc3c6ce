use crate::model::{DistributionId, DistributionState, UserId};
use roomie_grouping::GroupingError;
use roomie_recommend::RecommendError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Snapshot format error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Snapshot schema_version {0} is not supported (expected {1})")]
    UnsupportedSchema(u32, u32),

    #[error("Distribution with ID {0} not found")]
    DistributionNotFound(DistributionId),

    #[error("User with ID {0} not found")]
    UserNotFound(UserId),

    #[error("State order is violated: {from} -> {to}")]
    StateOrderViolated {
        from: DistributionState,
        to: DistributionState,
    },

    #[error("Distribution with ID {0} is in CLOSED state")]
    DistributionClosed(DistributionId),

    #[error("Distribution with ID {id} is in {state} state, expected {expected}")]
    UnexpectedState {
        id: DistributionId,
        state: DistributionState,
        expected: &'static str,
    },

    #[error("User with ID {user} is not a participant of Distribution with ID {distribution}")]
    NotParticipant {
        user: UserId,
        distribution: DistributionId,
    },

    #[error("User cannot subscribe to themselves")]
    SelfSubscription(UserId),

    #[error("User cannot view themselves")]
    SelfView(UserId),

    #[error("Preformed group has {0} members (expected 2..=4)")]
    PreformedGroupSize(usize),

    #[error("Preformed group mixes genders")]
    MixedGenderGroup,

    #[error("User with ID {0} already belongs to a preformed group")]
    AlreadyPreformed(UserId),

    #[error("Grouping error: {0}")]
    GroupingError(#[from] GroupingError),

    #[error("Recommendation error: {0}")]
    RecommendError(#[from] RecommendError),
}

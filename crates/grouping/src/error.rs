use roomie_graph::{GraphError, ParticipantId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GroupingError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupingError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Preformed group #{index} has {size} members (expected 2..=4)")]
    PreformedSize { index: usize, size: usize },

    #[error("Preformed member {0} is not part of the cohort")]
    UnknownMember(ParticipantId),

    #[error("Participant {0} appears more than once across preformed groups")]
    DuplicateMember(ParticipantId),
}

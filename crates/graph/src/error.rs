use thiserror::Error;

use crate::types::ParticipantId;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(ParticipantId),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),
}

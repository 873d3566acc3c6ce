use crate::error::Result;
use crate::model::{Distribution, DistributionId, DistributionState, Gender, GroupId, UserId};
use roomie_graph::{Participant, ParticipantId};
use roomie_grouping::Room;

/// Everything the recommendation selector needs for one viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerContext {
    pub viewer: Participant,
    /// Same-gender participants of the distribution (viewer included)
    pub pool: Vec<Participant>,
}

/// Read/write boundary between the engines and persistence
///
/// Loads must be complete: a referenced id without a record is an error,
/// never silently skipped.
pub trait PreferenceStore {
    fn distribution(&self, distribution_id: DistributionId) -> Result<Distribution>;

    /// Every participant of one gender with populated edge sets
    fn load_cohort(&self, distribution_id: DistributionId, gender: Gender) -> Result<Vec<Participant>>;

    /// Preformed groups whose members belong to `gender`
    fn preformed_groups(
        &self,
        distribution_id: DistributionId,
        gender: Gender,
    ) -> Result<Vec<Vec<ParticipantId>>>;

    fn load_viewer_context(&self, distribution_id: DistributionId, viewer_id: UserId) -> Result<ViewerContext>;

    /// Allocate group ids and record membership for each room
    fn persist_rooms(&mut self, distribution_id: DistributionId, rooms: &[Room]) -> Result<Vec<GroupId>>;

    fn record_viewed(&mut self, viewer_id: UserId, shown: &[ParticipantId]) -> Result<()>;

    fn set_state(&mut self, distribution_id: DistributionId, state: DistributionState) -> Result<()>;
}

use crate::error::{Result, StoreError};
use crate::model::{DistributionId, DistributionState, Gender, GroupId, UserId};
use crate::store::PreferenceStore;
use rand::Rng;
use roomie_grouping::{GroupingEngine, Room};
use roomie_recommend::{Recommendation, RecommendationSelector};
use serde::Serialize;

/// Rooms and group ids allocated for one gender when a distribution closes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenderGroups {
    pub gender: Gender,
    pub rooms: Vec<Room>,
    pub group_ids: Vec<GroupId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedDistribution {
    pub distribution_id: DistributionId,
    pub groups: Vec<GenderGroups>,
}

impl ClosedDistribution {
    pub fn group_count(&self) -> usize {
        self.groups.iter().map(|g| g.group_ids.len()).sum()
    }
}

/// Move a distribution one step forward
///
/// Returns `None` for ordinary transitions and the grouping summary when the
/// step closes enrollment.
pub fn advance_state<S: PreferenceStore>(
    store: &mut S,
    distribution_id: DistributionId,
    to: DistributionState,
) -> Result<Option<ClosedDistribution>> {
    let from = store.distribution(distribution_id)?.state;
    if from == DistributionState::Closed {
        return Err(StoreError::DistributionClosed(distribution_id));
    }
    if from.next() != Some(to) {
        return Err(StoreError::StateOrderViolated { from, to });
    }

    if to == DistributionState::Closed {
        return close_distribution(store, distribution_id).map(Some);
    }

    store.set_state(distribution_id, to)?;
    log::info!("Distribution {}: {} -> {}", distribution_id, from, to);
    Ok(None)
}

/// Group every gender cohort and persist the rooms, then mark the
/// distribution closed
///
/// Grouping for all genders finishes before anything is written, and the
/// rooms of every gender go to the store in a single `persist_rooms` call,
/// so any failure leaves the store untouched.
pub fn close_distribution<S: PreferenceStore>(
    store: &mut S,
    distribution_id: DistributionId,
) -> Result<ClosedDistribution> {
    let distribution = store.distribution(distribution_id)?;
    match distribution.state {
        DistributionState::Gathering => {}
        DistributionState::Closed => return Err(StoreError::DistributionClosed(distribution_id)),
        state => {
            return Err(StoreError::UnexpectedState {
                id: distribution_id,
                state,
                expected: "GATHERING",
            })
        }
    }

    let engine = GroupingEngine::new();
    let mut grouped = Vec::with_capacity(Gender::ALL.len());
    for gender in Gender::ALL {
        let cohort = store.load_cohort(distribution_id, gender)?;
        let preformed = store.preformed_groups(distribution_id, gender)?;
        let rooms = engine.group(&cohort, &preformed)?;
        log::debug!(
            "Distribution {}: {} {} participants -> {} rooms",
            distribution_id,
            cohort.len(),
            gender,
            rooms.len()
        );
        grouped.push((gender, rooms));
    }

    let all_rooms: Vec<Room> = grouped
        .iter()
        .flat_map(|(_, rooms)| rooms.iter().cloned())
        .collect();
    let mut group_ids = store.persist_rooms(distribution_id, &all_rooms)?.into_iter();

    let groups = grouped
        .into_iter()
        .map(|(gender, rooms)| GenderGroups {
            gender,
            group_ids: group_ids.by_ref().take(rooms.len()).collect(),
            rooms,
        })
        .collect();
    store.set_state(distribution_id, DistributionState::Closed)?;

    let closed = ClosedDistribution {
        distribution_id,
        groups,
    };
    log::info!(
        "Distribution {} closed with {} groups",
        distribution_id,
        closed.group_count()
    );
    Ok(closed)
}

/// Select the next profiles for `viewer_id` during the gathering phase
///
/// With `record` set, non-empty results are added to the viewer's seen set
/// once selection has returned.
pub fn recommend<S: PreferenceStore, R: Rng>(
    store: &mut S,
    selector: &mut RecommendationSelector<R>,
    distribution_id: DistributionId,
    viewer_id: UserId,
    amount: usize,
    record: bool,
) -> Result<Recommendation> {
    let state = store.distribution(distribution_id)?.state;
    if state != DistributionState::Gathering {
        return Err(StoreError::UnexpectedState {
            id: distribution_id,
            state,
            expected: "GATHERING",
        });
    }

    let context = store.load_viewer_context(distribution_id, viewer_id)?;
    let recommendation = selector.recommend(&context.viewer, &context.pool, amount)?;

    if record && !recommendation.is_empty() {
        store.record_viewed(viewer_id, &recommendation.ids)?;
    }
    Ok(recommendation)
}

use crate::error::{GroupingError, Result};
use crate::phases::{cleanup, extract, fill, merge, preformed};
use crate::pool::RemainingPool;
use crate::room::{Room, ROOM_CAPACITY};
use roomie_graph::{GraphBuilder, Participant, ParticipantId};
use std::collections::BTreeSet;

/// Grouping engine: turns one cohort's preference graph into rooms
///
/// Stateless; every call builds its own working pool from the given snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupingEngine;

impl GroupingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Partition `cohort` into rooms of 1..=4 members
    ///
    /// `preformed` groups (2..=4 members each, disjoint, all inside the
    /// cohort) end up together in a single room that may have grown. Input
    /// is validated before any grouping work starts.
    pub fn group(&self, cohort: &[Participant], preformed: &[Vec<ParticipantId>]) -> Result<Vec<Room>> {
        let graph = GraphBuilder::new().build(cohort)?;
        let preformed_ids = validate_preformed(preformed, |id| graph.contains(id))?;

        log::debug!(
            "Grouping {} participants ({} in {} preformed groups)",
            graph.len(),
            preformed_ids.len(),
            preformed.len()
        );

        let pool = RemainingPool::new(graph);
        let pool = extract::run(pool, &preformed_ids);
        let pool = preformed::run(pool, preformed);
        let pool = merge::run(pool);
        let pool = fill::complete_triples(pool);
        let pool = fill::general_fill(pool);
        let rooms = cleanup::run(pool);

        debug_assert!(verify_partition(cohort, &rooms).is_ok());
        log::debug!("Grouped {} participants into {} rooms", cohort.len(), rooms.len());

        Ok(rooms)
    }
}

/// Convenience wrapper around [`GroupingEngine::group`]
pub fn group(cohort: &[Participant], preformed: &[Vec<ParticipantId>]) -> Result<Vec<Room>> {
    GroupingEngine::new().group(cohort, preformed)
}

fn validate_preformed(
    preformed: &[Vec<ParticipantId>],
    in_cohort: impl Fn(ParticipantId) -> bool,
) -> Result<BTreeSet<ParticipantId>> {
    let mut seen = BTreeSet::new();

    for (index, group) in preformed.iter().enumerate() {
        if !(2..=ROOM_CAPACITY).contains(&group.len()) {
            return Err(GroupingError::PreformedSize {
                index,
                size: group.len(),
            });
        }
        for &id in group {
            if !in_cohort(id) {
                return Err(GroupingError::UnknownMember(id));
            }
            if !seen.insert(id) {
                return Err(GroupingError::DuplicateMember(id));
            }
        }
    }

    Ok(seen)
}

/// Check that `rooms` partition the cohort into rooms of 1..=4
///
/// Returns a description of the first violation found.
pub fn verify_partition(cohort: &[Participant], rooms: &[Room]) -> std::result::Result<(), String> {
    let expected: BTreeSet<ParticipantId> = cohort.iter().map(|p| p.id).collect();
    let mut seen = BTreeSet::new();

    for room in rooms {
        if room.is_empty() || room.len() > ROOM_CAPACITY {
            return Err(format!("room {:?} has {} members", room.members(), room.len()));
        }
        for &id in room.members() {
            if !expected.contains(&id) {
                return Err(format!("room {:?} contains foreign id {}", room.members(), id));
            }
            if !seen.insert(id) {
                return Err(format!("participant {} is seated twice", id));
            }
        }
    }

    if seen.len() != expected.len() {
        let missing: Vec<_> = expected.difference(&seen).collect();
        return Err(format!("participants {:?} were not seated", missing));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mutual(ids: &[ParticipantId]) -> Vec<Participant> {
        ids.iter()
            .map(|&id| {
                let others: Vec<_> = ids.iter().copied().filter(|&o| o != id).collect();
                Participant::new(id)
                    .subscribed_to(others.clone())
                    .subscribed_by(others)
            })
            .collect()
    }

    fn members(rooms: &[Room]) -> Vec<Vec<ParticipantId>> {
        rooms.iter().map(|r| r.members().to_vec()).collect()
    }

    #[test]
    fn test_quad_and_loner() {
        let mut cohort = mutual(&[1, 2, 3, 4]);
        cohort.push(Participant::new(5));

        let rooms = group(&cohort, &[]).unwrap();

        assert_eq!(members(&rooms), vec![vec![1, 2, 3, 4], vec![5]]);
    }

    #[test]
    fn test_disjoint_pairs_become_one_room() {
        let mut cohort = mutual(&[1, 2]);
        cohort.extend(mutual(&[3, 4]));

        let rooms = group(&cohort, &[]).unwrap();

        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].len(), 4);
    }

    #[test]
    fn test_empty_cohort() {
        assert!(group(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_nobody_subscribed_packs_by_order() {
        let cohort: Vec<_> = (1..=9).map(Participant::new).collect();

        let rooms = group(&cohort, &[]).unwrap();

        verify_partition(&cohort, &rooms).unwrap();
        let mut sizes: Vec<_> = rooms.iter().map(Room::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 4, 4]);
    }

    #[test]
    fn test_preformed_group_is_kept_together() {
        let mut cohort = mutual(&[1, 2, 3]);
        cohort.extend((4..=7).map(Participant::new));

        let rooms = group(&cohort, &[vec![4, 5]]).unwrap();

        verify_partition(&cohort, &rooms).unwrap();
        assert!(rooms.iter().any(|r| r.contains(4) && r.contains(5)));
    }

    #[test]
    fn test_preformed_validation() {
        let cohort: Vec<_> = (1..=6).map(Participant::new).collect();

        assert_eq!(
            group(&cohort, &[vec![1]]),
            Err(GroupingError::PreformedSize { index: 0, size: 1 })
        );
        assert_eq!(
            group(&cohort, &[vec![1, 2, 3, 4, 5]]),
            Err(GroupingError::PreformedSize { index: 0, size: 5 })
        );
        assert_eq!(
            group(&cohort, &[vec![1, 9]]),
            Err(GroupingError::UnknownMember(9))
        );
        assert_eq!(
            group(&cohort, &[vec![1, 2], vec![2, 3]]),
            Err(GroupingError::DuplicateMember(2))
        );
    }

    #[test]
    fn test_duplicate_cohort_ids_are_rejected() {
        let cohort = vec![Participant::new(1), Participant::new(1)];
        assert!(matches!(group(&cohort, &[]), Err(GroupingError::Graph(_))));
    }

    #[test]
    fn test_verify_partition_reports_problems() {
        let cohort: Vec<_> = (1..=3).map(Participant::new).collect();

        assert!(verify_partition(&cohort, &[Room::new(vec![1, 2])]).is_err());
        assert!(verify_partition(&cohort, &[Room::new(vec![1, 2]), Room::new(vec![2, 3])]).is_err());
        assert!(verify_partition(&cohort, &[Room::new(vec![1, 2, 3])]).is_ok());
    }
}

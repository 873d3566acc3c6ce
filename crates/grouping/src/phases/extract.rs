use crate::pool::RemainingPool;
use crate::room::{OpenRoom, ROOM_CAPACITY};
use itertools::Itertools;
use roomie_graph::{ParticipantId, PreferenceGraph};
use std::collections::BTreeSet;

/// Pull fully reciprocal groups of `size` out of `graph`
///
/// Participants are visited in ascending id order. For each one, combinations
/// of `size - 1` of its current subscriptions are tried in lexicographic order
/// and the first clique wins. Accepted members are removed from `graph` right
/// away, so later participants never see them.
pub(crate) fn extract_cliques(graph: &mut PreferenceGraph, size: usize) -> Vec<Vec<ParticipantId>> {
    let mut groups = Vec::new();
    if size == 0 {
        return groups;
    }

    let ids: Vec<ParticipantId> = graph.ids().collect();
    for id in ids {
        if !graph.contains(id) {
            continue;
        }

        let found = if size == 1 {
            Some(vec![id])
        } else {
            let subscriptions: Vec<ParticipantId> = graph.subscriptions(id).collect();
            subscriptions
                .into_iter()
                .combinations(size - 1)
                .map(|mut candidate| {
                    candidate.push(id);
                    candidate
                })
                .find(|candidate| graph.is_clique(candidate))
        };

        if let Some(mut group) = found {
            group.sort_unstable();
            log::trace!("Clique of {}: {:?}", size, group);
            graph.remove_all(&group);
            groups.push(group);
        }
    }

    groups
}

/// Phase 1: seat full cliques, leave smaller cliques open
///
/// Preformed members are excluded from clique search. Only rooms of four are
/// seated here; triples, pairs and singles stay open (in that order) so the
/// demand graph still knows about their members.
pub(crate) fn run(mut pool: RemainingPool, preformed: &BTreeSet<ParticipantId>) -> RemainingPool {
    let mut scratch = pool.graph().without(preformed);

    for size in (1..=ROOM_CAPACITY).rev() {
        let groups = extract_cliques(&mut scratch, size);
        log::debug!("Extracted {} reciprocal groups of {}", groups.len(), size);

        for group in groups {
            pool.place(OpenRoom::loose(group));
        }
    }

    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomie_graph::{GraphBuilder, Participant};

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

    #[test]
    fn test_extract_prefers_first_combination() {
        // 1..=5 all mutual: the first quad in enumeration order is {1,2,3,4}
        let mut graph = GraphBuilder::new().build(&mutual(&[1, 2, 3, 4, 5])).unwrap();

        let quads = extract_cliques(&mut graph, 4);
        assert_eq!(quads, vec![vec![1, 2, 3, 4]]);
        assert_eq!(graph.ids().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_extract_singletons_take_everyone() {
        let mut graph = GraphBuilder::new()
            .build(&[Participant::new(3), Participant::new(1)])
            .unwrap();

        assert_eq!(extract_cliques(&mut graph, 1), vec![vec![1], vec![3]]);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_one_directional_edges_are_not_cliques() {
        let mut graph = GraphBuilder::new()
            .build(&[
                Participant::new(1).subscribed_to([2]),
                Participant::new(2).subscribed_by([1]),
            ])
            .unwrap();

        assert!(extract_cliques(&mut graph, 2).is_empty());
    }

    #[test]
    fn test_run_seats_quads_and_keeps_smaller_open() {
        let mut cohort = mutual(&[1, 2, 3, 4]);
        cohort.extend(mutual(&[5, 6, 7]));
        cohort.extend(mutual(&[8, 9]));
        cohort.push(Participant::new(10));
        let graph = GraphBuilder::new().build(&cohort).unwrap();

        let pool = run(RemainingPool::new(graph), &BTreeSet::new());

        assert_eq!(pool.seated().len(), 1);
        assert_eq!(pool.seated()[0].members(), &[1, 2, 3, 4]);
        let open: Vec<_> = pool.open().iter().map(|r| r.members.clone()).collect();
        assert_eq!(open, vec![vec![5, 6, 7], vec![8, 9], vec![10]]);
        // open members are still visible for demand scoring
        assert!(pool.graph().is_reciprocal(8, 9));
        assert!(!pool.graph().contains(1));
    }

    #[test]
    fn test_run_skips_preformed_members() {
        let graph = GraphBuilder::new().build(&mutual(&[1, 2, 3, 4])).unwrap();
        let preformed: BTreeSet<_> = [4].into_iter().collect();

        let pool = run(RemainingPool::new(graph), &preformed);

        assert!(pool.seated().is_empty());
        let open: Vec<_> = pool.open().iter().map(|r| r.members.clone()).collect();
        assert_eq!(open, vec![vec![1, 2, 3]]);
    }
}

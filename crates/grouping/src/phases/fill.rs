use crate::demand::candidate_demand;
use crate::pool::RemainingPool;
use crate::room::OpenRoom;
use roomie_graph::ParticipantId;

/// Phase 4a: complete rooms of three with the best-fitting single
///
/// Triples are visited in order; each takes the loose single with the highest
/// demand toward it (first single on ties) until singles run out.
pub(crate) fn complete_triples(mut pool: RemainingPool) -> RemainingPool {
    let mut singles: Vec<ParticipantId> = Vec::new();
    let mut triples: Vec<OpenRoom> = Vec::new();
    let mut rest: Vec<OpenRoom> = Vec::new();

    for room in pool.take_open() {
        if room.is_loose_of(1) {
            singles.extend(room.members);
        } else if room.len() == 3 {
            triples.push(room);
        } else {
            rest.push(room);
        }
    }

    let mut completed = 0usize;
    for mut triple in triples {
        let Some(idx) = best_single(&pool, &singles, &triple.members) else {
            rest.push(triple);
            continue;
        };
        triple.members.push(singles.remove(idx));
        completed += 1;
        pool.place(triple);
    }

    log::debug!(
        "Completed {} triples, {} singles left",
        completed,
        singles.len()
    );

    for room in rest {
        pool.place(room);
    }
    for single in singles {
        pool.place(OpenRoom::loose(vec![single]));
    }

    pool
}

fn best_single(pool: &RemainingPool, singles: &[ParticipantId], room: &[ParticipantId]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, &single) in singles.iter().enumerate() {
        let demand = candidate_demand(pool.graph(), single, room);
        if best.map_or(true, |(_, top)| demand > top) {
            best = Some((idx, demand));
        }
    }
    best.map(|(idx, _)| idx)
}

#[derive(Debug, Clone, Copy)]
struct Move {
    host: usize,
    source: usize,
    member: usize,
    demand: usize,
}

/// Phase 4b: repeatedly execute the single best member move
///
/// Every open room below capacity is a host; every other loose room that is
/// not larger than the host is a source. The move with the highest demand
/// wins (first found on ties). Full hosts are seated, drained sources are
/// dropped. Sources never exceed their host in size, so each move strictly
/// increases the sum of squared room sizes and the loop terminates.
/// An anchored pair next to a loose triple therefore stays as is: the pair
/// cannot take from the larger triple and is never a source itself.
pub(crate) fn general_fill(mut pool: RemainingPool) -> RemainingPool {
    let mut rooms = pool.take_open();
    let mut moves = 0usize;

    while let Some(step) = best_move(&pool, &rooms) {
        let candidate = rooms[step.source].members.remove(step.member);
        log::trace!(
            "Moving {} into {:?} (demand {})",
            candidate,
            rooms[step.host].members,
            step.demand
        );
        rooms[step.host].members.push(candidate);
        moves += 1;

        let host_full = rooms[step.host].is_full();
        let source_empty = rooms[step.source].members.is_empty();

        // remove the higher index first so the lower one stays valid
        let mut doomed = Vec::with_capacity(2);
        if host_full {
            doomed.push(step.host);
        }
        if source_empty {
            doomed.push(step.source);
        }
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        for idx in doomed {
            let room = rooms.remove(idx);
            if idx == step.host {
                pool.seat(room.members);
            }
        }
    }

    log::debug!("General fill made {} moves, {} rooms open", moves, rooms.len());

    for room in rooms {
        pool.place(room);
    }
    pool
}

fn best_move(pool: &RemainingPool, rooms: &[OpenRoom]) -> Option<Move> {
    let mut best: Option<Move> = None;

    for (host, host_room) in rooms.iter().enumerate() {
        if host_room.is_full() {
            continue;
        }
        for (source, source_room) in rooms.iter().enumerate() {
            if source == host || source_room.anchored || source_room.len() > host_room.len() {
                continue;
            }
            for (member, &candidate) in source_room.members.iter().enumerate() {
                let demand = candidate_demand(pool.graph(), candidate, &host_room.members);
                if best.map_or(true, |top| demand > top.demand) {
                    best = Some(Move {
                        host,
                        source,
                        member,
                        demand,
                    });
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomie_graph::{GraphBuilder, Participant};

    fn pool_with(participants: Vec<Participant>, open: Vec<OpenRoom>) -> RemainingPool {
        let mut pool = RemainingPool::new(GraphBuilder::new().build(&participants).unwrap());
        for room in open {
            pool.place(room);
        }
        pool
    }

    fn open_members(pool: &RemainingPool) -> Vec<Vec<ParticipantId>> {
        pool.open().iter().map(|r| r.members.clone()).collect()
    }

    #[test]
    fn test_triple_takes_highest_demand_single() {
        let participants = vec![
            Participant::new(1),
            Participant::new(2).subscribed_to([6]),
            Participant::new(3).subscribed_to([6]),
            Participant::new(5),
            Participant::new(6),
            Participant::new(7),
        ];
        let open = vec![
            OpenRoom::loose(vec![1, 2, 3]),
            OpenRoom::loose(vec![5]),
            OpenRoom::loose(vec![6]),
            OpenRoom::loose(vec![7]),
        ];

        let pool = complete_triples(pool_with(participants, open));

        assert_eq!(pool.seated()[0].members(), &[1, 2, 3, 6]);
        assert_eq!(open_members(&pool), vec![vec![5], vec![7]]);
    }

    #[test]
    fn test_triples_without_singles_stay_open() {
        let participants = (1..=5).map(Participant::new).collect();
        let open = vec![OpenRoom::loose(vec![1, 2, 3]), OpenRoom::loose(vec![4, 5])];

        let pool = complete_triples(pool_with(participants, open));

        assert!(pool.seated().is_empty());
        assert_eq!(open_members(&pool), vec![vec![4, 5], vec![1, 2, 3]]);
    }

    #[test]
    fn test_general_fill_follows_demand() {
        // 4 likes the triple {1,2,3}; 5 is unrelated
        let participants = vec![
            Participant::new(1).subscribed_by([4]),
            Participant::new(2).subscribed_by([4]),
            Participant::new(3),
            Participant::new(4).subscribed_to([1, 2]),
            Participant::new(5),
        ];
        let open = vec![
            OpenRoom::loose(vec![1, 2, 3]),
            OpenRoom::loose(vec![5, 4]),
        ];

        let pool = general_fill(pool_with(participants, open));

        assert_eq!(pool.seated()[0].members(), &[1, 2, 3, 4]);
        assert_eq!(open_members(&pool), vec![vec![5]]);
    }

    #[test]
    fn test_general_fill_never_drains_anchored_rooms() {
        let participants = (1..=4).map(Participant::new).collect();
        let open = vec![
            OpenRoom::anchored(vec![1, 2]),
            OpenRoom::anchored(vec![3, 4]),
        ];

        let pool = general_fill(pool_with(participants, open));

        assert!(pool.seated().is_empty());
        assert_eq!(open_members(&pool), vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_anchored_pair_does_not_take_from_larger_triple() {
        let participants = (0..=4).map(Participant::new).collect();
        let open = vec![
            OpenRoom::anchored(vec![0, 1]),
            OpenRoom::loose(vec![2, 3, 4]),
        ];

        let pool = general_fill(pool_with(participants, open));

        assert!(pool.seated().is_empty());
        assert_eq!(open_members(&pool), vec![vec![0, 1], vec![2, 3, 4]]);
    }

    #[test]
    fn test_general_fill_packs_unrelated_singles() {
        let participants = (1..=5).map(Participant::new).collect();
        let open = (1..=5).map(|id| OpenRoom::loose(vec![id])).collect();

        let pool = general_fill(pool_with(participants, open));

        assert_eq!(pool.seated().len(), 1);
        assert_eq!(pool.seated()[0].len(), 4);
        assert_eq!(pool.open().len(), 1);
        assert_eq!(pool.open()[0].len(), 1);
    }
}

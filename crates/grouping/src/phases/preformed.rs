use crate::pool::RemainingPool;
use crate::room::{OpenRoom, ROOM_CAPACITY};
use roomie_graph::ParticipantId;

/// Phase 2: bring preformed groups in and top them up from Phase 1 leftovers
///
/// - four members: kept as-is
/// - three members: the first leftover single joins
/// - two members: the first leftover pair joins, otherwise up to two singles
///
/// Groups that stay below capacity remain open as anchored rooms.
pub(crate) fn run(mut pool: RemainingPool, preformed: &[Vec<ParticipantId>]) -> RemainingPool {
    for group in preformed {
        let mut room = OpenRoom::anchored(group.clone());

        match room.len() {
            3 => {
                if let Some(single) = pool.take_loose_of(1) {
                    room.absorb(single);
                }
            }
            2 => {
                if let Some(pair) = pool.take_loose_of(2) {
                    room.absorb(pair);
                } else {
                    while room.len() < ROOM_CAPACITY {
                        match pool.take_loose_of(1) {
                            Some(single) => room.absorb(single),
                            None => break,
                        }
                    }
                }
            }
            _ => {}
        }

        log::trace!("Preformed group {:?} -> {:?}", group, room.members);
        pool.place(room);
    }

    log::debug!(
        "Integrated {} preformed groups, {} rooms seated so far",
        preformed.len(),
        pool.seated().len()
    );
    pool
}

use crate::pool::RemainingPool;
use crate::room::{Room, ROOM_CAPACITY};

/// Phase 5: merge whatever is still open, largest with smallest
///
/// Rooms are only merged whole and only when the result fits, so preformed
/// groups stay intact and no room exceeds capacity. A room that fits with
/// nobody is seated as-is.
pub(crate) fn run(mut pool: RemainingPool) -> Vec<Room> {
    let mut rooms = pool.take_open();
    let mut merges = 0usize;

    while !rooms.is_empty() {
        // stable: equal sizes keep their relative order
        rooms.sort_by(|a, b| b.len().cmp(&a.len()));
        let mut largest = rooms.remove(0);

        let partner = rooms
            .iter()
            .rposition(|room| largest.len() + room.len() <= ROOM_CAPACITY);

        match partner {
            Some(idx) => {
                largest.absorb(rooms.remove(idx));
                merges += 1;
                if largest.is_full() {
                    pool.seat(largest.members);
                } else {
                    rooms.push(largest);
                }
            }
            None => pool.seat(largest.members),
        }
    }

    log::debug!("Cleanup merged {} rooms", merges);
    pool.into_rooms()
}

use crate::demand::room_demand;
use crate::pool::RemainingPool;
use crate::room::OpenRoom;

/// Phase 3: merge leftover loose pairs into rooms of four
///
/// Each unmerged pair picks the unmerged partner with the highest demand; the
/// first partner wins ties. A lone pair without partner stays open.
pub(crate) fn run(mut pool: RemainingPool) -> RemainingPool {
    let (pairs, rest): (Vec<OpenRoom>, Vec<OpenRoom>) = pool
        .take_open()
        .into_iter()
        .partition(|room| room.is_loose_of(2));

    let mut consumed = vec![false; pairs.len()];
    let mut merged = 0usize;

    for i in 0..pairs.len() {
        if consumed[i] {
            continue;
        }

        let mut best: Option<(usize, usize)> = None;
        for j in 0..pairs.len() {
            if j == i || consumed[j] {
                continue;
            }
            let demand = room_demand(pool.graph(), &pairs[i].members, &pairs[j].members);
            if best.map_or(true, |(_, top)| demand > top) {
                best = Some((j, demand));
            }
        }

        if let Some((j, demand)) = best {
            consumed[i] = true;
            consumed[j] = true;
            log::trace!(
                "Merging pairs {:?} + {:?} (demand {})",
                pairs[i].members,
                pairs[j].members,
                demand
            );
            let mut members = pairs[i].members.clone();
            members.extend(&pairs[j].members);
            pool.seat(members);
            merged += 1;
        }
    }

    log::debug!("Merged {} pairs of pairs", merged);

    for room in rest {
        pool.place(room);
    }
    for (room, used) in pairs.into_iter().zip(consumed) {
        if !used {
            pool.place(room);
        }
    }

    pool
}

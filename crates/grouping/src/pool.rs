use crate::room::{OpenRoom, Room};
use roomie_graph::{ParticipantId, PreferenceGraph};

/// Working state threaded through the grouping phases
///
/// `graph` only contains participants that are not seated yet. Each phase
/// takes the pool by value and hands back the pool for the next phase.
#[derive(Debug, Clone)]
pub(crate) struct RemainingPool {
    graph: PreferenceGraph,
    seated: Vec<Room>,
    open: Vec<OpenRoom>,
}

impl RemainingPool {
    pub fn new(graph: PreferenceGraph) -> Self {
        Self {
            graph,
            seated: Vec::new(),
            open: Vec::new(),
        }
    }

    pub fn graph(&self) -> &PreferenceGraph {
        &self.graph
    }

    pub fn seated(&self) -> &[Room] {
        &self.seated
    }

    pub fn open(&self) -> &[OpenRoom] {
        &self.open
    }

    /// Finalise a room and prune its members from the graph
    pub fn seat(&mut self, members: Vec<ParticipantId>) {
        log::trace!("Seating room {:?}", members);
        self.graph.remove_all(&members);
        self.seated.push(Room::new(members));
    }

    /// Seat full rooms, keep the rest open
    pub fn place(&mut self, room: OpenRoom) {
        if room.is_full() {
            self.seat(room.members);
        } else {
            self.open.push(room);
        }
    }

    pub fn take_open(&mut self) -> Vec<OpenRoom> {
        std::mem::take(&mut self.open)
    }

    /// Remove and return the first loose open room of exactly `size` members
    pub fn take_loose_of(&mut self, size: usize) -> Option<OpenRoom> {
        let idx = self.open.iter().position(|room| room.is_loose_of(size))?;
        Some(self.open.remove(idx))
    }

    /// Seat whatever is still open and return every room
    pub fn into_rooms(mut self) -> Vec<Room> {
        for room in self.take_open() {
            self.seat(room.members);
        }
        self.seated
    }
}

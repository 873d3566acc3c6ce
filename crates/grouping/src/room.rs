use roomie_graph::ParticipantId;
use serde::{Deserialize, Serialize};

/// Maximum number of participants per room
pub const ROOM_CAPACITY: usize = 4;

/// Final room produced by the engine: 1..=4 distinct participant ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Room {
    members: Vec<ParticipantId>,
}

impl Room {
    pub fn new(mut members: Vec<ParticipantId>) -> Self {
        members.sort_unstable();
        Self { members }
    }

    /// Members in ascending id order
    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.members.binary_search(&id).is_ok()
    }

    pub fn into_members(self) -> Vec<ParticipantId> {
        self.members
    }
}

/// Room still being assembled
///
/// Anchored rooms come from preformed groups: they may gain members but are
/// never used as a source of members, so they are never split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenRoom {
    pub members: Vec<ParticipantId>,
    pub anchored: bool,
}

impl OpenRoom {
    pub fn loose(members: Vec<ParticipantId>) -> Self {
        Self {
            members,
            anchored: false,
        }
    }

    pub fn anchored(members: Vec<ParticipantId>) -> Self {
        Self {
            members,
            anchored: true,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }

    /// Loose room of exactly `size` members
    pub fn is_loose_of(&self, size: usize) -> bool {
        !self.anchored && self.members.len() == size
    }

    pub fn absorb(&mut self, other: OpenRoom) {
        self.members.extend(other.members);
        self.anchored |= other.anchored;
    }
}

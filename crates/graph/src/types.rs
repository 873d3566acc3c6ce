use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Participant identifier, unique within a cohort
pub type ParticipantId = u64;

/// One participant of a cohort as handed over by the store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,

    /// Ids this participant wants to room with (out-edges)
    #[serde(default)]
    pub subscription_ids: BTreeSet<ParticipantId>,

    /// Ids that want to room with this participant (in-edges)
    #[serde(default)]
    pub subscriber_ids: BTreeSet<ParticipantId>,

    /// Ids already shown by the recommendation feed
    #[serde(default)]
    pub viewed_ids: BTreeSet<ParticipantId>,
}

impl Participant {
    pub fn new(id: ParticipantId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Builder-style helper, mostly for tests and fixtures
    pub fn subscribed_to(mut self, ids: impl IntoIterator<Item = ParticipantId>) -> Self {
        self.subscription_ids.extend(ids);
        self
    }

    pub fn subscribed_by(mut self, ids: impl IntoIterator<Item = ParticipantId>) -> Self {
        self.subscriber_ids.extend(ids);
        self
    }

    pub fn viewed(mut self, ids: impl IntoIterator<Item = ParticipantId>) -> Self {
        self.viewed_ids.extend(ids);
        self
    }
}

/// Edge sets of a single participant inside a [`crate::PreferenceGraph`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreferenceNode {
    pub subscriptions: BTreeSet<ParticipantId>,
    pub subscribers: BTreeSet<ParticipantId>,
}

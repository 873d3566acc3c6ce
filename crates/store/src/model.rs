use roomie_graph::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

pub type UserId = ParticipantId;
pub type DistributionId = u64;
pub type GroupId = u64;

/// Current on-disk snapshot layout
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("unknown gender '{other}' (expected male|female)")),
        }
    }
}

/// Enrollment lifecycle; only ever moves forward one step at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionState {
    Preparing,
    Answering,
    Gathering,
    Closed,
}

impl DistributionState {
    pub fn next(self) -> Option<Self> {
        match self {
            DistributionState::Preparing => Some(DistributionState::Answering),
            DistributionState::Answering => Some(DistributionState::Gathering),
            DistributionState::Gathering => Some(DistributionState::Closed),
            DistributionState::Closed => None,
        }
    }

    /// Participants may join and form groups
    pub fn is_enrolling(self) -> bool {
        matches!(self, DistributionState::Answering | DistributionState::Gathering)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistributionState::Preparing => "PREPARING",
            DistributionState::Answering => "ANSWERING",
            DistributionState::Gathering => "GATHERING",
            DistributionState::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for DistributionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionState {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "preparing" => Ok(DistributionState::Preparing),
            "answering" => Ok(DistributionState::Answering),
            "gathering" => Ok(DistributionState::Gathering),
            "closed" => Ok(DistributionState::Closed),
            other => Err(format!(
                "unknown state '{other}' (expected preparing|answering|gathering|closed)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub id: DistributionId,
    pub name: String,
    pub state: DistributionState,
    #[serde(default)]
    pub male_participant_ids: BTreeSet<UserId>,
    #[serde(default)]
    pub female_participant_ids: BTreeSet<UserId>,
    /// Groups that coordinated outside the feed and must stay together
    #[serde(default)]
    pub preformed_groups: Vec<BTreeSet<UserId>>,
    #[serde(default)]
    pub group_ids: BTreeSet<GroupId>,
}

impl Distribution {
    pub fn participants(&self, gender: Gender) -> &BTreeSet<UserId> {
        match gender {
            Gender::Male => &self.male_participant_ids,
            Gender::Female => &self.female_participant_ids,
        }
    }

    pub fn participants_mut(&mut self, gender: Gender) -> &mut BTreeSet<UserId> {
        match gender {
            Gender::Male => &mut self.male_participant_ids,
            Gender::Female => &mut self.female_participant_ids,
        }
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.male_participant_ids.contains(&user_id) || self.female_participant_ids.contains(&user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub gender: Gender,
    #[serde(default)]
    pub subscription_ids: BTreeSet<UserId>,
    #[serde(default)]
    pub subscriber_ids: BTreeSet<UserId>,
    #[serde(default)]
    pub viewed_ids: BTreeSet<UserId>,
    #[serde(default)]
    pub group_ids: BTreeSet<GroupId>,
}

impl UserRecord {
    pub fn new(id: UserId, gender: Gender) -> Self {
        Self {
            id,
            gender,
            subscription_ids: BTreeSet::new(),
            subscriber_ids: BTreeSet::new(),
            viewed_ids: BTreeSet::new(),
            group_ids: BTreeSet::new(),
        }
    }

    pub fn to_participant(&self) -> Participant {
        Participant {
            id: self.id,
            subscription_ids: self.subscription_ids.clone(),
            subscriber_ids: self.subscriber_ids.clone(),
            viewed_ids: self.viewed_ids.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: GroupId,
    pub distribution_id: DistributionId,
    pub member_ids: BTreeSet<UserId>,
}

/// Everything the store knows, persisted as one JSON document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub schema_version: u32,
    pub next_distribution_id: DistributionId,
    pub next_user_id: UserId,
    pub next_group_id: GroupId,
    pub distributions: BTreeMap<DistributionId, Distribution>,
    pub users: BTreeMap<UserId, UserRecord>,
    pub groups: BTreeMap<GroupId, GroupRecord>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            next_distribution_id: 1,
            next_user_id: 1,
            next_group_id: 1,
            distributions: BTreeMap::new(),
            users: BTreeMap::new(),
            groups: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_order() {
        assert_eq!(
            DistributionState::Preparing.next(),
            Some(DistributionState::Answering)
        );
        assert_eq!(DistributionState::Closed.next(), None);
        assert!(DistributionState::Gathering.is_enrolling());
        assert!(!DistributionState::Preparing.is_enrolling());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Female".parse::<Gender>(), Ok(Gender::Female));
        assert!("other".parse::<Gender>().is_err());
        assert_eq!(
            "gathering".parse::<DistributionState>(),
            Ok(DistributionState::Gathering)
        );
    }

    #[test]
    fn test_snapshot_json_keys_round_trip() {
        let mut snapshot = Snapshot::default();
        snapshot.users.insert(3, UserRecord::new(3, Gender::Male));

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back, snapshot);
    }
}

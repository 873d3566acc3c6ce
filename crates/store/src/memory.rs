use crate::error::{Result, StoreError};
use crate::model::{
    Distribution, DistributionId, DistributionState, Gender, GroupId, GroupRecord, Snapshot, UserId,
    UserRecord, SNAPSHOT_SCHEMA_VERSION,
};
use crate::store::{PreferenceStore, ViewerContext};
use roomie_graph::{Participant, ParticipantId};
use roomie_grouping::{Room, ROOM_CAPACITY};
use std::collections::BTreeSet;
use std::path::Path;

/// [`PreferenceStore`] backed by an in-memory [`Snapshot`]
///
/// Mutations keep the forward and reverse edge indexes in sync. The snapshot
/// can be loaded from and saved to a JSON file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Snapshot,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema(
                snapshot.schema_version,
                SNAPSHOT_SCHEMA_VERSION,
            ));
        }
        Ok(Self { snapshot })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        log::debug!(
            "Loaded snapshot {}: {} distributions, {} users",
            path.display(),
            snapshot.distributions.len(),
            snapshot.users.len()
        );
        Self::from_snapshot(snapshot)
    }

    /// Write through a temporary file so readers never see a torn snapshot
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(&self.snapshot)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn user(&self, user_id: UserId) -> Result<&UserRecord> {
        self.snapshot
            .users
            .get(&user_id)
            .ok_or(StoreError::UserNotFound(user_id))
    }

    fn user_mut(&mut self, user_id: UserId) -> Result<&mut UserRecord> {
        self.snapshot
            .users
            .get_mut(&user_id)
            .ok_or(StoreError::UserNotFound(user_id))
    }

    fn distribution_ref(&self, distribution_id: DistributionId) -> Result<&Distribution> {
        self.snapshot
            .distributions
            .get(&distribution_id)
            .ok_or(StoreError::DistributionNotFound(distribution_id))
    }

    fn distribution_mut(&mut self, distribution_id: DistributionId) -> Result<&mut Distribution> {
        self.snapshot
            .distributions
            .get_mut(&distribution_id)
            .ok_or(StoreError::DistributionNotFound(distribution_id))
    }

    pub fn group(&self, group_id: GroupId) -> Option<&GroupRecord> {
        self.snapshot.groups.get(&group_id)
    }

    pub fn create_distribution(&mut self, name: impl Into<String>) -> Distribution {
        let id = self.snapshot.next_distribution_id;
        self.snapshot.next_distribution_id += 1;

        let distribution = Distribution {
            id,
            name: name.into(),
            state: DistributionState::Preparing,
            male_participant_ids: BTreeSet::new(),
            female_participant_ids: BTreeSet::new(),
            preformed_groups: Vec::new(),
            group_ids: BTreeSet::new(),
        };
        self.snapshot.distributions.insert(id, distribution.clone());
        log::info!("Created distribution {} ({})", id, distribution.name);
        distribution
    }

    pub fn create_user(&mut self, gender: Gender) -> UserRecord {
        let id = self.snapshot.next_user_id;
        self.snapshot.next_user_id += 1;

        let user = UserRecord::new(id, gender);
        self.snapshot.users.insert(id, user.clone());
        user
    }

    /// Enroll a user into the participant set matching their gender
    pub fn join(&mut self, distribution_id: DistributionId, user_id: UserId) -> Result<()> {
        let gender = self.user(user_id)?.gender;
        let distribution = self.distribution_mut(distribution_id)?;
        if !distribution.state.is_enrolling() {
            return Err(StoreError::UnexpectedState {
                id: distribution_id,
                state: distribution.state,
                expected: "ANSWERING or GATHERING",
            });
        }
        distribution.participants_mut(gender).insert(user_id);
        Ok(())
    }

    /// Withdraw a user from the distribution
    ///
    /// Returns `false` when the user was not a participant. A leaving member
    /// is dropped from their preformed group, and a group left with fewer
    /// than two members is dissolved.
    pub fn leave(&mut self, distribution_id: DistributionId, user_id: UserId) -> Result<bool> {
        let gender = self.user(user_id)?.gender;
        let distribution = self.distribution_mut(distribution_id)?;
        if !distribution.state.is_enrolling() {
            return Err(StoreError::UnexpectedState {
                id: distribution_id,
                state: distribution.state,
                expected: "ANSWERING or GATHERING",
            });
        }
        if !distribution.participants_mut(gender).remove(&user_id) {
            return Ok(false);
        }

        for group in &mut distribution.preformed_groups {
            group.remove(&user_id);
        }
        let before = distribution.preformed_groups.len();
        distribution.preformed_groups.retain(|group| group.len() >= 2);
        if distribution.preformed_groups.len() < before {
            log::debug!(
                "User {} left distribution {}, dissolving their preformed group",
                user_id,
                distribution_id
            );
        }
        Ok(true)
    }

    /// Returns `false` when the subscription already existed
    pub fn subscribe(&mut self, user_id: UserId, target_id: UserId) -> Result<bool> {
        if user_id == target_id {
            return Err(StoreError::SelfSubscription(user_id));
        }
        self.user(target_id)?;

        let added = self.user_mut(user_id)?.subscription_ids.insert(target_id);
        let mirrored = self.user_mut(target_id)?.subscriber_ids.insert(user_id);
        Ok(added || mirrored)
    }

    /// Returns `false` when there was nothing to remove
    pub fn unsubscribe(&mut self, user_id: UserId, target_id: UserId) -> Result<bool> {
        if user_id == target_id {
            return Err(StoreError::SelfSubscription(user_id));
        }
        self.user(target_id)?;

        let removed = self.user_mut(user_id)?.subscription_ids.remove(&target_id);
        let mirrored = self.user_mut(target_id)?.subscriber_ids.remove(&user_id);
        Ok(removed || mirrored)
    }

    /// Returns `false` when the target was already seen
    pub fn mark_viewed(&mut self, user_id: UserId, target_id: UserId) -> Result<bool> {
        if user_id == target_id {
            return Err(StoreError::SelfView(user_id));
        }
        self.user(target_id)?;
        Ok(self.user_mut(user_id)?.viewed_ids.insert(target_id))
    }

    /// Register members that must end up in the same room
    pub fn add_preformed_group(
        &mut self,
        distribution_id: DistributionId,
        members: &[UserId],
    ) -> Result<()> {
        let members: BTreeSet<UserId> = members.iter().copied().collect();
        if !(2..=ROOM_CAPACITY).contains(&members.len()) {
            return Err(StoreError::PreformedGroupSize(members.len()));
        }

        let mut genders = BTreeSet::new();
        for &member in &members {
            genders.insert(self.user(member)?.gender);
        }
        if genders.len() > 1 {
            return Err(StoreError::MixedGenderGroup);
        }

        let distribution = self.distribution_mut(distribution_id)?;
        if !distribution.state.is_enrolling() {
            return Err(StoreError::UnexpectedState {
                id: distribution_id,
                state: distribution.state,
                expected: "ANSWERING or GATHERING",
            });
        }
        for &member in &members {
            if !distribution.is_participant(member) {
                return Err(StoreError::NotParticipant {
                    user: member,
                    distribution: distribution_id,
                });
            }
            if distribution.preformed_groups.iter().any(|g| g.contains(&member)) {
                return Err(StoreError::AlreadyPreformed(member));
            }
        }

        distribution.preformed_groups.push(members);
        Ok(())
    }

    fn participants_of(&self, ids: &BTreeSet<UserId>) -> Result<Vec<Participant>> {
        ids.iter()
            .map(|&id| self.user(id).map(UserRecord::to_participant))
            .collect()
    }
}

impl PreferenceStore for MemoryStore {
    fn distribution(&self, distribution_id: DistributionId) -> Result<Distribution> {
        self.distribution_ref(distribution_id).cloned()
    }

    fn load_cohort(&self, distribution_id: DistributionId, gender: Gender) -> Result<Vec<Participant>> {
        let distribution = self.distribution_ref(distribution_id)?;
        self.participants_of(distribution.participants(gender))
    }

    fn preformed_groups(
        &self,
        distribution_id: DistributionId,
        gender: Gender,
    ) -> Result<Vec<Vec<ParticipantId>>> {
        let distribution = self.distribution_ref(distribution_id)?;
        let participants = distribution.participants(gender);
        Ok(distribution
            .preformed_groups
            .iter()
            .filter(|group| group.iter().all(|id| participants.contains(id)))
            .map(|group| group.iter().copied().collect())
            .collect())
    }

    fn load_viewer_context(&self, distribution_id: DistributionId, viewer_id: UserId) -> Result<ViewerContext> {
        let distribution = self.distribution_ref(distribution_id)?;
        let viewer = self.user(viewer_id)?;
        let participants = distribution.participants(viewer.gender);
        if !participants.contains(&viewer_id) {
            return Err(StoreError::NotParticipant {
                user: viewer_id,
                distribution: distribution_id,
            });
        }

        Ok(ViewerContext {
            viewer: viewer.to_participant(),
            pool: self.participants_of(participants)?,
        })
    }

    fn persist_rooms(&mut self, distribution_id: DistributionId, rooms: &[Room]) -> Result<Vec<GroupId>> {
        self.distribution_ref(distribution_id)?;
        for &member in rooms.iter().flat_map(Room::members) {
            self.user(member)?;
        }

        let mut group_ids = Vec::with_capacity(rooms.len());
        for room in rooms {
            let group_id = self.snapshot.next_group_id;
            self.snapshot.next_group_id += 1;

            let member_ids: BTreeSet<UserId> = room.members().iter().copied().collect();
            for &member in &member_ids {
                self.user_mut(member)?.group_ids.insert(group_id);
            }
            self.snapshot.groups.insert(
                group_id,
                GroupRecord {
                    id: group_id,
                    distribution_id,
                    member_ids,
                },
            );
            self.distribution_mut(distribution_id)?
                .group_ids
                .insert(group_id);
            group_ids.push(group_id);
        }

        log::debug!(
            "Persisted {} groups for distribution {}",
            group_ids.len(),
            distribution_id
        );
        Ok(group_ids)
    }

    fn record_viewed(&mut self, viewer_id: UserId, shown: &[ParticipantId]) -> Result<()> {
        self.user_mut(viewer_id)?.viewed_ids.extend(shown.iter().copied());
        Ok(())
    }

    fn set_state(&mut self, distribution_id: DistributionId, state: DistributionState) -> Result<()> {
        self.distribution_mut(distribution_id)?.state = state;
        Ok(())
    }
}

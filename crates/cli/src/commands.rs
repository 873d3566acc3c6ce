use crate::config::RoomieConfig;
use anyhow::{bail, Context, Result};
use roomie_grouping::{GroupingEngine, Room};
use roomie_recommend::{Recommendation, RecommendationSelector};
use roomie_store::{
    advance_state, close_distribution, recommend, ClosedDistribution, Distribution, DistributionId,
    DistributionState, Gender, MemoryStore, PreferenceStore, UserId, UserRecord,
};
use serde::Serialize;
use std::path::PathBuf;

/// Snapshot location plus loaded configuration for one invocation
pub struct Workspace {
    pub config: RoomieConfig,
    pub snapshot: PathBuf,
}

impl Workspace {
    pub fn new(config: RoomieConfig, snapshot_override: Option<PathBuf>) -> Self {
        let snapshot = snapshot_override.unwrap_or_else(|| config.snapshot.clone());
        Self { config, snapshot }
    }

    fn open(&self) -> Result<MemoryStore> {
        MemoryStore::load(&self.snapshot)
            .with_context(|| format!("Failed to load snapshot {}", self.snapshot.display()))
    }

    fn commit(&self, store: &MemoryStore) -> Result<()> {
        store
            .save(&self.snapshot)
            .with_context(|| format!("Failed to write snapshot {}", self.snapshot.display()))
    }

    /// Load, mutate, save; the snapshot is only written when `op` succeeds
    fn update<T>(&self, op: impl FnOnce(&mut MemoryStore) -> Result<T>) -> Result<T> {
        let mut store = self.open()?;
        let out = op(&mut store)?;
        self.commit(&store)?;
        Ok(out)
    }
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub snapshot: PathBuf,
}

pub fn run_init(ws: &Workspace, force: bool) -> Result<InitOutput> {
    if ws.snapshot.exists() && !force {
        bail!(
            "Snapshot {} already exists (use --force to overwrite)",
            ws.snapshot.display()
        );
    }
    ws.commit(&MemoryStore::new())?;
    log::info!("Initialized empty snapshot at {}", ws.snapshot.display());
    Ok(InitOutput {
        snapshot: ws.snapshot.clone(),
    })
}

pub fn run_new_distribution(ws: &Workspace, name: &str) -> Result<Distribution> {
    ws.update(|store| Ok(store.create_distribution(name)))
}

pub fn run_new_user(ws: &Workspace, gender: Gender) -> Result<UserRecord> {
    ws.update(|store| Ok(store.create_user(gender)))
}

#[derive(Debug, Serialize)]
pub struct MembershipOutput {
    pub distribution_id: DistributionId,
    pub user_ids: Vec<UserId>,
}

pub fn run_join(ws: &Workspace, distribution_id: DistributionId, user_ids: &[UserId]) -> Result<MembershipOutput> {
    ws.update(|store| {
        for &user in user_ids {
            store.join(distribution_id, user)?;
        }
        Ok(MembershipOutput {
            distribution_id,
            user_ids: user_ids.to_vec(),
        })
    })
}

#[derive(Debug, Serialize)]
pub struct LeaveOutput {
    pub distribution_id: DistributionId,
    /// Users that were participants before this call
    pub left_ids: Vec<UserId>,
}

pub fn run_leave(ws: &Workspace, distribution_id: DistributionId, user_ids: &[UserId]) -> Result<LeaveOutput> {
    ws.update(|store| {
        let mut left_ids = Vec::new();
        for &user in user_ids {
            if store.leave(distribution_id, user)? {
                left_ids.push(user);
            }
        }
        Ok(LeaveOutput {
            distribution_id,
            left_ids,
        })
    })
}

pub fn run_preform(ws: &Workspace, distribution_id: DistributionId, members: &[UserId]) -> Result<MembershipOutput> {
    ws.update(|store| {
        store.add_preformed_group(distribution_id, members)?;
        Ok(MembershipOutput {
            distribution_id,
            user_ids: members.to_vec(),
        })
    })
}

#[derive(Debug, Serialize)]
pub struct EdgeOutput {
    pub user_id: UserId,
    pub target_id: UserId,
    pub changed: bool,
}

pub fn run_subscribe(ws: &Workspace, user_id: UserId, target_id: UserId, subscribe: bool) -> Result<EdgeOutput> {
    ws.update(|store| {
        let changed = if subscribe {
            store.subscribe(user_id, target_id)?
        } else {
            store.unsubscribe(user_id, target_id)?
        };
        Ok(EdgeOutput {
            user_id,
            target_id,
            changed,
        })
    })
}

pub fn run_view(ws: &Workspace, user_id: UserId, target_id: UserId) -> Result<EdgeOutput> {
    ws.update(|store| {
        let changed = store.mark_viewed(user_id, target_id)?;
        Ok(EdgeOutput {
            user_id,
            target_id,
            changed,
        })
    })
}

#[derive(Debug, Serialize)]
pub struct AdvanceOutput {
    pub distribution_id: DistributionId,
    pub state: DistributionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<ClosedDistribution>,
}

pub fn run_advance(ws: &Workspace, distribution_id: DistributionId, to: DistributionState) -> Result<AdvanceOutput> {
    ws.update(|store| {
        let closed = advance_state(store, distribution_id, to)?;
        Ok(AdvanceOutput {
            distribution_id,
            state: to,
            closed,
        })
    })
}

pub fn run_close(ws: &Workspace, distribution_id: DistributionId) -> Result<ClosedDistribution> {
    ws.update(|store| Ok(close_distribution(store, distribution_id)?))
}

#[derive(Debug, Serialize)]
pub struct GroupPreview {
    pub distribution_id: DistributionId,
    pub gender: Gender,
    pub rooms: Vec<Room>,
}

/// Dry run of the grouping engine; the snapshot is left untouched
pub fn run_group(ws: &Workspace, distribution_id: DistributionId, gender: Gender) -> Result<GroupPreview> {
    let store = ws.open()?;
    let cohort = store.load_cohort(distribution_id, gender)?;
    let preformed = store.preformed_groups(distribution_id, gender)?;
    let rooms = GroupingEngine::new().group(&cohort, &preformed)?;
    Ok(GroupPreview {
        distribution_id,
        gender,
        rooms,
    })
}

pub struct RecommendRequest {
    pub distribution_id: DistributionId,
    pub viewer_id: UserId,
    pub amount: Option<usize>,
    pub seed: Option<u64>,
    pub no_record: bool,
}

pub fn run_recommend(ws: &Workspace, request: RecommendRequest) -> Result<Recommendation> {
    let settings = &ws.config.recommend;
    let amount = request.amount.unwrap_or(settings.default_amount);
    let record = settings.record_viewed && !request.no_record;
    let mut selector = match request.seed.or(settings.seed) {
        Some(seed) => RecommendationSelector::seeded(seed),
        None => RecommendationSelector::from_entropy(),
    };

    let mut store = ws.open()?;
    let result = recommend(
        &mut store,
        &mut selector,
        request.distribution_id,
        request.viewer_id,
        amount,
        record,
    )?;
    if record && !result.is_empty() {
        ws.commit(&store)?;
    }
    Ok(result)
}

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

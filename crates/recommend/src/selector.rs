use crate::error::{RecommendError, Result};
use crate::partition::divide_while;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use roomie_graph::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Largest amount a single call may ask for
pub const MAX_AMOUNT: usize = 10;

/// Which selection strategy produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// People who subscribed to the viewer and were not shown yet
    Reciprocal,
    /// Pool members the viewer has not seen yet
    Unviewed,
    /// Random sample of already seen pool members
    Viewed,
    /// Nothing left to show
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tier: Tier,
    pub ids: Vec<ParticipantId>,
}

impl Recommendation {
    fn new(tier: Tier, ids: Vec<ParticipantId>) -> Self {
        Self { tier, ids }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Tiered candidate selector
///
/// Holds nothing but its random source; the viewed-pool tier is the only
/// place randomness is used, so two selectors with the same seed return the
/// same results for the same snapshot.
#[derive(Debug, Clone)]
pub struct RecommendationSelector<R = StdRng> {
    rng: R,
}

impl RecommendationSelector<StdRng> {
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RecommendationSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Pick up to `amount` ids for `viewer` to look at next
    ///
    /// Tiers run in order and the first non-empty one wins:
    /// 1. subscribers the viewer has not subscribed back to and not seen
    /// 2. unseen pool members (scan stops once `amount` are found)
    /// 3. a uniform sample of seen pool members
    ///
    /// The viewer and its subscriptions never appear in the result.
    pub fn recommend(
        &mut self,
        viewer: &Participant,
        pool: &[Participant],
        amount: usize,
    ) -> Result<Recommendation> {
        if !(1..=MAX_AMOUNT).contains(&amount) {
            return Err(RecommendError::AmountOutOfRange {
                amount,
                max: MAX_AMOUNT,
            });
        }

        let subscriptions = &viewer.subscription_ids;
        let viewed: BTreeSet<ParticipantId> = viewer
            .viewed_ids
            .difference(subscriptions)
            .copied()
            .collect();

        let reciprocal: Vec<ParticipantId> = viewer
            .subscriber_ids
            .iter()
            .copied()
            .filter(|id| *id != viewer.id && !subscriptions.contains(id) && !viewed.contains(id))
            .take(amount)
            .collect();
        if !reciprocal.is_empty() {
            log::debug!(
                "Viewer {}: {} reciprocal candidates",
                viewer.id,
                reciprocal.len()
            );
            return Ok(Recommendation::new(Tier::Reciprocal, reciprocal));
        }

        let candidates: BTreeSet<ParticipantId> = pool.iter().map(|p| p.id).collect();
        let (seen, unseen) = divide_while(
            candidates
                .into_iter()
                .filter(|id| *id != viewer.id && !subscriptions.contains(id)),
            &viewed,
            |_, unseen| unseen.len() < amount,
        );

        if !unseen.is_empty() {
            log::debug!("Viewer {}: {} unseen candidates", viewer.id, unseen.len());
            return Ok(Recommendation::new(Tier::Unviewed, unseen));
        }

        if !seen.is_empty() {
            let sample: Vec<ParticipantId> = seen
                .choose_multiple(&mut self.rng, amount)
                .copied()
                .collect();
            log::debug!(
                "Viewer {}: sampled {} of {} seen candidates",
                viewer.id,
                sample.len(),
                seen.len()
            );
            return Ok(Recommendation::new(Tier::Viewed, sample));
        }

        log::debug!("Viewer {}: pool exhausted", viewer.id);
        Ok(Recommendation::new(Tier::Empty, Vec::new()))
    }
}

/// One-shot helper using an entropy-seeded selector
pub fn recommend(viewer: &Participant, pool: &[Participant], amount: usize) -> Result<Recommendation> {
    RecommendationSelector::from_entropy().recommend(viewer, pool, amount)
}

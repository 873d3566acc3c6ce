use crate::error::Result;
use crate::graph::PreferenceGraph;
use crate::types::{Participant, ParticipantId};

/// Build a [`PreferenceGraph`] from store participants
///
/// Subscriptions and subscribers are copied as loaded: the subscriber set is
/// the store's reverse index and is not re-derived here. Edges pointing at ids
/// outside the cohort are dropped so nothing foreign can end up in a room.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    dropped_edges: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edges dropped by the last [`GraphBuilder::build`] call
    pub fn dropped_edges(&self) -> usize {
        self.dropped_edges
    }

    pub fn build(&mut self, participants: &[Participant]) -> Result<PreferenceGraph> {
        let mut graph = PreferenceGraph::new();
        self.dropped_edges = 0;

        // Phase 1: nodes
        for participant in participants {
            graph.add_participant(participant.id)?;
        }

        // Phase 2: edges restricted to the cohort
        for participant in participants {
            for &target in &participant.subscription_ids {
                if self.keep_edge(&graph, participant.id, target) {
                    graph.add_subscription(participant.id, target)?;
                }
            }
            for &source in &participant.subscriber_ids {
                if self.keep_edge(&graph, participant.id, source) {
                    graph.add_subscriber(participant.id, source)?;
                }
            }
        }

        if self.dropped_edges > 0 {
            log::warn!(
                "Dropped {} preference edges pointing outside the cohort",
                self.dropped_edges
            );
        }
        log::debug!(
            "Built preference graph: {} participants, {} subscriptions",
            graph.len(),
            graph.edge_count()
        );

        Ok(graph)
    }

    fn keep_edge(&mut self, graph: &PreferenceGraph, owner: ParticipantId, other: ParticipantId) -> bool {
        if other == owner || !graph.contains(other) {
            log::trace!("Skipping edge {} <-> {}", owner, other);
            self.dropped_edges += 1;
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    #[test]
    fn test_build_copies_both_edge_sets() {
        let participants = vec![
            Participant::new(1).subscribed_to([2]).subscribed_by([3]),
            Participant::new(2).subscribed_by([1]),
            Participant::new(3).subscribed_to([1]),
        ];

        let mut builder = GraphBuilder::new();
        let graph = builder.build(&participants).unwrap();

        assert_eq!(graph.len(), 3);
        assert!(graph.has_subscription(1, 2));
        assert!(graph.has_subscription(3, 1));
        assert_eq!(graph.subscribers(1).collect::<Vec<_>>(), vec![3]);
        assert_eq!(builder.dropped_edges(), 0);
    }

    #[test]
    fn test_build_drops_foreign_and_self_edges() {
        let participants = vec![
            Participant::new(1).subscribed_to([1, 2, 99]).subscribed_by([42]),
            Participant::new(2),
        ];

        let mut builder = GraphBuilder::new();
        let graph = builder.build(&participants).unwrap();

        assert_eq!(graph.subscriptions(1).collect::<Vec<_>>(), vec![2]);
        assert_eq!(graph.subscribers(1).count(), 0);
        assert_eq!(builder.dropped_edges(), 3);
    }

    #[test]
    fn test_build_rejects_duplicates() {
        let participants = vec![Participant::new(7), Participant::new(7)];
        let err = GraphBuilder::new().build(&participants).unwrap_err();
        assert_eq!(err, GraphError::DuplicateParticipant(7));
    }
}

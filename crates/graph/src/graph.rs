use crate::error::{GraphError, Result};
use crate::types::{ParticipantId, PreferenceNode};
use std::collections::{BTreeMap, BTreeSet};

/// Preference graph keyed by participant id
///
/// Holds only the participants that are still in play; seating a participant
/// removes it together with every reference other nodes hold to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceGraph {
    nodes: BTreeMap<ParticipantId, PreferenceNode>,
}

impl PreferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an empty node, failing if the id is already present
    pub fn add_participant(&mut self, id: ParticipantId) -> Result<()> {
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateParticipant(id));
        }
        self.nodes.insert(id, PreferenceNode::default());
        Ok(())
    }

    /// Record `from -> to` on the subscription side of `from`
    pub fn add_subscription(&mut self, from: ParticipantId, to: ParticipantId) -> Result<()> {
        self.node_mut(from)?.subscriptions.insert(to);
        Ok(())
    }

    /// Record `from -> to` on the subscriber side of `to`
    pub fn add_subscriber(&mut self, to: ParticipantId, from: ParticipantId) -> Result<()> {
        self.node_mut(to)?.subscribers.insert(from);
        Ok(())
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: ParticipantId) -> Option<&PreferenceNode> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: ParticipantId) -> Result<&mut PreferenceNode> {
        self.nodes
            .get_mut(&id)
            .ok_or(GraphError::ParticipantNotFound(id))
    }

    /// Ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Out-edges of `id`; empty for unknown ids
    pub fn subscriptions(&self, id: ParticipantId) -> impl Iterator<Item = ParticipantId> + '_ {
        self.nodes
            .get(&id)
            .into_iter()
            .flat_map(|node| node.subscriptions.iter().copied())
    }

    /// In-edges of `id`; empty for unknown ids
    pub fn subscribers(&self, id: ParticipantId) -> impl Iterator<Item = ParticipantId> + '_ {
        self.nodes
            .get(&id)
            .into_iter()
            .flat_map(|node| node.subscribers.iter().copied())
    }

    pub fn has_subscription(&self, from: ParticipantId, to: ParticipantId) -> bool {
        self.nodes
            .get(&from)
            .is_some_and(|node| node.subscriptions.contains(&to))
    }

    /// Both sides subscribed to each other
    pub fn is_reciprocal(&self, a: ParticipantId, b: ParticipantId) -> bool {
        self.has_subscription(a, b) && self.has_subscription(b, a)
    }

    /// Every pair of `members` is reciprocal and every member is still present
    pub fn is_clique(&self, members: &[ParticipantId]) -> bool {
        members.iter().all(|&a| {
            self.contains(a)
                && members
                    .iter()
                    .filter(|&&b| b != a)
                    .all(|&b| self.has_subscription(a, b))
        })
    }

    /// Whether `candidate` shows up in either edge set of `member`
    ///
    /// This is the unit of demand scoring: it looks only at `member`'s view of
    /// the graph, so one-directional interest on either side counts once.
    pub fn relates(&self, candidate: ParticipantId, member: ParticipantId) -> bool {
        self.nodes.get(&member).is_some_and(|node| {
            node.subscribers.contains(&candidate) || node.subscriptions.contains(&candidate)
        })
    }

    /// Remove a participant and every reference to it
    pub fn remove(&mut self, id: ParticipantId) -> bool {
        if self.nodes.remove(&id).is_none() {
            return false;
        }
        for node in self.nodes.values_mut() {
            node.subscriptions.remove(&id);
            node.subscribers.remove(&id);
        }
        true
    }

    /// Remove several participants in one sweep over the remaining nodes
    pub fn remove_all(&mut self, ids: &[ParticipantId]) {
        let removed: BTreeSet<ParticipantId> = ids
            .iter()
            .copied()
            .filter(|id| self.nodes.remove(id).is_some())
            .collect();
        if removed.is_empty() {
            return;
        }
        for node in self.nodes.values_mut() {
            node.subscriptions.retain(|id| !removed.contains(id));
            node.subscribers.retain(|id| !removed.contains(id));
        }
    }

    /// Copy with `drop` removed and pruned
    pub fn without(&self, drop: &BTreeSet<ParticipantId>) -> Self {
        let mut copy = self.clone();
        let ids: Vec<ParticipantId> = drop.iter().copied().collect();
        copy.remove_all(&ids);
        copy
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.subscriptions.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(edges: &[(ParticipantId, ParticipantId)], ids: &[ParticipantId]) -> PreferenceGraph {
        let mut graph = PreferenceGraph::new();
        for &id in ids {
            graph.add_participant(id).unwrap();
        }
        for &(from, to) in edges {
            graph.add_subscription(from, to).unwrap();
            graph.add_subscriber(to, from).unwrap();
        }
        graph
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let mut graph = PreferenceGraph::new();
        graph.add_participant(1).unwrap();
        assert_eq!(
            graph.add_participant(1),
            Err(GraphError::DuplicateParticipant(1))
        );
    }

    #[test]
    fn test_reciprocity_and_cliques() {
        let graph = graph_of(&[(1, 2), (2, 1), (2, 3), (3, 2), (1, 3)], &[1, 2, 3]);

        assert!(graph.is_reciprocal(1, 2));
        assert!(!graph.is_reciprocal(1, 3));
        assert!(graph.is_clique(&[1, 2]));
        assert!(graph.is_clique(&[3]));
        assert!(!graph.is_clique(&[1, 2, 3]));
        assert!(!graph.is_clique(&[1, 9]));
    }

    #[test]
    fn test_relates_uses_member_view() {
        let graph = graph_of(&[(1, 2)], &[1, 2, 3]);

        // 1 is a subscriber of 2, and 2 is a subscription of 1
        assert!(graph.relates(1, 2));
        assert!(graph.relates(2, 1));
        assert!(!graph.relates(3, 1));
    }

    #[test]
    fn test_remove_prunes_references() {
        let mut graph = graph_of(&[(1, 2), (2, 1), (3, 1), (2, 3)], &[1, 2, 3]);

        assert!(graph.remove(1));
        assert!(!graph.contains(1));
        assert_eq!(graph.subscriptions(2).collect::<Vec<_>>(), vec![3]);
        assert_eq!(graph.subscribers(2).count(), 0);
        assert_eq!(graph.subscriptions(3).count(), 0);
        assert!(!graph.remove(1));
    }

    #[test]
    fn test_remove_all_and_without() {
        let graph = graph_of(&[(1, 2), (2, 3), (3, 4), (4, 1)], &[1, 2, 3, 4]);

        let trimmed = graph.without(&[2, 4].into_iter().collect());
        assert_eq!(trimmed.ids().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(trimmed.edge_count(), 0);
        assert_eq!(graph.edge_count(), 4);
    }
}

use roomie_graph::{ParticipantId, PreferenceGraph};

/// Count of `room` members whose edge sets mention `candidate`
pub fn candidate_demand(
    graph: &PreferenceGraph,
    candidate: ParticipantId,
    room: &[ParticipantId],
) -> usize {
    room.iter()
        .filter(|&&member| graph.relates(candidate, member))
        .count()
}

/// Directed relations between the members of two rooms, read from `b`'s side
pub fn room_demand(graph: &PreferenceGraph, a: &[ParticipantId], b: &[ParticipantId]) -> usize {
    a.iter()
        .map(|&candidate| candidate_demand(graph, candidate, b))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomie_graph::{GraphBuilder, Participant};

    fn graph() -> PreferenceGraph {
        // 1 -> 3, 4 -> 2, 3 <-> 2
        GraphBuilder::new()
            .build(&[
                Participant::new(1).subscribed_to([3]),
                Participant::new(2).subscribed_to([3]).subscribed_by([3, 4]),
                Participant::new(3).subscribed_to([2]).subscribed_by([1, 2]),
                Participant::new(4).subscribed_to([2]),
            ])
            .unwrap()
    }

    #[test]
    fn test_candidate_demand_counts_either_direction() {
        let graph = graph();
        assert_eq!(candidate_demand(&graph, 1, &[3, 4]), 1);
        assert_eq!(candidate_demand(&graph, 2, &[3, 4]), 2);
        assert_eq!(candidate_demand(&graph, 1, &[2, 4]), 0);
    }

    #[test]
    fn test_room_demand_sums_members() {
        let graph = graph();
        assert_eq!(room_demand(&graph, &[1, 2], &[3, 4]), 3);
        assert_eq!(room_demand(&graph, &[1], &[4]), 0);
    }
}

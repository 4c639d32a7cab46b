//! Directed-graph helpers over connection lists `(from, to)`.

use std::collections::BTreeSet;

/// Whether adding `test` to `connections` would close a cycle.
pub fn creates_cycle(connections: &[(i64, i64)], test: (i64, i64)) -> bool {
    let (from, to) = test;
    if from == to {
        return true;
    }

    let mut visited = BTreeSet::from([to]);
    loop {
        let mut added = 0;
        for &(a, b) in connections {
            if visited.contains(&a) && !visited.contains(&b) {
                if b == from {
                    return true;
                }
                visited.insert(b);
                added += 1;
            }
        }
        if added == 0 {
            return false;
        }
    }
}

/// Non-input nodes whose value can reach an output, outputs included.
pub fn required_for_output(
    inputs: &[i64],
    outputs: &[i64],
    connections: &[(i64, i64)],
) -> BTreeSet<i64> {
    let mut required: BTreeSet<i64> = outputs.iter().copied().collect();
    let mut seen = required.clone();
    loop {
        let frontier: BTreeSet<i64> = connections
            .iter()
            .filter(|(a, b)| seen.contains(b) && !seen.contains(a))
            .map(|&(a, _)| a)
            .collect();
        if frontier.is_empty() {
            break;
        }
        let layer: BTreeSet<i64> = frontier
            .iter()
            .copied()
            .filter(|n| !inputs.contains(n))
            .collect();
        if layer.is_empty() {
            break;
        }
        required.extend(layer);
        seen.extend(frontier);
    }
    required
}

/// Groups required nodes into layers that can be evaluated in order: every
/// node's inputs are inputs or belong to an earlier layer.
pub fn feed_forward_layers(
    inputs: &[i64],
    outputs: &[i64],
    connections: &[(i64, i64)],
) -> Vec<Vec<i64>> {
    let required = required_for_output(inputs, outputs, connections);
    let mut layers = Vec::new();
    let mut ready: BTreeSet<i64> = inputs.iter().copied().collect();
    loop {
        let candidates: BTreeSet<i64> = connections
            .iter()
            .filter(|(a, b)| ready.contains(a) && !ready.contains(b))
            .map(|&(_, b)| b)
            .collect();
        let layer: Vec<i64> = candidates
            .into_iter()
            .filter(|n| required.contains(n))
            .filter(|n| {
                connections
                    .iter()
                    .filter(|(_, b)| b == n)
                    .all(|(a, _)| ready.contains(a))
            })
            .collect();
        if layer.is_empty() {
            break;
        }
        ready.extend(layer.iter().copied());
        layers.push(layer);
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_cycle() {
        let conns = [(-1, 1), (1, 0)];
        assert!(creates_cycle(&conns, (0, 1)));
        assert!(creates_cycle(&conns, (0, -1)));
        assert!(creates_cycle(&conns, (1, 1)));
        assert!(!creates_cycle(&conns, (-1, 0)));
    }

    #[test]
    fn test_required_skips_dead_ends() {
        // Node 2 feeds nothing that reaches the output
        let conns = [(-1, 1), (1, 0), (-2, 2)];
        let required = required_for_output(&[-1, -2], &[0], &conns);
        assert_eq!(required, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_layers_respect_dependencies() {
        let conns = [(-1, 1), (-2, 1), (1, 0), (-1, 0), (-2, 2), (2, 0)];
        let layers = feed_forward_layers(&[-1, -2], &[0], &conns);
        assert_eq!(layers, vec![vec![1, 2], vec![0]]);
    }

    #[test]
    fn test_unconnected_output_gets_no_layer() {
        let layers = feed_forward_layers(&[-1], &[0], &[]);
        assert!(layers.is_empty());
    }
}

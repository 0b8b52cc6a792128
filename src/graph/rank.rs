use crate::config::RankConfig;
use crate::graph::{LinkGraph, NodeId};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// PageRank power iteration with dangling-mass redistribution
///
/// Each iteration computes, for every node `i`:
///
/// ```text
/// p'[i] = s * Σ_{j → i} p[j] / out[j]  +  s * D / n  +  (1 - s) / n
/// ```
///
/// where `s` is the dampening factor and `D` the rank held by dangling nodes.
/// The vector is renormalized after every step so it always sums to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRank {
    pub dampening: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for PageRank {
    fn default() -> Self {
        Self::from_config(&RankConfig::default())
    }
}

/// Result of a ranking pass
#[derive(Debug, Clone, PartialEq)]
pub struct RankOutcome {
    /// Rank per node id
    pub ranks: Vec<f64>,
    /// Iterations performed
    pub iterations: usize,
    /// False when the iteration cap stopped the pass
    pub converged: bool,
    /// L1 change of the last iteration
    pub delta: f64,
}

impl RankOutcome {
    /// The `n` best ranked nodes, see [`top_n`]
    pub fn top(&self, n: usize) -> Vec<(NodeId, f64)> {
        top_n(&self.ranks, n)
    }
}

impl PageRank {
    pub fn from_config(config: &RankConfig) -> Self {
        Self {
            dampening: config.dampening,
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
        }
    }

    /// Ranks every node of `graph`
    ///
    /// Stops once an iteration changes the vector by less than `tolerance`
    /// (L1 norm) or after `max_iterations`. Hitting the cap is not an error:
    /// the latest vector is returned with `converged == false`.
    pub fn run(&self, graph: &LinkGraph) -> RankOutcome {
        let n = graph.len();
        if n == 0 {
            return RankOutcome {
                ranks: Vec::new(),
                iterations: 0,
                converged: true,
                delta: 0.0,
            };
        }

        let s = self.dampening;
        let uniform = 1.0 / n as f64;
        let dangling: Vec<NodeId> = (0..n).filter(|&id| graph.is_dangling(id)).collect();

        let mut ranks = vec![uniform; n];
        let mut next = vec![0.0; n];
        let mut iterations = 0;
        let mut delta = f64::INFINITY;

        while iterations < self.max_iterations {
            iterations += 1;

            let dangling_mass: f64 = dangling.iter().map(|&id| ranks[id]).sum();
            let base = s * dangling_mass * uniform + (1.0 - s) * uniform;

            for (id, slot) in next.iter_mut().enumerate() {
                let linked: f64 = graph
                    .inbound(id)
                    .iter()
                    .map(|&src| ranks[src] / f64::from(graph.out_degree(src)))
                    .sum();
                *slot = base + s * linked;
            }

            let total: f64 = next.iter().sum();
            if total > 0.0 {
                next.iter_mut().for_each(|p| *p /= total);
            }

            delta = ranks.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
            std::mem::swap(&mut ranks, &mut next);

            if delta < self.tolerance {
                tracing::debug!("PageRank converged after {} iterations", iterations);
                return RankOutcome {
                    ranks,
                    iterations,
                    converged: true,
                    delta,
                };
            }
        }

        tracing::warn!(
            "PageRank stopped after {} iterations without converging (delta {:.3e})",
            iterations,
            delta
        );
        RankOutcome {
            ranks,
            iterations,
            converged: false,
            delta,
        }
    }
}

/// Score wrapper ordering better entries higher: larger score, then lower id
#[derive(Debug, Clone, Copy)]
struct Ranked {
    score: f64,
    id: NodeId,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

/// Selects the `n` highest ranks, best first
///
/// Ties go to the lower id. Asking for more entries than exist returns all
/// of them; `n == 0` returns nothing.
pub fn top_n(ranks: &[f64], n: usize) -> Vec<(NodeId, f64)> {
    if n == 0 {
        return Vec::new();
    }

    // min-heap holding the best n seen so far
    let mut heap: BinaryHeap<Reverse<Ranked>> = BinaryHeap::with_capacity(n.min(ranks.len()));
    for (id, &score) in ranks.iter().enumerate() {
        let entry = Ranked { score, id };
        if heap.len() < n {
            heap.push(Reverse(entry));
        } else if heap.peek().is_some_and(|Reverse(worst)| entry > *worst) {
            heap.pop();
            heap.push(Reverse(entry));
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(entry)| (entry.id, entry.score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn graph(nodes: &[&str], links: &[(&str, &str)]) -> LinkGraph {
        let mut graph = LinkGraph::with_capacity(nodes.len()).unwrap();
        for node in nodes {
            graph.add_url(node).unwrap();
        }
        for (src, dest) in links {
            graph.add_link(dest, src).unwrap();
        }
        graph
    }

    #[test]
    fn test_empty_graph() {
        let outcome = PageRank::default().run(&LinkGraph::with_capacity(0).unwrap());
        assert!(outcome.ranks.is_empty());
        assert!(outcome.converged);
        assert!(outcome.top(5).is_empty());
    }

    #[test]
    fn test_ranks_sum_to_one_every_iteration() {
        let g = graph(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("a", "d"), ("d", "b")],
        );

        for cap in 1..=15 {
            let outcome = PageRank {
                dampening: 0.85,
                tolerance: 1e-12,
                max_iterations: cap,
            }
            .run(&g);
            let sum: f64 = outcome.ranks.iter().sum();
            assert!((sum - 1.0).abs() < EPS, "sum {} after {} iterations", sum, cap);
        }
    }

    #[test]
    fn test_two_nodes_dangling_target() {
        // A -> B, B has no out-links
        let outcome = PageRank::default().run(&graph(&["A", "B"], &[("A", "B")]));
        assert!(outcome.converged);

        // p_A = 0.075 + 0.425 p_B with p_A + p_B = 1
        let expected_a = 0.5 / 1.425;
        assert!((outcome.ranks[0] - expected_a).abs() < 1e-6);
        assert!((outcome.ranks[1] - (1.0 - expected_a)).abs() < 1e-6);
        assert!(outcome.ranks[1] > outcome.ranks[0]);
    }

    #[test]
    fn test_cycle_is_uniform() {
        let outcome = PageRank::default().run(&graph(
            &["a", "b", "c"],
            &[("a", "b"), ("b", "c"), ("c", "a")],
        ));
        for rank in &outcome.ranks {
            assert!((rank - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_iteration_cap() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("a", "c"), ("b", "c")]);
        let outcome = PageRank {
            dampening: 0.85,
            tolerance: 1e-300,
            max_iterations: 3,
        }
        .run(&g);

        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 3);
        assert_eq!(outcome.ranks.len(), 3);
        assert!(outcome.delta > 0.0);
    }

    #[test]
    fn test_top_n_larger_than_graph() {
        let ranks = [0.1, 0.3, 0.2, 0.25, 0.15];
        let top = top_n(&ranks, 10);
        let ids: Vec<NodeId> = top.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 3, 2, 4, 0]);
    }

    #[test]
    fn test_top_n_bounded_and_ties() {
        let ranks = [0.2, 0.4, 0.2, 0.1, 0.1];
        assert_eq!(top_n(&ranks, 2), vec![(1, 0.4), (0, 0.2)]);
        assert_eq!(top_n(&ranks, 3), vec![(1, 0.4), (0, 0.2), (2, 0.2)]);
        assert!(top_n(&ranks, 0).is_empty());
    }
}

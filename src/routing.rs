// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Elastic Optical Network Simulation Suite ("RMSA") - K-Shortest-Path Routing

use std::cmp::Ordering;
use std::collections::HashSet;

use petgraph::algo::astar;
use petgraph::graph::{EdgeReference, NodeIndex};
use petgraph::visit::{EdgeFiltered, EdgeRef};
use serde::Serialize;

use crate::topology::{NodeId, Topology};

/// A loopless route with its physical length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatePath {
    pub nodes: Vec<NodeId>,
    pub distance_km: f64,
}

impl CandidatePath {
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    fn rank(&self, other: &Self) -> Ordering {
        self.distance_km
            .total_cmp(&other.distance_km)
            .then_with(|| self.hops().cmp(&other.hops()))
            .then_with(|| self.nodes.cmp(&other.nodes))
    }
}

/// Up to `k` simple paths from `source` to `destination`, ascending by total
/// distance (ties: fewer hops, then lower node sequence). Empty when the
/// endpoints are identical, unknown, or disconnected.
///
/// Yen's algorithm: each spur search is a Dijkstra (A* with a zero
/// heuristic) over an edge-filtered view that hides the root path's nodes
/// and the edges already used by accepted paths sharing that root.
pub fn k_shortest_paths(
    topology: &Topology,
    source: NodeId,
    destination: NodeId,
    k: usize,
) -> Vec<CandidatePath> {
    let n = topology.node_count();
    if k == 0 || source == destination || source as usize >= n || destination as usize >= n {
        return Vec::new();
    }

    let first = match shortest_path(topology, source, destination, &HashSet::new(), &HashSet::new()) {
        Some(p) => p,
        None => return Vec::new(),
    };

    let mut accepted = vec![first];
    let mut pool: Vec<CandidatePath> = Vec::new();

    while accepted.len() < k {
        let last = accepted[accepted.len() - 1].nodes.clone();

        for i in 0..last.len() - 1 {
            let spur = last[i];
            let root = &last[..=i];

            let mut banned_edges = HashSet::new();
            for path in &accepted {
                if path.nodes.len() > i + 1 && path.nodes[..=i] == *root {
                    if let Some(e) = topology.edge_index(path.nodes[i], path.nodes[i + 1]) {
                        banned_edges.insert(e);
                    }
                }
            }
            let banned_nodes: HashSet<NodeId> = root[..i].iter().copied().collect();

            let spur_path = match shortest_path(topology, spur, destination, &banned_nodes, &banned_edges) {
                Some(p) => p,
                None => continue,
            };

            let mut nodes = root[..i].to_vec();
            nodes.extend_from_slice(&spur_path.nodes);
            let distance_km = match topology.path_distance(&nodes) {
                Some(d) => d,
                None => continue,
            };
            let candidate = CandidatePath { nodes, distance_km };

            let known = accepted.iter().chain(pool.iter()).any(|p| p.nodes == candidate.nodes);
            if !known {
                pool.push(candidate);
            }
        }

        if pool.is_empty() {
            break;
        }
        pool.sort_by(|a, b| a.rank(b));
        accepted.push(pool.remove(0));
    }

    accepted.sort_by(|a, b| a.rank(b));
    accepted
}

/// Dijkstra from `from` to `to`, skipping banned nodes and edge indices.
fn shortest_path(
    topology: &Topology,
    from: NodeId,
    to: NodeId,
    banned_nodes: &HashSet<NodeId>,
    banned_edges: &HashSet<usize>,
) -> Option<CandidatePath> {
    let graph = topology.graph();
    let filtered = EdgeFiltered::from_fn(graph, |e: EdgeReference<'_, f64>| {
        !banned_edges.contains(&e.id().index())
            && !banned_nodes.contains(&(e.source().index() as NodeId))
            && !banned_nodes.contains(&(e.target().index() as NodeId))
    });

    let goal = NodeIndex::new(to as usize);
    let (distance_km, path) = astar(
        &filtered,
        NodeIndex::new(from as usize),
        |n| n == goal,
        |e| *e.weight(),
        |_| 0.0,
    )?;

    Some(CandidatePath {
        nodes: path.into_iter().map(|n| n.index() as NodeId).collect(),
        distance_km,
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Elastic Optical Network Simulation Suite ("RMSA") - Topology Catalog

use once_cell::sync::Lazy;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use serde::Serialize;

use crate::config::ConfigError;

pub type NodeId = u32;

// ─── Link Tables (u, v, distance km) ─────────────────────────────────────────
// Edge index == position in the table.

const NSFNET_LINKS: &[(NodeId, NodeId, f64)] = &[
    (0, 1, 1050.0), (0, 2, 1500.0), (0, 3, 2700.0),
    (1, 2, 600.0), (1, 7, 1000.0),
    (2, 5, 750.0),
    (3, 4, 600.0), (3, 11, 750.0),
    (4, 5, 600.0), (4, 6, 900.0),
    (5, 9, 900.0), (5, 12, 750.0),
    (6, 7, 600.0),
    (7, 8, 750.0),
    (8, 9, 750.0), (8, 10, 900.0),
    (9, 12, 600.0), (9, 13, 600.0),
    (10, 11, 600.0), (10, 12, 600.0),
    (11, 13, 300.0),
];

const USNET_LINKS: &[(NodeId, NodeId, f64)] = &[
    (0, 1, 800.0), (0, 5, 1000.0),
    (1, 2, 1100.0), (1, 5, 950.0),
    (2, 3, 250.0), (2, 4, 1000.0), (2, 6, 1000.0),
    (3, 4, 850.0), (3, 6, 1200.0),
    (4, 7, 1200.0),
    (5, 6, 1000.0), (5, 8, 1200.0), (5, 10, 1900.0),
    (6, 7, 1150.0), (6, 8, 1000.0),
    (7, 9, 900.0),
    (8, 9, 1000.0), (8, 10, 900.0), (8, 11, 950.0),
    (9, 12, 900.0), (9, 13, 850.0),
    (10, 11, 1000.0), (10, 14, 1250.0), (10, 18, 2600.0),
    (11, 12, 900.0), (11, 15, 850.0),
    (12, 13, 650.0), (12, 16, 1100.0),
    (13, 17, 1200.0),
    (14, 15, 1300.0), (14, 18, 1400.0), (14, 19, 1250.0),
    (15, 16, 1000.0), (15, 20, 1400.0),
    (16, 17, 800.0), (16, 21, 1100.0),
    (17, 22, 1200.0), (17, 23, 1300.0),
    (18, 19, 1000.0),
    (19, 20, 900.0),
    (20, 21, 800.0),
    (21, 22, 900.0),
    (22, 23, 600.0),
];

const EURO_LINKS: &[(NodeId, NodeId, f64)] = &[
    (0, 1, 420.0), (0, 2, 510.0), (0, 3, 640.0),
    (1, 2, 380.0), (1, 4, 590.0),
    (2, 3, 300.0), (2, 5, 460.0), (2, 6, 550.0),
    (3, 6, 410.0), (3, 7, 680.0),
    (4, 5, 350.0), (4, 8, 620.0),
    (5, 6, 290.0), (5, 8, 480.0), (5, 9, 530.0),
    (6, 7, 380.0), (6, 9, 440.0), (6, 10, 610.0),
    (7, 10, 470.0), (7, 11, 760.0),
    (8, 9, 400.0), (8, 12, 580.0),
    (9, 10, 360.0), (9, 12, 490.0), (9, 13, 520.0),
    (10, 11, 430.0), (10, 13, 390.0), (10, 14, 560.0),
    (11, 14, 450.0),
    (12, 13, 410.0), (12, 15, 640.0),
    (13, 14, 370.0), (13, 15, 500.0), (13, 16, 590.0),
    (14, 16, 420.0),
    (15, 17, 480.0),
    (16, 17, 530.0), (16, 18, 610.0),
    (17, 18, 560.0),
];

const UKNET_LINKS: &[(NodeId, NodeId, f64)] = &[
    (0, 1, 180.0), (0, 2, 210.0),
    (1, 3, 160.0),
    (2, 3, 140.0), (2, 4, 190.0),
    (3, 5, 120.0),
    (4, 6, 150.0),
    (5, 6, 130.0), (5, 7, 170.0),
    (6, 8, 110.0),
    (7, 9, 140.0),
    (8, 9, 120.0), (8, 10, 160.0),
    (9, 11, 130.0),
    (10, 12, 150.0),
    (11, 12, 110.0), (11, 13, 180.0),
    (12, 14, 140.0),
    (13, 15, 120.0),
    (14, 16, 130.0),
    (15, 16, 170.0), (15, 17, 150.0),
    (16, 18, 110.0),
    (17, 19, 140.0),
    (18, 20, 160.0),
    (19, 20, 120.0),
];

const JAPAN_LINKS: &[(NodeId, NodeId, f64)] = &[
    (0, 1, 290.0), (0, 2, 380.0),
    (1, 2, 220.0), (1, 3, 300.0),
    (2, 3, 170.0), (2, 4, 260.0),
    (3, 4, 150.0), (3, 5, 240.0),
    (4, 6, 190.0),
    (5, 6, 210.0), (5, 7, 330.0),
    (6, 8, 280.0),
    (7, 8, 180.0), (7, 9, 350.0),
    (8, 10, 300.0),
    (9, 10, 200.0), (9, 11, 420.0),
    (10, 11, 270.0),
];

const BRAZIL_LINKS: &[(NodeId, NodeId, f64)] = &[
    (0, 1, 610.0), (0, 2, 880.0),
    (1, 2, 420.0), (1, 3, 750.0),
    (2, 3, 530.0), (2, 4, 690.0),
    (3, 4, 300.0), (3, 5, 470.0),
    (4, 5, 380.0), (4, 6, 560.0),
    (5, 6, 440.0), (5, 7, 620.0),
    (6, 8, 510.0),
    (7, 8, 390.0), (7, 9, 720.0),
    (8, 9, 560.0), (8, 10, 480.0),
    (9, 10, 540.0), (9, 11, 650.0),
    (10, 11, 430.0), (10, 12, 590.0),
    (11, 13, 500.0),
    (12, 13, 370.0), (12, 14, 460.0),
    (13, 15, 610.0),
    (14, 15, 420.0), (14, 16, 530.0),
    (15, 17, 480.0),
    (16, 17, 390.0), (16, 18, 700.0),
    (17, 18, 450.0),
];

// ─── Descriptor ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopologyDescriptor {
    pub name: &'static str,
    pub nodes: usize,
    pub links: usize,
    pub description: &'static str,
}

/// One undirected fibre link.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Link {
    pub a: NodeId,
    pub b: NodeId,
    pub distance_km: f64,
}

// ─── Topology ────────────────────────────────────────────────────────────────

/// Immutable weighted graph. Node ids are contiguous `0..node_count`.
#[derive(Debug)]
pub struct Topology {
    descriptor: TopologyDescriptor,
    graph: UnGraph<NodeId, f64>,
    links: Vec<Link>,
}

static CATALOG: Lazy<Vec<Topology>> = Lazy::new(|| {
    vec![
        Topology::build("NSFNET", 14, "US academic backbone", NSFNET_LINKS),
        Topology::build("USNET", 24, "Large-scale US commercial backbone", USNET_LINKS),
        Topology::build("EURO", 19, "Extended pan-European mesh", EURO_LINKS),
        Topology::build("UKNET", 21, "United Kingdom national network", UKNET_LINKS),
        Topology::build("JAPAN", 12, "Compact Japanese optical network", JAPAN_LINKS),
        Topology::build("BRAZIL", 19, "Latin American optical infrastructure", BRAZIL_LINKS),
    ]
});

impl Topology {
    fn build(
        name: &'static str,
        nodes: usize,
        description: &'static str,
        table: &[(NodeId, NodeId, f64)],
    ) -> Self {
        let mut graph = UnGraph::with_capacity(nodes, table.len());
        for id in 0..nodes {
            graph.add_node(id as NodeId);
        }
        let mut links = Vec::with_capacity(table.len());
        for &(a, b, distance_km) in table {
            graph.add_edge(NodeIndex::new(a as usize), NodeIndex::new(b as usize), distance_km);
            links.push(Link { a, b, distance_km });
        }
        Self {
            descriptor: TopologyDescriptor {
                name,
                nodes,
                links: links.len(),
                description,
            },
            graph,
            links,
        }
    }

    /// Case-insensitive catalog lookup.
    pub fn by_name(name: &str) -> Option<&'static Topology> {
        CATALOG
            .iter()
            .find(|t| t.descriptor.name.eq_ignore_ascii_case(name))
    }

    pub fn names() -> Vec<&'static str> {
        CATALOG.iter().map(|t| t.descriptor.name).collect()
    }

    pub fn catalog() -> &'static [Topology] {
        &CATALOG
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn descriptor(&self) -> &TopologyDescriptor {
        &self.descriptor
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub(crate) fn graph(&self) -> &UnGraph<NodeId, f64> {
        &self.graph
    }

    /// Stored edge index for the unordered pair `{u, v}`.
    pub fn edge_index(&self, u: NodeId, v: NodeId) -> Option<usize> {
        if u as usize >= self.node_count() || v as usize >= self.node_count() {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(u as usize), NodeIndex::new(v as usize))
            .map(|e: EdgeIndex| e.index())
    }

    /// Edge indices along a node path, or None if any hop is not a link.
    pub fn path_edges(&self, path: &[NodeId]) -> Option<Vec<usize>> {
        path.windows(2)
            .map(|hop| self.edge_index(hop[0], hop[1]))
            .collect()
    }

    /// Sum of link distances along a node path.
    pub fn path_distance(&self, path: &[NodeId]) -> Option<f64> {
        path.windows(2)
            .map(|hop| {
                self.edge_index(hop[0], hop[1])
                    .map(|e| self.links[e].distance_km)
            })
            .sum()
    }
}

// ─── TopologyRotation ────────────────────────────────────────────────────────

/// Walks the catalog in declaration order, wrapping around.
#[derive(Debug, Clone, Default)]
pub struct TopologyRotation {
    index: usize,
}

impl TopologyRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &'static Topology {
        &CATALOG[self.index]
    }

    pub fn cycle(&mut self, step: usize) -> &'static Topology {
        self.index = (self.index + step) % CATALOG.len();
        self.current()
    }

    /// Rewind to the first topology, or jump to `name`.
    pub fn reset(&mut self, name: Option<&str>) -> Result<&'static Topology, ConfigError> {
        self.index = match name {
            None => 0,
            Some(n) => CATALOG
                .iter()
                .position(|t| t.descriptor.name.eq_ignore_ascii_case(n))
                .ok_or_else(|| ConfigError::UnknownTopology(n.to_string()))?,
        };
        Ok(self.current())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn is_connected(t: &Topology) -> bool {
        let mut seen = vec![false; t.node_count()];
        let mut stack = vec![0usize];
        seen[0] = true;
        while let Some(n) = stack.pop() {
            for link in t.links() {
                let next = if link.a as usize == n {
                    link.b as usize
                } else if link.b as usize == n {
                    link.a as usize
                } else {
                    continue;
                };
                if !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        seen.iter().all(|&s| s)
    }

    #[test]
    fn test_catalog_sizes() {
        let expected = [
            ("NSFNET", 14, 21),
            ("USNET", 24, 43),
            ("EURO", 19, 39),
            ("UKNET", 21, 26),
            ("JAPAN", 12, 18),
            ("BRAZIL", 19, 31),
        ];
        for (name, nodes, links) in expected {
            let t = Topology::by_name(name).expect("test: topology in catalog");
            assert_eq!(t.node_count(), nodes, "{name} node count");
            assert_eq!(t.edge_count(), links, "{name} link count");
            assert_eq!(t.descriptor().links, links);
            assert!(is_connected(t), "{name} must be connected");
        }
    }

    #[test]
    fn test_no_duplicate_links() {
        for t in Topology::catalog() {
            for (i, link) in t.links().iter().enumerate() {
                assert_eq!(t.edge_index(link.a, link.b), Some(i), "{} link {i}", t.name());
            }
        }
    }

    #[test]
    fn test_edge_lookup_is_undirected() {
        let t = Topology::by_name("NSFNET").expect("test: nsfnet");
        assert_eq!(t.edge_index(0, 1), Some(0));
        assert_eq!(t.edge_index(1, 0), Some(0));
        assert_eq!(t.edge_index(13, 11), Some(20));
        assert_eq!(t.edge_index(0, 13), None);
        assert_eq!(t.edge_index(0, 99), None);
    }

    #[test]
    fn test_path_distance_and_edges() {
        let t = Topology::by_name("NSFNET").expect("test: nsfnet");
        assert_eq!(t.path_distance(&[0, 1, 7]), Some(2050.0));
        assert_eq!(t.path_edges(&[7, 1, 0]), Some(vec![4, 0]));
        assert_eq!(t.path_distance(&[0, 13]), None);
        assert_eq!(t.path_edges(&[0, 13]), None);
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert!(Topology::by_name("nsfnet").is_some());
        assert!(Topology::by_name("Brazil").is_some());
        assert!(Topology::by_name("MARS").is_none());
        assert_eq!(Topology::names().len(), 6);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut rotation = TopologyRotation::new();
        assert_eq!(rotation.current().name(), "NSFNET");
        assert_eq!(rotation.cycle(1).name(), "USNET");
        assert_eq!(rotation.cycle(5).name(), "NSFNET");
        assert_eq!(rotation.reset(Some("japan")).map(|t| t.name()), Ok("JAPAN"));
        assert!(rotation.reset(Some("MARS")).is_err());
        assert_eq!(rotation.reset(None).map(|t| t.name()), Ok("NSFNET"));
    }
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Elastic Optical Network Simulation Suite ("RMSA") - Spectrum Grid

use std::ops::Range;

// ─── SpectrumGrid ────────────────────────────────────────────────────────────

/// Occupancy bits indexed by `[edge][slot]`, stored row-major.
///
/// A slot is occupied iff an allocation committed during the current episode
/// covers it. There is no release: the grid only fills until `clear`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumGrid {
    num_edges: usize,
    num_slots: usize,
    occupancy: Vec<bool>,
}

impl SpectrumGrid {
    pub fn new(num_edges: usize, num_slots: usize) -> Self {
        Self {
            num_edges,
            num_slots,
            occupancy: vec![false; num_edges * num_slots],
        }
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    pub fn clear(&mut self) {
        self.occupancy.fill(false);
    }

    pub fn row(&self, edge: usize) -> &[bool] {
        let start = edge * self.num_slots;
        &self.occupancy[start..start + self.num_slots]
    }

    pub fn is_occupied(&self, edge: usize, slot: usize) -> bool {
        self.occupancy[edge * self.num_slots + slot]
    }

    /// True if every slot in `range` is free on `edge`.
    pub fn is_free(&self, edge: usize, range: Range<usize>) -> bool {
        self.row(edge)[range].iter().all(|&bit| !bit)
    }

    /// Lowest start offset whose `required` slots are free on every edge.
    /// Never mutates the grid.
    pub fn find_first_fit(&self, edges: &[usize], required: usize) -> Option<usize> {
        if required == 0 || required > self.num_slots {
            return None;
        }
        (0..=self.num_slots - required).find(|&start| {
            edges
                .iter()
                .all(|&edge| self.is_free(edge, start..start + required))
        })
    }

    /// Mark `[start, start + required)` occupied on every edge. Callers must
    /// have obtained `start` from `find_first_fit` with the same arguments.
    pub fn commit(&mut self, edges: &[usize], start: usize, required: usize) {
        for &edge in edges {
            let base = edge * self.num_slots + start;
            self.occupancy[base..base + required].fill(true);
        }
    }

    pub fn occupied_slots(&self) -> usize {
        self.occupancy.iter().filter(|&&bit| bit).count()
    }

    // ─── Derived metrics (whole-grid snapshots) ──────────────────────────────

    /// Mean of all occupancy bits.
    pub fn utilization(&self) -> f64 {
        if self.occupancy.is_empty() {
            return 0.0;
        }
        self.occupied_slots() as f64 / self.occupancy.len() as f64
    }

    /// Mean occupancy per edge.
    pub fn edge_utilization(&self) -> Vec<f64> {
        (0..self.num_edges)
            .map(|edge| {
                let used = self.row(edge).iter().filter(|&&bit| bit).count();
                used as f64 / self.num_slots as f64
            })
            .collect()
    }

    /// Occupancy transitions summed over edges, normalised by
    /// `num_edges * (num_slots - 1)`. Zero on an empty grid.
    pub fn fragmentation(&self) -> f64 {
        if self.occupied_slots() == 0 {
            return 0.0;
        }
        let transitions: usize = (0..self.num_edges)
            .map(|edge| {
                self.row(edge)
                    .windows(2)
                    .filter(|pair| pair[0] != pair[1])
                    .count()
            })
            .sum();
        let max_transitions = self.num_edges * self.num_slots.saturating_sub(1);
        transitions as f64 / max_transitions.max(1) as f64
    }

    /// `1 - mean_over_slots(population std-dev of occupancy across edges)`.
    pub fn load_balance(&self) -> f64 {
        if self.num_edges == 0 || self.num_slots == 0 {
            return 1.0;
        }
        let n = self.num_edges as f64;
        let total_std: f64 = (0..self.num_slots)
            .map(|slot| {
                let used = (0..self.num_edges)
                    .filter(|&edge| self.is_occupied(edge, slot))
                    .count() as f64;
                // Bernoulli column: variance = p(1 - p)
                let p = used / n;
                (p * (1.0 - p)).sqrt()
            })
            .sum();
        1.0 - total_std / self.num_slots as f64
    }

    /// Row-major occupancy as 0.0 / 1.0.
    pub fn to_f32(&self) -> impl Iterator<Item = f32> + '_ {
        self.occupancy.iter().map(|&bit| if bit { 1.0 } else { 0.0 })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_metrics() {
        let grid = SpectrumGrid::new(3, 10);
        assert_eq!(grid.utilization(), 0.0);
        assert_eq!(grid.fragmentation(), 0.0);
        assert!((grid.load_balance() - 1.0).abs() < 1e-12);
        assert_eq!(grid.edge_utilization(), vec![0.0; 3]);
    }

    #[test]
    fn test_first_fit_on_empty_grid() {
        let grid = SpectrumGrid::new(2, 10);
        assert_eq!(grid.find_first_fit(&[0, 1], 4), Some(0));
        assert_eq!(grid.find_first_fit(&[0], 10), Some(0));
        assert_eq!(grid.find_first_fit(&[0], 11), None);
        assert_eq!(grid.find_first_fit(&[0], 0), None);
    }

    #[test]
    fn test_find_does_not_mutate() {
        let mut grid = SpectrumGrid::new(2, 10);
        grid.commit(&[0], 0, 3);
        let before = grid.clone();
        let first = grid.find_first_fit(&[0, 1], 2);
        let second = grid.find_first_fit(&[0, 1], 2);
        assert_eq!(first, second);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_commit_marks_every_edge() {
        let mut grid = SpectrumGrid::new(3, 10);
        grid.commit(&[0, 2], 2, 3);
        for edge in [0, 2] {
            for slot in 2..5 {
                assert!(grid.is_occupied(edge, slot));
            }
            assert!(!grid.is_occupied(edge, 1));
            assert!(!grid.is_occupied(edge, 5));
        }
        assert!(grid.is_free(1, 0..10));
        assert_eq!(grid.occupied_slots(), 6);
    }

    #[test]
    fn test_first_fit_requires_common_block() {
        let mut grid = SpectrumGrid::new(2, 10);
        grid.commit(&[0], 0, 3); // edge 0: slots 0..3
        grid.commit(&[1], 4, 2); // edge 1: slots 4..6
        // Edge 0 alone fits at 3, edge 1 alone at 0; both together need 6.
        assert_eq!(grid.find_first_fit(&[0], 2), Some(3));
        assert_eq!(grid.find_first_fit(&[1], 2), Some(0));
        assert_eq!(grid.find_first_fit(&[0, 1], 2), Some(6));
        assert_eq!(grid.find_first_fit(&[0, 1], 5), None);
    }

    #[test]
    fn test_overlap_moves_next_fit() {
        let mut grid = SpectrumGrid::new(1, 20);
        let start = grid.find_first_fit(&[0], 4).expect("test: fits");
        grid.commit(&[0], start, 4);
        assert_eq!(grid.find_first_fit(&[0], 4), Some(4));
    }

    #[test]
    fn test_last_offset_is_considered() {
        let mut grid = SpectrumGrid::new(1, 10);
        grid.commit(&[0], 0, 7);
        assert_eq!(grid.find_first_fit(&[0], 3), Some(7));
    }

    #[test]
    fn test_fragmentation_counts_transitions() {
        let mut grid = SpectrumGrid::new(2, 5);
        grid.commit(&[0], 1, 2); // 0 1 1 0 0 -> 2 transitions
        // 2 / (2 * 4)
        assert!((grid.fragmentation() - 0.25).abs() < 1e-12);
        grid.commit(&[0], 3, 2); // 0 1 1 1 1 -> 1 transition
        assert!((grid.fragmentation() - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_load_balance_penalises_uneven_edges() {
        let mut balanced = SpectrumGrid::new(2, 4);
        balanced.commit(&[0, 1], 0, 2);
        assert!((balanced.load_balance() - 1.0).abs() < 1e-12);

        let mut skewed = SpectrumGrid::new(2, 4);
        skewed.commit(&[0], 0, 4);
        // every column is {1, 0}: std = 0.5
        assert!((skewed.load_balance() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_utilization_and_edge_utilization() {
        let mut grid = SpectrumGrid::new(2, 4);
        grid.commit(&[0], 0, 2);
        assert!((grid.utilization() - 0.25).abs() < 1e-12);
        assert_eq!(grid.edge_utilization(), vec![0.5, 0.0]);
        grid.clear();
        assert_eq!(grid.occupied_slots(), 0);
    }
}

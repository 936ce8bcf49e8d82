// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Elastic Optical Network Simulation Suite ("RMSA") - Request Generator

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::topology::NodeId;
use crate::types::ConnectionRequest;

/// Discrete bit-rate menu in Gbps, drawn uniformly.
pub const BIT_RATES_GBPS: [f64; 5] = [25.0, 50.0, 100.0, 200.0, 400.0];

/// Largest bit-rate, used to normalise the observation.
pub const MAX_BIT_RATE_GBPS: f64 = 400.0;

/// Stateless request factory; all randomness comes from the caller's RNG so a
/// fixed seed reproduces the same request stream.
#[derive(Debug, Clone, Copy)]
pub struct RequestGenerator {
    node_count: usize,
    load: f64,
}

impl RequestGenerator {
    pub fn new(node_count: usize, load: f64) -> Self {
        Self { node_count, load }
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    /// Draw one request. Order of draws: source, destination (redrawn until
    /// distinct), bit-rate, holding time, arrival time.
    pub fn generate(&self, rng: &mut ChaCha8Rng) -> ConnectionRequest {
        let source = rng.gen_range(0..self.node_count) as NodeId;
        let mut destination = rng.gen_range(0..self.node_count) as NodeId;
        if self.node_count > 1 {
            while destination == source {
                destination = rng.gen_range(0..self.node_count) as NodeId;
            }
        }

        let bit_rate_gbps = BIT_RATES_GBPS[rng.gen_range(0..BIT_RATES_GBPS.len())];
        let holding_time = exponential(rng, 1.0 / self.load);
        let arrival_time = exponential(rng, 1.0);

        ConnectionRequest {
            source,
            destination,
            bit_rate_gbps,
            arrival_time,
            holding_time,
        }
    }
}

/// Exponential sample with the given mean, by inverse transform.
fn exponential(rng: &mut ChaCha8Rng, mean: f64) -> f64 {
    // gen::<f64>() is in [0, 1), so 1 - u is in (0, 1] and ln is finite
    let u: f64 = rng.gen();
    -mean * (1.0 - u).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_endpoints_distinct_and_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let generator = RequestGenerator::new(14, 0.8);
        for _ in 0..2000 {
            let r = generator.generate(&mut rng);
            assert_ne!(r.source, r.destination);
            assert!((r.source as usize) < 14);
            assert!((r.destination as usize) < 14);
            assert!(BIT_RATES_GBPS.contains(&r.bit_rate_gbps));
            assert!(r.holding_time >= 0.0 && r.holding_time.is_finite());
            assert!(r.arrival_time >= 0.0 && r.arrival_time.is_finite());
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let generator = RequestGenerator::new(24, 0.5);
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(generator.generate(&mut a), generator.generate(&mut b));
        }
    }

    #[test]
    fn test_holding_time_mean_tracks_load() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let generator = RequestGenerator::new(14, 0.5);
        let n = 20000;
        let mean = (0..n).map(|_| generator.generate(&mut rng).holding_time).sum::<f64>() / n as f64;
        // mean holding = 1 / load = 2.0
        assert!((mean - 2.0).abs() < 0.1, "holding mean {mean} far from 2.0");
    }

    #[test]
    fn test_bit_rate_distribution_uniform() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let generator = RequestGenerator::new(14, 0.8);
        let n = 10000;
        let mut counts = [0u32; 5];
        for _ in 0..n {
            let rate = generator.generate(&mut rng).bit_rate_gbps;
            let idx = BIT_RATES_GBPS.iter().position(|&r| r == rate).expect("test: known rate");
            counts[idx] += 1;
        }
        for (i, &c) in counts.iter().enumerate() {
            let pct = c as f64 / n as f64 * 100.0;
            assert!((pct - 20.0).abs() < 2.0, "rate {} at {:.1}%", BIT_RATES_GBPS[i], pct);
        }
    }
}

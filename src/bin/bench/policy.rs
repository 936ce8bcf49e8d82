// Baseline Allocation Policies
// Heuristic agents used as reference points for learned ones

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rmsa_engine::{Modulation, RmsaEnv};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Always action 0: shortest path, most robust modulation.
    Conservative,
    /// First candidate path whose most efficient reachable modulation has a
    /// free block; action 0 when none does.
    FirstFeasible,
    /// Uniform over the action space.
    Random,
}

pub const ALL_POLICIES: [Policy; 3] = [Policy::Conservative, Policy::FirstFeasible, Policy::Random];

impl Policy {
    pub fn name(&self) -> &'static str {
        match self {
            Policy::Conservative => "conservative",
            Policy::FirstFeasible => "first_feasible",
            Policy::Random => "random",
        }
    }

    pub fn choose(&self, env: &RmsaEnv, rng: &mut ChaCha8Rng) -> usize {
        match self {
            Policy::Conservative => 0,
            Policy::FirstFeasible => first_feasible(env).unwrap_or(0),
            Policy::Random => rng.gen_range(0..env.action_count()),
        }
    }
}

fn first_feasible(env: &RmsaEnv) -> Option<usize> {
    let request = env.current_request()?;
    env.candidate_paths()
        .iter()
        .enumerate()
        .find_map(|(index, path)| {
            let modulation = Modulation::most_efficient_for(path.distance_km)?;
            let edges = env.topology().path_edges(&path.nodes)?;
            let required = modulation.required_slots(request.bit_rate_gbps);
            env.spectrum().find_first_fit(&edges, required)?;
            Some(env.encode_action(index, modulation))
        })
}

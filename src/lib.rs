// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Elastic Optical Network Simulation Suite ("RMSA")

pub mod types;
pub mod config;
pub mod topology;
pub mod modulation;
pub mod spectrum;
pub mod traffic;
pub mod routing;
pub mod environment;
pub mod shaping;
pub mod metrics;

pub use config::{ConfigError, EnvConfig};
pub use environment::{EnvError, EpisodePhase, RmsaEnv};
pub use metrics::{composite_score, EpisodeMetrics, EpisodeSummary};
pub use modulation::Modulation;
pub use routing::{k_shortest_paths, CandidatePath};
pub use shaping::{RewardShaper, ShapedEnv};
pub use spectrum::SpectrumGrid;
pub use topology::{NodeId, Topology, TopologyRotation};
pub use types::*;

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl RmsaEnv {
    #[wasm_bindgen(constructor)]
    pub fn js_new(
        topology: &str,
        num_slots: usize,
        episode_length: usize,
        load: f64,
        seed: Option<u32>,
    ) -> Result<RmsaEnv, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config = EnvConfig {
            topology: topology.to_string(),
            num_slots,
            episode_length,
            load,
            seed: seed.map(u64::from),
            ..EnvConfig::default()
        };
        RmsaEnv::new(config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = reset)]
    pub fn js_reset(&mut self, seed: Option<u32>) -> JsValue {
        let result = self.reset(seed.map(u64::from));
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = step)]
    pub fn js_step(&mut self, action: usize) -> Result<JsValue, JsValue> {
        let result = self.step(action).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL))
    }

    /// Info payload of the most recent reset or step.
    pub fn get_info(&self) -> JsValue {
        match self.last_info() {
            Some(info) => serde_wasm_bindgen::to_value(info).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    pub fn get_candidate_paths(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.candidate_paths()).unwrap_or(JsValue::NULL)
    }

    pub fn get_counters(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.counters()).unwrap_or(JsValue::NULL)
    }

    pub fn get_action_count(&self) -> usize {
        self.action_count()
    }

    pub fn get_observation_len(&self) -> usize {
        self.observation_len()
    }
}

#[wasm_bindgen]
pub fn topology_names() -> JsValue {
    serde_wasm_bindgen::to_value(&Topology::names()).unwrap_or(JsValue::NULL)
}

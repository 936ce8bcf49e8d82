// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Elastic Optical Network Simulation Suite ("RMSA") - Modulation Formats

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of one frequency slot.
pub const SLOT_WIDTH_GHZ: f64 = 12.5;

// ─── Modulation ──────────────────────────────────────────────────────────────

/// Modulation formats, ordered from most robust to most efficient. The
/// discriminant is the modulation index used in action decoding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Modulation {
    #[serde(rename = "BPSK")]
    Bpsk = 0,
    #[serde(rename = "QPSK")]
    Qpsk = 1,
    #[serde(rename = "8QAM")]
    Qam8 = 2,
    #[serde(rename = "16QAM")]
    Qam16 = 3,
}

impl Modulation {
    pub const ALL: [Modulation; 4] = [Self::Bpsk, Self::Qpsk, Self::Qam8, Self::Qam16];
    pub const COUNT: usize = Self::ALL.len();

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bpsk => "BPSK",
            Self::Qpsk => "QPSK",
            Self::Qam8 => "8QAM",
            Self::Qam16 => "16QAM",
        }
    }

    /// Maximum optical reach in km.
    pub fn reach_km(&self) -> f64 {
        match self {
            Self::Bpsk => 4000.0,
            Self::Qpsk => 2000.0,
            Self::Qam8 => 1000.0,
            Self::Qam16 => 500.0,
        }
    }

    /// Bits per symbol, used as the per-slot throughput multiplier.
    pub fn spectral_efficiency(&self) -> f64 {
        match self {
            Self::Bpsk => 1.0,
            Self::Qpsk => 2.0,
            Self::Qam8 => 3.0,
            Self::Qam16 => 4.0,
        }
    }

    /// 1-based efficiency level (BPSK = 1 .. 16QAM = 4).
    pub fn level(&self) -> u32 {
        self.index() as u32 + 1
    }

    pub fn supports(&self, distance_km: f64) -> bool {
        distance_km <= self.reach_km()
    }

    /// Slots needed to carry `bit_rate_gbps`:
    /// ceil(bit_rate / (slot_width * spectral_efficiency))
    pub fn required_slots(&self, bit_rate_gbps: f64) -> usize {
        (bit_rate_gbps / (SLOT_WIDTH_GHZ * self.spectral_efficiency())).ceil() as usize
    }

    /// Most efficient format whose reach covers `distance_km`.
    pub fn most_efficient_for(distance_km: f64) -> Option<Self> {
        Self::ALL.iter().rev().copied().find(|m| m.supports(distance_km))
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

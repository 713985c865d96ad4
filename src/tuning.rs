//! Gameplay tuning constants
//!
//! Everything a balance pass would want to touch lives here, with the shipped
//! defaults. The [`FrameClock`](crate::FrameClock) takes a `Tuning` at
//! construction; nothing in the core reaches for hidden globals.

use serde::{Deserialize, Serialize};

/// Gameplay tuning knobs with documented defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Base packet speed in progress-per-reference-frame (0..1 along an edge).
    /// Per-packet speed is `base_speed * speed_multiplier`, frozen at spawn.
    pub base_speed: f32,
    /// Base interval between spawns in ms; the effective interval is
    /// `spawn_interval_ms / sqrt(speed_multiplier)`
    pub spawn_interval_ms: f64,
    /// Time between difficulty ramp steps in ms
    pub ramp_interval_ms: f64,
    /// Speed multiplier added per ramp step
    pub ramp_increment: f32,
    /// Speed multiplier ceiling
    pub max_multiplier: f32,
    /// Score awarded for a correctly routed packet
    pub score_correct: i64,
    /// Score delta (negative) for a misrouted packet
    pub score_incorrect: i64,
    /// Health lost on a misrouted packet
    pub damage: i32,
    /// Health at run start
    pub starting_health: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 0.005,
            spawn_interval_ms: 2000.0,
            ramp_interval_ms: 10_000.0,
            ramp_increment: 0.15,
            max_multiplier: 3.0,
            score_correct: 100,
            score_incorrect: -50,
            damage: 15,
            starting_health: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(tuning, back);
    }

    #[test]
    fn test_cap_reachable_from_defaults() {
        // 1.0 + k * 0.15 reaches 3.0 after 14 ramp steps
        let t = Tuning::default();
        let mut m = 1.0f32;
        for _ in 0..20 {
            m = (m + t.ramp_increment).min(t.max_multiplier);
        }
        assert_eq!(m, t.max_multiplier);
    }
}

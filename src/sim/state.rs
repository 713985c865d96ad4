//! Run state and core simulation types
//!
//! Everything that must round-trip for save/restore determinism lives on
//! [`GameState`] and serializes, including the RNG. Particles are decorative
//! and are skipped.

use std::collections::HashMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{LevelGraph, NodeId, NodeRole};
use crate::consts::*;
use crate::tuning::Tuning;

/// Declared packet type, as shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketKind {
    Data,
    Malware,
    /// Payload hidden until the player reveals it
    Encrypted,
}

/// True packet classification used for scoring. Never `Encrypted`; an
/// encrypted packet always carries one of these underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    Data,
    Malware,
}

impl From<Payload> for PacketKind {
    fn from(p: Payload) -> Self {
        match p {
            Payload::Data => PacketKind::Data,
            Payload::Malware => PacketKind::Malware,
        }
    }
}

/// A packet traveling along one edge of the level graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Packet {
    pub id: u32,
    /// What the player sees; overwritten with the payload on reveal
    pub kind: PacketKind,
    /// What scoring uses, always
    pub payload: Payload,
    pub revealed: bool,
    pub from: NodeId,
    pub to: NodeId,
    /// Position along the current edge, 0.0 at `from`, 1.0 at `to`
    pub progress: f32,
    /// Progress per reference frame, frozen at spawn time
    pub speed: f32,
}

impl Packet {
    /// True iff a reveal action would do anything
    pub fn can_reveal(&self) -> bool {
        self.kind == PacketKind::Encrypted && !self.revealed
    }
}

/// Color tag for a particle burst; the presentation layer maps these to
/// actual pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstColor {
    /// Correctly routed packet (green)
    Success,
    /// Misrouted packet (red)
    Failure,
    /// Encrypted packet revealed (white sparkle)
    Reveal,
}

impl BurstColor {
    /// Suggested CSS color, matching the original palette
    pub fn hex(&self) -> &'static str {
        match self {
            BurstColor::Success => "#22c55e",
            BurstColor::Failure => "#ef4444",
            BurstColor::Reveal => "#ffffff",
        }
    }
}

/// A short-lived decorative particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    /// Applied once per tick, not scaled by dt
    pub vel: Vec2,
    pub color: BurstColor,
    /// 1.0 at emission, pruned at <= 0
    pub life: f32,
}

/// Per-switch active-edge selection, mutated only by player toggles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchRouter {
    active: HashMap<NodeId, usize>,
}

impl SwitchRouter {
    /// Index 0 for every switch in the graph
    pub fn new(graph: &LevelGraph) -> Self {
        Self {
            active: graph.switches().map(|n| (n.id, 0)).collect(),
        }
    }

    /// Advance the named switch to its next outgoing edge, wrapping.
    /// Unknown or non-switch ids are a no-op.
    pub fn toggle(&mut self, graph: &LevelGraph, id: NodeId) {
        let Some(node) = graph.node(id) else { return };
        if node.role != NodeRole::Switch || node.targets.is_empty() {
            return;
        }
        let idx = self.active.entry(id).or_insert(0);
        *idx = (*idx + 1) % node.targets.len();
    }

    /// Current active index for a switch (0 when untracked)
    pub fn active_index(&self, id: NodeId) -> usize {
        self.active.get(&id).copied().unwrap_or(0)
    }

    /// The node the named switch currently forwards to, if resolvable
    pub fn active_target(&self, graph: &LevelGraph, id: NodeId) -> Option<NodeId> {
        let node = graph.node(id)?;
        node.targets.get(self.active_index(id)).copied()
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before start / after stop or game over
    Idle,
    /// Simulation advancing
    Running,
    /// Frame requests alive, simulated time suspended
    Paused,
    /// Health hit zero; terminal until restart
    GameOver,
}

/// Complete per-run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    /// May go negative; display layers clamp
    pub score: i64,
    pub health: i32,
    /// Monotonically non-decreasing within a run, capped by tuning
    pub speed_multiplier: f32,
    /// Timestamp (ms) the last packet spawned
    pub last_spawn_ms: f64,
    /// Timestamp (ms) of the last difficulty ramp step
    pub last_ramp_ms: f64,
    /// Live packets in spawn order
    pub packets: Vec<Packet>,
    /// Decorative particles, not part of the authoritative state
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub router: SwitchRouter,
    pub tuning: Tuning,
    next_id: u32,
}

impl GameState {
    /// Fresh run state in the `Idle` phase. Timers are anchored by
    /// [`GameState::start`].
    pub fn new(graph: &LevelGraph, seed: u64, tuning: Tuning) -> Self {
        let starting_health = tuning.starting_health;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            health: starting_health,
            speed_multiplier: 1.0,
            last_spawn_ms: 0.0,
            last_ramp_ms: 0.0,
            packets: Vec::new(),
            particles: Vec::new(),
            router: SwitchRouter::new(graph),
            tuning,
            next_id: 1,
        }
    }

    /// Begin (or restart) the run: all per-run state reinitialized, spawn and
    /// ramp timers anchored to `now_ms`, phase set to `Running`.
    pub fn start(&mut self, graph: &LevelGraph, now_ms: f64) {
        *self = Self::new(graph, self.seed, self.tuning.clone());
        self.last_spawn_ms = now_ms;
        self.last_ramp_ms = now_ms;
        self.phase = GamePhase::Running;
        log::info!("run started (seed {})", self.seed);
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Player input: advance the named switch's active edge. No-op unless
    /// the run is active and unpaused.
    pub fn toggle_switch(&mut self, graph: &LevelGraph, id: NodeId) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.router.toggle(graph, id);
    }

    /// Player input: reveal an encrypted packet. Overwrites the declared kind
    /// with the payload, irreversibly, and emits a white sparkle near the
    /// packet's originating node. No-op for unknown ids, non-encrypted or
    /// already-revealed packets, or while not running.
    ///
    /// Reveal is informational only; scoring always uses the payload.
    pub fn reveal_packet(&mut self, graph: &LevelGraph, packet_id: u32) {
        if self.phase != GamePhase::Running {
            return;
        }
        let Some(i) = self.packets.iter().position(|p| p.id == packet_id) else {
            return;
        };
        if !self.packets[i].can_reveal() {
            return;
        }
        self.packets[i].revealed = true;
        self.packets[i].kind = self.packets[i].payload.into();

        let origin = graph
            .node(self.packets[i].from)
            .map(|n| n.pos)
            .unwrap_or(Vec2::ZERO);
        let jitter = Vec2::new(
            self.rng.random_range(-20.0..20.0),
            self.rng.random_range(-20.0..20.0),
        );
        self.emit_burst(origin + jitter, BurstColor::Reveal);
    }

    /// Emit a burst of [`BURST_COUNT`] particles radiating evenly around a
    /// full circle with a small random speed, oldest particles evicted at the
    /// cap.
    pub fn emit_burst(&mut self, pos: Vec2, color: BurstColor) {
        for i in 0..BURST_COUNT {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let angle = std::f32::consts::TAU * i as f32 / BURST_COUNT as f32;
            let speed = 1.0 + self.rng.random::<f32>() * 2.0;
            let id = self.next_entity_id();
            self.particles.push(Particle {
                id,
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: 1.0,
            });
        }
    }

    /// Apply a terminal-arrival outcome to score and health
    pub fn apply_outcome(&mut self, correct: bool) {
        if correct {
            self.score += self.tuning.score_correct;
        } else {
            self.score += self.tuning.score_incorrect;
            self.health -= self.tuning.damage;
        }
    }

    /// The run is lost once health reaches zero
    pub fn is_game_over(&self) -> bool {
        self.health <= 0
    }

    /// Immutable copy of everything the presentation layer needs
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            packets: self.packets.clone(),
            particles: self.particles.clone(),
            score: self.score,
            health: self.health,
            speed_multiplier: self.speed_multiplier,
        }
    }
}

/// Read-only copy of the renderable state, republished once per tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub packets: Vec<Packet>,
    pub particles: Vec<Particle>,
    pub score: i64,
    pub health: i32,
    pub speed_multiplier: f32,
}

impl RenderSnapshot {
    /// Score clamped for HUD display (authoritative score may be negative)
    pub fn display_score(&self) -> i64 {
        self.score.max(0)
    }

    /// Health clamped to the displayable 0..=100 bar range
    pub fn display_health(&self) -> i32 {
        self.health.clamp(0, 100)
    }
}

//! Frame clock and run lifecycle
//!
//! [`FrameClock`] owns the level graph and the run state, and advances the
//! simulation exactly one step per animation frame. The presentation layer
//! calls [`FrameClock::frame`] with its frame timestamps and draws the
//! returned snapshot; player input arrives between frames through the
//! synchronous `toggle_switch` / `reveal_packet` methods and is visible to
//! the very next step.

use crate::sim::level::{LevelGraph, NodeId};
use crate::sim::state::{GamePhase, GameState, RenderSnapshot};
use crate::sim::tick::tick;
use crate::tuning::Tuning;

/// Result of one frame callback
#[derive(Debug, Clone)]
pub enum FrameEvent {
    /// Nothing to do: the run is not active (never started, stopped, or
    /// already concluded). Callers stop scheduling frames on this.
    Idle,
    /// A step completed (or the run is paused); draw this
    Snapshot(RenderSnapshot),
    /// Health reached zero this frame. Fired exactly once per run.
    GameOver {
        final_score: i64,
        snapshot: RenderSnapshot,
    },
}

/// Drives one simulation step per animation frame
#[derive(Debug, Clone)]
pub struct FrameClock {
    graph: LevelGraph,
    state: GameState,
    /// Timestamp of the previous frame; `None` until the first frame after
    /// start so the opening delta is zero
    last_frame_ms: Option<f64>,
    game_over_fired: bool,
}

impl FrameClock {
    /// Build a clock with a freshly generated level, in the `Idle` phase
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let graph = LevelGraph::generate();
        let state = GameState::new(&graph, seed, tuning);
        Self {
            graph,
            state,
            last_frame_ms: None,
            game_over_fired: false,
        }
    }

    pub fn graph(&self) -> &LevelGraph {
        &self.graph
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Start (or restart) the run. Every piece of per-run state — health,
    /// score, multiplier, packets, particles, routing, timers — is
    /// reinitialized before the loop resumes.
    pub fn start(&mut self, now_ms: f64) {
        self.state.start(&self.graph, now_ms);
        self.last_frame_ms = Some(now_ms);
        self.game_over_fired = false;
    }

    /// Suspend simulated time. Frame callbacks stay alive and keep
    /// re-anchoring the clock so resuming injects no false delta.
    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.state.phase = GamePhase::Paused;
            log::info!("paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Running;
            log::info!("resumed");
        }
    }

    /// Return to `Idle` from any phase. Idempotent; a stopped clock answers
    /// every frame with [`FrameEvent::Idle`] until restarted.
    pub fn stop(&mut self) {
        if self.state.phase != GamePhase::Idle {
            log::info!("stopped at score {}", self.state.score);
            self.state.phase = GamePhase::Idle;
        }
        self.last_frame_ms = None;
    }

    /// One animation-frame callback.
    ///
    /// While running, advances the simulation by the elapsed (clamped) delta
    /// and publishes a fresh snapshot. While paused, only re-anchors the
    /// frame time. Returns [`FrameEvent::GameOver`] exactly once, on the
    /// step where health reaches zero; after that the clock is done until
    /// the next [`FrameClock::start`].
    pub fn frame(&mut self, now_ms: f64) -> FrameEvent {
        match self.state.phase {
            GamePhase::Idle | GamePhase::GameOver => FrameEvent::Idle,
            GamePhase::Paused => {
                self.last_frame_ms = Some(now_ms);
                FrameEvent::Snapshot(self.state.snapshot())
            }
            GamePhase::Running => {
                let dt = (now_ms - self.last_frame_ms.unwrap_or(now_ms)).max(0.0);
                self.last_frame_ms = Some(now_ms);

                tick(&mut self.state, &self.graph, now_ms, dt);

                if self.state.is_game_over() && !self.game_over_fired {
                    self.game_over_fired = true;
                    self.state.phase = GamePhase::GameOver;
                    log::info!("game over, final score {}", self.state.score);
                    FrameEvent::GameOver {
                        final_score: self.state.score,
                        snapshot: self.state.snapshot(),
                    }
                } else {
                    FrameEvent::Snapshot(self.state.snapshot())
                }
            }
        }
    }

    /// Player input: cycle a switch's active edge (no-op unless running)
    pub fn toggle_switch(&mut self, id: NodeId) {
        self.state.toggle_switch(&self.graph, id);
    }

    /// Player input: reveal an encrypted packet (no-op unless running)
    pub fn reveal_packet(&mut self, packet_id: u32) {
        self.state.reveal_packet(&self.graph, packet_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Packet, PacketKind, Payload};

    const FRAME: f64 = 16.0;

    fn malware_at(progress: f32) -> Packet {
        Packet {
            id: 1000,
            kind: PacketKind::Malware,
            payload: Payload::Malware,
            revealed: false,
            from: NodeId(2),
            to: NodeId(4), // server: guaranteed misroute
            progress,
            speed: 0.005,
        }
    }

    #[test]
    fn test_idle_until_started() {
        let mut clock = FrameClock::new(1, Tuning::default());
        assert!(matches!(clock.frame(0.0), FrameEvent::Idle));
        assert_eq!(clock.phase(), GamePhase::Idle);

        clock.start(0.0);
        assert_eq!(clock.phase(), GamePhase::Running);
        match clock.frame(FRAME) {
            FrameEvent::Snapshot(snap) => {
                assert_eq!(snap.score, 0);
                assert_eq!(snap.health, 100);
            }
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_pause_reanchors_frame_time() {
        let mut clock = FrameClock::new(2, Tuning::default());
        clock.start(0.0);
        clock.state.packets.push(malware_at(0.0));
        clock.frame(FRAME);
        let before = clock.state.packets[0].progress;

        // Long pause: frames keep arriving but simulated time stands still
        clock.pause();
        for i in 1..=100 {
            let event = clock.frame(FRAME + 100.0 * i as f64);
            assert!(matches!(event, FrameEvent::Snapshot(_)));
        }
        assert_eq!(clock.state.packets[0].progress, before);

        // Resume: the next delta is one frame, not the whole pause
        clock.resume();
        clock.frame(FRAME + 100.0 * 100.0 + FRAME);
        let advanced = clock.state.packets[0].progress - before;
        let one_frame = 0.005 * (FRAME / crate::consts::REFERENCE_FRAME_MS) as f32;
        assert!((advanced - one_frame).abs() < 1e-5);
    }

    #[test]
    fn test_game_over_fires_exactly_once() {
        let tuning = Tuning {
            damage: 100,
            ..Tuning::default()
        };
        let mut clock = FrameClock::new(3, tuning);
        clock.start(0.0);
        clock.state.packets.push(malware_at(0.999));

        match clock.frame(FRAME) {
            FrameEvent::GameOver { final_score, .. } => assert_eq!(final_score, -50),
            other => panic!("expected game over, got {other:?}"),
        }
        assert_eq!(clock.phase(), GamePhase::GameOver);

        // No further steps, and no second game-over signal
        assert!(matches!(clock.frame(FRAME * 2.0), FrameEvent::Idle));
        assert!(matches!(clock.frame(FRAME * 3.0), FrameEvent::Idle));
    }

    #[test]
    fn test_restart_after_game_over() {
        let tuning = Tuning {
            damage: 100,
            ..Tuning::default()
        };
        let mut clock = FrameClock::new(4, tuning);
        clock.start(0.0);
        clock.state.packets.push(malware_at(0.999));
        clock.frame(FRAME);
        assert_eq!(clock.phase(), GamePhase::GameOver);

        clock.start(1000.0);
        assert_eq!(clock.phase(), GamePhase::Running);
        assert_eq!(clock.state.score, 0);
        assert_eq!(clock.state.health, 100);
        assert!(clock.state.packets.is_empty());

        // A fresh run can end again (the once-only latch resets)
        clock.state.packets.push(malware_at(0.999));
        assert!(matches!(
            clock.frame(1000.0 + FRAME),
            FrameEvent::GameOver { .. }
        ));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut clock = FrameClock::new(5, Tuning::default());
        clock.start(0.0);
        clock.frame(FRAME);

        clock.stop();
        clock.stop();
        assert_eq!(clock.phase(), GamePhase::Idle);
        assert!(matches!(clock.frame(FRAME * 2.0), FrameEvent::Idle));

        // Stopping an idle clock is also fine
        let mut fresh = FrameClock::new(6, Tuning::default());
        fresh.stop();
        assert_eq!(fresh.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_input_ignored_while_paused() {
        let mut clock = FrameClock::new(7, Tuning::default());
        clock.start(0.0);
        let switch = clock.graph.switches().next().unwrap().id;

        clock.pause();
        clock.toggle_switch(switch);
        assert_eq!(clock.state.router.active_index(switch), 0);

        clock.resume();
        clock.toggle_switch(switch);
        assert_eq!(clock.state.router.active_index(switch), 1);
    }

    #[test]
    fn test_first_frame_after_start_has_zero_delta() {
        let mut clock = FrameClock::new(8, Tuning::default());
        clock.start(500.0);
        clock.state.packets.push(malware_at(0.5));

        // Same-timestamp frame: no movement
        clock.frame(500.0);
        assert_eq!(clock.state.packets[0].progress, 0.5);
    }
}

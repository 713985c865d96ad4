//! Packet Tracer - a network packet routing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level graph, packets, routing, scoring)
//! - `clock`: Frame clock driving one simulation step per animation frame
//! - `tuning`: Data-driven game balance
//!
//! The crate is the simulation core only. A presentation layer consumes the
//! [`RenderSnapshot`] published after every tick and feeds player input back
//! through [`FrameClock`]; the core has no opinion on how anything is drawn.

pub mod clock;
pub mod sim;
pub mod tuning;

pub use clock::{FrameClock, FrameEvent};
pub use sim::{GamePhase, GameState, LevelGraph, Node, NodeId, NodeRole, RenderSnapshot};
pub use tuning::Tuning;

/// Engine constants (fixed, not tunable)
pub mod consts {
    /// Logical canvas width used for node layout
    pub const GAME_WIDTH: f32 = 1000.0;
    /// Logical canvas height used for node layout
    pub const GAME_HEIGHT: f32 = 800.0;

    /// Node radius (presentation hint)
    pub const NODE_RADIUS: f32 = 28.0;
    /// Packet radius (presentation hint)
    pub const PACKET_RADIUS: f32 = 8.0;

    /// Reference frame duration in ms; packet speeds are expressed as
    /// progress-per-reference-frame so movement is frame-rate independent
    pub const REFERENCE_FRAME_MS: f64 = 16.66;
    /// Frame deltas are clamped to this before advancing the simulation,
    /// so a stalled clock (backgrounded tab) cannot teleport packets
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Particles per burst
    pub const BURST_COUNT: usize = 10;
    /// Life removed from every particle each tick (independent of dt)
    pub const PARTICLE_DECAY: f32 = 0.03;
    /// Hard cap on live particles
    pub const MAX_PARTICLES: usize = 256;
}

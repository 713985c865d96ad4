//! Per-frame simulation step
//!
//! One call to [`tick`] advances the whole simulation by one frame:
//! difficulty ramp, packet spawning, movement, arrival resolution, particle
//! aging. The step is deterministic given the state's RNG and the caller's
//! timestamps.

use rand::Rng;

use super::level::{LevelGraph, NodeRole};
use super::state::{BurstColor, GamePhase, GameState, Packet, PacketKind, Payload};
use crate::consts::*;

/// Advance the simulation by one frame.
///
/// `now_ms` is the frame timestamp; `dt_ms` the elapsed time since the
/// previous frame, clamped here to [`MAX_FRAME_DELTA_MS`] so a stalled clock
/// cannot teleport packets. No-op unless the run is `Running`.
pub fn tick(state: &mut GameState, graph: &LevelGraph, now_ms: f64, dt_ms: f64) {
    if state.phase != GamePhase::Running {
        return;
    }

    let dt = dt_ms.min(MAX_FRAME_DELTA_MS);

    ramp_difficulty(state, now_ms);
    maybe_spawn(state, graph, now_ms);
    advance_packets(state, graph, dt);
    age_particles(state);
}

/// Step the speed multiplier once per ramp interval, capped by tuning.
/// Monotone non-decreasing for the lifetime of the run.
fn ramp_difficulty(state: &mut GameState, now_ms: f64) {
    if now_ms - state.last_ramp_ms > state.tuning.ramp_interval_ms {
        let cap = state.tuning.max_multiplier;
        state.speed_multiplier = (state.speed_multiplier + state.tuning.ramp_increment).min(cap);
        state.last_ramp_ms = now_ms;
        log::debug!("difficulty ramp: multiplier {:.2}", state.speed_multiplier);
    }
}

/// Spawn at most one packet per tick. The effective interval shrinks with
/// the square root of the multiplier so spawn pressure ramps gentler than
/// packet speed does.
fn maybe_spawn(state: &mut GameState, graph: &LevelGraph, now_ms: f64) {
    let interval = state.tuning.spawn_interval_ms / f64::from(state.speed_multiplier).sqrt();
    if now_ms - state.last_spawn_ms <= interval {
        return;
    }

    let (kind, payload) = draw_packet_type(state);
    let speed = state.tuning.base_speed * state.speed_multiplier;
    let (from, to) = graph.spawn_edge();
    let id = state.next_entity_id();
    state.packets.push(Packet {
        id,
        kind,
        payload,
        revealed: false,
        from,
        to,
        progress: 0.0,
        speed,
    });
    state.last_spawn_ms = now_ms;
    log::debug!("spawned packet {id} ({kind:?}) at speed {speed:.4}");
}

/// Type distribution: 30% malware, 20% encrypted (payload 50/50), 50% data
fn draw_packet_type(state: &mut GameState) -> (PacketKind, Payload) {
    let r: f32 = state.rng().random();
    if r > 0.7 {
        (PacketKind::Malware, Payload::Malware)
    } else if r > 0.5 {
        let payload = if state.rng().random::<f32>() > 0.5 {
            Payload::Data
        } else {
            Payload::Malware
        };
        (PacketKind::Encrypted, payload)
    } else {
        (PacketKind::Data, Payload::Data)
    }
}

/// Move every live packet and resolve arrivals. Movement is normalized to
/// the reference frame duration so per-packet speeds are frame-rate
/// independent.
fn advance_packets(state: &mut GameState, graph: &LevelGraph, dt_ms: f64) {
    let scale = (dt_ms / REFERENCE_FRAME_MS) as f32;
    let packets = std::mem::take(&mut state.packets);
    let mut kept = Vec::with_capacity(packets.len());

    for mut packet in packets {
        packet.progress += packet.speed * scale;
        if packet.progress < 1.0 {
            kept.push(packet);
            continue;
        }

        let Some(node) = graph.node(packet.to) else {
            // Unroutable edge endpoint; defensive drop, never an error
            log::debug!("packet {} arrived at unknown node, dropped", packet.id);
            continue;
        };

        match node.role {
            NodeRole::Server | NodeRole::Firewall => {
                // Scoring always uses the payload, revealed or not
                let correct = match node.role {
                    NodeRole::Server => packet.payload == Payload::Data,
                    _ => packet.payload == Payload::Malware,
                };
                state.apply_outcome(correct);
                let color = if correct {
                    BurstColor::Success
                } else {
                    BurstColor::Failure
                };
                state.emit_burst(node.pos, color);
                log::debug!(
                    "packet {} ({:?}) hit {:?}: {}",
                    packet.id,
                    packet.payload,
                    node.role,
                    if correct { "correct" } else { "incorrect" }
                );
            }
            NodeRole::Switch => {
                if let Some(next) = state.router.active_target(graph, node.id) {
                    packet.from = node.id;
                    packet.to = next;
                    packet.progress = 0.0;
                    kept.push(packet);
                } else {
                    // Switch with no resolvable edge; can't happen with the
                    // generated topology but must not panic
                    log::debug!("packet {} stalled at {:?}, dropped", packet.id, node.id);
                }
            }
            NodeRole::Source => {
                log::debug!("packet {} looped back to the source, dropped", packet.id);
            }
        }
    }

    state.packets = kept;
}

/// Particles drift by their velocity and fade by a fixed amount each tick,
/// independent of dt (matching the burst look at any frame rate the clock
/// settles on)
fn age_particles(state: &mut GameState) {
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_DECAY;
    }
    state.particles.retain(|p| p.life > 0.0);
}

//! Packet Tracer entry point
//!
//! Headless demo: drives the simulation with synthetic frame timestamps and
//! a simple routing policy, logging the run and printing the final score.
//! A real front end would replace this loop with its animation-frame
//! callback and draw each published snapshot.

use packet_tracer::consts::REFERENCE_FRAME_MS;
use packet_tracer::sim::{NodeRole, PacketKind};
use packet_tracer::{FrameClock, FrameEvent, Tuning};

/// Frames to simulate before giving up on a run ending on its own
const MAX_FRAMES: u64 = 120 * 60 * 10; // ten minutes at 120 fps

fn main() {
    env_logger::init();

    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);
    log::info!("packet-tracer demo starting (seed {seed})");

    let mut clock = FrameClock::new(seed, Tuning::default());
    clock.start(0.0);

    let mut now = 0.0;
    let mut last_logged_score = 0;
    for frame in 0..MAX_FRAMES {
        now += REFERENCE_FRAME_MS;

        let snapshot = match clock.frame(now) {
            FrameEvent::Snapshot(snap) => snap,
            FrameEvent::GameOver { final_score, .. } => {
                let summary = serde_json::json!({
                    "seed": seed,
                    "final_score": final_score,
                    "frames": frame,
                });
                println!("{summary}");
                return;
            }
            FrameEvent::Idle => break,
        };

        if snapshot.score != last_logged_score {
            last_logged_score = snapshot.score;
            log::info!(
                "score {} health {} packets {}",
                snapshot.display_score(),
                snapshot.display_health(),
                snapshot.packets.len()
            );
        }

        steer(&mut clock, &snapshot.packets);
    }

    log::info!("demo ended without game over, score {}", clock.state().score);
}

/// Demo policy: reveal encrypted packets on sight, and as a packet nears a
/// switch whose edges include terminals, point the switch at the terminal
/// matching the packet's visible kind.
fn steer(clock: &mut FrameClock, packets: &[packet_tracer::sim::Packet]) {
    let mut reveals = Vec::new();
    let mut toggles = Vec::new();

    for packet in packets {
        if packet.can_reveal() {
            reveals.push(packet.id);
            continue;
        }
        if packet.progress < 0.5 {
            continue;
        }
        let Some(switch) = clock.graph().node(packet.to) else {
            continue;
        };
        if switch.role != NodeRole::Switch {
            continue;
        }
        let wanted = match packet.kind {
            PacketKind::Malware => NodeRole::Firewall,
            _ => NodeRole::Server,
        };
        let active = clock
            .state()
            .router
            .active_target(clock.graph(), switch.id)
            .and_then(|t| clock.graph().node(t))
            .map(|n| n.role);
        if active.map(|r| r.is_terminal()) == Some(true) && active != Some(wanted) {
            toggles.push(switch.id);
        }
    }
    toggles.sort();
    toggles.dedup();

    for id in reveals {
        clock.reveal_packet(id);
    }
    for id in toggles {
        clock.toggle_switch(id);
    }
}

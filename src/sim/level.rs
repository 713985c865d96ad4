//! Level graph generation
//!
//! The level is a fixed 4-tier directed acyclic graph: one source feeding a
//! first-tier switch, which feeds two second-tier switches, which feed four
//! terminals (2 servers, 2 firewalls). Generation is pure and deterministic;
//! the graph is immutable for the whole run and shared read-only by every
//! other component.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{GAME_HEIGHT, GAME_WIDTH};

/// Identity of a node in the level graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// What a node does with packets that reach it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    /// Emits packets toward its single target
    Source,
    /// Forwards packets along one of two outgoing edges, player-selectable
    Switch,
    /// Terminal; correct destination for data packets
    Server,
    /// Terminal; correct destination for malware packets
    Firewall,
}

impl NodeRole {
    /// Terminals consume packets and score them
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeRole::Server | NodeRole::Firewall)
    }
}

/// A fixed point in the routing graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub role: NodeRole,
    /// Position on the logical canvas
    pub pos: Vec2,
    /// Outgoing edges in presentation order. Empty for terminals, one entry
    /// for the source, two for switches.
    pub targets: Vec<NodeId>,
}

/// The static level topology
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelGraph {
    nodes: Vec<Node>,
}

impl LevelGraph {
    /// Generate the fixed level layout.
    ///
    /// Tiers are spaced evenly between y=100 and y=GAME_HEIGHT-100; the
    /// second-tier switches sit 300px apart and the four terminals 180px
    /// apart, alternating Server/Firewall so every switch choice matters.
    pub fn generate() -> Self {
        let start_y = 100.0;
        let end_y = GAME_HEIGHT - 100.0;
        let tier_height = (end_y - start_y) / 4.0;
        let center_x = GAME_WIDTH / 2.0;

        let mut nodes = Vec::with_capacity(8);

        // Tier 0: source
        nodes.push(Node {
            id: SOURCE,
            role: NodeRole::Source,
            pos: Vec2::new(center_x, start_y),
            targets: vec![SWITCH_TIER1],
        });

        // Tier 1: single switch fed by the source
        nodes.push(Node {
            id: SWITCH_TIER1,
            role: NodeRole::Switch,
            pos: Vec2::new(center_x, start_y + tier_height),
            targets: vec![SWITCH_LEFT, SWITCH_RIGHT],
        });

        // Tier 2: two switches
        let tier2_y = start_y + tier_height * 2.0;
        let tier2_spread = 300.0;
        nodes.push(Node {
            id: SWITCH_LEFT,
            role: NodeRole::Switch,
            pos: Vec2::new(center_x - tier2_spread / 2.0, tier2_y),
            targets: vec![NodeId(4), NodeId(5)],
        });
        nodes.push(Node {
            id: SWITCH_RIGHT,
            role: NodeRole::Switch,
            pos: Vec2::new(center_x + tier2_spread / 2.0, tier2_y),
            targets: vec![NodeId(6), NodeId(7)],
        });

        // Tier 3: terminals, alternating so each switch fronts one of each
        let tier3_y = start_y + tier_height * 3.0;
        let tier3_spread = 180.0;
        let terminals = [
            (NodeId(4), NodeRole::Server, -1.5),
            (NodeId(5), NodeRole::Firewall, -0.5),
            (NodeId(6), NodeRole::Server, 0.5),
            (NodeId(7), NodeRole::Firewall, 1.5),
        ];
        for (id, role, x_offset) in terminals {
            nodes.push(Node {
                id,
                role,
                pos: Vec2::new(center_x + x_offset * tier3_spread, tier3_y),
                targets: Vec::new(),
            });
        }

        Self { nodes }
    }

    /// Look up a node by id. Unknown ids resolve to `None`; callers treat
    /// that as a no-op, never an error.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        // Ids are the vec indices by construction, but don't rely on it
        self.nodes
            .get(id.0 as usize)
            .filter(|n| n.id == id)
            .or_else(|| self.nodes.iter().find(|n| n.id == id))
    }

    /// All nodes in generation order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Iterator over switch nodes
    pub fn switches(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.role == NodeRole::Switch)
    }

    /// The spawn edge: source node id and its single target
    pub fn spawn_edge(&self) -> (NodeId, NodeId) {
        (SOURCE, SWITCH_TIER1)
    }
}

/// Well-known node ids for the generated layout
pub const SOURCE: NodeId = NodeId(0);
const SWITCH_TIER1: NodeId = NodeId(1);
const SWITCH_LEFT: NodeId = NodeId(2);
const SWITCH_RIGHT: NodeId = NodeId(3);

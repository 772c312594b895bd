//! Host events forwarded to the live phase.

use std::fmt;

use vicinity_core::WorldView;

/// Something the host reports to the episode machine.
///
/// Only the live phase sees events; they are dropped while no phase
/// is live.
#[derive(Clone, Copy)]
pub enum HostEvent<'a> {
    /// The client finished a simulation step; `world` is that step's snapshot.
    ClientTick {
        /// World snapshot for this tick.
        world: &'a dyn WorldView,
    },
    /// The server finished a simulation step.
    ServerTick,
    /// A frame was rendered.
    RenderTick,
    /// A chunk finished loading.
    ChunkLoad {
        /// Chunk x coordinate.
        x: i32,
        /// Chunk z coordinate.
        z: i32,
    },
    /// The controlling agent died.
    PlayerDied,
    /// The controlling agent joined the server.
    PlayerJoined,
    /// The controlling agent's own per-step update.
    PlayerTick,
    /// The server is choosing which creatures may spawn.
    PotentialSpawns,
    /// Host configuration changed.
    ConfigChanged,
}

impl HostEvent<'_> {
    /// Short name, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClientTick { .. } => "client_tick",
            Self::ServerTick => "server_tick",
            Self::RenderTick => "render_tick",
            Self::ChunkLoad { .. } => "chunk_load",
            Self::PlayerDied => "player_died",
            Self::PlayerJoined => "player_joined",
            Self::PlayerTick => "player_tick",
            Self::PotentialSpawns => "potential_spawns",
            Self::ConfigChanged => "config_changed",
        }
    }
}

impl fmt::Debug for HostEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChunkLoad { x, z } => f
                .debug_struct("ChunkLoad")
                .field("x", x)
                .field("z", z)
                .finish(),
            Self::ClientTick { world } => f
                .debug_struct("ClientTick")
                .field("objects", &world.loaded_objects().len())
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

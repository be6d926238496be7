//! Side-channel output for renderers and audio.
//!
//! The simulation never plays sounds or draws; it records what happened
//! during a tick and leaves the list on [`crate::SimulationState::events`].

use glam::Vec2;

use crate::entities::{EntityRef, PickupKind, PlayerId};
use crate::phase::Phase;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    ShotFired {
        by: Option<PlayerId>,
        count: usize,
    },
    ExplosionSpawned {
        source: EntityRef,
        at: Vec2,
    },
    PlayerDamaged {
        id: PlayerId,
        amount: i32,
        health: i32,
    },
    /// A hit landed on an invulnerable or shielded player.
    HitAbsorbed {
        id: PlayerId,
        shield_consumed: bool,
    },
    PlayerDied {
        id: PlayerId,
        lives_left: u32,
    },
    PlayerRespawned {
        id: PlayerId,
    },
    PlayerTeleported {
        id: PlayerId,
        to: Vec2,
    },
    PickupCollected {
        id: PlayerId,
        kind: PickupKind,
    },
    HazardDestroyed {
        credited: PlayerId,
        at: Vec2,
    },
    EnemyDestroyed {
        credited: PlayerId,
        at: Vec2,
        minion: bool,
    },
    BossDamaged {
        health: i32,
    },
    BossDefeated {
        credited: PlayerId,
    },
    WaveSpawned {
        wave: u32,
        size: u32,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    Paused(bool),
    /// A run reached a point worth offering to the high-score ledger.
    ScoreMilestone {
        name: String,
        score: u32,
        phases_completed: u32,
        victory: bool,
    },
}

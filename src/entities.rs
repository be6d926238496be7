//! All game entity types, pure data plus a few read-only accessors.
//!
//! Behaviour lives elsewhere: movement in [`crate::kinematics`], shooting in
//! [`crate::combat`], ability timers in [`crate::abilities`], and the per-tick
//! orchestration in [`crate::compute`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::{Arena, Handle};
use crate::config::GameConfig;
use crate::constants::*;
use crate::events::GameEvent;
use crate::phase::PhaseState;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.  Touching edges do not count as overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn centred(centre: Vec2, size: (f32, f32)) -> Self {
        let half = Vec2::new(size.0, size.1) * 0.5;
        Self {
            min: centre - half,
            max: centre + half,
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// True once no part of the box is left inside a `width`×`height` field.
    pub fn is_outside(&self, width: f32, height: f32) -> bool {
        self.max.y < 0.0 || self.min.y > height || self.max.x < 0.0 || self.min.x > width
    }

    /// Shifts the box by the least amount that puts it inside the field.
    pub fn clamp_into(&self, width: f32, height: f32) -> Aabb {
        let mut shift = Vec2::ZERO;
        if self.min.x < 0.0 {
            shift.x = -self.min.x;
        } else if self.max.x > width {
            shift.x = width - self.max.x;
        }
        if self.min.y < 0.0 {
            shift.y = -self.min.y;
        } else if self.max.y > height {
            shift.y = height - self.max.y;
        }
        Aabb {
            min: self.min + shift,
            max: self.max + shift,
        }
    }

    pub fn centre(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

// ── Timers ────────────────────────────────────────────────────────────────────

/// Absolute end time of a timed effect, in game-clock milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Expiry {
    pub at_ms: u64,
}

impl Expiry {
    pub fn after(now_ms: u64, duration_ms: u64) -> Self {
        Self {
            at_ms: now_ms.saturating_add(duration_ms),
        }
    }

    /// Still protecting / still running at `now_ms`.
    pub fn is_active(self, now_ms: u64) -> bool {
        now_ms < self.at_ms
    }

    /// Due for clearing by the per-tick expiry pass.
    pub fn has_lapsed(self, now_ms: u64) -> bool {
        now_ms > self.at_ms
    }

    pub fn remaining_ms(self, now_ms: u64) -> u64 {
        self.at_ms.saturating_sub(now_ms)
    }
}

// ── Players ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn partner(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

/// Where a player (re)appears: player one bottom-centre, player two
/// bottom-left quarter.
pub fn spawn_position(id: PlayerId, config: &GameConfig) -> Vec2 {
    let x = match id {
        PlayerId::One => config.width / 2.0,
        PlayerId::Two => config.width / 4.0,
    };
    Vec2::new(x, config.height - PLAYER_SPAWN_LIFT)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub pos: Vec2,
    /// 0..=MAX_HEALTH.  Zero exactly when `alive` is false.
    pub health: i32,
    pub lives: u32,
    pub alive: bool,
    pub score: u32,
    pub upgrade: Option<Expiry>,
    /// Side-gun pairs granted by the weapon upgrade.
    pub extra_guns: u32,
    pub shield: Option<Expiry>,
    pub invulnerable: Option<Expiry>,
    pub teleport_charge: bool,
    /// Earliest clock time the next shot may fire.
    pub next_shot_ms: u64,
    /// Armed on death; purely cosmetic countdown for the dead-state blink.
    pub respawn_deadline: Option<Expiry>,
    pub mouse_control: bool,
    pub blink_phase: f32,
}

impl Player {
    pub fn new(id: PlayerId, pos: Vec2, lives: u32) -> Self {
        Self {
            id,
            pos,
            health: MAX_HEALTH,
            lives,
            alive: true,
            score: 0,
            upgrade: None,
            extra_guns: 0,
            shield: None,
            invulnerable: None,
            teleport_charge: false,
            next_shot_ms: 0,
            respawn_deadline: None,
            mouse_control: false,
            blink_phase: 0.0,
        }
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::centred(self.pos, PLAYER_SIZE)
    }

    pub fn is_invulnerable(&self, now_ms: u64) -> bool {
        self.invulnerable.is_some_and(|e| e.is_active(now_ms))
    }

    pub fn has_shield(&self, now_ms: u64) -> bool {
        self.shield.is_some_and(|e| e.is_active(now_ms))
    }

    pub fn is_upgraded(&self, now_ms: u64) -> bool {
        self.extra_guns > 0 && self.upgrade.is_some_and(|e| e.is_active(now_ms))
    }

    pub fn respawn_deadline_elapsed(&self, now_ms: u64) -> bool {
        match self.respawn_deadline {
            Some(deadline) => !deadline.is_active(now_ms),
            None => true,
        }
    }

    /// Render opacity.  Opaque while alive; pulses while the respawn
    /// countdown runs; a steady dim value once it is over.
    pub fn blink_alpha(&self, now_ms: u64) -> u8 {
        if self.alive {
            return u8::MAX;
        }
        if self.respawn_deadline_elapsed(now_ms) {
            return DEAD_IDLE_ALPHA;
        }
        ((self.blink_phase.sin() + 1.0) * 127.5).clamp(0.0, 255.0) as u8
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player(PlayerId),
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Pixels per tick.  `x` is only non-zero for spread shots.
    pub vel: Vec2,
    pub owner: Owner,
}

impl Projectile {
    pub fn hitbox(&self) -> Aabb {
        Aabb::centred(self.pos, PROJECTILE_SIZE)
    }

    pub fn player_owner(&self) -> Option<PlayerId> {
        match self.owner {
            Owner::Player(id) => Some(id),
            Owner::Enemy => None,
        }
    }
}

// ── Hazards ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Default,
    Evil,
    Power,
    Invul,
    ExtraLife,
    Teleporter,
    Revive,
    Shield,
}

impl HazardKind {
    pub const ALL: [HazardKind; 8] = [
        HazardKind::Default,
        HazardKind::Evil,
        HazardKind::Power,
        HazardKind::Invul,
        HazardKind::ExtraLife,
        HazardKind::Teleporter,
        HazardKind::Revive,
        HazardKind::Shield,
    ];

    pub fn contact_damage(self) -> i32 {
        match self {
            HazardKind::Evil => EVIL_HAZARD_DAMAGE,
            _ => HAZARD_DAMAGE,
        }
    }

    /// Inclusive fall-speed range before the global multiplier.
    pub fn speed_range(self) -> (i32, i32) {
        match self {
            HazardKind::Evil => EVIL_HAZARD_SPEED_RANGE,
            _ => HAZARD_SPEED_RANGE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hazard {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees, cosmetic only.
    pub rotation: f32,
    pub rotation_rate: f32,
    pub kind: HazardKind,
}

impl Hazard {
    pub fn hitbox(&self) -> Aabb {
        Aabb::centred(self.pos, HAZARD_SIZE)
    }
}

// ── Enemies & boss ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyShip {
    pub pos: Vec2,
    pub health: i32,
    pub fire_delay_ms: u64,
    pub next_shot_ms: u64,
    pub next_jitter_ms: u64,
    /// Spawned by the boss rather than by a wave.
    pub minion: bool,
}

impl EnemyShip {
    pub fn hitbox(&self) -> Aabb {
        Aabb::centred(self.pos, ENEMY_SIZE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackMode {
    Normal,
    Spread,
    Rapid,
}

impl AttackMode {
    pub const ALL: [AttackMode; 3] = [AttackMode::Normal, AttackMode::Spread, AttackMode::Rapid];
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub pos: Vec2,
    pub health: i32,
    /// +1 moving right, -1 moving left.
    pub direction: f32,
    pub mode: AttackMode,
    pub next_shot_ms: u64,
    pub next_mode_ms: u64,
    pub next_minion_ms: u64,
}

impl Boss {
    pub fn hitbox(&self) -> Aabb {
        Aabb::centred(self.pos, BOSS_SIZE)
    }
}

// ── Pickups & effects ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Revive,
    InvulnerabilityGift,
    WeaponUpgrade,
    ExtraLife,
    TeleportCharge,
    Shield,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    pub pos: Vec2,
    pub kind: PickupKind,
    /// Random phase offset of the sideways-looking bob.
    pub float_offset: f32,
}

impl Pickup {
    pub fn hitbox(&self) -> Aabb {
        Aabb::centred(self.pos, PICKUP_SIZE)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub pos: Vec2,
    pub frame: u8,
    pub next_frame_ms: u64,
}

/// Tagged reference to any live entity, used when a consequence has to name
/// what it happened to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Player(PlayerId),
    Projectile(Handle),
    Hazard(Handle),
    Enemy(Handle),
    Boss,
    Pickup(Handle),
    Explosion(Handle),
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation.  Cloneable so [`crate::compute::tick`] can return
/// a new copy and leave its input untouched.
#[derive(Clone, Debug)]
pub struct SimulationState {
    pub config: GameConfig,
    /// Game clock.  Frozen while paused or after the game ends.
    pub clock_ms: u64,
    pub two_player: bool,
    /// Indexed by [`PlayerId::index`]; one entry in single-player.
    pub players: Vec<Player>,
    pub projectiles: Arena<Projectile>,
    pub hazards: Arena<Hazard>,
    pub enemies: Arena<EnemyShip>,
    pub pickups: Arena<Pickup>,
    pub explosions: Arena<Explosion>,
    pub boss: Option<Boss>,
    pub phase: PhaseState,
    /// Side-channel output of the most recent tick or command.
    pub events: Vec<GameEvent>,
}

impl SimulationState {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn combined_score(&self) -> u32 {
        self.players.iter().map(|p| p.score).sum()
    }

    pub fn any_player_alive(&self) -> bool {
        self.players.iter().any(|p| p.alive)
    }

    /// Centre of the referenced entity, or `None` if it no longer exists.
    pub fn position_of(&self, entity: EntityRef) -> Option<Vec2> {
        match entity {
            EntityRef::Player(id) => self.player(id).map(|p| p.pos),
            EntityRef::Projectile(h) => self.projectiles.get(h).map(|p| p.pos),
            EntityRef::Hazard(h) => self.hazards.get(h).map(|h| h.pos),
            EntityRef::Enemy(h) => self.enemies.get(h).map(|e| e.pos),
            EntityRef::Boss => self.boss.as_ref().map(|b| b.pos),
            EntityRef::Pickup(h) => self.pickups.get(h).map(|p| p.pos),
            EntityRef::Explosion(h) => self.explosions.get(h).map(|e| e.pos),
        }
    }

    pub fn exists(&self, entity: EntityRef) -> bool {
        self.position_of(entity).is_some()
    }
}

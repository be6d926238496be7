//! NOVA DESCENT — simulation core for a two-player descent shooter.
//!
//! The crate is split the same way the game loop runs: pure data in
//! [`entities`], per-concern rules in their own modules, and the pure
//! state → state orchestration in [`compute`].  Rendering and input live in
//! the binary; the library never touches the terminal.

pub mod abilities;
pub mod arena;
pub mod audio;
pub mod collision;
pub mod combat;
pub mod compute;
pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod events;
pub mod highscores;
pub mod kinematics;
pub mod phase;
pub mod rng;
pub mod snapshot;
pub mod spawn;
pub mod storage;

pub use arena::{Arena, Handle};
pub use compute::{new_game, tick, CommandOutcome, PlayerInput, RejectReason, TickInput};
pub use config::GameConfig;
pub use entities::SimulationState;
pub use error::{GameError, GameResult};
pub use phase::{Phase, PhaseState};
pub use rng::{RandomSource, ScriptedRandom};

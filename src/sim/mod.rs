//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed sub-stepped timestep only
//! - Seeded RNG only
//! - Stable iteration order (entity list order)
//! - No rendering or platform dependencies
//!
//! Stage order within one sub-step is fixed and documented in [`tick`]:
//! controls -> movement -> collision -> combat -> NPC behavior -> cleanup.

pub mod behavior;
pub mod collision;
pub mod combat;
pub mod events;
pub mod input;
pub mod movement;
pub mod state;
pub mod tick;

pub use events::{Cue, CueKind};
pub use input::{Intents, TickInput};
pub use state::{
    BloodSplatter, Driver, EntityId, MotionState, Person, PersonKind, Projectile, Snapshot,
    Vehicle, VehicleStyle, World,
};
pub use tick::advance;

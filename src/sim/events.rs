//! Fire-and-forget cue requests for the audio/effects collaborator
//!
//! The engine never synthesizes sound or draws anything; it records what
//! just happened and at what intensity, and the host drains the queue once
//! per tick. Nothing here is awaited or acknowledged.

use glam::Vec2;
use serde::Serialize;

/// What kind of event the cue describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CueKind {
    ShotFired,
    MeleeSwing,
    Death,
    VehicleImpact,
    RollStart,
    VehicleEnter,
    VehicleExit,
    Footstep,
}

/// One cue request
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Cue {
    pub kind: CueKind,
    /// Event strength, e.g. impact relative speed; 1.0 for plain one-shots
    pub intensity: f32,
    /// World position the event happened at
    pub pos: Vec2,
}

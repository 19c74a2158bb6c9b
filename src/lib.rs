//! Gridlock - a top-down open-city action simulation engine
//!
//! Core modules:
//! - `map`: Procedural city tile grid (roads, sidewalks, buildings, parks)
//! - `sim`: Deterministic simulation (movement, collisions, combat, AI)
//! - `tuning`: Data-driven game balance
//!
//! The engine is headless: presentation, audio synthesis and raw input
//! capture live in the embedding host. The host feeds logical control
//! signals in and reads a snapshot plus a cue queue back out each tick.

pub mod map;
pub mod sim;
pub mod tuning;

pub use map::{CityMap, Tile, generate_map};
pub use tuning::{Tuning, WeaponKind, WeaponSpec};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// World units per map tile
    pub const TILE_SIZE: f32 = 128.0;
    /// City side length in tiles
    pub const CITY_SIZE: u32 = 40;

    /// Fixed number of physics sub-steps per tick
    pub const SUB_STEPS: u32 = 4;
    /// Frame delta cap in frame units (prevents tunneling on frame hitches)
    pub const MAX_FRAME_DELTA: f32 = 2.0;

    /// Pedestrian and player collision radius
    pub const PED_RADIUS: f32 = 15.0;
    /// Vehicle collision radius
    pub const VEHICLE_RADIUS: f32 = 45.0;
    /// Projectile collision radius
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    /// Projectile travel speed (world units per frame unit)
    pub const PROJECTILE_SPEED: f32 = 17.0;

    /// Turn authority saturates at this vehicle speed
    pub const TURN_SATURATION_SPEED: f32 = 3.8;
    /// AI driver cruise speed cap
    pub const AI_CRUISE_SPEED: f32 = 2.8;
    /// AI driver acceleration per frame unit
    pub const AI_ACCEL: f32 = 0.1;
    /// AI driver road lookahead distance
    pub const AI_LOOKAHEAD: f32 = 75.0;
    /// AI driver correction turn rate when the lookahead point is off-road
    pub const AI_STEER_RATE: f32 = 0.05;

    /// Radius within which the enter-vehicle intent finds a vehicle
    pub const VEHICLE_ENTER_RADIUS: f32 = 95.0;
    /// Sideways offset applied to the player when exiting a vehicle
    pub const VEHICLE_EXIT_OFFSET: f32 = 85.0;

    /// Vehicle-vehicle radius sum tightening factor
    pub const VV_TIGHTEN: f32 = 0.95;
    /// Fraction of relative speed exchanged on vehicle-vehicle impact
    pub const VV_SPEED_BLEND: f32 = 0.6;
    /// Relative speed above which a vehicle impact emits a cue and damage
    pub const VV_IMPACT_SPEED: f32 = 1.0;
    /// Vehicle health lost per unit of relative impact speed
    pub const VV_DAMAGE_FACTOR: f32 = 8.0;
    /// Vehicle-pedestrian radius sum slack (cars overlap peds slightly)
    pub const VP_RADIUS_SLACK: f32 = 5.0;
    /// Vehicle speed above which a struck pedestrian takes damage
    pub const VP_DAMAGE_SPEED: f32 = 1.2;
    /// Pedestrian damage per unit of vehicle speed
    pub const VP_DAMAGE_FACTOR: f32 = 15.0;
    /// Scalar speed multiplier applied when a vehicle hits a building
    pub const BUILDING_BOUNCE: f32 = -0.4;
    /// Vehicle speed above which a building impact costs vehicle health
    pub const BUILDING_DAMAGE_SPEED: f32 = 1.5;
    /// Vehicle health lost per unit of speed on building impact
    pub const BUILDING_DAMAGE_FACTOR: f32 = 6.0;

    /// Half-angle of the melee cone (radians)
    pub const MELEE_CONE_HALF_ANGLE: f32 = 0.9;
    /// Score for a player melee hit
    pub const SCORE_MELEE_HIT: u64 = 5;
    /// Score for a player projectile hit
    pub const SCORE_RANGED_HIT: u64 = 25;
    /// Score for a pedestrian kill (awarded at cleanup)
    pub const SCORE_KILL: u64 = 60;

    /// Anger level above which an NPC pursues its target
    pub const ANGER_THRESHOLD: f32 = 45.0;
    /// Anger decay per frame unit (de-escalation back to wandering)
    pub const ANGER_DECAY: f32 = 0.02;
    /// NPC pursuit movement speed
    pub const PURSUIT_SPEED: f32 = 2.4;
    /// NPC engagement radius (fires inside this range while pursuing)
    pub const ENGAGE_RADIUS: f32 = 450.0;
    /// NPC wander movement speed
    pub const WANDER_SPEED: f32 = 1.4;
    /// NPC wander heading drift per frame unit
    pub const WANDER_DRIFT: f32 = 0.12;

    /// Maximum wanted level
    pub const WANTED_MAX: f32 = 5.0;
    /// Wanted level decay per frame unit
    pub const WANTED_DECAY: f32 = 0.002;

    /// Frame units a blood splatter holds at full alpha before fading
    pub const BLOOD_HOLD: f64 = 600.0;
    /// Alpha lost per frame unit once a splatter starts fading
    pub const BLOOD_FADE: f32 = 0.005;

    /// Frame units between footstep cues while running
    pub const FOOTSTEP_INTERVAL: f32 = 15.0;

    /// Initial vehicle count
    pub const VEHICLE_COUNT: usize = 35;
    /// Vehicles that start with an AI driver
    pub const AI_DRIVER_COUNT: usize = 15;
    /// Initial pedestrian count
    pub const PEDESTRIAN_COUNT: usize = 60;
}

/// Normalize angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Wrapped signed angular difference a - b, in [-π, π)
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(a - b)
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

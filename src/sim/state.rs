//! World state and core entity types
//!
//! One mutable aggregate owns every entity; resolver stages borrow it
//! exclusively and mutate in a fixed order. All cross-entity references are
//! plain ids resolved through lookups, never owning pointers, so a missing
//! id is the normal "reference lost" case rather than an error.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::events::{Cue, CueKind};
use crate::consts::*;
use crate::map::{CityMap, Tile, generate_map};
use crate::tuning::{Tuning, WeaponKind};

/// Stable entity identifier, allocated by the world
pub type EntityId = u32;

/// Who controls a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PersonKind {
    /// Input-driven singleton, never removed
    Player,
    /// AI-driven pedestrian
    Npc,
}

/// Discrete motion state of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MotionState {
    Idle,
    Walking,
    Running,
    Rolling,
}

/// A person on foot or in a vehicle (player or pedestrian)
#[derive(Debug, Clone)]
pub struct Person {
    pub id: EntityId,
    pub kind: PersonKind,
    pub pos: Vec2,
    /// Facing angle (radians)
    pub angle: f32,
    pub vel: Vec2,
    pub radius: f32,
    /// Death at <= 0; the raw value may go negative before the check
    pub health: f32,
    /// Spent on rolls, regenerates up to 100
    pub stamina: f32,
    pub weapon: WeaponKind,
    pub motion: MotionState,
    /// Aggression scalar; above the threshold the NPC pursues its target
    pub anger: f32,
    /// Pursuit target (weak reference)
    pub target: Option<EntityId>,
    /// Vehicle currently driven (weak reference); excludes free movement
    pub vehicle: Option<EntityId>,
    /// Clock value of the last accepted shot
    pub last_shot: Option<f64>,
    /// Counts down in frame units while rolling
    pub roll_timer: f32,
}

impl Person {
    pub fn new_player(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            kind: PersonKind::Player,
            pos,
            angle: 0.0,
            vel: Vec2::ZERO,
            radius: PED_RADIUS,
            health: 100.0,
            stamina: 100.0,
            weapon: WeaponKind::Fist,
            motion: MotionState::Idle,
            anger: 0.0,
            target: None,
            vehicle: None,
            last_shot: None,
            roll_timer: 0.0,
        }
    }

    pub fn new_npc(id: EntityId, pos: Vec2, angle: f32, anger: f32) -> Self {
        Self {
            id,
            kind: PersonKind::Npc,
            pos,
            angle,
            vel: Vec2::ZERO,
            radius: PED_RADIUS,
            health: 100.0,
            stamina: 100.0,
            weapon: WeaponKind::Pistol,
            motion: MotionState::Idle,
            anger,
            target: None,
            vehicle: None,
            last_shot: None,
            roll_timer: 0.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Alive, on foot, and therefore a valid collision/combat target
    #[inline]
    pub fn is_exposed(&self) -> bool {
        self.is_alive() && self.vehicle.is_none()
    }
}

/// Vehicle body style; affects size and drawing only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VehicleStyle {
    Sedan,
    Sport,
    Van,
}

/// Who is driving a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Driver {
    Player,
    Ai,
}

/// A drivable (or wrecked) vehicle
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: EntityId,
    pub pos: Vec2,
    /// Heading angle (radians)
    pub angle: f32,
    pub vel: Vec2,
    pub radius: f32,
    pub style: VehicleStyle,
    /// Paint hue in degrees, for the presentation layer
    pub color_hue: f32,
    /// Signed scalar speed; positive is forward
    pub speed: f32,
    pub health: f32,
    pub driver: Option<Driver>,
    /// Set once when health reaches 0; wrecks are immobile and not driveable
    pub wrecked: bool,
}

impl Vehicle {
    #[inline]
    pub fn is_wrecked(&self) -> bool {
        self.wrecked
    }
}

/// A projectile in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    /// Excluded from hit tests against the shooter
    pub owner: EntityId,
    pub weapon: WeaponKind,
    pub pos: Vec2,
    /// Straight-line velocity, fixed at spawn
    pub vel: Vec2,
    pub radius: f32,
    pub distance: f32,
    pub max_distance: f32,
    pub explosive: bool,
}

/// Cosmetic blood splatter; never affects simulation
#[derive(Debug, Clone)]
pub struct BloodSplatter {
    pub pos: Vec2,
    pub angle: f32,
    pub scale: f32,
    pub alpha: f32,
    /// Clock value at spawn; fading starts after a hold period
    pub spawned: f64,
}

/// Read-only per-tick state export for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub pos: Vec2,
    pub angle: f32,
    pub health: f32,
    pub stamina: f32,
    pub weapon: WeaponKind,
    pub motion: MotionState,
    pub vehicle: Option<EntityId>,
    /// Scalar speed of the driven vehicle, if any
    pub vehicle_speed: Option<f32>,
    pub score: u64,
    pub wanted: f32,
    pub clock: f64,
}

/// Complete simulation state
///
/// Owned by the engine loop and passed by exclusive mutable reference into
/// each resolver stage. There is no ambient or static state anywhere.
#[derive(Debug, Clone)]
pub struct World {
    /// Session seed, kept for resets
    pub seed: u64,
    pub tuning: Tuning,
    pub map: CityMap,
    pub player: Person,
    pub pedestrians: Vec<Person>,
    pub vehicles: Vec<Vehicle>,
    pub projectiles: Vec<Projectile>,
    pub blood: Vec<BloodSplatter>,
    pub score: u64,
    /// Threat level, raised by player kills and decaying over time
    pub wanted: f32,
    /// Simulation clock in frame units
    pub clock: f64,
    pub(crate) cues: Vec<Cue>,
    pub(crate) rng: Pcg32,
    pub(crate) footstep_timer: f32,
    pub(crate) next_id: EntityId,
}

impl World {
    /// Create a fresh session: generate the map and spawn the population
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let map = generate_map(CITY_SIZE, CITY_SIZE, seed);
        let mut world = Self {
            seed,
            tuning,
            map,
            player: Person::new_player(0, Vec2::ZERO),
            pedestrians: Vec::new(),
            vehicles: Vec::new(),
            projectiles: Vec::new(),
            blood: Vec::new(),
            score: 0,
            wanted: 0.0,
            clock: 0.0,
            cues: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            footstep_timer: 0.0,
            next_id: 1,
        };

        let player_id = world.next_entity_id();
        world.player = Person::new_player(player_id, Vec2::splat(TILE_SIZE * 7.5));

        world.spawn_vehicles();
        world.spawn_pedestrians();

        log::info!(
            "new world: seed {}, {} vehicles, {} pedestrians",
            seed,
            world.vehicles.len(),
            world.pedestrians.len()
        );
        world
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_vehicles(&mut self) {
        let roads = self.map.tile_centers_where(|t| t == Tile::Road);
        if roads.is_empty() {
            return;
        }
        for i in 0..VEHICLE_COUNT {
            let pos = roads[self.rng.random_range(0..roads.len())];
            let angle = if self.rng.random::<bool>() {
                0.0
            } else {
                FRAC_PI_2
            };
            let style = match i % 3 {
                0 => VehicleStyle::Sport,
                1 => VehicleStyle::Sedan,
                _ => VehicleStyle::Van,
            };
            let id = self.next_entity_id();
            self.vehicles.push(Vehicle {
                id,
                pos,
                angle,
                vel: Vec2::ZERO,
                radius: VEHICLE_RADIUS,
                style,
                color_hue: self.rng.random::<f32>() * 360.0,
                speed: 0.0,
                health: 100.0,
                driver: (i < AI_DRIVER_COUNT).then_some(Driver::Ai),
                wrecked: false,
            });
        }
    }

    fn spawn_pedestrians(&mut self) {
        let walkable = self
            .map
            .tile_centers_where(|t| t == Tile::Sidewalk || t == Tile::Park);
        if walkable.is_empty() {
            return;
        }
        for _ in 0..PEDESTRIAN_COUNT {
            let pos = walkable[self.rng.random_range(0..walkable.len())];
            let angle = self.rng.random::<f32>() * TAU;
            let anger = self.rng.random::<f32>() * 20.0;
            let id = self.next_entity_id();
            self.pedestrians
                .push(Person::new_npc(id, pos, angle, anger));
        }
    }

    /// Atomically replace the whole session with a fresh one (respawn)
    pub fn reset(&mut self) {
        log::info!("world reset (seed {})", self.seed);
        *self = Self::new(self.seed, self.tuning.clone());
    }

    /// Look up a living person (player or pedestrian) by id
    pub fn person(&self, id: EntityId) -> Option<&Person> {
        if self.player.id == id {
            return Some(&self.player);
        }
        self.pedestrians.iter().find(|p| p.id == id)
    }

    /// Look up a vehicle by id
    pub fn vehicle(&self, id: EntityId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn vehicle_mut(&mut self, id: EntityId) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id == id)
    }

    /// Queue a cue for the audio/effects collaborator
    pub(crate) fn push_cue(&mut self, kind: CueKind, intensity: f32, pos: Vec2) {
        self.cues.push(Cue {
            kind,
            intensity,
            pos,
        });
    }

    /// Spawn a blood splatter and its death cue at `pos`
    pub(crate) fn spawn_blood(&mut self, pos: Vec2) {
        let angle = self.rng.random::<f32>() * TAU;
        let scale = 0.5 + self.rng.random::<f32>() * 1.5;
        self.blood.push(BloodSplatter {
            pos,
            angle,
            scale,
            alpha: 0.8,
            spawned: self.clock,
        });
        self.push_cue(CueKind::Death, 1.0, pos);
    }

    /// Drain the cue queue; the host calls this once per tick
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Whether the terminal player-death state has been reached
    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.player.health <= 0.0
    }

    /// Read-only state export for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        let vehicle_speed = self
            .player
            .vehicle
            .and_then(|id| self.vehicle(id))
            .map(|v| v.speed);
        Snapshot {
            pos: self.player.pos,
            angle: self.player.angle,
            health: self.player.health,
            stamina: self.player.stamina,
            weapon: self.player.weapon,
            motion: self.player.motion,
            vehicle: self.player.vehicle,
            vehicle_speed,
            score: self.score,
            wanted: self.wanted,
            clock: self.clock,
        }
    }
}

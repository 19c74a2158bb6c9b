//! Control resolution
//!
//! Maps the host's logical input signals into intents for the physics step.
//! Resolution is stateless per tick: held signals become continuous intents
//! applied every sub-step, one-shot presses (weapon select, enter vehicle,
//! roll) are applied once at the top of the tick.

use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use super::events::CueKind;
use super::state::{Driver, MotionState, World};
use crate::consts::{VEHICLE_ENTER_RADIUS, VEHICLE_EXIT_OFFSET};
use crate::heading_vec;
use crate::tuning::WeaponKind;

/// Logical input signals for one tick
///
/// The host owns capture plumbing (keyboard, mouse, gamepad) and clears
/// one-shot flags after each tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal movement axis, -1/0/1 (east positive)
    pub move_x: i8,
    /// Vertical movement axis, -1/0/1 (south positive, screen convention)
    pub move_y: i8,
    /// Fire/attack held
    pub fire_held: bool,
    /// Aim modifier held: facing is locked while moving (strafe)
    pub aim_held: bool,
    /// Walk modifier held (otherwise movement runs)
    pub walk_held: bool,
    /// Enter/exit vehicle pressed this tick
    pub enter_vehicle_pressed: bool,
    /// Roll pressed this tick
    pub roll_pressed: bool,
    /// 1-based weapon slot selected this tick, if any
    pub weapon_slot: Option<u8>,
}

/// Continuous intents consumed by the movement step each sub-step
#[derive(Debug, Clone, Copy, Default)]
pub struct Intents {
    /// Normalized movement direction, None when no axis is held
    pub move_dir: Option<Vec2>,
    /// Walk instead of run
    pub walk: bool,
    /// Vehicle throttle: +1 forward, -1 reverse
    pub throttle: f32,
    /// Vehicle steering: +1 clockwise
    pub steer: f32,
    /// Fire held
    pub fire: bool,
    /// Aim held (facing lock)
    pub aim: bool,
}

/// Resolve held signals into movement/vehicle intents
pub fn resolve(input: &TickInput) -> Intents {
    let axis = Vec2::new(input.move_x as f32, input.move_y as f32);
    let move_dir = (axis != Vec2::ZERO).then(|| axis.normalize());
    Intents {
        move_dir,
        walk: input.walk_held,
        // Up on the movement axis is forward throttle
        throttle: -input.move_y as f32,
        steer: input.move_x as f32,
        fire: input.fire_held,
        aim: input.aim_held,
    }
}

/// Apply one-shot presses (weapon select, vehicle toggle, roll start)
pub fn apply_one_shots(world: &mut World, input: &TickInput) {
    if let Some(slot) = input.weapon_slot
        && let Some(kind) = WeaponKind::from_slot(slot)
    {
        world.player.weapon = kind;
    }
    if input.enter_vehicle_pressed {
        toggle_vehicle(world);
    }
    if input.roll_pressed {
        try_roll(world);
    }
}

/// Enter the nearest available vehicle, or exit the current one
fn toggle_vehicle(world: &mut World) {
    if let Some(vid) = world.player.vehicle {
        // Exit: step out sideways from wherever the vehicle ended up. A
        // vehicle that no longer resolves is a lost reference; just clear.
        let exit = world.vehicle_mut(vid).map(|v| {
            v.driver = None;
            (v.pos, v.angle)
        });
        world.player.vehicle = None;
        if let Some((vpos, vangle)) = exit {
            world.player.pos = vpos + heading_vec(vangle + FRAC_PI_2) * VEHICLE_EXIT_OFFSET;
            world.player.vel = Vec2::ZERO;
            let pos = world.player.pos;
            world.push_cue(CueKind::VehicleExit, 1.0, pos);
        }
    } else if world.player.is_alive() {
        let ppos = world.player.pos;
        let entered = world
            .vehicles
            .iter_mut()
            .find(|v| {
                !v.is_wrecked()
                    && v.driver.is_none()
                    && v.pos.distance_squared(ppos) < VEHICLE_ENTER_RADIUS * VEHICLE_ENTER_RADIUS
            })
            .map(|v| {
                v.driver = Some(Driver::Player);
                (v.id, v.pos)
            });
        if let Some((id, pos)) = entered {
            world.player.vehicle = Some(id);
            world.player.motion = MotionState::Idle;
            world.push_cue(CueKind::VehicleEnter, 1.0, pos);
        }
    }
}

/// Start a roll if on foot, not already rolling, and stamina allows
fn try_roll(world: &mut World) {
    let cost = world.tuning.roll_stamina_cost;
    let duration = world.tuning.roll_duration;
    let p = &mut world.player;
    if p.vehicle.is_some() || p.motion == MotionState::Rolling || !p.is_alive() {
        return;
    }
    if p.stamina >= cost {
        p.stamina -= cost;
        p.roll_timer = duration;
        p.motion = MotionState::Rolling;
        let pos = p.pos;
        world.push_cue(CueKind::RollStart, 1.0, pos);
    }
}

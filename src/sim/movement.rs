//! Physics and movement integration
//!
//! Semi-implicit Euler over every mobile entity, run once per sub-step.
//! Friction and drag are exponential decays (`base^dt`) so the result is
//! independent of how a tick is split into sub-steps.

use glam::Vec2;

use super::input::Intents;
use super::state::{Driver, MotionState, World};
use crate::consts::*;
use crate::heading_vec;
use crate::map::Tile;

/// Advance every mobile entity by one sub-step
pub fn step(world: &mut World, intents: &Intents, dt: f32) {
    step_vehicles(world, intents, dt);
    if world.player.vehicle.is_none() {
        step_player_on_foot(world, intents, dt);
    }
}

fn step_vehicles(world: &mut World, intents: &Intents, dt: f32) {
    let accel = world.tuning.vehicle_accel;
    let reverse_factor = world.tuning.reverse_accel_factor;
    let turn_speed = world.tuning.vehicle_turn_speed;
    let drag = world.tuning.drag;

    for i in 0..world.vehicles.len() {
        let v = &mut world.vehicles[i];
        if v.is_wrecked() {
            v.vel = Vec2::ZERO;
            continue;
        }
        match v.driver {
            Some(Driver::Player) => {
                if intents.throttle > 0.0 {
                    v.speed += accel * dt;
                } else if intents.throttle < 0.0 {
                    v.speed -= accel * reverse_factor * dt;
                }
                // Turning is ineffective near-stationary
                let authority = (v.speed.abs() / TURN_SATURATION_SPEED).min(1.0);
                v.angle += intents.steer * turn_speed * authority * dt;
                v.speed *= drag.powf(dt);
            }
            Some(Driver::Ai) => {
                v.speed = (v.speed + AI_ACCEL * dt).min(AI_CRUISE_SPEED);
                // Local lookahead steering: nudge until the road is ahead
                let look = v.pos + heading_vec(v.angle) * AI_LOOKAHEAD;
                if world.map.tile_at(look) != Some(Tile::Road) {
                    v.angle += AI_STEER_RATE * dt;
                }
            }
            None => {
                // Coasting to a stop
                v.speed *= drag.powf(dt);
            }
        }
        v.vel = heading_vec(v.angle) * v.speed;
        v.pos += v.vel * dt;
    }

    // The driver's transform is slaved to the vehicle
    if let Some(vid) = world.player.vehicle
        && let Some(v) = world.vehicle(vid)
    {
        let (pos, angle) = (v.pos, v.angle);
        world.player.pos = pos;
        world.player.angle = angle;
        world.player.vel = Vec2::ZERO;
        world.player.motion = MotionState::Idle;
    }
}

fn step_player_on_foot(world: &mut World, intents: &Intents, dt: f32) {
    let run_speed = world.tuning.run_speed;
    let walk_speed = world.tuning.walk_speed;
    let friction = world.tuning.friction;
    let roll_boost = world.tuning.roll_speed_boost;

    let p = &mut world.player;
    if !p.is_alive() {
        return;
    }

    if p.motion == MotionState::Rolling {
        // Rolling ignores input: fixed boost along the current facing
        p.pos += heading_vec(p.angle) * roll_boost * dt;
        p.roll_timer -= dt;
        if p.roll_timer <= 0.0 {
            p.roll_timer = 0.0;
            p.motion = MotionState::Idle;
        }
        return;
    }

    if let Some(dir) = intents.move_dir {
        let speed = if intents.walk { walk_speed } else { run_speed };
        p.vel = dir * speed;
        if !intents.aim {
            p.angle = dir.y.atan2(dir.x);
        }
        p.motion = if intents.walk {
            MotionState::Walking
        } else {
            MotionState::Running
        };
    } else {
        p.vel *= friction.powf(dt);
        p.motion = MotionState::Idle;
    }
    p.pos += p.vel * dt;

    // Footstep cadence while running
    if world.player.motion == MotionState::Running {
        world.footstep_timer += dt;
        if world.footstep_timer > FOOTSTEP_INTERVAL {
            world.footstep_timer = 0.0;
            let pos = world.player.pos;
            world.push_cue(super::events::CueKind::Footstep, 1.0, pos);
        }
    }
}

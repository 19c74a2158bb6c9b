//! Collision detection and resolution
//!
//! Runs once per sub-step after movement. Circle-circle tests separate the
//! dynamic pairs (vehicle-vehicle, vehicle-pedestrian,
//! pedestrian-pedestrian) with positional push-out; building tiles are
//! resolved by clamping the entity center to each nearby tile rectangle and
//! pushing out along the resulting normal. Pair iteration order is entity
//! list order; at tens of entities no spatial partitioning is needed.

use glam::Vec2;
use std::iter::once;

use super::events::CueKind;
use super::state::{Driver, Person, World};
use crate::consts::*;
use crate::map::{CityMap, Tile};

/// Resolve all overlaps for this sub-step
pub fn resolve(world: &mut World) {
    vehicle_vehicle(world);
    vehicle_pedestrian(world);
    pedestrian_pedestrian(world);
    buildings(world);
    settle_wrecks(world);
}

fn vehicle_vehicle(world: &mut World) {
    let mut impacts: Vec<(Vec2, f32)> = Vec::new();

    for i in 0..world.vehicles.len() {
        let (head, tail) = world.vehicles.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            let delta = b.pos - a.pos;
            let min_dist = (a.radius + b.radius) * VV_TIGHTEN;
            let dist_sq = delta.length_squared();
            if dist_sq >= min_dist * min_dist {
                continue;
            }
            let dist = dist_sq.sqrt().max(0.1);
            let normal = delta / dist;
            let overlap = min_dist - dist;
            a.pos -= normal * overlap * 0.5;
            b.pos += normal * overlap * 0.5;

            // Partially equalize speeds (inelastic approximation)
            let impact = a.speed - b.speed;
            a.speed -= impact * VV_SPEED_BLEND;
            b.speed += impact * VV_SPEED_BLEND;

            if impact.abs() > VV_IMPACT_SPEED {
                let damage = impact.abs() * VV_DAMAGE_FACTOR;
                a.health -= damage;
                b.health -= damage;
                impacts.push(((a.pos + b.pos) * 0.5, impact.abs()));
            }
        }
    }

    for (pos, intensity) in impacts {
        world.push_cue(CueKind::VehicleImpact, intensity, pos);
    }
}

fn vehicle_pedestrian(world: &mut World) {
    let mut deaths: Vec<Vec2> = Vec::new();
    let mut player_kills = 0u32;

    {
        let World {
            vehicles,
            player,
            pedestrians,
            ..
        } = world;
        for v in vehicles.iter() {
            let driver_is_player = v.driver == Some(Driver::Player);
            for ped in once(&mut *player).chain(pedestrians.iter_mut()) {
                // Occupants (including this vehicle's driver) and the dead
                // are excluded
                if !ped.is_exposed() {
                    continue;
                }
                let delta = ped.pos - v.pos;
                let min_dist = v.radius + ped.radius - VP_RADIUS_SLACK;
                let dist_sq = delta.length_squared();
                if dist_sq >= min_dist * min_dist {
                    continue;
                }
                let dist = dist_sq.sqrt().max(0.1);
                ped.pos += (delta / dist) * (min_dist - dist);

                if v.speed.abs() > VP_DAMAGE_SPEED {
                    ped.health -= v.speed.abs() * VP_DAMAGE_FACTOR;
                    ped.anger = 100.0;
                    if !ped.is_alive() {
                        deaths.push(ped.pos);
                        if driver_is_player && ped.kind == super::state::PersonKind::Npc {
                            player_kills += 1;
                        }
                    }
                }
            }
        }
    }

    for pos in deaths {
        world.spawn_blood(pos);
    }
    world.wanted = (world.wanted + player_kills as f32).min(WANTED_MAX);
}

fn pedestrian_pedestrian(world: &mut World) {
    let World {
        player,
        pedestrians,
        ..
    } = world;

    if player.is_exposed() {
        for ped in pedestrians.iter_mut() {
            if ped.is_exposed() {
                separate_people(player, ped);
            }
        }
    }

    for i in 0..pedestrians.len() {
        let (head, tail) = pedestrians.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.is_exposed() {
            continue;
        }
        for b in tail.iter_mut() {
            if b.is_exposed() {
                separate_people(a, b);
            }
        }
    }
}

/// Push two overlapping people apart, split 50/50
fn separate_people(a: &mut Person, b: &mut Person) {
    let delta = b.pos - a.pos;
    let min_dist = a.radius + b.radius;
    let dist_sq = delta.length_squared();
    if dist_sq >= min_dist * min_dist {
        return;
    }
    let dist = dist_sq.sqrt().max(0.1);
    let push = (delta / dist) * ((min_dist - dist) * 0.5);
    a.pos -= push;
    b.pos += push;
}

/// Push a circle out of any building tile in its 3x3 tile neighborhood
///
/// The test point is the entity center clamped to each tile rectangle;
/// out-of-bounds tiles are non-collidable. Returns whether anything hit.
pub fn resolve_building(map: &CityMap, pos: &mut Vec2, radius: f32) -> bool {
    let tx = (pos.x / TILE_SIZE).floor() as i32;
    let ty = (pos.y / TILE_SIZE).floor() as i32;
    let mut hit = false;

    for y in (ty - 1)..=(ty + 1) {
        for x in (tx - 1)..=(tx + 1) {
            if map.tile(x, y) != Some(Tile::Building) {
                continue;
            }
            let min = Vec2::new(x as f32 * TILE_SIZE, y as f32 * TILE_SIZE);
            let clamped = pos.clamp(min, min + Vec2::splat(TILE_SIZE));
            let delta = *pos - clamped;
            let dist_sq = delta.length_squared();
            if dist_sq < radius * radius && dist_sq > 0.0 {
                let dist = dist_sq.sqrt();
                *pos += (delta / dist) * (radius - dist);
                hit = true;
            }
        }
    }
    hit
}

fn buildings(world: &mut World) {
    let World {
        map,
        player,
        pedestrians,
        vehicles,
        ..
    } = world;

    if player.is_exposed() {
        resolve_building(map, &mut player.pos, player.radius);
    }
    for ped in pedestrians.iter_mut() {
        if ped.is_exposed() {
            resolve_building(map, &mut ped.pos, ped.radius);
        }
    }
    for v in vehicles.iter_mut() {
        let pre_speed = v.speed;
        if resolve_building(map, &mut v.pos, v.radius) {
            // Bounce: invert and damp
            v.speed *= BUILDING_BOUNCE;
            if pre_speed.abs() > BUILDING_DAMAGE_SPEED {
                v.health -= pre_speed.abs() * BUILDING_DAMAGE_FACTOR;
            }
        }
    }
}

/// Finalize vehicles whose health just reached zero
fn settle_wrecks(world: &mut World) {
    let mut events: Vec<Vec2> = Vec::new();
    let mut eject_player_from: Option<(Vec2, f32)> = None;

    for v in world.vehicles.iter_mut() {
        if v.health > 0.0 || v.wrecked {
            continue;
        }
        v.wrecked = true;
        if v.driver == Some(Driver::Player) {
            eject_player_from = Some((v.pos, v.angle));
        }
        v.driver = None;
        v.speed = 0.0;
        v.vel = Vec2::ZERO;
        events.push(v.pos);
        log::debug!("vehicle {} wrecked", v.id);
    }

    if let Some((pos, angle)) = eject_player_from {
        world.player.vehicle = None;
        world.player.pos =
            pos + crate::heading_vec(angle + std::f32::consts::FRAC_PI_2) * VEHICLE_EXIT_OFFSET;
        world.player.vel = Vec2::ZERO;
    }
    for pos in events {
        world.push_cue(CueKind::VehicleImpact, 3.0, pos);
    }
}

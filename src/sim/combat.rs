//! Combat resolution
//!
//! Fire requests pass a per-entity cooldown gate keyed by weapon, then
//! either sweep a melee cone or spawn a projectile. Projectiles advance
//! every sub-step and die on first hit or range exhaustion; both are
//! normal, silent outcomes.

use glam::Vec2;
use std::iter::once;

use super::events::CueKind;
use super::state::{EntityId, PersonKind, Projectile, World};
use crate::consts::*;
use crate::tuning::WeaponSpec;
use crate::{angle_diff, heading_vec};

/// Who is requesting the shot
#[derive(Debug, Clone, Copy)]
pub enum Shooter {
    Player,
    /// Pedestrian by current list index
    Npc(usize),
}

/// Resolve a fire request for the current weapon
///
/// Silently rejected while the weapon is still cooling down.
pub fn fire(world: &mut World, shooter: Shooter) {
    let (id, pos, angle, weapon, last_shot) = match shooter {
        Shooter::Player => {
            let p = &world.player;
            (p.id, p.pos, p.angle, p.weapon, p.last_shot)
        }
        Shooter::Npc(i) => {
            let Some(p) = world.pedestrians.get(i) else {
                return;
            };
            (p.id, p.pos, p.angle, p.weapon, p.last_shot)
        }
    };

    let spec = *world.tuning.weapon(weapon);
    if let Some(last) = last_shot
        && world.clock - last < spec.cooldown as f64
    {
        return;
    }
    match shooter {
        Shooter::Player => world.player.last_shot = Some(world.clock),
        Shooter::Npc(i) => world.pedestrians[i].last_shot = Some(world.clock),
    }

    if weapon.is_ranged() {
        let id_alloc = world.next_entity_id();
        world.projectiles.push(Projectile {
            id: id_alloc,
            owner: id,
            weapon,
            pos,
            vel: heading_vec(angle) * PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            distance: 0.0,
            max_distance: spec.range,
            explosive: spec.explosive,
        });
        world.push_cue(CueKind::ShotFired, 1.0, pos);
    } else {
        melee_sweep(
            world,
            id,
            pos,
            angle,
            &spec,
            matches!(shooter, Shooter::Player),
        );
    }
}

/// Instantaneous melee area check: everyone in range and inside the
/// forward cone takes the hit and turns on the attacker
fn melee_sweep(
    world: &mut World,
    attacker: EntityId,
    pos: Vec2,
    angle: f32,
    spec: &WeaponSpec,
    from_player: bool,
) {
    world.push_cue(CueKind::MeleeSwing, 1.0, pos);

    let mut hits = 0u64;
    let mut kills: Vec<(Vec2, PersonKind)> = Vec::new();
    {
        let World {
            player,
            pedestrians,
            ..
        } = world;
        for target in once(&mut *player).chain(pedestrians.iter_mut()) {
            if target.id == attacker || !target.is_exposed() {
                continue;
            }
            let delta = target.pos - pos;
            if delta.length() >= spec.range {
                continue;
            }
            let to_target = delta.y.atan2(delta.x);
            if angle_diff(to_target, angle).abs() >= MELEE_CONE_HALF_ANGLE {
                continue;
            }
            target.health -= spec.damage;
            target.anger = 100.0;
            target.target = Some(attacker);
            hits += 1;
            if !target.is_alive() {
                kills.push((target.pos, target.kind));
            }
        }
    }

    if from_player {
        world.score += SCORE_MELEE_HIT * hits;
    }
    for (kpos, kind) in kills {
        world.spawn_blood(kpos);
        if from_player && kind == PersonKind::Npc {
            world.wanted = (world.wanted + 1.0).min(WANTED_MAX);
        }
    }
}

/// Advance every projectile by one sub-step and resolve hits
pub fn advance_projectiles(world: &mut World, dt: f32) {
    let player_id = world.player.id;
    let mut deaths: Vec<(Vec2, PersonKind, EntityId)> = Vec::new();
    let mut player_hits = 0u64;

    {
        let World {
            projectiles,
            player,
            pedestrians,
            tuning,
            ..
        } = world;
        projectiles.retain_mut(|proj| {
            proj.pos += proj.vel * dt;
            proj.distance += PROJECTILE_SPEED * dt;

            let damage = tuning.weapon(proj.weapon).damage;
            let mut hit = false;
            for target in once(&mut *player).chain(pedestrians.iter_mut()) {
                if target.id == proj.owner || !target.is_exposed() {
                    continue;
                }
                let reach = target.radius + proj.radius;
                if target.pos.distance_squared(proj.pos) < reach * reach {
                    target.health -= damage;
                    target.anger = 100.0;
                    target.target = Some(proj.owner);
                    hit = true;
                    if proj.owner == player_id {
                        player_hits += 1;
                    }
                    if !target.is_alive() {
                        deaths.push((target.pos, target.kind, proj.owner));
                    }
                    // First intersecting target consumes the projectile
                    break;
                }
            }

            // Range exhaustion is a normal outcome, not an error
            !hit && proj.distance < proj.max_distance
        });
    }

    world.score += SCORE_RANGED_HIT * player_hits;
    for (pos, kind, killer) in deaths {
        world.spawn_blood(pos);
        if kind == PersonKind::Npc && killer == player_id {
            world.wanted = (world.wanted + 1.0).min(WANTED_MAX);
        }
    }
}

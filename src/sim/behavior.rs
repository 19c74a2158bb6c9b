//! Pedestrian AI
//!
//! A two-state loop evaluated every sub-step: wander until angered, then
//! pursue and attack whoever the grudge points at. Anger decays over time,
//! so a pedestrian that stops being provoked eventually drops its target
//! and goes back to wandering. Steering is purely local; there is no
//! pathfinding.

use rand::Rng;
use std::f32::consts::PI;

use super::combat::{self, Shooter};
use super::state::{MotionState, World};
use crate::consts::*;
use crate::heading_vec;
use crate::map::Tile;

/// Advance every pedestrian's behavior by one sub-step
pub fn step(world: &mut World, dt: f32) {
    for i in 0..world.pedestrians.len() {
        let npc = &world.pedestrians[i];
        if !npc.is_alive() || npc.vehicle.is_some() {
            continue;
        }

        let target_id = (npc.anger > ANGER_THRESHOLD)
            .then_some(npc.target)
            .flatten();
        match target_id {
            Some(tid) => {
                // Resolve the weak reference; a vanished target is simply lost
                let target_pos = world
                    .person(tid)
                    .filter(|t| t.is_alive())
                    .map(|t| t.pos);
                match target_pos {
                    Some(tp) => {
                        let npc = &mut world.pedestrians[i];
                        let delta = tp - npc.pos;
                        npc.angle = delta.y.atan2(delta.x);
                        npc.pos += heading_vec(npc.angle) * PURSUIT_SPEED * dt;
                        npc.motion = MotionState::Running;
                        if delta.length() < ENGAGE_RADIUS {
                            combat::fire(world, Shooter::Npc(i));
                        }
                    }
                    None => world.pedestrians[i].target = None,
                }
            }
            None => {
                let drift = (world.rng.random::<f32>() - 0.5) * WANDER_DRIFT * dt;
                let npc = &mut world.pedestrians[i];
                npc.angle += drift;
                npc.pos += heading_vec(npc.angle) * WANDER_SPEED * dt;
                npc.motion = MotionState::Walking;
                // Wandering pedestrians stay off the roads
                if world.map.tile_at(npc.pos) == Some(Tile::Road) {
                    npc.angle += PI;
                }
            }
        }

        // De-escalation: grudges expire unless refreshed by new damage
        let npc = &mut world.pedestrians[i];
        if npc.anger > 0.0 {
            npc.anger = (npc.anger - ANGER_DECAY * dt).max(0.0);
            if npc.anger <= ANGER_THRESHOLD {
                npc.target = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Person;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn quiet_world() -> World {
        let mut world = World::new(31, Tuning::default());
        world.pedestrians.clear();
        for v in &mut world.vehicles {
            v.driver = None;
            v.speed = 0.0;
            v.pos = Vec2::new(-100_000.0, -100_000.0);
        }
        world
    }

    fn add_npc(world: &mut World, pos: Vec2) -> usize {
        let id = world.next_entity_id();
        world.pedestrians.push(Person::new_npc(id, pos, 0.0, 0.0));
        world.pedestrians.len() - 1
    }

    #[test]
    fn test_wander_moves_and_drifts() {
        let mut world = quiet_world();
        let ppos = world.player.pos;
        let i = add_npc(&mut world, ppos + Vec2::new(300.0, 0.0));
        let start = world.pedestrians[i].pos;
        step(&mut world, 1.0);
        let moved = world.pedestrians[i].pos.distance(start);
        assert!((moved - WANDER_SPEED).abs() < 0.01);
        assert_eq!(world.pedestrians[i].motion, MotionState::Walking);
    }

    #[test]
    fn test_angry_npc_pursues_player() {
        let mut world = quiet_world();
        let ppos = world.player.pos;
        let i = add_npc(&mut world, ppos + Vec2::new(600.0, 0.0));
        world.pedestrians[i].anger = 100.0;
        world.pedestrians[i].target = Some(world.player.id);

        step(&mut world, 1.0);
        let npc = &world.pedestrians[i];
        // Facing west toward the player and closing at pursuit speed
        assert!((npc.angle.abs() - PI).abs() < 0.01);
        assert!(npc.pos.x < world.player.pos.x + 600.0);
        assert_eq!(npc.motion, MotionState::Running);
    }

    #[test]
    fn test_pursuer_fires_inside_engagement_radius() {
        let mut world = quiet_world();
        let ppos = world.player.pos;
        let near = add_npc(&mut world, ppos + Vec2::new(300.0, 0.0));
        let far = add_npc(&mut world, ppos + Vec2::new(2000.0, 0.0));
        for i in [near, far] {
            world.pedestrians[i].anger = 100.0;
            world.pedestrians[i].target = Some(world.player.id);
        }

        step(&mut world, 1.0);
        // Only the near NPC is inside the engagement radius
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.projectiles[0].owner, world.pedestrians[near].id);
    }

    #[test]
    fn test_lost_target_reverts_to_wander() {
        let mut world = quiet_world();
        let ppos = world.player.pos;
        let i = add_npc(&mut world, ppos + Vec2::new(300.0, 0.0));
        world.pedestrians[i].anger = 100.0;
        world.pedestrians[i].target = Some(0xdead_beef);

        step(&mut world, 1.0);
        assert_eq!(world.pedestrians[i].target, None);
    }

    #[test]
    fn test_anger_decays_to_deescalation() {
        let mut world = quiet_world();
        let ppos = world.player.pos;
        let i = add_npc(&mut world, ppos + Vec2::new(300.0, 0.0));
        world.pedestrians[i].anger = ANGER_THRESHOLD + 1.0;
        world.pedestrians[i].target = Some(world.player.id);

        // Enough sub-steps for anger to cross back under the threshold
        let steps = (2.0 / ANGER_DECAY) as usize;
        for _ in 0..steps {
            step(&mut world, 1.0);
        }
        let npc = &world.pedestrians[i];
        assert!(npc.anger <= ANGER_THRESHOLD);
        assert_eq!(npc.target, None);
    }

    #[test]
    fn test_dead_npcs_do_not_act() {
        let mut world = quiet_world();
        let ppos = world.player.pos;
        let i = add_npc(&mut world, ppos + Vec2::new(300.0, 0.0));
        world.pedestrians[i].health = 0.0;
        let pos = world.pedestrians[i].pos;
        step(&mut world, 1.0);
        assert_eq!(world.pedestrians[i].pos, pos);
    }
}

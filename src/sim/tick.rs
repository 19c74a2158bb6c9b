//! Fixed sub-step simulation scheduler
//!
//! One tick corresponds to one rendered frame. The frame delta is capped
//! and split into a fixed number of equal sub-steps; each sub-step runs the
//! resolver stages in a strict order:
//!
//! controls -> movement -> collision -> combat -> NPC behavior -> cleanup
//!
//! The cap plus sub-stepping is the engine's defense against tunneling and
//! instability under variable frame rates, and must hold for any host.

use super::state::{MotionState, World};
use super::{behavior, collision, combat, input, movement};
use crate::consts::*;

pub use super::input::TickInput;

/// Advance the world by one tick of `frame_dt` frame units
///
/// A frame unit is one nominal 60 Hz frame, so a steady host passes 1.0.
/// Once the player is dead this is a no-op until an external
/// [`World::reset`] request.
pub fn advance(world: &mut World, input: &TickInput, frame_dt: f32) {
    if world.is_game_over() {
        return;
    }

    let dt = frame_dt.clamp(0.0, MAX_FRAME_DELTA);
    input::apply_one_shots(world, input);
    let intents = input::resolve(input);

    let sub_dt = dt / SUB_STEPS as f32;
    for _ in 0..SUB_STEPS {
        if world.is_game_over() {
            break;
        }
        step(world, &intents, sub_dt);
    }
}

/// One physics sub-step in the documented stage order
fn step(world: &mut World, intents: &input::Intents, dt: f32) {
    movement::step(world, intents, dt);
    collision::resolve(world);

    // Player fire path; NPCs fire from their behavior stage
    if intents.fire
        && world.player.is_exposed()
        && world.player.motion != MotionState::Rolling
    {
        combat::fire(world, combat::Shooter::Player);
    }
    combat::advance_projectiles(world, dt);

    behavior::step(world, dt);
    cleanup(world, dt);
}

/// Lifecycle end-of-step pass: reap the dead, fade effects, regen, clock
fn cleanup(world: &mut World, dt: f32) {
    // Dead pedestrians leave the world and score exactly once
    let before = world.pedestrians.len();
    world.pedestrians.retain(|p| p.is_alive());
    let removed = (before - world.pedestrians.len()) as u64;
    if removed > 0 {
        world.score += SCORE_KILL * removed;
        log::debug!("{removed} pedestrians removed, score {}", world.score);
    }

    // Blood holds, then fades out
    let clock = world.clock;
    world.blood.retain_mut(|b| {
        if clock - b.spawned > BLOOD_HOLD {
            b.alpha -= BLOOD_FADE * dt;
        }
        b.alpha > 0.0
    });

    // Stamina regen, clamped
    let regen = world.tuning.stamina_regen * dt;
    world.player.stamina = (world.player.stamina + regen).min(100.0);
    for ped in world.pedestrians.iter_mut() {
        ped.stamina = (ped.stamina + regen).min(100.0);
    }

    world.wanted = (world.wanted - WANTED_DECAY * dt).max(0.0);
    world.clock += dt as f64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Person;
    use crate::tuning::{Tuning, WeaponKind};
    use glam::Vec2;

    fn clear_population(world: &mut World) {
        world.pedestrians.clear();
        for v in &mut world.vehicles {
            v.driver = None;
            v.speed = 0.0;
            v.pos = Vec2::new(-100_000.0, -100_000.0);
        }
    }

    #[test]
    fn test_substep_equivalence() {
        // One tick of dt=1 split into 4 sub-steps must equal 4 sequential
        // sub-steps of dt=0.25 under identical inputs
        let input = TickInput {
            move_x: 1,
            ..Default::default()
        };
        let mut a = World::new(77, Tuning::default());
        let mut b = World::new(77, Tuning::default());

        advance(&mut a, &input, 1.0);

        input::apply_one_shots(&mut b, &input);
        let intents = input::resolve(&input);
        for _ in 0..4 {
            step(&mut b, &intents, 0.25);
        }

        assert!((a.player.pos - b.player.pos).length() < 1e-4);
        assert_eq!(a.pedestrians.len(), b.pedestrians.len());
        for (pa, pb) in a.pedestrians.iter().zip(&b.pedestrians) {
            assert!((pa.pos - pb.pos).length() < 1e-4);
        }
        for (va, vb) in a.vehicles.iter().zip(&b.vehicles) {
            assert!((va.pos - vb.pos).length() < 1e-4);
        }
    }

    #[test]
    fn test_frame_delta_is_capped() {
        let mut a = World::new(13, Tuning::default());
        let mut b = World::new(13, Tuning::default());
        let input = TickInput::default();
        // A huge hitch behaves exactly like the cap
        advance(&mut a, &input, 50.0);
        advance(&mut b, &input, MAX_FRAME_DELTA);
        assert_eq!(a.clock, b.clock);
        for (pa, pb) in a.pedestrians.iter().zip(&b.pedestrians) {
            assert!((pa.pos - pb.pos).length() < 1e-4);
        }
    }

    #[test]
    fn test_identical_runs_are_deterministic() {
        let input = TickInput {
            move_x: 1,
            move_y: 1,
            fire_held: true,
            ..Default::default()
        };
        let mut a = World::new(555, Tuning::default());
        let mut b = World::new(555, Tuning::default());
        for _ in 0..120 {
            advance(&mut a, &input, 1.0);
            advance(&mut b, &input, 1.0);
        }
        assert_eq!(a.clock, b.clock);
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.pedestrians.len(), b.pedestrians.len());
    }

    #[test]
    fn test_dead_npc_scores_once_and_leaves() {
        let mut world = World::new(3, Tuning::default());
        clear_population(&mut world);
        let id = world.next_entity_id();
        let pos = world.player.pos + Vec2::new(40.0, 0.0);
        world.pedestrians.push(Person::new_npc(id, pos, 0.0, 0.0));
        world.pedestrians[0].health = 10.0;
        world.player.angle = 0.0;

        let punch = TickInput {
            fire_held: true,
            ..Default::default()
        };
        advance(&mut world, &punch, 1.0);
        assert!(world.pedestrians.is_empty());
        assert_eq!(world.score, SCORE_MELEE_HIT + SCORE_KILL);
        assert_eq!(world.blood.len(), 1);

        // Nothing left to score on the next tick
        let score = world.score;
        advance(&mut world, &punch, 1.0);
        assert_eq!(world.score, score);
    }

    #[test]
    fn test_stamina_clamp() {
        let mut world = World::new(9, Tuning::default());
        clear_population(&mut world);
        world.player.stamina = 99.9;
        for _ in 0..100 {
            advance(&mut world, &TickInput::default(), 1.0);
        }
        assert!(world.player.stamina <= 100.0);
    }

    #[test]
    fn test_player_death_freezes_simulation() {
        let mut world = World::new(17, Tuning::default());
        world.player.health = 0.0;
        let clock = world.clock;
        let ped_pos: Vec<Vec2> = world.pedestrians.iter().map(|p| p.pos).collect();

        advance(
            &mut world,
            &TickInput {
                move_x: 1,
                fire_held: true,
                ..Default::default()
            },
            1.0,
        );
        assert_eq!(world.clock, clock);
        for (p, pos) in world.pedestrians.iter().zip(&ped_pos) {
            assert_eq!(p.pos, *pos);
        }
    }

    #[test]
    fn test_respawn_reset() {
        let mut world = World::new(23, Tuning::default());
        // Make a mess: damage, score, projectiles, blood
        world.player.weapon = WeaponKind::Pistol;
        for _ in 0..30 {
            advance(
                &mut world,
                &TickInput {
                    fire_held: true,
                    move_x: 1,
                    ..Default::default()
                },
                1.0,
            );
        }
        world.score += 100;
        world.spawn_blood(world.player.pos);
        world.player.health = 0.0;

        world.reset();
        let snap = world.snapshot();
        assert_eq!(snap.health, 100.0);
        assert_eq!(snap.stamina, 100.0);
        assert_eq!(snap.score, 0);
        assert!(world.projectiles.is_empty());
        assert!(world.blood.is_empty());
        assert_eq!(world.clock, 0.0);
        assert_eq!(world.pedestrians.len(), PEDESTRIAN_COUNT);
    }

    #[test]
    fn test_blood_eventually_fades() {
        let mut world = World::new(29, Tuning::default());
        clear_population(&mut world);
        world.spawn_blood(world.player.pos);
        // Hold period plus fade-out: 600 + 0.8/0.005 = 760 frame units
        for _ in 0..800 {
            advance(&mut world, &TickInput::default(), 1.0);
        }
        assert!(world.blood.is_empty());
    }

    #[test]
    fn test_snapshot_reflects_vehicle_state() {
        let mut world = World::new(41, Tuning::default());
        clear_population(&mut world);
        world.vehicles[0].pos = world.player.pos + Vec2::new(50.0, 0.0);
        world.vehicles[0].speed = 0.0;

        advance(
            &mut world,
            &TickInput {
                enter_vehicle_pressed: true,
                ..Default::default()
            },
            1.0,
        );
        let snap = world.snapshot();
        assert_eq!(snap.vehicle, Some(world.vehicles[0].id));
        assert!(snap.vehicle_speed.is_some());

        // Drive forward: speed shows up in the snapshot
        advance(
            &mut world,
            &TickInput {
                move_y: -1,
                ..Default::default()
            },
            1.0,
        );
        assert!(world.snapshot().vehicle_speed.unwrap() > 0.0);
    }

    #[test]
    fn test_wanted_rises_and_decays() {
        let mut world = World::new(47, Tuning::default());
        clear_population(&mut world);
        let id = world.next_entity_id();
        let pos = world.player.pos + Vec2::new(40.0, 0.0);
        world.pedestrians.push(Person::new_npc(id, pos, 0.0, 0.0));
        world.pedestrians[0].health = 5.0;
        world.player.angle = 0.0;

        advance(
            &mut world,
            &TickInput {
                fire_held: true,
                ..Default::default()
            },
            1.0,
        );
        assert!(world.wanted > 0.9);

        let wanted = world.wanted;
        for _ in 0..60 {
            advance(&mut world, &TickInput::default(), 1.0);
        }
        assert!(world.wanted < wanted);
    }

    #[test]
    fn test_cues_drain_once() {
        let mut world = World::new(53, Tuning::default());
        clear_population(&mut world);
        world.player.weapon = WeaponKind::Pistol;
        advance(
            &mut world,
            &TickInput {
                fire_held: true,
                ..Default::default()
            },
            1.0,
        );
        let cues = world.take_cues();
        assert!(!cues.is_empty());
        assert!(world.take_cues().is_empty());
    }
}

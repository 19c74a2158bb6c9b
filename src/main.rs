//! Headless demo runner
//!
//! Drives the simulation with a scripted input loop and logs snapshots, for
//! smoke-testing balance changes without a presentation host. Usage:
//!
//! ```text
//! gridlock [seed] [frames]
//! ```
//!
//! Set `GRIDLOCK_TUNING` to a JSON file path to override balance values.

use gridlock::sim::{TickInput, World, advance};
use gridlock::tuning::Tuning;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC1717);
    let frames: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);

    let tuning = match std::env::var_os("GRIDLOCK_TUNING") {
        Some(path) => Tuning::load_or_default(std::path::Path::new(&path)),
        None => Tuning::default(),
    };

    let mut world = World::new(seed, tuning);
    log::info!("running {frames} frames with seed {seed}");

    for frame in 0..frames {
        // Scripted drive: jog east, swing every couple of seconds
        let input = TickInput {
            move_x: 1,
            fire_held: frame % 120 < 10,
            ..Default::default()
        };
        advance(&mut world, &input, 1.0);

        for cue in world.take_cues() {
            log::debug!("cue {:?} x{:.1}", cue.kind, cue.intensity);
        }
        if frame % 60 == 0 {
            let snap = world.snapshot();
            log::info!(
                "t={:.0} pos=({:.0},{:.0}) hp={:.0} score={} wanted={:.1}",
                snap.clock,
                snap.pos.x,
                snap.pos.y,
                snap.health,
                snap.score,
                snap.wanted
            );
        }
        if world.is_game_over() {
            log::info!("wasted at frame {frame}, resetting");
            world.reset();
        }
    }

    match serde_json::to_string_pretty(&world.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("snapshot serialization failed: {e}"),
    }
}

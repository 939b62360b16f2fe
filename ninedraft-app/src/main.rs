//! A headless demo driver for Ninedraft, a 2d sandbox game. It runs the
//! scripted session of a wandering player at a fixed cadence and logs what
//! happens, standing in for the interactive frontend.

pub mod config;
pub mod draw;
pub mod game;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glam::Vec2;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::draw::WorldViewRouter;
use crate::game::Ninedraft;


fn main() {

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let running = Arc::new(AtomicBool::new(true));
    let running_handler = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || running_handler.store(false, Ordering::Relaxed)) {
        error!("failed to set the interrupt handler: {e}");
        return;
    }

    let mut game = match Ninedraft::new(config::seed()) {
        Ok(game) => game,
        Err(e) => {
            error!("failed to start the game: {e}");
            return;
        }
    };

    let router = WorldViewRouter::default();
    let cadence = Duration::from_millis(config::cadence_ms());
    let steps = config::steps();
    info!("running {steps} steps at {:?} cadence", cadence);

    for step in 0..steps {

        if !running.load(Ordering::Relaxed) {
            info!("interrupted at step {step}");
            break;
        }

        // A little scripted session: wander right, hop now and then, and
        // keep swinging at whatever sits below and ahead of the player.
        game.move_player(1.0, 0.0);
        if step % 40 == 0 {
            game.jump();
        }
        let player_position = game.world().iter_things()
                .find_map(|(_, thing, bb)| thing.as_player().map(|_| bb.center()));
        if let Some(position) = player_position {
            game.mouse_move(position + Vec2::new(40.0, 30.0));
        }
        if game.target_in_range() {
            if let Err(e) = game.left_click() {
                error!("left click failed: {e}");
                break;
            }
        }

        game.step();

        if game.is_dead() {
            info!("the player died at step {step}");
            break;
        }

        thread::sleep(cadence);

    }

    match game.render(&router) {
        Ok(commands) => info!("final scene holds {} draw commands", commands.len()),
        Err(e) => error!("rendering failed: {e}"),
    }

    if let Some(player) = game.player() {
        info!(
            "done; {} ended on {} health and {} food",
            player.name, player.health.value, player.food.value,
        );
    }

}

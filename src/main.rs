//! Bricker entry point
//!
//! Runs the simulation headless: the autopilot steers the paddle and a
//! scripted prompt decides whether to play again.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use bricker::consts::SIM_DT;
use bricker::platform::{Autopilot, ScriptedPrompt};
use bricker::sim::GameState;
use bricker::{Session, SessionStatus, Settings};

#[derive(Parser, Debug)]
#[command(about = "Brick-breaking arcade core, played by an autopilot", version)]
struct Args {
    /// `rows columns` of bricks; any other count keeps the 7x8 default
    #[arg(num_args = 0.., allow_negative_numbers = true)]
    board: Vec<String>,
    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frames to simulate before giving up (60 per second)
    #[arg(long, default_value_t = 60 * 60 * 10)]
    max_frames: u64,
    /// Rounds to replay after the first one ends
    #[arg(long, default_value_t = 0)]
    replays: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let mut settings = settings.with_dimension_args(&args.board)?;
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    settings.validate()?;
    let seed = settings.seed.unwrap_or_else(rand::random);

    log::info!("Bricker (headless) starting...");
    let state = GameState::new(settings, seed)?;
    let mut session = Session::new(state, ScriptedPrompt::new(args.replays));
    let autopilot = Autopilot::default();

    let mut frames = 0;
    while frames < args.max_frames {
        let input = autopilot.sample(session.state());
        frames += 1;
        match session.frame(&input, SIM_DT) {
            SessionStatus::Running => {}
            SessionStatus::Restarted => log::info!("New round after {frames} frames"),
            SessionStatus::Terminated => break,
        }
    }

    let state = session.state();
    log::info!(
        "Stopped after {frames} frames: {} rounds finished, phase {:?}, lives {}, bricks left {}",
        session.rounds_finished(),
        state.round.phase(),
        state.round.lives(),
        state.round.active_bricks()
    );
    Ok(())
}

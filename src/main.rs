//! Arcade Shooter headless entry point
//!
//! Drives a session with simulated frame timestamps and the autopilot,
//! printing the text renderer's output every few frames.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use arcade_shooter::autopilot::Autopilot;
use arcade_shooter::platform::{AssetLoader, DirAssets, MemoryAssets};
use arcade_shooter::renderer::TextRenderer;
use arcade_shooter::sim::GameEvent;
use arcade_shooter::{Game, GameError, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(name = "arcade-shooter")]
#[command(about = "Run a headless arcade shooter session with the autopilot", long_about = None)]
struct Args {
    /// Run seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frame callbacks to simulate
    #[arg(long, default_value_t = 1800)]
    frames: u32,

    /// Simulated display refresh rate
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Tuning JSON file (missing fields use defaults)
    #[arg(long, value_name = "JSON")]
    tuning: Option<PathBuf>,

    /// Settings JSON file
    #[arg(long, value_name = "JSON")]
    settings: Option<PathBuf>,

    /// Directory holding `<name>.png` images (placeholders if omitted)
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Print every Nth frame (0 prints only the last one)
    #[arg(long, default_value_t = 60)]
    render_every: u32,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), GameError> {
    let mut settings = match &args.settings {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    let tuning = match &args.tuning {
        Some(path) => Tuning::from_json_file(path)?,
        None => Tuning::default(),
    };

    let mut loader: Box<dyn AssetLoader> = match &args.assets {
        Some(dir) => Box::new(DirAssets::new(dir)),
        None => Box::new(MemoryAssets::placeholders()),
    };
    let mut game = Game::start(&settings, tuning, loader.as_mut())?;

    let mut renderer = TextRenderer::from_settings(&settings);
    let mut pilot = Autopilot::new();
    let frame_ms = 1000.0 / args.fps.max(1.0);
    let mut steps = 0u64;
    let mut kills = 0u64;

    for frame in 0..args.frames {
        let keys = pilot.next_keys(game.state());
        steps += u64::from(game.frame(frame as f64 * frame_ms, &keys, &mut renderer));

        for event in game.events() {
            match event {
                GameEvent::EnemyDestroyed { .. } => kills += 1,
                GameEvent::GameOver { score } => {
                    println!("Game over at frame {frame}: score {score}")
                }
                _ => {}
            }
        }

        let last = frame + 1 == args.frames;
        if last || (args.render_every > 0 && frame % args.render_every == 0) {
            println!("{}", renderer.frame());
        }
    }

    log::info!(
        "Ran {} frames, {} steps, {} kills, final score {}",
        args.frames,
        steps,
        kills,
        game.state().score
    );
    for (rank, entry) in game.high_scores().entries.iter().enumerate() {
        println!(
            "#{:<2} {:>6}  ({:.1}s, seed {})",
            rank + 1,
            entry.score,
            entry.time_ms / 1000.0,
            entry.seed
        );
    }
    Ok(())
}

//! Paddle Catch headless demo
//!
//! Plays one round with the autopilot and logs the status relay.
//!
//! Usage: `paddle-catch [fall_speed] [spawn_frequency] [paddle_speed] [round_duration]`
//! (defaults `20 1 10 5`). Set `PADDLE_CATCH_CONFIG` to a JSON file to
//! override the board geometry and intervals; `RUST_LOG` controls logging.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result, bail};

use paddle_catch::settings::GameSettingsForm;
use paddle_catch::sim::{KeyQueue, RoundPhase, autopilot};
use paddle_catch::{BoardConfig, Game};

const DEFAULTS: [&str; 4] = ["20", "1", "10", "5"];
const CONFIG_ENV: &str = "PADDLE_CATCH_CONFIG";

fn load_config() -> Result<BoardConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path))?;
            let config = BoardConfig::from_json(&json)
                .with_context(|| format!("parsing {}", path))?;
            log::info!("Loaded board config from {}", path);
            Ok(config)
        }
        Err(_) => Ok(BoardConfig::default()),
    }
}

fn settings_form(args: &[String]) -> Result<GameSettingsForm> {
    if args.len() > 4 {
        bail!("expected at most 4 settings, got {}", args.len());
    }
    let arg = |i: usize| Some(args.get(i).cloned().unwrap_or_else(|| DEFAULTS[i].to_string()));
    Ok(GameSettingsForm {
        fall_speed: arg(0),
        spawn_frequency: arg(1),
        paddle_speed: arg(2),
        round_duration: arg(3),
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let form = settings_form(&args)?;
    let config = load_config()?;

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let keys = KeyQueue::new();
    let mut game = Game::new(config, seed, keys.clone())?;

    let status = game.status().subscribe(|snapshot| {
        if let Some(s) = snapshot {
            log::info!("caught {} | {}s left", s.caught_objects, s.time_remaining);
        }
    });

    let finished = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&finished);
    let results = game.final_score().subscribe(move |score| {
        if score.is_some() {
            *sink.borrow_mut() = *score;
        }
    });

    if !game.submit_form(&form).context("invalid settings")? {
        bail!("all four settings are required");
    }

    let tick_ms = config.tick_interval_ms;
    while game.phase().get() == RoundPhase::Running {
        let key = game
            .objects()
            .with(|objects| autopilot::steer(game.player_x().get(), objects, game.board()));
        if let Some(key) = key {
            keys.press(game.now_ms(), key);
        }
        game.advance(tick_ms);
    }

    status.unsubscribe();
    results.unsubscribe();

    match *finished.borrow() {
        Some(score) => println!("Round over: caught {} objects", score),
        None => println!("Round ended without a result"),
    }
    Ok(())
}

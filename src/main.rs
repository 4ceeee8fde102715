#[cfg(not(target_arch = "wasm32"))]
use std::fs;

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{anyhow, bail, Context, Result};
#[cfg(not(target_arch = "wasm32"))]
use rand::Rng;

#[cfg(not(target_arch = "wasm32"))]
use precision_cube::{
    run_headless, Game, GameConfig, HeadlessEvent, HeadlessOptions, Hud, KeyCode, TextSlot,
};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<()> {
    let options = CliOptions::parse_from(std::env::args().skip(1))?;
    let config = options.game_config()?;
    let mut game = match options.seed {
        Some(seed) => Game::seeded(config, seed),
        None => Game::from_entropy(config),
    }
    .context("invalid game configuration")?;
    let mut hud = Hud::in_memory();

    if options.headless {
        return run_headless_session(&mut game, &mut hud, &options);
    }

    match precision_cube::app::run_windowed(&mut game, &mut hud) {
        Ok(()) => {
            print_final_state(&game);
            Ok(())
        }
        Err(err) if err.downcast_ref::<precision_cube::app::WindowInitError>().is_some() => {
            eprintln!("{err}. Falling back to --headless mode (set DISPLAY to enable rendering).");
            run_headless_session(&mut game, &mut hud, &options)
        }
        Err(err) => Err(err),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run_headless_session<R: Rng>(
    game: &mut Game<R>,
    hud: &mut Hud<TextSlot>,
    options: &CliOptions,
) -> Result<()> {
    let report = run_headless(game, hud, &options.headless_options(), |event| match event {
        HeadlessEvent::RoundStarted { round } => println!("Round {round} started"),
        HeadlessEvent::Scored { frame, score } => {
            println!("Target matched on frame {frame}. Score: {score}")
        }
        HeadlessEvent::TimedOut { frame, final_score } => {
            println!("Round over after {frame} frames. Final score: {final_score}")
        }
    });

    if report.final_score.is_none() {
        println!(
            "Stopped after {} frames ({:.2}s). Score: {}",
            report.frames_run, report.elapsed, report.score
        );
    }
    print_final_state(game);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn print_final_state<R>(game: &Game<R>) {
    print!("{}", final_state(game));
}

#[cfg(not(target_arch = "wasm32"))]
fn final_state<R>(game: &Game<R>) -> String {
    let cube = game.cube();
    let rotation = cube.euler_angles();
    let target = game.target();
    format!(
        "Final cube pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})\n\
         Target pos=({:.2}, {:.2}, {:.2}) size=({:.2}, {:.2}, {:.2})\n",
        cube.position.x,
        cube.position.y,
        cube.position.z,
        rotation.x,
        rotation.y,
        rotation.z,
        cube.scale.x,
        cube.scale.y,
        cube.scale.z,
        target.position.x,
        target.position.y,
        target.position.z,
        target.size.x,
        target.size.y,
        target.size.z
    )
}

#[cfg(not(target_arch = "wasm32"))]
const USAGE: &str = "Usage: precision-cube [--config <file.xml>] [--free-play] \
[--time-budget <secs>] [--seed <u64>] [--headless] [--frames <n>] \
[--frame-rate <hz>] [--hold <key>]...";

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    config_path: Option<String>,
    free_play: bool,
    time_budget: Option<f64>,
    seed: Option<u64>,
    headless: bool,
    frames: Option<u32>,
    frame_rate: Option<f64>,
    held_keys: Vec<KeyCode>,
}

#[cfg(not(target_arch = "wasm32"))]
impl CliOptions {
    fn parse_from<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => options.config_path = Some(value_for(&arg, args.next())?),
                "--free-play" => options.free_play = true,
                "--time-budget" => {
                    options.time_budget = Some(parse_number(&arg, args.next())?);
                }
                "--seed" => options.seed = Some(parse_number(&arg, args.next())?),
                "--headless" => options.headless = true,
                "--frames" => options.frames = Some(parse_number(&arg, args.next())?),
                "--frame-rate" => {
                    let rate: f64 = parse_number(&arg, args.next())?;
                    if !(rate.is_finite() && rate > 0.0) {
                        bail!("--frame-rate must be positive, got {rate}");
                    }
                    options.frame_rate = Some(rate);
                }
                "--hold" => {
                    let name = value_for(&arg, args.next())?;
                    let key = KeyCode::from_name(&name)
                        .ok_or_else(|| anyhow!("Unknown key name for --hold: {name}"))?;
                    options.held_keys.push(key);
                }
                "-h" | "--help" => bail!("{USAGE}"),
                other => bail!("Unknown argument: {other}. {USAGE}"),
            }
        }
        Ok(options)
    }

    /// Defaults, then the config file, then command-line overrides.
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config_path {
            Some(path) => {
                let xml = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {path}"))?;
                GameConfig::from_xml(&xml)
                    .with_context(|| format!("failed to parse config {path}"))?
            }
            None => GameConfig::default(),
        };
        if self.free_play {
            config.enable_timer = false;
        }
        if let Some(budget) = self.time_budget {
            config.time_budget = budget;
        }
        config.validate().context("invalid game configuration")?;
        Ok(config)
    }

    fn headless_options(&self) -> HeadlessOptions {
        let defaults = HeadlessOptions::default();
        HeadlessOptions {
            frames: self.frames.unwrap_or(defaults.frames),
            frame_rate: self.frame_rate.unwrap_or(defaults.frame_rate),
            held_keys: self.held_keys.clone(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn value_for(flag: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| anyhow!("{flag} expects a value. {USAGE}"))
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T> {
    let value = value_for(flag, value)?;
    value
        .parse()
        .map_err(|_| anyhow!("invalid value for {flag}: {value}"))
}

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hmm_localizer::simulation::{
    metrics::EpisodeStats,
    params::{DEFAULT_ERROR_RATE, HEADLESS_STEPS, TICK_MILLIS},
    Agent, Direction, GridTopology, LocalizationError,
};
use hmm_localizer::ui::{
    field::{compute_belief_grid, overlay_agent},
    render::draw_ui,
};

const HELP: &str = "arrows: move | space: stay | a: autopilot | r: reset belief | q: quit";

#[derive(Parser)]
#[command(name = "hmm-localizer")]
#[command(author, version, about = "Locate an agent in a grid maze from noisy wall sensors", long_about = None)]
struct Cli {
    /// Probability that each wall sensor reports the wrong value
    #[arg(short, long, default_value_t = DEFAULT_ERROR_RATE)]
    error_rate: f64,

    /// Seed for sensor noise and the autopilot walk
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run a scripted random walk and print summary statistics
    #[arg(long)]
    headless: bool,

    /// Number of steps in headless mode
    #[arg(long, default_value_t = HEADLESS_STEPS)]
    steps: u64,

    /// Print the headless summary as JSON
    #[arg(long, requires = "headless")]
    json: bool,

    /// Milliseconds between autopilot steps
    #[arg(long, default_value_t = TICK_MILLIS)]
    tick_ms: u64,
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    error_rate: f64,
    localization_rate: f64,
    mean_probability_at_truth: f64,
    #[serde(flatten)]
    stats: EpisodeStats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // Log output would tear the alternate screen, so the viewer stays quiet.
    init_tracing(if cli.headless { "info" } else { "off" });

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    let agent = Agent::seeded(cli.error_rate, GridTopology::reference_maze()?, seed)?;
    let walk = StdRng::seed_from_u64(seed.wrapping_add(1));

    if cli.headless {
        return run_headless(&cli, agent, walk, seed);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut viewer = Viewer::new(agent, walk);
    let res = run_app(&mut terminal, &mut viewer, Duration::from_millis(cli.tick_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn random_direction(walk: &mut StdRng) -> Direction {
    Direction::ALL[walk.random_range(0..Direction::ALL.len())]
}

/// Advances the agent one step and folds the outcome into `stats`.
///
/// A degenerate percept resets the belief to uniform.
fn advance(
    agent: &mut Agent,
    direction: Option<Direction>,
    stats: &mut EpisodeStats,
) -> std::result::Result<(), LocalizationError> {
    let before = agent.true_position();
    let outcome = agent.step(direction).map(|_| ());
    if direction.is_some() && agent.true_position() == before {
        stats.record_bump();
    }
    match outcome {
        Ok(()) => {}
        Err(LocalizationError::DegenerateBelief) => {
            info!(time = agent.time(), "degenerate percept, resetting belief");
            stats.record_degenerate();
            agent.reset_belief();
        }
        Err(err) => return Err(err),
    }

    let position = agent.true_position();
    let tracker = agent.tracker();
    stats.record(
        position,
        tracker.most_likely_coordinate(),
        tracker.probability_at(position).unwrap_or(0.0),
        tracker.state().entropy(),
    );
    Ok(())
}

fn run_headless(cli: &Cli, mut agent: Agent, mut walk: StdRng, seed: u64) -> Result<()> {
    info!(seed, error_rate = cli.error_rate, steps = cli.steps, "starting headless run");
    let mut stats = EpisodeStats::new();
    for _ in 0..cli.steps {
        let direction = random_direction(&mut walk);
        advance(&mut agent, Some(direction), &mut stats)?;
    }

    let summary = RunSummary {
        seed,
        error_rate: cli.error_rate,
        localization_rate: stats.localization_rate(),
        mean_probability_at_truth: stats.mean_probability_at_truth(),
        stats,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("seed:                      {}", summary.seed);
        println!("error rate:                {:.2}", summary.error_rate);
        println!("steps:                     {}", summary.stats.steps);
        println!("localization rate:         {:.3}", summary.localization_rate);
        println!("mean P(true position):     {:.3}", summary.mean_probability_at_truth);
        println!("bumps:                     {}", summary.stats.bumps);
        println!("degenerate observations:   {}", summary.stats.degenerate_observations);
        println!("final entropy (bits):      {:.3}", summary.stats.final_entropy);
    }
    Ok(())
}

/// Interactive viewer state.
struct Viewer {
    agent: Agent,
    walk: StdRng,
    stats: EpisodeStats,
    autopilot: bool,
}

impl Viewer {
    fn new(agent: Agent, walk: StdRng) -> Self {
        Self {
            agent,
            walk,
            stats: EpisodeStats::new(),
            autopilot: false,
        }
    }

    fn step(&mut self, direction: Option<Direction>) -> Result<()> {
        advance(&mut self.agent, direction, &mut self.stats)?;
        Ok(())
    }

    fn hud(&self) -> String {
        let tracker = self.agent.tracker();
        let position = self.agent.true_position();
        let estimate = tracker
            .most_likely_coordinate()
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        let percept = self
            .agent
            .last_percept()
            .map_or_else(|| "....".to_string(), |p| p.to_string());
        format!(
            "t={} | pos={} | est={} | P(pos)={:.3} | percept={} | err={:.2} | H={:.2} | hits={}/{} | resets={}",
            self.agent.time(),
            position,
            estimate,
            tracker.probability_at(position).unwrap_or(0.0),
            percept,
            self.agent.error_rate(),
            tracker.state().entropy(),
            self.stats.localized_steps,
            self.stats.steps,
            self.stats.degenerate_observations,
        )
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    viewer: &mut Viewer,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        // 1. Update
        if viewer.autopilot && last_tick.elapsed() >= tick_rate {
            let direction = random_direction(&mut viewer.walk);
            viewer.step(Some(direction))?;
            last_tick = Instant::now();
        }

        // 2. Render
        terminal.draw(|f| {
            let mut grid = compute_belief_grid(viewer.agent.topology(), viewer.agent.tracker().state());
            overlay_agent(&mut grid, viewer.agent.true_position());
            draw_ui(f, &grid, &viewer.hud(), HELP);
        })?;

        // 3. Input
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Up => viewer.step(Some(Direction::North))?,
                    KeyCode::Down => viewer.step(Some(Direction::South))?,
                    KeyCode::Right => viewer.step(Some(Direction::East))?,
                    KeyCode::Left => viewer.step(Some(Direction::West))?,
                    KeyCode::Char(' ') => viewer.step(None)?,
                    KeyCode::Char('a') => viewer.autopilot = !viewer.autopilot,
                    KeyCode::Char('r') => viewer.agent.reset_belief(),
                    _ => {}
                }
            }
        }
    }
}

//! Trains the agent against the reference arena and prints its learning curve.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use skirmish_td::agent::{AgentConfig, RLAgent};
use skirmish_td::arena::{Arena, ArenaConfig};
use skirmish_td::driver;

/// Online TD(0) skirmish agent
#[derive(Parser)]
#[command(name = "skirmish-td")]
#[command(about = "Train a linear-Q skirmish agent against the reference arena", long_about = None)]
struct Cli {
    /// Number of episodes to play
    #[arg(default_value_t = 10)]
    episodes: u32,

    /// Load weights from the weight file instead of starting fresh
    #[arg(long)]
    resume: bool,

    /// Weight file, overwritten after every episode
    #[arg(long, default_value = "agent_weights/weights.txt")]
    weights: PathBuf,

    /// Seed of the agent's random stream
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Seed of the arena's first episode
    #[arg(long, default_value_t = 42)]
    arena_seed: u64,

    /// Exploration rate during training episodes
    #[arg(long, default_value_t = 0.02)]
    epsilon: f64,

    /// Learning rate
    #[arg(long, default_value_t = 0.0001)]
    learning_rate: f64,

    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    gamma: f64,

    /// Episodes per training/evaluation block
    #[arg(long, default_value_t = 10)]
    block_size: u32,

    /// Training episodes at the start of each block
    #[arg(long, default_value_t = 3)]
    training_per_block: u32,

    /// Units per side
    #[arg(long, default_value_t = 5)]
    units: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = AgentConfig {
        num_episodes: cli.episodes,
        resume: cli.resume,
        weights_path: cli.weights,
        seed: cli.seed,
        epsilon: cli.epsilon,
        learning_rate: cli.learning_rate,
        gamma: cli.gamma,
        block_size: cli.block_size,
        training_episodes_per_block: cli.training_per_block,
        ..AgentConfig::default()
    };
    println!("Running {} episodes.", config.num_episodes);

    let mut agent = RLAgent::new(config).context("failed to create agent")?;
    let mut arena = Arena::new(
        ArenaConfig {
            controlled_units: cli.units,
            opposing_units: cli.units,
            ..ArenaConfig::default()
        },
        cli.arena_seed,
    );

    let summary = driver::run(&mut agent, &mut arena);
    print!("{}", summary);
    Ok(())
}

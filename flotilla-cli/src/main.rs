use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flotilla_core::{
    decide, GenerationClock, MutationStrategy, Pose, Population, SteeringPolicy,
};
use flotilla_types::{BoatGenome, BoatId, GenerationMetrics, WorldConfig};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

mod arena;

use arena::{Arena, ArenaView};

/// Decision ticks advance simulated time in fixed steps.
const TICK_SECONDS: f32 = 0.1;

#[derive(Parser, Debug)]
#[command(name = "flotilla-cli")]
#[command(about = "Flotilla evolution CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Run {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        generations: Option<u32>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = MutationMode::NonUniform)]
        mutation: MutationMode,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Export {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        generations: Option<u32>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = MutationMode::NonUniform)]
        mutation: MutationMode,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MutationMode {
    Uniform,
    NonUniform,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Jsonl,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    generations: u32,
    seed: u64,
    boats: u32,
    final_min_points: f32,
    final_mid_points: f32,
    final_max_points: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "flotilla_cli=info".to_owned()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            generations,
            seed,
            mutation,
            format,
            out,
        } => run_command(config, generations, seed, mutation, format, out),
        Commands::Export {
            config,
            generations,
            seed,
            mutation,
            format,
            out,
        } => export_command(config, generations, seed, mutation, format, out),
    }
}

fn run_command(
    config_path: Option<PathBuf>,
    generations: Option<u32>,
    seed: u64,
    mutation: MutationMode,
    format: OutputFormat,
    out: Option<PathBuf>,
) -> Result<()> {
    let cfg = load_config(config_path, generations)?;
    let boats = cfg.num_boats;
    let total_generations = cfg.max_generation;

    let per_generation = run_session(cfg, seed, mutation)?;
    let last = per_generation
        .last()
        .context("no generations were simulated; max_generation is zero")?;

    let summary = RunSummary {
        generations: total_generations,
        seed,
        boats,
        final_min_points: last.min_points,
        final_mid_points: last.mid_points,
        final_max_points: last.max_points,
    };

    match format {
        OutputFormat::Pretty => {
            let text = format!(
                "generations={} seed={} boats={} final_min={} final_mid={} final_max={}",
                summary.generations,
                summary.seed,
                summary.boats,
                summary.final_min_points,
                summary.final_mid_points,
                summary.final_max_points
            );
            write_output(text, out)?;
        }
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&summary)?;
            write_output(text, out)?;
        }
    }

    Ok(())
}

fn export_command(
    config_path: Option<PathBuf>,
    generations: Option<u32>,
    seed: u64,
    mutation: MutationMode,
    format: ExportFormat,
    out: PathBuf,
) -> Result<()> {
    let cfg = load_config(config_path, generations)?;
    let per_generation = run_session(cfg, seed, mutation)?;

    let payload = match format {
        ExportFormat::Csv => {
            let mut lines = vec!["generation,min_points,mid_points,max_points".to_owned()];
            lines.extend(per_generation.iter().map(|m| {
                format!(
                    "{},{},{},{}",
                    m.generation, m.min_points, m.mid_points, m.max_points
                )
            }));
            lines.join("\n")
        }
        ExportFormat::Jsonl => per_generation
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()?
            .join("\n"),
    };

    fs::write(&out, payload)
        .with_context(|| format!("failed writing export to {}", out.display()))?;
    println!(
        "exported {} generations to {}",
        per_generation.len(),
        out.display()
    );
    Ok(())
}

struct BoatState {
    id: BoatId,
    genome: BoatGenome,
    pose: Pose,
}

struct RunClock {
    breeding_generation: u32,
    horizon: u32,
}

impl GenerationClock for RunClock {
    fn current_generation(&self) -> u32 {
        self.breeding_generation
    }

    fn max_generation(&self) -> u32 {
        self.horizon
    }
}

/// Drives the full evolution session: each generation the fleet respawns at
/// random positions, steers through the arena for the configured tick
/// budget, scores box pickups (+1) against enemy contacts (-1), and breeds
/// the next fleet from its survivors.
fn run_session(
    config: WorldConfig,
    seed: u64,
    mutation: MutationMode,
) -> Result<Vec<GenerationMetrics>> {
    let policy = SteeringPolicy {
        max_utility_choice_chance: config.max_utility_choice_chance,
    };
    let strategy = match mutation {
        MutationMode::Uniform => MutationStrategy::Uniform {
            factor: config.mutation_factor,
            chance_percent: config.mutation_chance_percent,
        },
        MutationMode::NonUniform => MutationStrategy::NonUniform {
            shape: config.shape_parameter,
        },
    };
    let max_generation = config.max_generation;
    let ticks = config.ticks_per_generation;
    let arena_config = config.arena;

    let mut population = Population::new(config, seed)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut arena = Arena::generate(arena_config, &mut rng);

    let mut per_generation = Vec::with_capacity(max_generation as usize);
    for generation in 0..max_generation {
        let mut boats = spawn_fleet(&population, &arena, &mut rng);

        for _ in 0..ticks {
            // Every boat decides against start-of-tick positions.
            let positions: Vec<Vec3> = boats.iter().map(|boat| boat.pose.position).collect();
            for (index, boat) in boats.iter_mut().enumerate() {
                let sensors = ArenaView {
                    arena: &arena,
                    boat_positions: &positions,
                    self_index: index,
                };
                let direction = decide(&boat.pose, &boat.genome, policy, &sensors, &mut rng);

                boat.pose.forward = direction;
                boat.pose.position = arena.clamp_position(
                    boat.pose.position + direction * boat.genome.moving_speed * TICK_SECONDS,
                );

                if arena.collect_box(boat.pose.position, &mut rng) {
                    population.award_points(boat.id, 1.0);
                }
                if arena.touches_enemy(boat.pose.position) {
                    population.award_points(boat.id, -1.0);
                }
            }
        }

        let metrics = population.metrics(generation);
        info!(
            generation,
            min = metrics.min_points,
            mid = metrics.mid_points,
            max = metrics.max_points,
            "generation complete"
        );
        per_generation.push(metrics);

        let breeding_generation = generation + 1;
        if breeding_generation < max_generation {
            let clock = RunClock {
                breeding_generation,
                horizon: max_generation,
            };
            population.advance_generation(strategy, &clock);
        }
    }

    Ok(per_generation)
}

fn spawn_fleet(population: &Population, arena: &Arena, rng: &mut ChaCha8Rng) -> Vec<BoatState> {
    population
        .members()
        .iter()
        .map(|member| BoatState {
            id: member.id,
            genome: member.genome,
            pose: Pose {
                position: arena.random_position(rng),
                forward: Vec3::Z,
            },
        })
        .collect()
}

fn load_config(path: Option<PathBuf>, generations: Option<u32>) -> Result<WorldConfig> {
    let mut cfg = match path {
        Some(path) => flotilla_config::load_world_config_from_path(&path)?,
        None => flotilla_config::default_world_config(),
    };
    if let Some(generations) = generations {
        cfg.max_generation = generations;
    }
    Ok(cfg)
}

fn write_output(text: String, out: Option<PathBuf>) -> Result<()> {
    if let Some(path) = out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating output directory {}", parent.display()))?;
        }
        fs::write(&path, text).with_context(|| format!("failed writing {}", path.display()))?;
        println!("wrote output to {}", path.display());
    } else {
        println!("{text}");
    }
    Ok(())
}

mod simulation;

use anyhow::Result;
use clap::Parser;
use log::info;

use simulation::{
    AgentDispatch, CarModel, Category, CruiseAgent, ObjectRef, ScenarioConfig, SceneState,
};

#[derive(Parser)]
#[command(name = "urban_sim")]
#[command(about = "Urban driving scene simulation, headless")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "500")]
    ticks: u64,

    /// Seed for reproducible spawn placement
    #[arg(long, default_value = "27")]
    seed: u64,

    /// Path to a JSON scenario; defaults to the built-in four-way intersection
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Kinematic model: kinematic, point, or reeds_shepp
    #[arg(long, default_value = "kinematic")]
    model: String,

    /// Number of controlled cars (built-in scenario only)
    #[arg(long, default_value = "1")]
    controlled_cars: usize,

    /// Number of background cars (built-in scenario only)
    #[arg(long, default_value = "4")]
    background_cars: usize,

    /// Number of pedestrians (built-in scenario only)
    #[arg(long, default_value = "2")]
    pedestrians: usize,

    /// Disable traffic lights (built-in scenario only)
    #[arg(long)]
    no_traffic_lights: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let model = CarModel::from_name(&cli.model)?;
    let config = match &cli.config {
        Some(path) => ScenarioConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => ScenarioConfig::four_way_intersection(
            cli.controlled_cars,
            cli.background_cars,
            cli.pedestrians,
            !cli.no_traffic_lights,
            model,
        ),
    };

    let mut scene = SceneState::from_config(config, cli.seed)?;

    // Demo policies: every car cruises and brakes on proximity. Real
    // planners live outside this crate and would be registered here.
    let mut dispatch = AgentDispatch::new();
    for index in 0..scene.controlled_cars().len() {
        dispatch.register(Box::new(CruiseAgent::new(
            ObjectRef::new(Category::ControlledCars, index),
            10.0,
            60.0,
        )));
    }
    for index in 0..scene.background_cars().len() {
        dispatch.register(Box::new(CruiseAgent::new(
            ObjectRef::new(Category::BackgroundCars, index),
            6.0,
            60.0,
        )));
    }

    println!("Initial state:");
    scene.print_summary();
    println!();

    for tick in 1..=cli.ticks {
        let actions = dispatch.collect_actions(&scene);
        scene.step(&actions)?;

        if tick % 100 == 0 {
            let report = scene.get_collisions();
            info!(
                "tick {}: {} dynamic collisions, {} static collisions",
                tick,
                report.dynamic.len(),
                report.statics.len()
            );
        }
    }

    println!("=== Final State ===");
    scene.print_summary();
    Ok(())
}
